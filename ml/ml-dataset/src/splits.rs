//! Cross-validation fold splitting and fold recombination.

use ml_types::DataPoint;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::ClassificationDataset;
use crate::error::{DatasetError, Result};

/// How examples are assigned to folds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoldStrategy {
    /// One global shuffle, then contiguous runs of `n / folds` examples per
    /// fold with the remainder going to the last fold. Class proportions
    /// are not controlled.
    #[default]
    Shuffled,

    /// Each class is shuffled on its own and dealt round-robin across folds,
    /// so every fold sees roughly the dataset's class proportions. Fold sizes
    /// differ by at most one.
    Stratified,
}

/// Configuration for cross-validation splitting.
///
/// # Example
///
/// ```
/// use ml_dataset::{CrossValidation, FoldStrategy};
///
/// let cv = CrossValidation::new(5)
///     .with_strategy(FoldStrategy::Stratified)
///     .with_seed(42);
///
/// assert_eq!(cv.folds, 5);
/// assert_eq!(cv.seed, Some(42));
/// assert!(cv.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossValidation {
    /// Number of folds.
    pub folds: usize,

    /// Fold assignment strategy.
    #[serde(default)]
    pub strategy: FoldStrategy,

    /// Random seed for reproducible splits (`None` draws from entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CrossValidation {
    fn default() -> Self {
        Self::new(10)
    }
}

impl CrossValidation {
    /// Creates a shuffled, unseeded configuration with `folds` folds.
    #[must_use]
    pub const fn new(folds: usize) -> Self {
        Self {
            folds,
            strategy: FoldStrategy::Shuffled,
            seed: None,
        }
    }

    /// Sets the fold strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: FoldStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns `true` if the configuration can be used for splitting.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.folds > 0
    }

    fn rng(&self) -> ChaCha8Rng {
        self.seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64)
    }
}

impl ClassificationDataset {
    /// Splits the dataset into `folds` disjoint datasets for cross-validation.
    ///
    /// All examples are shuffled together with their labels, then the first
    /// `n / folds` go to fold 0, the next `n / folds` to fold 1, and so on;
    /// the last fold also receives the remainder. Every fold shares this
    /// dataset's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidFoldCount`] if `folds == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use ml_dataset::ClassificationDataset;
    /// use ml_types::CategoricalData;
    /// use nalgebra::DVector;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let no_fields: Vec<CategoricalData> = Vec::new();
    /// let mut data = ClassificationDataset::new(1, no_fields, CategoricalData::new(2))?;
    /// for i in 0..10 {
    ///     data.add_data_point(DVector::from_element(1, f64::from(i)), vec![], i as usize % 2)?;
    /// }
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(7);
    /// let folds = data.cv_split(3, &mut rng)?;
    /// let sizes: Vec<usize> = folds.iter().map(ClassificationDataset::sample_size).collect();
    /// assert_eq!(sizes, vec![3, 3, 4]);
    /// # Ok::<(), ml_dataset::DatasetError>(())
    /// ```
    pub fn cv_split<R: Rng + ?Sized>(&self, folds: usize, rng: &mut R) -> Result<Vec<Self>> {
        if folds == 0 {
            return Err(DatasetError::InvalidFoldCount(folds));
        }

        let mut order: Vec<(&DataPoint, usize)> = self.iter().collect();
        order.shuffle(rng);

        let mut out: Vec<Self> = (0..folds).map(|_| self.empty_like()).collect();
        let split_size = self.sample_size() / folds;
        for (k, (dp, label)) in order.into_iter().enumerate() {
            let fold = if split_size == 0 {
                folds - 1
            } else {
                (k / split_size).min(folds - 1)
            };
            out[fold].push(dp, label)?;
        }

        debug!(
            samples = self.sample_size(),
            folds,
            split_size,
            "Split dataset into shuffled folds"
        );

        Ok(out)
    }

    /// Splits the dataset into `folds` class-balanced datasets.
    ///
    /// Each bucket is shuffled independently and its examples are dealt to
    /// folds in turn, continuing the rotation from one class to the next.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidFoldCount`] if `folds == 0`.
    pub fn cv_split_stratified<R: Rng + ?Sized>(
        &self,
        folds: usize,
        rng: &mut R,
    ) -> Result<Vec<Self>> {
        if folds == 0 {
            return Err(DatasetError::InvalidFoldCount(folds));
        }

        let mut out: Vec<Self> = (0..folds).map(|_| self.empty_like()).collect();
        let mut next = 0;
        for (label, bucket) in self.buckets().iter().enumerate() {
            let mut order: Vec<&DataPoint> = bucket.iter().collect();
            order.shuffle(rng);
            for dp in order {
                out[next].push(dp, label)?;
                next = (next + 1) % folds;
            }
        }

        debug!(
            samples = self.sample_size(),
            folds,
            "Split dataset into stratified folds"
        );

        Ok(out)
    }

    /// Splits the dataset according to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidFoldCount`] if `config.folds == 0`.
    pub fn cv_split_with(&self, config: &CrossValidation) -> Result<Vec<Self>> {
        let mut rng = config.rng();
        match config.strategy {
            FoldStrategy::Shuffled => self.cv_split(config.folds, &mut rng),
            FoldStrategy::Stratified => self.cv_split_stratified(config.folds, &mut rng),
        }
    }

    /// Produces `(train, test)` pairs, one per fold.
    ///
    /// Pair `i` tests on fold `i` and trains on every other fold combined.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidFoldCount`] if `config.folds == 0`.
    pub fn cv_pairs_with(&self, config: &CrossValidation) -> Result<Vec<(Self, Self)>> {
        let folds = self.cv_split_with(config)?;
        let mut pairs = Vec::with_capacity(folds.len());
        for i in 0..folds.len() {
            let train = Self::combine_all_but(&folds, i)?;
            pairs.push((train, folds[i].clone()));
        }
        Ok(pairs)
    }

    /// Combines every dataset in `list` except the one at `exception`.
    ///
    /// For each included dataset in list order, each bucket's examples are
    /// appended to the same bucket of the result. The result has the shared
    /// metadata of the inputs.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::IndexOutOfRange`] if `exception` is not a position in `list`
    /// - [`DatasetError::MetadataMismatch`] if any dataset's metadata differs
    ///   from that of `list[exception]`
    pub fn combine_all_but(list: &[Self], exception: usize) -> Result<Self> {
        let template = list
            .get(exception)
            .ok_or(DatasetError::index_out_of_range(exception, list.len()))?;
        if let Some(index) = list.iter().position(|ds| !ds.has_same_metadata(template)) {
            return Err(DatasetError::MetadataMismatch { index });
        }

        let mut combined = template.empty_like();
        for (i, ds) in list.iter().enumerate() {
            if i == exception {
                continue;
            }
            for (label, bucket) in ds.buckets().iter().enumerate() {
                for dp in bucket {
                    combined.push(dp, label)?;
                }
            }
        }

        info!(
            datasets = list.len(),
            exception,
            samples = combined.sample_size(),
            "Combined datasets"
        );

        Ok(combined)
    }
}
