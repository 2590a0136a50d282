//! Class-partitioned dataset storage.

use std::sync::Arc;

use ml_types::{CategoricalData, DataPoint, FieldKind, OnlineStats, Shape};
use nalgebra::DVector;
use tracing::debug;

use crate::error::{DatasetError, Result};

/// A classification dataset whose examples are grouped by class.
///
/// Every example lives in the bucket of its class, so the label is never
/// stored on the example itself. Buckets are addressed as one logical
/// sequence in bucket order: all of class 0, then all of class 1, and so on.
///
/// All examples share the dataset's [`Shape`]: the same numeric feature count
/// and the same categorical descriptors (which exclude the target field).
///
/// # Example
///
/// ```
/// use ml_dataset::ClassificationDataset;
/// use ml_types::CategoricalData;
/// use nalgebra::DVector;
///
/// let no_fields: Vec<CategoricalData> = Vec::new();
/// let mut data = ClassificationDataset::new(2, no_fields, CategoricalData::new(2))?;
/// data.add_data_point(DVector::from_vec(vec![0.0, 1.0]), vec![], 1)?;
/// data.add_data_point(DVector::from_vec(vec![1.0, 0.0]), vec![], 0)?;
///
/// assert_eq!(data.sample_size(), 2);
/// assert_eq!(data.data_point_category(0)?, 0);
/// assert_eq!(data.data_point_category(1)?, 1);
/// # Ok::<(), ml_dataset::DatasetError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationDataset {
    shape: Shape,
    predicting: CategoricalData,
    buckets: Vec<Vec<DataPoint>>,
    num_samples: usize,
}

impl ClassificationDataset {
    /// Creates an empty dataset from explicit metadata.
    ///
    /// # Arguments
    ///
    /// - `numerical`: Numeric feature count
    /// - `categories`: Descriptors of the non-target categorical fields
    /// - `predicting`: Descriptor of the target field; one bucket per category
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NoClasses`] if `predicting` has no categories.
    pub fn new(
        numerical: usize,
        categories: impl Into<Arc<[CategoricalData]>>,
        predicting: CategoricalData,
    ) -> Result<Self> {
        Self::with_shape(Shape::new(numerical, categories), predicting)
    }

    /// Creates an empty dataset whose examples will have `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NoClasses`] if `predicting` has no categories.
    pub fn with_shape(shape: Shape, predicting: CategoricalData) -> Result<Self> {
        let classes = predicting.num_categories();
        if classes == 0 {
            return Err(DatasetError::NoClasses);
        }
        Ok(Self {
            shape,
            predicting,
            buckets: vec![Vec::new(); classes],
            num_samples: 0,
        })
    }

    /// Creates an empty dataset with the same metadata as `self`.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            predicting: self.predicting.clone(),
            buckets: vec![Vec::new(); self.buckets.len()],
            num_samples: 0,
        }
    }

    /// Builds a dataset by promoting one categorical field to the class label.
    ///
    /// The shape is read from the first point. Each point is re-created
    /// without the target field and filed under the bucket named by its
    /// target value. Sample weights are kept.
    ///
    /// # Arguments
    ///
    /// - `data`: Points carrying `C + 1` categorical fields
    /// - `target`: Index of the categorical field to predict
    ///
    /// # Errors
    ///
    /// - [`DatasetError::EmptySource`] if `data` is empty
    /// - [`DatasetError::TargetOutOfRange`] if `target` is not a categorical field
    /// - [`DatasetError::NoClasses`] if the target field has no categories
    /// - [`DatasetError::ShapeMismatch`], [`DatasetError::InvalidCategory`] or
    ///   [`DatasetError::InvalidLabel`] if a later point disagrees with the
    ///   first point's shape
    pub fn from_data_points(data: &[DataPoint], target: usize) -> Result<Self> {
        let first = data.first().ok_or(DatasetError::EmptySource)?;
        let source_cats = first.categorical_data();
        if target >= source_cats.len() {
            return Err(DatasetError::TargetOutOfRange {
                index: target,
                fields: source_cats.len(),
            });
        }

        let categories: Arc<[CategoricalData]> = without(source_cats, target).collect();
        let predicting = source_cats[target].clone();
        let mut dataset = Self::new(first.num_numerical_values(), categories, predicting)?;

        let expected_fields = source_cats.len();
        for dp in data {
            let values = dp.categorical_values();
            if values.len() != expected_fields {
                return Err(DatasetError::shape_mismatch(
                    FieldKind::Categorical,
                    expected_fields,
                    values.len(),
                ));
            }
            let label = values[target];
            let projected: Vec<usize> = without(values, target).collect();
            dataset.insert(
                dp.numerical_values().clone(),
                projected,
                dp.weight(),
                label,
            )?;
        }

        debug!(
            samples = dataset.num_samples,
            classes = dataset.num_classes(),
            target,
            "Built classification dataset from data points"
        );

        Ok(dataset)
    }

    /// Rebuilds a dataset from `(example, label)` pairs.
    ///
    /// This is the inverse of [`ClassificationDataset::to_labeled_pairs`].
    ///
    /// # Errors
    ///
    /// As [`ClassificationDataset::with_shape`] and
    /// [`ClassificationDataset::add_data_point`].
    pub fn from_labeled_pairs<I>(
        shape: Shape,
        predicting: CategoricalData,
        pairs: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (DataPoint, usize)>,
    {
        let mut dataset = Self::with_shape(shape, predicting)?;
        for (dp, label) in pairs {
            dataset.push(&dp, label)?;
        }
        Ok(dataset)
    }

    /// Adds an example to the bucket of class `label`.
    ///
    /// The stored example uses this dataset's categorical descriptors, not
    /// whatever the caller's vectors came from.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::ShapeMismatch`] if either vector has the wrong length
    /// - [`DatasetError::InvalidCategory`] if a categorical value is out of range
    /// - [`DatasetError::InvalidLabel`] if `label` has no bucket
    ///
    /// The dataset is unchanged on error.
    pub fn add_data_point(
        &mut self,
        numerical: DVector<f64>,
        categorical: Vec<usize>,
        label: usize,
    ) -> Result<()> {
        self.insert(numerical, categorical, 1.0, label)
    }

    /// Adds a copy of `point` to the bucket of class `label`, keeping its weight.
    ///
    /// # Errors
    ///
    /// As [`ClassificationDataset::add_data_point`].
    pub fn push(&mut self, point: &DataPoint, label: usize) -> Result<()> {
        self.insert(
            point.numerical_values().clone(),
            point.categorical_values().to_vec(),
            point.weight(),
            label,
        )
    }

    fn insert(
        &mut self,
        numerical: DVector<f64>,
        categorical: Vec<usize>,
        weight: f64,
        label: usize,
    ) -> Result<()> {
        self.shape.validate(&numerical, &categorical)?;
        let classes = self.buckets.len();
        let bucket = self
            .buckets
            .get_mut(label)
            .ok_or(DatasetError::invalid_label(label, classes))?;

        let point = DataPoint::new(
            numerical,
            categorical,
            Arc::clone(self.shape.categories_arc()),
        )
        .with_weight(weight);
        bucket.push(point);
        self.num_samples += 1;
        Ok(())
    }

    /// Maps a global position to `(bucket, offset)` by walking the buckets.
    fn locate(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.num_samples {
            return Err(DatasetError::index_out_of_range(index, self.num_samples));
        }
        let mut offset = index;
        for (label, bucket) in self.buckets.iter().enumerate() {
            if offset < bucket.len() {
                return Ok((label, offset));
            }
            offset -= bucket.len();
        }
        Err(DatasetError::index_out_of_range(index, self.num_samples))
    }

    /// Returns the example at global position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::IndexOutOfRange`] if `index >= sample_size()`.
    pub fn data_point(&self, index: usize) -> Result<&DataPoint> {
        let (label, offset) = self.locate(index)?;
        Ok(&self.buckets[label][offset])
    }

    /// Returns the class of the example at global position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::IndexOutOfRange`] if `index >= sample_size()`.
    pub fn data_point_category(&self, index: usize) -> Result<usize> {
        self.locate(index).map(|(label, _)| label)
    }

    /// Returns every example of class `category`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidLabel`] if `category` has no bucket.
    pub fn samples(&self, category: usize) -> Result<&[DataPoint]> {
        self.buckets
            .get(category)
            .map(Vec::as_slice)
            .ok_or(DatasetError::invalid_label(category, self.buckets.len()))
    }

    /// Returns numeric feature `n` of every example in class `category`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::InvalidLabel`] if `category` has no bucket
    /// - [`DatasetError::IndexOutOfRange`] if `n` is not a numeric feature
    pub fn sample_variable_vector(&self, category: usize, n: usize) -> Result<DVector<f64>> {
        let samples = self.samples(category)?;
        if n >= self.shape.numeric() {
            return Err(DatasetError::index_out_of_range(n, self.shape.numeric()));
        }
        Ok(DVector::from_iterator(
            samples.len(),
            samples.iter().map(|dp| dp.numerical_values()[n]),
        ))
    }

    /// Iterates over `(example, label)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&DataPoint, usize)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(label, bucket)| bucket.iter().map(move |dp| (dp, label)))
    }

    /// Copies the dataset out as `(example, label)` pairs in bucket order.
    #[must_use]
    pub fn to_labeled_pairs(&self) -> Vec<(DataPoint, usize)> {
        let mut pairs = Vec::with_capacity(self.num_samples);
        pairs.extend(self.iter().map(|(dp, label)| (dp.clone(), label)));
        pairs
    }

    /// Computes streaming statistics for every numeric feature.
    ///
    /// Returns one accumulator per feature, each having observed that
    /// feature's value on every example in bucket order.
    #[must_use]
    pub fn feature_stats(&self) -> Vec<OnlineStats> {
        let mut stats = vec![OnlineStats::new(); self.shape.numeric()];
        for (dp, _) in self.iter() {
            for (acc, &value) in stats.iter_mut().zip(dp.numerical_values().iter()) {
                acc.add(value);
            }
        }
        stats
    }

    /// Returns the number of examples in each class.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Returns the fraction of examples in each class.
    ///
    /// All zeros when the dataset is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn class_priors(&self) -> Vec<f64> {
        if self.num_samples == 0 {
            return vec![0.0; self.buckets.len()];
        }
        let total = self.num_samples as f64;
        self.buckets
            .iter()
            .map(|bucket| bucket.len() as f64 / total)
            .collect()
    }

    /// Returns the total number of examples.
    #[must_use]
    pub const fn sample_size(&self) -> usize {
        self.num_samples
    }

    /// Returns `true` if the dataset holds no examples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Returns the number of classes (buckets).
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the numeric feature count.
    #[must_use]
    pub const fn num_numerical_vars(&self) -> usize {
        self.shape.numeric()
    }

    /// Returns the number of non-target categorical fields.
    #[must_use]
    pub fn num_categorical_vars(&self) -> usize {
        self.shape.num_categorical()
    }

    /// Returns the descriptors of the non-target categorical fields.
    #[must_use]
    pub fn categories(&self) -> &[CategoricalData] {
        self.shape.categories()
    }

    /// Returns the descriptor of the target field.
    #[must_use]
    pub const fn predicting(&self) -> &CategoricalData {
        &self.predicting
    }

    /// Returns the shape shared by every example.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns `true` if `other` has the same shape and target descriptor.
    #[must_use]
    pub fn has_same_metadata(&self, other: &Self) -> bool {
        self.shape == other.shape && self.predicting == other.predicting
    }

    pub(crate) fn buckets(&self) -> &[Vec<DataPoint>] {
        &self.buckets
    }

    /// Replaces buckets and shape together; callers guarantee consistency.
    pub(crate) fn replace_contents(&mut self, shape: Shape, buckets: Vec<Vec<DataPoint>>) {
        debug_assert_eq!(buckets.len(), self.buckets.len());
        self.num_samples = buckets.iter().map(Vec::len).sum();
        self.shape = shape;
        self.buckets = buckets;
    }
}

fn without<T: Clone>(items: &[T], skip: usize) -> impl Iterator<Item = T> + '_ {
    items
        .iter()
        .enumerate()
        .filter(move |&(i, _)| i != skip)
        .map(|(_, item)| item.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Source points with categorical fields `[color(3), label(2)]`.
    fn source_points() -> Vec<DataPoint> {
        let cats: Arc<[CategoricalData]> =
            Arc::from(vec![CategoricalData::new(3), CategoricalData::new(2)]);
        let rows: [(f64, usize, usize); 5] = [
            (0.0, 0, 0),
            (1.0, 1, 1),
            (2.0, 2, 0),
            (3.0, 0, 1),
            (4.0, 1, 0),
        ];
        rows.iter()
            .map(|&(x, color, label)| {
                DataPoint::new(
                    DVector::from_vec(vec![x, -x]),
                    vec![color, label],
                    Arc::clone(&cats),
                )
            })
            .collect()
    }

    fn dataset(numeric: usize, fields: &[usize], classes: usize) -> ClassificationDataset {
        let categories: Vec<CategoricalData> =
            fields.iter().map(|&n| CategoricalData::new(n)).collect();
        match ClassificationDataset::new(numeric, categories, CategoricalData::new(classes)) {
            Ok(data) => data,
            Err(err) => panic!("failed to build dataset: {err}"),
        }
    }

    fn projected(target: usize) -> ClassificationDataset {
        match ClassificationDataset::from_data_points(&source_points(), target) {
            Ok(data) => data,
            Err(err) => panic!("failed to project source points: {err}"),
        }
    }

    fn empty_dataset() -> ClassificationDataset {
        dataset(2, &[3], 2)
    }

    #[test]
    fn from_data_points_partitions_by_target() {
        let data = projected(1);

        assert_eq!(data.sample_size(), 5);
        assert_eq!(data.num_classes(), 2);
        assert_eq!(data.class_counts(), vec![3, 2]);
        assert_eq!(data.num_numerical_vars(), 2);
        assert_eq!(data.num_categorical_vars(), 1);
        assert_eq!(data.categories(), &[CategoricalData::new(3)]);
        assert_eq!(data.predicting(), &CategoricalData::new(2));

        // Positions 0..3 come from bucket 0 in insertion order, then bucket 1.
        let xs: Vec<f64> = (0..5)
            .filter_map(|i| data.data_point(i).ok())
            .map(|dp| dp.numerical_values()[0])
            .collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 1.0, 3.0]);

        let labels: Vec<usize> = (0..5)
            .filter_map(|i| data.data_point_category(i).ok())
            .collect();
        assert_eq!(labels, vec![0, 0, 0, 1, 1]);

        // Target field removed from the categorical vector.
        let colors: Vec<usize> = data
            .iter()
            .map(|(dp, _)| dp.categorical_values()[0])
            .collect();
        assert_eq!(colors, vec![0, 2, 1, 1, 0]);
    }

    #[test]
    fn from_data_points_first_field_target() {
        let data = projected(0);

        assert_eq!(data.num_classes(), 3);
        assert_eq!(data.class_counts(), vec![2, 2, 1]);
        assert_eq!(data.categories(), &[CategoricalData::new(2)]);
    }

    #[test]
    fn from_data_points_errors() {
        assert_eq!(
            ClassificationDataset::from_data_points(&[], 0),
            Err(DatasetError::EmptySource)
        );
        assert_eq!(
            ClassificationDataset::from_data_points(&source_points(), 2),
            Err(DatasetError::TargetOutOfRange {
                index: 2,
                fields: 2
            })
        );
    }

    #[test]
    fn from_data_points_rejects_heterogeneous_source() {
        let mut points = source_points();
        let cats = Arc::clone(points[0].categorical_data_arc());
        points.push(DataPoint::new(DVector::zeros(3), vec![0, 0], cats));

        assert_eq!(
            ClassificationDataset::from_data_points(&points, 1),
            Err(DatasetError::shape_mismatch(FieldKind::Numeric, 2, 3))
        );
    }

    #[test]
    fn from_data_points_rejects_label_outside_target() {
        let mut points = source_points();
        let cats = Arc::clone(points[0].categorical_data_arc());
        // The target field has two categories, so label 2 has no bucket.
        points.push(DataPoint::new(DVector::zeros(2), vec![1, 2], cats));

        assert_eq!(
            ClassificationDataset::from_data_points(&points, 1),
            Err(DatasetError::invalid_label(2, 2))
        );
    }

    #[test]
    fn from_data_points_keeps_weights() {
        let mut points = source_points();
        points[0] = points[0].clone().with_weight(3.0);
        let first = ClassificationDataset::from_data_points(&points, 1)
            .and_then(|data| data.data_point(0).map(DataPoint::weight));
        assert_eq!(first, Ok(3.0));
    }

    #[test]
    fn new_requires_classes() {
        assert_eq!(
            ClassificationDataset::new(1, Vec::<CategoricalData>::new(), CategoricalData::new(0)),
            Err(DatasetError::NoClasses)
        );
    }

    #[test]
    fn add_data_point_counts() {
        let mut data = empty_dataset();
        for i in 0..4 {
            let result = data.add_data_point(DVector::zeros(2), vec![i % 3], i % 2);
            assert!(result.is_ok());
        }
        assert_eq!(data.sample_size(), 4);
        assert_eq!(data.class_counts(), vec![2, 2]);
    }

    #[test]
    fn add_data_point_uses_own_descriptors() {
        let mut data = empty_dataset();
        assert!(data.add_data_point(DVector::zeros(2), vec![1], 0).is_ok());

        let stored = data.data_point(0);
        assert!(stored.is_ok_and(|dp| Arc::ptr_eq(
            dp.categorical_data_arc(),
            data.shape().categories_arc()
        )));
    }

    #[test]
    fn add_data_point_wrong_numeric_length() {
        let mut data = empty_dataset();
        let result = data.add_data_point(DVector::zeros(3), vec![0], 0);

        assert_eq!(
            result,
            Err(DatasetError::shape_mismatch(FieldKind::Numeric, 2, 3))
        );
        assert_eq!(data.sample_size(), 0);
    }

    #[test]
    fn add_data_point_wrong_categorical_length() {
        let mut data = empty_dataset();
        let result = data.add_data_point(DVector::zeros(2), vec![0, 1], 0);

        assert_eq!(
            result,
            Err(DatasetError::shape_mismatch(FieldKind::Categorical, 1, 2))
        );
        assert_eq!(data.sample_size(), 0);
    }

    #[test]
    fn add_data_point_invalid_category() {
        let mut data = empty_dataset();
        let result = data.add_data_point(DVector::zeros(2), vec![3], 0);

        assert_eq!(
            result,
            Err(DatasetError::InvalidCategory {
                field: 0,
                value: 3,
                categories: 3
            })
        );
        assert!(data.is_empty());
    }

    #[test]
    fn add_data_point_invalid_label() {
        let mut data = empty_dataset();
        let result = data.add_data_point(DVector::zeros(2), vec![0], 2);

        assert_eq!(result, Err(DatasetError::invalid_label(2, 2)));
        assert!(data.is_empty());
    }

    #[test]
    fn positional_access_out_of_range() {
        let mut data = empty_dataset();
        assert_eq!(
            data.data_point(0).err(),
            Some(DatasetError::index_out_of_range(0, 0))
        );

        assert!(data.add_data_point(DVector::zeros(2), vec![0], 1).is_ok());
        assert!(data.data_point(0).is_ok());
        assert_eq!(data.data_point_category(0), Ok(1));
        assert_eq!(
            data.data_point_category(1),
            Err(DatasetError::index_out_of_range(1, 1))
        );
    }

    #[test]
    fn positional_access_skips_empty_buckets() {
        let mut data = dataset(0, &[], 4);
        assert!(data.add_data_point(DVector::zeros(0), vec![], 3).is_ok());
        assert!(data.add_data_point(DVector::zeros(0), vec![], 1).is_ok());

        assert_eq!(data.data_point_category(0), Ok(1));
        assert_eq!(data.data_point_category(1), Ok(3));
    }

    #[test]
    fn samples_and_variable_vector() {
        let data = projected(1);

        assert_eq!(data.samples(1).map(<[DataPoint]>::len), Ok(2));
        assert_eq!(data.samples(2).err(), Some(DatasetError::invalid_label(2, 2)));

        let column = data.sample_variable_vector(0, 1);
        assert_eq!(
            column.map(|v| v.iter().copied().collect::<Vec<_>>()),
            Ok(vec![0.0, -2.0, -4.0])
        );
        assert_eq!(
            data.sample_variable_vector(0, 2).err(),
            Some(DatasetError::index_out_of_range(2, 2))
        );
    }

    #[test]
    fn labeled_pairs_round_trip() {
        let data = projected(1);

        let pairs = data.to_labeled_pairs();
        assert_eq!(pairs.len(), 5);
        assert_eq!(
            pairs.iter().map(|(_, label)| *label).collect::<Vec<_>>(),
            vec![0, 0, 0, 1, 1]
        );

        let rebuilt = ClassificationDataset::from_labeled_pairs(
            data.shape().clone(),
            data.predicting().clone(),
            pairs,
        );
        assert_eq!(rebuilt, Ok(data));
    }

    #[test]
    fn feature_stats_single_bucket() {
        let mut data = dataset(1, &[], 1);
        for x in [1.0, 2.0, 3.0, 4.0] {
            assert!(data.add_data_point(DVector::from_element(1, x), vec![], 0).is_ok());
        }

        let stats = data.feature_stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count(), 4);
        assert_relative_eq!(stats[0].mean(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn feature_stats_across_buckets() {
        let data = projected(1);

        let stats = data.feature_stats();
        assert_eq!(stats.len(), 2);
        assert_relative_eq!(stats[0].mean(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(stats[1].mean(), -2.0, epsilon = 1e-12);
        assert_eq!(stats[0].max(), Some(4.0));
        assert_eq!(stats[1].min(), Some(-4.0));
    }

    #[test]
    fn class_priors() {
        let data = projected(1);

        let priors = data.class_priors();
        assert_relative_eq!(priors[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(priors[1], 0.4, epsilon = 1e-12);

        assert_eq!(empty_dataset().class_priors(), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_like_keeps_metadata() {
        let data = projected(1);
        let empty = data.empty_like();

        assert!(empty.is_empty());
        assert!(empty.has_same_metadata(&data));
        assert_eq!(empty.num_classes(), data.num_classes());
    }
}
