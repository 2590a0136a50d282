//! Dataset summary and statistics.

use serde::{Deserialize, Serialize};

use crate::dataset::ClassificationDataset;

/// Summary of one numeric feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// Mean value.
    pub mean: f64,

    /// Sample standard deviation.
    pub std_dev: f64,

    /// Smallest value, if any example exists.
    pub min: Option<f64>,

    /// Largest value, if any example exists.
    pub max: Option<f64>,
}

/// Summary statistics for a classification dataset.
///
/// Provides class composition and per-feature moments, useful for
/// validation and debugging.
///
/// # Example
///
/// ```
/// use ml_dataset::{ClassificationDataset, DatasetSummary};
/// use ml_types::CategoricalData;
/// use nalgebra::DVector;
///
/// let no_fields: Vec<CategoricalData> = Vec::new();
/// let mut data = ClassificationDataset::new(1, no_fields, CategoricalData::new(2))?;
/// for (x, label) in [(1.0, 0), (2.0, 0), (3.0, 1)] {
///     data.add_data_point(DVector::from_element(1, x), vec![], label)?;
/// }
///
/// let summary = DatasetSummary::from_dataset(&data);
/// assert_eq!(summary.total_samples, 3);
/// assert_eq!(summary.class_counts, vec![2, 1]);
/// assert!((summary.features[0].mean - 2.0).abs() < 1e-12);
/// # Ok::<(), ml_dataset::DatasetError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Total number of samples.
    pub total_samples: usize,

    /// Number of samples in each class.
    pub class_counts: Vec<usize>,

    /// Optional class names, parallel to `class_counts`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_names: Vec<String>,

    /// Number of non-target categorical fields.
    pub categorical_fields: usize,

    /// Per numeric feature summary.
    pub features: Vec<FeatureSummary>,
}

impl DatasetSummary {
    /// Summarizes a dataset in one streaming pass.
    #[must_use]
    pub fn from_dataset(data: &ClassificationDataset) -> Self {
        let features = data
            .feature_stats()
            .iter()
            .map(|stats| FeatureSummary {
                mean: stats.mean(),
                std_dev: stats.standard_deviation(),
                min: stats.min(),
                max: stats.max(),
            })
            .collect();

        let predicting = data.predicting();
        let class_names = (0..predicting.num_categories())
            .map(|c| predicting.category_name(c).map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();

        Self {
            total_samples: data.sample_size(),
            class_counts: data.class_counts(),
            class_names,
            categorical_fields: data.num_categorical_vars(),
            features,
        }
    }

    /// Returns true if the dataset is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    /// Returns the class with the most samples, if any samples exist.
    ///
    /// Ties go to the lowest class index.
    #[must_use]
    pub fn majority_class(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.class_counts
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(class, _)| class)
    }

    /// Checks if every class holds a share within `tolerance` of `1 / K`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        if self.is_empty() || self.class_counts.is_empty() {
            return true;
        }
        let fair = 1.0 / self.class_counts.len() as f64;
        let total = self.total_samples as f64;
        self.class_counts
            .iter()
            .all(|&count| (count as f64 / total - fair).abs() <= tolerance)
    }

    /// Returns a human-readable summary string.
    #[must_use]
    #[allow(clippy::let_underscore_must_use, clippy::cast_precision_loss)]
    pub fn to_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        let _ = writeln!(report, "Dataset Summary");
        let _ = writeln!(report, "===============");
        let _ = writeln!(report, "Total samples: {}", self.total_samples);
        let _ = writeln!(report, "Categorical fields: {}", self.categorical_fields);

        let _ = writeln!(report, "\nClass Distribution:");
        for (class, &count) in self.class_counts.iter().enumerate() {
            let share = if self.total_samples > 0 {
                count as f64 / self.total_samples as f64 * 100.0
            } else {
                0.0
            };
            match self.class_names.get(class) {
                Some(name) => {
                    let _ = writeln!(report, "  Class {class} ({name}): {count} ({share:.1}%)");
                }
                None => {
                    let _ = writeln!(report, "  Class {class}: {count} ({share:.1}%)");
                }
            }
        }

        if !self.features.is_empty() {
            let _ = writeln!(report, "\nNumeric Features:");
            for (i, f) in self.features.iter().enumerate() {
                let _ = writeln!(
                    report,
                    "  Feature {i}: mean {:.4}, std {:.4}, range [{}, {}]",
                    f.mean,
                    f.std_dev,
                    fmt_bound(f.min),
                    fmt_bound(f.max)
                );
            }
        }

        report
    }
}

fn fmt_bound(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.4}"))
}
