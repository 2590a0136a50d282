//! Stratified classification datasets.
//!
//! This crate stores labelled examples bucketed by class and provides the
//! resampling a classifier evaluation loop needs:
//!
//! # Dataset Operations
//!
//! - [`ClassificationDataset`] - Examples grouped into one bucket per class
//! - [`ClassificationDataset::from_data_points`] - Build from a flat source by promoting a target field
//! - [`ClassificationDataset::apply_transform`] - Replace every example under a shape-declared transform
//!
//! # Cross Validation
//!
//! - [`ClassificationDataset::cv_split`] - Partition into shuffled folds
//! - [`ClassificationDataset::combine_all_but`] - Merge every fold except one
//! - [`CrossValidation`] - Fold count, strategy and seed
//!
//! # Statistics
//!
//! - [`DatasetSummary`] - Class composition and per-feature moments
//!
//! # Example
//!
//! ```
//! use ml_dataset::{ClassificationDataset, CrossValidation};
//! use ml_types::CategoricalData;
//! use nalgebra::DVector;
//!
//! let no_fields: Vec<CategoricalData> = Vec::new();
//! let mut data = ClassificationDataset::new(1, no_fields, CategoricalData::new(2))?;
//! for i in 0..10 {
//!     data.add_data_point(DVector::from_element(1, f64::from(i)), vec![], i as usize % 2)?;
//! }
//!
//! let folds = data.cv_split_with(&CrossValidation::new(5).with_seed(42))?;
//! assert_eq!(folds.len(), 5);
//! assert!(folds.iter().all(|fold| fold.sample_size() == 2));
//!
//! let train = ClassificationDataset::combine_all_but(&folds, 0)?;
//! assert_eq!(train.sample_size(), 8);
//! # Ok::<(), ml_dataset::DatasetError>(())
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod dataset;
mod error;
mod splits;
mod summary;
mod transform;

// Re-export dataset types
pub use dataset::ClassificationDataset;

// Re-export split configuration
pub use splits::{CrossValidation, FoldStrategy};

// Re-export summary types
pub use summary::{DatasetSummary, FeatureSummary};

// Re-export error types
pub use error::{DatasetError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ClassificationDataset, CrossValidation, DatasetError, DatasetSummary, FeatureSummary,
        FoldStrategy,
    };
    pub use ml_types::{CategoricalData, DataPoint, DataTransform, Shape};
}
