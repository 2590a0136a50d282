//! Shared types for classification datasets.
//!
//! This crate provides the building blocks a dataset is made of:
//!
//! # Example Types
//!
//! - [`DataPoint`] - Numeric features plus categorical assignments
//! - [`CategoricalData`] - Cardinality (and optional names) of a categorical field
//! - [`Shape`] - Numeric feature count and categorical descriptors shared by a dataset
//!
//! # Statistics
//!
//! - [`OnlineStats`] - Constant-memory streaming moments
//!
//! # Transforms
//!
//! - [`DataTransform`] - Point-to-point mapping with a declared output shape
//! - [`NumericMap`] - Shape-preserving per-value numeric map
//! - [`FnTransform`] - Closure with an explicit output shape
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ml_types::{CategoricalData, DataPoint, Shape};
//! use nalgebra::DVector;
//!
//! let shape = Shape::new(2, vec![CategoricalData::new(3)]);
//! let dp = DataPoint::new(
//!     DVector::from_vec(vec![0.1, 0.2]),
//!     vec![1],
//!     Arc::clone(shape.categories_arc()),
//! );
//!
//! assert!(shape.check(&dp).is_ok());
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

mod categorical;
mod data_point;
mod error;
mod stats;
mod transform;

// Re-export example types
pub use categorical::CategoricalData;
pub use data_point::{DataPoint, Shape};

// Re-export statistics
pub use stats::OnlineStats;

// Re-export transforms
pub use transform::{DataTransform, FnTransform, NumericMap};

// Re-export error types
pub use error::{FieldKind, MlTypesError, Result};
