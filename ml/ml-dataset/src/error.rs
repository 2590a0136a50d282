//! Error types for ml-dataset crate.

use ml_types::{FieldKind, MlTypesError};
use thiserror::Error;

/// Errors that can occur in ml-dataset operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// A feature vector's length disagrees with the dataset's shape.
    #[error("{kind} shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// Which vector was checked.
        kind: FieldKind,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A categorical value is outside its field's cardinality.
    #[error("invalid category {value} for field {field}: expected < {categories}")]
    InvalidCategory {
        /// Index of the categorical field.
        field: usize,
        /// The offending value.
        value: usize,
        /// Number of categories the field allows.
        categories: usize,
    },

    /// Positional access past the end.
    #[error("index {index} out of range for {len} elements")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of elements available.
        len: usize,
    },

    /// A class label with no corresponding bucket.
    #[error("invalid label {label}: dataset has {classes} classes")]
    InvalidLabel {
        /// The offending label.
        label: usize,
        /// Number of classes.
        classes: usize,
    },

    /// The target descriptor has no categories, so there are no buckets.
    #[error("target field must have at least one category")]
    NoClasses,

    /// A dataset was requested from an empty source.
    #[error("cannot build a dataset from an empty source")]
    EmptySource,

    /// The target field index does not name a categorical field.
    #[error("target field {index} out of range for {fields} categorical fields")]
    TargetOutOfRange {
        /// Requested target field.
        index: usize,
        /// Number of categorical fields available.
        fields: usize,
    },

    /// Fold count must be at least one.
    #[error("invalid fold count: {0} (must be at least 1)")]
    InvalidFoldCount(usize),

    /// A dataset in a combination does not share the others' metadata.
    #[error("dataset {index} has different metadata from the rest")]
    MetadataMismatch {
        /// Position of the offending dataset.
        index: usize,
    },

    /// A data point carries categorical descriptors other than the expected ones.
    #[error("categorical descriptors differ from the declared shape")]
    DescriptorMismatch,
}

impl DatasetError {
    /// Creates a shape mismatch error.
    #[must_use]
    pub const fn shape_mismatch(kind: FieldKind, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            kind,
            expected,
            actual,
        }
    }

    /// Creates an index out of range error.
    #[must_use]
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Creates an invalid label error.
    #[must_use]
    pub const fn invalid_label(label: usize, classes: usize) -> Self {
        Self::InvalidLabel { label, classes }
    }
}

impl From<MlTypesError> for DatasetError {
    fn from(err: MlTypesError) -> Self {
        match err {
            MlTypesError::ShapeMismatch {
                kind,
                expected,
                actual,
            } => Self::ShapeMismatch {
                kind,
                expected,
                actual,
            },
            MlTypesError::InvalidCategory {
                field,
                value,
                categories,
            } => Self::InvalidCategory {
                field,
                value,
                categories,
            },
            MlTypesError::DescriptorMismatch => Self::DescriptorMismatch,
        }
    }
}

/// Result type for ml-dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
