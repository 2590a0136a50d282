//! Error types for ml-types crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which part of a data point a shape check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// The numeric feature vector.
    Numeric,
    /// The categorical assignment vector.
    Categorical,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.write_str("numeric"),
            Self::Categorical => f.write_str("categorical"),
        }
    }
}

/// Errors that can occur in ml-types operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MlTypesError {
    /// A vector's length disagrees with the expected shape.
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

    /// The categorical descriptors of a data point differ from the expected ones.
    #[error("categorical descriptors differ from the expected shape")]
    DescriptorMismatch,
}

impl MlTypesError {
    /// Creates a shape mismatch error.
    #[must_use]
    pub const fn shape_mismatch(kind: FieldKind, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            kind,
            expected,
            actual,
        }
    }

    /// Creates an invalid category error.
    #[must_use]
    pub const fn invalid_category(field: usize, value: usize, categories: usize) -> Self {
        Self::InvalidCategory {
            field,
            value,
            categories,
        }
    }
}

/// Result type for ml-types operations.
pub type Result<T> = std::result::Result<T, MlTypesError>;
