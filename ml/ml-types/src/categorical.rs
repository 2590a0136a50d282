//! Categorical field descriptors.

use serde::{Deserialize, Serialize};

/// Describes one categorical field: how many categories it has and,
/// optionally, what they are called.
///
/// Category values are indices in `0..num_categories()`.
///
/// # Example
///
/// ```
/// use ml_types::CategoricalData;
///
/// let color = CategoricalData::with_names("color", ["red", "green", "blue"]);
/// assert_eq!(color.num_categories(), 3);
/// assert!(color.is_valid_category(2));
/// assert!(!color.is_valid_category(3));
/// assert_eq!(color.category_name(1), Some("green"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoricalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    num_categories: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    category_names: Vec<String>,
}

impl CategoricalData {
    /// Creates an unnamed descriptor with `num_categories` categories.
    #[must_use]
    pub const fn new(num_categories: usize) -> Self {
        Self {
            name: None,
            num_categories,
            category_names: Vec::new(),
        }
    }

    /// Creates a named descriptor whose categories are labelled by `names`.
    ///
    /// The category count is the number of names given.
    #[must_use]
    pub fn with_names<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let category_names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            name: Some(name.into()),
            num_categories: category_names.len(),
            category_names,
        }
    }

    /// Sets the field name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the field name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the number of valid categories.
    #[must_use]
    pub const fn num_categories(&self) -> usize {
        self.num_categories
    }

    /// Returns `true` if `category` is a valid index for this field.
    #[must_use]
    pub const fn is_valid_category(&self, category: usize) -> bool {
        category < self.num_categories
    }

    /// Returns the display name of `category`, if names were provided.
    #[must_use]
    pub fn category_name(&self, category: usize) -> Option<&str> {
        self.category_names.get(category).map(String::as_str)
    }
}
