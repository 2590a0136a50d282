//! Data point and shape types.

use std::sync::Arc;

use nalgebra::DVector;

use crate::categorical::CategoricalData;
use crate::error::{FieldKind, MlTypesError, Result};

/// A single example: numeric features, categorical assignments, and the
/// descriptors those assignments are drawn from.
///
/// The descriptor array is shared, so cloning a data point or building many
/// points against the same descriptors does not copy it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use ml_types::{CategoricalData, DataPoint};
/// use nalgebra::DVector;
///
/// let cats: Arc<[CategoricalData]> = Arc::from(vec![CategoricalData::new(3)]);
/// let dp = DataPoint::new(DVector::from_vec(vec![1.0, 2.0]), vec![2], cats);
///
/// assert_eq!(dp.num_numerical_values(), 2);
/// assert_eq!(dp.categorical_values(), &[2]);
/// assert!((dp.weight() - 1.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    numerical: DVector<f64>,
    categorical: Vec<usize>,
    categories: Arc<[CategoricalData]>,
    weight: f64,
}

impl DataPoint {
    /// Creates a data point with unit weight.
    ///
    /// No validation is performed; use [`DataPoint::try_new`] or
    /// [`Shape::validate`] when the inputs are untrusted.
    #[must_use]
    pub fn new(
        numerical: DVector<f64>,
        categorical: Vec<usize>,
        categories: Arc<[CategoricalData]>,
    ) -> Self {
        Self {
            numerical,
            categorical,
            categories,
            weight: 1.0,
        }
    }

    /// Creates a data point after checking `categorical` against `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`MlTypesError::ShapeMismatch`] if the categorical vector has
    /// the wrong length, or [`MlTypesError::InvalidCategory`] if a value is
    /// outside its descriptor's range.
    pub fn try_new(
        numerical: DVector<f64>,
        categorical: Vec<usize>,
        categories: Arc<[CategoricalData]>,
    ) -> Result<Self> {
        check_categorical(&categorical, &categories)?;
        Ok(Self::new(numerical, categorical, categories))
    }

    /// Sets the sample weight.
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the numeric feature vector.
    #[must_use]
    pub const fn numerical_values(&self) -> &DVector<f64> {
        &self.numerical
    }

    /// Returns the categorical assignment vector.
    #[must_use]
    pub fn categorical_values(&self) -> &[usize] {
        &self.categorical
    }

    /// Returns the categorical descriptors.
    #[must_use]
    pub fn categorical_data(&self) -> &[CategoricalData] {
        &self.categories
    }

    /// Returns the shared handle to the categorical descriptors.
    #[must_use]
    pub const fn categorical_data_arc(&self) -> &Arc<[CategoricalData]> {
        &self.categories
    }

    /// Returns the number of numeric features.
    #[must_use]
    pub fn num_numerical_values(&self) -> usize {
        self.numerical.len()
    }

    /// Returns the number of categorical fields.
    #[must_use]
    pub fn num_categorical_values(&self) -> usize {
        self.categorical.len()
    }

    /// Returns the sample weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Splits the point into its numeric and categorical vectors.
    #[must_use]
    pub fn into_parts(self) -> (DVector<f64>, Vec<usize>) {
        (self.numerical, self.categorical)
    }
}

/// The numeric feature count and categorical descriptors shared by every
/// example of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    numeric: usize,
    categories: Arc<[CategoricalData]>,
}

impl Shape {
    /// Creates a shape.
    #[must_use]
    pub fn new(numeric: usize, categories: impl Into<Arc<[CategoricalData]>>) -> Self {
        Self {
            numeric,
            categories: categories.into(),
        }
    }

    /// Reads the shape of an existing data point.
    #[must_use]
    pub fn of(point: &DataPoint) -> Self {
        Self {
            numeric: point.num_numerical_values(),
            categories: Arc::clone(&point.categories),
        }
    }

    /// Returns the numeric feature count.
    #[must_use]
    pub const fn numeric(&self) -> usize {
        self.numeric
    }

    /// Returns the categorical descriptors.
    #[must_use]
    pub fn categories(&self) -> &[CategoricalData] {
        &self.categories
    }

    /// Returns the shared handle to the categorical descriptors.
    #[must_use]
    pub const fn categories_arc(&self) -> &Arc<[CategoricalData]> {
        &self.categories
    }

    /// Returns the number of categorical fields.
    #[must_use]
    pub fn num_categorical(&self) -> usize {
        self.categories.len()
    }

    /// Checks raw feature vectors against this shape.
    ///
    /// Lengths are checked numeric first, then categorical, then every
    /// categorical value against its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`MlTypesError::ShapeMismatch`] or
    /// [`MlTypesError::InvalidCategory`] on the first violation.
    pub fn validate(&self, numerical: &DVector<f64>, categorical: &[usize]) -> Result<()> {
        if numerical.len() != self.numeric {
            return Err(MlTypesError::shape_mismatch(
                FieldKind::Numeric,
                self.numeric,
                numerical.len(),
            ));
        }
        check_categorical(categorical, &self.categories)
    }

    /// Checks a data point against this shape, including its descriptors.
    ///
    /// # Errors
    ///
    /// As [`Shape::validate`], plus [`MlTypesError::DescriptorMismatch`] when
    /// the point carries different descriptors.
    pub fn check(&self, point: &DataPoint) -> Result<()> {
        self.validate(&point.numerical, &point.categorical)?;
        if !Arc::ptr_eq(&self.categories, &point.categories)
            && *self.categories != *point.categories
        {
            return Err(MlTypesError::DescriptorMismatch);
        }
        Ok(())
    }
}

fn check_categorical(values: &[usize], categories: &[CategoricalData]) -> Result<()> {
    if values.len() != categories.len() {
        return Err(MlTypesError::shape_mismatch(
            FieldKind::Categorical,
            categories.len(),
            values.len(),
        ));
    }
    for (field, (&value, cat)) in values.iter().zip(categories).enumerate() {
        if !cat.is_valid_category(value) {
            return Err(MlTypesError::invalid_category(
                field,
                value,
                cat.num_categories(),
            ));
        }
    }
    Ok(())
}
