//! Data point transforms.

use std::fmt;

use crate::data_point::{DataPoint, Shape};

/// A mapping from one data point to another, possibly differently shaped.
///
/// Implementations declare their output shape up front so that callers can
/// size and validate results without inspecting transformed data.
pub trait DataTransform {
    /// Transforms a single data point.
    fn transform(&self, point: &DataPoint) -> DataPoint;

    /// Returns the shape every output has when inputs have shape `input`.
    fn output_shape(&self, input: &Shape) -> Shape;
}

impl<T: DataTransform + ?Sized> DataTransform for &T {
    fn transform(&self, point: &DataPoint) -> DataPoint {
        (**self).transform(point)
    }

    fn output_shape(&self, input: &Shape) -> Shape {
        (**self).output_shape(input)
    }
}

/// Applies a function to every numeric value, leaving the shape unchanged.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use ml_types::{CategoricalData, DataPoint, DataTransform, NumericMap};
/// use nalgebra::DVector;
///
/// let cats: Arc<[CategoricalData]> = Arc::new([]);
/// let dp = DataPoint::new(DVector::from_vec(vec![1.0, 4.0]), vec![], cats);
///
/// let sqrt = NumericMap::new(f64::sqrt);
/// let out = sqrt.transform(&dp);
/// assert!((out.numerical_values()[1] - 2.0).abs() < 1e-12);
/// ```
pub struct NumericMap<F> {
    f: F,
}

impl<F: Fn(f64) -> f64> NumericMap<F> {
    /// Wraps `f`.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for NumericMap<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericMap").finish_non_exhaustive()
    }
}

impl<F: Fn(f64) -> f64> DataTransform for NumericMap<F> {
    fn transform(&self, point: &DataPoint) -> DataPoint {
        DataPoint::new(
            point.numerical_values().map(&self.f),
            point.categorical_values().to_vec(),
            point.categorical_data_arc().clone(),
        )
        .with_weight(point.weight())
    }

    fn output_shape(&self, input: &Shape) -> Shape {
        input.clone()
    }
}

/// A transform built from a closure and an explicitly declared output shape.
///
/// The closure is trusted to produce points of `shape`; consumers such as the
/// dataset check every output against it.
pub struct FnTransform<F> {
    f: F,
    shape: Shape,
}

impl<F: Fn(&DataPoint) -> DataPoint> FnTransform<F> {
    /// Creates a transform producing points of `shape`.
    pub const fn new(shape: Shape, f: F) -> Self {
        Self { f, shape }
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl<F: Fn(&DataPoint) -> DataPoint> DataTransform for FnTransform<F> {
    fn transform(&self, point: &DataPoint) -> DataPoint {
        (self.f)(point)
    }

    fn output_shape(&self, _input: &Shape) -> Shape {
        self.shape.clone()
    }
}
