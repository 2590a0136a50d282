//! Whole-dataset transform application.

use std::sync::Arc;

use ml_types::{DataPoint, DataTransform};
use tracing::info;

use crate::dataset::ClassificationDataset;
use crate::error::Result;

impl ClassificationDataset {
    /// Replaces every example with its image under `transform`.
    ///
    /// The new metadata is the shape the transform declares for this
    /// dataset's current shape. Every transformed example is checked against
    /// that shape before anything is committed, so on error the dataset is
    /// left exactly as it was. Labels and sample weights are kept.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::ShapeMismatch`](crate::DatasetError::ShapeMismatch)
    ///   if an output's vector lengths differ from the declared shape
    /// - [`DatasetError::InvalidCategory`](crate::DatasetError::InvalidCategory)
    ///   if an output's categorical value is out of range
    /// - [`DatasetError::DescriptorMismatch`](crate::DatasetError::DescriptorMismatch)
    ///   if an output carries different categorical descriptors
    ///
    /// # Example
    ///
    /// ```
    /// use ml_dataset::ClassificationDataset;
    /// use ml_types::{CategoricalData, NumericMap};
    /// use nalgebra::DVector;
    ///
    /// let no_fields: Vec<CategoricalData> = Vec::new();
    /// let mut data = ClassificationDataset::new(1, no_fields, CategoricalData::new(1))?;
    /// data.add_data_point(DVector::from_element(1, 3.0), vec![], 0)?;
    ///
    /// data.apply_transform(&NumericMap::new(|x: f64| x * x))?;
    /// assert!((data.data_point(0)?.numerical_values()[0] - 9.0).abs() < 1e-12);
    /// # Ok::<(), ml_dataset::DatasetError>(())
    /// ```
    pub fn apply_transform<T: DataTransform + ?Sized>(&mut self, transform: &T) -> Result<()> {
        let shape = transform.output_shape(self.shape());

        let mut buckets = Vec::with_capacity(self.num_classes());
        for bucket in self.buckets() {
            let mut out = Vec::with_capacity(bucket.len());
            for dp in bucket {
                let transformed = transform.transform(dp);
                shape.check(&transformed)?;
                let weight = transformed.weight();
                let (numerical, categorical) = transformed.into_parts();
                out.push(
                    DataPoint::new(numerical, categorical, Arc::clone(shape.categories_arc()))
                        .with_weight(weight),
                );
            }
            buckets.push(out);
        }

        info!(
            samples = self.sample_size(),
            numeric_before = self.num_numerical_vars(),
            numeric_after = shape.numeric(),
            categorical_after = shape.num_categorical(),
            "Applied transform to dataset"
        );

        self.replace_contents(shape, buckets);
        Ok(())
    }
}
