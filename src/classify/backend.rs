//! Backend type alias and device management for the classifier math.
//!
//! The NdArray backend is sufficient here: descriptors are short vectors and
//! the example set is small, so CPU tensor ops cover the distance math with
//! room to spare.

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend used for classification (no gradients involved anywhere)
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for classification
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device() {
        let device1 = default_device();
        let device2 = default_device();
        assert_eq!(
            std::mem::discriminant(&device1),
            std::mem::discriminant(&device2)
        );
    }
}
