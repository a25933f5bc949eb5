//! Post-transforms that turn image arrays into model input tensors.

use crate::{
    common::*,
    tensor::{to_unit_float, ArrayIntoTensor as _},
};

/// The transform applied on the H×W×3 image after the synchronized transform.
pub trait ImageTransform
where
    Self: Debug + Send + Sync,
{
    fn forward(&self, image: &Array3<u8>) -> Result<Tensor>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizeInit {
    pub mean: [R64; 3],
    pub std: [R64; 3],
}

impl NormalizeInit {
    pub fn build(self) -> Result<Normalize> {
        let Self { mean, std } = self;
        ensure!(
            std.iter().all(|&value| value > 0.0),
            "std must be positive, but get {:?}",
            std
        );

        Ok(Normalize {
            mean: mean.map(|value| value.raw() as f32),
            std: std.map(|value| value.raw() as f32),
        })
    }
}

impl Default for NormalizeInit {
    /// The ImageNet statistics.
    fn default() -> Self {
        Self {
            mean: [r64(0.485), r64(0.456), r64(0.406)],
            std: [r64(0.229), r64(0.224), r64(0.225)],
        }
    }
}

/// Converts bytes to a 3×H×W float tensor and normalizes each channel.
#[derive(Debug, Clone)]
pub struct Normalize {
    mean: [f32; 3],
    std: [f32; 3],
}

impl ImageTransform for Normalize {
    fn forward(&self, image: &Array3<u8>) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let image = to_unit_float(&image.f_into_tensor()?)?;
            let mean = Tensor::of_slice(&self.mean).f_view([3i64, 1, 1])?;
            let std = Tensor::of_slice(&self.std).f_view([3i64, 1, 1])?;
            Ok((image - mean) / std)
        })
    }
}
