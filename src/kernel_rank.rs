use ndarray::ArrayViewD;
use rustfft::num_complex::Complex64;

use crate::common::AD;
use crate::errors::{InitError, InitResult};
use crate::fourier;

static PERMUTATION_1D: &[usize] = &[2, 1, 0];
static PERMUTATION_2D: &[usize] = &[2, 3, 1, 0];
static PERMUTATION_3D: &[usize] = &[2, 3, 4, 1, 0];

/// Kind of convolution kernel a weight shape describes.
///
/// Rank 3, 4 and 5 shapes are channels-last 1D, 2D and 3D kernels. Every
/// other rank is `Unsupported` and gets plain orthogonal initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelRank {
    OneD,
    TwoD,
    ThreeD,
    Unsupported,
}

/// Channels-last kernel shape split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelLayout {
    pub kernel_shape: Vec<usize>,
    pub in_channels: usize,
    pub out_channels: usize,
    // Moves (out, in, *spatial) to (*spatial, in, out)
    pub permutation: &'static [usize],
}

impl KernelRank {
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            3 => Self::OneD,
            4 => Self::TwoD,
            5 => Self::ThreeD,
            _ => Self::Unsupported,
        }
    }

    pub fn of(shape: &[usize]) -> Self {
        Self::from_rank(shape.len())
    }

    pub fn spatial_dims(&self) -> Option<usize> {
        match self {
            Self::OneD => Some(1),
            Self::TwoD => Some(2),
            Self::ThreeD => Some(3),
            Self::Unsupported => None,
        }
    }

    pub fn permutation(&self) -> Option<&'static [usize]> {
        match self {
            Self::OneD => Some(PERMUTATION_1D),
            Self::TwoD => Some(PERMUTATION_2D),
            Self::ThreeD => Some(PERMUTATION_3D),
            Self::Unsupported => None,
        }
    }

    // None for unsupported ranks or a shape whose rank disagrees with `self`.
    pub fn layout(&self, shape: &[usize]) -> Option<KernelLayout> {
        let spatial = self.spatial_dims()?;
        if shape.len() != spatial + 2 {
            return None;
        }
        Some(KernelLayout {
            kernel_shape: shape[..spatial].to_vec(),
            in_channels: shape[spatial],
            out_channels: shape[spatial + 1],
            permutation: self.permutation()?,
        })
    }

    /// Maps a real-valued frequency-domain block back to a spatial kernel.
    pub fn inverse_transform(
        &self,
        spectrum: ArrayViewD<f64>,
        kernel_shape: &[usize],
    ) -> InitResult<AD> {
        let spectrum = spectrum.mapv(|re| Complex64::new(re, 0.0));
        match self {
            Self::OneD => fourier::irfft(&spectrum, kernel_shape),
            Self::TwoD => fourier::irfft2(&spectrum, kernel_shape),
            Self::ThreeD => fourier::irfftn(&spectrum, kernel_shape),
            Self::Unsupported => Err(InitError::invalid_shape(
                kernel_shape,
                "no spectral transform for this rank",
            )),
        }
    }
}
