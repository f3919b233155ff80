use log::{debug, warn};
use ndarray::IxDyn;

use crate::basis::generate_basis;
use crate::common::{product, Shape, WeightsD, AD};
use crate::config::ConvolutionAwareConfig;
use crate::errors::{validate_shape, InitError, InitResult};
use crate::fans::{compute_fans, target_variance};
use crate::fourier::rfft_shape;
use crate::kernel_rank::{KernelLayout, KernelRank};
use crate::orthogonal::Orthogonal;
use crate::rng::RandomStream;

pub trait Initializer {
    fn seed(&self) -> Option<u64>;

    // Every random draw of one call comes from `stream`.
    fn initialize_with(&self, shape: &Shape, stream: &mut RandomStream) -> InitResult<WeightsD>;

    fn initialize(&self, shape: &Shape) -> InitResult<WeightsD> {
        let mut stream = RandomStream::new(self.seed());
        self.initialize_with(shape, &mut stream)
    }
}

/// Convolution aware initialization (Aghajanyan, arXiv:1702.06295).
///
/// Filters are orthogonal in the Fourier domain: each output filter takes an
/// orthonormal basis of the kernel's half spectrum, one row per input channel,
/// maps it back through the inverse real FFT and adds a little noise to break
/// the symmetry of purely real spectra. The whole bank is then scaled to the
/// He variance `2 / fan_in`.
///
/// Shapes that are not 1D, 2D or 3D convolution kernels (rank 3, 4 or 5) are
/// handed to [`Orthogonal`] instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvolutionAware {
    config: ConvolutionAwareConfig,
    orthogonal: Orthogonal,
}

impl ConvolutionAware {
    pub fn new(eps_std: f64, seed: Option<u64>) -> InitResult<Self> {
        Self::from_config(ConvolutionAwareConfig::new(eps_std, seed)?)
    }

    pub fn from_config(config: ConvolutionAwareConfig) -> InitResult<Self> {
        config.validate()?;
        Ok(ConvolutionAware {
            config,
            orthogonal: Orthogonal::default(),
        })
    }

    pub fn get_config(&self) -> &ConvolutionAwareConfig {
        &self.config
    }

    /// Builds the unscaled bank in (out, in, *spatial) order.
    pub fn synthesize(
        &self,
        rank: KernelRank,
        layout: &KernelLayout,
        stream: &mut RandomStream,
    ) -> InitResult<AD> {
        let eps_std = self.config.eps_std;
        let kernel_shape = layout.kernel_shape.as_slice();

        let mut basis_shape = vec![layout.in_channels];
        basis_shape.extend(rfft_shape(kernel_shape));
        let fourier_size = product(&basis_shape[1..]);

        let mut bank_shape = vec![layout.out_channels, layout.in_channels];
        bank_shape.extend(kernel_shape);
        let mut bank = AD::zeros(IxDyn(&bank_shape));

        for mut filter in bank.outer_iter_mut() {
            let basis = generate_basis(layout.in_channels, fourier_size, eps_std, stream)?
                .into_shape_with_order(IxDyn(&basis_shape))
                .map_err(|e| InitError::invalid_shape(&basis_shape, e.to_string()))?;

            for (mut kernel, spectrum) in filter.outer_iter_mut().zip(basis.outer_iter()) {
                let spatial = rank.inverse_transform(spectrum, kernel_shape)?;
                let noise = stream.normal(IxDyn(kernel_shape), eps_std)?;
                kernel.assign(&(spatial + noise));
            }
        }
        Ok(bank)
    }
}

impl Initializer for ConvolutionAware {
    fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    fn initialize_with(&self, shape: &Shape, stream: &mut RandomStream) -> InitResult<WeightsD> {
        validate_shape(shape)?;

        let rank = KernelRank::of(shape);
        let layout = match rank.layout(shape) {
            Some(layout) => layout,
            None => {
                warn!(
                    "Rank {} shape {:?} is not a convolution kernel, using orthogonal init",
                    shape.len(),
                    shape
                );
                return self.orthogonal.initialize_with(shape, stream);
            }
        };

        let (fan_in, _) = compute_fans(shape, self.config.data_format);
        let variance = target_variance(fan_in);
        debug!(
            "{:?} kernel {:?}: {} -> {} channels, target variance {}",
            rank, layout.kernel_shape, layout.in_channels, layout.out_channels, variance
        );

        let bank = rescale(self.synthesize(rank, &layout, stream)?, variance)?;
        Ok(bank
            .permuted_axes(layout.permutation)
            .as_standard_layout()
            .mapv(|x| x as f32))
    }
}

/// Scales `bank` so that its population variance becomes `target_variance`.
pub fn rescale(bank: AD, target_variance: f64) -> InitResult<AD> {
    if bank.is_empty() {
        return Err(InitError::DegenerateScaling { variance: f64::NAN });
    }
    let variance = bank.var(0.0);
    if !variance.is_finite() || variance <= f64::EPSILON * target_variance {
        return Err(InitError::DegenerateScaling { variance });
    }
    let scale = (target_variance / variance).sqrt();
    Ok(bank * scale)
}
