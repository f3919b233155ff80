use log::debug;
use ndarray::{Array2, IxDyn};

use crate::basis::{decompose, to_matrix};
use crate::common::{product, WeightsD, AD};
use crate::errors::{validate_shape, InitError, InitResult};
use crate::initializers::Initializer;
use crate::rng::RandomStream;

/// Orthogonal initialization of an arbitrary shape.
///
/// The shape is flattened to `(prod(shape[..-1]), shape[-1])`, a standard
/// normal matrix of that size is decomposed and whichever singular factor
/// already has the flattened shape is kept. Rows or columns of the result
/// (whichever are fewer) are orthonormal, times `gain`.
#[derive(Debug, Clone, PartialEq)]
pub struct Orthogonal {
    gain: f64,
    seed: Option<u64>,
}

impl Default for Orthogonal {
    fn default() -> Self {
        Orthogonal {
            gain: 1.0,
            seed: None,
        }
    }
}

impl Orthogonal {
    pub fn new(gain: f64, seed: Option<u64>) -> InitResult<Self> {
        if !gain.is_finite() {
            return Err(InitError::Configuration(format!(
                "gain must be finite, got {}",
                gain
            )));
        }
        Ok(Orthogonal { gain, seed })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn matrix(&self, shape: &[usize], stream: &mut RandomStream) -> InitResult<AD> {
        validate_shape(shape)?;
        let cols = shape[shape.len() - 1];
        let rows = product(&shape[..shape.len() - 1]);
        debug!("Orthogonal init of {:?} as a {}x{} matrix", shape, rows, cols);

        let a = stream.standard_normal((rows, cols));
        let svd = decompose(to_matrix(&a), true, true)?;
        let q = match (svd.u, svd.v_t) {
            (Some(u), _) if u.shape() == (rows, cols) => u,
            (_, Some(v_t)) if v_t.shape() == (rows, cols) => v_t,
            _ => {
                return Err(InitError::NumericalFailure(
                    "SVD returned no factor of the flattened shape".into(),
                ))
            }
        };

        Array2::from_shape_fn((rows, cols), |(i, j)| self.gain * q[(i, j)])
            .into_shape_with_order(IxDyn(shape))
            .map_err(|e| InitError::invalid_shape(shape, e.to_string()))
    }
}

impl Initializer for Orthogonal {
    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn initialize_with(&self, shape: &[usize], stream: &mut RandomStream) -> InitResult<WeightsD> {
        Ok(self.matrix(shape, stream)?.mapv(|x| x as f32))
    }
}
