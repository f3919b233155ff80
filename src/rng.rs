use ndarray::{Array, Dimension, ShapeBuilder};
use ndarray_rand::{
    rand_distr::{Normal, StandardNormal},
    RandomExt,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::{InitError, InitResult};

/// Random stream threaded through every sampling step of an initializer call.
///
/// Seeded streams are reproducible; unseeded ones draw their seed from the OS.
/// Nothing here touches a process-wide generator.
pub struct RandomStream {
    rng: ChaCha8Rng,
}

impl RandomStream {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomStream {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomStream {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn standard_normal<Sh, D>(&mut self, shape: Sh) -> Array<f64, D>
    where
        Sh: ShapeBuilder<Dim = D>,
        D: Dimension,
    {
        Array::random_using(shape, StandardNormal, &mut self.rng)
    }

    pub fn normal<Sh, D>(&mut self, shape: Sh, std_dev: f64) -> InitResult<Array<f64, D>>
    where
        Sh: ShapeBuilder<Dim = D>,
        D: Dimension,
    {
        let dist = Normal::new(0.0, std_dev)
            .map_err(|e| InitError::Configuration(format!("normal({}): {}", std_dev, e)))?;
        Ok(Array::random_using(shape, dist, &mut self.rng))
    }
}
