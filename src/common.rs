use ndarray::{Array2, ArrayD};

pub type A2 = Array2<f64>;
pub type AD = ArrayD<f64>;
// Weights handed back to callers use the host default float.
pub type WeightsD = ArrayD<f32>;

pub type Shape = [usize];

// Callers pass dimensions of a shape that already went through `validate_shape`.
pub(crate) fn product(dims: &[usize]) -> usize {
    dims.iter().product()
}
