pub mod basis;
pub mod config;
pub mod errors;
pub mod fans;
pub mod fourier;
pub mod initializers;
pub mod kernel_rank;
pub mod orthogonal;
pub mod recorders;
pub mod rng;

mod common;

pub use common::{Shape, WeightsD};
pub use config::{ConvolutionAwareConfig, DataFormat};
pub use errors::{InitError, InitResult};
pub use initializers::{ConvolutionAware, Initializer};
pub use orthogonal::Orthogonal;
pub use rng::RandomStream;
