use crate::config::DataFormat;

// Returns (fan_in, fan_out) for a weight shape.
//
// Convolution kernels (rank 3 to 5) multiply their channel counts by the
// receptive field size; which axes hold the channels depends on the data
// format. Any other rank falls back to the square root of the element count.
// Products are taken in f64 so that huge shapes cannot overflow.
pub fn compute_fans(shape: &[usize], data_format: DataFormat) -> (f64, f64) {
    match shape.len() {
        2 => (shape[0] as f64, shape[1] as f64),
        3..=5 => {
            let rank = shape.len();
            let (receptive_field, fan_in, fan_out) = match data_format {
                DataFormat::ChannelsFirst => (size(&shape[2..]), shape[1], shape[0]),
                DataFormat::ChannelsLast => {
                    (size(&shape[..rank - 2]), shape[rank - 2], shape[rank - 1])
                }
            };
            (
                fan_in as f64 * receptive_field,
                fan_out as f64 * receptive_field,
            )
        }
        _ => {
            let fan = size(shape).sqrt();
            (fan, fan)
        }
    }
}

fn size(dims: &[usize]) -> f64 {
    dims.iter().map(|&d| d as f64).product()
}

// He-style variance target for a kernel with the given fan-in.
pub fn target_variance(fan_in: f64) -> f64 {
    2.0 / fan_in
}
