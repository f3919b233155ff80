//! Real-valued multidimensional FFT pair on top of `rustfft`.
//!
//! Conventions follow numpy's `rfftn`/`irfftn`: the real transform runs along
//! the last axis, full complex transforms along the others, and only the
//! inverse is normalized (by the number of spatial samples).

use std::sync::Arc;

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use rustfft::{num_complex::Complex64, Fft, FftPlanner};

use crate::common::{product, AD};
use crate::errors::{validate_shape, InitError, InitResult};

pub type SpectrumD = ArrayD<Complex64>;

// Shape of the half spectrum produced by `rfftn` for a real input of `shape`.
pub fn rfft_shape(shape: &[usize]) -> Vec<usize> {
    let mut fourier_shape = shape.to_vec();
    if let Some(last) = fourier_shape.last_mut() {
        *last = *last / 2 + 1;
    }
    fourier_shape
}

pub fn rfftn(input: &AD) -> InitResult<SpectrumD> {
    validate_shape(input.shape())?;
    let last = input.ndim() - 1;
    let n = input.len_of(Axis(last));

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n);
    let mut spectrum = SpectrumD::zeros(IxDyn(&rfft_shape(input.shape())));
    let mut buffer = vec![Complex64::default(); n];
    Zip::from(input.lanes(Axis(last)))
        .and(spectrum.lanes_mut(Axis(last)))
        .for_each(|src, mut dst| {
            buffer
                .iter_mut()
                .zip(src.iter())
                .for_each(|(b, &x)| *b = Complex64::new(x, 0.0));
            forward.process(&mut buffer);
            dst.iter_mut().zip(buffer.iter()).for_each(|(d, b)| *d = *b);
        });

    for axis in 0..last {
        let fft = planner.plan_fft_forward(spectrum.len_of(Axis(axis)));
        transform_axis(&mut spectrum, axis, &fft);
    }
    Ok(spectrum)
}

/// Inverse of [`rfftn`]: maps a half spectrum back to a real array of `shape`.
///
/// The spectrum must have exactly the shape `rfft_shape(shape)`. Imaginary
/// parts of the zero and Nyquist bins along the last axis do not contribute.
pub fn irfftn(spectrum: &SpectrumD, shape: &[usize]) -> InitResult<AD> {
    validate_shape(shape)?;
    if spectrum.shape() != rfft_shape(shape).as_slice() {
        return Err(InitError::invalid_shape(
            spectrum.shape(),
            format!("spectrum does not match output shape {:?}", shape),
        ));
    }

    let last = shape.len() - 1;
    let n = shape[last];
    let mut planner = FftPlanner::<f64>::new();

    let mut work = spectrum.clone();
    for axis in 0..last {
        let ifft = planner.plan_fft_inverse(shape[axis]);
        transform_axis(&mut work, axis, &ifft);
    }

    let inverse = planner.plan_fft_inverse(n);
    let mut output = AD::zeros(IxDyn(shape));
    let mut buffer = vec![Complex64::default(); n];
    Zip::from(work.lanes(Axis(last)))
        .and(output.lanes_mut(Axis(last)))
        .for_each(|half, mut dst| {
            // Hermitian completion of the missing upper half
            for (k, b) in buffer.iter_mut().enumerate() {
                *b = if k < half.len() { half[k] } else { half[n - k].conj() };
            }
            inverse.process(&mut buffer);
            dst.iter_mut().zip(buffer.iter()).for_each(|(d, b)| *d = b.re);
        });

    let scale = 1.0 / product(shape) as f64;
    output.mapv_inplace(|x| x * scale);
    Ok(output)
}

pub fn irfft(spectrum: &SpectrumD, shape: &[usize]) -> InitResult<AD> {
    check_rank(shape, 1)?;
    irfftn(spectrum, shape)
}

pub fn irfft2(spectrum: &SpectrumD, shape: &[usize]) -> InitResult<AD> {
    check_rank(shape, 2)?;
    irfftn(spectrum, shape)
}

fn check_rank(shape: &[usize], rank: usize) -> InitResult<()> {
    if shape.len() != rank {
        return Err(InitError::invalid_shape(
            shape,
            format!("expected a {}-dimensional kernel", rank),
        ));
    }
    Ok(())
}

// In-place complex transform of every lane along `axis`. Unnormalized.
fn transform_axis(data: &mut SpectrumD, axis: usize, fft: &Arc<dyn Fft<f64>>) {
    let mut buffer = Vec::with_capacity(data.len_of(Axis(axis)));
    for mut lane in data.lanes_mut(Axis(axis)) {
        buffer.clear();
        buffer.extend(lane.iter().copied());
        fft.process(&mut buffer);
        lane.iter_mut().zip(buffer.iter()).for_each(|(d, s)| *d = *s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, Array};

    use crate::rng::RandomStream;

    fn real_spectrum(values: &[f64], shape: &[usize]) -> SpectrumD {
        Array::from_shape_vec(IxDyn(shape), values.to_vec())
            .unwrap()
            .mapv(|re| Complex64::new(re, 0.0))
    }

    #[test]
    fn half_spectrum_shape() {
        assert_eq!(rfft_shape(&[3]), vec![2]);
        assert_eq!(rfft_shape(&[4]), vec![3]);
        assert_eq!(rfft_shape(&[3, 3]), vec![3, 2]);
        assert_eq!(rfft_shape(&[5, 4, 7]), vec![5, 4, 4]);
    }

    #[test]
    fn even_length_inverse() {
        let out = irfft(&real_spectrum(&[1.0, 2.0, 3.0], &[3]), &[4]).unwrap();
        let expected = arr1(&[2.0, -0.5, 0.0, -0.5]).into_dyn();
        assert_abs_diff_eq!(out, expected, epsilon = 1e-12);
    }

    #[test]
    fn odd_length_inverse() {
        let out = irfft(&real_spectrum(&[1.0, 2.0], &[2]), &[3]).unwrap();
        let expected = arr1(&[5.0 / 3.0, -1.0 / 3.0, -1.0 / 3.0]).into_dyn();
        assert_abs_diff_eq!(out, expected, epsilon = 1e-12);
    }

    #[test]
    fn dc_bin_spreads_evenly() {
        let mut values = vec![0.0; 3 * 2];
        values[0] = 1.0;
        let out = irfft2(&real_spectrum(&values, &[3, 2]), &[3, 3]).unwrap();
        assert_eq!(out.shape(), &[3, 3]);
        out.iter().for_each(|&x| assert_abs_diff_eq!(x, 1.0 / 9.0, epsilon = 1e-12));
    }

    #[test]
    fn inverse_undoes_forward_3d() {
        let signal = RandomStream::seeded(11).standard_normal(IxDyn(&[3, 4, 5]));
        let spectrum = rfftn(&signal).unwrap();
        assert_eq!(spectrum.shape(), &[3, 4, 3]);
        let restored = irfftn(&spectrum, &[3, 4, 5]).unwrap();
        assert_abs_diff_eq!(restored, signal, epsilon = 1e-10);
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let spectrum = real_spectrum(&[1.0, 2.0], &[2]);
        assert!(matches!(irfftn(&spectrum, &[5]), Err(InitError::InvalidShape { .. })));
        assert!(matches!(irfft2(&spectrum, &[3]), Err(InitError::InvalidShape { .. })));
        assert!(matches!(irfftn(&spectrum, &[]), Err(InitError::InvalidShape { .. })));
    }
}
