use approx::assert_abs_diff_eq;
use ndarray::{s, Array2, Ix2};

use convaware::{
    basis::generate_basis, ConvolutionAware, ConvolutionAwareConfig, DataFormat, InitError,
    Initializer, RandomStream, WeightsD,
};

fn variance(weights: &WeightsD) -> f64 {
    weights.mapv(f64::from).var(0.0)
}

#[test]
fn conv2d_scenario() {
    let init = ConvolutionAware::new(0.05, Some(42)).unwrap();
    let weights = init.initialize(&[3, 3, 4, 8]).unwrap();

    assert_eq!(weights.shape(), &[3, 3, 4, 8]);
    assert_eq!(weights, init.initialize(&[3, 3, 4, 8]).unwrap());
    assert_abs_diff_eq!(variance(&weights), 2.0 / (3.0 * 3.0 * 4.0), epsilon = 1e-5);
    assert!(weights.iter().all(|x| x.is_finite()));
}

#[test]
fn conv1d_and_conv3d_shapes() {
    let init = ConvolutionAware::new(0.05, Some(7)).unwrap();

    let weights = init.initialize(&[5, 16, 3]).unwrap();
    assert_eq!(weights.shape(), &[5, 16, 3]);
    assert_abs_diff_eq!(variance(&weights), 2.0 / 80.0, epsilon = 1e-5);

    let weights = init.initialize(&[3, 3, 3, 2, 5]).unwrap();
    assert_eq!(weights.shape(), &[3, 3, 3, 2, 5]);
    assert_abs_diff_eq!(variance(&weights), 2.0 / 54.0, epsilon = 1e-5);
}

#[test]
fn unseeded_calls_differ() {
    let init = ConvolutionAware::default();
    let a = init.initialize(&[3, 3, 2, 2]).unwrap();
    let b = init.initialize(&[3, 3, 2, 2]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn explicit_streams_are_independent_of_config_seed() {
    let init = ConvolutionAware::new(0.05, Some(1)).unwrap();
    let a = init
        .initialize_with(&[3, 2, 2], &mut RandomStream::seeded(99))
        .unwrap();
    let b = init
        .initialize_with(&[3, 2, 2], &mut RandomStream::seeded(99))
        .unwrap();
    assert_eq!(a, b);
    assert_ne!(a, init.initialize(&[3, 2, 2]).unwrap());
}

#[test]
fn channels_first_changes_only_the_target_variance() {
    let config = ConvolutionAwareConfig::new(0.05, Some(3))
        .unwrap()
        .with_data_format(DataFormat::ChannelsFirst);
    let init = ConvolutionAware::from_config(config).unwrap();
    // Read channels-first, (3, 3, 4, 8) has fan_in 3 * 4 * 8.
    let weights = init.initialize(&[3, 3, 4, 8]).unwrap();
    assert_eq!(weights.shape(), &[3, 3, 4, 8]);
    assert_abs_diff_eq!(variance(&weights), 2.0 / 96.0, epsilon = 1e-5);
}

#[test]
fn vector_shape_falls_back_to_orthogonal() {
    let weights = ConvolutionAware::new(0.05, Some(0))
        .unwrap()
        .initialize(&[64])
        .unwrap();
    assert_eq!(weights.shape(), &[64]);
    let norm: f64 = weights.iter().map(|&x| f64::from(x).powi(2)).sum();
    assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-5);
}

#[test]
fn matrix_shape_falls_back_to_orthogonal() {
    let weights = ConvolutionAware::new(0.05, Some(0))
        .unwrap()
        .initialize(&[10, 6])
        .unwrap()
        .mapv(f64::from)
        .into_dimensionality::<Ix2>()
        .unwrap();
    assert_abs_diff_eq!(weights.t().dot(&weights), Array2::<f64>::eye(6), epsilon = 1e-5);
}

#[test]
fn single_input_channel_does_not_fail() {
    let init = ConvolutionAware::new(0.05, Some(11)).unwrap();
    let weights = init.initialize(&[3, 3, 1, 16]).unwrap();
    assert_eq!(weights.shape(), &[3, 3, 1, 16]);
    assert_abs_diff_eq!(variance(&weights), 2.0 / 9.0, epsilon = 1e-5);

    let weights = init.initialize(&[1, 1, 1, 16]).unwrap();
    assert_abs_diff_eq!(variance(&weights), 2.0, epsilon = 1e-4);
}

#[test]
fn basis_rows_are_orthonormal() {
    let mut stream = RandomStream::seeded(21);
    let basis = generate_basis(8, 12, 0.05, &mut stream).unwrap();
    let gram = basis.dot(&basis.t());
    for i in 0..8 {
        for j in 0..8 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((gram[[i, j]] - expected).abs() < 1e-6);
        }
    }
    // More rows than the dimension: the first full block is still orthonormal.
    let basis = generate_basis(10, 4, 0.05, &mut stream).unwrap();
    let block = basis.slice(s![..4, ..]);
    assert_abs_diff_eq!(block.dot(&block.t()), Array2::<f64>::eye(4), epsilon = 1e-6);
}

#[test]
fn invalid_inputs_are_errors() {
    assert!(matches!(
        ConvolutionAware::new(0.0, None),
        Err(InitError::Configuration(_))
    ));
    assert!(matches!(
        ConvolutionAware::new(-0.05, None),
        Err(InitError::Configuration(_))
    ));
    let init = ConvolutionAware::default();
    assert!(matches!(init.initialize(&[]), Err(InitError::InvalidShape { .. })));
    assert!(matches!(
        init.initialize(&[3, 3, 0, 8]),
        Err(InitError::InvalidShape { .. })
    ));
    assert!(matches!(
        init.initialize(&[usize::MAX / 2, 3, 4, 8]),
        Err(InitError::InvalidShape { .. })
    ));
    assert!(matches!(
        init.initialize(&[usize::MAX / 3, 4]),
        Err(InitError::InvalidShape { .. })
    ));
}
