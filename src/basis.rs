use log::debug;
use nalgebra::{linalg::SVD, DMatrix, Dyn};
use ndarray::{s, Array2};

use crate::common::A2;
use crate::errors::{InitError, InitResult};
use crate::rng::RandomStream;

// nalgebra counts iterations over the whole bidiagonalization.
const SVD_ITERATIONS_PER_DIM: usize = 1000;

/// Returns `count` rows of length `dim`.
///
/// Rows come from successive orthonormal blocks, so any `dim` consecutive
/// rows starting at a multiple of `dim` are mutually orthonormal. With
/// `dim == 1` there is nothing to orthogonalize and the rows are plain
/// `Normal(0, eps_std)` samples.
///
/// Fails with `InvalidShape` when `dim == 0` or `count * dim` overflows, and
/// with `NumericalFailure` when an SVD does not converge.
pub fn generate_basis(
    count: usize,
    dim: usize,
    eps_std: f64,
    stream: &mut RandomStream,
) -> InitResult<A2> {
    if dim == 0 {
        return Err(InitError::invalid_shape(&[count, dim], "basis dimension must be positive"));
    }
    if dim == 1 {
        return stream.normal((count, 1), eps_std);
    }

    let size = count.checked_mul(dim).ok_or_else(|| {
        InitError::invalid_shape(&[count, dim], "basis size overflows usize")
    })?;
    let mut rows = Vec::with_capacity(size);
    let mut collected = 0;
    for block in OrthonormalBlocks::new(dim, stream).take(count.div_ceil(dim)) {
        let block = block?;
        let take = (count - collected).min(dim);
        rows.extend(block.slice(s![..take, ..]).iter().copied());
        collected += take;
    }
    debug!("Generated {} basis rows of length {}", count, dim);

    Array2::from_shape_vec((count, dim), rows)
        .map_err(|e| InitError::NumericalFailure(format!("basis assembly: {}", e)))
}

/// Endless sequence of `dim x dim` matrices with orthonormal rows.
///
/// Blocks are drawn on demand from the stream, so a consumer only pays for
/// the blocks it actually takes.
pub struct OrthonormalBlocks<'a> {
    dim: usize,
    stream: &'a mut RandomStream,
}

impl<'a> OrthonormalBlocks<'a> {
    pub fn new(dim: usize, stream: &'a mut RandomStream) -> Self {
        OrthonormalBlocks { dim, stream }
    }
}

impl Iterator for OrthonormalBlocks<'_> {
    type Item = InitResult<A2>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(orthonormal_block(self.dim, self.stream))
    }
}

fn orthonormal_block(dim: usize, stream: &mut RandomStream) -> InitResult<A2> {
    let a = symmetrize(&stream.standard_normal((dim, dim)));
    let svd = decompose(to_matrix(&a), true, false)?;
    let u = svd
        .u
        .ok_or_else(|| InitError::NumericalFailure("SVD returned no left singular vectors".into()))?;
    // Left singular vectors are the columns of U; hand them out as rows.
    Ok(Array2::from_shape_fn((dim, dim), |(i, j)| u[(j, i)]))
}

// A + Aᵗ - diag(diag(A)): the diagonal is kept once, the off-diagonal
// entries are summed with their mirror (not averaged).
pub fn symmetrize(a: &A2) -> A2 {
    let mut sym = a + &a.t();
    let mut diag = sym.diag_mut();
    diag -= &a.diag();
    sym
}

pub(crate) fn to_matrix(a: &A2) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn decompose(
    matrix: DMatrix<f64>,
    compute_u: bool,
    compute_v: bool,
) -> InitResult<SVD<f64, Dyn, Dyn>> {
    let (rows, cols) = matrix.shape();
    let max_iterations = SVD_ITERATIONS_PER_DIM * rows.max(cols);
    matrix
        .try_svd(compute_u, compute_v, f64::EPSILON, max_iterations)
        .ok_or_else(|| {
            InitError::NumericalFailure(format!(
                "SVD of a {}x{} matrix did not converge after {} iterations",
                rows, cols, max_iterations
            ))
        })
}
