// Dense row kernels shared by the tableau pivot and the Gauss-Jordan solver.
//
// The strided variants follow the BLAS calling convention: `n` elements are
// touched, at offsets `0, inc, 2*inc, ...` of the given slice.

use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use crate::error::Error;

/// Pivots smaller than this are treated as zero by `lsolve`.
pub const SINGULAR_PIVOT: f64 = 1e-14;

/// `x[k * incx] *= alpha` for `k` in `0..n`.
pub fn scal(n: usize, alpha: f64, x: &mut [f64], incx: usize) {
    assert!(incx > 0, "scal: stride must be positive");
    if n == 0 {
        return;
    }
    assert!((n - 1) * incx < x.len(), "scal: slice too short");
    for v in x.iter_mut().step_by(incx).take(n) {
        *v *= alpha;
    }
}

/// `y[k * incy] += alpha * x[k * incx]` for `k` in `0..n`.
pub fn axpy(n: usize, alpha: f64, x: &[f64], incx: usize, y: &mut [f64], incy: usize) {
    assert!(incx > 0 && incy > 0, "axpy: strides must be positive");
    if n == 0 {
        return;
    }
    assert!((n - 1) * incx < x.len(), "axpy: source slice too short");
    assert!((n - 1) * incy < y.len(), "axpy: destination slice too short");
    let pairs = y.iter_mut().step_by(incy).zip(x.iter().step_by(incx));
    for (y_k, &x_k) in pairs.take(n) {
        *y_k += alpha * x_k;
    }
}

pub fn scale_row(row: &mut [f64], factor: f64) {
    scal(row.len(), factor, row, 1);
}

/// `dest += factor * src`
pub fn axpy_row(dest: &mut [f64], src: &[f64], factor: f64) {
    assert_eq!(dest.len(), src.len(), "axpy_row: rows differ in length");
    axpy(dest.len(), factor, src, 1, dest, 1);
}

// Column of row `i` with the largest magnitude, skipping columns that
// already hold a pivot.
fn select_major(row: &[f64], taken: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, v) in row.iter().enumerate() {
        if taken.contains(&j) {
            continue;
        }
        let magnitude = v.abs();
        match best {
            Some((_, m)) if magnitude <= m => {},
            _ => best = Some((j, magnitude)),
        }
    }
    best.map(|(j, _)| j)
}

/// Solves the square system `a x = b` by Gauss-Jordan elimination.
///
/// Row `i` is pivoted on its largest remaining entry, so the elimination
/// works on an augmented copy of `[a | b]` and `a` is left untouched.
pub fn lsolve(a: &Matrix<f64>, b: &Vector<f64>) -> Result<Vector<f64>, Error> {
    let n = a.rows();
    if a.cols() != n {
        return Err(Error::DimensionMismatch {
            context: "lsolve: columns of a square system",
            expected: n,
            found: a.cols(),
        });
    }
    if b.size() != n {
        return Err(Error::DimensionMismatch {
            context: "lsolve: right-hand side length",
            expected: n,
            found: b.size(),
        });
    }

    let ncol = n + 1;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(n * ncol)
        .map_err(|_| Error::MemoryAlloc)?;
    for (i, row) in a.row_iter().enumerate() {
        buffer.extend_from_slice(row.raw_slice());
        buffer.push(b[i]);
    }

    let mut pivots: Vec<usize> = Vec::with_capacity(n);
    let mut pivot_row = vec![0.0; ncol];
    for i in 0..n {
        let major = select_major(&buffer[i * ncol..i * ncol + n], &pivots)
            .ok_or(Error::Singular)?;
        let major_value = buffer[i * ncol + major];
        if major_value.abs() < SINGULAR_PIVOT {
            return Err(Error::Singular);
        }
        pivots.push(major);

        scale_row(&mut buffer[i * ncol..(i + 1) * ncol], 1.0 / major_value);
        pivot_row.copy_from_slice(&buffer[i * ncol..(i + 1) * ncol]);
        for j in (0..n).filter(|&j| j != i) {
            let row_j = &mut buffer[j * ncol..(j + 1) * ncol];
            let factor = row_j[major];
            if factor != 0.0 {
                axpy_row(row_j, &pivot_row, -factor);
            }
        }
    }

    let mut x = vec![0.0; n];
    for (i, &col) in pivots.iter().enumerate() {
        x[col] = buffer[i * ncol + n];
    }
    Ok(Vector::new(x))
}
