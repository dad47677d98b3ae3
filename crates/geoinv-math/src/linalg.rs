//! Linear algebra utilities.
//!
//! Dense Cholesky factorization, triangular solves and normal-equation
//! builders for regularized least squares.

use geoinv_types::error::{GeoInvError, GeoResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Pivot floor below which a matrix is treated as not positive definite.
const PIVOT_FLOOR: f64 = 1e-300;

/// Cholesky factorization A = L·Lᵀ of a symmetric positive-definite matrix.
///
/// Only the lower triangle of `a` is read. Returns the lower-triangular L.
pub fn cholesky(a: &ArrayView2<f64>) -> GeoResult<Array2<f64>> {
    let (n, m) = a.dim();
    if n != m {
        return Err(GeoInvError::LinAlg(format!(
            "cholesky requires a square matrix, got {n}x{m}"
        )));
    }

    let mut l: Array2<f64> = Array2::zeros((n, n));
    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if !diag.is_finite() || diag <= PIVOT_FLOOR {
            return Err(GeoInvError::LinAlg(format!(
                "matrix is not positive definite (pivot {j} = {diag:e})"
            )));
        }
        let ljj = diag.sqrt();
        l[[j, j]] = ljj;

        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / ljj;
        }
    }
    Ok(l)
}

/// Solve L·Lᵀ x = b given the Cholesky factor L.
pub fn cholesky_solve(l: &ArrayView2<f64>, b: &ArrayView1<f64>) -> GeoResult<Array1<f64>> {
    let n = l.nrows();
    if b.len() != n {
        return Err(GeoInvError::ShapeMismatch {
            what: "cholesky right-hand side".to_string(),
            expected: n,
            actual: b.len(),
        });
    }

    // Forward: L y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // Backward: Lᵀ x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }
    Ok(x)
}

/// Diagonal of A⁻¹ from the Cholesky factor of A.
///
/// Uses A⁻¹ = L⁻ᵀ L⁻¹, so diag(A⁻¹)_j = Σ_i (L⁻¹)_{ij}².
pub fn cholesky_inverse_diagonal(l: &ArrayView2<f64>) -> Array1<f64> {
    let n = l.nrows();
    let mut diag = Array1::zeros(n);

    // Column j of L⁻¹ by forward substitution on e_j.
    let mut col = Array1::zeros(n);
    for j in 0..n {
        col.fill(0.0);
        col[j] = 1.0 / l[[j, j]];
        for i in (j + 1)..n {
            let mut sum = 0.0;
            for k in j..i {
                sum -= l[[i, k]] * col[k];
            }
            col[i] = sum / l[[i, i]];
        }
        for i in j..n {
            diag[j] += col[i] * col[i];
        }
    }
    diag
}

/// Weighted normal matrix Gᵀ·diag(w)·G.
pub fn weighted_gram(g: &ArrayView2<f64>, w: &ArrayView1<f64>) -> GeoResult<Array2<f64>> {
    if w.len() != g.nrows() {
        return Err(GeoInvError::ShapeMismatch {
            what: "gram row weights".to_string(),
            expected: g.nrows(),
            actual: w.len(),
        });
    }
    let mut wg = g.to_owned();
    for (mut row, &wi) in wg.rows_mut().into_iter().zip(w.iter()) {
        row *= wi;
    }
    Ok(g.t().dot(&wg))
}

/// Accumulate `weight`·RᵀR into `n`.
pub fn add_scaled_gram(n: &mut Array2<f64>, r: &ArrayView2<f64>, weight: f64) -> GeoResult<()> {
    if r.ncols() != n.ncols() || n.nrows() != n.ncols() {
        return Err(GeoInvError::ShapeMismatch {
            what: "regularization operator columns".to_string(),
            expected: n.ncols(),
            actual: r.ncols(),
        });
    }
    if weight == 0.0 {
        return Ok(());
    }
    let rtr = r.t().dot(r);
    n.scaled_add(weight, &rtr);
    Ok(())
}
