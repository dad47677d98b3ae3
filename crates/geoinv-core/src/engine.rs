// ─────────────────────────────────────────────────────────────────────
// GeoInv — Inversion Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Solver seam for the assembled linear problem.
//!
//! The assemblers only produce matrices. Anything that turns them into a
//! density model implements [`InversionEngine`]; [`TikhonovEngine`] is the
//! dense reference solver.

use geoinv_math::linalg::{
    add_scaled_gram, cholesky, cholesky_inverse_diagonal, cholesky_solve, weighted_gram,
};
use geoinv_types::error::{GeoInvError, GeoResult};
use ndarray::{Array1, Array2};

/// A weighted regularization operator R (rows × P).
#[derive(Debug, Clone)]
pub struct Regularizer {
    pub name: String,
    pub operator: Array2<f64>,
    pub weight: f64,
}

/// Everything an engine needs: G, d, C_d and the regularizers.
#[derive(Debug, Clone)]
pub struct LinearProblem {
    pub sensitivity: Array2<f64>,
    pub data: Array1<f64>,
    pub covariance: Array2<f64>,
    pub regularizers: Vec<Regularizer>,
}

impl LinearProblem {
    pub fn n_data(&self) -> usize {
        self.sensitivity.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.sensitivity.ncols()
    }

    /// Check every shape against (M, P) and every weight for sanity.
    pub fn validate(&self) -> GeoResult<()> {
        let (m, p) = self.sensitivity.dim();
        if m == 0 || p == 0 {
            return Err(GeoInvError::ConfigError(format!(
                "empty sensitivity matrix ({m}x{p})"
            )));
        }
        if self.data.len() != m {
            return Err(GeoInvError::ShapeMismatch {
                what: "data vector".to_string(),
                expected: m,
                actual: self.data.len(),
            });
        }
        for (what, actual) in [
            ("covariance rows", self.covariance.nrows()),
            ("covariance columns", self.covariance.ncols()),
        ] {
            if actual != m {
                return Err(GeoInvError::ShapeMismatch {
                    what: what.to_string(),
                    expected: m,
                    actual,
                });
            }
        }
        for reg in &self.regularizers {
            if reg.operator.ncols() != p {
                return Err(GeoInvError::ShapeMismatch {
                    what: format!("{} regularizer columns", reg.name),
                    expected: p,
                    actual: reg.operator.ncols(),
                });
            }
            if !reg.weight.is_finite() || reg.weight < 0.0 {
                return Err(GeoInvError::ConfigError(format!(
                    "{} regularizer weight must be finite and >= 0, got {}",
                    reg.name, reg.weight
                )));
            }
        }
        Ok(())
    }
}

/// Posterior mean and per-parameter standard deviation, both length P.
#[derive(Debug, Clone)]
pub struct InversionEstimate {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl InversionEstimate {
    /// Predicted data G·mean.
    pub fn predicted(&self, sensitivity: &Array2<f64>) -> GeoResult<Array1<f64>> {
        if sensitivity.ncols() != self.mean.len() {
            return Err(GeoInvError::ShapeMismatch {
                what: "sensitivity columns".to_string(),
                expected: self.mean.len(),
                actual: sensitivity.ncols(),
            });
        }
        Ok(sensitivity.dot(&self.mean))
    }
}

pub trait InversionEngine {
    fn solve(&self, problem: &LinearProblem) -> GeoResult<InversionEstimate>;
}

/// Dense regularized least squares.
///
///   N = Gᵀ C⁻¹ G + Σ wᵢ RᵢᵀRᵢ
///   mean = N⁻¹ Gᵀ C⁻¹ d,  std = √diag(N⁻¹)
///
/// The data covariance must be diagonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TikhonovEngine;

impl TikhonovEngine {
    fn inverse_variances(covariance: &Array2<f64>) -> GeoResult<Array1<f64>> {
        for ((i, j), &v) in covariance.indexed_iter() {
            if i != j && v != 0.0 {
                return Err(GeoInvError::LinAlg(format!(
                    "data covariance is not diagonal (entry [{i}, {j}] = {v})"
                )));
            }
        }
        covariance
            .diag()
            .iter()
            .map(|&var| {
                if var.is_finite() && var > 0.0 {
                    Ok(1.0 / var)
                } else {
                    Err(GeoInvError::LinAlg(format!(
                        "data variance must be finite and > 0, got {var}"
                    )))
                }
            })
            .collect::<GeoResult<Vec<f64>>>()
            .map(Array1::from_vec)
    }
}

impl InversionEngine for TikhonovEngine {
    fn solve(&self, problem: &LinearProblem) -> GeoResult<InversionEstimate> {
        problem.validate()?;
        let g = problem.sensitivity.view();
        let w = Self::inverse_variances(&problem.covariance)?;

        let mut normal = weighted_gram(&g, &w.view())?;
        for reg in &problem.regularizers {
            if reg.weight > 0.0 {
                add_scaled_gram(&mut normal, &reg.operator.view(), reg.weight)?;
            }
        }

        let weighted_data = &problem.data * &w;
        let rhs = g.t().dot(&weighted_data);

        let l = cholesky(&normal.view())?;
        let mean = cholesky_solve(&l.view(), &rhs.view())?;
        let std = cholesky_inverse_diagonal(&l.view()).mapv(f64::sqrt);
        Ok(InversionEstimate { mean, std })
    }
}
