// ─────────────────────────────────────────────────────────────────────
// GeoInv — Depth Weighting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Li & Oldenburg (1996) depth weighting.
//!
//! Layer k with top boundary `depth = z1 + k·dz` gets
//!
//!   w_k = 1 / √(depth + dz/2 + z0)^power
//!
//! evaluated at the cell's vertical midpoint. Every cell of a layer shares
//! w_k and the diagonal is normalized so its maximum is exactly 1.

use crate::report::{AssemblyEvent, Reporter};
use geoinv_types::error::{GeoInvError, GeoResult};
use geoinv_types::grid::ModelGrid;
use ndarray::{Array1, Array2};
use std::time::Instant;

/// Unnormalized weight of each depth layer.
fn layer_weights(grid: &ModelGrid, z0: f64, power: f64) -> GeoResult<Vec<f64>> {
    if !z0.is_finite() || !power.is_finite() {
        return Err(GeoInvError::ConfigError(format!(
            "depth weighting needs finite z0 and power, got z0={z0}, power={power}"
        )));
    }

    grid.layer_tops()
        .iter()
        .map(|&depth| {
            let base = depth + 0.5 * grid.dz + z0;
            if base <= 0.0 {
                return Err(GeoInvError::ConfigError(format!(
                    "depth weighting undefined: depth {depth} + dz/2 + z0 = {base} must be > 0"
                )));
            }
            let w = 1.0 / base.sqrt().powf(power);
            if !w.is_finite() || w <= 0.0 {
                return Err(GeoInvError::ConfigError(format!(
                    "depth weight for layer at {depth} is not representable ({w})"
                )));
            }
            Ok(w)
        })
        .collect()
}

/// Normalized depth-weight diagonal, length P, in parameter order.
pub fn depth_weight_diagonal(
    grid: &ModelGrid,
    z0: f64,
    power: f64,
    reporter: &dyn Reporter,
) -> GeoResult<Array1<f64>> {
    let layers = layer_weights(grid, z0, power)?;
    reporter.report(AssemblyEvent::DepthWeights { z0, power });

    let layer_size = grid.nx * grid.ny;
    let mut diag = Array1::zeros(grid.n_params());
    for (k, &w) in layers.iter().enumerate() {
        diag.slice_mut(ndarray::s![k * layer_size..(k + 1) * layer_size])
            .fill(w);
    }

    let max = diag.fold(f64::MIN, |acc: f64, &v| acc.max(v));
    diag.mapv_inplace(|v| v / max);
    Ok(diag)
}

/// Diagonal depth-weight matrix (P × P).
pub fn build_depth_weights(
    grid: &ModelGrid,
    z0: f64,
    power: f64,
    reporter: &dyn Reporter,
) -> GeoResult<Array2<f64>> {
    let start = Instant::now();
    let diag = depth_weight_diagonal(grid, z0, power, reporter)?;
    let weights = Array2::from_diag(&diag);
    reporter.report(AssemblyEvent::MatrixBuilt {
        name: "depth weights",
        rows: weights.nrows(),
        cols: weights.ncols(),
        elapsed: start.elapsed(),
    });
    Ok(weights)
}
