// ─────────────────────────────────────────────────────────────────────
// GeoInv — Sensitivity Matrix
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dense forward operator G (M × P).
//!
//! Row r is one (channel, observation) pair with channels stacked in
//! declaration order; column c is one prism in parameter order. Entry
//! G[r, c] is the unit-density response of prism c at observation r.

use crate::channel::ChannelSet;
use crate::prism::ForwardKernel;
use crate::report::{AssemblyEvent, Reporter};
use geoinv_types::error::{GeoInvError, GeoResult};
use geoinv_types::grid::ModelGrid;
use ndarray::Array2;
use rayon::prelude::*;
use std::time::Instant;

/// Density used for every column of the forward operator.
const UNIT_DENSITY: f64 = 1.0;

/// Build the sensitivity matrix with an arbitrary kernel.
///
/// Rows are independent; each worker fills one row of a pre-sized row-major
/// buffer, so the result does not depend on scheduling. The first kernel
/// failure aborts assembly and no matrix is returned.
pub fn build_sensitivity<K: ForwardKernel>(
    grid: &ModelGrid,
    channels: &ChannelSet,
    kernel: &K,
    reporter: &dyn Reporter,
) -> GeoResult<Array2<f64>> {
    channels.validate()?;
    let start = Instant::now();

    let prisms = grid.prisms();
    let rows = channels.rows();
    let n_params = prisms.len();
    let n_data = rows.len();
    if n_params == 0 {
        return Err(GeoInvError::ConfigError(
            "model grid has no parameters".to_string(),
        ));
    }

    let mut buffer = vec![0.0; n_data * n_params];
    buffer
        .par_chunks_mut(n_params)
        .zip(rows.par_iter())
        .try_for_each(|(row, &(component, location))| -> GeoResult<()> {
            for (cell, prism) in row.iter_mut().zip(prisms.iter()) {
                *cell = kernel.evaluate(component, UNIT_DENSITY, prism, location)?;
            }
            Ok(())
        })?;

    let sensitivity = Array2::from_shape_vec((n_data, n_params), buffer).map_err(|e| {
        GeoInvError::LinAlg(format!("sensitivity buffer reshape failed: {e}"))
    })?;

    reporter.report(AssemblyEvent::MatrixBuilt {
        name: "sensitivity",
        rows: n_data,
        cols: n_params,
        elapsed: start.elapsed(),
    });
    Ok(sensitivity)
}
