// ─────────────────────────────────────────────────────────────────────
// GeoInv — Data Vector
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Stacked observations and their covariance.
//!
//! Row order matches the sensitivity matrix: channels in declaration order,
//! observations in stored order. Noise is independent per measurement, so the
//! covariance is diag(σ²).

use crate::channel::{ChannelSet, ObservationSet};
use crate::report::{AssemblyEvent, Reporter};
use geoinv_types::error::GeoResult;
use ndarray::{Array1, Array2};
use std::time::Instant;

fn stack<F>(channels: &ChannelSet, field: F) -> GeoResult<Array1<f64>>
where
    F: Fn(&ObservationSet) -> &[f64],
{
    channels.validate()?;
    let mut out = Vec::with_capacity(channels.n_data());
    for (_, obs) in channels.iter() {
        out.extend_from_slice(field(obs));
    }
    Ok(Array1::from_vec(out))
}

/// Observed values, length M.
pub fn data_vector(channels: &ChannelSet) -> GeoResult<Array1<f64>> {
    stack(channels, ObservationSet::values)
}

/// Observation uncertainties (1σ), length M.
pub fn data_stddev(channels: &ChannelSet) -> GeoResult<Array1<f64>> {
    stack(channels, ObservationSet::stddev)
}

/// Inverse variances 1/σ², length M.
pub fn data_weights(channels: &ChannelSet) -> GeoResult<Array1<f64>> {
    Ok(data_stddev(channels)?.mapv(|s| 1.0 / (s * s)))
}

/// Diagonal data covariance diag(σ²), M × M.
pub fn data_covariance(channels: &ChannelSet, reporter: &dyn Reporter) -> GeoResult<Array2<f64>> {
    let start = Instant::now();
    let variance = data_stddev(channels)?.mapv(|s| s * s);
    let cov = Array2::from_diag(&variance);
    reporter.report(AssemblyEvent::MatrixBuilt {
        name: "data covariance",
        rows: cov.nrows(),
        cols: cov.ncols(),
        elapsed: start.elapsed(),
    });
    Ok(cov)
}
