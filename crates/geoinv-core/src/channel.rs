// ─────────────────────────────────────────────────────────────────────
// GeoInv — Observation Channels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Observed gravity and gravity-gradient channels.
//!
//! A [`ChannelSet`] is keyed by [`Component`]; iteration always follows the
//! declaration order gz, gxx, gxy, gxz, gyy, gyz, gzz. That order fixes the
//! row blocks of the sensitivity matrix, the data vector and the covariance.

use geoinv_types::constants::N_COMPONENTS;
use geoinv_types::error::{GeoInvError, GeoResult};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// Gravity field component. Variant order is the row-block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Gz,
    Gxx,
    Gxy,
    Gxz,
    Gyy,
    Gyz,
    Gzz,
}

impl Component {
    pub const ALL: [Component; N_COMPONENTS] = [
        Component::Gz,
        Component::Gxx,
        Component::Gxy,
        Component::Gxz,
        Component::Gyy,
        Component::Gyz,
        Component::Gzz,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::Gz => "gz",
            Component::Gxx => "gxx",
            Component::Gxy => "gxy",
            Component::Gxz => "gxz",
            Component::Gyy => "gyy",
            Component::Gyz => "gyz",
            Component::Gzz => "gzz",
        }
    }

    /// True for the six gradient tensor components (Eötvös), false for gz (mGal).
    pub fn is_tensor(&self) -> bool {
        !matches!(self, Component::Gz)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observations of one component: locations, values and 1σ uncertainties.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    locations: Vec<[f64; 3]>,
    values: Vec<f64>,
    stddev: Vec<f64>,
}

impl ObservationSet {
    /// Lengths must agree, entries must be finite and uncertainties positive.
    pub fn new(locations: Vec<[f64; 3]>, values: Vec<f64>, stddev: Vec<f64>) -> GeoResult<Self> {
        let m = locations.len();
        if values.len() != m {
            return Err(GeoInvError::ShapeMismatch {
                what: "observation values vs locations".to_string(),
                expected: m,
                actual: values.len(),
            });
        }
        if stddev.len() != m {
            return Err(GeoInvError::ShapeMismatch {
                what: "observation uncertainties vs locations".to_string(),
                expected: m,
                actual: stddev.len(),
            });
        }
        if m == 0 {
            return Err(GeoInvError::ConfigError(
                "observation set must contain at least one point".to_string(),
            ));
        }
        if locations.iter().flatten().any(|v| !v.is_finite()) {
            return Err(GeoInvError::ConfigError(
                "observation locations must be finite".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeoInvError::ConfigError(
                "observation values must be finite".to_string(),
            ));
        }
        if let Some(bad) = stddev.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(GeoInvError::ConfigError(format!(
                "observation uncertainties must be finite and > 0, got {bad}"
            )));
        }
        Ok(ObservationSet {
            locations,
            values,
            stddev,
        })
    }

    /// Same uncertainty for every point.
    pub fn with_uniform_stddev(
        locations: Vec<[f64; 3]>,
        values: Vec<f64>,
        stddev: f64,
    ) -> GeoResult<Self> {
        let n = locations.len();
        Self::new(locations, values, vec![stddev; n])
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn location(&self, i: usize) -> Option<[f64; 3]> {
        self.locations.get(i).copied()
    }

    pub fn locations(&self) -> &[[f64; 3]] {
        &self.locations
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn stddev(&self) -> &[f64] {
        &self.stddev
    }

    /// Copy with every sequence permuted in lockstep: entry `i` of the result
    /// is entry `order[i]` of `self`.
    pub fn permuted(&self, order: &[usize]) -> GeoResult<Self> {
        if order.len() != self.len() {
            return Err(GeoInvError::ShapeMismatch {
                what: "permutation length".to_string(),
                expected: self.len(),
                actual: order.len(),
            });
        }
        let mut seen = vec![false; self.len()];
        for &idx in order {
            if idx >= self.len() || seen[idx] {
                return Err(GeoInvError::ConfigError(format!(
                    "order is not a permutation of 0..{} (entry {idx})",
                    self.len()
                )));
            }
            seen[idx] = true;
        }
        Ok(ObservationSet {
            locations: order.iter().map(|&i| self.locations[i]).collect(),
            values: order.iter().map(|&i| self.values[i]).collect(),
            stddev: order.iter().map(|&i| self.stddev[i]).collect(),
        })
    }
}

/// Present channels, keyed by component. Absent keys are not modeled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSet {
    channels: BTreeMap<Component, ObservationSet>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A component supplied twice keeps the last set.
    pub fn with(mut self, component: Component, observations: ObservationSet) -> Self {
        self.channels.insert(component, observations);
        self
    }

    pub fn insert(&mut self, component: Component, observations: ObservationSet) {
        self.channels.insert(component, observations);
    }

    pub fn get(&self, component: Component) -> Option<&ObservationSet> {
        self.channels.get(&component)
    }

    pub fn contains(&self, component: Component) -> bool {
        self.channels.contains_key(&component)
    }

    /// Present channels in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Component, &ObservationSet)> {
        self.channels.iter().map(|(c, obs)| (*c, obs))
    }

    pub fn components(&self) -> Vec<Component> {
        self.channels.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Total observation count M over present channels.
    pub fn n_data(&self) -> usize {
        self.channels.values().map(ObservationSet::len).sum()
    }

    /// Fails when no channel is present.
    pub fn validate(&self) -> GeoResult<()> {
        if self.channels.is_empty() {
            return Err(GeoInvError::ConfigError(
                "provide at least one of gz, gxx, gxy, gxz, gyy, gyz or gzz; \
                 cannot invert without data"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Row range of each channel in the stacked system.
    pub fn row_blocks(&self) -> Vec<(Component, Range<usize>)> {
        let mut start = 0;
        self.iter()
            .map(|(c, obs)| {
                let block = (c, start..start + obs.len());
                start += obs.len();
                block
            })
            .collect()
    }

    /// Flattened (component, location) list, one entry per stacked row.
    pub fn rows(&self) -> Vec<(Component, [f64; 3])> {
        let mut rows = Vec::with_capacity(self.n_data());
        for (c, obs) in self.iter() {
            rows.extend(obs.locations().iter().map(|&loc| (c, loc)));
        }
        rows
    }

    /// Split a length-M vector (e.g. predicted data) into per-channel slices.
    pub fn split_rows<'a>(&self, stacked: &'a [f64]) -> GeoResult<Vec<(Component, &'a [f64])>> {
        if stacked.len() != self.n_data() {
            return Err(GeoInvError::ShapeMismatch {
                what: "stacked data vector".to_string(),
                expected: self.n_data(),
                actual: stacked.len(),
            });
        }
        Ok(self
            .row_blocks()
            .into_iter()
            .map(|(c, range)| (c, &stacked[range]))
            .collect())
    }
}
