// ─────────────────────────────────────────────────────────────────────
// GeoInv — Gravity Inversion Facade
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! [`GravityInversion`] ties a model grid and a channel set to the
//! assemblers and hands the result to an [`InversionEngine`].

use crate::channel::{ChannelSet, Component};
use crate::data;
use crate::depth_weight;
use crate::engine::{InversionEngine, InversionEstimate, LinearProblem, Regularizer};
use crate::prism::{ForwardKernel, PrismKernel};
use crate::report::{AssemblyEvent, Reporter, TracingReporter};
use crate::sensitivity;
use crate::smoothness;
use geoinv_types::config::{InversionConfig, RegularizationConfig};
use geoinv_types::error::{GeoInvError, GeoResult};
use geoinv_types::grid::ModelGrid;
use ndarray::{Array1, Array2};
use std::sync::Arc;
use std::time::Instant;

/// 3D gravity inversion over a prism grid.
pub struct GravityInversion {
    grid: ModelGrid,
    channels: ChannelSet,
    reporter: Arc<dyn Reporter>,
}

impl GravityInversion {
    /// Build with the default `tracing` reporter. Fails if no channel is
    /// present.
    pub fn new(grid: ModelGrid, channels: ChannelSet) -> GeoResult<Self> {
        Self::new_with_reporter(grid, channels, Arc::new(TracingReporter))
    }

    pub fn new_with_reporter(
        grid: ModelGrid,
        channels: ChannelSet,
        reporter: Arc<dyn Reporter>,
    ) -> GeoResult<Self> {
        channels.validate()?;
        reporter.report(AssemblyEvent::Discretization {
            nx: grid.nx,
            ny: grid.ny,
            nz: grid.nz,
            parameters: grid.n_params(),
        });
        Ok(GravityInversion {
            grid,
            channels,
            reporter,
        })
    }

    /// Build the grid described by `config` and attach `channels`.
    pub fn from_config(config: &InversionConfig, channels: ChannelSet) -> GeoResult<Self> {
        Self::new(config.create_grid()?, channels)
    }

    pub fn grid(&self) -> &ModelGrid {
        &self.grid
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Dense M × P forward operator using the closed-form prism kernels.
    pub fn build_sensitivity(&self) -> GeoResult<Array2<f64>> {
        self.build_sensitivity_with(&PrismKernel)
    }

    pub fn build_sensitivity_with<K: ForwardKernel>(&self, kernel: &K) -> GeoResult<Array2<f64>> {
        sensitivity::build_sensitivity(&self.grid, &self.channels, kernel, self.reporter())
    }

    pub fn build_smoothness(&self) -> Array2<f64> {
        smoothness::build_smoothness(&self.grid, self.reporter())
    }

    pub fn build_depth_weights(&self, z0: f64, power: f64) -> GeoResult<Array2<f64>> {
        depth_weight::build_depth_weights(&self.grid, z0, power, self.reporter())
    }

    pub fn depth_weight_diagonal(&self, z0: f64, power: f64) -> GeoResult<Array1<f64>> {
        depth_weight::depth_weight_diagonal(&self.grid, z0, power, self.reporter())
    }

    pub fn data_vector(&self) -> GeoResult<Array1<f64>> {
        data::data_vector(&self.channels)
    }

    pub fn data_stddev(&self) -> GeoResult<Array1<f64>> {
        data::data_stddev(&self.channels)
    }

    pub fn data_covariance(&self) -> GeoResult<Array2<f64>> {
        data::data_covariance(&self.channels, self.reporter())
    }

    /// Assemble every matrix the engine needs. Regularizers with zero weight
    /// are left out.
    pub fn linear_problem(&self, regularization: &RegularizationConfig) -> GeoResult<LinearProblem> {
        check_weight("smoothness", regularization.smoothness)?;
        check_weight("damping", regularization.damping)?;
        if let Some(dw) = &regularization.depth_weighting {
            check_weight("depth weighting", dw.weight)?;
        }

        let sensitivity = self.build_sensitivity()?;
        let data = self.data_vector()?;
        let covariance = self.data_covariance()?;

        let mut regularizers = Vec::new();
        if regularization.smoothness > 0.0 {
            regularizers.push(Regularizer {
                name: "smoothness".to_string(),
                operator: self.build_smoothness(),
                weight: regularization.smoothness,
            });
        }
        if regularization.damping > 0.0 {
            regularizers.push(Regularizer {
                name: "damping".to_string(),
                operator: Array2::eye(self.grid.n_params()),
                weight: regularization.damping,
            });
        }
        if let Some(dw) = regularization.depth_weighting.filter(|dw| dw.weight > 0.0) {
            regularizers.push(Regularizer {
                name: "depth weights".to_string(),
                operator: self.build_depth_weights(dw.z0, dw.power)?,
                weight: dw.weight,
            });
        }

        let problem = LinearProblem {
            sensitivity,
            data,
            covariance,
            regularizers,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// Assemble and solve with `engine`.
    pub fn invert<E: InversionEngine>(
        &self,
        engine: &E,
        regularization: &RegularizationConfig,
    ) -> GeoResult<InversionEstimate> {
        let start = Instant::now();
        let problem = self.linear_problem(regularization)?;
        let estimate = engine.solve(&problem)?;
        if estimate.mean.len() != problem.n_params() {
            return Err(GeoInvError::ShapeMismatch {
                what: "engine mean".to_string(),
                expected: problem.n_params(),
                actual: estimate.mean.len(),
            });
        }
        self.reporter.report(AssemblyEvent::Solved {
            parameters: estimate.mean.len(),
            elapsed: start.elapsed(),
        });
        Ok(estimate)
    }

    /// Predicted data G·mean split back into channels.
    pub fn fitted_by_channel(
        &self,
        sensitivity: &Array2<f64>,
        estimate: &InversionEstimate,
    ) -> GeoResult<Vec<(Component, Vec<f64>)>> {
        let predicted = estimate.predicted(sensitivity)?;
        let stacked = predicted.to_vec();
        Ok(self
            .channels
            .split_rows(&stacked)?
            .into_iter()
            .map(|(c, rows)| (c, rows.to_vec()))
            .collect())
    }
}

fn check_weight(name: &str, weight: f64) -> GeoResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(GeoInvError::ConfigError(format!(
            "{name} weight must be finite and >= 0, got {weight}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ObservationSet;
    use crate::engine::TikhonovEngine;
    use crate::prism;
    use crate::report::RecordingReporter;
    use geoinv_types::config::DepthWeighting;

    fn cube_grid() -> ModelGrid {
        ModelGrid::new(0.0, 2.0, 0.0, 2.0, 0.0, 2.0, 2, 2, 2).unwrap()
    }

    fn single_gz() -> ChannelSet {
        ChannelSet::new().with(
            Component::Gz,
            ObservationSet::new(vec![[1.0, 1.0, -1.0]], vec![5.0], vec![0.1]).unwrap(),
        )
    }

    #[test]
    fn test_end_to_end_single_gz() {
        let inv = GravityInversion::new_with_reporter(
            cube_grid(),
            single_gz(),
            Arc::new(RecordingReporter::new()),
        )
        .unwrap();

        let g = inv.build_sensitivity().unwrap();
        assert_eq!(g.dim(), (1, 8));
        assert!(g.iter().all(|v| v.is_finite() && *v > 0.0));
        // Upper layer dominates the lower one.
        for p in 0..4 {
            assert!(g[[0, p]] > g[[0, p + 4]]);
        }

        assert_eq!(inv.data_vector().unwrap().to_vec(), vec![5.0]);
        let cov = inv.data_covariance().unwrap();
        assert_eq!(cov.dim(), (1, 1));
        assert!((cov[[0, 0]] - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_no_channels_is_config_error() {
        let result = GravityInversion::new(cube_grid(), ChannelSet::new());
        assert!(matches!(result, Err(GeoInvError::ConfigError(_))));
    }

    #[test]
    fn test_construction_reports_discretization() {
        let rec = Arc::new(RecordingReporter::new());
        GravityInversion::new_with_reporter(cube_grid(), single_gz(), rec.clone()).unwrap();
        assert_eq!(
            rec.events(),
            vec![AssemblyEvent::Discretization {
                nx: 2,
                ny: 2,
                nz: 2,
                parameters: 8
            }]
        );
    }

    #[test]
    fn test_from_config() {
        let config: InversionConfig = serde_json::from_str(
            r#"{
                "name": "cube",
                "grid": {
                    "bounds": { "x1": 0.0, "x2": 2.0, "y1": 0.0, "y2": 2.0, "z1": 0.0, "z2": 2.0 },
                    "cells": [2, 2, 2]
                }
            }"#,
        )
        .unwrap();
        let inv = GravityInversion::from_config(&config, single_gz()).unwrap();
        assert_eq!(inv.grid(), &cube_grid());
        assert_eq!(inv.channels().n_data(), 1);
    }

    #[test]
    fn test_linear_problem_includes_weighted_regularizers() {
        let rec = Arc::new(RecordingReporter::new());
        let inv = GravityInversion::new_with_reporter(cube_grid(), single_gz(), rec.clone())
            .unwrap();
        let reg = RegularizationConfig {
            smoothness: 0.5,
            damping: 0.0,
            depth_weighting: Some(DepthWeighting {
                z0: 0.0,
                power: 3.0,
                weight: 2.0,
            }),
        };
        let problem = inv.linear_problem(&reg).unwrap();
        let names: Vec<&str> = problem.regularizers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["smoothness", "depth weights"]);
        assert_eq!(problem.regularizers[0].operator.dim(), (12, 8));
        assert_eq!(problem.regularizers[1].operator.dim(), (8, 8));
        assert_eq!(
            rec.built_matrices(),
            vec!["sensitivity", "data covariance", "smoothness", "depth weights"]
        );
    }

    #[test]
    fn test_negative_weight_rejected_before_assembly() {
        let rec = Arc::new(RecordingReporter::new());
        let inv = GravityInversion::new_with_reporter(cube_grid(), single_gz(), rec.clone())
            .unwrap();
        let reg = RegularizationConfig {
            damping: -1.0,
            ..RegularizationConfig::default()
        };
        assert!(matches!(
            inv.linear_problem(&reg),
            Err(GeoInvError::ConfigError(_))
        ));
        assert!(rec.built_matrices().is_empty());
    }

    #[test]
    fn test_invert_recovers_block_model() {
        // 2×1×1 grid observed from many stations, strong data weight.
        let grid = ModelGrid::new(0.0, 200.0, 0.0, 100.0, 0.0, 100.0, 2, 1, 1).unwrap();
        let truth = [300.0, -150.0];
        let locations: Vec<[f64; 3]> = (0..9).map(|i| [i as f64 * 25.0, 50.0, -10.0]).collect();
        let prisms = grid.prisms();
        let values: Vec<f64> = locations
            .iter()
            .map(|&loc| {
                prisms
                    .iter()
                    .zip(truth.iter())
                    .map(|(p, &rho)| prism::gz(rho, p, loc).unwrap())
                    .sum::<f64>()
            })
            .collect();
        let channels = ChannelSet::new().with(
            Component::Gz,
            ObservationSet::with_uniform_stddev(locations, values.clone(), 1e-4).unwrap(),
        );
        let rec = Arc::new(RecordingReporter::new());
        let inv = GravityInversion::new_with_reporter(grid, channels, rec.clone()).unwrap();

        let reg = RegularizationConfig {
            damping: 1e-9,
            ..RegularizationConfig::default()
        };
        let est = inv.invert(&TikhonovEngine, &reg).unwrap();
        for (p, &rho) in truth.iter().enumerate() {
            assert!(
                (est.mean[p] - rho).abs() < 1e-3 * rho.abs(),
                "param {p}: {} vs {rho}",
                est.mean[p]
            );
            assert!(est.std[p] > 0.0);
        }
        assert!(rec
            .events()
            .iter()
            .any(|e| matches!(e, AssemblyEvent::Solved { parameters: 2, .. })));

        let g = inv.build_sensitivity().unwrap();
        let fitted = inv.fitted_by_channel(&g, &est).unwrap();
        assert_eq!(fitted.len(), 1);
        assert_eq!(fitted[0].0, Component::Gz);
        for (f, v) in fitted[0].1.iter().zip(values.iter()) {
            assert!((f - v).abs() < 1e-6, "{f} vs {v}");
        }
    }
}
