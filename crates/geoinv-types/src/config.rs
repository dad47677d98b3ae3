// ─────────────────────────────────────────────────────────────────────
// GeoInv — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// Top-level inversion configuration (JSON).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InversionConfig {
    pub name: String,
    pub grid: GridConfig,
    #[serde(default)]
    pub regularization: RegularizationConfig,
}

/// Model box and discretization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    pub bounds: ModelBounds,
    /// Cell counts [nx, ny, nz].
    pub cells: [usize; 3],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelBounds {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub z1: f64,
    pub z2: f64,
}

/// Weights of the regularization operators handed to the inversion engine.
/// A zero weight drops the operator from the problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegularizationConfig {
    /// First-difference smoothness weight (default: 0.0)
    #[serde(default)]
    pub smoothness: f64,
    /// Identity (ridge) damping weight (default: 0.0)
    #[serde(default)]
    pub damping: f64,
    /// Optional Li & Oldenburg depth weighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_weighting: Option<DepthWeighting>,
}

impl Default for RegularizationConfig {
    fn default() -> Self {
        RegularizationConfig {
            smoothness: 0.0,
            damping: 0.0,
            depth_weighting: None,
        }
    }
}

/// Depth weighting parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DepthWeighting {
    /// Reference height z0 (default: 0.0)
    #[serde(default)]
    pub z0: f64,
    /// Kernel decay power (default: 3.0, gz decays as 1/z²)
    #[serde(default = "default_power")]
    pub power: f64,
    /// Regularization weight (default: 1.0)
    #[serde(default = "default_depth_weight")]
    pub weight: f64,
}

fn default_power() -> f64 {
    3.0
}
fn default_depth_weight() -> f64 {
    1.0
}

impl Default for DepthWeighting {
    fn default() -> Self {
        DepthWeighting {
            z0: 0.0,
            power: default_power(),
            weight: default_depth_weight(),
        }
    }
}

impl InversionConfig {
    /// Load from JSON file.
    pub fn from_file(path: &str) -> crate::error::GeoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Create a validated ModelGrid from this config's bounds and cell counts.
    pub fn create_grid(&self) -> crate::error::GeoResult<crate::grid::ModelGrid> {
        let b = &self.grid.bounds;
        let [nx, ny, nz] = self.grid.cells;
        crate::grid::ModelGrid::new(b.x1, b.x2, b.y1, b.y2, b.z1, b.z2, nx, ny, nz)
    }
}
