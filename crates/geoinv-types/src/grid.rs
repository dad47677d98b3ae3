// ─────────────────────────────────────────────────────────────────────
// GeoInv — Model Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Regular 3D discretization of the model volume into right rectangular prisms.
//!
//! Parameters are flattened z-major, then y, then x:
//!   index(i, j, k) = k·nx·ny + j·nx + i
//! Every assembled matrix uses this ordering for its columns.

use crate::error::{GeoInvError, GeoResult};
use ndarray::{Array1, Array3};

/// A right rectangular prism. z is positive downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prism {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub z1: f64,
    pub z2: f64,
}

impl Prism {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, z1: f64, z2: f64) -> Self {
        Prism {
            x1,
            x2,
            y1,
            y2,
            z1,
            z2,
        }
    }

    /// True when every extent is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let bounds = [self.x1, self.x2, self.y1, self.y2, self.z1, self.z2];
        bounds.iter().all(|v| v.is_finite())
            && self.x2 > self.x1
            && self.y2 > self.y1
            && self.z2 > self.z1
    }

    pub fn volume(&self) -> f64 {
        (self.x2 - self.x1) * (self.y2 - self.y1) * (self.z2 - self.z1)
    }

    pub fn center(&self) -> [f64; 3] {
        [
            0.5 * (self.x1 + self.x2),
            0.5 * (self.y1 + self.y2),
            0.5 * (self.z1 + self.z2),
        ]
    }
}

/// Prism grid over the box [x1,x2]×[y1,y2]×[z1,z2].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGrid {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub z1: f64,
    pub z2: f64,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

fn check_axis(name: &str, lo: f64, hi: f64, n: usize) -> GeoResult<()> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(GeoInvError::ConfigError(format!(
            "model bounds along {name} must be finite, got [{lo}, {hi}]"
        )));
    }
    if hi <= lo {
        return Err(GeoInvError::ConfigError(format!(
            "model bounds along {name} are inverted or empty: {name}1={lo} >= {name}2={hi}"
        )));
    }
    if n == 0 {
        return Err(GeoInvError::ConfigError(format!(
            "cell count n{name} must be >= 1"
        )));
    }
    Ok(())
}

impl ModelGrid {
    /// Build a validated grid. Inverted bounds or zero cell counts are
    /// configuration errors.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x1: f64,
        x2: f64,
        y1: f64,
        y2: f64,
        z1: f64,
        z2: f64,
        nx: usize,
        ny: usize,
        nz: usize,
    ) -> GeoResult<Self> {
        check_axis("x", x1, x2, nx)?;
        check_axis("y", y1, y2, ny)?;
        check_axis("z", z1, z2, nz)?;
        if nx.checked_mul(ny).and_then(|v| v.checked_mul(nz)).is_none() {
            return Err(GeoInvError::ConfigError(format!(
                "parameter count {nx}x{ny}x{nz} overflows usize"
            )));
        }

        let dx = (x2 - x1) / nx as f64;
        let dy = (y2 - y1) / ny as f64;
        let dz = (z2 - z1) / nz as f64;
        if dx <= 0.0 || dy <= 0.0 || dz <= 0.0 {
            return Err(GeoInvError::ConfigError(format!(
                "cell sizes underflowed to zero: dx={dx}, dy={dy}, dz={dz}"
            )));
        }

        Ok(ModelGrid {
            x1,
            x2,
            y1,
            y2,
            z1,
            z2,
            nx,
            ny,
            nz,
            dx,
            dy,
            dz,
        })
    }

    /// Number of model parameters P = nx·ny·nz.
    pub fn n_params(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.nx * self.ny + j * self.nx + i
    }

    /// Inverse of [`ModelGrid::index`].
    pub fn cell(&self, index: usize) -> GeoResult<(usize, usize, usize)> {
        if index >= self.n_params() {
            return Err(GeoInvError::IndexOutOfBounds {
                index,
                parameters: self.n_params(),
            });
        }
        let layer = self.nx * self.ny;
        let k = index / layer;
        let rem = index % layer;
        Ok((rem % self.nx, rem / self.nx, k))
    }

    /// Bounds of cell (i, j, k). The last cell along each axis ends exactly
    /// on the model boundary.
    pub fn prism(&self, i: usize, j: usize, k: usize) -> Prism {
        let edge = |lo: f64, hi: f64, d: f64, n: usize, idx: usize| {
            let a = lo + idx as f64 * d;
            let b = if idx + 1 == n { hi } else { lo + (idx + 1) as f64 * d };
            (a, b)
        };
        let (x1, x2) = edge(self.x1, self.x2, self.dx, self.nx, i);
        let (y1, y2) = edge(self.y1, self.y2, self.dy, self.ny, j);
        let (z1, z2) = edge(self.z1, self.z2, self.dz, self.nz, k);
        Prism::new(x1, x2, y1, y2, z1, z2)
    }

    /// All prisms in parameter order (z outer, y middle, x inner).
    pub fn prisms(&self) -> Vec<Prism> {
        let mut out = Vec::with_capacity(self.n_params());
        for k in 0..self.nz {
            for j in 0..self.ny {
                for i in 0..self.nx {
                    out.push(self.prism(i, j, k));
                }
            }
        }
        out
    }

    pub fn cell_center(&self, index: usize) -> GeoResult<[f64; 3]> {
        let (i, j, k) = self.cell(index)?;
        Ok(self.prism(i, j, k).center())
    }

    /// Top boundary of each depth layer: z1 + k·dz.
    pub fn layer_tops(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nz).map(|k| self.z1 + k as f64 * self.dz))
    }

    /// Reshape a parameter vector into layers `[nz, ny, nx]`.
    pub fn layers(&self, params: &[f64]) -> GeoResult<Array3<f64>> {
        if params.len() != self.n_params() {
            return Err(GeoInvError::ShapeMismatch {
                what: "parameter vector".to_string(),
                expected: self.n_params(),
                actual: params.len(),
            });
        }
        Array3::from_shape_vec((self.nz, self.ny, self.nx), params.to_vec())
            .map_err(|e| GeoInvError::LinAlg(format!("layer reshape failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cell_sizes() {
        let grid = ModelGrid::new(0.0, 10.0, -5.0, 5.0, 0.0, 3.0, 10, 5, 3).unwrap();
        assert_eq!(grid.n_params(), 150);
        assert!((grid.dx - 1.0).abs() < 1e-12);
        assert!((grid.dy - 2.0).abs() < 1e-12);
        assert!((grid.dz - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_convention_z_major() {
        let grid = ModelGrid::new(0.0, 3.0, 0.0, 2.0, 0.0, 4.0, 3, 2, 4).unwrap();
        assert_eq!(grid.index(0, 0, 0), 0);
        assert_eq!(grid.index(1, 0, 0), 1);
        assert_eq!(grid.index(0, 1, 0), 3);
        assert_eq!(grid.index(0, 0, 1), 6);
        assert_eq!(grid.index(2, 1, 3), 3 * 6 + 3 + 2);
    }

    #[test]
    fn test_cell_inverts_index() {
        let grid = ModelGrid::new(0.0, 3.0, 0.0, 2.0, 0.0, 4.0, 3, 2, 4).unwrap();
        for k in 0..4 {
            for j in 0..2 {
                for i in 0..3 {
                    assert_eq!(grid.cell(grid.index(i, j, k)).unwrap(), (i, j, k));
                }
            }
        }
        assert!(matches!(
            grid.cell(24),
            Err(GeoInvError::IndexOutOfBounds { index: 24, .. })
        ));
    }

    #[test]
    fn test_prisms_follow_parameter_order() {
        let grid = ModelGrid::new(0.0, 2.0, 0.0, 2.0, 0.0, 2.0, 2, 2, 2).unwrap();
        let prisms = grid.prisms();
        assert_eq!(prisms.len(), 8);
        assert_eq!(prisms[0], Prism::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0));
        assert_eq!(prisms[1], Prism::new(1.0, 2.0, 0.0, 1.0, 0.0, 1.0));
        assert_eq!(prisms[2], Prism::new(0.0, 1.0, 1.0, 2.0, 0.0, 1.0));
        assert_eq!(prisms[4], Prism::new(0.0, 1.0, 0.0, 1.0, 1.0, 2.0));
        assert_eq!(prisms[7], Prism::new(1.0, 2.0, 1.0, 2.0, 1.0, 2.0));
    }

    #[test]
    fn test_last_prism_ends_on_boundary() {
        let grid = ModelGrid::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 3, 7, 9).unwrap();
        let last = grid.prism(2, 6, 8);
        assert_eq!(last.x2, 1.0);
        assert_eq!(last.y2, 1.0);
        assert_eq!(last.z2, 1.0);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = ModelGrid::new(2.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1, 1, 1).unwrap_err();
        assert!(matches!(err, GeoInvError::ConfigError(_)));
        assert!(ModelGrid::new(0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1, 1, 1).is_err());
        assert!(ModelGrid::new(0.0, 1.0, 0.0, 1.0, 0.0, f64::NAN, 1, 1, 1).is_err());
    }

    #[test]
    fn test_zero_cell_count_rejected() {
        assert!(ModelGrid::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0, 1, 1).is_err());
        assert!(ModelGrid::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1, 0, 1).is_err());
        assert!(ModelGrid::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1, 1, 0).is_err());
    }

    #[test]
    fn test_layers_reshape() {
        let grid = ModelGrid::new(0.0, 2.0, 0.0, 3.0, 0.0, 2.0, 2, 3, 2).unwrap();
        let params: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let layers = grid.layers(&params).unwrap();
        assert_eq!(layers.shape(), &[2, 3, 2]);
        assert_eq!(layers[[1, 2, 1]], params[grid.index(1, 2, 1)]);
        assert!(grid.layers(&params[..5]).is_err());
    }

    #[test]
    fn test_layer_tops() {
        let grid = ModelGrid::new(0.0, 1.0, 0.0, 1.0, 100.0, 400.0, 1, 1, 3).unwrap();
        let tops = grid.layer_tops();
        assert_eq!(tops.len(), 3);
        assert!((tops[0] - 100.0).abs() < 1e-12);
        assert!((tops[2] - 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_prism_validity() {
        assert!(Prism::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0).is_valid());
        assert!(!Prism::new(0.0, 1.0, 0.0, 1.0, 1.0, 1.0).is_valid());
        assert!(!Prism::new(0.0, f64::INFINITY, 0.0, 1.0, 0.0, 1.0).is_valid());
        let c = Prism::new(0.0, 2.0, 0.0, 4.0, 1.0, 3.0).center();
        assert_eq!(c, [1.0, 2.0, 2.0]);
    }
}
