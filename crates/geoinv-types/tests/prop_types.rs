// ─────────────────────────────────────────────────────────────────────
// GeoInv — Property-Based Tests (proptest) for geoinv-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for geoinv-types using proptest.
//!
//! Covers: ModelGrid construction invariants, parameter index convention,
//! prism tiling, configuration serialization roundtrip.

use geoinv_types::config::{GridConfig, InversionConfig, ModelBounds, RegularizationConfig};
use geoinv_types::grid::ModelGrid;
use proptest::prelude::*;

// ── ModelGrid Construction Invariants ────────────────────────────────

proptest! {
    /// Parameter count and cell sizes match constructor arguments.
    #[test]
    fn grid_dimensions_match(
        nx in 1usize..20,
        ny in 1usize..20,
        nz in 1usize..20,
        x1 in -1000.0f64..1000.0,
        width in 1.0f64..5000.0,
    ) {
        let grid = ModelGrid::new(x1, x1 + width, 0.0, 100.0, 0.0, 50.0, nx, ny, nz).unwrap();

        prop_assert_eq!(grid.n_params(), nx * ny * nz);
        prop_assert!((grid.dx * nx as f64 - width).abs() < 1e-9 * width);
        prop_assert!((grid.dy * ny as f64 - 100.0).abs() < 1e-9);
        prop_assert!((grid.dz * nz as f64 - 50.0).abs() < 1e-9);
    }

    /// index() is a bijection onto 0..P and cell() inverts it.
    #[test]
    fn index_is_bijective(
        nx in 1usize..8,
        ny in 1usize..8,
        nz in 1usize..8,
    ) {
        let grid = ModelGrid::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, nx, ny, nz).unwrap();
        let mut seen = vec![false; grid.n_params()];
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let idx = grid.index(i, j, k);
                    prop_assert!(idx < grid.n_params());
                    prop_assert!(!seen[idx], "index {} produced twice", idx);
                    seen[idx] = true;
                    prop_assert_eq!(grid.cell(idx).unwrap(), (i, j, k));
                }
            }
        }
        prop_assert!(seen.iter().all(|&s| s));
    }

    /// Prism volumes add up to the model box volume.
    #[test]
    fn prisms_tile_the_box(
        nx in 1usize..6,
        ny in 1usize..6,
        nz in 1usize..6,
        depth in 10.0f64..1000.0,
    ) {
        let grid = ModelGrid::new(-50.0, 50.0, 0.0, 80.0, 0.0, depth, nx, ny, nz).unwrap();
        let total: f64 = grid.prisms().iter().map(|p| p.volume()).sum();
        let expected = 100.0 * 80.0 * depth;
        prop_assert!((total - expected).abs() < 1e-9 * expected,
            "tiled volume {} != box volume {}", total, expected);
        for p in grid.prisms() {
            prop_assert!(p.is_valid());
        }
    }

    /// Inverted bounds are always rejected.
    #[test]
    fn inverted_bounds_rejected(lo in -100.0f64..100.0, gap in 0.0f64..50.0) {
        prop_assert!(ModelGrid::new(lo + gap, lo, 0.0, 1.0, 0.0, 1.0, 1, 1, 1).is_err());
        prop_assert!(ModelGrid::new(0.0, 1.0, lo + gap, lo, 0.0, 1.0, 1, 1, 1).is_err());
        prop_assert!(ModelGrid::new(0.0, 1.0, 0.0, 1.0, lo + gap, lo, 1, 1, 1).is_err());
    }
}

// ── Configuration Roundtrip ──────────────────────────────────────────

proptest! {
    /// JSON serialization preserves every field.
    #[test]
    fn config_json_roundtrip(
        nx in 1usize..50,
        smoothness in 0.0f64..10.0,
        damping in 0.0f64..10.0,
    ) {
        let cfg = InversionConfig {
            name: "prop".to_string(),
            grid: GridConfig {
                bounds: ModelBounds { x1: 0.0, x2: 1.0, y1: 0.0, y2: 2.0, z1: 0.0, z2: 3.0 },
                cells: [nx, 2, 3],
            },
            regularization: RegularizationConfig {
                smoothness,
                damping,
                depth_weighting: None,
            },
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: InversionConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, cfg);
    }
}
