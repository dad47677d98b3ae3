// ─────────────────────────────────────────────────────────────────────
// GeoInv — Smoothness Operator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! First-difference operator over the prism grid.
//!
//! Three stacked blocks (x, then y, then z). Each row holds +1 at parameter
//! (i, j, k) and −1 at its +1 neighbour along the block's axis. Cells on the
//! far boundary of an axis get no row in that block; there is no wraparound.

use crate::report::{AssemblyEvent, Reporter};
use geoinv_types::grid::ModelGrid;
use ndarray::Array2;
use std::ops::Range;
use std::time::Instant;

/// Spatial axis of a difference block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAxis {
    X,
    Y,
    Z,
}

/// Rows in each block: [(nx−1)·ny·nz, nx·(ny−1)·nz, nx·ny·(nz−1)].
fn block_sizes(grid: &ModelGrid) -> [usize; 3] {
    let (nx, ny, nz) = (grid.nx, grid.ny, grid.nz);
    [
        (nx - 1) * ny * nz,
        nx * (ny - 1) * nz,
        nx * ny * (nz - 1),
    ]
}

/// Total row count of the smoothness operator.
pub fn smoothness_row_count(grid: &ModelGrid) -> usize {
    block_sizes(grid).iter().sum()
}

/// Row range of each axis block.
pub fn smoothness_blocks(grid: &ModelGrid) -> [(DiffAxis, Range<usize>); 3] {
    let [bx, by, bz] = block_sizes(grid);
    [
        (DiffAxis::X, 0..bx),
        (DiffAxis::Y, bx..bx + by),
        (DiffAxis::Z, bx + by..bx + by + bz),
    ]
}

/// Build the (rows × P) first-difference matrix.
///
/// Row indices come from (i, j, k) directly, so the layout is fixed:
///   x block: k·(nx−1)·ny + j·(nx−1) + i
///   y block: offset_y + k·nx·(ny−1) + j·nx + i
///   z block: offset_z + index(i, j, k)
pub fn build_smoothness(grid: &ModelGrid, reporter: &dyn Reporter) -> Array2<f64> {
    let start = Instant::now();
    let (nx, ny, nz) = (grid.nx, grid.ny, grid.nz);
    let n_params = grid.n_params();
    let [bx, by, _] = block_sizes(grid);
    let n_rows = smoothness_row_count(grid);

    let mut op = Array2::zeros((n_rows, n_params));

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx.saturating_sub(1) {
                let row = k * (nx - 1) * ny + j * (nx - 1) + i;
                let p = grid.index(i, j, k);
                op[[row, p]] = 1.0;
                op[[row, p + 1]] = -1.0;
            }
        }
    }

    let offset_y = bx;
    for k in 0..nz {
        for j in 0..ny.saturating_sub(1) {
            for i in 0..nx {
                let row = offset_y + k * nx * (ny - 1) + j * nx + i;
                let p = grid.index(i, j, k);
                op[[row, p]] = 1.0;
                op[[row, p + nx]] = -1.0;
            }
        }
    }

    let offset_z = bx + by;
    for k in 0..nz.saturating_sub(1) {
        for j in 0..ny {
            for i in 0..nx {
                let p = grid.index(i, j, k);
                op[[offset_z + p, p]] = 1.0;
                op[[offset_z + p, p + nx * ny]] = -1.0;
            }
        }
    }

    reporter.report(AssemblyEvent::MatrixBuilt {
        name: "smoothness",
        rows: n_rows,
        cols: n_params,
        elapsed: start.elapsed(),
    });
    op
}
