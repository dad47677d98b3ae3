// ─────────────────────────────────────────────────────────────────────
// GeoInv — Assembly Reporting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Progress reporting for the assemblers.
//!
//! Each assembler receives a `&dyn Reporter` explicitly. Installing a
//! `tracing` subscriber (and tearing it down) is left to the caller.

use std::sync::Mutex;
use std::time::Duration;

/// Events emitted while building the inverse problem.
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblyEvent {
    Discretization {
        nx: usize,
        ny: usize,
        nz: usize,
        parameters: usize,
    },
    MatrixBuilt {
        name: &'static str,
        rows: usize,
        cols: usize,
        elapsed: Duration,
    },
    DepthWeights {
        z0: f64,
        power: f64,
    },
    Solved {
        parameters: usize,
        elapsed: Duration,
    },
}

pub trait Reporter: Send + Sync {
    fn report(&self, event: AssemblyEvent);
}

/// Forwards events to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: AssemblyEvent) {
        match event {
            AssemblyEvent::Discretization {
                nx,
                ny,
                nz,
                parameters,
            } => {
                tracing::info!(nx, ny, nz, parameters, "model space discretization");
            }
            AssemblyEvent::MatrixBuilt {
                name,
                rows,
                cols,
                elapsed,
            } => {
                tracing::info!(
                    matrix = name,
                    rows,
                    cols,
                    elapsed_ms = elapsed.as_secs_f64() * 1e3,
                    "built matrix"
                );
            }
            AssemblyEvent::DepthWeights { z0, power } => {
                tracing::info!(z0, power, "building depth weights");
            }
            AssemblyEvent::Solved {
                parameters,
                elapsed,
            } => {
                tracing::info!(
                    parameters,
                    elapsed_ms = elapsed.as_secs_f64() * 1e3,
                    "inversion solved"
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: AssemblyEvent) {}
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<AssemblyEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AssemblyEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Names of the matrices built so far.
    pub fn built_matrices(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AssemblyEvent::MatrixBuilt { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: AssemblyEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
