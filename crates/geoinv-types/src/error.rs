// ─────────────────────────────────────────────────────────────────────
// GeoInv — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoInvError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Kernel evaluation failed for {component}: {message}")]
    KernelEvaluation { component: String, message: String },

    #[error("Parameter index out of bounds: index={index}, parameters={parameters}")]
    IndexOutOfBounds { index: usize, parameters: usize },

    #[error("Linear algebra error: {0}")]
    LinAlg(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GeoResult<T> = Result<T, GeoInvError>;
