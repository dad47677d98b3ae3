// ─────────────────────────────────────────────────────────────────────
// GeoInv — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Gravitational constant (m³ kg⁻¹ s⁻²).
/// NOTE: kept at the value the prism kernels were validated against, not CODATA 2018.
pub const G: f64 = 6.673e-11;

/// Conversion from SI (m/s²) to mGal.
pub const SI2MGAL: f64 = 1.0e5;

/// Conversion from SI (1/s²) to Eötvös.
pub const SI2EOTVOS: f64 = 1.0e9;

/// Number of observable gravity field components (gz + 6 tensor components).
pub const N_COMPONENTS: usize = 7;
