// ─────────────────────────────────────────────────────────────────────
// GeoInv — Prism Kernels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gravitational field of a homogeneous right rectangular prism.
//!
//! Closed-form expressions of Nagy et al. (2000), z positive downward.
//! With X, Y, Z the corner coordinates relative to the observation point and
//! R = √(X² + Y² + Z²), each component is a signed sum over the 8 corners:
//!
//!   gz  = −Gρ ΣΣΣ s·[X ln(Y+R) + Y ln(X+R) − Z atan(XY / ZR)]
//!   gxx = −Gρ ΣΣΣ s·atan(YZ / XR)     gxy = Gρ ΣΣΣ s·ln(Z+R)
//!   gyy = −Gρ ΣΣΣ s·atan(XZ / YR)     gxz = Gρ ΣΣΣ s·ln(Y+R)
//!   gzz = −Gρ ΣΣΣ s·atan(XY / ZR)     gyz = Gρ ΣΣΣ s·ln(X+R)
//!
//! s = +1 at the upper corner and flips for every lower bound. gz is returned
//! in mGal, tensor components in Eötvös.
//!
//! A point exactly on a face, edge or corner is evaluated as the limit from
//! outside the prism, approached mainly from above. The off-diagonal
//! components diverge logarithmically on the edges along which their ln
//! terms run; such points are a `KernelEvaluation` error.

use crate::channel::Component;
use geoinv_types::constants::{G, SI2EOTVOS, SI2MGAL};
use geoinv_types::error::{GeoInvError, GeoResult};
use geoinv_types::grid::Prism;
use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

/// Response of a prism of given density at an observation point.
pub trait ForwardKernel: Sync {
    fn evaluate(
        &self,
        component: Component,
        density: f64,
        prism: &Prism,
        point: [f64; 3],
    ) -> GeoResult<f64>;
}

/// Closed-form prism kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrismKernel;

impl ForwardKernel for PrismKernel {
    fn evaluate(
        &self,
        component: Component,
        density: f64,
        prism: &Prism,
        point: [f64; 3],
    ) -> GeoResult<f64> {
        match component {
            Component::Gz => gz(density, prism, point),
            Component::Gxx => gxx(density, prism, point),
            Component::Gxy => gxy(density, prism, point),
            Component::Gxz => gxz(density, prism, point),
            Component::Gyy => gyy(density, prism, point),
            Component::Gyz => gyz(density, prism, point),
            Component::Gzz => gzz(density, prism, point),
        }
    }
}

fn kernel_error(component: Component, message: String) -> GeoInvError {
    GeoInvError::KernelEvaluation {
        component: component.name().to_string(),
        message,
    }
}

const RANK_Z: u32 = 1;
const RANK_X: u32 = 2;
const RANK_Y: u32 = 4;

/// Corner coordinate relative to the observation point.
///
/// An observation point lying exactly on a face plane has a zero offset
/// along that axis. The field is then the limit taken from outside the
/// prism: `side` is the sign the offset has just outside the face, and
/// `rank` orders how fast zero offsets vanish (z slowest, then x, then y).
/// A station on the top face or on a top edge is therefore seen from just
/// above.
#[derive(Debug, Clone, Copy)]
struct Offset {
    value: f64,
    side: f64,
    rank: u32,
}

impl Offset {
    fn new(value: f64, outside: f64, rank: u32) -> Self {
        if value == 0.0 {
            Offset {
                value,
                side: outside,
                rank,
            }
        } else {
            Offset {
                value,
                side: value.signum(),
                rank: 0,
            }
        }
    }
}

/// Offsets to the upper and lower bound along one axis. On the upper face
/// the outside lies beyond the bound (negative offset), on the lower face
/// before it.
fn axis_offsets(upper: f64, lower: f64, rank: u32) -> [Offset; 2] {
    [Offset::new(upper, -1.0, rank), Offset::new(lower, 1.0, rank)]
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    x: Offset,
    y: Offset,
    z: Offset,
    r: f64,
    /// Non-zero only when the point is the corner itself.
    r_rank: u32,
}

/// ln(x), with ln(0) taken as 0. Only used where the term's coefficient
/// vanishes together with the argument.
fn safe_ln(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.ln()
    }
}

/// atan(a·b / (c·R)) at a corner, with vanishing offsets resolved by their
/// rank: the faster-vanishing side of the ratio decides between 0 and ±π/2.
fn atan_ratio(a: Offset, b: Offset, c: Offset, corner: &Corner) -> f64 {
    match (a.rank + b.rank).cmp(&(c.rank + corner.r_rank)) {
        Ordering::Greater => 0.0,
        Ordering::Less => FRAC_PI_2 * a.side * b.side * c.side,
        Ordering::Equal => (a.value * b.value / (c.value * corner.r)).atan(),
    }
}

/// ln(a + R) for a corner coordinate a. For a < 0 the equivalent
/// ln(b² + c²) − ln(R − a) form avoids cancellation in a + R. The b² + c²
/// part is shared by the two corners that differ only in a, so it cancels in
/// the signed sum; on the extension of an edge line (b = c = 0) it is left
/// out instead of evaluating ln 0.
fn ln_plus_r(a: f64, b: f64, c: f64, r: f64) -> f64 {
    if a >= 0.0 {
        (a + r).ln()
    } else {
        let lateral = b * b + c * c;
        let shared = if lateral == 0.0 { 0.0 } else { lateral.ln() };
        shared - (r - a).ln()
    }
}

/// Axis (0 = x, 1 = y, 2 = z) of the edges on which a component's
/// ln(a + R) terms diverge.
fn log_singular_axis(component: Component) -> Option<usize> {
    match component {
        Component::Gxy => Some(2),
        Component::Gxz => Some(1),
        Component::Gyz => Some(0),
        _ => None,
    }
}

/// Whether `point` lies on a prism edge parallel to `axis`, end points
/// included.
fn on_edge(prism: &Prism, point: [f64; 3], axis: usize) -> bool {
    let bounds = [
        (prism.x1, prism.x2),
        (prism.y1, prism.y2),
        (prism.z1, prism.z2),
    ];
    bounds.iter().zip(point.iter()).enumerate().all(|(d, (&(lo, hi), &p))| {
        if d == axis {
            lo <= p && p <= hi
        } else {
            p == lo || p == hi
        }
    })
}

/// Signed corner sum of `f` after validating the geometry.
fn corner_sum<F>(component: Component, prism: &Prism, point: [f64; 3], f: F) -> GeoResult<f64>
where
    F: Fn(&Corner) -> f64,
{
    if !prism.is_valid() {
        return Err(kernel_error(
            component,
            format!("degenerate prism {prism:?}: every extent must be finite and > 0"),
        ));
    }
    if point.iter().any(|v| !v.is_finite()) {
        return Err(kernel_error(
            component,
            format!("observation point {point:?} is not finite"),
        ));
    }
    if let Some(axis) = log_singular_axis(component) {
        if on_edge(prism, point, axis) {
            return Err(kernel_error(
                component,
                format!("observation point {point:?} lies on a prism edge where {component} diverges"),
            ));
        }
    }

    let [xp, yp, zp] = point;
    let xs = axis_offsets(prism.x2 - xp, prism.x1 - xp, RANK_X);
    let ys = axis_offsets(prism.y2 - yp, prism.y1 - yp, RANK_Y);
    let zs = axis_offsets(prism.z2 - zp, prism.z1 - zp, RANK_Z);

    let mut total = 0.0;
    for (k, &z) in zs.iter().enumerate() {
        for (j, &y) in ys.iter().enumerate() {
            for (i, &x) in xs.iter().enumerate() {
                let r = (x.value * x.value + y.value * y.value + z.value * z.value).sqrt();
                let r_rank = if r == 0.0 {
                    x.rank.min(y.rank).min(z.rank)
                } else {
                    0
                };
                let corner = Corner { x, y, z, r, r_rank };
                let sign = if (i + j + k) % 2 == 0 { 1.0 } else { -1.0 };
                total += sign * f(&corner);
            }
        }
    }

    if !total.is_finite() {
        return Err(kernel_error(
            component,
            format!("non-finite response at {point:?}: point is singular for this prism"),
        ));
    }
    Ok(total)
}

fn check_density(component: Component, density: f64) -> GeoResult<()> {
    if !density.is_finite() {
        return Err(kernel_error(
            component,
            format!("density must be finite, got {density}"),
        ));
    }
    Ok(())
}

/// Vertical gravity (mGal).
pub fn gz(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gz, density)?;
    let sum = corner_sum(Component::Gz, prism, point, |c| {
        let (x, y, z) = (c.x.value, c.y.value, c.z.value);
        x * safe_ln(y + c.r) + y * safe_ln(x + c.r) - z * atan_ratio(c.x, c.y, c.z, c)
    })?;
    Ok(-G * SI2MGAL * density * sum)
}

/// xx gradient component (Eötvös).
pub fn gxx(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gxx, density)?;
    let sum = corner_sum(Component::Gxx, prism, point, |c| {
        atan_ratio(c.y, c.z, c.x, c)
    })?;
    Ok(-G * SI2EOTVOS * density * sum)
}

/// xy gradient component (Eötvös).
pub fn gxy(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gxy, density)?;
    let sum = corner_sum(Component::Gxy, prism, point, |c| {
        ln_plus_r(c.z.value, c.x.value, c.y.value, c.r)
    })?;
    Ok(G * SI2EOTVOS * density * sum)
}

/// xz gradient component (Eötvös).
pub fn gxz(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gxz, density)?;
    let sum = corner_sum(Component::Gxz, prism, point, |c| {
        ln_plus_r(c.y.value, c.x.value, c.z.value, c.r)
    })?;
    Ok(G * SI2EOTVOS * density * sum)
}

/// yy gradient component (Eötvös).
pub fn gyy(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gyy, density)?;
    let sum = corner_sum(Component::Gyy, prism, point, |c| {
        atan_ratio(c.x, c.z, c.y, c)
    })?;
    Ok(-G * SI2EOTVOS * density * sum)
}

/// yz gradient component (Eötvös).
pub fn gyz(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gyz, density)?;
    let sum = corner_sum(Component::Gyz, prism, point, |c| {
        ln_plus_r(c.x.value, c.y.value, c.z.value, c.r)
    })?;
    Ok(G * SI2EOTVOS * density * sum)
}

/// zz gradient component (Eötvös).
pub fn gzz(density: f64, prism: &Prism, point: [f64; 3]) -> GeoResult<f64> {
    check_density(Component::Gzz, density)?;
    let sum = corner_sum(Component::Gzz, prism, point, |c| {
        atan_ratio(c.x, c.y, c.z, c)
    })?;
    Ok(-G * SI2EOTVOS * density * sum)
}
