//! Edge crossing interpolation.

use glam::DVec3;

use crate::config::InterpolationMode;

/// Places the surface crossing on the edge `p1`-`p2`.
///
/// With [`InterpolationMode::Midpoint`] the result is always the midpoint. With
/// [`InterpolationMode::Linear`] the point sits where the linear estimate of the
/// field equals `iso`, using weights `w2 = (iso - v1) / (v2 - v1)` and
/// `w1 = 1 - w2`. Equal endpoint values leave the weights undefined, so that
/// case falls back to the midpoint. For `iso` far outside `v1..v2` the weighted
/// sum can overflow; the result then comes from `p1.lerp(p2, w2)`, or the
/// midpoint if that overflows too. Finite inputs always give a finite point.
#[inline]
pub fn interpolate(
    p1: DVec3,
    p2: DVec3,
    v1: f64,
    v2: f64,
    iso: f64,
    mode: InterpolationMode,
) -> DVec3 {
    match mode {
        InterpolationMode::Midpoint => midpoint(p1, p2),
        InterpolationMode::Linear => {
            let denom = v2 - v1;
            if denom == 0.0 {
                return midpoint(p1, p2);
            }
            let w2 = (iso - v1) / denom;
            if !w2.is_finite() {
                return midpoint(p1, p2);
            }
            let w1 = 1.0 - w2;
            let p = (p1 * w1 + p2 * w2) / (w1 + w2);
            if p.is_finite() {
                return p;
            }
            let p = p1.lerp(p2, w2);
            if p.is_finite() {
                p
            } else {
                midpoint(p1, p2)
            }
        }
    }
}

#[inline]
fn midpoint(p1: DVec3, p2: DVec3) -> DVec3 {
    (p1 + p2) * 0.5
}
