//! The scalar field capability sampled by the extractor.

use glam::DVec3;

use crate::error::Result;

/// A scalar function over 3D space.
///
/// Fields are shared read-only by every worker, so implementations must be `Sync`.
/// Any `Fn(DVec3) -> f64 + Sync` closure is a field; implement the trait directly
/// when evaluation can fail.
pub trait ScalarField: Sync {
    /// Evaluates the field at `point`.
    fn evaluate(&self, point: DVec3) -> Result<f64>;
}

impl<F> ScalarField for F
where
    F: Fn(DVec3) -> f64 + Sync,
{
    fn evaluate(&self, point: DVec3) -> Result<f64> {
        Ok(self(point))
    }
}
