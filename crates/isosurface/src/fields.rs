//! Ready-made scalar fields.

use crate::{DVec3, Result, ScalarField};

/// Euclidean distance from a center point.
///
/// With the default threshold of 0.5 and the unit-cube domain, this yields the
/// sphere inscribed in the domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub center: DVec3,
}

impl Distance {
    pub fn new(center: DVec3) -> Self {
        Self { center }
    }
}

impl ScalarField for Distance {
    fn evaluate(&self, point: DVec3) -> Result<f64> {
        Ok(point.distance(self.center))
    }
}

/// Signed distance to a sphere: negative inside, positive outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ScalarField for Sphere {
    fn evaluate(&self, point: DVec3) -> Result<f64> {
        Ok(point.distance(self.center) - self.radius)
    }
}

/// Signed distance to an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub center: DVec3,
    pub half_extents: DVec3,
}

impl Cuboid {
    pub fn new(center: DVec3, half_extents: DVec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }
}

impl ScalarField for Cuboid {
    fn evaluate(&self, point: DVec3) -> Result<f64> {
        let q = (point - self.center).abs() - self.half_extents;
        Ok(q.max(DVec3::ZERO).length() + q.max_element().min(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let field = Distance::new(DVec3::splat(0.5));
        assert_eq!(field.evaluate(DVec3::splat(0.5)).unwrap(), 0.0);
        assert!((field.evaluate(DVec3::new(0.5, 0.5, 1.0)).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_sign() {
        let field = Sphere::new(DVec3::ZERO, 1.0);
        assert!(field.evaluate(DVec3::ZERO).unwrap() < 0.0);
        assert!(field.evaluate(DVec3::splat(2.0)).unwrap() > 0.0);
        assert!(field.evaluate(DVec3::X).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_cuboid() {
        let field = Cuboid::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(field.evaluate(DVec3::ZERO).unwrap(), -1.0);
        assert!((field.evaluate(DVec3::new(2.0, 0.0, 0.0)).unwrap() - 1.0).abs() < 1e-12);
    }
}
