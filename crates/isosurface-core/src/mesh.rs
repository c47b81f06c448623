//! Triangle soup output.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A single output triangle.
///
/// The point order defines the winding; the face normal follows the right-hand rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [DVec3; 3],
}

impl Triangle {
    /// Creates a triangle from three points in winding order.
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { points: [a, b, c] }
    }

    /// Unnormalized face normal `(b - a) × (c - a)`.
    pub fn cross(&self) -> DVec3 {
        let [a, b, c] = self.points;
        (b - a).cross(c - a)
    }

    /// Unit face normal, or `None` if the triangle has no area.
    pub fn normal(&self) -> Option<DVec3> {
        self.cross().try_normalize()
    }

    /// Surface area.
    pub fn area(&self) -> f64 {
        self.cross().length() * 0.5
    }

    /// Centroid of the three points.
    pub fn centroid(&self) -> DVec3 {
        let [a, b, c] = self.points;
        (a + b + c) / 3.0
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }
}

/// Unindexed triangle soup produced by an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Wraps an existing triangle list.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// The triangles in output order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the number of triangles in the mesh.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterates over the triangles.
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Axis-aligned bounds of all points, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let mut points = self.triangles.iter().flat_map(|t| t.points);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Total surface area.
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Consumes the mesh, returning the triangle list.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }
}

impl From<Vec<Triangle>> for Mesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self::from_triangles(triangles)
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

/// Concatenates per-worker triangle lists in worker order.
pub fn assemble(per_worker: Vec<Vec<Triangle>>) -> Vec<Triangle> {
    let total = per_worker.iter().map(Vec::len).sum();
    let mut triangles = Vec::with_capacity(total);
    for part in per_worker {
        triangles.extend(part);
    }
    triangles
}
