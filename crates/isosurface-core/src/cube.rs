//! Classification and triangulation of a single grid cell.

use glam::DVec3;

use crate::config::InterpolationMode;
use crate::error::{IsosurfaceError, Result};
use crate::field::ScalarField;
use crate::interpolate::interpolate;
use crate::mesh::Triangle;
use crate::tables::{edge_corners, triangulation, CORNER_COUNT};

/// One sampled grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    /// Corner positions in table order.
    pub corners: [DVec3; CORNER_COUNT],
    /// Field value at each corner.
    pub values: [f64; CORNER_COUNT],
    /// Bit `c` is set when `values[c]` is below the threshold.
    pub mask: u8,
}

impl Cube {
    /// Builds a cube from already sampled corner values.
    pub fn from_values(corners: [DVec3; CORNER_COUNT], values: [f64; CORNER_COUNT], iso: f64) -> Self {
        Self {
            corners,
            values,
            mask: classify(&values, iso),
        }
    }

    /// Samples `field` at every corner and classifies the cube.
    pub fn sample<F>(field: &F, corners: [DVec3; CORNER_COUNT], iso: f64) -> Result<Self>
    where
        F: ScalarField + ?Sized,
    {
        let mut values = [0.0; CORNER_COUNT];
        for (value, &corner) in values.iter_mut().zip(&corners) {
            *value = sample_point(field, corner)?;
        }
        Ok(Self::from_values(corners, values, iso))
    }

    /// Returns true when all corners lie on the same side of the threshold.
    pub fn is_uniform(&self) -> bool {
        self.mask == 0 || self.mask == u8::MAX
    }

    /// Appends this cube's triangles to `out`, returning how many were added.
    pub fn triangulate_into(&self, iso: f64, mode: InterpolationMode, out: &mut Vec<Triangle>) -> usize {
        let edges = triangulation(self.mask);
        for face in edges.chunks_exact(3) {
            let [a, b, c] = [face[0], face[1], face[2]].map(|edge| self.edge_point(edge, iso, mode));
            out.push(Triangle::new(a, b, c));
        }
        edges.len() / 3
    }

    /// Returns this cube's triangles in table order.
    pub fn triangulate(&self, iso: f64, mode: InterpolationMode) -> Vec<Triangle> {
        let mut out = Vec::new();
        self.triangulate_into(iso, mode, &mut out);
        out
    }

    fn edge_point(&self, edge: u8, iso: f64, mode: InterpolationMode) -> DVec3 {
        let (a, b) = edge_corners(edge);
        interpolate(
            self.corners[a],
            self.corners[b],
            self.values[a],
            self.values[b],
            iso,
            mode,
        )
    }
}

/// Classification mask of 8 corner values against `iso`.
#[inline]
pub fn classify(values: &[f64; CORNER_COUNT], iso: f64) -> u8 {
    values
        .iter()
        .enumerate()
        .filter(|(_, &value)| value < iso)
        .fold(0, |mask, (corner, _)| mask | (1 << corner))
}

/// Evaluates `field` at `point`, rejecting non-finite results.
pub fn sample_point<F>(field: &F, point: DVec3) -> Result<f64>
where
    F: ScalarField + ?Sized,
{
    let value = field.evaluate(point)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IsosurfaceError::NonFiniteSample { point, value })
    }
}

/// Samples, classifies and triangulates one cube, producing 0 to 5 triangles.
pub fn evaluate_cube<F>(
    field: &F,
    corners: [DVec3; CORNER_COUNT],
    iso: f64,
    mode: InterpolationMode,
) -> Result<Vec<Triangle>>
where
    F: ScalarField + ?Sized,
{
    Ok(Cube::sample(field, corners, iso)?.triangulate(iso, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::tables::MAX_TRIANGLES_PER_CUBE;

    fn unit_corners() -> [DVec3; CORNER_COUNT] {
        Grid::new(DVec3::ZERO, DVec3::ONE, 1).cube_corners(0)
    }

    fn cube_with_mask(mask: u8) -> Cube {
        let mut values = [1.0; CORNER_COUNT];
        for (corner, value) in values.iter_mut().enumerate() {
            if mask & (1 << corner) != 0 {
                *value = 0.0;
            }
        }
        Cube::from_values(unit_corners(), values, 0.5)
    }

    #[test]
    fn test_classify_bits() {
        let values = [0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(classify(&values, 0.5), 0b1000_0101);
        // Equal to the threshold counts as outside.
        assert_eq!(classify(&[0.5; 8], 0.5), 0);
    }

    #[test]
    fn test_uniform_cubes_produce_nothing() {
        for mask in [0, 255] {
            let cube = cube_with_mask(mask);
            assert!(cube.is_uniform());
            assert!(cube.triangulate(0.5, InterpolationMode::Linear).is_empty());
        }
    }

    #[test]
    fn test_every_mask_reproduces_itself() {
        for mask in 0..=255_u8 {
            let cube = cube_with_mask(mask);
            assert_eq!(cube.mask, mask);
            let tris = cube.triangulate(0.5, InterpolationMode::Midpoint);
            assert!(tris.len() <= MAX_TRIANGLES_PER_CUBE);
            assert_eq!(tris.len() * 3, triangulation(mask).len());
            assert!(tris.iter().all(Triangle::is_finite));
        }
    }

    #[test]
    fn test_single_corner_triangle() {
        // Only corner 0 below the threshold: edges 0, 8, 3.
        let tris = cube_with_mask(0b0000_0001).triangulate(0.5, InterpolationMode::Midpoint);
        assert_eq!(tris.len(), 1);
        assert_eq!(
            tris[0].points,
            [
                DVec3::new(0.5, 0.0, 0.0),
                DVec3::new(0.0, 0.5, 0.0),
                DVec3::new(0.0, 0.0, 0.5),
            ]
        );
    }

    #[test]
    fn test_triangles_lie_on_crossed_edges() {
        let corners = unit_corners();
        let field = |p: DVec3| p.x + p.y + p.z;
        let cube = Cube::sample(&field, corners, 1.5).unwrap();
        assert!(!cube.is_uniform());
        for tri in cube.triangulate(1.5, InterpolationMode::Linear) {
            for p in tri.points {
                // The field is linear, so interpolated crossings are exact.
                assert!((field(p) - 1.5).abs() < 1e-12, "{p}");
            }
        }
    }

    #[test]
    fn test_triangulate_into_appends() {
        let cube = cube_with_mask(0b0000_0011);
        let mut out = cube.triangulate(0.5, InterpolationMode::Midpoint);
        let before = out.len();
        let added = cube.triangulate_into(0.5, InterpolationMode::Midpoint, &mut out);
        assert_eq!(added, before);
        assert_eq!(out.len(), before * 2);
    }

    #[test]
    fn test_evaluate_cube_with_plane() {
        let tris = evaluate_cube(&|p: DVec3| p.y, unit_corners(), 0.5, InterpolationMode::Linear).unwrap();
        // Plane y = 0.5 cuts the cube in two triangles.
        assert_eq!(tris.len(), 2);
        for tri in &tris {
            assert!(tri.points.iter().all(|p| (p.y - 0.5).abs() < 1e-12));
        }
    }

    #[test]
    fn test_non_finite_sample_is_error() {
        let err = evaluate_cube(&|_: DVec3| f64::NAN, unit_corners(), 0.5, InterpolationMode::Midpoint)
            .unwrap_err();
        assert!(matches!(err, IsosurfaceError::NonFiniteSample { .. }));
    }
}
