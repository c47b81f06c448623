//! Mapping between linear cell indices, grid coordinates and world space.

#![allow(clippy::cast_possible_truncation)]

use glam::{DVec3, UVec3};

use crate::config::GridConfig;
use crate::tables::{CORNER_COUNT, CORNER_OFFSETS};

/// Grid coordinates `(i, j, k)` of linear cell `n` in an `r³` grid.
///
/// `i` varies fastest: `n = i + j·r + k·r²`.
#[inline]
pub fn cell_coords(n: usize, resolution: u32) -> UVec3 {
    let r = resolution as usize;
    UVec3::new((n % r) as u32, ((n / r) % r) as u32, (n / (r * r)) as u32)
}

/// Inverse of [`cell_coords`].
#[inline]
pub fn linear_index(coords: UVec3, resolution: u32) -> usize {
    let r = resolution as usize;
    coords.x as usize + coords.y as usize * r + coords.z as usize * r * r
}

/// Lattice nodes at the 8 corners of the cell at `coords`, in table order.
#[inline]
pub fn corner_nodes(coords: UVec3) -> [UVec3; CORNER_COUNT] {
    CORNER_OFFSETS.map(|offset| coords + UVec3::from_array(offset))
}

/// World-space geometry of a regular sampling grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin: DVec3,
    cell_size: DVec3,
    resolution: u32,
}

impl Grid {
    /// Creates a grid of `resolution³` cells spanning `min..max`.
    pub fn new(min: DVec3, max: DVec3, resolution: u32) -> Self {
        Self {
            origin: min,
            cell_size: (max - min) / f64::from(resolution),
            resolution,
        }
    }

    /// Creates the grid described by a configuration.
    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.domain_min, config.domain_max, config.resolution)
    }

    /// Minimum corner of the domain.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Size of one cell along each axis.
    pub fn cell_size(&self) -> DVec3 {
        self.cell_size
    }

    /// Cells per axis.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// World position of a lattice node.
    ///
    /// Shared corners of neighbouring cells map to the same node and therefore
    /// to bit-identical positions.
    #[inline]
    pub fn lattice_point(&self, node: UVec3) -> DVec3 {
        self.origin + node.as_dvec3() * self.cell_size
    }

    /// Minimum corner of linear cell `n`.
    pub fn cell_origin(&self, n: usize) -> DVec3 {
        self.lattice_point(cell_coords(n, self.resolution))
    }

    /// The 8 corner positions of linear cell `n`, in table order.
    pub fn cube_corners(&self, n: usize) -> [DVec3; CORNER_COUNT] {
        corner_nodes(cell_coords(n, self.resolution)).map(|node| self.lattice_point(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cell_coords_order() {
        assert_eq!(cell_coords(0, 4), UVec3::new(0, 0, 0));
        assert_eq!(cell_coords(1, 4), UVec3::new(1, 0, 0));
        assert_eq!(cell_coords(4, 4), UVec3::new(0, 1, 0));
        assert_eq!(cell_coords(16, 4), UVec3::new(0, 0, 1));
        assert_eq!(cell_coords(63, 4), UVec3::new(3, 3, 3));
    }

    #[test]
    fn test_round_trip_all_cells() {
        for r in 1..=6_u32 {
            for n in 0..(r as usize).pow(3) {
                assert_eq!(linear_index(cell_coords(n, r), r), n, "n={n} r={r}");
            }
        }
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = Grid::new(DVec3::ZERO, DVec3::splat(2.0), 1);
        assert_eq!(grid.cell_size(), DVec3::splat(2.0));
        let corners = grid.cube_corners(0);
        assert_eq!(corners[0], DVec3::ZERO);
        assert_eq!(corners[6], DVec3::splat(2.0));
    }

    #[test]
    fn test_cell_origin() {
        let grid = Grid::new(DVec3::new(-1.0, 0.0, 10.0), DVec3::new(1.0, 4.0, 12.0), 4);
        // n = 1 + 2*4 + 3*16
        let n = 57;
        assert_eq!(cell_coords(n, 4), UVec3::new(1, 2, 3));
        assert_eq!(grid.cell_origin(n), DVec3::new(-0.5, 2.0, 11.5));
    }

    #[test]
    fn test_corner_layout_matches_table() {
        let grid = Grid::new(DVec3::ZERO, DVec3::ONE, 1);
        let c = grid.cube_corners(0);
        assert_eq!(c[0], DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(c[1], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(c[2], DVec3::new(1.0, 0.0, 1.0));
        assert_eq!(c[3], DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(c[4], DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(c[5], DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(c[6], DVec3::new(1.0, 1.0, 1.0));
        assert_eq!(c[7], DVec3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_neighbours_share_corners_exactly() {
        let grid = Grid::new(DVec3::splat(-0.3), DVec3::splat(0.7), 7);
        let a = grid.cube_corners(linear_index(UVec3::new(2, 3, 4), 7));
        let b = grid.cube_corners(linear_index(UVec3::new(3, 3, 4), 7));
        // +x face of `a` is the -x face of `b`.
        assert_eq!(a[1], b[0]);
        assert_eq!(a[2], b[3]);
        assert_eq!(a[5], b[4]);
        assert_eq!(a[6], b[7]);
    }

    proptest! {
        #[test]
        fn prop_round_trip(r in 1_u32..64, seed in any::<usize>()) {
            let total = (r as usize).pow(3);
            let n = seed % total;
            let coords = cell_coords(n, r);
            prop_assert!(coords.max_element() < r);
            prop_assert_eq!(linear_index(coords, r), n);
        }
    }
}
