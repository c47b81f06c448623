//! Core of isosurface-rs.
//!
//! This crate implements marching cubes over a regular grid:
//! - [`tables`]: the 256-case triangulation table and edge-to-corner table
//! - [`interpolate()`]: placement of the surface crossing on a cube edge
//! - [`Cube`]: classification and triangulation of one cell
//! - [`Grid`]: cell index to world-space mapping
//! - [`run`]: partitioning of the grid across a fixed pool of workers
//! - [`Mesh`]: the assembled triangle soup

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod cube;
pub mod error;
pub mod executor;
pub mod field;
pub mod grid;
pub mod interpolate;
pub mod mesh;
pub mod tables;

pub use config::{GridConfig, InterpolationMode, SampleCache};
pub use cube::{classify, evaluate_cube, Cube};
pub use error::{IsosurfaceError, Result};
pub use executor::{partition_cells, run, run_partitioned};
pub use field::ScalarField;
pub use grid::{cell_coords, linear_index, Grid};
pub use interpolate::interpolate;
pub use mesh::{assemble, Mesh, Triangle};

// Re-export glam types for convenience
pub use glam::{DVec3, UVec3};
