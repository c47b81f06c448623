//! isosurface-rs: parallel marching cubes for arbitrary scalar fields.
//!
//! The extractor samples a caller-supplied [`ScalarField`] on a regular grid,
//! classifies each cell against an iso-threshold, and returns the surface as an
//! unindexed triangle soup.
//!
//! # Quick Start
//!
//! ```
//! use isosurface::*;
//!
//! fn main() -> Result<()> {
//!     let config = GridConfig::new(DVec3::ZERO, DVec3::ONE, 16)
//!         .with_iso_threshold(0.4)
//!         .with_smoothing(true);
//!
//!     let mesh = extract(&fields::Distance::new(DVec3::splat(0.5)), &config)?;
//!     assert!(!mesh.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! Closures work as fields too:
//!
//! ```
//! use isosurface::*;
//!
//! let config = GridConfig::default().with_resolution(8).with_iso_threshold(0.0);
//! let plane = extract(&|p: DVec3| p.z - 0.3, &config).unwrap();
//! assert!(plane.iter().all(|t| t.points.iter().all(|p| (p.z - 0.3).abs() < 0.2)));
//! ```

pub mod fields;

use std::time::Instant;

// Re-export core types
pub use isosurface_core::{
    assemble, cell_coords, classify, evaluate_cube, interpolate, linear_index, partition_cells,
    run, run_partitioned,
    config::{default_worker_count, DEFAULT_ISO_THRESHOLD, DEFAULT_RESOLUTION},
    tables, Cube, DVec3, Grid, GridConfig, InterpolationMode, IsosurfaceError, Mesh, Result,
    SampleCache, ScalarField, Triangle, UVec3,
};

/// Extracts the isosurface of `field` described by `config`.
///
/// The configuration is validated before any sampling happens. Any worker
/// failure fails the whole extraction.
pub fn extract<F>(field: &F, config: &GridConfig) -> Result<Mesh>
where
    F: ScalarField + ?Sized,
{
    let start = Instant::now();
    let triangles = run(field, config)?;
    log::info!(
        "extracted {} triangles from {}³ cells in {:.2?}",
        triangles.len(),
        config.resolution,
        start.elapsed()
    );
    Ok(Mesh::from_triangles(triangles))
}

/// Extracts using a JSON configuration.
pub fn extract_with_json<F>(field: &F, config_json: &str) -> Result<Mesh>
where
    F: ScalarField + ?Sized,
{
    let config = GridConfig::from_json(config_json)?;
    extract(field, &config)
}
