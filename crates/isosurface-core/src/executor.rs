//! Parallel fan-out of cell ranges and fan-in of per-worker triangle lists.

use std::collections::HashMap;
use std::ops::Range;

use glam::UVec3;
use rayon::prelude::*;

use crate::config::{GridConfig, SampleCache};
use crate::cube::{sample_point, Cube};
use crate::error::Result;
use crate::field::ScalarField;
use crate::grid::{cell_coords, corner_nodes, Grid};
use crate::mesh::{assemble, Triangle};
use crate::tables::CORNER_COUNT;

/// Splits `0..total` into `workers` contiguous ranges of `ceil(total / workers)` cells.
///
/// The last ranges are truncated at `total`, so trailing ranges may be empty when
/// the division is uneven. Every index lands in exactly one range.
///
/// # Panics
/// Panics if `workers` is zero.
pub fn partition_cells(total: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "worker count must be at least 1");
    let chunk = total.div_ceil(workers);
    (0..workers)
        .map(|w| {
            let start = (w * chunk).min(total);
            let end = (start + chunk).min(total);
            start..end
        })
        .collect()
}

/// Per-worker state: the shared read-only inputs plus an optional private cache.
///
/// Cells are visited in ascending index order, so `k` never decreases. The cache
/// only holds nodes of layers `k` and `k + 1`, at most `2 (R + 1)²` entries.
struct Worker<'a, F: ScalarField + ?Sized> {
    field: &'a F,
    grid: Grid,
    iso: f64,
    config: &'a GridConfig,
    cache: Option<HashMap<UVec3, f64>>,
    layer: Option<u32>,
}

impl<'a, F: ScalarField + ?Sized> Worker<'a, F> {
    fn new(field: &'a F, config: &'a GridConfig) -> Self {
        let cache = match config.sample_cache {
            SampleCache::Disabled => None,
            SampleCache::WorkerLocal => Some(HashMap::new()),
        };
        Self {
            field,
            grid: Grid::from_config(config),
            iso: config.iso_threshold,
            config,
            cache,
            layer: None,
        }
    }

    /// Drops cached nodes below layer `k`; no later cell in the range reads them.
    fn evict_below(&mut self, k: u32) {
        if let Some(cache) = &mut self.cache {
            cache.retain(|node, _| node.z >= k);
        }
    }

    #[cfg(test)]
    fn cached_nodes(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }

    fn sample_node(&mut self, node: UVec3) -> Result<f64> {
        let point = self.grid.lattice_point(node);
        match &mut self.cache {
            None => sample_point(self.field, point),
            Some(cache) => {
                if let Some(&value) = cache.get(&node) {
                    return Ok(value);
                }
                let value = sample_point(self.field, point)?;
                cache.insert(node, value);
                Ok(value)
            }
        }
    }

    fn process(&mut self, cells: Range<usize>) -> Result<Vec<Triangle>> {
        let mut triangles = Vec::new();
        let resolution = self.grid.resolution();
        for n in cells.clone() {
            let coords = cell_coords(n, resolution);
            if self.layer.is_some_and(|k| coords.z > k) {
                self.evict_below(coords.z);
            }
            self.layer = Some(coords.z);
            let nodes = corner_nodes(coords);
            let mut values = [0.0; CORNER_COUNT];
            for (value, &node) in values.iter_mut().zip(&nodes) {
                *value = self.sample_node(node)?;
            }
            let corners = nodes.map(|node| self.grid.lattice_point(node));
            let cube = Cube::from_values(corners, values, self.iso);
            if !cube.is_uniform() {
                cube.triangulate_into(self.iso, self.config.interpolation, &mut triangles);
            }
        }
        log::debug!(
            "cells {}..{} produced {} triangles",
            cells.start,
            cells.end,
            triangles.len()
        );
        Ok(triangles)
    }
}

/// Runs every worker range and returns the per-worker triangle lists in range order.
///
/// Fails with the first worker error; no partial result is returned.
pub fn run_partitioned<F>(field: &F, config: &GridConfig) -> Result<Vec<Vec<Triangle>>>
where
    F: ScalarField + ?Sized,
{
    config.validate()?;
    let total = config.total_cells()?;
    let workers = config.effective_workers()?;
    if workers < config.worker_count {
        log::warn!(
            "requested {} workers but the grid has only {} cells; using {}",
            config.worker_count,
            total,
            workers
        );
    }

    let ranges = partition_cells(total, workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("isosurface-worker-{i}"))
        .build()?;

    pool.install(|| {
        ranges
            .into_par_iter()
            .with_max_len(1)
            .map(|cells| Worker::new(field, config).process(cells))
            .collect()
    })
}

/// Extracts the full triangle soup for `field` under `config`.
pub fn run<F>(field: &F, config: &GridConfig) -> Result<Vec<Triangle>>
where
    F: ScalarField + ?Sized,
{
    Ok(assemble(run_partitioned(field, config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsosurfaceError;
    use glam::DVec3;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn distance(p: DVec3) -> f64 {
        p.distance(DVec3::splat(0.5))
    }

    #[test]
    fn test_partition_even() {
        assert_eq!(partition_cells(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_partition_uneven() {
        assert_eq!(partition_cells(10, 4), vec![0..3, 3..6, 6..9, 9..10]);
        // ceil(9 / 4) = 3 leaves the last worker empty.
        assert_eq!(partition_cells(9, 4), vec![0..3, 3..6, 6..9, 9..9]);
    }

    #[test]
    fn test_partition_single_worker() {
        assert_eq!(partition_cells(27, 1), vec![0..27]);
    }

    #[test]
    #[should_panic(expected = "worker count")]
    fn test_partition_zero_workers() {
        let _ = partition_cells(8, 0);
    }

    proptest! {
        #[test]
        fn prop_partition_complete_and_exclusive(total in 1_usize..5000, workers in 1_usize..64) {
            let workers = workers.min(total);
            let ranges = partition_cells(total, workers);
            prop_assert_eq!(ranges.len(), workers);
            let mut next = 0;
            for range in &ranges {
                prop_assert_eq!(range.start, next);
                prop_assert!(range.start <= range.end);
                next = range.end;
            }
            prop_assert_eq!(next, total);
        }
    }

    #[test]
    fn test_sphere_produces_finite_triangles() {
        let config = GridConfig::default().with_resolution(8).with_worker_count(4);
        let tris = run(&distance, &config).unwrap();
        assert!(!tris.is_empty());
        assert!(tris.iter().all(Triangle::is_finite));
    }

    #[test]
    fn test_worker_count_does_not_change_cell_order() {
        let base = GridConfig::default().with_resolution(6).with_smoothing(true);
        let one = run(&distance, &base.clone().with_worker_count(1)).unwrap();
        let many = run(&distance, &base.with_worker_count(7)).unwrap();
        assert_eq!(one, many);
    }

    #[test]
    fn test_cache_does_not_change_output() {
        let base = GridConfig::default().with_resolution(7).with_worker_count(3);
        let plain = run(&distance, &base.clone()).unwrap();
        let cached = run(&distance, &base.with_sample_cache(SampleCache::WorkerLocal)).unwrap();
        assert_eq!(plain, cached);
    }

    #[test]
    fn test_cache_reduces_evaluations() {
        let calls = AtomicUsize::new(0);
        let field = |p: DVec3| {
            calls.fetch_add(1, Ordering::Relaxed);
            distance(p)
        };
        let base = GridConfig::default().with_resolution(4).with_worker_count(1);

        run(&field, &base.clone()).unwrap();
        assert_eq!(calls.swap(0, Ordering::Relaxed), 64 * 8);

        run(&field, &base.with_sample_cache(SampleCache::WorkerLocal)).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 5 * 5 * 5);
    }

    #[test]
    fn test_cache_stays_within_two_layers() {
        let resolution = 9_u32;
        let config = GridConfig::default()
            .with_resolution(resolution)
            .with_worker_count(1)
            .with_sample_cache(SampleCache::WorkerLocal);
        let layer = ((resolution + 1) * (resolution + 1)) as usize;
        let mut worker = Worker::new(&distance, &config);

        // Walk one layer at a time; after each the cache may hold layers k and k + 1 only.
        let per_layer = (resolution * resolution) as usize;
        for k in 0..resolution as usize {
            worker.process(k * per_layer..(k + 1) * per_layer).unwrap();
            assert!(worker.cached_nodes() <= 2 * layer, "layer {k}: {}", worker.cached_nodes());
        }
        assert_eq!(worker.cached_nodes(), 2 * layer);
    }

    #[test]
    fn test_cache_bounded_over_full_range() {
        let config = GridConfig::default()
            .with_resolution(8)
            .with_worker_count(1)
            .with_sample_cache(SampleCache::WorkerLocal);
        let mut worker = Worker::new(&distance, &config);
        worker.process(0..512).unwrap();
        // Without eviction this would be all 9³ = 729 nodes.
        assert_eq!(worker.cached_nodes(), 2 * 81);
    }

    #[test]
    fn test_more_workers_than_cells() {
        let config = GridConfig::default().with_resolution(1).with_worker_count(16);
        let parts = run_partitioned(&distance, &config).unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_invalid_config_does_not_sample() {
        let calls = AtomicUsize::new(0);
        let field = |p: DVec3| {
            calls.fetch_add(1, Ordering::Relaxed);
            distance(p)
        };
        let err = run(&field, &GridConfig::default().with_resolution(0)).unwrap_err();
        assert!(matches!(err, IsosurfaceError::ZeroResolution));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_failing_field_fails_run() {
        struct Faulty;
        impl ScalarField for Faulty {
            fn evaluate(&self, point: DVec3) -> Result<f64> {
                if point.z > 0.75 {
                    return Err(IsosurfaceError::field(point, "no data"));
                }
                Ok(distance(point))
            }
        }
        let config = GridConfig::default().with_resolution(8).with_worker_count(4);
        let err = run(&Faulty, &config).unwrap_err();
        assert!(matches!(err, IsosurfaceError::Field { .. }));
    }
}
