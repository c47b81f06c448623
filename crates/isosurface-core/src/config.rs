//! Extraction configuration.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{IsosurfaceError, Result};

/// Default iso-threshold.
pub const DEFAULT_ISO_THRESHOLD: f64 = 0.5;

/// Default number of cells per axis.
pub const DEFAULT_RESOLUTION: u32 = 64;

/// How the surface crossing point along a cube edge is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Always use the edge midpoint.
    #[default]
    Midpoint,
    /// Place the point where the linearly interpolated field equals the threshold.
    Linear,
}

impl InterpolationMode {
    /// Maps the boolean smoothing switch onto a mode.
    pub fn from_smoothing(smooth: bool) -> Self {
        if smooth {
            Self::Linear
        } else {
            Self::Midpoint
        }
    }

    /// Returns true for [`InterpolationMode::Linear`].
    pub fn is_smooth(self) -> bool {
        self == Self::Linear
    }
}

/// Optional memoization of field samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SampleCache {
    /// Every corner of every cube is sampled.
    #[default]
    Disabled,
    /// Each worker keeps a private cache keyed by lattice node.
    WorkerLocal,
}

/// Immutable description of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Minimum corner of the sampling domain.
    pub domain_min: DVec3,

    /// Maximum corner of the sampling domain.
    pub domain_max: DVec3,

    /// Cells per axis; the grid has `resolution³` cells.
    pub resolution: u32,

    /// Surface level. Corners with values below it are classified inside.
    pub iso_threshold: f64,

    /// Edge interpolation rule.
    pub interpolation: InterpolationMode,

    /// Requested number of workers, clamped to the cell count at run time.
    pub worker_count: usize,

    /// Field sample memoization.
    pub sample_cache: SampleCache,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            domain_min: DVec3::ZERO,
            domain_max: DVec3::ONE,
            resolution: DEFAULT_RESOLUTION,
            iso_threshold: DEFAULT_ISO_THRESHOLD,
            interpolation: InterpolationMode::default(),
            worker_count: default_worker_count(),
            sample_cache: SampleCache::default(),
        }
    }
}

/// Twice the available hardware concurrency, or 2 when it cannot be queried.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get) * 2
}

impl GridConfig {
    /// Creates a configuration for the given domain and resolution with default settings.
    pub fn new(domain_min: DVec3, domain_max: DVec3, resolution: u32) -> Self {
        Self {
            domain_min,
            domain_max,
            resolution,
            ..Self::default()
        }
    }

    /// Sets the sampling domain.
    pub fn with_domain(mut self, domain_min: DVec3, domain_max: DVec3) -> Self {
        self.domain_min = domain_min;
        self.domain_max = domain_max;
        self
    }

    /// Sets the number of cells per axis.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the iso-threshold.
    pub fn with_iso_threshold(mut self, iso_threshold: f64) -> Self {
        self.iso_threshold = iso_threshold;
        self
    }

    /// Sets the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Enables linear interpolation when `smooth` is true, midpoints otherwise.
    pub fn with_smoothing(self, smooth: bool) -> Self {
        self.with_interpolation(InterpolationMode::from_smoothing(smooth))
    }

    /// Sets the requested worker count.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Sets the sample cache policy.
    pub fn with_sample_cache(mut self, sample_cache: SampleCache) -> Self {
        self.sample_cache = sample_cache;
        self
    }

    /// Size of one cell along each axis.
    pub fn cell_size(&self) -> DVec3 {
        (self.domain_max - self.domain_min) / f64::from(self.resolution)
    }

    /// Total number of cells, `resolution³`.
    pub fn total_cells(&self) -> Result<usize> {
        usize::try_from(self.resolution)
            .ok()
            .and_then(|r| r.checked_pow(3))
            .ok_or(IsosurfaceError::TooManyCells {
                resolution: self.resolution,
            })
    }

    /// Worker count after clamping to the number of cells.
    pub fn effective_workers(&self) -> Result<usize> {
        Ok(self.worker_count.min(self.total_cells()?))
    }

    /// Checks the configuration before any extraction work starts.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(IsosurfaceError::ZeroResolution);
        }
        for (axis, min, max) in [
            ('x', self.domain_min.x, self.domain_max.x),
            ('y', self.domain_min.y, self.domain_max.y),
            ('z', self.domain_min.z, self.domain_max.z),
        ] {
            let cell = (max - min) / f64::from(self.resolution);
            if !(min.is_finite() && max.is_finite() && cell.is_finite() && cell > 0.0) {
                return Err(IsosurfaceError::InvalidDomain { axis, min, max });
            }
        }
        if self.worker_count == 0 {
            return Err(IsosurfaceError::ZeroWorkers);
        }
        if !self.iso_threshold.is_finite() {
            return Err(IsosurfaceError::NonFiniteThreshold(self.iso_threshold));
        }
        self.total_cells()?;
        Ok(())
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
