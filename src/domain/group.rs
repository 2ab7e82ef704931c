use chrono::NaiveDateTime;

use super::LocationSpec;
use crate::mesh::TriangulationMode;
use crate::sampling::{linspace, linspace_time};

/// Particle depth in meters, positive down
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Depth {
    Constant(f64),
    /// Linearly spaced from the first to the second value
    Range(f64, f64),
}

impl Depth {
    pub fn values(&self, n: usize) -> Vec<f64> {
        match *self {
            Depth::Constant(z) => vec![z; n],
            Depth::Range(min, max) => linspace(min, max, n),
        }
    }
}

/// When the particles of a group are released
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseTime {
    Instant(NaiveDateTime),
    /// Linearly spaced from start to stop, both inclusive
    Window {
        start: NaiveDateTime,
        stop: NaiveDateTime,
    },
}

impl ReleaseTime {
    pub fn values(&self, n: usize) -> Vec<NaiveDateTime> {
        match *self {
            ReleaseTime::Instant(t) => vec![t; n],
            ReleaseTime::Window { start, stop } => linspace_time(start, stop, n),
        }
    }
}

/// One block of particles sharing location, time and depth settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseGroup {
    pub location: LocationSpec,
    pub depth: Depth,
    pub release_time: ReleaseTime,
    pub num_particles: usize,
    pub group_id: i64,
    pub triangulation: TriangulationMode,
    /// Seed of the group's random stream
    pub seed: u64,
}

impl ReleaseGroup {
    pub fn new(location: LocationSpec, release_time: ReleaseTime, num_particles: usize) -> Self {
        Self {
            location,
            depth: Depth::Constant(0.0),
            release_time,
            num_particles,
            group_id: 0,
            triangulation: TriangulationMode::Auto,
            seed: 0,
        }
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_group_id(mut self, group_id: i64) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn with_triangulation(mut self, mode: TriangulationMode) -> Self {
        self.triangulation = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
