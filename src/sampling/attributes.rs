//! Per-particle attribute columns: release time, depth and sinking velocity

use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;
use rand_chacha::ChaChaRng;

use super::spline::{QuadraticSpline, SplineError};

/// Cumulative probabilities of the reference sinking velocity distribution
pub const SINK_VEL_CUMPROB: [f64; 7] = [0.000, 0.662, 0.851, 0.883, 0.909, 0.937, 1.0];
/// Sinking velocities (m/s) at the cumulative probabilities above
pub const SINK_VEL_TABLE: [f64; 7] = [0.100, 0.050, 0.025, 0.015, 0.010, 0.005, 0.0];

/// `n` evenly spaced values from `start` to `stop`, both inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// `n` evenly spaced timestamps from `start` to `stop` at millisecond resolution
///
/// Offsets are truncated to whole milliseconds, so every value lies within
/// the window.
pub fn linspace_time(start: NaiveDateTime, stop: NaiveDateTime, n: usize) -> Vec<NaiveDateTime> {
    let span_ms = (stop - start).num_milliseconds() as f64;
    linspace(0.0, 1.0, n)
        .into_iter()
        .map(|frac| start + TimeDelta::milliseconds((frac * span_ms) as i64))
        .collect()
}

/// Inverse-CDF sampler for particle sinking velocities
#[derive(Debug, Clone)]
pub struct SinkVelocitySampler {
    inverse_cdf: QuadraticSpline,
}

impl SinkVelocitySampler {
    /// Build from a table of (cumulative probability, velocity) control points
    pub fn from_table(cumprob: &[f64], velocity: &[f64]) -> Result<Self, SplineError> {
        Ok(Self {
            inverse_cdf: QuadraticSpline::fit(cumprob, velocity)?,
        })
    }

    /// Sampler for the reference distribution ([`SINK_VEL_CUMPROB`], [`SINK_VEL_TABLE`])
    pub fn reference() -> Self {
        // The reference table is strictly increasing and well-conditioned
        Self::from_table(&SINK_VEL_CUMPROB, &SINK_VEL_TABLE)
            .expect("reference sinking velocity table is valid")
    }

    /// Velocity at cumulative probability `p`
    pub fn velocity_at(&self, p: f64) -> f64 {
        self.inverse_cdf.eval(p)
    }

    /// Draw `n` velocities from the random stream
    pub fn sample(&self, n: usize, rng: &mut ChaChaRng) -> Vec<f64> {
        (0..n)
            .map(|_| self.velocity_at(rng.random::<f64>()))
            .collect()
    }
}
