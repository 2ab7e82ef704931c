//! Area-weighted point sampling over a set of triangles

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::error::{ReleaseError, Result};
use crate::mesh::Triangle;

/// Draws points uniformly distributed over the union of a set of triangles
#[derive(Debug, Clone)]
pub struct AreaSampler {
    triangles: Vec<Triangle>,
    /// Cumulative triangle areas normalized so the last entry is 1
    cdf: Vec<f64>,
    total_area: f64,
}

impl AreaSampler {
    /// Prepare a sampler, rejecting empty or zero-area triangle sets
    pub fn new(triangles: Vec<Triangle>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(ReleaseError::DegenerateGeometry(
                "no triangles to sample from".to_string(),
            ));
        }
        if let Some(bad) = triangles.iter().find(|t| !t.is_finite()) {
            return Err(ReleaseError::DegenerateGeometry(format!(
                "triangle with non-finite vertices: {:?}",
                bad.vertices
            )));
        }

        let mut cumulative = Vec::with_capacity(triangles.len());
        let mut sum = 0.0;
        for triangle in &triangles {
            sum += triangle.area();
            cumulative.push(sum);
        }

        if !(sum > 0.0 && sum.is_finite()) {
            return Err(ReleaseError::DegenerateGeometry(format!(
                "polygon has zero total area ({} triangles)",
                triangles.len()
            )));
        }

        let cdf = cumulative.iter().map(|&c| c / sum).collect();

        Ok(Self {
            triangles,
            cdf,
            total_area: sum,
        })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// Index of the triangle owning the cumulative-probability value `u`
    ///
    /// Leftmost index with `cdf[i] >= u`.
    fn locate(&self, u: f64) -> usize {
        let idx = self.cdf.partition_point(|&c| c < u);
        idx.min(self.cdf.len() - 1)
    }

    /// Draw `n` points from the given random stream
    ///
    /// Draw order is fixed: `n` triangle-selection values, then `n` values of
    /// `s`, then `n` values of `t`.
    pub fn sample(&self, n: usize, rng: &mut ChaChaRng) -> Vec<(f64, f64)> {
        let owners: Vec<usize> = (0..n).map(|_| self.locate(rng.random::<f64>())).collect();
        let s: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
        let t: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();

        owners
            .iter()
            .zip(s.iter().zip(t.iter()))
            .map(|(&owner, (&s, &t))| {
                // Fold the upper half of the unit square onto the unit triangle
                let (s, t) = if s + t > 1.0 { (1.0 - s, 1.0 - t) } else { (s, t) };
                self.triangles[owner].point_at(s, t)
            })
            .collect()
    }

    /// Draw `n` points from a fresh stream seeded with `seed`
    pub fn sample_seeded(&self, n: usize, seed: u64) -> Vec<(f64, f64)> {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        self.sample(n, &mut rng)
    }
}
