use earcutr::earcut;
use serde::Deserialize;

use super::Triangle;
use crate::error::{ReleaseError, Result};

/// How a release polygon is split into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriangulationMode {
    /// Fan for convex rings, constrained otherwise
    #[default]
    Auto,
    Fan,
    Constrained,
}

/// Triangulation algorithm for a single ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triangulator {
    /// Triangles (v0, v[i+1], v[i+2]); valid for convex rings only
    Fan,
    /// Boundary-respecting triangulation of an arbitrary simple ring
    Constrained,
}

impl Triangulator {
    /// Pick the algorithm for a ring under the given mode
    pub fn for_ring(mode: TriangulationMode, ring: &[(f64, f64)]) -> Self {
        match mode {
            TriangulationMode::Fan => Triangulator::Fan,
            TriangulationMode::Constrained => Triangulator::Constrained,
            TriangulationMode::Auto if is_convex(ring) => Triangulator::Fan,
            TriangulationMode::Auto => Triangulator::Constrained,
        }
    }

    pub fn triangulate(self, ring: &[(f64, f64)]) -> Result<Vec<Triangle>> {
        if ring.len() < 3 {
            return Err(ReleaseError::DegenerateGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                ring.len()
            )));
        }

        match self {
            Triangulator::Fan => Ok(triangulate_fan(ring)),
            Triangulator::Constrained => triangulate_constrained(ring),
        }
    }
}

/// Triangulate every ring of a (multi-)polygon and concatenate the triangles
pub fn triangulate_rings(
    mode: TriangulationMode,
    rings: &[Vec<(f64, f64)>],
) -> Result<Vec<Triangle>> {
    let mut triangles = Vec::new();
    for ring in rings {
        let triangulator = Triangulator::for_ring(mode, ring);
        triangles.extend(triangulator.triangulate(ring)?);
    }
    Ok(triangles)
}

/// Convexity test on consecutive edge vectors
///
/// The ring is convex iff the sign of the cross product of every pair of
/// adjacent edges (wrapping around) is the same.
pub fn is_convex(ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let edge = |i: usize| {
        let a = ring[i % n];
        let b = ring[(i + 1) % n];
        (a.0 - b.0, a.1 - b.1)
    };

    let turns_left = |i: usize| {
        let u = edge(i);
        let v = edge(i + 1);
        u.0 * v.1 > u.1 * v.0
    };

    let first = turns_left(0);
    (1..n).all(|i| turns_left(i) == first)
}

fn triangulate_fan(ring: &[(f64, f64)]) -> Vec<Triangle> {
    (0..ring.len() - 2)
        .map(|i| Triangle::new(ring[0], ring[i + 1], ring[i + 2]))
        .collect()
}

fn triangulate_constrained(ring: &[(f64, f64)]) -> Result<Vec<Triangle>> {
    let vertices: Vec<f64> = ring.iter().flat_map(|&(x, y)| [x, y]).collect();

    let indices = earcut(&vertices, &[], 2).map_err(|_| {
        ReleaseError::DegenerateGeometry("earcut failed on polygon ring".to_string())
    })?;

    if indices.is_empty() {
        return Err(ReleaseError::DegenerateGeometry(
            "polygon could not be triangulated".to_string(),
        ));
    }

    Ok(indices
        .chunks_exact(3)
        .map(|c| Triangle::new(ring[c[0]], ring[c[1]], ring[c[2]]))
        .collect())
}
