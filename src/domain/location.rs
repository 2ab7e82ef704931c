use crate::error::{ReleaseError, Result};
use crate::geometry::coords::NumericTree;

/// Where the particles of a release group start
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// Every particle at the same position
    Point { lat: f64, lon: f64 },
    /// Square of `width_m` meters centered at (lat, lon)
    Square { lat: f64, lon: f64, width_m: f64 },
    /// Single simple polygon given as a ring of (lat, lon) vertices
    Polygon { ring: Vec<(f64, f64)> },
    /// Several disjoint simple polygons
    MultiPolygon { rings: Vec<Vec<(f64, f64)>> },
}

impl LocationSpec {
    /// Decide the location variant from resolved latitude/longitude values
    ///
    /// Scalars give a point (or a square when `width_m` is set), flat
    /// sequences a polygon, and sequences of sequences a multi-polygon.
    pub fn from_coords(
        lat: &NumericTree,
        lon: &NumericTree,
        width_m: Option<f64>,
    ) -> Result<Self> {
        if let Some(width_m) = width_m {
            let (Some(lat), Some(lon)) = (lat.as_scalar(), lon.as_scalar()) else {
                return Err(ReleaseError::UnsupportedSpec(
                    "a square location needs a single lat/lon center".to_string(),
                ));
            };
            if !(width_m > 0.0 && width_m.is_finite()) {
                return Err(ReleaseError::DegenerateGeometry(format!(
                    "square width must be positive, got {}",
                    width_m
                )));
            }
            return Ok(LocationSpec::Square { lat, lon, width_m });
        }

        match (lat.depth(), lon.depth()) {
            (0, 0) => Ok(LocationSpec::Point {
                lat: lat.as_scalar().unwrap_or_default(),
                lon: lon.as_scalar().unwrap_or_default(),
            }),
            (1, 1) => {
                let ring = zip_ring(
                    &lat.as_values().unwrap_or_default(),
                    &lon.as_values().unwrap_or_default(),
                )?;
                Ok(LocationSpec::Polygon { ring })
            }
            (2, 2) => {
                let lats = nested(lat)?;
                let lons = nested(lon)?;
                if lats.len() != lons.len() {
                    return Err(ReleaseError::DegenerateGeometry(format!(
                        "{} latitude rings but {} longitude rings",
                        lats.len(),
                        lons.len()
                    )));
                }
                let rings = lats
                    .iter()
                    .zip(&lons)
                    .map(|(la, lo)| zip_ring(la, lo))
                    .collect::<Result<Vec<_>>>()?;
                Ok(LocationSpec::MultiPolygon { rings })
            }
            (lat_depth, lon_depth) => Err(ReleaseError::UnsupportedSpec(format!(
                "cannot combine lat nesting depth {} with lon nesting depth {}",
                lat_depth, lon_depth
            ))),
        }
    }

    /// Short name used in log messages
    pub fn kind(&self) -> &'static str {
        match self {
            LocationSpec::Point { .. } => "point",
            LocationSpec::Square { .. } => "square",
            LocationSpec::Polygon { .. } => "polygon",
            LocationSpec::MultiPolygon { .. } => "multipolygon",
        }
    }
}

fn nested(tree: &NumericTree) -> Result<Vec<Vec<f64>>> {
    tree.as_nested_values().ok_or_else(|| {
        ReleaseError::UnsupportedSpec(
            "multi-polygon rings must be flat coordinate lists".to_string(),
        )
    })
}

/// Pair up latitudes and longitudes into a ring, dropping a repeated closing vertex
fn zip_ring(lats: &[f64], lons: &[f64]) -> Result<Vec<(f64, f64)>> {
    if lats.len() != lons.len() {
        return Err(ReleaseError::DegenerateGeometry(format!(
            "ring has {} latitudes but {} longitudes",
            lats.len(),
            lons.len()
        )));
    }

    let mut ring: Vec<(f64, f64)> = lats.iter().copied().zip(lons.iter().copied()).collect();
    if ring.len() > 3 && ring.first() == ring.last() {
        ring.pop();
    }

    if ring.len() < 3 {
        return Err(ReleaseError::DegenerateGeometry(format!(
            "ring needs at least 3 vertices, got {}",
            ring.len()
        )));
    }

    Ok(ring)
}
