use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::debug;

use crate::domain::{Layout, LocationSpec, ReleaseGroup, ReleaseRow, ReleaseTable};
use crate::error::Result;
use crate::geometry::square_polygon;
use crate::mesh::{Triangle, Triangulator, triangulate_rings};
use crate::sampling::{AreaSampler, SinkVelocitySampler};

/// Turns release groups into a table of particle rows
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    layout: Layout,
    sink_velocity: SinkVelocitySampler,
}

impl ReleaseBuilder {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            sink_velocity: SinkVelocitySampler::reference(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Build all groups and concatenate their rows in declaration order
    ///
    /// Fails as a whole if any group fails; no partial table is returned.
    pub fn build(&self, groups: &[ReleaseGroup]) -> Result<ReleaseTable> {
        let mut table = ReleaseTable::new(self.layout);
        for group in groups {
            table.extend(self.build_group(group)?);
        }
        Ok(table)
    }

    /// Rows of a single group, in sample order
    pub fn build_group(&self, group: &ReleaseGroup) -> Result<Vec<ReleaseRow>> {
        let n = group.num_particles;
        let mut rng = ChaChaRng::seed_from_u64(group.seed);

        let positions = match release_area(group)? {
            ReleaseArea::Point(lat, lon) => vec![(lat, lon); n],
            ReleaseArea::Triangles(triangles) => {
                let sampler = AreaSampler::new(triangles)?;
                debug!(
                    group_id = group.group_id,
                    triangles = sampler.triangles().len(),
                    area_deg2 = sampler.total_area(),
                    "triangulated release area"
                );
                sampler.sample(n, &mut rng)
            }
        };

        let times = group.release_time.values(n);
        let depths = group.depth.values(n);
        let sink_vel = match self.layout {
            Layout::Basic => None,
            Layout::Sinking => Some(self.sink_velocity.sample(n, &mut rng)),
        };

        let rows: Vec<ReleaseRow> = positions
            .into_iter()
            .zip(times.into_iter().zip(depths))
            .enumerate()
            .map(|(i, ((lat, lon), (release_time, z)))| ReleaseRow {
                release_time,
                lat,
                lon,
                z,
                sink_vel: sink_vel.as_ref().map(|v| v[i]),
                active: match self.layout {
                    Layout::Basic => None,
                    Layout::Sinking => Some(1),
                },
                group_id: group.group_id,
            })
            .collect();

        debug!(
            group_id = group.group_id,
            location = group.location.kind(),
            rows = rows.len(),
            "built release group"
        );

        Ok(rows)
    }
}

enum ReleaseArea {
    Point(f64, f64),
    Triangles(Vec<Triangle>),
}

fn release_area(group: &ReleaseGroup) -> Result<ReleaseArea> {
    let triangles = match &group.location {
        LocationSpec::Point { lat, lon } => return Ok(ReleaseArea::Point(*lat, *lon)),
        LocationSpec::Square { lat, lon, width_m } => {
            Triangulator::Fan.triangulate(&square_polygon(*lat, *lon, *width_m))?
        }
        LocationSpec::Polygon { ring } => {
            Triangulator::for_ring(group.triangulation, ring).triangulate(ring)?
        }
        LocationSpec::MultiPolygon { rings } => triangulate_rings(group.triangulation, rings)?,
    };
    Ok(ReleaseArea::Triangles(triangles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Depth, ReleaseTime};
    use crate::error::ReleaseError;
    use crate::geometry::square_extent;
    use crate::mesh::TriangulationMode;
    use chrono::{NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn point_group(n: usize, group_id: i64) -> ReleaseGroup {
        ReleaseGroup::new(
            LocationSpec::Point { lat: 60.0, lon: 5.0 },
            ReleaseTime::Instant(start()),
            n,
        )
        .with_group_id(group_id)
    }

    #[test]
    fn test_point_location() {
        let table = ReleaseBuilder::new(Layout::Basic)
            .build(&[point_group(3, 0)])
            .unwrap();

        assert_eq!(table.len(), 3);
        for row in table.rows() {
            assert_eq!(row.lat, 60.0);
            assert_eq!(row.lon, 5.0);
            assert_eq!(row.sink_vel, None);
            assert_eq!(row.active, None);
        }
    }

    #[test]
    fn test_square_location() {
        let group = ReleaseGroup::new(
            LocationSpec::Square {
                lat: 60.0,
                lon: 5.0,
                width_m: 1000.0,
            },
            ReleaseTime::Instant(start()),
            1000,
        );
        let table = ReleaseBuilder::new(Layout::Basic).build(&[group]).unwrap();
        assert_eq!(table.len(), 1000);

        let (delta_lat, delta_lon) = square_extent(60.0, 1000.0);
        for row in table.rows() {
            assert!((row.lat - 60.0).abs() <= delta_lat / 2.0 + 1e-12);
            assert!((row.lon - 5.0).abs() <= delta_lon / 2.0 + 1e-12);
        }

        let mean_lat = table.rows().iter().map(|r| r.lat).sum::<f64>() / 1000.0;
        let mean_lon = table.rows().iter().map(|r| r.lon).sum::<f64>() / 1000.0;
        assert!((mean_lat - 60.0).abs() < 0.05 * delta_lat);
        assert!((mean_lon - 5.0).abs() < 0.05 * delta_lon);
    }

    #[test]
    fn test_group_concatenation() {
        let table = ReleaseBuilder::new(Layout::Basic)
            .build(&[point_group(5, 1), point_group(7, 2)])
            .unwrap();

        assert_eq!(table.len(), 12);
        assert!(table.rows()[..5].iter().all(|r| r.group_id == 1));
        assert!(table.rows()[5..].iter().all(|r| r.group_id == 2));
    }

    #[test]
    fn test_group_ids_are_not_reassigned() {
        let table = ReleaseBuilder::new(Layout::Basic)
            .build(&[point_group(2, 4), point_group(2, 4), point_group(1, -1)])
            .unwrap();
        let ids: Vec<i64> = table.rows().iter().map(|r| r.group_id).collect();
        assert_eq!(ids, vec![4, 4, 4, 4, -1]);
    }

    #[test]
    fn test_sinking_layout() {
        let group = point_group(10_000, 3)
            .with_depth(Depth::Constant(5.0))
            .with_seed(11);
        let table = ReleaseBuilder::new(Layout::Sinking).build(&[group]).unwrap();

        for row in table.rows() {
            assert_eq!(row.active, Some(1));
            assert_eq!(row.z, 5.0);
            let v = row.sink_vel.unwrap();
            assert!((0.0..=0.100).contains(&v));
        }

        // 66.2 % of the particles sink at 0.05 m/s or faster
        let fast = table
            .rows()
            .iter()
            .filter(|r| r.sink_vel.unwrap() >= 0.05)
            .count();
        let fraction = fast as f64 / table.len() as f64;
        assert!((fraction - 0.662).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_attribute_columns_follow_sample_order() {
        let end = start() + chrono::TimeDelta::hours(4);
        let group = ReleaseGroup::new(
            LocationSpec::Point { lat: 1.0, lon: 2.0 },
            ReleaseTime::Window { start: start(), stop: end },
            5,
        )
        .with_depth(Depth::Range(0.0, 20.0));
        let table = ReleaseBuilder::new(Layout::Basic).build(&[group]).unwrap();

        let depths: Vec<f64> = table.rows().iter().map(|r| r.z).collect();
        assert_eq!(depths, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
        assert_eq!(table.rows()[0].release_time, start());
        assert_eq!(table.rows()[2].release_time, start() + chrono::TimeDelta::hours(2));
        assert_eq!(table.rows()[4].release_time, end);
    }

    #[test]
    fn test_polygon_sampling_is_reproducible() {
        let ring = vec![
            (59.0, 4.0),
            (59.0, 6.0),
            (60.0, 6.0),
            (59.5, 5.0),
            (60.0, 4.0),
        ];
        let group = ReleaseGroup::new(
            LocationSpec::Polygon { ring },
            ReleaseTime::Instant(start()),
            200,
        );
        let builder = ReleaseBuilder::new(Layout::Sinking);

        let first = builder.build(std::slice::from_ref(&group)).unwrap();
        let second = builder.build(&[group.clone()]).unwrap();
        assert_eq!(first, second);

        // The notch between the two prongs stays empty
        for row in first.rows() {
            let inside_notch = row.lat > 59.5 && (row.lon - 5.0).abs() < (row.lat - 59.5) * 1.9;
            assert!(!inside_notch, "{:?}", (row.lat, row.lon));
        }

        let reseeded = builder.build(&[group.with_seed(1)]).unwrap();
        assert_ne!(first, reseeded);
    }

    #[test]
    fn test_multipolygon_groups_sample_all_parts() {
        let rings = vec![
            vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
            vec![(10.0, 10.0), (10.0, 11.0), (11.0, 11.0), (11.0, 10.0)],
        ];
        let group = ReleaseGroup::new(
            LocationSpec::MultiPolygon { rings },
            ReleaseTime::Instant(start()),
            2000,
        )
        .with_triangulation(TriangulationMode::Constrained);
        let table = ReleaseBuilder::new(Layout::Basic).build(&[group]).unwrap();

        let second = table.rows().iter().filter(|r| r.lat >= 10.0).count();
        assert!((second as f64 / 2000.0 - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_zero_particles() {
        let table = ReleaseBuilder::new(Layout::Sinking)
            .build(&[point_group(0, 1)])
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_degenerate_polygon_fails_whole_build() {
        let flat = ReleaseGroup::new(
            LocationSpec::Polygon {
                ring: vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
            },
            ReleaseTime::Instant(start()),
            10,
        )
        .with_triangulation(TriangulationMode::Fan);

        let err = ReleaseBuilder::new(Layout::Basic)
            .build(&[point_group(3, 1), flat])
            .unwrap_err();
        assert!(matches!(err, ReleaseError::DegenerateGeometry(_)));
    }
}
