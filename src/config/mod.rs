//! Release configuration files
//!
//! A configuration file holds one release group or a list of them, in YAML,
//! TOML or JSON. Example (YAML):
//!
//! ```yaml
//! - location:
//!     lat: 60°23'
//!     lon: 5°19'
//!     width: 1000
//!   depth: [0, 10]
//!   release_time: ["2015-04-01", "2015-04-02T12:00"]
//!   num_particles: 1000
//!   group_id: 1
//! ```
//!
//! In TOML, timestamps must be quoted strings and multiple groups go in a
//! `[[group]]` array of tables.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{Depth, LocationSpec, ReleaseGroup, ReleaseTime};
use crate::error::ReleaseError;
use crate::geometry::coords::{CoordTree, NumericTree};
use crate::mesh::TriangulationMode;

const DEFAULT_TIME: &str = "2000-01-01";

const TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Either a single value or a `[first, second]` pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrPair<T> {
    Scalar(T),
    Pair(T, T),
}

/// Location block of a release group
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    #[serde(default)]
    pub lat: Option<CoordTree>,
    #[serde(default)]
    pub lon: Option<CoordTree>,
    /// Side length in meters; turns a lat/lon center into a square
    #[serde(default)]
    pub width: Option<f64>,
    /// Positions read from an external file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Location as written in the file: coordinates, or a named site
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationField {
    Coords(LocationConfig),
    Named(String),
}

impl Default for LocationField {
    fn default() -> Self {
        LocationField::Coords(LocationConfig {
            lat: Some(CoordTree::Number(0.0)),
            lon: Some(CoordTree::Number(0.0)),
            ..Default::default()
        })
    }
}

fn default_depth() -> ScalarOrPair<f64> {
    ScalarOrPair::Scalar(0.0)
}

/// One release group as written in a configuration file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    #[serde(default)]
    pub location: LocationField,
    #[serde(default = "default_depth")]
    pub depth: ScalarOrPair<f64>,
    #[serde(default)]
    pub release_time: Option<ScalarOrPair<String>>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub stop_time: Option<String>,
    #[serde(default)]
    pub num_particles: usize,
    #[serde(default)]
    pub group_id: i64,
    #[serde(default)]
    pub triangulation: TriangulationMode,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupList {
    Many(Vec<GroupConfig>),
    One(Box<GroupConfig>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlGroups {
    Many { group: Vec<GroupConfig> },
    One(Box<GroupConfig>),
}

impl From<GroupList> for Vec<GroupConfig> {
    fn from(list: GroupList) -> Self {
        match list {
            GroupList::Many(groups) => groups,
            GroupList::One(group) => vec![*group],
        }
    }
}

/// Configuration file syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the syntax from the file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse the group list of a configuration document
pub fn parse_groups(contents: &str, format: ConfigFormat) -> Result<Vec<GroupConfig>> {
    let groups = match format {
        ConfigFormat::Yaml => serde_yaml::from_str::<GroupList>(contents)
            .context("Failed to parse YAML release config")?
            .into(),
        ConfigFormat::Json => serde_json::from_str::<GroupList>(contents)
            .context("Failed to parse JSON release config")?
            .into(),
        ConfigFormat::Toml => match toml::from_str::<TomlGroups>(contents)
            .context("Failed to parse TOML release config")?
        {
            TomlGroups::Many { group } => group,
            TomlGroups::One(group) => vec![*group],
        },
    };
    Ok(groups)
}

/// Read a configuration file and resolve every group it declares
pub fn load_groups(path: &Path) -> Result<Vec<ReleaseGroup>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_groups(&contents, ConfigFormat::from_path(path))?
        .iter()
        .enumerate()
        .map(|(i, group)| {
            group
                .resolve()
                .with_context(|| format!("Invalid release group #{} in {}", i + 1, path.display()))
        })
        .collect()
}

impl GroupConfig {
    /// Convert to a release group, parsing coordinates and timestamps
    pub fn resolve(&self) -> Result<ReleaseGroup> {
        let location = self.location.resolve()?;

        let depth = match self.depth {
            ScalarOrPair::Scalar(z) => Depth::Constant(z),
            ScalarOrPair::Pair(min, max) => Depth::Range(min, max),
        };

        Ok(ReleaseGroup {
            location,
            depth,
            release_time: self.release_time()?,
            num_particles: self.num_particles,
            group_id: self.group_id,
            triangulation: self.triangulation,
            seed: self.seed,
        })
    }

    fn release_time(&self) -> Result<ReleaseTime> {
        if let Some(release_time) = &self.release_time {
            if self.start_time.is_some() || self.stop_time.is_some() {
                bail!("release_time cannot be combined with start_time/stop_time");
            }
            return Ok(match release_time {
                ScalarOrPair::Scalar(t) => ReleaseTime::Instant(parse_time(t)?),
                ScalarOrPair::Pair(start, stop) => ReleaseTime::Window {
                    start: parse_time(start)?,
                    stop: parse_time(stop)?,
                },
            });
        }

        let start = parse_time(self.start_time.as_deref().unwrap_or(DEFAULT_TIME))?;
        let stop = match &self.stop_time {
            Some(stop) => parse_time(stop)?,
            None => start,
        };
        Ok(ReleaseTime::Window { start, stop })
    }
}

impl LocationField {
    /// Resolve into a location spec
    pub fn resolve(&self) -> Result<LocationSpec, ReleaseError> {
        let config = match self {
            LocationField::Named(name) => {
                return Err(ReleaseError::UnsupportedSpec(format!(
                    "location lookup by name ({:?}) is not implemented",
                    name
                )));
            }
            LocationField::Coords(config) => config,
        };

        if let Some(file) = &config.file {
            return Err(ReleaseError::UnsupportedSpec(format!(
                "locations from file ({}) are not implemented",
                file.display()
            )));
        }

        let (Some(lat), Some(lon)) = (&config.lat, &config.lon) else {
            return Err(ReleaseError::UnsupportedSpec(
                "location needs both lat and lon".to_string(),
            ));
        };

        let lat: NumericTree = lat.resolve()?;
        let lon: NumericTree = lon.resolve()?;
        LocationSpec::from_coords(&lat, &lon, config.width)
    }
}

/// Parse a timestamp (`YYYY-MM-DD`, optionally followed by a time of day)
pub fn parse_time(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();

    for format in TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(t);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::default()));
    }

    bail!("Invalid timestamp: {:?}", text)
}
