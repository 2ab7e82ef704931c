use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Timestamp format of the release file
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Column set of a release table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// release_time, lat, lon, Z, group_id
    #[default]
    Basic,
    /// active, release_time, lat, lon, Z, sink_vel, group_id
    Sinking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Active,
    ReleaseTime,
    Lat,
    Lon,
    Z,
    SinkVel,
    GroupId,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Active => "active",
            Column::ReleaseTime => "release_time",
            Column::Lat => "lat",
            Column::Lon => "lon",
            Column::Z => "Z",
            Column::SinkVel => "sink_vel",
            Column::GroupId => "group_id",
        }
    }
}

impl Layout {
    /// Columns in file order
    pub fn columns(self) -> &'static [Column] {
        match self {
            Layout::Basic => &[
                Column::ReleaseTime,
                Column::Lat,
                Column::Lon,
                Column::Z,
                Column::GroupId,
            ],
            Layout::Sinking => &[
                Column::Active,
                Column::ReleaseTime,
                Column::Lat,
                Column::Lon,
                Column::Z,
                Column::SinkVel,
                Column::GroupId,
            ],
        }
    }
}

/// A single value of a release table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Time(NaiveDateTime),
    Float(f64),
    Int(i64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
        }
    }
}

/// Initial state of one simulated particle
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRow {
    pub release_time: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    /// Depth in meters, positive down
    pub z: f64,
    pub sink_vel: Option<f64>,
    pub active: Option<u8>,
    pub group_id: i64,
}

impl ReleaseRow {
    /// Value of a column; columns absent from the row read as `None`
    pub fn get(&self, column: Column) -> Option<Cell> {
        match column {
            Column::Active => self.active.map(|a| Cell::Int(a as i64)),
            Column::ReleaseTime => Some(Cell::Time(self.release_time)),
            Column::Lat => Some(Cell::Float(self.lat)),
            Column::Lon => Some(Cell::Float(self.lon)),
            Column::Z => Some(Cell::Float(self.z)),
            Column::SinkVel => self.sink_vel.map(Cell::Float),
            Column::GroupId => Some(Cell::Int(self.group_id)),
        }
    }
}

/// Ordered particle rows with a fixed column layout
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseTable {
    layout: Layout,
    rows: Vec<ReleaseRow>,
}

impl ReleaseTable {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn columns(&self) -> &'static [Column] {
        self.layout.columns()
    }

    pub fn rows(&self) -> &[ReleaseRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append rows, keeping insertion order
    pub fn extend(&mut self, rows: impl IntoIterator<Item = ReleaseRow>) {
        self.rows.extend(rows);
    }

    /// All values of one column in row order, or `None` if the layout lacks it
    pub fn column(&self, column: Column) -> Option<Vec<Cell>> {
        if !self.columns().contains(&column) {
            return None;
        }
        self.rows.iter().map(|row| row.get(column)).collect()
    }

    /// Values of one row in layout order
    pub fn record(&self, index: usize) -> Option<Vec<Cell>> {
        let row = self.rows.get(index)?;
        self.columns().iter().map(|&c| row.get(c)).collect()
    }
}
