pub mod group;
pub mod location;
pub mod row;

pub use group::{Depth, ReleaseGroup, ReleaseTime};
pub use location::LocationSpec;
pub use row::{Cell, Column, Layout, ReleaseRow, ReleaseTable, TIME_FORMAT};
