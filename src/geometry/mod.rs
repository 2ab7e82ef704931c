pub mod coords;
pub mod square;

pub use coords::{CoordTree, NumericTree, parse_coordinate};
pub use square::{square_extent, square_polygon};
