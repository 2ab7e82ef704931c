pub mod triangle;
pub mod triangulation;

pub use triangle::Triangle;
pub use triangulation::{TriangulationMode, Triangulator, is_convex, triangulate_rings};
