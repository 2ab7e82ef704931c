pub mod builder;
pub mod writer;

pub use builder::ReleaseBuilder;
pub use writer::{write_table, write_table_to_path};
