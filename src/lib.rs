//! ladim-release - Generate particle release files for the LADIM particle tracking model

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod release;
pub mod sampling;

pub use domain::{Layout, LocationSpec, ReleaseGroup, ReleaseTable};
pub use error::{ReleaseError, Result};
pub use release::ReleaseBuilder;
