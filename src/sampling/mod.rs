pub mod area;
pub mod attributes;
pub mod spline;

pub use area::AreaSampler;
pub use attributes::{SinkVelocitySampler, linspace, linspace_time};
pub use spline::{QuadraticSpline, SplineError};
