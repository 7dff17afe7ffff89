//! Domain models for the Crop Report Service

mod crop;
mod report;

pub use crop::*;
pub use report::*;
