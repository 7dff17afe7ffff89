//! HTTP handlers for the Crop Report Service

pub mod crop;
pub mod extract;
pub mod health;
pub mod index;
pub mod report;

pub use crop::*;
pub use health::*;
pub use index::*;
pub use report::*;
