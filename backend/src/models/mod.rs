//! Domain models for the Crop Report Service
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
