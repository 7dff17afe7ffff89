//! Shared types and models for the Crop Report Service
//!
//! This crate contains the crop domain model, the report envelope and its
//! transformer, and request validation. Nothing here performs I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
