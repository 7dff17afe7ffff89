//! External service integrations

pub mod report_engine;

pub use report_engine::{EngineError, EngineOutput, ReportEngineClient};
