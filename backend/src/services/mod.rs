//! Business logic services for the Crop Report Service

pub mod crop;
pub mod report;

pub use crop::CropService;
pub use report::ReportService;
