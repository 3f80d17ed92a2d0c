//! Business logic services for the Agricultural Weather Station Platform

pub mod dashboard;
pub mod export;
pub mod upload;

pub use dashboard::DashboardService;
pub use export::ExportService;
pub use upload::UploadService;
