//! Shared engine for the Agricultural Weather Station Platform
//!
//! This crate contains the pure time-series pipeline shared between the
//! backend and any future presentation layers: canonical reading types,
//! column/schema resolution, aggregation, derived agronomic metrics
//! (VPD, DLI, GDD) and threshold alerting.

pub mod aggregate;
pub mod alerts;
pub mod export;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod types;
pub mod validation;

pub use aggregate::*;
pub use alerts::*;
pub use export::*;
pub use ingest::*;
pub use metrics::*;
pub use models::*;
pub use schema::*;
pub use types::*;
pub use validation::*;
