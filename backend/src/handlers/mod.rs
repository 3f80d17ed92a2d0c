//! HTTP request handlers for the Agricultural Weather Station Platform

pub mod crops;
pub mod health;
pub mod readings;

pub use crops::*;
pub use health::*;
pub use readings::*;
