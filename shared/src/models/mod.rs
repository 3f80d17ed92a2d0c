//! Domain models for the Agricultural Weather Station Platform

mod alert;
mod crop;
mod processed;
mod reading;

pub use alert::*;
pub use crop::*;
pub use processed::*;
pub use reading::*;
