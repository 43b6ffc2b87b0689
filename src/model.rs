//! Core data model for Waybill.
//!
//! Cargo shipments, the tracking waypoints recorded against them,
//! and the status tags each waypoint carries.

mod cargo;
mod status;
mod tracking;

pub use cargo::Cargo;
pub use status::{LuggageStatus, StatusCode, StatusKind, UnknownStatus};
pub use tracking::{CargoTracking, TrackingSubmission};
