//! Waybill: cargo tracking waypoints, their status history, and the
//! timeline view operators read them through.

pub mod cli;
pub mod config;
pub mod form;
pub mod identity;
pub mod model;
pub mod session;
pub mod stepper;
pub mod storage;
pub mod store;
pub mod table;
