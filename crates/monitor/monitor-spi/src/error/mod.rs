//! Error types for the monitors.
//!
//! This module contains error types and the Result alias.

mod monitor_error;

pub use monitor_error::{MonitorError, Result};
