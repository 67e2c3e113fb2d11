//! Contract definitions for the monitors.
//!
//! This module contains trait definitions that providers must implement.

mod window_comparator;

pub use window_comparator::{MonitoringStream, WindowComparator};
