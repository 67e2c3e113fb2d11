//! Monitor Core
//!
//! Windowed comparator and the anomaly, drift and regime monitors built on it.

mod alerting;
mod anomaly;
mod comparator;
mod drift;
mod regime;
mod stream;

pub use alerting::*;
pub use anomaly::*;
pub use comparator::*;
pub use drift::*;
pub use regime::*;
pub use stream::*;

use monitor_spi::{MonitorError, Result};

/// Reject the first NaN or infinite value, reporting its position.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MonitorError::NonFiniteInput { index }),
        None => Ok(()),
    }
}
