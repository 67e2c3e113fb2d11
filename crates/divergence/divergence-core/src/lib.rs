//! Divergence Core
//!
//! Implementations of the divergence kernel, the histogram density
//! estimator, and the measures built on top of them.

pub mod analysis;
pub mod histogram;
pub mod inference;
pub mod information;
pub mod kernel;
pub mod measures;

pub use analysis::*;
pub use histogram::*;
pub use inference::*;
pub use information::*;
pub use kernel::*;
pub use measures::*;
