//! Trace-driven simulation.
//!
//! Provides loading of branch traces from disk and a driver that replays
//! them through the predictor hooks in host order.

pub use self::{driver::TraceDriver, trace::TraceRecord};

/// Trace replay driver.
pub mod driver;

/// JSON-lines trace parsing.
pub mod trace;
