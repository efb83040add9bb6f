//! Error types for Rampcurve
//!
//! Re-exported from the shared `rc-error` crate so every crate in the
//! workspace reports failures through the same enum.

pub use rc_error::{CurveError, Result};
