//! Unified error handling for Rampcurve
//!
//! This crate provides the single error type used across all Rampcurve crates.
//! Rejected edits (a tap outside a cell, a drag out of range) are NOT errors;
//! they are reported through return values of the editor. `CurveError` covers
//! malformed input, invalid configuration, I/O and protocol failures.

use std::io;
use std::path::PathBuf;

/// Result type alias using CurveError
pub type Result<T> = std::result::Result<T, CurveError>;

/// Unified error type for all Rampcurve operations
#[derive(thiserror::Error, Debug)]
pub enum CurveError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Geometry and Encoding Errors
    // ============================================================================
    #[error("Invalid canvas {width}x{height}: {reason}")]
    InvalidCanvas {
        width: f64,
        height: f64,
        reason: String,
    },

    #[error("Invalid control point {index}: {reason}")]
    InvalidPoint {
        index: usize,
        reason: String,
    },

    #[error("Curve validation failed: {0}")]
    InvalidCurve(String),

    #[error("Malformed point pair {pair} ({text:?}): {reason}")]
    Decode {
        pair: usize,
        text: String,
        reason: String,
    },

    // ============================================================================
    // Protocol Errors
    // ============================================================================
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl CurveError {
    /// Create an invalid config error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid point error
    pub fn invalid_point(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidPoint {
            index,
            reason: reason.into(),
        }
    }

    /// Create a decode error for the pair at `pair` (0-based)
    pub fn decode(pair: usize, text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            pair,
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a protocol error from a string
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
