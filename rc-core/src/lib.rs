//! Rampcurve Core Library
//!
//! Editing engine for monotonic response curves: a rising curve through a
//! handful of draggable control points (a volume or brightness ramp, say),
//! serialized for the server that applies it.
//!
//! # Features
//!
//! - **Control Points**: Ordered, bounded, capacity-limited point storage with stable ids
//! - **Insertion Rules**: Cell containment and proximity checks with snapping onto the curve
//! - **Smooth Curves**: Chord-length weighted cubic Bézier chain sampled into a polyline
//! - **Wire Format**: Percentage strings and the fixed 10-entry `cmd_state`
//! - **Configuration**: Persistent engine settings as JSON
//!
//! # Module Structure
//!
//! - `data/` - Geometry types, configuration, validation
//! - `engine/` - Point store, validity gate, builder, sampler, codec, editor
//!
//! # Example
//!
//! ```
//! use rc_core::{Canvas, CurveEditor, EngineConfig, Point, PointSource};
//!
//! let mut editor = CurveEditor::with_points(
//!     Canvas::new(300.0, 150.0),
//!     EngineConfig::default(),
//!     PointSource::Percentages("47,40;60,60;70,90"),
//! )
//! .unwrap();
//!
//! editor.try_insert(Point::new(60.0, 125.0));
//! let payload = editor.serialize();
//! assert_eq!(payload.cmd_state.len(), 10);
//! ```

// Grouped modules
pub mod data;
pub mod engine;

// Standalone modules
pub mod constants;
pub mod error;

// Re-export primary types from data/
pub use data::{Canvas, ControlPoint, CurveStroke, InsetRect, Point, PointId};

// Re-export config functions from data/
pub use data::{get_config_path, load_config, save_config, EngineConfig};

// Re-export validation functions from data/
pub use data::{validate_config, validate_control_points, validate_file_size};

// Re-export error types
pub use error::{CurveError, Result};

// Re-export engine types
pub use engine::{
    CurveBuilder, CurveEditor, CurveGeometry, CurveListener, CurveSampler, MoveOutcome,
    PointCodec, PointSource, PointStore, Rejection, ValidityGate,
};

// Re-export wire types
pub use rc_protocol::{CurvePayload, PercentPoint};
