//! Data types, configuration, and validation modules
//!
//! Contains the geometry types and configuration management.

mod config;
mod types;
mod validation;

pub use config::{get_config_path, load_config, save_config, EngineConfig};
pub use types::{Canvas, ControlPoint, CurveStroke, InsetRect, Point, PointId};
pub use validation::{validate_config, validate_control_points, validate_file_size};
