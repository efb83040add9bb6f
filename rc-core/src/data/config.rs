//! Engine configuration
//!
//! Persistent settings stored as JSON in ~/.config/rampcurve/config.json.
//! Every field has a serde default so older or partial files keep loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{geometry, limits, paths, stroke};
use crate::error::{CurveError, Result};

/// Options recognized by the curve engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of control points, boundary points included
    #[serde(default = "default_max_point_count")]
    pub max_point_count: usize,

    /// Rendered line width; widens the tap tolerance
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Allow dragging the first and last control points
    #[serde(default)]
    pub endpoints_editable: bool,

    /// Horizontal inset (half the marker width)
    #[serde(default = "default_inset_left")]
    pub inset_left: f64,

    /// Vertical inset (half the marker height)
    #[serde(default = "default_inset_top")]
    pub inset_top: f64,

    /// When false every edit is rejected and no touch is claimed
    #[serde(default = "default_true")]
    pub interaction_enabled: bool,

    /// Remove a point dragged out of its cell; when false the drag is refused
    #[serde(default = "default_true")]
    pub evict_on_cell_exit: bool,
}

fn default_max_point_count() -> usize {
    limits::DEFAULT_MAX_POINTS
}

fn default_line_width() -> f64 {
    stroke::DEFAULT_LINE_WIDTH
}

fn default_inset_left() -> f64 {
    geometry::DEFAULT_INSET_LEFT
}

fn default_inset_top() -> f64 {
    geometry::DEFAULT_INSET_TOP
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_point_count: default_max_point_count(),
            line_width: default_line_width(),
            endpoints_editable: false,
            inset_left: default_inset_left(),
            inset_top: default_inset_top(),
            interaction_enabled: true,
            evict_on_cell_exit: true,
        }
    }
}

impl EngineConfig {
    /// Distance from the curve within which a tap still counts as "on" it
    pub fn effective_distance(&self) -> f64 {
        self.line_width + geometry::PROXIMITY_MARGIN
    }

    pub fn with_max_point_count(mut self, max: usize) -> Self {
        self.max_point_count = max;
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_endpoints_editable(mut self, editable: bool) -> Self {
        self.endpoints_editable = editable;
        self
    }

    pub fn with_insets(mut self, left: f64, top: f64) -> Self {
        self.inset_left = left;
        self.inset_top = top;
        self
    }

    pub fn with_interaction_enabled(mut self, enabled: bool) -> Self {
        self.interaction_enabled = enabled;
        self
    }

    pub fn with_evict_on_cell_exit(mut self, evict: bool) -> Self {
        self.evict_on_cell_exit = evict;
        self
    }
}

/// Get the path to the config JSON file
pub fn get_config_path() -> PathBuf {
    paths::user_config_dir()
        .unwrap_or_else(|| PathBuf::from(".").join(paths::APP_DIR))
        .join(paths::CONFIG_FILE)
}

/// Load the config from `path`; a missing file yields the defaults
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        debug!("No config file found at {:?}, using defaults", path);
        return Ok(EngineConfig::default());
    }

    crate::data::validate_file_size(path)?;

    let contents = fs::read_to_string(path).map_err(|e| CurveError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: EngineConfig = serde_json::from_str(&contents)?;
    crate::data::validate_config(&config)?;

    info!("Loaded engine config from {:?}", path);
    Ok(config)
}

/// Save the config to `path` atomically (temp file, then rename)
pub fn save_config(path: &Path, config: &EngineConfig) -> Result<()> {
    crate::data::validate_config(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    let temp_path = path.with_extension("json.tmp");
    let write_err = |source| CurveError::FileWrite {
        path: temp_path.clone(),
        source,
    };

    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(json.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| CurveError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Saved engine config to {:?}", path);
    Ok(())
}
