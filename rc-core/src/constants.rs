//! Constants and configuration values for Rampcurve
//!
//! Centralizes all magic numbers, paths, and configuration defaults.
//! Never use magic numbers in other files - add them here first.

/// Configuration file locations
pub mod paths {
    /// Application directory name under the user's config dir
    pub const APP_DIR: &str = "rampcurve";

    /// Engine configuration file
    pub const CONFIG_FILE: &str = "config.json";

    /// User configuration directory (e.g. ~/.config/rampcurve)
    ///
    /// Honors XDG_CONFIG_HOME first, then falls back to the platform default.
    pub fn user_config_dir() -> Option<std::path::PathBuf> {
        let base = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => Some(std::path::PathBuf::from(xdg)),
            _ => dirs::config_dir(),
        };
        base.map(|p| p.join(APP_DIR))
    }
}

/// Canvas geometry
pub mod geometry {
    /// Default horizontal inset: half the rendered marker width
    pub const DEFAULT_INSET_LEFT: f64 = 7.0;

    /// Default vertical inset: half the rendered marker height
    pub const DEFAULT_INSET_TOP: f64 = 8.0;

    /// Spline samples emitted per cubic segment
    pub const SAMPLES_PER_SEGMENT: usize = 100;

    /// Extra pixels added to the line width to get the tap tolerance
    pub const PROXIMITY_MARGIN: f64 = 30.0;

    /// Chord lengths below this are treated as zero
    pub const FLOAT_EPSILON: f64 = 1e-9;
}

/// Rendering defaults that influence hit testing
pub mod stroke {
    /// Default curve line width in pixels
    pub const DEFAULT_LINE_WIDTH: f64 = 6.0;
}

/// Normalized sample (`cmd_state`) derivation
pub mod sampling {
    /// Number of equal divisions of the inner width
    pub const DIVISIONS: usize = 10;

    /// Interior sample positions (1..DIVISIONS-1)
    pub const SAMPLE_COUNT: usize = DIVISIONS - 1;

    /// Scale of a normalized value
    pub const PERCENT_SCALE: f64 = 100.0;
}

/// Hard limits
pub mod limits {
    /// Default maximum number of control points, boundary points included
    pub const DEFAULT_MAX_POINTS: usize = 9;

    /// The two boundary points are always present
    pub const MIN_MAX_POINTS: usize = 2;

    /// Ceiling for a configured maximum
    pub const MAX_MAX_POINTS: usize = 64;

    /// Largest accepted line width in pixels
    pub const MAX_LINE_WIDTH: f64 = 200.0;

    /// Maximum config file size (64KB)
    pub const MAX_CONFIG_SIZE: u64 = 64 * 1024;
}

/// Preset curves, as percentage strings of their interior points
pub mod default_curve {
    /// Straight ramp: boundary points only
    pub const LINEAR: &str = "";

    /// Slow start, fast finish
    pub const EASE_IN: &str = "35,15;65,40";

    /// Fast start, slow finish
    pub const EASE_OUT: &str = "35,60;65,85";

    /// Soft S-shaped ramp
    pub const SMOOTH: &str = "47,40;60,60;70,90";
}
