//! Input validation for Rampcurve
//!
//! Checks configuration values and externally supplied control point lists
//! before they reach the engine. Interactive edits never come through here;
//! they are gated by the validity rules in `engine::validity`.

use std::path::Path;

use crate::constants::limits;
use crate::data::{EngineConfig, InsetRect, Point};
use crate::error::{CurveError, Result};

/// Validates engine configuration values
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    if config.max_point_count < limits::MIN_MAX_POINTS {
        return Err(CurveError::invalid_config(
            "max_point_count",
            format!(
                "must be at least {} (the two boundary points)",
                limits::MIN_MAX_POINTS
            ),
        ));
    }

    if config.max_point_count > limits::MAX_MAX_POINTS {
        return Err(CurveError::invalid_config(
            "max_point_count",
            format!("exceeds maximum of {}", limits::MAX_MAX_POINTS),
        ));
    }

    if !config.line_width.is_finite()
        || !(0.0..=limits::MAX_LINE_WIDTH).contains(&config.line_width)
    {
        return Err(CurveError::invalid_config(
            "line_width",
            format!("{} (must be 0-{})", config.line_width, limits::MAX_LINE_WIDTH),
        ));
    }

    for (field, value) in [("inset_left", config.inset_left), ("inset_top", config.inset_top)] {
        if !value.is_finite() || value < 0.0 {
            return Err(CurveError::invalid_config(
                field,
                format!("{} (must be a non-negative number)", value),
            ));
        }
    }

    Ok(())
}

/// Validates a complete control point list, boundary points included
///
/// Enforces strict monotonicity (x rising, y falling), bounds and capacity.
pub fn validate_control_points(
    points: &[Point],
    rect: &InsetRect,
    max_points: usize,
) -> Result<()> {
    if points.len() < limits::MIN_MAX_POINTS {
        return Err(CurveError::InvalidCurve(
            "curve must keep both boundary points".into(),
        ));
    }

    if points.len() > max_points {
        return Err(CurveError::InvalidCurve(format!(
            "curve exceeds maximum of {} points",
            max_points
        )));
    }

    for (index, point) in points.iter().enumerate() {
        if !point.is_finite() {
            return Err(CurveError::invalid_point(index, "coordinates must be finite"));
        }
        if !rect.contains(*point) {
            return Err(CurveError::invalid_point(
                index,
                format!("{} lies outside the inset rectangle", point),
            ));
        }
    }

    for (index, window) in points.windows(2).enumerate() {
        let (a, b) = (window[0], window[1]);
        if a.x >= b.x || a.y <= b.y {
            return Err(CurveError::invalid_point(
                index + 1,
                format!("{} does not rise strictly after {}", b, a),
            ));
        }
    }

    Ok(())
}

/// Validates config file size
pub fn validate_file_size(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| CurveError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > limits::MAX_CONFIG_SIZE {
        return Err(CurveError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: limits::MAX_CONFIG_SIZE,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Canvas;

    fn rect() -> InsetRect {
        InsetRect::new(Canvas::new(300.0, 150.0), 7.0, 8.0).unwrap()
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config(&EngineConfig::default()).is_ok());
        assert!(validate_config(&EngineConfig::default().with_max_point_count(2)).is_ok());
        assert!(validate_config(&EngineConfig::default().with_max_point_count(1)).is_err());
        assert!(validate_config(&EngineConfig::default().with_max_point_count(65)).is_err());
        assert!(validate_config(&EngineConfig::default().with_line_width(-1.0)).is_err());
        assert!(validate_config(&EngineConfig::default().with_line_width(f64::NAN)).is_err());
        assert!(validate_config(&EngineConfig::default().with_insets(-7.0, 8.0)).is_err());
    }

    #[test]
    fn test_validate_control_points() {
        let r = rect();
        let ok = [r.start(), Point::new(100.0, 100.0), r.end()];
        assert!(validate_control_points(&ok, &r, 9).is_ok());

        // capacity
        assert!(validate_control_points(&ok, &r, 2).is_err());

        // y must fall while x rises
        let flat = [r.start(), Point::new(100.0, 142.0), r.end()];
        assert!(validate_control_points(&flat, &r, 9).is_err());

        let backwards = [r.start(), Point::new(7.0, 100.0), r.end()];
        assert!(validate_control_points(&backwards, &r, 9).is_err());

        let outside = [r.start(), Point::new(100.0, 2.0), r.end()];
        assert!(matches!(
            validate_control_points(&outside, &r, 9),
            Err(CurveError::InvalidPoint { index: 1, .. })
        ));

        assert!(validate_control_points(&[r.start()], &r, 9).is_err());
    }
}
