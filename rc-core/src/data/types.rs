//! Core data types for Rampcurve
//!
//! Pixel-space geometry shared by every engine component. Pixel y grows
//! downward, so a rising ramp has strictly decreasing y from left to right.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CurveError, Result};

/// A point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint of the segment `self`-`other`
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Stable identity of a control point, assigned when the point is created
///
/// Ids survive inserts and removals of other points, so a UI marker can keep
/// its id instead of being renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A control point with its stable id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub id: PointId,
    pub point: Point,
}

/// Size of the editing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The rectangle control points live in: the canvas shrunk by the insets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsetRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl InsetRect {
    /// Build the inset rectangle, rejecting canvases with no usable interior
    pub fn new(canvas: Canvas, inset_left: f64, inset_top: f64) -> Result<Self> {
        let invalid = |reason: &str| CurveError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
            reason: reason.to_string(),
        };

        if !canvas.width.is_finite() || !canvas.height.is_finite() {
            return Err(invalid("dimensions must be finite"));
        }
        if canvas.width - 2.0 * inset_left <= 0.0 {
            return Err(invalid("no horizontal room inside the insets"));
        }
        if canvas.height - 2.0 * inset_top <= 0.0 {
            return Err(invalid("no vertical room inside the insets"));
        }

        Ok(Self {
            left: inset_left,
            top: inset_top,
            right: canvas.width - inset_left,
            bottom: canvas.height - inset_top,
        })
    }

    pub fn inner_width(&self) -> f64 {
        self.right - self.left
    }

    pub fn inner_height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Fixed first control point (bottom-left corner)
    pub fn start(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    /// Fixed last control point (top-right corner)
    pub fn end(&self) -> Point {
        Point::new(self.right, self.top)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(self.left, self.right), p.y.clamp(self.top, self.bottom))
    }
}

/// A polyline plus its stroke style, everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveStroke {
    pub points: Vec<Point>,
    pub line_width: f64,
}
