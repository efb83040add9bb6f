//! Spline construction through the control points
//!
//! Builds a tangent-continuous chain of cubic Bézier segments through the
//! control points and samples it into a dense polyline.
//!
//! # How It Works
//!
//! For every interior point `M` with neighbours `L` and `R`, two tangent
//! handles are placed on the line parallel to `mid(L,M) - mid(M,R)`:
//!
//! - `cLeft  = M + d * ratio`
//! - `cRight = M - d * (1 - ratio)`
//!
//! where `ratio = |LM| / (|LM| + |MR|)`. Weighting by chord length keeps
//! unevenly spaced points from overshooting. Both handles of `M` are collinear
//! with `M`, so the tangent direction is continuous across it.
//!
//! The true first and last points have no triple of their own; their handle is
//! derived from the neighbouring handle with the same length-ratio blending.

use tracing::trace;

use crate::constants::geometry::{FLOAT_EPSILON, SAMPLES_PER_SEGMENT};
use crate::data::{InsetRect, Point};

/// One cubic Bézier segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicSegment {
    /// Evaluate `B(t) = P0(1-t)³ + 3·P1·t(1-t)² + 3·P2·t²(1-t) + P3·t³`
    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let t2 = t * t;

        let a = mt2 * mt;
        let b = 3.0 * t * mt2;
        let c = 3.0 * t2 * mt;
        let d = t2 * t;

        Point::new(
            self.start.x * a + self.control1.x * b + self.control2.x * c + self.end.x * d,
            self.start.y * a + self.control1.y * b + self.control2.y * c + self.end.y * d,
        )
    }
}

/// Dense polyline approximating the spline, rebuilt on every edit
///
/// Keeps the control points it was built through, which the polyline
/// passes through exactly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveGeometry {
    points: Vec<Point>,
    knots: Vec<Point>,
}

impl CurveGeometry {
    /// A bare polyline with no known control points
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            knots: Vec::new(),
        }
    }

    pub fn with_knots(points: Vec<Point>, knots: Vec<Point>) -> Self {
        Self { points, knots }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The control points the curve was built through
    pub fn knots(&self) -> &[Point] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Converts control points into [`CurveGeometry`]
#[derive(Debug, Clone)]
pub struct CurveBuilder {
    rect: InsetRect,
    samples_per_segment: usize,
}

impl CurveBuilder {
    pub fn new(rect: InsetRect) -> Self {
        Self {
            rect,
            samples_per_segment: SAMPLES_PER_SEGMENT,
        }
    }

    /// Override the sample density (mainly for tests)
    pub fn with_samples_per_segment(mut self, samples: usize) -> Self {
        self.samples_per_segment = samples.max(1);
        self
    }

    pub fn rect(&self) -> &InsetRect {
        &self.rect
    }

    /// Build the geometry for `points` (ordered left to right)
    ///
    /// Fewer than three points cannot bend, so they produce the straight
    /// polyline through themselves.
    pub fn build(&self, points: &[Point]) -> CurveGeometry {
        if points.len() < 3 {
            return CurveGeometry::with_knots(points.to_vec(), points.to_vec());
        }

        let segments = self.segments(points);
        let mut samples = Vec::with_capacity(segments.len() * self.samples_per_segment + 1);

        for segment in &segments {
            // t = 1 is skipped: the next segment's t = 0 is the same point
            for i in 0..self.samples_per_segment {
                let t = i as f64 / self.samples_per_segment as f64;
                samples.push(self.rect.clamp(segment.point_at(t)));
            }
        }

        // Land exactly on the last control point
        if let Some(last) = segments.last() {
            samples.push(self.rect.clamp(last.end));
        }

        trace!(
            "Built curve: {} control points, {} segments, {} samples",
            points.len(),
            segments.len(),
            samples.len()
        );
        CurveGeometry::with_knots(samples, points.to_vec())
    }

    /// The cubic segments through `points` (requires at least three points)
    pub fn segments(&self, points: &[Point]) -> Vec<CubicSegment> {
        let n = points.len();
        if n < 3 {
            return Vec::new();
        }

        let mut segments = Vec::with_capacity(n - 1);
        // Outgoing handle of the previous interior point
        let mut pending: Option<Point> = None;
        let mut start = points[0];

        for i in 0..=n - 3 {
            let left = points[i];
            let mid = points[i + 1];
            let right = points[i + 2];

            let (c_left, c_right) = tangent_handles(left, mid, right);

            if i == 0 {
                let first = boundary_handle(c_left, left, mid);
                segments.push(CubicSegment {
                    start,
                    control1: first,
                    control2: c_left,
                    end: mid,
                });
                start = mid;
            } else if let Some(control1) = pending {
                segments.push(CubicSegment {
                    start,
                    control1,
                    control2: c_left,
                    end: mid,
                });
                start = mid;
            }
            pending = Some(c_right);

            if i == n - 3 {
                let last = boundary_handle(c_right, right, mid);
                segments.push(CubicSegment {
                    start,
                    control1: c_right,
                    control2: last,
                    end: right,
                });
            }
        }

        segments
    }
}

/// `a / (a + b)`, or 0.5 when both lengths vanish
fn length_ratio(a: f64, b: f64) -> f64 {
    let total = a + b;
    if total < FLOAT_EPSILON {
        0.5
    } else {
        a / total
    }
}

/// Incoming and outgoing handles of `mid`
fn tangent_handles(left: Point, mid: Point, right: Point) -> (Point, Point) {
    let mid_lm = left.midpoint(mid);
    let mid_mr = mid.midpoint(right);
    let ratio = length_ratio(left.distance(mid), mid.distance(right));
    let d = mid_lm - mid_mr;

    let c_left = mid + d * ratio;
    let c_right = mid - d * (1.0 - ratio);
    (c_left, c_right)
}

/// Handle next to a boundary point, blended off the adjacent `handle`
///
/// `boundary` is the curve's true start or end, `interior` the control point
/// on the other side of `handle`.
fn boundary_handle(handle: Point, boundary: Point, interior: Point) -> Point {
    let toward_boundary = boundary.midpoint(handle);
    let toward_interior = handle.midpoint(interior);
    let ratio = length_ratio(handle.distance(boundary), handle.distance(interior));
    handle + (toward_boundary - toward_interior) * ratio
}
