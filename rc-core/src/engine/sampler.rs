//! Inverse lookup on the sampled curve
//!
//! Answers "what is y at this x" and "what is x at this y" by finding the
//! polyline segment that brackets the query and interpolating linearly along
//! it.
//!
//! Samples are clamped to the inset rectangle, so a handle that overshoots
//! leaves vertical or horizontal runs along the edges and the polyline can
//! fold back on itself. Several segments may then bracket the same query:
//! the last one wins, and on a zero-length span the end sitting at the query
//! is returned. A query that hits a control point returns that point.
//!
//! A query outside the curve's domain has no answer and yields `None`.

use crate::constants::geometry::FLOAT_EPSILON;
use crate::data::Point;
use crate::engine::CurveGeometry;

/// Read-only sampler over a [`CurveGeometry`]
#[derive(Debug, Clone, Copy)]
pub struct CurveSampler<'a> {
    points: &'a [Point],
    knots: &'a [Point],
}

impl<'a> CurveSampler<'a> {
    pub fn new(geometry: &'a CurveGeometry) -> Self {
        Self {
            points: geometry.points(),
            knots: geometry.knots(),
        }
    }

    /// The curve point with the given x
    pub fn at_x(&self, x: f64) -> Option<Point> {
        if !x.is_finite() {
            return None;
        }
        if let Some(knot) = self.knots.iter().find(|k| (k.x - x).abs() < FLOAT_EPSILON) {
            return Some(Point::new(x, knot.y));
        }
        if let [only] = self.points {
            return (only.x == x).then_some(*only);
        }

        self.points.windows(2).rev().find_map(|w| {
            let (a, b) = (w[0], w[1]);
            if x < a.x || x > b.x {
                return None;
            }
            let span = b.x - a.x;
            if span.abs() < FLOAT_EPSILON {
                let end = if (x - a.x).abs() < (x - b.x).abs() { a } else { b };
                return Some(Point::new(x, end.y));
            }
            let t = (x - a.x) / span;
            Some(Point::new(x, a.y + t * (b.y - a.y)))
        })
    }

    /// The curve point with the given y (pixel y falls along the curve)
    pub fn at_y(&self, y: f64) -> Option<Point> {
        if !y.is_finite() {
            return None;
        }
        if let Some(knot) = self.knots.iter().find(|k| (k.y - y).abs() < FLOAT_EPSILON) {
            return Some(Point::new(knot.x, y));
        }
        if let [only] = self.points {
            return (only.y == y).then_some(*only);
        }

        self.points.windows(2).rev().find_map(|w| {
            let (a, b) = (w[0], w[1]);
            if y > a.y || y < b.y {
                return None;
            }
            let span = b.y - a.y;
            if span.abs() < FLOAT_EPSILON {
                let end = if (y - a.y).abs() < (y - b.y).abs() { a } else { b };
                return Some(Point::new(end.x, y));
            }
            let t = (y - a.y) / span;
            Some(Point::new(a.x + t * (b.x - a.x), y))
        })
    }

    /// Vertical gap between `p` and the curve below/above it
    pub fn vertical_distance(&self, p: Point) -> Option<(f64, Point)> {
        self.at_x(p.x).map(|on_curve| ((p.y - on_curve.y).abs(), on_curve))
    }

    /// Horizontal gap between `p` and the curve left/right of it
    pub fn horizontal_distance(&self, p: Point) -> Option<(f64, Point)> {
        self.at_y(p.y).map(|on_curve| ((p.x - on_curve.x).abs(), on_curve))
    }
}
