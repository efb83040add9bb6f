//! Pixel space <-> percentage wire format
//!
//! Percentages are measured inside the inset rectangle with y flipped, so
//! `(0,0)` is the bottom-left corner and `(100,100)` the top-right one:
//!
//! - `x% = round((x - left) / inner_width * 100)`
//! - `y% = 100 - round((y - top) / inner_height * 100)`
//!
//! `cmd_state` samples the curve at nine evenly spaced x positions, converts
//! each y the same way, forces the sequence to be non-decreasing and appends
//! the terminal 100.

use rc_protocol::{
    format_auxiliary_curve, parse_auxiliary_curve, CurvePayload, PercentPoint, CMD_STATE_LEN,
    CMD_STATE_TERMINAL,
};
use tracing::trace;

use crate::constants::sampling::{DIVISIONS, PERCENT_SCALE, SAMPLE_COUNT};
use crate::data::{InsetRect, Point};
use crate::engine::CurveSampler;
use crate::error::{CurveError, Result};

/// Converts between pixel points and their wire representation
#[derive(Debug, Clone, Copy)]
pub struct PointCodec {
    rect: InsetRect,
}

impl PointCodec {
    pub fn new(rect: InsetRect) -> Self {
        Self { rect }
    }

    fn x_percent(&self, x: f64) -> u8 {
        to_percent((x - self.rect.left) / self.rect.inner_width() * PERCENT_SCALE)
    }

    fn y_percent(&self, y: f64) -> u8 {
        let down = (y - self.rect.top) / self.rect.inner_height() * PERCENT_SCALE;
        to_percent(PERCENT_SCALE - down.round())
    }

    pub fn encode_point(&self, p: Point) -> PercentPoint {
        PercentPoint::new(self.x_percent(p.x), self.y_percent(p.y))
    }

    pub fn decode_point(&self, p: PercentPoint) -> Point {
        let fx = f64::from(p.x) / PERCENT_SCALE;
        let fy = f64::from(p.y) / PERCENT_SCALE;
        Point::new(
            self.rect.left + fx * self.rect.inner_width(),
            self.rect.top + (1.0 - fy) * self.rect.inner_height(),
        )
    }

    /// Percentage string for the given interior points
    pub fn encode_points<I>(&self, interior: I) -> String
    where
        I: IntoIterator<Item = Point>,
    {
        let percents: Vec<PercentPoint> =
            interior.into_iter().map(|p| self.encode_point(p)).collect();
        format_auxiliary_curve(&percents)
    }

    /// Interior pixel points from a percentage string
    ///
    /// Only the syntax is checked here; ordering and bounds are up to the
    /// point store.
    pub fn decode(&self, s: &str) -> Result<Vec<Point>> {
        let percents =
            parse_auxiliary_curve(s).map_err(|e| CurveError::decode(e.pair, e.text, e.reason))?;
        Ok(percents.into_iter().map(|p| self.decode_point(p)).collect())
    }

    /// The nine x positions `cmd_state` samples at
    pub fn sample_positions(&self) -> [f64; SAMPLE_COUNT] {
        let step = self.rect.inner_width() / DIVISIONS as f64;
        std::array::from_fn(|i| self.rect.left + (i + 1) as f64 * step)
    }

    /// Derive the fixed-length `cmd_state` from the curve
    ///
    /// `points` are the control points, boundary points included. A sample
    /// position outside the curve takes the value of the nearest boundary
    /// point.
    pub fn cmd_state(&self, points: &[Point], sampler: &CurveSampler<'_>) -> [u8; CMD_STATE_LEN] {
        let mut state = [CMD_STATE_TERMINAL; CMD_STATE_LEN];
        let mut floor = 0u8;

        for (slot, x) in state.iter_mut().zip(self.sample_positions()) {
            let y = match sampler.at_x(x) {
                Some(p) => p.y,
                None => self.nearest_boundary_y(points, x),
            };
            let value = self.y_percent(y).max(floor);
            *slot = value;
            floor = value;
        }

        trace!("cmd_state {:?}", state);
        state
    }

    fn nearest_boundary_y(&self, points: &[Point], x: f64) -> f64 {
        match (points.first(), points.last()) {
            (Some(first), _) if x <= first.x => first.y,
            (_, Some(last)) => last.y,
            _ => self.rect.bottom,
        }
    }

    /// The full serialized curve
    pub fn serialize(&self, points: &[Point], sampler: &CurveSampler<'_>) -> CurvePayload {
        let interior = match points.len() {
            0..=2 => &[][..],
            n => &points[1..n - 1],
        };
        CurvePayload::new(
            self.cmd_state(points, sampler),
            self.encode_points(interior.iter().copied()),
        )
    }
}

fn to_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, PERCENT_SCALE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Canvas;
    use crate::engine::{CurveBuilder, CurveGeometry};
    use approx::assert_abs_diff_eq;

    fn rect() -> InsetRect {
        InsetRect::new(Canvas::new(300.0, 150.0), 7.0, 8.0).unwrap()
    }

    fn geometry_for(points: &[Point]) -> CurveGeometry {
        CurveBuilder::new(rect()).build(points)
    }

    #[test]
    fn test_decode_known_point() {
        let codec = PointCodec::new(rect());
        let points = codec.decode("47,40").unwrap();
        assert_eq!(points.len(), 1);
        assert_abs_diff_eq!(points[0].x, 141.42, epsilon = 1e-9);
        assert_abs_diff_eq!(points[0].y, 88.4, epsilon = 1e-9);
    }

    #[test]
    fn test_encode_point_rounds() {
        let codec = PointCodec::new(rect());
        assert_eq!(codec.encode_point(Point::new(141.42, 88.4)), PercentPoint::new(47, 40));
        // 49.6% rounds up, truncation would give 49
        assert_eq!(codec.encode_point(Point::new(7.0 + 2.86 * 49.6, 142.0)).x, 50);
        assert_eq!(codec.encode_point(rect().start()), PercentPoint::new(0, 0));
        assert_eq!(codec.encode_point(rect().end()), PercentPoint::new(100, 100));
    }

    #[test]
    fn test_decode_then_encode_is_stable() {
        let codec = PointCodec::new(rect());
        let s = "12,5;35,15;47,40;60,60;70,90";
        let points = codec.decode(s).unwrap();
        assert_eq!(codec.encode_points(points), s);
    }

    #[test]
    fn test_decode_empty_and_errors() {
        let codec = PointCodec::new(rect());
        assert!(codec.decode("").unwrap().is_empty());
        match codec.decode("47,40;abc") {
            Err(CurveError::Decode { pair, text, .. }) => {
                assert_eq!(pair, 1);
                assert_eq!(text, "abc");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(codec.decode("47,140").is_err());
    }

    #[test]
    fn test_cmd_state_straight_line() {
        let codec = PointCodec::new(rect());
        let points = [rect().start(), rect().end()];
        let geometry = geometry_for(&points);
        let state = codec.cmd_state(&points, &CurveSampler::new(&geometry));
        assert_eq!(state, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_cmd_state_shape_for_bent_curve() {
        let codec = PointCodec::new(rect());
        let mut points = vec![rect().start()];
        points.extend(codec.decode("47,40;60,60;70,90").unwrap());
        points.push(rect().end());
        let geometry = geometry_for(&points);

        let state = codec.cmd_state(&points, &CurveSampler::new(&geometry));
        assert_eq!(state.len(), CMD_STATE_LEN);
        assert_eq!(state[CMD_STATE_LEN - 1], 100);
        assert!(state.windows(2).all(|w| w[0] <= w[1]));
        assert!(rc_protocol::validate_cmd_state(&state).is_ok());
    }

    #[test]
    fn test_cmd_state_outside_domain_uses_boundary() {
        let codec = PointCodec::new(rect());
        // Endpoints pulled inward: x = 50..250
        let points = [Point::new(50.0, 120.0), Point::new(250.0, 30.0)];
        let geometry = CurveGeometry::from_points(points.to_vec());
        let state = codec.cmd_state(&points, &CurveSampler::new(&geometry));

        // x_1 = 35.6 lies left of the curve: value of (50,120)
        assert_eq!(state[0], codec.encode_point(points[0]).y);
        // x_9 = 264.4 lies right of it: value of (250,30)
        assert_eq!(state[8], codec.encode_point(points[1]).y);
        assert_eq!(state[9], 100);
    }

    #[test]
    fn test_serialize_excludes_boundary_points() {
        let codec = PointCodec::new(rect());
        let points = [rect().start(), rect().end()];
        let geometry = geometry_for(&points);
        let payload = codec.serialize(&points, &CurveSampler::new(&geometry));
        assert_eq!(payload.auxiliary_curve, "");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_sample_positions() {
        let positions = PointCodec::new(rect()).sample_positions();
        assert_abs_diff_eq!(positions[0], 35.6, epsilon = 1e-9);
        assert_abs_diff_eq!(positions[8], 264.4, epsilon = 1e-9);
    }
}
