//! Curve editing session
//!
//! [`CurveEditor`] ties the point store, validity gate, spline builder,
//! sampler and codec together. It is what a UI drives: taps become
//! [`CurveEditor::try_insert`], drags become [`CurveEditor::try_move`], and
//! every successful edit rebuilds the curve and notifies subscribed
//! [`CurveListener`]s with the freshly serialized curve before returning.

use std::fmt;

use rc_protocol::{CurvePayload, CMD_STATE_LEN};
use tracing::{debug, trace};

use crate::data::{
    validate_config, Canvas, ControlPoint, CurveStroke, EngineConfig, InsetRect, Point, PointId,
};
use crate::engine::{
    CurveBuilder, CurveGeometry, CurveSampler, MoveOutcome, PointCodec, PointStore, Rejection,
    ValidityGate,
};
use crate::error::Result;

/// Receives the serialized curve after every successful edit
#[cfg_attr(test, mockall::automock)]
pub trait CurveListener {
    fn on_curve_changed(&self, cmd_state: [u8; CMD_STATE_LEN], auxiliary_curve: &str);
}

/// Where a replacement set of interior points comes from
#[derive(Debug, Clone, Copy)]
pub enum PointSource<'a> {
    /// Percentage string, `"x,y;x,y"`
    Percentages(&'a str),
    /// Interior points in pixel space, left to right
    Pixels(&'a [Point]),
}

pub struct CurveEditor {
    config: EngineConfig,
    store: PointStore,
    builder: CurveBuilder,
    gate: ValidityGate,
    codec: PointCodec,
    geometry: CurveGeometry,
    listeners: Vec<Box<dyn CurveListener>>,
}

impl fmt::Debug for CurveEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveEditor")
            .field("config", &self.config)
            .field("points", &self.store.control_points())
            .field("samples", &self.geometry.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CurveEditor {
    /// Start a session on `canvas` with only the two boundary points
    pub fn new(canvas: Canvas, config: EngineConfig) -> Result<Self> {
        validate_config(&config)?;
        let rect = InsetRect::new(canvas, config.inset_left, config.inset_top)?;

        let store = PointStore::new(rect, &config);
        let builder = CurveBuilder::new(rect);
        let geometry = builder.build(&store.points());

        debug!(
            "Curve editor on {}x{} canvas, inset rect {:?}, max {} points",
            canvas.width, canvas.height, rect, config.max_point_count
        );

        Ok(Self {
            gate: ValidityGate::new(&config),
            codec: PointCodec::new(rect),
            config,
            store,
            builder,
            geometry,
            listeners: Vec::new(),
        })
    }

    /// Start a session from an existing set of interior points
    pub fn with_points(
        canvas: Canvas,
        config: EngineConfig,
        source: PointSource<'_>,
    ) -> Result<Self> {
        let mut editor = Self::new(canvas, config)?;
        editor.set_points(source)?;
        Ok(editor)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rect(&self) -> &InsetRect {
        self.store.rect()
    }

    pub fn geometry(&self) -> &CurveGeometry {
        &self.geometry
    }

    pub fn codec(&self) -> &PointCodec {
        &self.codec
    }

    pub fn subscribe(&mut self, listener: Box<dyn CurveListener>) {
        self.listeners.push(listener);
    }

    /// Replace every interior point
    ///
    /// On error the curve is left untouched. Listeners are not notified: the
    /// caller supplied the curve and already knows it.
    pub fn set_points(&mut self, source: PointSource<'_>) -> Result<()> {
        let interior = match source {
            PointSource::Percentages(s) => self.codec.decode(s)?,
            PointSource::Pixels(points) => points.to_vec(),
        };
        self.store.replace_interior(&interior)?;
        self.rebuild();
        debug!("Curve replaced with {} interior points", interior.len());
        Ok(())
    }

    /// Insert a point near `location`, reporting why it was refused
    ///
    /// The stored point is `location` projected onto the current curve.
    pub fn insert(&mut self, location: Point) -> std::result::Result<PointId, Rejection> {
        let admission = {
            let sampler = CurveSampler::new(&self.geometry);
            self.gate.evaluate(&self.store, &sampler, location)?
        };

        let id = self
            .store
            .insert(admission.index, admission.snapped)
            .ok_or(Rejection::SnapOutsideCell { candidate: location })?;
        self.commit();
        Ok(id)
    }

    pub fn try_insert(&mut self, location: Point) -> bool {
        self.insert(location).is_ok()
    }

    /// Drag from empty space: insert the snapped point and return its id so
    /// the drag can continue with [`try_move`](Self::try_move)
    pub fn begin_drag_insert(&mut self, location: Point) -> Option<PointId> {
        self.insert(location).ok()
    }

    /// Drag the point at `index` to `location`
    pub fn try_move(&mut self, index: usize, location: Point) -> MoveOutcome {
        if !self.config.interaction_enabled {
            return MoveOutcome::Rejected;
        }

        let revision = self.store.revision();
        let outcome = self.store.move_point(index, location);
        if self.store.revision() != revision {
            self.commit();
        }
        outcome
    }

    /// Remove the interior point at `index`
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.config.interaction_enabled {
            return false;
        }
        if self.store.remove_at(index).is_none() {
            return false;
        }
        self.commit();
        true
    }

    /// Whether a touch at `location` belongs to the curve
    pub fn claims_touch(&self, location: Point) -> bool {
        let sampler = CurveSampler::new(&self.geometry);
        self.gate.claims(&self.store, &sampler, location)
    }

    pub fn serialize(&self) -> CurvePayload {
        let sampler = CurveSampler::new(&self.geometry);
        self.codec.serialize(&self.store.points(), &sampler)
    }

    pub fn sample_at_x(&self, x: f64) -> Option<Point> {
        CurveSampler::new(&self.geometry).at_x(x)
    }

    pub fn sample_at_y(&self, y: f64) -> Option<Point> {
        CurveSampler::new(&self.geometry).at_y(y)
    }

    /// Curve points at the given x positions, skipping positions off the curve
    pub fn sample_markers(&self, xs: &[f64]) -> Vec<Point> {
        let sampler = CurveSampler::new(&self.geometry);
        xs.iter().filter_map(|x| sampler.at_x(*x)).collect()
    }

    /// Curve points at the given y positions, skipping positions off the curve
    pub fn sample_markers_y(&self, ys: &[f64]) -> Vec<Point> {
        let sampler = CurveSampler::new(&self.geometry);
        ys.iter().filter_map(|y| sampler.at_y(*y)).collect()
    }

    /// Markers at the positions `cmd_state` is sampled at
    pub fn cmd_state_markers(&self) -> Vec<Point> {
        self.sample_markers(&self.codec.sample_positions())
    }

    pub fn stroke(&self) -> CurveStroke {
        CurveStroke {
            points: self.geometry.points().to_vec(),
            line_width: self.config.line_width,
        }
    }

    pub fn points(&self) -> Vec<Point> {
        self.store.points()
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        self.store.control_points()
    }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.store.index_of(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    fn rebuild(&mut self) {
        self.geometry = self.builder.build(&self.store.points());
        trace!(
            "Rebuilt geometry at revision {}: {} samples",
            self.store.revision(),
            self.geometry.len()
        );
    }

    fn commit(&mut self) {
        self.rebuild();
        if self.listeners.is_empty() {
            return;
        }

        let sampler = CurveSampler::new(&self.geometry);
        let cmd_state = self.codec.cmd_state(&self.store.points(), &sampler);
        let auxiliary_curve = self.codec.encode_points(self.store.interior());
        for listener in &self.listeners {
            listener.on_curve_changed(cmd_state, &auxiliary_curve);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_curve;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn canvas() -> Canvas {
        Canvas::new(300.0, 150.0)
    }

    fn editor() -> CurveEditor {
        CurveEditor::new(canvas(), EngineConfig::default()).unwrap()
    }

    fn smooth_editor() -> CurveEditor {
        CurveEditor::with_points(
            canvas(),
            EngineConfig::default(),
            PointSource::Percentages(default_curve::SMOOTH),
        )
        .unwrap()
    }

    fn assert_invariants(editor: &CurveEditor) {
        let rect = *editor.rect();
        let points = editor.points();
        assert!(points.len() >= 2 && points.len() <= editor.config().max_point_count);
        assert!(points.iter().all(|p| rect.contains(*p)));
        assert!(points.windows(2).all(|w| w[0].x < w[1].x && w[0].y > w[1].y));
    }

    #[test]
    fn test_new_editor_is_straight_line() {
        let editor = editor();
        let payload = editor.serialize();
        assert_eq!(payload.cmd_state, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(payload.auxiliary_curve, "");
        assert_eq!(editor.stroke().points, editor.points());
    }

    #[test]
    fn test_set_points_round_trip() {
        let editor = smooth_editor();
        assert_eq!(editor.len(), 5);
        assert_eq!(editor.serialize().auxiliary_curve, default_curve::SMOOTH);
    }

    #[test]
    fn test_set_points_failure_keeps_curve() {
        let mut editor = smooth_editor();
        let before = editor.points();
        assert!(editor.set_points(PointSource::Percentages("60,60;47,40")).is_err());
        assert!(editor.set_points(PointSource::Percentages("60;47,40")).is_err());
        assert!(editor
            .set_points(PointSource::Pixels(&[Point::new(400.0, 50.0)]))
            .is_err());
        assert_eq!(editor.points(), before);
    }

    fn assert_passes_through_control_points(editor: &CurveEditor) {
        let geometry = editor.geometry();
        assert_eq!(geometry.first(), editor.points().first().copied());
        assert_eq!(geometry.last(), editor.points().last().copied());
        for p in editor.points() {
            let on_curve = editor.sample_at_x(p.x).unwrap();
            assert_abs_diff_eq!(on_curve.y, p.y, epsilon = 1e-9);
            let on_curve = editor.sample_at_y(p.y).unwrap();
            assert_abs_diff_eq!(on_curve.x, p.x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_geometry_passes_through_control_points() {
        assert_passes_through_control_points(&smooth_editor());
    }

    #[test]
    fn test_curve_reaches_control_points_near_corners() {
        // Steep runs into the corners push the handles past the rectangle
        for s in ["99,1", "70,1", "1,99", "1,90;99,91", "50,1;51,99", "1,1;99,99"] {
            let editor = CurveEditor::with_points(
                canvas(),
                EngineConfig::default(),
                PointSource::Percentages(s),
            )
            .unwrap();
            assert_passes_through_control_points(&editor);
        }
    }

    #[test]
    fn test_insert_stores_projected_point() {
        let mut editor = editor();
        let id = editor.insert(Point::new(150.0, 85.0)).unwrap();
        let index = editor.index_of(id).unwrap();
        let stored = editor.points()[index];
        assert_eq!(stored.x, 150.0);
        assert_abs_diff_eq!(stored.y, 75.0, epsilon = 1e-9);
        assert_invariants(&editor);
    }

    #[test]
    fn test_rejected_insert_leaves_curve() {
        let mut editor = smooth_editor();
        let before = editor.points();
        assert!(!editor.try_insert(Point::new(30.0, 20.0)));
        assert!(!editor.try_insert(Point::new(1.0, 140.0)));
        assert_eq!(editor.points(), before);
    }

    #[test]
    fn test_drag_out_of_cell_removes_only_that_point() {
        let mut editor = smooth_editor();
        let ids: Vec<PointId> = editor.control_points().iter().map(|cp| cp.id).collect();

        let outcome = editor.try_move(2, Point::new(280.0, 10.0));
        assert_eq!(outcome, MoveOutcome::Removed(ids[2]));

        let remaining: Vec<PointId> = editor.control_points().iter().map(|cp| cp.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[1], ids[3], ids[4]]);
    }

    #[test]
    fn test_listener_notified_on_edits() {
        let mut editor = editor();
        let mut listener = MockCurveListener::new();
        listener
            .expect_on_curve_changed()
            .withf(|state, aux| state[CMD_STATE_LEN - 1] == 100 && aux.to_string() == "50,50")
            .times(1)
            .return_const(());
        listener
            .expect_on_curve_changed()
            .withf(|_, aux| aux.is_empty())
            .times(1)
            .return_const(());
        editor.subscribe(Box::new(listener));

        // x = 150 lies on the 50% column, y snaps onto the straight line
        let id = editor.insert(Point::new(150.0, 80.0)).unwrap();
        let index = editor.index_of(id).unwrap();
        assert!(editor.remove(index));
    }

    #[test]
    fn test_listener_silent_on_rejections_and_noops() {
        let mut editor = smooth_editor();
        let mut listener = MockCurveListener::new();
        listener.expect_on_curve_changed().times(0);
        editor.subscribe(Box::new(listener));

        let current = editor.points()[1];
        assert_eq!(editor.try_move(1, current), MoveOutcome::Moved);
        assert_eq!(editor.try_move(0, Point::new(20.0, 130.0)), MoveOutcome::Rejected);
        assert!(!editor.remove(0));
        assert!(!editor.try_insert(Point::new(30.0, 20.0)));
        editor
            .set_points(PointSource::Percentages(default_curve::EASE_IN))
            .unwrap();
    }

    #[test]
    fn test_interaction_disabled() {
        let config = EngineConfig::default().with_interaction_enabled(false);
        let mut editor =
            CurveEditor::with_points(canvas(), config, PointSource::Percentages("50,50")).unwrap();
        assert_eq!(editor.insert(Point::new(100.0, 100.0)), Err(Rejection::InteractionDisabled));
        assert_eq!(editor.try_move(1, Point::new(140.0, 80.0)), MoveOutcome::Rejected);
        assert!(!editor.remove(1));
        assert!(!editor.claims_touch(Point::new(150.0, 75.0)));
        assert_eq!(editor.len(), 3);
    }

    #[test]
    fn test_capacity() {
        let config = EngineConfig::default().with_max_point_count(3);
        let mut editor = CurveEditor::new(canvas(), config).unwrap();
        assert!(editor.try_insert(Point::new(150.0, 75.0)));
        assert!(editor.is_full());
        assert!(matches!(
            editor.insert(Point::new(250.0, 30.0)),
            Err(Rejection::CapacityReached { max: 3 })
        ));
    }

    #[test]
    fn test_begin_drag_insert_then_move() {
        let mut editor = editor();
        let id = editor.begin_drag_insert(Point::new(150.0, 80.0)).unwrap();
        let index = editor.index_of(id).unwrap();
        assert_eq!(editor.try_move(index, Point::new(160.0, 70.0)), MoveOutcome::Moved);
        assert_eq!(editor.points()[index], Point::new(160.0, 70.0));
        assert!(editor.begin_drag_insert(Point::new(20.0, 20.0)).is_none());
    }

    #[test]
    fn test_sample_markers_skip_misses() {
        let editor = editor();
        let markers = editor.sample_markers(&[0.0, 150.0, 400.0]);
        assert_eq!(markers.len(), 1);
        assert_eq!(editor.cmd_state_markers().len(), 9);
    }

    #[test]
    fn test_sample_markers_by_height() {
        let editor = editor();
        let markers = editor.sample_markers_y(&[75.0, 200.0, -1.0]);
        assert_eq!(markers.len(), 1);
        assert_abs_diff_eq!(markers[0].x, 150.0, epsilon = 1e-9);
        assert_eq!(markers[0].y, 75.0);
    }

    #[test]
    fn test_stroke_uses_line_width() {
        let config = EngineConfig::default().with_line_width(3.0);
        let editor = CurveEditor::new(canvas(), config).unwrap();
        assert_eq!(editor.stroke().line_width, 3.0);
    }

    #[test]
    fn test_rejects_bad_canvas_and_config() {
        assert!(CurveEditor::new(Canvas::new(10.0, 150.0), EngineConfig::default()).is_err());
        let config = EngineConfig::default().with_max_point_count(1);
        assert!(CurveEditor::new(canvas(), config).is_err());
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Insert(f64, f64),
        Move(usize, f64, f64),
        Remove(usize),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (0.0..300.0, 0.0..150.0).prop_map(|(x, y)| Edit::Insert(x, y)),
            (0usize..10, 0.0..300.0, 0.0..150.0).prop_map(|(i, x, y)| Edit::Move(i, x, y)),
            (0usize..10).prop_map(Edit::Remove),
        ]
    }

    /// Percentage strings for valid interior lists of up to seven points
    fn interior_strategy() -> impl Strategy<Value = String> {
        use proptest::collection::btree_set;

        (0usize..8)
            .prop_flat_map(|n| (btree_set(1u8..100, n), btree_set(1u8..100, n)))
            .prop_map(|(xs, ys)| {
                xs.iter()
                    .zip(ys.iter())
                    .map(|(x, y)| format!("{},{}", x, y))
                    .collect::<Vec<_>>()
                    .join(";")
            })
    }

    proptest! {
        #[test]
        fn prop_curve_passes_through_control_points(s in interior_strategy()) {
            let editor = CurveEditor::with_points(
                canvas(),
                EngineConfig::default(),
                PointSource::Percentages(&s),
            )
            .unwrap();
            for p in editor.points() {
                let on_curve = editor.sample_at_x(p.x).unwrap();
                prop_assert!((on_curve.y - p.y).abs() < 0.5, "{} at {}: {}", s, p, on_curve);
            }
        }

        #[test]
        fn prop_edits_keep_invariants(edits in proptest::collection::vec(edit_strategy(), 1..40)) {
            let mut editor = editor();
            for edit in edits {
                match edit {
                    Edit::Insert(x, y) => {
                        editor.try_insert(Point::new(x, y));
                    }
                    Edit::Move(i, x, y) => {
                        editor.try_move(i, Point::new(x, y));
                    }
                    Edit::Remove(i) => {
                        editor.remove(i);
                    }
                }
                assert_invariants(&editor);
                let payload = editor.serialize();
                prop_assert!(payload.validate().is_ok());
            }
        }

        #[test]
        fn prop_decode_encode_within_one(xs in proptest::collection::btree_set(1u8..100, 0..7)) {
            // Strictly rising y as well, so the set is a valid curve
            let s = xs
                .iter()
                .map(|x| format!("{},{}", x, x))
                .collect::<Vec<_>>()
                .join(";");
            let editor = CurveEditor::with_points(
                canvas(),
                EngineConfig::default(),
                PointSource::Percentages(&s),
            )
            .unwrap();
            let encoded = editor.serialize().auxiliary_curve;
            let back = rc_protocol::parse_auxiliary_curve(&encoded).unwrap();
            prop_assert_eq!(back.len(), xs.len());
            for (p, x) in back.iter().zip(xs.iter()) {
                prop_assert!((i16::from(p.x) - i16::from(*x)).abs() <= 1);
                prop_assert!((i16::from(p.y) - i16::from(*x)).abs() <= 1);
            }
        }
    }
}
