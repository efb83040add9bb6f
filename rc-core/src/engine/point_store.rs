//! Ordered control point storage
//!
//! The store is the only owner of the control point list and keeps three
//! invariants at all times:
//!
//! 1. **Monotonicity**: x strictly increases and pixel y strictly decreases
//!    from one point to the next.
//! 2. **Bounds**: every point lies inside the inset rectangle.
//! 3. **Capacity**: at most `max_points` points, boundary points included.
//!
//! The first and last points are boundary points. They are created with the
//! store, can only be moved when endpoints are editable, and are never removed.

use tracing::{debug, trace};

use crate::data::{validate_control_points, ControlPoint, EngineConfig, InsetRect, Point, PointId};
use crate::error::Result;

/// Result of dragging a control point to a new location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The point now sits at the requested location
    Moved,
    /// The location left the point's cell, so the point was deleted
    Removed(PointId),
    /// Nothing changed (boundary point locked, bad index, refused drag)
    Rejected,
}

/// The neighbours a candidate x falls between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index a point inserted here would take
    pub index: usize,
    pub previous: Point,
    pub next: Point,
}

impl Bracket {
    /// Whether `p` lies strictly inside the rectangle spanned by the neighbours
    pub fn contains(&self, p: Point) -> bool {
        cell_contains(self.previous, self.next, p)
    }
}

/// Strict containment in the cell whose lower-left corner is `previous` and
/// upper-right corner is `next` (pixel y grows downward)
pub fn cell_contains(previous: Point, next: Point, p: Point) -> bool {
    p.x > previous.x && p.x < next.x && p.y < previous.y && p.y > next.y
}

/// Owner of the ordered control point list
#[derive(Debug, Clone)]
pub struct PointStore {
    rect: InsetRect,
    points: Vec<ControlPoint>,
    max_points: usize,
    endpoints_editable: bool,
    evict_on_cell_exit: bool,
    next_id: u64,
    revision: u64,
}

impl PointStore {
    /// Create a store holding only the two boundary points
    pub fn new(rect: InsetRect, config: &EngineConfig) -> Self {
        let mut store = Self {
            rect,
            points: Vec::with_capacity(config.max_point_count),
            max_points: config.max_point_count,
            endpoints_editable: config.endpoints_editable,
            evict_on_cell_exit: config.evict_on_cell_exit,
            next_id: 0,
            revision: 0,
        };
        let start = store.make_point(rect.start());
        let end = store.make_point(rect.end());
        store.points.push(start);
        store.points.push(end);
        store
    }

    /// Create a store from interior points; boundary points are added
    pub fn with_interior(
        rect: InsetRect,
        config: &EngineConfig,
        interior: &[Point],
    ) -> Result<Self> {
        let mut store = Self::new(rect, config);
        store.replace_interior(interior)?;
        Ok(store)
    }

    /// Replace every interior point at once
    ///
    /// The new list is validated as a whole; on error the store is unchanged.
    /// Boundary points keep their ids, interior points get fresh ones.
    pub fn replace_interior(&mut self, interior: &[Point]) -> Result<()> {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        let mut candidate = Vec::with_capacity(interior.len() + 2);
        candidate.push(first.point);
        candidate.extend_from_slice(interior);
        candidate.push(last.point);
        validate_control_points(&candidate, &self.rect, self.max_points)?;

        let mut points = Vec::with_capacity(candidate.len());
        points.push(first);
        for p in interior {
            let cp = self.make_point(*p);
            points.push(cp);
        }
        points.push(last);

        self.points = points;
        self.bump();
        Ok(())
    }

    fn make_point(&mut self, point: Point) -> ControlPoint {
        let id = PointId(self.next_id);
        self.next_id += 1;
        ControlPoint { id, point }
    }

    fn bump(&mut self) {
        self.revision += 1;
        trace!("Point store revision {}", self.revision);
    }

    /// Number of points, boundary points included (always at least 2)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Number of interior points
    pub fn interior_len(&self) -> usize {
        self.points.len() - 2
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= self.max_points
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn endpoints_editable(&self) -> bool {
        self.endpoints_editable
    }

    pub fn rect(&self) -> &InsetRect {
        &self.rect
    }

    /// Incremented on every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Snapshot of the locations, left to right
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().map(|cp| cp.point).collect()
    }

    /// Interior locations, left to right
    pub fn interior(&self) -> impl Iterator<Item = Point> + '_ {
        self.points[1..self.points.len() - 1].iter().map(|cp| cp.point)
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).map(|cp| cp.point)
    }

    pub fn first(&self) -> Point {
        self.points[0].point
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1].point
    }

    pub fn id_at(&self, index: usize) -> Option<PointId> {
        self.points.get(index).map(|cp| cp.id)
    }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|cp| cp.id == id)
    }

    pub fn is_boundary(&self, index: usize) -> bool {
        index == 0 || index == self.points.len() - 1
    }

    /// Find the neighbours bracketing `x`
    ///
    /// `next` is the first point whose x exceeds `x`. Returns `None` when `x`
    /// lies left of the first point or at/after the last one.
    pub fn bracket(&self, x: f64) -> Option<Bracket> {
        let index = self.points.iter().position(|cp| x < cp.point.x)?;
        if index == 0 {
            return None;
        }
        Some(Bracket {
            index,
            previous: self.points[index - 1].point,
            next: self.points[index].point,
        })
    }

    /// Insert `point` at `index`
    ///
    /// Fails (returns `None`) when the store is full, `index` is not an
    /// interior position, or the point is not strictly inside the cell of its
    /// would-be neighbours.
    pub fn insert(&mut self, index: usize, point: Point) -> Option<PointId> {
        if self.is_full() {
            debug!("Insert refused: store holds {} of {} points", self.len(), self.max_points);
            return None;
        }
        if index == 0 || index >= self.points.len() || !point.is_finite() {
            debug!("Insert refused: index {} is not an interior position", index);
            return None;
        }

        let previous = self.points[index - 1].point;
        let next = self.points[index].point;
        if !cell_contains(previous, next, point) {
            debug!("Insert refused: {} outside cell {} - {}", point, previous, next);
            return None;
        }

        let cp = self.make_point(point);
        self.points.insert(index, cp);
        self.bump();
        debug!("Inserted point {} at index {}: {}", cp.id, index, point);
        Some(cp.id)
    }

    /// Move the point at `index` to `location`
    ///
    /// An interior point dragged out of its cell is removed (or the drag is
    /// refused when eviction is disabled). Boundary points move only when
    /// endpoints are editable and the move keeps the invariants.
    pub fn move_point(&mut self, index: usize, location: Point) -> MoveOutcome {
        if index >= self.points.len() || !location.is_finite() {
            return MoveOutcome::Rejected;
        }

        let boundary = self.is_boundary(index);
        if boundary && !self.endpoints_editable {
            debug!("Boundary point {} is locked", index);
            return MoveOutcome::Rejected;
        }

        // Same spot: nothing to rebuild
        if self.points[index].point == location {
            return MoveOutcome::Moved;
        }

        if boundary {
            return self.move_boundary(index, location);
        }

        let previous = self.points[index - 1].point;
        let next = self.points[index + 1].point;
        if cell_contains(previous, next, location) {
            self.points[index].point = location;
            self.bump();
            return MoveOutcome::Moved;
        }

        if !self.evict_on_cell_exit {
            debug!(
                "Drag of index {} to {} refused: outside cell {} - {}",
                index, location, previous, next
            );
            return MoveOutcome::Rejected;
        }

        let removed = self.points.remove(index);
        self.bump();
        debug!(
            "Evicted point {} dragged to {} outside cell {} - {}",
            removed.id, location, previous, next
        );
        MoveOutcome::Removed(removed.id)
    }

    fn move_boundary(&mut self, index: usize, location: Point) -> MoveOutcome {
        if !self.rect.contains(location) {
            return MoveOutcome::Rejected;
        }

        let keeps_order = if index == 0 {
            let next = self.points[1].point;
            location.x < next.x && location.y > next.y
        } else {
            let previous = self.points[index - 1].point;
            location.x > previous.x && location.y < previous.y
        };
        if !keeps_order {
            debug!("Boundary move of index {} to {} would break ordering", index, location);
            return MoveOutcome::Rejected;
        }

        self.points[index].point = location;
        self.bump();
        MoveOutcome::Moved
    }

    /// Remove the interior point at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<ControlPoint> {
        if index >= self.points.len() || self.is_boundary(index) {
            return None;
        }
        let removed = self.points.remove(index);
        self.bump();
        debug!("Removed point {} at index {}", removed.id, index);
        Some(removed)
    }
}
