//! Geometric rules for placing new control points
//!
//! A candidate location is admitted in two steps:
//!
//! 1. **Cell containment**: it must lie strictly inside the rectangle spanned
//!    by the control points left and right of it.
//! 2. **Proximity**: its vertical or horizontal distance to the curve must be
//!    below the effective distance (line width + margin).
//!
//! An admitted candidate is snapped onto the curve along the axis with the
//! smaller distance, so the stored point always lies on the current curve.
//! The same rules decide whether an ambiguous touch belongs to the curve.

use tracing::debug;

use crate::data::{EngineConfig, Point};
use crate::engine::{Bracket, CurveSampler, PointStore};

/// Axis along which a candidate was projected onto the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAxis {
    /// Kept the candidate's x, took the curve's y
    Vertical,
    /// Kept the candidate's y, took the curve's x
    Horizontal,
}

/// An accepted candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Admission {
    /// Index the new point takes in the control point list
    pub index: usize,
    /// The curve point actually inserted
    pub snapped: Point,
    pub axis: SnapAxis,
}

/// Why a candidate was turned away
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("editing is disabled")]
    InteractionDisabled,

    #[error("curve already holds the maximum of {max} points")]
    CapacityReached { max: usize },

    #[error("candidate {candidate} has no neighbouring points on both sides")]
    NoCell { candidate: Point },

    #[error("candidate {candidate} lies outside the cell {previous} - {next}")]
    OutsideCell {
        candidate: Point,
        previous: Point,
        next: Point,
    },

    #[error("candidate {candidate} is too far from the curve (limit {limit:.1}px)")]
    TooFar { candidate: Point, limit: f64 },

    #[error("projection of {candidate} onto the curve leaves its cell")]
    SnapOutsideCell { candidate: Point },
}

/// The insertion predicate
#[derive(Debug, Clone, Copy)]
pub struct ValidityGate {
    effective_distance: f64,
    interaction_enabled: bool,
}

impl ValidityGate {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            effective_distance: config.effective_distance(),
            interaction_enabled: config.interaction_enabled,
        }
    }

    pub fn effective_distance(&self) -> f64 {
        self.effective_distance
    }

    /// Decide whether `candidate` may become a new control point
    pub fn evaluate(
        &self,
        store: &PointStore,
        sampler: &CurveSampler<'_>,
        candidate: Point,
    ) -> Result<Admission, Rejection> {
        if !self.interaction_enabled {
            return Err(Rejection::InteractionDisabled);
        }
        if store.is_full() {
            return Err(Rejection::CapacityReached {
                max: store.max_points(),
            });
        }
        self.locate(store, sampler, candidate)
    }

    /// Geometry-only part of [`evaluate`](Self::evaluate), ignoring capacity
    pub fn locate(
        &self,
        store: &PointStore,
        sampler: &CurveSampler<'_>,
        candidate: Point,
    ) -> Result<Admission, Rejection> {
        let bracket = self.cell_for(store, candidate)?;

        let vertical = sampler.vertical_distance(candidate);
        let horizontal = sampler.horizontal_distance(candidate);

        let within = |d: &Option<(f64, Point)>| {
            matches!(d, Some((dist, _)) if *dist < self.effective_distance)
        };
        if !within(&vertical) && !within(&horizontal) {
            debug!(
                "Candidate {} in cell but not within {:.1}px: vertical {:?}, horizontal {:?}",
                candidate,
                self.effective_distance,
                vertical.map(|(d, _)| d),
                horizontal.map(|(d, _)| d)
            );
            return Err(Rejection::TooFar {
                candidate,
                limit: self.effective_distance,
            });
        }

        // Closest projection first; a tie goes to the horizontal one
        let mut options: Vec<(f64, Point, SnapAxis)> = Vec::with_capacity(2);
        if let Some((d, p)) = vertical.filter(|_| within(&vertical)) {
            options.push((d, p, SnapAxis::Vertical));
        }
        if let Some((d, p)) = horizontal.filter(|_| within(&horizontal)) {
            options.push((d, p, SnapAxis::Horizontal));
        }
        options.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.2 == SnapAxis::Vertical).cmp(&(b.2 == SnapAxis::Vertical)))
        });

        for (distance, snapped, axis) in options {
            if bracket.contains(snapped) {
                debug!(
                    "Candidate {} accepted at index {}, snapped {:?} by {:.1}px to {}",
                    candidate, bracket.index, axis, distance, snapped
                );
                return Ok(Admission {
                    index: bracket.index,
                    snapped,
                    axis,
                });
            }
        }

        debug!("Candidate {} snapped outside its cell", candidate);
        Err(Rejection::SnapOutsideCell { candidate })
    }

    /// Whether a touch at `location` should be handled by the curve editor
    pub fn claims(&self, store: &PointStore, sampler: &CurveSampler<'_>, location: Point) -> bool {
        self.interaction_enabled && self.locate(store, sampler, location).is_ok()
    }

    fn cell_for(&self, store: &PointStore, candidate: Point) -> Result<Bracket, Rejection> {
        if !candidate.is_finite() {
            return Err(Rejection::NoCell { candidate });
        }
        let bracket = store.bracket(candidate.x).ok_or_else(|| {
            debug!("Candidate {} has no bracketing points", candidate);
            Rejection::NoCell { candidate }
        })?;

        if !bracket.contains(candidate) {
            debug!(
                "Candidate {} outside cell: previous {} next {}",
                candidate, bracket.previous, bracket.next
            );
            return Err(Rejection::OutsideCell {
                candidate,
                previous: bracket.previous,
                next: bracket.next,
            });
        }
        Ok(bracket)
    }
}
