//! Curve editing engine
//!
//! Point storage, insertion rules, spline construction, inverse sampling and
//! the wire codec, plus the editor session that drives them.

mod builder;
mod codec;
mod editor;
mod point_store;
mod sampler;
mod validity;

pub use builder::{CubicSegment, CurveBuilder, CurveGeometry};
pub use codec::PointCodec;
pub use editor::{CurveEditor, CurveListener, PointSource};
pub use point_store::{cell_contains, Bracket, MoveOutcome, PointStore};
pub use sampler::CurveSampler;
pub use validity::{Admission, Rejection, SnapAxis, ValidityGate};
