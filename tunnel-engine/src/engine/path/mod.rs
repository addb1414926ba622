pub mod curve;
pub mod frames;

pub use curve::{CurveError, PathCurve};
pub use frames::{PathFrame, PathFrames};
