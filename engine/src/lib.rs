//! Path geometry engine for an XY cutting plotter.
//!
//! Two front-ends -- a G-code interpreter ([`gcode`]) and an SVG renderer
//! ([`svg`]) -- both normalize their input down to the same move/line/cubic
//! primitive stream, expressed through the [`cutter::Cutter`] trait. Arc and
//! quadratic-Bezier approximation ([`arc`], [`primitives`]) are shared by
//! both front-ends; [`geometry`] is the shared point/affine-transform
//! kernel underneath everything.

pub mod arc;
pub mod cutter;
pub mod error;
pub mod gcode;
pub mod geometry;
pub mod primitives;
pub mod svg;

pub use cutter::Cutter;
pub use error::Error;
pub use geometry::{Affine, Xy};
