//! Dispatch one SVG `d` path attribute onto a [`RenderState`].
//!
//! Ground: the teacher's `apply_path` in `lib/src/converter/mod.rs`, which
//! walks `svgtypes::PathSegment` and calls the matching `Turtle` method;
//! here the target is [`RenderState`] instead, and arc/quadratic segments
//! go through [`crate::arc::elliptical_arc`] / [`crate::primitives::quadratic_to_cubic`]
//! rather than being flattened with a tolerance parameter.

use log::warn;
use svgtypes::PathSegment;

use super::RenderState;
use crate::arc::elliptical_arc;
use crate::cutter::Cutter;
use crate::geometry::Xy;
use crate::primitives::quadratic_to_cubic;

/// Parse and apply every segment of `d` in order, in document order. A
/// segment that fails to parse is logged and ends processing of this path
/// (the remainder of `d` after a syntax error is unrecoverable, same as
/// the original's `svg_parse` bailing out of a malformed path).
pub fn apply_path(state: &mut RenderState, d: &str) {
    for segment in svgtypes::PathParser::from(d) {
        let segment = match segment {
            Ok(s) => s,
            Err(e) => {
                warn!("malformed path data {d:?}: {e}");
                return;
            }
        };
        apply_segment(state, segment);
    }
}

fn resolve(state: &RenderState, abs: bool, x: f64, y: f64) -> Xy {
    if abs {
        Xy::new(x, y)
    } else {
        state.current_position + Xy::new(x, y)
    }
}

fn apply_segment(state: &mut RenderState, segment: PathSegment) {
    match segment {
        PathSegment::MoveTo { abs, x, y } => {
            let p = resolve(state, abs, x, y);
            state.move_to(p);
        }
        PathSegment::LineTo { abs, x, y } => {
            let p = resolve(state, abs, x, y);
            state.cut_to(p);
        }
        PathSegment::HorizontalLineTo { abs, x } => {
            let x = if abs { x } else { state.current_position.x + x };
            let p = Xy::new(x, state.current_position.y);
            state.cut_to(p);
        }
        PathSegment::VerticalLineTo { abs, y } => {
            let y = if abs { y } else { state.current_position.y + y };
            let p = Xy::new(state.current_position.x, y);
            state.cut_to(p);
        }
        PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
            let p0 = state.current_position;
            let c1 = resolve(state, abs, x1, y1);
            let c2 = resolve(state, abs, x2, y2);
            let p3 = resolve(state, abs, x, y);
            state.curve_to(p0, c1, c2, p3);
        }
        PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
            let p0 = state.current_position;
            let c1 = state.take_smooth_cubic_control();
            let c2 = resolve(state, abs, x2, y2);
            let p3 = resolve(state, abs, x, y);
            state.curve_to(p0, c1, c2, p3);
        }
        PathSegment::Quadratic { abs, x1, y1, x, y } => {
            let control = resolve(state, abs, x1, y1);
            let p3 = resolve(state, abs, x, y);
            let (p0, c1, c2, p3) = quadratic_to_cubic(state.current_position, control, p3);
            state.curve_to(p0, c1, c2, p3);
            // curve_to() above clears previous_quadratic_control (it has no
            // notion of the un-elevated quadratic control); restore it
            // afterwards so a following `T` command can reflect off it.
            state.previous_quadratic_control = Some(control);
        }
        PathSegment::SmoothQuadratic { abs, x, y } => {
            let control = state.take_smooth_quadratic_control();
            let p3 = resolve(state, abs, x, y);
            let (p0, c1, c2, p3) = quadratic_to_cubic(state.current_position, control, p3);
            state.curve_to(p0, c1, c2, p3);
            state.previous_quadratic_control = Some(control);
        }
        PathSegment::EllipticalArc {
            abs,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        } => {
            let current = state.current_position;
            let target = resolve(state, abs, x, y);
            elliptical_arc(current, target, rx, ry, x_axis_rotation, large_arc, sweep, |p0, p1, p2, p3| {
                state.curve_to(p0, p1, p2, p3);
            });
        }
        PathSegment::ClosePath { .. } => {
            state.close_path();
        }
    }
}
