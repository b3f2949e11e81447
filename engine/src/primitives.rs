//! Normalize higher-order shape constructs into the engine's move/line/cubic
//! primitive stream.
//!
//! Ground: `quadratic_curve_callback`, `render_ellipse_callback` and
//! `render_rect_callback` in `original_source/util/svg_render.cpp`. Each
//! function here drives a [`Cutter`] directly rather than returning an
//! intermediate representation, matching the rest of the engine's
//! emit-as-you-go style (spec §4.3).

use crate::arc::elliptical_arc;
use crate::cutter::Cutter;
use crate::geometry::Xy;

/// Elevate a quadratic Bezier (`p0`, `control`, `p1`) to the cubic control
/// points `(p0, c1, c2, p1)` the engine's cubic primitive requires.
///
/// `c1 = p0 + 2/3*(control - p0)`, `c2 = p1 + 2/3*(control - p1)`: the
/// standard degree-elevation formula (spec §4.3 "Quadratic Bezier").
pub fn quadratic_to_cubic(p0: Xy, control: Xy, p1: Xy) -> (Xy, Xy, Xy, Xy) {
    let c1 = p0 + (control - p0) * (2.0 / 3.0);
    let c2 = p1 + (control - p1) * (2.0 / 3.0);
    (p0, c1, c2, p1)
}

/// Kappa: the control-point offset ratio that best approximates a circular
/// quarter arc with one cubic Bezier.
const KAPPA: f64 = 0.55228475;

/// Trace an ellipse centered at `center` with radii `(rx, ry)` as four
/// cubic Bezier quarter-arcs: right, top, left, bottom, back to right.
///
/// Deliberately does not call [`Cutter::move_to`] before the first curve --
/// the original renderer never did either, so the first `curve_to`'s `p0`
/// relies on whatever position preceded it (spec §9, "Ellipse initial
/// `move_to`"; retained rather than fixed).
pub fn ellipse(cutter: &mut dyn Cutter, center: Xy, rx: f64, ry: f64) {
    let k_rx = KAPPA * rx;
    let k_ry = KAPPA * ry;

    let right = center + Xy::new(rx, 0.0);
    let top = center + Xy::new(0.0, ry);
    let left = center + Xy::new(-rx, 0.0);
    let bottom = center + Xy::new(0.0, -ry);

    cutter.curve_to(
        right,
        right + Xy::new(0.0, k_ry),
        top + Xy::new(k_rx, 0.0),
        top,
    );
    cutter.curve_to(
        top,
        top + Xy::new(-k_rx, 0.0),
        left + Xy::new(0.0, k_ry),
        left,
    );
    cutter.curve_to(
        left,
        left + Xy::new(0.0, -k_ry),
        bottom + Xy::new(-k_rx, 0.0),
        bottom,
    );
    cutter.curve_to(
        bottom,
        bottom + Xy::new(k_rx, 0.0),
        right + Xy::new(0.0, -k_ry),
        right,
    );
}

/// Trace a plain (non-rounded) axis-aligned rectangle: move to the top
/// left corner, cut the other three corners, then close back to the
/// start. Ground: `render_rect_callback`'s `rx == 0 && ry == 0` branch.
pub fn rect(cutter: &mut dyn Cutter, x: f64, y: f64, width: f64, height: f64) {
    let top_left = Xy::new(x, y);
    let top_right = Xy::new(x + width, y);
    let bottom_right = Xy::new(x + width, y + height);
    let bottom_left = Xy::new(x, y + height);

    cutter.move_to(top_left);
    cutter.cut_to(top_right);
    cutter.cut_to(bottom_right);
    cutter.cut_to(bottom_left);
    cutter.cut_to(top_left);
}

/// Trace an axis-aligned rectangle with corner radii `(rx, ry)`, clamped to
/// at most half the rectangle's width/height. Falls back to [`rect`] when
/// both radii are zero. Ground: `render_rect_callback`'s rounded branch,
/// which reuses the elliptical arc routine once per corner.
pub fn rounded_rect(cutter: &mut dyn Cutter, x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) {
    let rx = rx.abs().min(width / 2.0);
    let ry = ry.abs().min(height / 2.0);

    if rx <= 0.0 && ry <= 0.0 {
        rect(cutter, x, y, width, height);
        return;
    }

    let start = Xy::new(x + rx, y);
    cutter.move_to(start);

    let top_right_before = Xy::new(x + width - rx, y);
    let top_right_after = Xy::new(x + width, y + ry);
    let bottom_right_before = Xy::new(x + width, y + height - ry);
    let bottom_right_after = Xy::new(x + width - rx, y + height);
    let bottom_left_before = Xy::new(x + rx, y + height);
    let bottom_left_after = Xy::new(x, y + height - ry);
    let top_left_before = Xy::new(x, y + ry);
    let top_left_after = start;

    cutter.cut_to(top_right_before);
    rounded_corner(cutter, top_right_before, top_right_after, rx, ry);
    cutter.cut_to(bottom_right_before);
    rounded_corner(cutter, bottom_right_before, bottom_right_after, rx, ry);
    cutter.cut_to(bottom_left_before);
    rounded_corner(cutter, bottom_left_before, bottom_left_after, rx, ry);
    cutter.cut_to(top_left_before);
    rounded_corner(cutter, top_left_before, top_left_after, rx, ry);
}

/// One quarter-turn corner of a rounded rectangle, traced with the same
/// elliptical arc approximator the SVG `A` path command uses
/// (`large_arc = false, sweep = true` in every case).
fn rounded_corner(cutter: &mut dyn Cutter, from: Xy, to: Xy, rx: f64, ry: f64) {
    elliptical_arc(from, to, rx, ry, 0.0, false, true, |p0, p1, p2, p3| {
        cutter.curve_to(p0, p1, p2, p3);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutter::{Primitive, RecordingCutter};
    use pretty_assertions::assert_eq;

    #[test]
    fn quadratic_elevation_matches_endpoints() {
        let p0 = Xy::new(0.0, 0.0);
        let control = Xy::new(1.0, 1.0);
        let p1 = Xy::new(2.0, 0.0);
        let (a, _c1, _c2, b) = quadratic_to_cubic(p0, control, p1);
        assert!(a.is_close(p0));
        assert!(b.is_close(p1));
    }

    /// S4 from spec §8: Q0=(0,0), Q1=(6,9), Q2=(12,0) elevates to cubic
    /// controls (4,6) and (8,6).
    #[test]
    fn quadratic_elevation_matches_spec_worked_example() {
        let q0 = Xy::new(0.0, 0.0);
        let q1 = Xy::new(6.0, 9.0);
        let q2 = Xy::new(12.0, 0.0);
        let (c0, c1, c2, c3) = quadratic_to_cubic(q0, q1, q2);
        assert!(c0.is_close(q0));
        assert!(c1.is_close(Xy::new(4.0, 6.0)));
        assert!(c2.is_close(Xy::new(8.0, 6.0)));
        assert!(c3.is_close(q2));
    }

    #[test]
    fn ellipse_emits_four_curves_with_no_leading_move() {
        let mut cutter = RecordingCutter::new();
        cutter.start();
        ellipse(&mut cutter, Xy::ZERO, 2.0, 1.0);
        assert_eq!(cutter.primitives.len(), 4);
        assert!(cutter
            .primitives
            .iter()
            .all(|p| matches!(p, Primitive::CurveTo(..))));
    }

    /// S6 from spec §8: a radius-less rect emits exactly move_to + 3
    /// cut_to + a closing cut_to, in perimeter order.
    #[test]
    fn s6_rectangle_without_radii() {
        let mut cutter = RecordingCutter::new();
        cutter.start();
        rect(&mut cutter, 0.0, 0.0, 2.0, 3.0);
        assert_eq!(
            cutter.primitives,
            vec![
                Primitive::MoveTo(Xy::new(0.0, 0.0)),
                Primitive::CutTo(Xy::new(2.0, 0.0)),
                Primitive::CutTo(Xy::new(2.0, 3.0)),
                Primitive::CutTo(Xy::new(0.0, 3.0)),
                Primitive::CutTo(Xy::new(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn plain_rect_closes_back_to_start() {
        let mut cutter = RecordingCutter::new();
        cutter.start();
        rect(&mut cutter, 0.0, 0.0, 4.0, 2.0);
        assert_eq!(cutter.primitives.len(), 5);
        assert_eq!(cutter.primitives[0], Primitive::MoveTo(Xy::new(0.0, 0.0)));
        assert_eq!(
            *cutter.primitives.last().unwrap(),
            Primitive::CutTo(Xy::new(0.0, 0.0))
        );
    }

    #[test]
    fn rounded_rect_with_zero_radii_falls_back_to_plain_rect() {
        let mut a = RecordingCutter::new();
        a.start();
        rounded_rect(&mut a, 0.0, 0.0, 4.0, 2.0, 0.0, 0.0);

        let mut b = RecordingCutter::new();
        b.start();
        rect(&mut b, 0.0, 0.0, 4.0, 2.0);

        assert_eq!(a.primitives, b.primitives);
    }

    #[test]
    fn rounded_rect_traces_a_closed_path() {
        let mut cutter = RecordingCutter::new();
        cutter.start();
        rounded_rect(&mut cutter, 0.0, 0.0, 10.0, 6.0, 1.0, 1.0);
        let first = match cutter.primitives.first().unwrap() {
            Primitive::MoveTo(p) => *p,
            other => panic!("expected MoveTo, got {other:?}"),
        };
        let last_end = match cutter.primitives.last().unwrap() {
            Primitive::CurveTo(_, _, _, p3) => *p3,
            other => panic!("expected CurveTo, got {other:?}"),
        };
        assert!(first.is_close(last_end));
    }

    #[test]
    fn rounded_rect_clamps_radii_larger_than_half_dimension() {
        let mut cutter = RecordingCutter::new();
        cutter.start();
        // radii far larger than the rectangle itself must clamp, not panic
        // or produce an inverted path.
        rounded_rect(&mut cutter, 0.0, 0.0, 4.0, 2.0, 100.0, 100.0);
        assert!(!cutter.primitives.is_empty());
    }
}
