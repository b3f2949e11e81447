//! SVG front-end: walk a parsed SVG document and drive a [`Cutter`] through
//! the running transform.
//!
//! Ground: `svg_render_state_t` in `original_source/util/svg_render.hpp` /
//! `svg_render.cpp` for [`RenderState`], and the depth-first DOM stack walk
//! in the teacher's `lib/src/converter/mod.rs::svg2program` for
//! [`render_document`]. Style, text, image, gradient and filter callbacks
//! in the original are all no-ops that still recurse into their element's
//! children; this module does the same by simply not special-casing those
//! tag names.

use log::{debug, trace, warn};
use roxmltree::Node;

use crate::cutter::Cutter;
use crate::geometry::{Affine, Xy};
use crate::primitives::{rect, rounded_rect};

mod path;
mod transform;

pub use path::apply_path;
pub use transform::parse_transform_list;

/// Configuration for the SVG front-end. Ground: `draw_svg.cpp`'s
/// `svg_render_state_t state(c, 0.5)` call, where `0.5` is a paper-padding
/// constant in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvgRenderConfig {
    pub paper_padding: f64,
}

impl Default for SvgRenderConfig {
    fn default() -> Self {
        Self { paper_padding: 0.5 }
    }
}

/// Tracks the running transform and current position while walking an SVG
/// document, and forwards transformed motion to an inner [`Cutter`].
///
/// Implements [`Cutter`] itself so the primitive-normalizing helpers in
/// [`crate::primitives`] and the arc approximators in [`crate::arc`] can
/// drive it exactly as they would drive the device directly.
pub struct RenderState<'c> {
    inner: &'c mut dyn Cutter,
    /// The single running transform. `set_transform` replaces this outright
    /// rather than composing with it (spec §9, "SVG `set_transform`
    /// replaces rather than composes"): there is deliberately no stack, so
    /// a transform set on a nested element remains in effect for every
    /// sibling and ancestor visited afterwards. This is a defect inherited
    /// from the original renderer and is retained, not fixed.
    pub transform: Affine,
    /// Current position in SVG user-space coordinates, i.e. before
    /// `transform` and the paper-padding/unit-scale step are applied.
    pub current_position: Xy,
    pub last_moved_to: Xy,
    paper_padding: f64,
    previous_cubic_control: Option<Xy>,
    previous_quadratic_control: Option<Xy>,
}

impl<'c> RenderState<'c> {
    pub fn new(inner: &'c mut dyn Cutter, config: SvgRenderConfig) -> Self {
        Self {
            inner,
            transform: Affine::IDENTITY,
            current_position: Xy::ZERO,
            last_moved_to: Xy::ZERO,
            paper_padding: config.paper_padding,
            previous_cubic_control: None,
            previous_quadratic_control: None,
        }
    }

    /// Map an SVG user-space point to device inches: apply the running
    /// transform, scale by the 100-units-per-inch device convention, then
    /// add the paper padding to `y`. Ground: `svg_render_state_t::apply_transform`.
    fn to_device(&self, p: Xy) -> Xy {
        let t = self.transform.apply(p);
        Xy::new(t.x / 100.0, t.y / 100.0 + self.paper_padding)
    }

    /// Replace the running transform outright. Ground:
    /// `svg_render_state_t::set_transform`.
    pub fn set_transform(&mut self, t: Affine) {
        self.transform = t;
    }

    pub fn close_path(&mut self) {
        let target = self.last_moved_to;
        self.cut_to(target);
    }

    fn take_smooth_cubic_control(&mut self) -> Xy {
        self.previous_cubic_control
            .map(|c| self.current_position * 2.0 - c)
            .unwrap_or(self.current_position)
    }

    fn take_smooth_quadratic_control(&mut self) -> Xy {
        self.previous_quadratic_control
            .map(|c| self.current_position * 2.0 - c)
            .unwrap_or(self.current_position)
    }
}

impl Cutter for RenderState<'_> {
    fn start(&mut self) -> bool {
        self.inner.start()
    }

    fn stop(&mut self) -> bool {
        self.inner.stop()
    }

    fn move_to(&mut self, p: Xy) -> bool {
        let device = self.to_device(p);
        self.current_position = p;
        self.last_moved_to = p;
        self.previous_cubic_control = None;
        self.previous_quadratic_control = None;
        self.inner.move_to(device)
    }

    fn cut_to(&mut self, p: Xy) -> bool {
        let device = self.to_device(p);
        self.current_position = p;
        self.previous_cubic_control = None;
        self.previous_quadratic_control = None;
        self.inner.cut_to(device)
    }

    fn curve_to(&mut self, p0: Xy, p1: Xy, p2: Xy, p3: Xy) -> bool {
        let d0 = self.to_device(p0);
        let d1 = self.to_device(p1);
        let d2 = self.to_device(p2);
        let d3 = self.to_device(p3);
        self.current_position = p3;
        self.previous_cubic_control = Some(p2);
        self.previous_quadratic_control = None;
        self.inner.curve_to(d0, d1, d2, d3)
    }
}

fn attr_f64(node: &Node, name: &str, default: f64) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim_end_matches("px").trim().parse::<f64>().ok())
        .unwrap_or(default)
}

/// Walk `document` depth-first from its root, driving `cutter` through an
/// internal [`RenderState`]. Ground: `svg2program`'s stack-based traversal
/// in the teacher, and every `render_*`/`*_callback` function wired up in
/// `original_source/util/draw_svg.cpp`.
pub fn render_document(document: &roxmltree::Document, cutter: &mut dyn Cutter, config: SvgRenderConfig) {
    let mut state = RenderState::new(cutter, config);
    state.start();

    if let Some(root) = document.root().first_element_child() {
        apply_view_box(&mut state, &root);
        visit(&mut state, &root);
    }

    state.stop();
}

/// If the root `<svg>` carries a `viewBox`, derive the scale/translate
/// needed to map it onto the element's own `width`/`height` and install it
/// as the initial transform. Falls back to the identity transform if
/// either attribute is missing or unparsable -- this is an enrichment over
/// the original, which never saw anything but device-native coordinates.
fn apply_view_box(state: &mut RenderState, root: &Node) {
    let Some(view_box) = root.attribute("viewBox") else {
        return;
    };
    let parts: Vec<f64> = view_box
        .split([' ', ','])
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();
    let [min_x, min_y, vb_width, vb_height] = match parts[..] {
        [a, b, c, d] => [a, b, c, d],
        _ => {
            warn!("unparsable viewBox {view_box:?}, ignoring");
            return;
        }
    };
    if vb_width <= 0.0 || vb_height <= 0.0 {
        return;
    }

    let width = attr_f64(root, "width", vb_width);
    let height = attr_f64(root, "height", vb_height);
    let scale = Affine::new(width / vb_width, 0.0, 0.0, height / vb_height, 0.0, 0.0);
    let translate = Affine::translation(-min_x, -min_y);
    state.set_transform(scale.then(&translate));
}

fn visit(state: &mut RenderState, node: &Node) {
    if node.is_element() {
        if let Some(raw) = node.attribute("transform") {
            match parse_transform_list(raw) {
                Ok(t) => state.set_transform(t),
                Err(e) => warn!("unparsable transform {raw:?}: {e}"),
            }
        }

        match node.tag_name().name() {
            "path" => {
                if let Some(d) = node.attribute("d") {
                    apply_path(state, d);
                } else {
                    debug!("<path> with no d attribute, ignoring");
                }
            }
            "rect" => render_rect(state, node),
            "circle" => render_circle(state, node),
            "ellipse" => render_ellipse(state, node),
            "line" => render_line(state, node),
            "polyline" => render_poly(state, node, false),
            "polygon" => render_poly(state, node, true),
            // groups and every style/text/image/filter/gradient element:
            // no-op, but still recurse into children.
            _ => trace!("visiting <{}>", node.tag_name().name()),
        }
    }

    for child in node.children() {
        visit(state, &child);
    }
}

fn render_rect(state: &mut RenderState, node: &Node) {
    let x = attr_f64(node, "x", 0.0);
    let y = attr_f64(node, "y", 0.0);
    let width = attr_f64(node, "width", 0.0);
    let height = attr_f64(node, "height", 0.0);
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let rx: Option<f64> = node.attribute("rx").and_then(|v| v.parse().ok());
    let ry: Option<f64> = node.attribute("ry").and_then(|v| v.parse().ok());
    match (rx, ry) {
        (None, None) => rect(state, x, y, width, height),
        // SVG rect: an unspecified rx/ry defaults to whichever of the pair
        // was given.
        (rx, ry) => {
            let rx = rx.or(ry).unwrap_or(0.0);
            let ry = ry.or(Some(rx)).unwrap_or(0.0);
            rounded_rect(state, x, y, width, height, rx, ry)
        }
    }
}

fn render_circle(state: &mut RenderState, node: &Node) {
    let cx = attr_f64(node, "cx", 0.0);
    let cy = attr_f64(node, "cy", 0.0);
    let r = attr_f64(node, "r", 0.0);
    if r <= 0.0 {
        return;
    }
    crate::primitives::ellipse(state, Xy::new(cx, cy), r, r);
}

fn render_ellipse(state: &mut RenderState, node: &Node) {
    let cx = attr_f64(node, "cx", 0.0);
    let cy = attr_f64(node, "cy", 0.0);
    let rx = attr_f64(node, "rx", 0.0);
    let ry = attr_f64(node, "ry", 0.0);
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    crate::primitives::ellipse(state, Xy::new(cx, cy), rx, ry);
}

fn render_line(state: &mut RenderState, node: &Node) {
    let x1 = attr_f64(node, "x1", 0.0);
    let y1 = attr_f64(node, "y1", 0.0);
    let x2 = attr_f64(node, "x2", 0.0);
    let y2 = attr_f64(node, "y2", 0.0);
    state.move_to(Xy::new(x1, y1));
    state.cut_to(Xy::new(x2, y2));
}

fn render_poly(state: &mut RenderState, node: &Node, close: bool) {
    let Some(points) = node.attribute("points") else {
        return;
    };
    let values: Vec<f64> = points
        .split([' ', ','])
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();
    let mut pairs = values.chunks_exact(2).map(|c| Xy::new(c[0], c[1]));
    let Some(first) = pairs.next() else { return };
    state.move_to(first);
    for p in pairs {
        state.cut_to(p);
    }
    if close {
        state.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutter::{Primitive, RecordingCutter};
    use pretty_assertions::assert_eq;

    /// S5 from spec §8: move_to(1,1); cut_to(5,1); cut_to(5,5); close_path
    /// emits a final cut_to(1,1) -- the last `move_to` target, not (0,0).
    #[test]
    fn s5_close_path_cuts_back_to_last_moved_to() {
        let mut cutter = RecordingCutter::new();
        cutter.start();
        let mut state = RenderState::new(&mut cutter, SvgRenderConfig { paper_padding: 0.0 });
        state.move_to(Xy::new(1.0, 1.0));
        state.cut_to(Xy::new(5.0, 1.0));
        state.cut_to(Xy::new(5.0, 5.0));
        state.close_path();
        match cutter.primitives.last().unwrap() {
            Primitive::CutTo(p) => assert!(p.is_close(Xy::new(0.01, 0.01))),
            other => panic!("expected CutTo, got {other:?}"),
        }
    }

    #[test]
    fn plain_rect_element_produces_closed_path() {
        let xml = r#"<svg><rect x="0" y="0" width="10" height="5"/></svg>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut cutter = RecordingCutter::new();
        render_document(&doc, &mut cutter, SvgRenderConfig::default());
        assert!(cutter.primitives.first().is_some());
        assert!(matches!(cutter.primitives[0], Primitive::MoveTo(_)));
    }

    #[test]
    fn transform_on_nested_element_leaks_to_siblings() {
        // reproduces the retained "set_transform replaces, no stack" defect:
        // a transform on the first rect still applies to the second.
        let xml = r#"<svg>
            <g>
                <rect transform="translate(10 0)" x="0" y="0" width="1" height="1"/>
            </g>
            <rect x="0" y="0" width="1" height="1"/>
        </svg>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut cutter = RecordingCutter::new();
        render_document(&doc, &mut cutter, SvgRenderConfig::default());
        let move_tos: Vec<Xy> = cutter
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::MoveTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(move_tos.len(), 2);
        // both rects start at the same transformed x, because the
        // translate from the first rect was never undone.
        assert!((move_tos[0].x - move_tos[1].x).abs() < 1e-9);
    }

    #[test]
    fn ellipse_element_does_not_emit_a_leading_move_to() {
        let xml = r#"<svg><ellipse cx="5" cy="5" rx="2" ry="1"/></svg>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut cutter = RecordingCutter::new();
        render_document(&doc, &mut cutter, SvgRenderConfig::default());
        assert!(!cutter.primitives.is_empty());
        assert!(matches!(cutter.primitives[0], Primitive::CurveTo(..)));
    }
}
