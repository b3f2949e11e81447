//! Parse an SVG `transform` attribute into a single composed [`Affine`].
//!
//! Ground: `svgtypes::TransformListParser`, used the same way the teacher's
//! converter parses `transform` attributes, composed right-to-left per the
//! SVG spec (the rightmost function in the list is applied to points
//! first).

use svgtypes::{TransformListParser, TransformListToken};

use crate::geometry::Affine;

/// Parse `raw` (the attribute's string value) and return the single
/// [`Affine`] equivalent to applying every listed function in order.
pub fn parse_transform_list(raw: &str) -> Result<Affine, svgtypes::Error> {
    let mut composed = Affine::IDENTITY;
    for token in TransformListParser::from(raw) {
        let next = token_to_affine(token?);
        composed = composed.then(&next);
    }
    Ok(composed)
}

fn token_to_affine(token: TransformListToken) -> Affine {
    match token {
        TransformListToken::Matrix { a, b, c, d, e, f } => Affine::new(a, b, c, d, e, f),
        TransformListToken::Translate { tx, ty } => Affine::translation(tx, ty),
        TransformListToken::Scale { sx, sy } => Affine::scale(sx, sy),
        TransformListToken::Rotate { angle } => {
            let (sin, cos) = angle.to_radians().sin_cos();
            Affine::new(cos, sin, -sin, cos, 0.0, 0.0)
        }
        TransformListToken::SkewX { angle } => Affine::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0),
        TransformListToken::SkewY { angle } => Affine::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0),
    }
}
