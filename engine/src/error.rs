//! Errors surfaced across the crate boundary.
//!
//! Ground: the teacher repo's use of `thiserror` throughout its CLI error
//! paths. Most malformed input in this engine is logged and skipped rather
//! than propagated (spec §7, "most parse/dispatch failures are recoverable
//! and logged, not fatal") -- `Error` exists for the handful of conditions
//! that genuinely stop the whole operation: I/O failure and an unparsable
//! SVG document.

use thiserror::Error;

/// Crate-level error type. Both front-ends (G-code interpreter, SVG render
/// state) work entirely through `log::warn!`/`log::error!` for per-line or
/// per-element problems; this type is reserved for whole-document failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed svg document: {0}")]
    Svg(#[from] roxmltree::Error),

    /// A motion call was attempted on a [`crate::cutter::Cutter`] that
    /// hadn't been started, or had already been stopped.
    #[error("cutter is not running")]
    CutterNotRunning,
}
