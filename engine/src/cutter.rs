//! The capability both front-ends target: an abstract cutting device.
//!
//! Ground: `Device::Generic` in `device_sim.cpp`/`device_c.hpp` from the
//! original implementation, re-architected per spec §9 ("Polymorphic cutter
//! back-end") as a single trait instead of a virtual base class. The G-code
//! interpreter and the SVG render state each hold a `&mut dyn Cutter` (or a
//! generic `C: Cutter`) for their lifetime; there is no ownership transfer.

use crate::geometry::Xy;

/// An XY cutting device: pen/blade carriage over a 2-D surface.
///
/// Coordinates passed to every method are device inches, origin
/// device-defined, positive up and right (spec §3).
///
/// All motion methods return `false` if called before [`Cutter::start`] or
/// after [`Cutter::stop`]; implementations are not required to validate
/// anything else (e.g. that `curve_to`'s `p0` matches the current
/// position -- callers must guarantee that, per spec §3).
pub trait Cutter {
    /// Transition the device to running. Motion calls are only effective
    /// after this succeeds.
    fn start(&mut self) -> bool;

    /// Terminal: motion calls after `stop` fail or are ignored.
    fn stop(&mut self) -> bool;

    /// Pen-up rapid move to `p`.
    fn move_to(&mut self, p: Xy) -> bool;

    /// Pen-down straight cut to `p`.
    fn cut_to(&mut self, p: Xy) -> bool;

    /// Pen-down cubic Bezier cut from `p0` (which must equal the current
    /// position) through controls `p1, p2` to `p3`.
    fn curve_to(&mut self, p0: Xy, p1: Xy, p2: Xy, p3: Xy) -> bool;
}

/// A [`Cutter`] that records every primitive it receives, for tests and for
/// driving the engine without any real or simulated hardware.
///
/// Ground: there is no Rust analogue to `device_sim.cpp` in the teacher
/// (that file is SDL-backed and explicitly out of scope per spec §1); this
/// is the minimal capability that satisfies the trait contract, in the
/// spirit of the teacher's own `#[derive(Debug)]`-heavy, allocation-light
/// style.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingCutter {
    pub running: bool,
    pub primitives: Vec<Primitive>,
}

/// One motion primitive as observed at the [`Cutter`] boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    MoveTo(Xy),
    CutTo(Xy),
    CurveTo(Xy, Xy, Xy, Xy),
}

impl RecordingCutter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cutter for RecordingCutter {
    fn start(&mut self) -> bool {
        self.running = true;
        true
    }

    fn stop(&mut self) -> bool {
        self.running = false;
        true
    }

    fn move_to(&mut self, p: Xy) -> bool {
        if !self.running {
            return false;
        }
        self.primitives.push(Primitive::MoveTo(p));
        true
    }

    fn cut_to(&mut self, p: Xy) -> bool {
        if !self.running {
            return false;
        }
        self.primitives.push(Primitive::CutTo(p));
        true
    }

    fn curve_to(&mut self, p0: Xy, p1: Xy, p2: Xy, p3: Xy) -> bool {
        if !self.running {
            return false;
        }
        self.primitives.push(Primitive::CurveTo(p0, p1, p2, p3));
        true
    }
}
