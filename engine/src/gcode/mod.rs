//! G-code interpreter: tokenize a line, dispatch the command, drive a
//! [`Cutter`].
//!
//! Ground: the tokenizer in `original_source/util/gcode.cpp::parse_gcode`
//! (char-scanning, not a parser-combinator or regex); the dispatch table and
//! per-command semantics in `original_source/util/gcode.cpp`'s
//! `process_g_code`/`process_misc_code`/`process_movement`/`process_z_code`.
//! The original's exception-based halt (`M0`/`M1`/`M2` throwing `false`) is
//! replaced with an explicit [`LineOutcome`] per spec §9 ("G-code halt
//! signaling").

use log::{trace, warn};

use crate::arc::circular_arc;
use crate::cutter::Cutter;
use crate::geometry::Xy;

/// One `letter value` pair scanned from a line, e.g. `G1` or `X12.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word {
    pub letter: char,
    pub value: f64,
}

/// Scan a single line into its words, dropping comments.
///
/// Comments are either parenthetical (`(...)`, not nested -- a second `(`
/// before the matching `)` does not start a new comment) or `;` to end of
/// line, matching `original_source/util/gcode.cpp::parse_gcode` exactly.
/// A token that doesn't parse as `letter` followed by a number is logged
/// and skipped; scanning continues with the rest of the line.
pub fn tokenize_line(line: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut paren_depth: u32 = 0;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if paren_depth > 0 {
            if c == ')' {
                paren_depth -= 1;
            }
            i += 1;
            continue;
        }
        if c == '(' {
            paren_depth += 1;
            i += 1;
            continue;
        }
        if c == ';' {
            break;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if !c.is_ascii_alphabetic() {
            warn!("skipping unexpected character {c:?} in g-code line {line:?}");
            i += 1;
            continue;
        }

        let letter = c.to_ascii_uppercase();
        let start = i + 1;
        let mut end = start;
        while end < chars.len()
            && (chars[end].is_ascii_digit() || chars[end] == '.' || chars[end] == '-' || chars[end] == '+')
        {
            end += 1;
        }
        let number: String = chars[start..end].iter().collect();
        match number.parse::<f64>() {
            Ok(value) => words.push(Word { letter, value }),
            Err(_) => warn!("unparsable value for {letter} in g-code line {line:?}"),
        }
        i = end;
    }

    words
}

fn find<'a>(words: &'a [Word], letter: char) -> Option<&'a Word> {
    words.iter().find(|w| w.letter == letter)
}

/// Result of interpreting one line. Ground: spec §9, replacing the
/// original's exception-based control flow with an explicit enum.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Keep reading subsequent lines.
    Continue,
    /// `M0`/`M1`/`M2`: stop the program. The caller should also call
    /// [`Cutter::stop`].
    Halt,
}

/// Interpreter state carried across lines: position, unit/coordinate mode
/// and the (unused for motion selection) pen state. Ground: `gcode` class
/// fields in `original_source/util/gcode.cpp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcodeInterpreter {
    pub current_position: Xy,
    pub units_metric: bool,
    pub absolute: bool,
    /// Z-axis height as last commanded. Tracked for fidelity with the
    /// original but never consulted when choosing `move_to` vs `cut_to`
    /// (spec §9, "Z-axis pen state": the original's pen-up/pen-down
    /// distinction for move vs. cut is driven entirely by `G0` vs `G1`,
    /// not by this field, and that decoupling is retained rather than
    /// fixed).
    pub z: f64,
}

impl Default for GcodeInterpreter {
    fn default() -> Self {
        Self {
            current_position: Xy::ZERO,
            units_metric: true,
            absolute: true,
            z: 0.0,
        }
    }
}

impl GcodeInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a value in the interpreter's current unit mode to device
    /// inches. Ground: `gcode::doc_to_internal`.
    fn to_inches(&self, value: f64) -> f64 {
        if self.units_metric {
            value / 25.4
        } else {
            value
        }
    }

    /// Resolve the target point for a motion word: start from
    /// `current_position` and replace whichever of `x`/`y` is present,
    /// converted to inches. Absolute semantics only -- `absolute` never
    /// becomes `false` (`G91` is a logged no-op, spec Non-goals: incremental
    /// mode is "recognized but not honored"), and `gcode::get_xy` has no
    /// relative branch either. Ground: `original_source/util/gcode.cpp:341-351`.
    fn resolve_xy(&self, words: &[Word]) -> Xy {
        let x = find(words, 'X').map(|w| self.to_inches(w.value));
        let y = find(words, 'Y').map(|w| self.to_inches(w.value));
        Xy::new(
            x.unwrap_or(self.current_position.x),
            y.unwrap_or(self.current_position.y),
        )
    }

    /// `I`/`J` are always offsets relative to the arc's start, in both
    /// coordinate modes. Ground: `gcode::get_vector`.
    fn resolve_offset(&self, words: &[Word]) -> Xy {
        let i = find(words, 'I').map(|w| self.to_inches(w.value)).unwrap_or(0.0);
        let j = find(words, 'J').map(|w| self.to_inches(w.value)).unwrap_or(0.0);
        Xy::new(i, j)
    }

    /// Interpret one already-tokenized line, driving `cutter`.
    pub fn dispatch(&mut self, words: &[Word], cutter: &mut dyn Cutter) -> LineOutcome {
        if let Some(z) = find(words, 'Z') {
            self.z = self.to_inches(z.value);
        }

        // Dispatch priority is G, then N (a no-op line number), then M
        // (spec §4.5 "Dispatch"; ground: gcode::parse_line's if/else-if
        // chain, which checks 'G' before 'N' before 'M').
        if let Some(g) = find(words, 'G') {
            self.process_g_code(g.value.round() as i64, words, cutter);
        } else if find(words, 'N').is_some() {
            trace!("line number, ignoring");
        } else if let Some(m) = find(words, 'M') {
            return self.process_misc_code(m.value as i64);
        }

        LineOutcome::Continue
    }

    fn process_g_code(&mut self, code: i64, words: &[Word], cutter: &mut dyn Cutter) {
        match code {
            0 => {
                let target = self.resolve_xy(words);
                trace!("G0 move to {target:?}");
                cutter.move_to(target);
                self.current_position = target;
            }
            1 => {
                let target = self.resolve_xy(words);
                trace!("G1 line to {target:?}");
                cutter.cut_to(target);
                self.current_position = target;
            }
            2 => self.process_arc(words, cutter, true),
            3 => self.process_arc(words, cutter, false),
            20 => self.units_metric = false,
            21 => self.units_metric = true,
            90 => self.absolute = true,
            91 => warn!("g91 (relative coordinates) encountered; not honored, ignoring"),
            other => warn!("unsupported g-code G{other}, ignoring"),
        }
    }

    fn process_arc(&mut self, words: &[Word], cutter: &mut dyn Cutter, clockwise: bool) {
        let target = self.resolve_xy(words);
        let offset = self.resolve_offset(words);
        let current = self.current_position;
        circular_arc(current, target, offset, clockwise, |p0, p1, p2, p3| {
            cutter.curve_to(p0, p1, p2, p3);
        });
        self.current_position = target;
    }

    fn process_misc_code(&mut self, code: i64) -> LineOutcome {
        match code {
            0 | 1 | 2 => LineOutcome::Halt,
            other => {
                warn!("unsupported m-code M{other}, ignoring");
                LineOutcome::Continue
            }
        }
    }

    /// Interpret a full program, one line at a time, stopping at the first
    /// `M0`/`M1`/`M2` or end of input. Calls [`Cutter::start`] before the
    /// first line and [`Cutter::stop`] on halt or completion. Ground:
    /// `gcode::parse_file`'s line loop, minus its exception-based control
    /// flow.
    pub fn run(&mut self, source: &str, cutter: &mut dyn Cutter) {
        cutter.start();
        for line in source.lines() {
            let words = tokenize_line(line);
            if words.is_empty() {
                continue;
            }
            if self.dispatch(&words, cutter) == LineOutcome::Halt {
                break;
            }
        }
        cutter.stop();
    }
}
