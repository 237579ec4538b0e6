// Key, mode and scale handling.
//
// A sequence's base composition picks its tonality: the AT/GC ratio selects a
// root key and the purine/pyrimidine ratio selects one of the seven diatonic
// modes. Both lookups are banded range tables: explicit sorted lists of
// half-open `[lower, upper)` intervals that together cover `[0, inf)`, scanned
// in order, with a fallback value for anything that matches no band (only
// NaN can, in practice).
//
// This module provides:
// - Mode definitions with their semitone patterns, names and character words
// - Key/mode band tables and the band lookup
// - `Tonality`: root + mode, with scale membership, nearest-tone snapping,
//   range fitting and scale-degree to pitch conversion
//
// Every generator goes through `Tonality` for pitches, which is how all four
// tracks stay in key.

use serde::{Deserialize, Serialize};

/// The seven diatonic modes, ordered from darkest to brightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Diminished fifth above the final; the least stable mode.
    Locrian,
    /// Minor with a flat second.
    Phrygian,
    /// Natural minor.
    Aeolian,
    /// Minor with a raised sixth.
    Dorian,
    /// Major with a lowered seventh.
    Mixolydian,
    /// The major scale.
    Ionian,
    /// Major with a raised fourth.
    Lydian,
}

impl Mode {
    /// Semitone offsets from the root to each of the 7 degrees.
    /// Always ascending and starting at 0.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Locrian => "locrian",
            Mode::Phrygian => "phrygian",
            Mode::Aeolian => "aeolian",
            Mode::Dorian => "dorian",
            Mode::Mixolydian => "mixolydian",
            Mode::Ionian => "ionian",
            Mode::Lydian => "lydian",
        }
    }

    /// One-word description of the mode's mood.
    pub fn character(self) -> &'static str {
        match self {
            Mode::Locrian => "unstable",
            Mode::Phrygian => "dark",
            Mode::Aeolian => "reflective",
            Mode::Dorian => "sophisticated",
            Mode::Mixolydian => "bluesy",
            Mode::Ionian => "bright",
            Mode::Lydian => "ethereal",
        }
    }

    /// The 12 pitch classes in the mode, as a membership table indexed by
    /// semitones above the root.
    pub fn pitch_classes(self) -> [bool; 12] {
        let mut pcs = [false; 12];
        for &interval in &self.intervals() {
            pcs[interval as usize] = true;
        }
        pcs
    }
}

/// A root pitch class (0-11) and its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Key {
    pub root: u8,
    pub name: &'static str,
}

impl Key {
    pub const C: Key = Key { root: 0, name: "C" };
}

/// One row of a banded lookup table: `value` applies to `lower <= x < upper`.
#[derive(Debug, Clone, Copy)]
pub struct Band<T> {
    pub lower: f64,
    pub upper: f64,
    pub value: T,
}

/// Scan `bands` in order and return the first value whose band contains
/// `ratio`, or `fallback` if none does.
pub fn select_band<T: Copy>(bands: &[Band<T>], ratio: f64, fallback: T) -> T {
    bands
        .iter()
        .find(|band| band.lower <= ratio && ratio < band.upper)
        .map(|band| band.value)
        .unwrap_or(fallback)
}

/// AT/GC ratio → root key. GC-rich sequences land on the sharp keys,
/// AT-rich ones on C and F.
pub const KEY_BANDS: [Band<Key>; 7] = [
    Band { lower: 0.0, upper: 0.7, value: Key { root: 11, name: "B" } },
    Band { lower: 0.7, upper: 0.85, value: Key { root: 4, name: "E" } },
    Band { lower: 0.85, upper: 1.0, value: Key { root: 9, name: "A" } },
    Band { lower: 1.0, upper: 1.15, value: Key { root: 2, name: "D" } },
    Band { lower: 1.15, upper: 1.3, value: Key { root: 7, name: "G" } },
    Band { lower: 1.3, upper: 1.5, value: Key { root: 0, name: "C" } },
    Band { lower: 1.5, upper: f64::INFINITY, value: Key { root: 5, name: "F" } },
];

/// Purine/pyrimidine ratio → mode.
pub const MODE_BANDS: [Band<Mode>; 7] = [
    Band { lower: 0.0, upper: 0.85, value: Mode::Locrian },
    Band { lower: 0.85, upper: 0.92, value: Mode::Phrygian },
    Band { lower: 0.92, upper: 0.97, value: Mode::Aeolian },
    Band { lower: 0.97, upper: 1.03, value: Mode::Dorian },
    Band { lower: 1.03, upper: 1.08, value: Mode::Mixolydian },
    Band { lower: 1.08, upper: 1.15, value: Mode::Ionian },
    Band { lower: 1.15, upper: f64::INFINITY, value: Mode::Lydian },
];

pub fn key_for_ratio(at_gc_ratio: f64) -> Key {
    select_band(&KEY_BANDS, at_gc_ratio, Key::C)
}

pub fn mode_for_ratio(pu_py_ratio: f64) -> Mode {
    select_band(&MODE_BANDS, pu_py_ratio, Mode::Aeolian)
}

/// A mode rooted on a specific pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tonality {
    pub mode: Mode,
    /// Pitch class of the root (0 = C, 2 = D, ...).
    pub root: u8,
}

impl Tonality {
    pub fn new(mode: Mode, root: u8) -> Self {
        Tonality {
            mode,
            root: root % 12,
        }
    }

    /// Check if a pitch (any octave, negative allowed) is in the scale.
    pub fn contains(&self, pitch: i16) -> bool {
        let pc = (pitch - self.root as i16).rem_euclid(12);
        self.mode.pitch_classes()[pc as usize]
    }

    /// Check if a MIDI pitch is in the scale.
    pub fn is_in_scale(&self, pitch: u8) -> bool {
        self.contains(pitch as i16)
    }

    /// Snap a pitch to the nearest scale tone. When two scale tones are
    /// equally near, the lower one wins.
    pub fn snap(&self, pitch: i16) -> i16 {
        for offset in 0..=6 {
            if self.contains(pitch - offset) {
                return pitch - offset;
            }
            if self.contains(pitch + offset) {
                return pitch + offset;
            }
        }
        pitch // unreachable with a non-empty mode
    }

    /// Snap `pitch` into the scale and into `[low, high]`. If the nearest
    /// scale tone lies outside the range, the in-range scale tone closest to
    /// it is used instead (lower on ties).
    pub fn fit_range(&self, pitch: i16, low: u8, high: u8) -> u8 {
        let snapped = self.snap(pitch);
        if snapped >= low as i16 && snapped <= high as i16 {
            return snapped as u8;
        }
        (low..=high)
            .filter(|&p| self.is_in_scale(p))
            .min_by_key(|&p| ((p as i16 - snapped).abs(), p))
            .unwrap_or_else(|| pitch.clamp(low as i16, high as i16) as u8)
    }

    /// The next scale tone from `pitch` in the direction of `target`.
    /// Returns `pitch` unchanged if it already equals `target`.
    pub fn step_toward(&self, pitch: u8, target: u8) -> u8 {
        let (from, to) = (pitch as i16, target as i16);
        let dir = (to - from).signum();
        if dir == 0 {
            return pitch;
        }
        let mut p = from + dir;
        while p != to && !self.contains(p) {
            p += dir;
        }
        p as u8
    }

    /// Pitch of a scale degree relative to `anchor + root`. Degrees outside
    /// 0..7 wrap into neighbouring octaves (7 = root an octave up, -1 = the
    /// seventh an octave down).
    pub fn degree_pitch(&self, degree: i32, anchor: i16) -> i16 {
        let intervals = self.mode.intervals();
        let step = degree.rem_euclid(7) as usize;
        let octave = degree.div_euclid(7) as i16;
        anchor + self.root as i16 + intervals[step] as i16 + octave * 12
    }

    /// Fold a pitch by octaves into `[low, high]`, keeping its pitch class.
    /// The range must span at least an octave.
    pub fn fold_into(pitch: i16, low: u8, high: u8) -> u8 {
        let mut p = pitch;
        while p > high as i16 {
            p -= 12;
        }
        while p < low as i16 {
            p += 12;
        }
        p.clamp(low as i16, high as i16) as u8
    }

    /// Scale-degree pitch folded into a register.
    pub fn voiced(&self, degree: i32, anchor: i16, low: u8, high: u8) -> u8 {
        Self::fold_into(self.degree_pitch(degree, anchor), low, high)
    }
}
