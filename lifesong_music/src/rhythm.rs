// Rhythm, contour and dynamics tables for the melody.
//
// All of these are small constant tables keyed by bases or amino-acid class:
// - Rhythm patterns: (first base of current codon, first base of next codon)
//   → a list of note lengths in beats, one note per entry.
// - Duration classes: a note codon's third base scales its length.
// - Contours: the first base picks a 4-step melodic shape in scale degrees.
// - Register: amino-acid class shifts the melody by an octave.
// - Dynamics: beat strength within a pattern, a whole-piece envelope and
//   the motif accent.
//
// Used by melody.rs only. Every lookup is total over its key type.

use crate::genetic_code::{AminoClass, Base};

const THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Indexed `[current.index()][next.index()]`, bases in A, T, G, C order.
const RHYTHM_PATTERNS: [[&[f64]; 4]; 4] = [
    // A-
    [&[2.0, 1.0], &[1.0, 1.0, 1.0], &[TWO_THIRDS, TWO_THIRDS, TWO_THIRDS], &[0.5, 0.5, 1.0]],
    // T-
    [&[1.5, 0.5], &[1.0, 0.5, 0.5], &[0.75, 0.75, 0.5], &[0.5, 1.5]],
    // G-
    [&[1.0, TWO_THIRDS, TWO_THIRDS, TWO_THIRDS], &[0.5, 0.5, 0.5, 0.5], &[1.0, 1.0], &[0.5, 1.0, 0.5]],
    // C-
    [&[2.0], &[THIRD, THIRD, THIRD, 1.0], &[0.75, 0.25, 1.0], &[0.25, 0.25, 0.5, 1.0]],
];

/// Note lengths for a codon pair, keyed by both codons' first bases.
pub fn rhythm_pattern(current: Base, next: Base) -> &'static [f64] {
    RHYTHM_PATTERNS[current.index()][next.index()]
}

/// Length multiplier from a note codon's third base: A long, T medium,
/// G short, C very short.
pub fn duration_factor(third: Base) -> f64 {
    match third {
        Base::A => 1.0,
        Base::T => 0.85,
        Base::G => 0.6,
        Base::C => 0.4,
    }
}

/// Phrase contour in scale-degree offsets, picked by a codon's first base.
/// Indexed by position within the phrase, mod 4.
pub fn contour(first: Base) -> [i32; 4] {
    match first {
        Base::A => [0, 1, 2, 1],    // arch up
        Base::T => [0, -1, -2, -1], // trough
        Base::G => [0, 1, 2, 3],    // rise
        Base::C => [0, -1, -2, -3], // fall
    }
}

/// Register shift in semitones for the note codon's amino-acid class.
pub fn class_octave_offset(class: Option<AminoClass>) -> i16 {
    match class {
        Some(AminoClass::Hydrophobic) => -12,
        Some(AminoClass::Charged) => 12,
        Some(AminoClass::Polar) | Some(AminoClass::Aromatic) | None => 0,
    }
}

pub const DOWNBEAT_VELOCITY: f64 = 96.0;
pub const STRONG_VELOCITY: f64 = 82.0;
pub const WEAK_VELOCITY: f64 = 70.0;
/// Added to notes whose codon lies inside a detected motif.
pub const MOTIF_ACCENT: f64 = 12.0;
/// Fraction of the piece spent fading in, and again fading out.
pub const ENVELOPE_EDGE: f64 = 0.2;
/// Envelope gain at the very start and very end.
pub const ENVELOPE_FLOOR: f64 = 0.7;

/// Base velocity from the note's place in its rhythm pattern. The first
/// note is the downbeat; later notes landing on a whole beat (measured from
/// the pattern start) are strong, the rest weak.
pub fn beat_strength(position: usize, offset: f64) -> f64 {
    if position == 0 {
        DOWNBEAT_VELOCITY
    } else if (offset - offset.round()).abs() < 1e-6 {
        STRONG_VELOCITY
    } else {
        WEAK_VELOCITY
    }
}

/// Whole-piece dynamic envelope: ramps from `ENVELOPE_FLOOR` to 1.0 over the
/// first `ENVELOPE_EDGE` of the piece, holds, and ramps back down over the
/// last `ENVELOPE_EDGE`.
pub fn envelope(time: f64, total_beats: f64) -> f64 {
    if !total_beats.is_finite() || total_beats <= 0.0 {
        return 1.0;
    }
    let progress = (time / total_beats).clamp(0.0, 1.0);
    let ramp = if progress < ENVELOPE_EDGE {
        progress / ENVELOPE_EDGE
    } else if progress > 1.0 - ENVELOPE_EDGE {
        (1.0 - progress) / ENVELOPE_EDGE
    } else {
        1.0
    };
    ENVELOPE_FLOOR + (1.0 - ENVELOPE_FLOOR) * ramp
}

/// Final melody velocity, rounded and clamped to 1..=127.
pub fn note_velocity(position: usize, offset: f64, time: f64, total_beats: f64, in_motif: bool) -> u8 {
    let mut velocity = beat_strength(position, offset) * envelope(time, total_beats);
    if in_motif {
        velocity += MOTIF_ACCENT;
    }
    velocity.round().clamp(1.0, 127.0) as u8
}
