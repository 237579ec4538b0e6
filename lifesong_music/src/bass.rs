// Bass generation: root and fifth under each chord-plan slot.
//
// The owning codon's second base picks how the slot is subdivided; the
// subdivisions alternate between the slot root and the fifth above it.

use tracing::debug;

use crate::analysis::Analysis;
use crate::genetic_code::Base;
use crate::progression::{CHORD_SLOT_BEATS, ChordPlan};
use crate::score::{MIN_NOTE_BEATS, NoteEvent, TrackRole};

pub const BASS_ANCHOR: i16 = 36;
pub const BASS_LOW: u8 = 28;
pub const BASS_HIGH: u8 = 48;
pub const BASS_ACCENT_VELOCITY: u8 = 72;
pub const BASS_VELOCITY: u8 = 60;
/// Fraction of each subdivision the note sounds for.
pub const BASS_ARTICULATION: f64 = 0.9;

/// Subdivision lengths for a 4-beat slot, by the owning codon's second base:
/// whole note, root and fifth halves, walking quarters, or a syncopated split.
pub fn subdivision(second: Base) -> &'static [f64] {
    match second {
        Base::A => &[4.0],
        Base::T => &[2.0, 2.0],
        Base::G => &[1.0, 1.0, 1.0, 1.0],
        Base::C => &[1.5, 1.0, 1.5],
    }
}

pub fn generate_bass(analysis: &Analysis, plan: &ChordPlan, total_beats: f64) -> Vec<NoteEvent> {
    let tonality = analysis.tonality();
    let mut notes = Vec::new();

    for slot in plan.slots.iter().take_while(|s| s.start < total_beats) {
        if slot.is_rest() {
            continue;
        }
        let pattern = slot.codon.map_or(subdivision(Base::A), |c| subdivision(c.second()));
        let scale = slot.duration / CHORD_SLOT_BEATS;

        let mut start = slot.start;
        for (i, &sub) in pattern.iter().enumerate() {
            let length = sub * scale;
            if total_beats - start < MIN_NOTE_BEATS {
                break;
            }
            // Even subdivisions sound the root, odd ones the fifth.
            let degree = slot.degree as i32 + if i % 2 == 0 { 0 } else { 4 };
            let pitch = tonality.voiced(degree, BASS_ANCHOR, BASS_LOW, BASS_HIGH);
            let duration = (length * BASS_ARTICULATION).min(total_beats - start);
            let velocity = if i == 0 {
                BASS_ACCENT_VELOCITY
            } else {
                BASS_VELOCITY
            };
            notes.push(NoteEvent::new(TrackRole::Bass, pitch, start, duration, velocity));
            start += length;
        }
    }

    debug!(notes = notes.len(), "bass generated");
    notes
}
