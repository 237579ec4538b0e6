// Harmony generation: one block chord per chord-plan slot.
//
// The slot's degree gives the chord root; the owning codon's amino acid gives
// the chord quality (which scale degrees above the root are stacked). Every
// tone is voiced from a tenor-register anchor and folded by octaves into
// [HARMONY_LOW, HARMONY_HIGH], so tones never collide. Chords hold for the
// slot minus a short release gap, at a fixed soft velocity.
//
// A slot owned by a stop codon is silent.

use serde::Serialize;
use tracing::debug;

use crate::analysis::Analysis;
use crate::genetic_code::AminoAcid;
use crate::progression::ChordPlan;
use crate::score::{MIN_NOTE_BEATS, NoteEvent, TrackRole};

pub const HARMONY_ANCHOR: i16 = 48;
pub const HARMONY_LOW: u8 = 36;
pub const HARMONY_HIGH: u8 = 72;
pub const HARMONY_VELOCITY: u8 = 55;
/// Silence left at the end of each chord so repeated chords re-attack.
pub const RELEASE_GAP: f64 = 0.1;

/// Which scale degrees above the root a chord stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChordQuality {
    Triad,
    Seventh,
    Ninth,
    AddedSixth,
    Sus4,
    Sus2,
}

impl ChordQuality {
    /// Degree offsets from the chord root. All distinct mod 7.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Triad => &[0, 2, 4],
            ChordQuality::Seventh => &[0, 2, 4, 6],
            ChordQuality::Ninth => &[0, 2, 4, 6, 8],
            ChordQuality::AddedSixth => &[0, 2, 4, 5],
            ChordQuality::Sus4 => &[0, 3, 4],
            ChordQuality::Sus2 => &[0, 1, 4],
        }
    }

    /// Quality for an amino acid; None for stop.
    pub fn for_amino_acid(amino_acid: AminoAcid) -> Option<ChordQuality> {
        use AminoAcid::*;
        Some(match amino_acid {
            Leu | Ile | Val | Met | Ala | Ser | Thr | Asn | Gln | Cys => ChordQuality::Triad,
            Phe | Tyr => ChordQuality::Seventh,
            Trp => ChordQuality::Ninth,
            Lys | Arg | His | Asp | Glu => ChordQuality::AddedSixth,
            Pro => ChordQuality::Sus4,
            Gly => ChordQuality::Sus2,
            Stop => return None,
        })
    }
}

pub fn generate_harmony(analysis: &Analysis, plan: &ChordPlan, total_beats: f64) -> Vec<NoteEvent> {
    let tonality = analysis.tonality();
    let mut notes = Vec::new();
    let mut rests = 0usize;

    for slot in plan.slots.iter().take_while(|s| s.start < total_beats) {
        let quality = match slot.codon {
            Some(codon) => match ChordQuality::for_amino_acid(codon.amino_acid()) {
                Some(quality) => quality,
                None => {
                    rests += 1;
                    continue;
                }
            },
            None => ChordQuality::Triad,
        };

        let length = slot.end().min(total_beats) - slot.start;
        if length < MIN_NOTE_BEATS {
            continue;
        }
        let duration = (length - RELEASE_GAP).max(MIN_NOTE_BEATS);

        for &interval in quality.intervals() {
            let degree = slot.degree as i32 + interval as i32;
            let pitch = tonality.voiced(degree, HARMONY_ANCHOR, HARMONY_LOW, HARMONY_HIGH);
            notes.push(NoteEvent::new(
                TrackRole::Harmony,
                pitch,
                slot.start,
                duration,
                HARMONY_VELOCITY,
            ));
        }
    }

    debug!(notes = notes.len(), rests, "harmony generated");
    notes
}
