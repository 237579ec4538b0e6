// Pad generation: slow sustained triads over pairs of chord slots.

use tracing::debug;

use crate::analysis::Analysis;
use crate::progression::ChordPlan;
use crate::score::{MIN_NOTE_BEATS, NoteEvent, TrackRole};

/// Chord slots covered by one pad chord.
pub const PAD_SPAN_SLOTS: usize = 2;
pub const PAD_ANCHOR: i16 = 54;
pub const PAD_LOW: u8 = 48;
pub const PAD_HIGH: u8 = 72;
pub const PAD_VELOCITY: u8 = 40;
const PAD_TRIAD: [i32; 3] = [0, 2, 4];

/// One triad per group of `PAD_SPAN_SLOTS` slots. The group's first slot
/// supplies the degree and owner; the last pad is cut at the piece end.
pub fn generate_pad(analysis: &Analysis, plan: &ChordPlan, total_beats: f64) -> Vec<NoteEvent> {
    let tonality = analysis.tonality();
    let mut notes = Vec::new();

    for group in plan.slots.chunks(PAD_SPAN_SLOTS) {
        let first = &group[0];
        if first.start >= total_beats {
            break;
        }
        if first.is_rest() {
            continue;
        }
        let end = group[group.len() - 1].end().min(total_beats);
        let duration = end - first.start;
        if duration < MIN_NOTE_BEATS {
            continue;
        }
        for offset in PAD_TRIAD {
            let pitch = tonality.voiced(first.degree as i32 + offset, PAD_ANCHOR, PAD_LOW, PAD_HIGH);
            notes.push(NoteEvent::new(TrackRole::Pad, pitch, first.start, duration, PAD_VELOCITY));
        }
    }

    debug!(notes = notes.len(), "pad generated");
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::progression::plan_progression;

    #[test]
    fn test_pads_span_two_slots() {
        let analysis = analyze("GCTGCTGCT");
        let plan = plan_progression(&analysis, 32.0);
        let notes = generate_pad(&analysis, &plan, 32.0);
        assert_eq!(notes.len(), 4 * 3);
        assert!(notes.iter().all(|n| n.duration == 8.0));
        assert_eq!(notes[3].start, 8.0);
        assert!(notes.iter().all(|n| (PAD_LOW..=PAD_HIGH).contains(&n.pitch)));
    }

    #[test]
    fn test_last_pad_clipped_to_piece() {
        let analysis = analyze("GCTGCTGCT");
        let plan = plan_progression(&analysis, 37.0);
        let notes = generate_pad(&analysis, &plan, 37.0);
        let last = notes.last().unwrap();
        assert_eq!(last.start, 32.0);
        assert_eq!(last.duration, 5.0);
        assert!(notes.iter().all(|n| n.end() <= 37.0));
    }

    #[test]
    fn test_triads_in_scale() {
        let analysis = analyze("ATGCCGTTAGGA");
        let tonality = analysis.tonality();
        let plan = plan_progression(&analysis, 40.0);
        for note in generate_pad(&analysis, &plan, 40.0) {
            assert!(tonality.is_in_scale(note.pitch));
            assert_eq!(note.velocity, PAD_VELOCITY);
        }
    }

    #[test]
    fn test_stop_owner_rests() {
        let analysis = analyze("TAATAGTGA");
        let plan = plan_progression(&analysis, 16.0);
        assert!(generate_pad(&analysis, &plan, 16.0).is_empty());
    }
}
