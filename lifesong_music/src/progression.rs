// Harmonic planning: the chord plan shared by all four track generators.
//
// The dominant amino acid's class picks a progression style (a short cycle of
// scale degrees). The cycle is unrolled into fixed 4-beat chord slots until
// the plan covers the whole piece, with at least 8 slots and at least one slot
// per 4 codons. Each slot also records the codon that "owns" it (cycling
// through the codon list), which the harmony, bass and pad generators read
// for chord quality, rhythm and rests.
//
// The plan is built once and never mutated. Generators that need to know
// what chord is sounding at a given time look it up with `slot_at`, so every
// track agrees on the harmony.

use serde::Serialize;
use tracing::debug;

use crate::analysis::Analysis;
use crate::genetic_code::{AminoClass, Codon};

/// Length of every chord slot, in beats.
pub const CHORD_SLOT_BEATS: f64 = 4.0;
/// Minimum number of slots in a plan built from a non-empty codon list.
pub const MIN_PLAN_SLOTS: usize = 8;

/// Progression template family, chosen from the dominant amino-acid class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProgressionStyle {
    /// I-IV-V-I.
    Cadential,
    /// I-vi-IV-V.
    Gentle,
    /// i-VII-VI-V.
    Dramatic,
    /// ii-V-I-vi.
    Jazz,
}

impl ProgressionStyle {
    /// Scale degrees (0-6) of one cycle of the progression.
    pub fn template(self) -> &'static [u8] {
        match self {
            ProgressionStyle::Cadential => &[0, 3, 4, 0],
            ProgressionStyle::Gentle => &[0, 5, 3, 4],
            ProgressionStyle::Dramatic => &[0, 6, 5, 4],
            ProgressionStyle::Jazz => &[1, 4, 0, 5],
        }
    }

    /// Style for a dominant amino-acid class. No dominant amino acid (every
    /// codon a stop, or no codons) falls back to `Cadential`.
    pub fn for_class(class: Option<AminoClass>) -> Self {
        match class {
            Some(AminoClass::Hydrophobic) | None => ProgressionStyle::Cadential,
            Some(AminoClass::Polar) => ProgressionStyle::Gentle,
            Some(AminoClass::Charged) => ProgressionStyle::Dramatic,
            Some(AminoClass::Aromatic) => ProgressionStyle::Jazz,
        }
    }
}

/// One chord in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChordSlot {
    /// Scale degree of the chord root (0-6).
    pub degree: u8,
    pub start: f64,
    pub duration: f64,
    /// The codon that owns this slot; None only in the empty-codon plan.
    pub codon: Option<Codon>,
}

impl ChordSlot {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// A slot owned by a stop codon is silent in the chordal tracks.
    pub fn is_rest(&self) -> bool {
        self.codon.is_some_and(|c| c.is_stop())
    }
}

/// The ordered chord slots covering a piece. Always holds at least one slot,
/// and slots are contiguous from beat 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordPlan {
    pub style: ProgressionStyle,
    pub slots: Vec<ChordSlot>,
}

impl ChordPlan {
    /// Total beats covered by the plan.
    pub fn total_beats(&self) -> f64 {
        self.slots.last().map_or(0.0, ChordSlot::end)
    }

    /// Index of the slot sounding at `beat`. Beats before 0 map to the first
    /// slot, beats past the end to the last.
    pub fn slot_index_at(&self, beat: f64) -> usize {
        if beat.is_nan() || beat <= 0.0 {
            return 0;
        }
        let index = (beat / CHORD_SLOT_BEATS).floor() as usize;
        index.min(self.slots.len().saturating_sub(1))
    }

    pub fn slot_at(&self, beat: f64) -> &ChordSlot {
        &self.slots[self.slot_index_at(beat)]
    }
}

/// Build the chord plan for an analysis and a piece length in beats.
pub fn plan_progression(analysis: &Analysis, total_beats: f64) -> ChordPlan {
    let style =
        ProgressionStyle::for_class(analysis.dominant_amino_acid.and_then(|aa| aa.class()));

    if analysis.codons.is_empty() {
        debug!(?style, "no codons, planning a single tonic slot");
        return ChordPlan {
            style,
            slots: vec![ChordSlot {
                degree: 0,
                start: 0.0,
                duration: CHORD_SLOT_BEATS,
                codon: None,
            }],
        };
    }

    let covering = if total_beats.is_finite() && total_beats > 0.0 {
        (total_beats / CHORD_SLOT_BEATS).ceil() as usize
    } else {
        0
    };
    let slot_count = MIN_PLAN_SLOTS
        .max(analysis.codons.len() / 4)
        .max(covering);

    let template = style.template();
    let slots = (0..slot_count)
        .map(|i| ChordSlot {
            degree: template[i % template.len()],
            start: i as f64 * CHORD_SLOT_BEATS,
            duration: CHORD_SLOT_BEATS,
            codon: Some(analysis.codons[i % analysis.codons.len()]),
        })
        .collect();

    debug!(?style, slot_count, total_beats, "planned progression");
    ChordPlan { style, slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn test_empty_codons_single_slot() {
        let plan = plan_progression(&analyze(""), 40.0);
        assert_eq!(plan.slots.len(), 1);
        assert_eq!(plan.slots[0].degree, 0);
        assert_eq!(plan.slots[0].duration, 4.0);
        assert_eq!(plan.slots[0].codon, None);
        assert_eq!(plan.style, ProgressionStyle::Cadential);
    }

    #[test]
    fn test_minimum_eight_slots() {
        let plan = plan_progression(&analyze("GGGGGG"), 1.0);
        assert_eq!(plan.slots.len(), 8);
    }

    #[test]
    fn test_plan_covers_total() {
        let analysis = analyze("ATGGCCTAAGGGCCCATGGCATTTAAGGGCCC");
        for total in [1.0, 13.3, 32.0, 33.0, 250.5] {
            let plan = plan_progression(&analysis, total);
            assert!(plan.total_beats() >= total);
        }
    }

    #[test]
    fn test_slots_are_contiguous_and_cycle_codons() {
        let analysis = analyze("CTGCTGCTG"); // three Leu codons, hydrophobic
        let plan = plan_progression(&analysis, 40.0);
        assert_eq!(plan.style, ProgressionStyle::Cadential);
        assert_eq!(plan.slots.len(), 10);
        for (i, slot) in plan.slots.iter().enumerate() {
            assert_eq!(slot.start, i as f64 * 4.0);
            assert_eq!(slot.degree, [0, 3, 4, 0][i % 4]);
            assert_eq!(slot.codon, Some(analysis.codons[i % 3]));
        }
    }

    #[test]
    fn test_style_follows_dominant_class() {
        let polar = analyze("TCTTCTTCT"); // Ser
        assert_eq!(plan_progression(&polar, 8.0).style, ProgressionStyle::Gentle);
        let charged = analyze("AAAAAAAAA"); // Lys
        assert_eq!(plan_progression(&charged, 8.0).style, ProgressionStyle::Dramatic);
        let aromatic = analyze("TGGTGGTGG"); // Trp
        let plan = plan_progression(&aromatic, 8.0);
        assert_eq!(plan.style, ProgressionStyle::Jazz);
        assert_eq!(plan.slots[0].degree, 1);
        let all_stop = analyze("TAATAGTGA");
        assert_eq!(plan_progression(&all_stop, 8.0).style, ProgressionStyle::Cadential);
    }

    #[test]
    fn test_long_codon_lists_add_slots() {
        let seq = "GCT".repeat(60);
        let plan = plan_progression(&analyze(&seq), 4.0);
        assert_eq!(plan.slots.len(), 15);
    }

    #[test]
    fn test_slot_lookup() {
        let plan = plan_progression(&analyze("GGGGGG"), 32.0);
        assert_eq!(plan.slot_index_at(0.0), 0);
        assert_eq!(plan.slot_index_at(3.99), 0);
        assert_eq!(plan.slot_index_at(4.0), 1);
        assert_eq!(plan.slot_index_at(-2.0), 0);
        assert_eq!(plan.slot_index_at(1000.0), plan.slots.len() - 1);
        assert_eq!(plan.slot_at(9.0).start, 8.0);
    }
}
