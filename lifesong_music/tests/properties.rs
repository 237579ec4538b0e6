// Property tests over random sequences.

use lifesong_music::assemble::MIN_PIECE_BEATS;
use lifesong_music::melody::{MAX_LEAP, MELODY_HIGH, MELODY_LOW, MelodyStep, MelodyWalker};
use lifesong_music::score::MIN_NOTE_BEATS;
use lifesong_music::{analyze, generate_score, plan_progression};
use proptest::prelude::*;

prop_compose! {
    fn arb_sequence()(seq in "[ATGC]{0,240}") -> String {
        seq
    }
}

prop_compose! {
    fn arb_noisy_sequence()(seq in "[ATGCatgcN \n-]{0,240}") -> String {
        seq
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_generation_is_deterministic(seq in arb_noisy_sequence(), secs in 0.0f64..90.0) {
        prop_assert_eq!(generate_score(&seq, secs), generate_score(&seq, secs));
    }

    #[test]
    fn prop_notes_are_playable(seq in arb_noisy_sequence(), secs in -10.0f64..90.0) {
        let (score, analysis) = generate_score(&seq, secs);
        prop_assert!(score.total_beats >= MIN_PIECE_BEATS);
        prop_assert!((65..=95).contains(&analysis.tempo));
        prop_assert!(score.note_count() > 0 || analysis.codon_count >= 3);
        for track in &score.tracks {
            let mut last_start = 0.0;
            for note in &track.notes {
                prop_assert!(note.duration > 0.0 && note.duration.is_finite());
                prop_assert!(note.duration >= MIN_NOTE_BEATS - 1e-9);
                prop_assert!(note.end() <= score.total_beats + 1e-9);
                prop_assert!(note.start >= last_start);
                prop_assert!(note.pitch <= 127 && note.velocity <= 127);
                last_start = note.start;
            }
        }
    }

    #[test]
    fn prop_plan_covers_piece(seq in arb_sequence(), beats in 1.0f64..400.0) {
        let analysis = analyze(&seq);
        let plan = plan_progression(&analysis, beats);
        prop_assert!(!plan.slots.is_empty());
        if !analysis.codons.is_empty() {
            prop_assert!(plan.total_beats() >= beats);
            prop_assert!(plan.slots.len() >= 8);
        }
        prop_assert!(plan.slots.iter().all(|s| s.degree < 7));
    }

    #[test]
    fn prop_melody_in_range_scale_and_stepwise(seq in arb_sequence(), beats in 1.0f64..150.0) {
        let analysis = analyze(&seq);
        let plan = plan_progression(&analysis, beats);
        let tonality = analysis.tonality();
        let mut prev: Option<u8> = None;
        for step in MelodyWalker::new(&analysis, &plan, beats) {
            prop_assert_eq!(step.slot(), plan.slot_index_at(step.start()));
            match step {
                MelodyStep::Note { note, .. } => {
                    prop_assert!((MELODY_LOW..=MELODY_HIGH).contains(&note.pitch));
                    prop_assert!(tonality.is_in_scale(note.pitch));
                    if let Some(p) = prev {
                        prop_assert!((note.pitch as i16 - p as i16).abs() <= MAX_LEAP);
                    }
                    prev = Some(note.pitch);
                }
                MelodyStep::Rest { .. } => prev = None,
            }
        }
    }

    #[test]
    fn prop_analysis_invariants(seq in arb_noisy_sequence()) {
        let analysis = analyze(&seq);
        prop_assert_eq!(analysis.scale.len(), 7);
        prop_assert_eq!(analysis.scale[0], 0);
        prop_assert!(analysis.scale.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(analysis.codon_count, analysis.codons.len());
        prop_assert_eq!(analysis.amino_acids.len(), analysis.codons.len());
        prop_assert!(analysis.motifs.len() <= 5);
        prop_assert!(analysis.motifs.iter().all(|m| m.count >= 2 && m.length % 3 == 0));
    }
}
