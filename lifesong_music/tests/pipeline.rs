// End-to-end pipeline tests: sequence in, score out.

use lifesong_music::analysis::Analysis;
use lifesong_music::genetic_code::AminoAcid;
use lifesong_music::melody::{MAX_LEAP, MELODY_HIGH, MELODY_LOW, MelodyStep, MelodyWalker};
use lifesong_music::mode::Mode;
use lifesong_music::motif::detect_motifs;
use lifesong_music::{TrackRole, analyze, generate_score, plan_progression};

const EXAMPLE: &str = "ATGGCCTAAGGGCCCATGGCATTTAAGGGCCC";

#[test]
fn test_example_end_to_end() {
    let (score, analysis) = generate_score(EXAMPLE, 10.0);
    assert_eq!(analysis.codon_count, 10);
    assert!((65..=95).contains(&analysis.tempo));
    assert_eq!(score.tempo_bpm, analysis.tempo);
    assert_eq!(score.tracks.len(), 4);
    for track in &score.tracks {
        assert!(!track.notes.is_empty(), "{} has no notes", track.name);
        assert!(track.notes.iter().all(|n| n.duration > 0.0));
        assert!(track.notes.iter().all(|n| n.channel == track.role.channel()));
    }
}

#[test]
fn test_short_sequences_get_default_and_fallback() {
    for seq in ["", "G", "TA", " a "] {
        let (score, analysis) = generate_score(seq, 5.0);
        assert_eq!(analysis, Analysis::default_for_short());
        assert_eq!(analysis.tempo, 72);
        assert_eq!(analysis.mode, Mode::Aeolian);
        assert_eq!(score.tracks.len(), 1);
        assert!(score.note_count() >= 1);
    }
}

#[test]
fn test_all_stop_sequence() {
    let (score, analysis) = generate_score("TAATAGTGA", 10.0);
    assert_eq!(analysis.codon_count, 3);
    assert!(analysis.amino_acids.iter().all(|aa| *aa == AminoAcid::Stop));
    let melody = score.track(TrackRole::Melody).unwrap();
    assert!(melody.notes.is_empty());
    for role in [TrackRole::Harmony, TrackRole::Bass, TrackRole::Pad] {
        assert!(score.track(role).unwrap().notes.is_empty());
    }
}

#[test]
fn test_motif_example() {
    let motifs = detect_motifs("ATGATGATGATG");
    assert!(motifs.iter().any(|m| m.length == 6 && m.count >= 2));
    let analysis = analyze("ATGATGATGATG");
    assert_eq!(analysis.motifs, motifs);
}

#[test]
fn test_noise_heavy_input_still_plays() {
    let seq = "ATG-NNN-GCC-xyz-GGG-TTT-AAA-CCC-RRR-GAT-TAC-A";
    let (score, analysis) = generate_score(seq, 20.0);
    assert!(analysis.codon_count >= 3);
    assert_eq!(score.tracks.len(), 4);
    assert!(score.note_count() > 0);
}

#[test]
fn test_melody_invariants_on_long_sequence() {
    let seq = "GATTACA".repeat(40) + &"CCGGTA".repeat(30);
    let analysis = analyze(&seq);
    let total = 200.0;
    let plan = plan_progression(&analysis, total);
    assert!(plan.total_beats() >= total);

    let tonality = analysis.tonality();
    let mut prev: Option<u8> = None;
    for step in MelodyWalker::new(&analysis, &plan, total) {
        match step {
            MelodyStep::Note { note, .. } => {
                assert!((MELODY_LOW..=MELODY_HIGH).contains(&note.pitch));
                assert!(tonality.is_in_scale(note.pitch));
                if let Some(p) = prev {
                    assert!((note.pitch as i16 - p as i16).abs() <= MAX_LEAP);
                }
                prev = Some(note.pitch);
            }
            MelodyStep::Rest { .. } => prev = None,
        }
    }
}

#[test]
fn test_identical_inputs_identical_scores() {
    let a = generate_score(EXAMPLE, 33.3);
    let b = generate_score(EXAMPLE, 33.3);
    assert_eq!(a, b);
    let json_a = serde_json::to_string(&a.0).unwrap();
    let json_b = serde_json::to_string(&b.0).unwrap();
    assert_eq!(json_a, json_b);
}

#[test]
fn test_summary_json_shape() {
    let analysis = analyze(EXAMPLE);
    let json = serde_json::to_value(analysis.summary()).unwrap();
    for field in [
        "key",
        "mode",
        "character",
        "tempo",
        "gc",
        "at_gc_ratio",
        "pu_py_ratio",
        "codon_count",
        "motif_count",
        "length",
        "dominant_amino_acid",
        "has_start_codon",
        "has_stop_codon",
        "start_positions",
        "stop_positions",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["codon_count"], 10);
    assert_eq!(json["dominant_amino_acid"], "M");
    assert_eq!(json["start_positions"], serde_json::json!([0, 5]));
}
