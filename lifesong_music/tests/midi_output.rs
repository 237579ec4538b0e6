// MIDI output tests: write real files and parse them back with midly.

use lifesong_music::generate_score;
use lifesong_music::midi::{TICKS_PER_QUARTER, score_to_bytes, write_midi};
use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

fn note_ons(smf: &Smf, track: usize) -> usize {
    smf.tracks[track]
        .iter()
        .filter(|e| matches!(e.kind, TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. }))
        .count()
}

#[test]
fn test_written_file_parses_back() {
    let (score, _) = generate_score("ATGGCCTAAGGGCCCATGGCATTTAAGGGCCC", 10.0);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.mid");
    write_midi(&score, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.header.format, Format::Parallel);
    assert_eq!(
        smf.header.timing,
        Timing::Metrical(midly::num::u15::new(TICKS_PER_QUARTER))
    );
    assert_eq!(smf.tracks.len(), score.tracks.len() + 1);

    for (i, track) in score.tracks.iter().enumerate() {
        assert_eq!(note_ons(&smf, i + 1), track.notes.len());
        assert!(smf.tracks[i + 1].iter().any(|e| matches!(
            e.kind,
            TrackEventKind::Meta(MetaMessage::TrackName(name)) if name == track.name.as_bytes()
        )));
    }
}

#[test]
fn test_tempo_event_matches_score() {
    let (score, _) = generate_score("GCGCGCGCGCGCATAT", 5.0);
    let bytes = score_to_bytes(&score).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
        TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
        _ => None,
    });
    assert_eq!(tempo, Some(60_000_000 / score.tempo_bpm as u32));
}

#[test]
fn test_fallback_and_silent_scores_encode() {
    for seq in ["", "TAATAGTGA"] {
        let (score, _) = generate_score(seq, 3.0);
        let bytes = score_to_bytes(&score).unwrap();
        assert!(Smf::parse(&bytes).is_ok());
    }
}

#[test]
fn test_write_to_missing_directory_fails() {
    let (score, _) = generate_score("ATGATGATG", 3.0);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/song.mid");
    assert!(write_midi(&score, &path).is_err());
}
