// Score assembly: the top-level sequence → score pipeline.
//
// `generate_score` runs analysis, converts the requested duration to beats at
// the analyzed tempo, plans the chord progression and runs the four track
// generators, then tags each track with a General MIDI program from the
// instrument set chosen by GC content.
//
// Degenerate input never fails. Fewer than three codons gives a one-track
// fallback piece built directly from the bases; an all-stop sequence gives
// four silent tracks. An arrangement that comes out silent for any other
// reason (a short piece opening on a stop codon) gets the fallback melody on
// its melody track. A final sanitation pass drops any note without a
// positive, finite duration.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{Analysis, analyze};
use crate::bass::generate_bass;
use crate::genetic_code::Base;
use crate::harmony::generate_harmony;
use crate::melody::generate_melody;
use crate::mode::{Band, select_band};
use crate::pad::generate_pad;
use crate::progression::plan_progression;
use crate::score::{MIN_NOTE_BEATS, NoteEvent, Score, Track, TrackRole};

/// Shortest piece, in beats. Smaller or invalid durations are raised to it.
pub const MIN_PIECE_BEATS: f64 = 1.0;
/// Longest piece, in beats: one hour at the fastest tempo.
pub const MAX_PIECE_BEATS: f64 = 95.0 * 60.0;
/// Codons needed for the full four-track arrangement.
pub const MIN_ARRANGED_CODONS: usize = 3;
pub const FALLBACK_TRACK_NAME: &str = "Simple";
pub const FALLBACK_VELOCITY: u8 = 70;

/// General MIDI programs for the four tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstrumentSet {
    pub name: &'static str,
    pub melody: u8,
    pub harmony: u8,
    pub bass: u8,
    pub pad: u8,
}

impl InstrumentSet {
    pub fn program(&self, role: TrackRole) -> u8 {
        match role {
            TrackRole::Melody => self.melody,
            TrackRole::Harmony => self.harmony,
            TrackRole::Bass => self.bass,
            TrackRole::Pad => self.pad,
        }
    }
}

/// Clarinet, harp, acoustic bass, bowed pad.
pub const LOW_GC_SET: InstrumentSet = InstrumentSet {
    name: "low",
    melody: 71,
    harmony: 46,
    bass: 33,
    pad: 92,
};
/// Flute, strings, acoustic bass, warm pad.
pub const MID_GC_SET: InstrumentSet = InstrumentSet {
    name: "mid",
    melody: 73,
    harmony: 48,
    bass: 33,
    pad: 89,
};
/// Ocarina, new-age pad, synth bass, space voice.
pub const HIGH_GC_SET: InstrumentSet = InstrumentSet {
    name: "high",
    melody: 79,
    harmony: 88,
    bass: 39,
    pad: 91,
};
/// Square lead, sweep pad, synth bass, halo pad.
pub const VERY_HIGH_GC_SET: InstrumentSet = InstrumentSet {
    name: "very_high",
    melody: 80,
    harmony: 95,
    bass: 38,
    pad: 94,
};

/// GC percentage → instrument set.
pub const INSTRUMENT_BANDS: [Band<InstrumentSet>; 4] = [
    Band { lower: 0.0, upper: 35.0, value: LOW_GC_SET },
    Band { lower: 35.0, upper: 50.0, value: MID_GC_SET },
    Band { lower: 50.0, upper: 65.0, value: HIGH_GC_SET },
    Band { lower: 65.0, upper: f64::INFINITY, value: VERY_HIGH_GC_SET },
];

pub fn instrument_set_for_gc(gc_content: f64) -> InstrumentSet {
    select_band(&INSTRUMENT_BANDS, gc_content, MID_GC_SET)
}

/// Piece length in beats for a duration in seconds at `tempo` BPM, within
/// `MIN_PIECE_BEATS..=MAX_PIECE_BEATS`. Non-finite durations give the minimum.
pub fn total_beats_for(duration_seconds: f64, tempo: u16) -> f64 {
    let beats = duration_seconds * tempo as f64 / 60.0;
    if beats.is_finite() && beats >= MIN_PIECE_BEATS {
        beats.min(MAX_PIECE_BEATS)
    } else {
        MIN_PIECE_BEATS
    }
}

/// Analyze `sequence` and build its score. Deterministic and infallible.
pub fn generate_score(sequence: &str, duration_seconds: f64) -> (Score, Analysis) {
    let analysis = analyze(sequence);
    let score = assemble_score(sequence, &analysis, duration_seconds);
    (score, analysis)
}

/// Build the score for an existing analysis of `sequence`.
pub fn assemble_score(sequence: &str, analysis: &Analysis, duration_seconds: f64) -> Score {
    let total_beats = total_beats_for(duration_seconds, analysis.tempo);
    let instruments = instrument_set_for_gc(analysis.gc_content);

    if analysis.codon_count < MIN_ARRANGED_CODONS {
        warn!(
            codons = analysis.codon_count,
            "too few codons for a full arrangement, using fallback"
        );
        let track = Track {
            role: TrackRole::Melody,
            name: FALLBACK_TRACK_NAME.to_string(),
            program: MID_GC_SET.melody,
            notes: fallback_melody(sequence, analysis, total_beats),
        };
        return finish(analysis, total_beats, MID_GC_SET, vec![track]);
    }

    let plan = plan_progression(analysis, total_beats);
    let parts = [
        (TrackRole::Melody, generate_melody(analysis, &plan, total_beats)),
        (TrackRole::Harmony, generate_harmony(analysis, &plan, total_beats)),
        (TrackRole::Bass, generate_bass(analysis, &plan, total_beats)),
        (TrackRole::Pad, generate_pad(analysis, &plan, total_beats)),
    ];
    let mut tracks: Vec<Track> = parts
        .into_iter()
        .map(|(role, notes)| Track::new(role, instruments.program(role), notes))
        .collect();

    if analysis.dominant_amino_acid.is_some() && tracks.iter().all(|t| t.notes.is_empty()) {
        warn!(beats = total_beats, "arrangement is silent, using fallback melody");
        if let Some(melody) = tracks.iter_mut().find(|t| t.role == TrackRole::Melody) {
            melody.notes = fallback_melody(sequence, analysis, total_beats);
        }
    }

    finish(analysis, total_beats, instruments, tracks)
}

fn finish(
    analysis: &Analysis,
    total_beats: f64,
    instruments: InstrumentSet,
    mut tracks: Vec<Track>,
) -> Score {
    for track in &mut tracks {
        let before = track.notes.len();
        track.notes.retain(NoteEvent::is_playable);
        if track.notes.len() < before {
            warn!(track = %track.name, dropped = before - track.notes.len(), "dropped unplayable notes");
        }
    }

    let score = Score {
        tempo_bpm: analysis.tempo,
        total_beats,
        instrument_set: instruments.name.to_string(),
        tracks,
    };
    info!(
        tempo = score.tempo_bpm,
        beats = total_beats,
        notes = score.note_count(),
        instruments = instruments.name,
        "score assembled"
    );
    debug!("\n{}", score.summary());
    score
}

/// Scale index for a base in the fallback melody.
fn fallback_degree(base: Base) -> usize {
    match base {
        Base::A => 0,
        Base::T => 3,
        Base::G => 4,
        Base::C => 6,
    }
}

/// One 1-beat note per valid base of `sequence`, until the piece ends. A
/// sequence with no valid bases gets a single tonic note.
pub fn fallback_melody(sequence: &str, analysis: &Analysis, total_beats: f64) -> Vec<NoteEvent> {
    let tonic = 60 + analysis.key.root;
    let mut notes: Vec<NoteEvent> = sequence
        .bytes()
        .filter_map(Base::from_byte)
        .enumerate()
        .map(|(i, base)| (i as f64, base))
        .take_while(|&(start, _)| total_beats - start >= MIN_NOTE_BEATS)
        .map(|(start, base)| {
            let pitch = tonic + analysis.scale[fallback_degree(base)];
            let duration = (total_beats - start).min(1.0);
            NoteEvent::new(TrackRole::Melody, pitch, start, duration, FALLBACK_VELOCITY)
        })
        .collect();

    if notes.is_empty() {
        let duration = total_beats.min(1.0);
        notes.push(NoteEvent::new(TrackRole::Melody, tonic, 0.0, duration, FALLBACK_VELOCITY));
    }
    notes
}
