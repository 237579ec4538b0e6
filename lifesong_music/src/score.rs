// The score: the note schedule every generator writes into.
//
// A score is four tracks (melody, harmony, bass, pad) in that fixed order,
// each an ordered list of note events on its own MIDI channel. Times and
// durations are in quarter-note beats as `f64`; conversion to ticks happens
// only in midi.rs.
//
// Generators only append forward in time, so each track's notes are sorted
// by start. The assembler (assemble.rs) guarantees every surviving note has a
// positive, finite duration and ends by `total_beats`.
//
// The score is the source of truth for output. MIDI is derived from it,
// never the other way around.

use serde::{Deserialize, Serialize};

/// Shortest note any generator emits, in beats.
pub const MIN_NOTE_BEATS: f64 = 0.2;

/// Track role, in output order. The role index doubles as track id and MIDI
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackRole {
    Melody = 0,
    Harmony = 1,
    Bass = 2,
    Pad = 3,
}

impl TrackRole {
    pub const ALL: [TrackRole; 4] = [
        TrackRole::Melody,
        TrackRole::Harmony,
        TrackRole::Bass,
        TrackRole::Pad,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn channel(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TrackRole::Melody => "Melody",
            TrackRole::Harmony => "Harmony",
            TrackRole::Bass => "Bass",
            TrackRole::Pad => "Pad",
        }
    }
}

/// One sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub track: u8,
    pub channel: u8,
    /// MIDI note number (0-127).
    pub pitch: u8,
    /// Onset, in beats from the start of the piece.
    pub start: f64,
    /// Length in beats. Always positive in an assembled score.
    pub duration: f64,
    pub velocity: u8,
}

impl NoteEvent {
    pub fn new(role: TrackRole, pitch: u8, start: f64, duration: f64, velocity: u8) -> Self {
        NoteEvent {
            track: role.index() as u8,
            channel: role.channel(),
            pitch: pitch.min(127),
            start,
            duration,
            velocity: velocity.clamp(1, 127),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Finite, non-negative start and a finite duration above zero.
    pub fn is_playable(&self) -> bool {
        self.start.is_finite()
            && self.start >= 0.0
            && self.duration.is_finite()
            && self.duration > 0.0
    }
}

/// One instrument part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub role: TrackRole,
    pub name: String,
    /// General MIDI program number (0-127).
    pub program: u8,
    pub notes: Vec<NoteEvent>,
}

impl Track {
    pub fn new(role: TrackRole, program: u8, notes: Vec<NoteEvent>) -> Self {
        Track {
            role,
            name: role.name().to_string(),
            program,
            notes,
        }
    }

    /// Pitch extremes, or None for an empty track.
    pub fn pitch_range(&self) -> Option<(u8, u8)> {
        let low = self.notes.iter().map(|n| n.pitch).min()?;
        let high = self.notes.iter().map(|n| n.pitch).max()?;
        Some((low, high))
    }
}

/// The complete generated piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub tempo_bpm: u16,
    /// Length of the piece in beats. No note ends after it.
    pub total_beats: f64,
    /// Name of the instrument set the programs were taken from.
    pub instrument_set: String,
    pub tracks: Vec<Track>,
}

impl Score {
    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }

    pub fn track(&self, role: TrackRole) -> Option<&Track> {
        self.tracks.iter().find(|t| t.role == role)
    }

    pub fn stats(&self) -> ScoreStats {
        ScoreStats {
            total_beats: self.total_beats,
            total_notes: self.note_count(),
            tracks: self
                .tracks
                .iter()
                .map(|t| TrackStats {
                    name: t.name.clone(),
                    notes: t.notes.len(),
                    pitch_range: t.pitch_range(),
                })
                .collect(),
        }
    }

    /// Compact text dump for debugging: one row per track on an eighth-note
    /// raster. A cell shows the highest pitch starting there, `-` while a
    /// note holds, `.` for silence, and `|` between 4/4 bars.
    pub fn summary(&self) -> String {
        const STEP: f64 = 0.5;
        const STEPS_PER_BAR: usize = 8;

        let steps = (self.total_beats / STEP).ceil().max(0.0) as usize;
        let mut out = String::new();
        for track in &self.tracks {
            out.push_str(&format!("{:>8}: ", track.name));
            for step in 0..steps {
                if step > 0 && step % STEPS_PER_BAR == 0 {
                    out.push('|');
                }
                let t = step as f64 * STEP;
                let onset = track
                    .notes
                    .iter()
                    .filter(|n| n.start >= t && n.start < t + STEP)
                    .map(|n| n.pitch)
                    .max();
                match onset {
                    Some(pitch) => out.push_str(&pitch_name(pitch)),
                    None if track.notes.iter().any(|n| n.start < t && n.end() > t) => {
                        out.push('-')
                    }
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Statistics about a score's contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreStats {
    pub total_beats: f64,
    pub total_notes: usize,
    pub tracks: Vec<TrackStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackStats {
    pub name: String,
    pub notes: usize,
    pub pitch_range: Option<(u8, u8)>,
}

/// Convert a MIDI pitch to a note name with scientific octave (60 = "C4").
pub fn pitch_name(pitch: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
    ];
    let octave = pitch as i16 / 12 - 1;
    format!("{}{}", NAMES[(pitch % 12) as usize], octave)
}
