// Melody generation: a lazy walk over the codon stream.
//
// The walker reads codons in groups. A group's leader and the codon after it
// pick a rhythm pattern (rhythm.rs); the group then plays one note per
// pattern entry, note k taking its pitch from codon leader + k. When the
// pattern is used up, the next group starts at the first unused codon. The
// codon list is cycled until the time cursor reaches the end of the piece.
//
// Rests:
// - A stop codon leading a group is a 1-beat rest and consumes one codon.
// - A stop codon inside a group is a rest of that pattern entry's length.
// Either kind restarts the phrase contour and forgets the previous pitch.
//
// Pitch pipeline for one note:
//   scale degree of the codon + contour offset → pitch above anchor + root
//   → register shift for the amino-acid class
//   → clamp to within MAX_LEAP of the previous pitch
//   → snap to the scale (ties go down) → fit into [MELODY_LOW, MELODY_HIGH]
//   → step toward the previous pitch while the leap still exceeds MAX_LEAP.
// Diatonic scale steps are at most two semitones, so snapping after the
// clamp can overshoot by one semitone at most and a single step repairs it.
//
// The walker keeps track of which chord-plan slot is sounding and reports it
// with every step. It reads the plan and never changes it.

use serde::Serialize;
use tracing::trace;

use crate::analysis::Analysis;
use crate::genetic_code::Codon;
use crate::mode::Tonality;
use crate::progression::ChordPlan;
use crate::rhythm::{class_octave_offset, contour, duration_factor, note_velocity, rhythm_pattern};
use crate::score::{MIN_NOTE_BEATS, NoteEvent, TrackRole};

/// Middle-register anchor; degree 0 sits at `MELODY_ANCHOR + root`.
pub const MELODY_ANCHOR: i16 = 60;
pub const MELODY_LOW: u8 = 48;
pub const MELODY_HIGH: u8 = 84;
/// Largest interval between consecutive notes of a phrase, in semitones.
pub const MAX_LEAP: i16 = 5;
/// Rest length for a stop codon at the head of a group.
pub const LEADING_STOP_REST: f64 = 1.0;

/// One step of the melody walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MelodyStep {
    Note { note: NoteEvent, slot: usize },
    Rest { start: f64, duration: f64, slot: usize },
}

impl MelodyStep {
    pub fn note(&self) -> Option<&NoteEvent> {
        match self {
            MelodyStep::Note { note, .. } => Some(note),
            MelodyStep::Rest { .. } => None,
        }
    }

    pub fn start(&self) -> f64 {
        match self {
            MelodyStep::Note { note, .. } => note.start,
            MelodyStep::Rest { start, .. } => *start,
        }
    }

    /// Chord-plan slot sounding when this step begins.
    pub fn slot(&self) -> usize {
        match self {
            MelodyStep::Note { slot, .. } | MelodyStep::Rest { slot, .. } => *slot,
        }
    }
}

/// The rhythm pattern currently being played.
#[derive(Debug, Clone, Copy)]
struct Group {
    pattern: &'static [f64],
    leader: usize,
    position: usize,
    /// Beats from the start of the pattern to the current entry.
    offset: f64,
}

/// Lazy iterator over melody steps. Cloning a walker gives an independent
/// walk from the same point; `MelodyWalker::new` restarts from the top.
#[derive(Debug, Clone)]
pub struct MelodyWalker<'a> {
    analysis: &'a Analysis,
    plan: &'a ChordPlan,
    tonality: Tonality,
    total_beats: f64,
    cursor: usize,
    time: f64,
    slot: usize,
    group: Option<Group>,
    phrase_position: usize,
    prev_pitch: Option<u8>,
}

impl<'a> MelodyWalker<'a> {
    pub fn new(analysis: &'a Analysis, plan: &'a ChordPlan, total_beats: f64) -> Self {
        MelodyWalker {
            analysis,
            plan,
            tonality: analysis.tonality(),
            total_beats,
            cursor: 0,
            time: 0.0,
            slot: 0,
            group: None,
            phrase_position: 0,
            prev_pitch: None,
        }
    }

    fn codon(&self, index: usize) -> Codon {
        let codons = &self.analysis.codons;
        codons[index % codons.len()]
    }

    /// Move the time cursor and re-sync the chord slot if a boundary was
    /// crossed.
    fn advance(&mut self, beats: f64) {
        self.time += beats;
        while self.slot + 1 < self.plan.slots.len() && self.time >= self.plan.slots[self.slot + 1].start
        {
            self.slot += 1;
        }
    }

    fn rest(&mut self, start: f64, length: f64, slot: usize) -> MelodyStep {
        self.phrase_position = 0;
        self.prev_pitch = None;
        trace!(start, length, slot, "melody rest");
        MelodyStep::Rest {
            start,
            duration: length.min(self.total_beats - start),
            slot,
        }
    }

    /// Run a scale degree through the pitch pipeline.
    fn place_pitch(&self, codon: Codon, degree: u8) -> u8 {
        let shape = contour(codon.first());
        let offset = shape[self.phrase_position % shape.len()];
        let raw = self.tonality.degree_pitch(degree as i32 + offset, MELODY_ANCHOR)
            + class_octave_offset(codon.amino_acid().class());

        let Some(prev) = self.prev_pitch else {
            return self.tonality.fit_range(raw, MELODY_LOW, MELODY_HIGH);
        };

        let prev_i = prev as i16;
        let clamped = raw.clamp(prev_i - MAX_LEAP, prev_i + MAX_LEAP);
        let mut pitch = self.tonality.fit_range(clamped, MELODY_LOW, MELODY_HIGH);
        while (pitch as i16 - prev_i).abs() > MAX_LEAP {
            pitch = self.tonality.step_toward(pitch, prev);
        }
        pitch
    }

    fn in_motif(&self, codon: Codon) -> bool {
        let letters = codon.as_string();
        self.analysis.motifs.iter().any(|m| m.contains_codon(&letters))
    }
}

impl Iterator for MelodyWalker<'_> {
    type Item = MelodyStep;

    fn next(&mut self) -> Option<MelodyStep> {
        if self.analysis.codons.is_empty() || self.total_beats - self.time < MIN_NOTE_BEATS {
            return None;
        }

        let start = self.time;
        let slot = self.slot;

        let group = match self.group {
            Some(group) => group,
            None => {
                let leader = self.codon(self.cursor);
                if leader.is_stop() {
                    self.cursor = (self.cursor + 1) % self.analysis.codons.len();
                    self.advance(LEADING_STOP_REST);
                    return Some(self.rest(start, LEADING_STOP_REST, slot));
                }
                let next = self.codon(self.cursor + 1);
                Group {
                    pattern: rhythm_pattern(leader.first(), next.first()),
                    leader: self.cursor,
                    position: 0,
                    offset: 0.0,
                }
            }
        };

        let entry = group.pattern[group.position];
        let codon = self.codon(group.leader + group.position);
        if group.position + 1 < group.pattern.len() {
            self.group = Some(Group {
                position: group.position + 1,
                offset: group.offset + entry,
                ..group
            });
        } else {
            self.group = None;
            self.cursor = (group.leader + group.pattern.len()) % self.analysis.codons.len();
        }
        self.advance(entry);

        let Some(degree) = codon.melodic_degree() else {
            return Some(self.rest(start, entry, slot));
        };

        let duration = (entry * duration_factor(codon.third()))
            .clamp(MIN_NOTE_BEATS, entry)
            .min(self.total_beats - start);
        let pitch = self.place_pitch(codon, degree);
        let velocity = note_velocity(
            group.position,
            group.offset,
            start,
            self.total_beats,
            self.in_motif(codon),
        );

        self.prev_pitch = Some(pitch);
        self.phrase_position += 1;
        trace!(%codon, pitch, start, duration, velocity, slot, "melody note");

        Some(MelodyStep::Note {
            note: NoteEvent::new(TrackRole::Melody, pitch, start, duration, velocity),
            slot,
        })
    }
}

/// All melody notes for a piece of `total_beats` beats.
pub fn generate_melody(analysis: &Analysis, plan: &ChordPlan, total_beats: f64) -> Vec<NoteEvent> {
    MelodyWalker::new(analysis, plan, total_beats)
        .filter_map(|step| step.note().copied())
        .collect()
}
