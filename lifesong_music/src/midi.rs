// MIDI output from scores.
//
// Converts a Score into a Standard MIDI File (SMF Format 1, multi-track).
// Track 0 carries only the tempo; each score track follows with its name,
// a program change, and note on/off pairs on its own channel. Beat times are
// rounded to ticks at 480 per quarter note.
//
// Within a track, events are ordered by tick with note-offs ahead of
// note-ons at the same tick, so a repeated pitch re-attacks cleanly.
//
// Uses the `midly` crate for encoding.

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::score::{NoteEvent, Score};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Largest delta a MIDI variable-length quantity can hold.
const MAX_DELTA: u32 = 0x0FFF_FFFF;
/// Largest value of the 24-bit tempo field.
const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// Convert a Score to MIDI and write it to a file.
pub fn write_midi(score: &Score, path: &Path) -> Result<()> {
    let buf = score_to_bytes(score)?;
    std::fs::write(path, &buf)?;
    info!(path = %path.display(), bytes = buf.len(), "wrote MIDI file");
    Ok(())
}

/// Encode a Score as SMF bytes.
pub fn score_to_bytes(score: &Score) -> Result<Vec<u8>> {
    let smf = score_to_smf(score);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Convert a beat time to ticks.
pub fn beats_to_ticks(beats: f64) -> u32 {
    (beats.max(0.0) * TICKS_PER_QUARTER as f64).round() as u32
}

/// One timed event before delta encoding. `is_on` sorts note-offs first.
#[derive(Debug, Clone, Copy)]
struct TimedNote {
    tick: u32,
    is_on: bool,
    pitch: u8,
    velocity: u8,
}

/// Flatten notes to sorted on/off events. A note too short to span a tick
/// is stretched to one tick.
fn timed_events(notes: &[NoteEvent]) -> Vec<TimedNote> {
    let mut events = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        let on = beats_to_ticks(note.start);
        let off = beats_to_ticks(note.end()).max(on.saturating_add(1));
        events.push(TimedNote {
            tick: on,
            is_on: true,
            pitch: note.pitch.min(127),
            velocity: note.velocity.clamp(1, 127),
        });
        events.push(TimedNote {
            tick: off,
            is_on: false,
            pitch: note.pitch.min(127),
            velocity: 0,
        });
    }
    // Stable sort: equal (tick, kind) keep note order.
    events.sort_by_key(|e| (e.tick, e.is_on));
    events
}

/// Convert a Score to an in-memory SMF. Track names borrow from the score.
pub fn score_to_smf(score: &Score) -> Smf<'_> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = (60_000_000 / score.tempo_bpm.max(1) as u32).min(MAX_TEMPO_MICROS);
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    for track in &score.tracks {
        let channel = u4::new(track.role.channel());
        let mut events: Track<'_> = vec![
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(track.name.as_bytes())),
            },
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::ProgramChange {
                        program: u7::new(track.program.min(127)),
                    },
                },
            },
        ];

        let mut last_tick = 0;
        for event in timed_events(&track.notes) {
            let delta = (event.tick - last_tick).min(MAX_DELTA);
            last_tick = event.tick;
            let key = u7::new(event.pitch);
            let message = if event.is_on {
                MidiMessage::NoteOn {
                    key,
                    vel: u7::new(event.velocity),
                }
            } else {
                MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                }
            };
            events.push(TrackEvent {
                delta: u28::new(delta),
                kind: TrackEventKind::Midi { channel, message },
            });
        }

        events.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(events);
    }

    smf
}
