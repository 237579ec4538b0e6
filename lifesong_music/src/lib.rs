// Lifesong Music Generator
//
// Turns a DNA sequence into a four-track score (melody, harmony, bass, pad)
// and writes it as a Standard MIDI File. Everything is derived from the
// sequence through fixed lookup tables: base composition picks key, mode and
// tempo; codons drive the chord plan, rhythms and pitches. The same sequence
// and duration always give the same score.
//
// Architecture:
// - genetic_code.rs: Bases, codons, the standard genetic code, codon degrees
// - mode.rs: Modes, key/mode band tables, `Tonality` (snapping, range fitting)
// - motif.rs: Repeated-substring detection
// - analysis.rs: Sequence analysis (composition, key, mode, tempo, codons)
// - progression.rs: Chord plan shared by all tracks
// - rhythm.rs: Rhythm patterns, contours and dynamics for the melody
// - melody.rs: Lazy melody walker with the stepwise-motion pitch pipeline
// - harmony.rs: Block chords per chord slot
// - bass.rs: Root/fifth bass lines per chord slot
// - pad.rs: Sustained triads over pairs of slots
// - score.rs: Score representation, stats and text summary
// - assemble.rs: `generate_score`, instrument sets, degenerate-input fallback
// - midi.rs: MIDI file output from scores
// - config.rs: CLI configuration
// - error.rs: Errors at the I/O boundary
//
// The engine (analysis through assembly) never fails and does no I/O; only
// midi.rs and config.rs touch the filesystem.

pub mod analysis;
pub mod assemble;
pub mod bass;
pub mod config;
pub mod error;
pub mod genetic_code;
pub mod harmony;
pub mod melody;
pub mod midi;
pub mod mode;
pub mod motif;
pub mod pad;
pub mod progression;
pub mod rhythm;
pub mod score;

pub use analysis::{Analysis, AnalysisSummary, analyze};
pub use assemble::generate_score;
pub use error::LifesongError;
pub use progression::{ChordPlan, plan_progression};
pub use score::{NoteEvent, Score, Track, TrackRole};
