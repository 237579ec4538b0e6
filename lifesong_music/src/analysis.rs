// Sequence analysis: everything the generators need to know about a DNA
// string, computed once.
//
// Layers, in order:
// 1. Composition: base counts, GC%, AT/GC and purine/pyrimidine ratios,
//    which select key (mode.rs KEY_BANDS), mode (MODE_BANDS) and tempo.
// 2. Codons: non-overlapping valid triplets translated through the genetic
//    code (genetic_code.rs), plus the dominant amino acid.
// 3. Motifs: repeated codon-length substrings (motif.rs).
//
// The result is an immutable `Analysis` consumed by progression.rs and all
// four track generators. Analysis never fails: sequences shorter than three
// symbols get a fixed default, noise characters are skipped, and ratios with
// a zero denominator use fixed fallback constants.

use serde::Serialize;
use tracing::debug;

use crate::genetic_code::{AminoAcid, Codon, split_codons};
use crate::mode::{Key, Mode, Tonality, key_for_ratio, mode_for_ratio};
use crate::motif::{Motif, detect_motifs};

/// Slowest tempo, reached at 0% GC.
pub const TEMPO_MIN_BPM: u16 = 65;
/// Tempo range above the minimum; 100% GC gives `TEMPO_MIN_BPM + TEMPO_SPAN_BPM`.
pub const TEMPO_SPAN_BPM: u16 = 30;
/// Tempo used when the sequence is too short to analyze.
pub const DEFAULT_TEMPO_BPM: u16 = 72;
/// AT/GC ratio assumed when the sequence has no G or C. Lands in the F band.
pub const PURE_AT_RATIO: f64 = 1.5;
/// Purine/pyrimidine ratio assumed when the sequence has no T or C.
pub const NO_PYRIMIDINE_RATIO: f64 = 1.0;
/// Shortest sequence (in cleaned symbols) that gets a real analysis.
pub const MIN_ANALYZED_LENGTH: usize = 3;

/// Everything derived from a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub key: Key,
    pub mode: Mode,
    /// Semitone offsets of the mode; always 7 ascending values from 0.
    pub scale: [u8; 7],
    pub character: &'static str,
    pub tempo: u16,
    /// GC content in percent of the cleaned length.
    pub gc_content: f64,
    pub at_gc_ratio: f64,
    pub pu_py_ratio: f64,
    /// Cleaned length, noise characters included.
    pub length: usize,
    pub codons: Vec<Codon>,
    pub amino_acids: Vec<AminoAcid>,
    pub codon_count: usize,
    pub motifs: Vec<Motif>,
    /// Most frequent non-stop amino acid; None if every codon is a stop.
    pub dominant_amino_acid: Option<AminoAcid>,
}

/// The JSON-facing subset of an analysis, with ratios rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub key: &'static str,
    pub mode: &'static str,
    pub character: &'static str,
    pub tempo: u16,
    pub gc: f64,
    pub at_gc_ratio: f64,
    pub pu_py_ratio: f64,
    pub codon_count: usize,
    pub motif_count: usize,
    pub length: usize,
    pub dominant_amino_acid: Option<char>,
    pub has_start_codon: bool,
    pub has_stop_codon: bool,
    pub start_positions: Vec<usize>,
    pub stop_positions: Vec<usize>,
}

impl Analysis {
    /// The fixed analysis for sequences shorter than three symbols.
    pub fn default_for_short() -> Self {
        Analysis {
            key: Key::C,
            mode: Mode::Aeolian,
            scale: Mode::Aeolian.intervals(),
            character: Mode::Aeolian.character(),
            tempo: DEFAULT_TEMPO_BPM,
            gc_content: 50.0,
            at_gc_ratio: 1.0,
            pu_py_ratio: 1.0,
            length: 0,
            codons: Vec::new(),
            amino_acids: Vec::new(),
            codon_count: 0,
            motifs: Vec::new(),
            dominant_amino_acid: None,
        }
    }

    pub fn tonality(&self) -> Tonality {
        Tonality::new(self.mode, self.key.root)
    }

    /// Codon indices holding ATG.
    pub fn start_positions(&self) -> Vec<usize> {
        positions(&self.codons, |c| c.is_start())
    }

    /// Codon indices holding TAA, TAG or TGA.
    pub fn stop_positions(&self) -> Vec<usize> {
        positions(&self.codons, |c| c.is_stop())
    }

    pub fn summary(&self) -> AnalysisSummary {
        let start_positions = self.start_positions();
        let stop_positions = self.stop_positions();
        AnalysisSummary {
            key: self.key.name,
            mode: self.mode.name(),
            character: self.character,
            tempo: self.tempo,
            gc: round_to(self.gc_content, 1),
            at_gc_ratio: round_to(self.at_gc_ratio, 3),
            pu_py_ratio: round_to(self.pu_py_ratio, 3),
            codon_count: self.codon_count,
            motif_count: self.motifs.len(),
            length: self.length,
            dominant_amino_acid: self.dominant_amino_acid.map(AminoAcid::symbol),
            has_start_codon: !start_positions.is_empty(),
            has_stop_codon: !stop_positions.is_empty(),
            start_positions,
            stop_positions,
        }
    }
}

fn positions(codons: &[Codon], pred: impl Fn(&Codon) -> bool) -> Vec<usize> {
    codons
        .iter()
        .enumerate()
        .filter(|(_, c)| pred(c))
        .map(|(i, _)| i)
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Uppercase and drop all whitespace. Other characters are kept so they can
/// break codons and motif windows where they sit.
pub fn clean_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Tempo for a GC percentage: linear from `TEMPO_MIN_BPM` at 0% to
/// `TEMPO_MIN_BPM + TEMPO_SPAN_BPM` at 100%, floored.
pub fn tempo_for_gc(gc_content: f64) -> u16 {
    let bpm = (TEMPO_MIN_BPM as f64 + gc_content / 100.0 * TEMPO_SPAN_BPM as f64).floor();
    bpm.clamp(TEMPO_MIN_BPM as f64, (TEMPO_MIN_BPM + TEMPO_SPAN_BPM) as f64) as u16
}

/// Analyze a raw sequence. Never fails.
pub fn analyze(sequence: &str) -> Analysis {
    let cleaned = clean_sequence(sequence);
    let length = cleaned.chars().count();
    if length < MIN_ANALYZED_LENGTH {
        debug!(length, "sequence too short, using default analysis");
        return Analysis::default_for_short();
    }

    let (mut a, mut t, mut g, mut c) = (0usize, 0usize, 0usize, 0usize);
    for byte in cleaned.bytes() {
        match byte {
            b'A' => a += 1,
            b'T' => t += 1,
            b'G' => g += 1,
            b'C' => c += 1,
            _ => {}
        }
    }

    let gc_content = (g + c) as f64 / length as f64 * 100.0;
    let at_gc_ratio = if g + c > 0 {
        (a + t) as f64 / (g + c) as f64
    } else {
        PURE_AT_RATIO
    };
    let pu_py_ratio = if t + c > 0 {
        (a + g) as f64 / (t + c) as f64
    } else {
        NO_PYRIMIDINE_RATIO
    };

    let key = key_for_ratio(at_gc_ratio);
    let mode = mode_for_ratio(pu_py_ratio);
    let tempo = tempo_for_gc(gc_content);

    let codons = split_codons(cleaned.as_bytes());
    let amino_acids: Vec<AminoAcid> = codons.iter().map(|c| c.amino_acid()).collect();
    let dominant_amino_acid = dominant(&amino_acids);
    let motifs = detect_motifs(&cleaned);

    debug!(
        key = key.name,
        mode = mode.name(),
        tempo,
        codons = codons.len(),
        motifs = motifs.len(),
        "analyzed sequence"
    );

    Analysis {
        key,
        mode,
        scale: mode.intervals(),
        character: mode.character(),
        tempo,
        gc_content,
        at_gc_ratio,
        pu_py_ratio,
        length,
        codon_count: codons.len(),
        codons,
        amino_acids,
        motifs,
        dominant_amino_acid,
    }
}

/// Most frequent non-stop amino acid. On a tie the one that appeared first
/// in the sequence wins.
fn dominant(amino_acids: &[AminoAcid]) -> Option<AminoAcid> {
    let mut counts = [0usize; AminoAcid::COUNT];
    let mut first_seen: Vec<AminoAcid> = Vec::new();
    for &aa in amino_acids.iter().filter(|aa| !aa.is_stop()) {
        if counts[aa.index()] == 0 {
            first_seen.push(aa);
        }
        counts[aa.index()] += 1;
    }

    let mut best: Option<(AminoAcid, usize)> = None;
    for aa in first_seen {
        let n = counts[aa.index()];
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((aa, n));
        }
    }
    best.map(|(aa, _)| aa)
}
