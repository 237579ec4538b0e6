// Motif detection: repeated codon-length substrings in the raw sequence.
//
// A motif is any substring of 6, 9, 12, 15 or 18 bases (whole codon
// multiples) that occurs at least twice. Windows slide one base at a time, so
// overlapping occurrences count, and any window touching a non-ATGC
// character is skipped. Motifs are ranked by count then length and only the
// top few survive.
//
// Motifs are not structural: melody.rs uses them only to accent notes whose
// codon appears inside a motif.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::genetic_code::Base;

/// Shortest motif, in bases (two codons).
pub const MIN_MOTIF_LEN: usize = 6;
/// Longest motif, in bases (six codons).
pub const MAX_MOTIF_LEN: usize = 18;
/// How many motifs survive ranking.
pub const MAX_MOTIFS: usize = 5;

/// A repeated pattern and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motif {
    pub pattern: String,
    pub count: usize,
    pub length: usize,
}

impl Motif {
    /// Check whether a codon's three letters occur anywhere in the pattern
    /// (not necessarily codon-aligned).
    pub fn contains_codon(&self, codon: &str) -> bool {
        self.pattern.contains(codon)
    }
}

/// Find the top motifs of a cleaned (uppercased, whitespace-free) sequence.
///
/// Ranking is by descending count, then descending length. Within equal
/// count and length the pattern seen first in the sequence wins, so the
/// result does not depend on hash iteration order.
pub fn detect_motifs(sequence: &str) -> Vec<Motif> {
    let bytes = sequence.as_bytes();
    let mut motifs = Vec::new();

    for length in (MIN_MOTIF_LEN..=MAX_MOTIF_LEN).step_by(3) {
        if bytes.len() < length {
            break;
        }

        // Insertion-ordered counting: `order` remembers first occurrence.
        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        let mut order: Vec<&[u8]> = Vec::new();
        for window in bytes.windows(length) {
            if !window.iter().all(|&b| Base::from_byte(b).is_some()) {
                continue;
            }
            let count = counts.entry(window).or_insert(0);
            if *count == 0 {
                order.push(window);
            }
            *count += 1;
        }

        for window in order {
            let count = counts[window];
            if count >= 2 {
                motifs.push(Motif {
                    pattern: String::from_utf8_lossy(window).into_owned(),
                    count,
                    length,
                });
            }
        }
    }

    // Stable sort keeps first-occurrence order among equal keys.
    motifs.sort_by(|a, b| b.count.cmp(&a.count).then(b.length.cmp(&a.length)));
    motifs.truncate(MAX_MOTIFS);
    motifs
}
