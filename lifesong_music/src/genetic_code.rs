// The standard genetic code and the per-codon musical lookup tables.
//
// A DNA sequence is read as non-overlapping codons (base triplets). Each of
// the 64 codons translates to one amino acid (or a stop marker) via the
// standard genetic code, which is a biological constant reproduced exactly
// here. On top of that, each codon carries a melodic scale degree used by
// melody.rs.
//
// All tables are `const` arrays indexed by `Codon::index()`, so there is no
// runtime-mutable state and completeness is checked by the tests below.
//
// Used by analysis.rs (codon splitting, amino-acid statistics), progression.rs
// (dominant amino-acid class), and every track generator.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One nucleotide. Anything outside A/T/G/C is not a `Base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    A = 0,
    T = 1,
    G = 2,
    C = 3,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::T, Base::G, Base::C];

    /// Parse one byte, case-insensitively. Returns None for noise characters.
    pub fn from_byte(byte: u8) -> Option<Base> {
        match byte.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'T' => Some(Base::T),
            b'G' => Some(Base::G),
            b'C' => Some(Base::C),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::T => 'T',
            Base::G => 'G',
            Base::C => 'C',
        }
    }
}

/// The 20 standard amino acids plus the stop marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

/// Biochemical character of an amino acid side chain. Drives progression
/// style (progression.rs), melody register (melody.rs) and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoClass {
    Hydrophobic,
    Polar,
    Charged,
    Aromatic,
}

impl AminoAcid {
    /// Number of distinct values, including `Stop`.
    pub const COUNT: usize = 21;

    /// One-letter IUPAC code; `'*'` for stop.
    pub fn symbol(self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Arg => 'R',
            AminoAcid::Asn => 'N',
            AminoAcid::Asp => 'D',
            AminoAcid::Cys => 'C',
            AminoAcid::Gln => 'Q',
            AminoAcid::Glu => 'E',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Leu => 'L',
            AminoAcid::Lys => 'K',
            AminoAcid::Met => 'M',
            AminoAcid::Phe => 'F',
            AminoAcid::Pro => 'P',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
            AminoAcid::Val => 'V',
            AminoAcid::Stop => '*',
        }
    }

    pub fn is_stop(self) -> bool {
        self == AminoAcid::Stop
    }

    /// Dense index in 0..COUNT for frequency tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Side-chain class. Glycine and proline are grouped with the
    /// hydrophobics, cysteine with the polars, histidine with the charged.
    pub fn class(self) -> Option<AminoClass> {
        use AminoAcid::*;
        match self {
            Ala | Val | Leu | Ile | Met | Pro | Gly => Some(AminoClass::Hydrophobic),
            Phe | Trp | Tyr => Some(AminoClass::Aromatic),
            Ser | Thr | Asn | Gln | Cys => Some(AminoClass::Polar),
            Asp | Glu | Lys | Arg | His => Some(AminoClass::Charged),
            Stop => None,
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// Amino acids serialize as their one-letter code.
impl Serialize for AminoAcid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.symbol())
    }
}

/// Three consecutive valid bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon(pub [Base; 3]);

impl Codon {
    /// Parse exactly three bytes. Returns None if the slice has the wrong
    /// length or holds any non-ATGC byte.
    pub fn from_bytes(bytes: &[u8]) -> Option<Codon> {
        match bytes {
            [a, b, c] => Some(Codon([
                Base::from_byte(*a)?,
                Base::from_byte(*b)?,
                Base::from_byte(*c)?,
            ])),
            _ => None,
        }
    }

    /// Rebuild a codon from its table index (0..64).
    pub fn from_index(index: usize) -> Codon {
        let index = index % 64;
        Codon([
            Base::ALL[index / 16],
            Base::ALL[(index / 4) % 4],
            Base::ALL[index % 4],
        ])
    }

    /// Base-4 table index, first base most significant.
    pub fn index(self) -> usize {
        let [a, b, c] = self.0;
        a.index() * 16 + b.index() * 4 + c.index()
    }

    pub fn first(self) -> Base {
        self.0[0]
    }

    pub fn second(self) -> Base {
        self.0[1]
    }

    pub fn third(self) -> Base {
        self.0[2]
    }

    pub fn amino_acid(self) -> AminoAcid {
        CODON_TABLE[self.index()]
    }

    pub fn is_stop(self) -> bool {
        self.amino_acid().is_stop()
    }

    pub fn is_start(self) -> bool {
        self.0 == [Base::A, Base::T, Base::G]
    }

    /// Melodic scale degree (0-6), or None for stop codons.
    pub fn melodic_degree(self) -> Option<u8> {
        u8::try_from(CODON_DEGREE[self.index()]).ok()
    }

    pub fn as_string(self) -> String {
        self.0.iter().map(|b| b.as_char()).collect()
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.0 {
            write!(f, "{}", base.as_char())?;
        }
        Ok(())
    }
}

impl Serialize for Codon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

/// Standard genetic code, indexed by `Codon::index()`.
/// Rows are the first base (A, T, G, C); within a row the second base varies
/// slowest and the third fastest, both in A, T, G, C order.
const CODON_TABLE: [AminoAcid; 64] = {
    use AminoAcid::*;
    [
        // A--
        Lys, Asn, Lys, Asn, Ile, Ile, Met, Ile, Arg, Ser, Arg, Ser, Thr, Thr, Thr, Thr,
        // T--
        Stop, Tyr, Stop, Tyr, Leu, Phe, Leu, Phe, Stop, Cys, Trp, Cys, Ser, Ser, Ser, Ser,
        // G--
        Glu, Asp, Glu, Asp, Val, Val, Val, Val, Gly, Gly, Gly, Gly, Ala, Ala, Ala, Ala,
        // C--
        Gln, His, Gln, His, Leu, Leu, Leu, Leu, Arg, Arg, Arg, Arg, Pro, Pro, Pro, Pro,
    ]
};

/// Codon → melodic scale degree, -1 for stop codons. Same layout as
/// `CODON_TABLE`. The first two bases pick the degree family (A=0, T=1, G=2,
/// C=3, summed); the third base nudges it (G +1, C +2), modulo 7.
const CODON_DEGREE: [i8; 64] = [
    // A--
    0, 0, 1, 2, 1, 1, 2, 3, 2, 2, 3, 4, 3, 3, 4, 5,
    // T--
    -1, 1, -1, 3, 2, 2, 3, 4, -1, 3, 4, 5, 4, 4, 5, 6,
    // G--
    2, 2, 3, 4, 3, 3, 4, 5, 4, 4, 5, 6, 5, 5, 6, 0,
    // C--
    3, 3, 4, 5, 4, 4, 5, 6, 5, 5, 6, 0, 6, 6, 0, 1,
];

/// Split a cleaned sequence into codons: triplets at offsets 0, 3, 6, ...
/// Triplets containing any invalid byte are dropped, as is a trailing group
/// shorter than three.
pub fn split_codons(sequence: &[u8]) -> Vec<Codon> {
    sequence.chunks_exact(3).filter_map(Codon::from_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(s: &str) -> Codon {
        Codon::from_bytes(s.as_bytes()).unwrap()
    }

    #[test]
    fn test_all_64_codons_translate() {
        let mut stops = 0;
        let mut seen = [false; AminoAcid::COUNT];
        for i in 0..64 {
            let c = Codon::from_index(i);
            assert_eq!(c.index(), i);
            let aa = c.amino_acid();
            seen[aa.index()] = true;
            if aa.is_stop() {
                stops += 1;
            }
        }
        assert_eq!(stops, 3);
        assert!(seen.iter().all(|&s| s), "every amino acid must be reachable");
    }

    #[test]
    fn test_known_translations() {
        assert_eq!(codon("ATG").amino_acid().symbol(), 'M');
        assert_eq!(codon("TAA").amino_acid(), AminoAcid::Stop);
        assert_eq!(codon("TAG").amino_acid(), AminoAcid::Stop);
        assert_eq!(codon("TGA").amino_acid(), AminoAcid::Stop);
        assert_eq!(codon("GGG").amino_acid().symbol(), 'G');
        assert_eq!(codon("TGG").amino_acid().symbol(), 'W');
        assert_eq!(codon("TTT").amino_acid().symbol(), 'F');
        assert_eq!(codon("AGA").amino_acid().symbol(), 'R');
        assert_eq!(codon("CAT").amino_acid().symbol(), 'H');
        assert_eq!(codon("GAC").amino_acid().symbol(), 'D');
    }

    #[test]
    fn test_degree_table_matches_stops() {
        for i in 0..64 {
            let c = Codon::from_index(i);
            match c.melodic_degree() {
                None => assert!(c.is_stop(), "{c} has no degree but is not a stop"),
                Some(d) => {
                    assert!(!c.is_stop());
                    assert!(d < 7, "{c} degree {d} out of range");
                }
            }
        }
    }

    #[test]
    fn test_classes() {
        assert_eq!(AminoAcid::Leu.class(), Some(AminoClass::Hydrophobic));
        assert_eq!(AminoAcid::Trp.class(), Some(AminoClass::Aromatic));
        assert_eq!(AminoAcid::Ser.class(), Some(AminoClass::Polar));
        assert_eq!(AminoAcid::Lys.class(), Some(AminoClass::Charged));
        assert_eq!(AminoAcid::Stop.class(), None);
    }

    #[test]
    fn test_split_codons_drops_noise_and_tail() {
        let codons = split_codons(b"ATGNNNGGGCC");
        assert_eq!(codons, vec![codon("ATG"), codon("GGG")]);
        assert!(split_codons(b"AT").is_empty());
    }

    #[test]
    fn test_codon_serializes_as_string() {
        let json = serde_json::to_string(&codon("ATG")).unwrap();
        assert_eq!(json, "\"ATG\"");
        let json = serde_json::to_string(&AminoAcid::Stop).unwrap();
        assert_eq!(json, "\"*\"");
    }
}
