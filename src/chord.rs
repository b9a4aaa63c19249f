use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CifraError;

/// Canonical display spellings for the 12 pitch classes.
///
/// Sharps are preferred for the non-natural classes; the engine never emits
/// flat spellings. This table is the single source of truth for chord
/// display, so transposition round-trips are deterministic.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the 12 equal-tempered chromatic pitch classes, 0 = C through 11 = B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Build a pitch class from any semitone count, reduced modulo 12.
    pub fn new(semitones: i32) -> Self {
        Self(semitones.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Shift by `delta` semitones, wrapping within the octave.
    pub fn transposed(self, delta: i32) -> Self {
        Self::new(i32::from(self.0) + delta)
    }

    /// Canonical spelling from [`NOTE_NAMES`].
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    fn from_letter(letter: char) -> Option<Self> {
        let semitones = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        Some(Self(semitones))
    }
}

/// A parsed chord symbol: root pitch class, verbatim quality suffix,
/// optional slash bass, and the spelling as written in the source.
///
/// `quality` is copied verbatim and never interpreted beyond grammar
/// acceptance; `Cmaj7` and `C7M` are different spellings of different
/// symbols as far as this engine is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordSymbol {
    pub root: PitchClass,
    pub quality: String,
    pub bass: Option<PitchClass>,
    /// The chord exactly as it appeared in the source text.
    pub raw: String,
}

impl ChordSymbol {
    /// Canonical spelling: root name, quality verbatim, `/bass` if present.
    pub fn spelled(&self) -> String {
        let mut out = String::with_capacity(self.raw.len() + 2);
        out.push_str(self.root.name());
        out.push_str(&self.quality);
        if let Some(bass) = self.bass {
            out.push('/');
            out.push_str(bass.name());
        }
        out
    }

    /// Shift root and bass by `delta` semitones, respelling from the
    /// canonical table. A delta that reduces to zero is the identity and
    /// keeps the source spelling untouched.
    pub fn transposed(&self, delta: i32) -> ChordSymbol {
        if delta.rem_euclid(12) == 0 {
            return self.clone();
        }
        let mut out = ChordSymbol {
            root: self.root.transposed(delta),
            quality: self.quality.clone(),
            bass: self.bass.map(|b| b.transposed(delta)),
            raw: String::new(),
        };
        out.raw = out.spelled();
        out
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelled())
    }
}

impl FromStr for ChordSymbol {
    type Err = CifraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        try_parse_chord(s).ok_or_else(|| CifraError::InvalidChord(s.to_string()))
    }
}

/// Quality suffix atoms, longest first so prefixes never shadow.
/// Case matters: lowercase `m` is minor, `M`/`maj` is major.
const QUALITY_ATOMS: [&str; 11] = [
    "maj7", "dim7", "sus2", "sus4", "add9", "maj", "dim", "aug", "m7", "m", "M",
];

/// Try to read a chord symbol from `s`.
///
/// The whole input must match `Root Accidental? Quality* ('/' Root
/// Accidental?)?`; anything else yields `None`. Never panics, never errors:
/// callers treat rejected input as ordinary text.
pub fn try_parse_chord(s: &str) -> Option<ChordSymbol> {
    let (root, root_len) = parse_root(s)?;
    let rest = &s[root_len..];
    let quality_len = parse_quality(rest)?;
    let after = &rest[quality_len..];

    let bass = if after.is_empty() {
        None
    } else {
        let tail = after.strip_prefix('/')?;
        let (bass, bass_len) = parse_root(tail)?;
        if bass_len != tail.len() {
            return None;
        }
        Some(bass)
    };

    Some(ChordSymbol {
        root,
        quality: rest[..quality_len].to_string(),
        bass,
        raw: s.to_string(),
    })
}

/// Read `[A-G]` plus an optional `#`/`b`, returning the pitch class and the
/// number of bytes consumed.
fn parse_root(s: &str) -> Option<(PitchClass, usize)> {
    let mut chars = s.chars();
    let root = PitchClass::from_letter(chars.next()?)?;
    match chars.next() {
        Some('#') => Some((root.transposed(1), 2)),
        Some('b') => Some((root.transposed(-1), 2)),
        _ => Some((root, 1)),
    }
}

/// Longest-match scan over quality atoms and digit runs. Returns the byte
/// length of the accepted suffix, stopping at `/` or end of input, or
/// `None` if a character matches no atom.
fn parse_quality(s: &str) -> Option<usize> {
    let mut pos = 0;
    'scan: while pos < s.len() {
        let rest = &s[pos..];
        if rest.starts_with('/') {
            break;
        }
        for atom in QUALITY_ATOMS {
            if rest.starts_with(atom) {
                pos += atom.len();
                continue 'scan;
            }
        }
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        pos += digits;
    }
    Some(pos)
}
