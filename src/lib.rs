//! Chord-notation processing and transposition engine.
//!
//! Parses song lyrics annotated with chord symbols in three authoring
//! conventions (inline `[C]` brackets behind a `#mic#` marker, chord-only
//! lines above the lyrics, and mixed documents with labelled instrumental
//! sections), renders them to display HTML without collisions between
//! chords and lyrics, transposes by any semitone offset with canonical
//! sharp spellings, and extracts the distinct chords of a song.
//!
//! The engine is a pure, synchronous text transformation library: no I/O,
//! no persistence, no shared state between calls.

pub mod api;
pub mod chord;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod section;
pub mod transpose;

pub use api::{process_chords, process_mixed_chords};
pub use chord::{try_parse_chord, ChordSymbol, PitchClass, NOTE_NAMES};
pub use detect::detect_format;
pub use error::CifraError;
pub use extract::{extract_chords, extract_document_chords};
pub use model::*;
pub use parser::{parse, parse_above, parse_as, parse_inline};
pub use render::{process_chord_html, render};
pub use section::split_sections;
pub use transpose::{transpose, transpose_text};
