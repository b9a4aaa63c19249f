//! # Document Model
//!
//! This module defines the structured representation of an annotated chord
//! sheet.
//!
//! ## Type Hierarchy
//! ```text
//! Document
//!   ├── format: Format (Inline | Above | Mixed | Plain)
//!   └── Vec<Section>
//!         ├── kind: SectionKind (Lyric | Instrumental)
//!         ├── label: Option<String> (e.g. "Intro", "Ponte")
//!         └── Vec<AnnotatedLine>
//!               ├── text: String (lyric text, annotation stripped)
//!               └── Vec<ChordToken>
//!                     ├── chord: ChordSymbol
//!                     └── anchor: usize (char offset / column)
//! ```
//!
//! ## Key Concepts
//!
//! ### Anchors
//! An anchor counts characters, not bytes: lyric text is accented UTF-8 and
//! a display column is a character cell. In inline lines the anchor is the
//! offset into `text` where the chord sits; in chord-only lines it is the
//! column the chord occupied in the source chord line.
//!
//! ### Non-destructive annotation
//! Concatenating the `text` of every line of every section reproduces the
//! lyric text of the source exactly. Chord lines, section keywords, and the
//! `#mic#` marker are annotation, not lyrics, and contribute nothing.
//!
//! A `Document` is built fresh on every parse call and owns all its data;
//! the engine holds no state between calls.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chord::ChordSymbol;
use crate::error::CifraError;

/// The authoring convention of a chord sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Chords in `[..]` brackets embedded in the lyric text, announced by a
    /// leading `#mic#` marker line.
    Inline,
    /// Chord-only lines above the lyric lines they annotate.
    Above,
    /// Labelled instrumental sections mixed with inline lyric sections.
    Mixed,
    /// No recognizable chord annotation; rendered as plain text.
    Plain,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Inline => "inline",
            Format::Above => "above",
            Format::Mixed => "mixed",
            Format::Plain => "plain",
        }
    }
}

impl FromStr for Format {
    type Err = CifraError;

    /// Parse a caller-supplied format label (`"inline"`, `"above"`,
    /// `"mixed"`, `"plain"`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inline" => Ok(Format::Inline),
            "above" => Ok(Format::Above),
            "mixed" => Ok(Format::Mixed),
            "plain" => Ok(Format::Plain),
            _ => Err(CifraError::UnknownFormat(s.to_string())),
        }
    }
}

/// A chord anchored to a position in a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordToken {
    pub chord: ChordSymbol,
    /// Character offset into the lyric text (inline) or column in the
    /// source chord line (above/instrumental).
    pub anchor: usize,
}

/// One line of lyric text with its anchored chords.
///
/// An instrumental line has chords and empty `text`; a plain lyric line has
/// text and no chords; a blank source line has neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedLine {
    pub text: String,
    pub chords: Vec<ChordToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Lyric,
    Instrumental,
}

/// A labelled block of a song: lyrics with chords, or chords alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Section keyword, colon stripped, author's casing kept ("Intro").
    pub label: Option<String>,
    pub lines: Vec<AnnotatedLine>,
}

/// A fully parsed chord sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub format: Format,
    pub sections: Vec<Section>,
}

impl Document {
    /// The lyric text with all chord annotation stripped, one line per
    /// source lyric line.
    pub fn lyric_text(&self) -> String {
        let lines: Vec<&str> = self
            .sections
            .iter()
            .flat_map(|section| section.lines.iter())
            .filter(|line| !line.text.is_empty() || line.chords.is_empty())
            .map(|line| line.text.as_str())
            .collect();
        lines.join("\n")
    }
}
