//! # Public API
//!
//! This module contains the main entry points for the chord engine.
//!
//! ## Pipeline Functions
//!
//! - [`process_chords()`] - Full pipeline to HTML, format auto-detected or given
//! - [`process_chord_html()`] - Chord-span injection into markdown-rendered HTML
//! - [`process_mixed_chords()`] - Full pipeline to HTML for mixed documents
//! - [`transpose_text()`] - Transposition in the source notation, not HTML
//! - [`extract_chords()`] - Ordered unique chord symbols for UI badges
//!
//! Every entry point is a stateless, total transformation of its arguments:
//! nothing is cached, nothing is shared between calls, and malformed input
//! degrades to literal text instead of failing.
//!
//! ## Typical Usage
//!
//! ```rust
//! use cifra::process_chords;
//!
//! let source = "#mic#\n[C]Deus está a[Am]qui";
//! let html = process_chords(source, None);
//! assert!(html.contains("<span class=\"chord\">C</span>"));
//! ```
//!
//! Transposition works on the stored text and re-enters the pipeline:
//!
//! ```rust
//! use cifra::{process_chords, transpose_text};
//!
//! let source = "#mic#\n[C]Deus está a[Am]qui";
//! let up_two = transpose_text(source, 2);
//! assert_eq!(up_two, "#mic#\n[D]Deus está a[Bm]qui");
//! let html = process_chords(&up_two, None);
//! assert!(html.contains("<span class=\"chord\">Bm</span>"));
//! ```

use crate::detect::{detect_format, is_marker_line};
use crate::model::Format;
use crate::parser::parse_as;
use crate::render::{self, markdown_to_html, process_chord_html};
use crate::section;

/// Render a raw chord sheet to display HTML.
///
/// With `format: None` the convention is auto-detected; passing a format
/// forces it (the UI does this when the author has picked one explicitly).
///
/// # Pipeline
/// - inline: markdown first, then chord-span injection ([`process_chord_html`])
/// - above: parse chord/lyric line pairs, render columns with collision-free
///   chord placement
/// - mixed: per-section dispatch, instrumental blocks as standalone chord rows
/// - plain: markdown passthrough, no chord handling
///
/// # Example
/// ```rust
/// use cifra::{process_chords, Format};
///
/// let html = process_chords("[C] [G]\nDeus está aqui", Some(Format::Above));
/// assert!(html.starts_with("<div class=\"chord-container-above\">"));
/// ```
pub fn process_chords(source: &str, format: Option<Format>) -> String {
    let format = format.unwrap_or_else(|| detect_format(source));
    match format {
        Format::Inline => process_chord_html(&markdown_to_html(strip_inline_marker(source))),
        Format::Above => render::render(&parse_as(source, Format::Above)),
        Format::Mixed => process_mixed_chords(source),
        Format::Plain => markdown_to_html(source),
    }
}

/// Render a mixed document to display HTML.
///
/// Sections split on blank lines and keyword lines. A keyword becomes an
/// `<h4 class="section-label">` heading; instrumental blocks render as
/// standalone chord rows; lyric blocks run the inline two-pass pipeline
/// (markdown, then chord-span injection).
pub fn process_mixed_chords(source: &str) -> String {
    let mut out = String::new();
    for block in section::split_blocks(source) {
        if let Some(label) = &block.label {
            render::section_heading(&mut out, label);
        }
        if block.is_instrumental() {
            let lines: Vec<_> = block
                .lines
                .iter()
                .map(|line| crate::parser::chord_only_line(line))
                .collect();
            render::above_container(&mut out, lines.iter());
        } else {
            let body = lyric_block_body(&block.lines);
            out.push_str(&process_chord_html(&markdown_to_html(&body)));
        }
    }
    out
}

/// The markdown source of a lyric block, leading `#mic#` marker dropped.
fn lyric_block_body(lines: &[&str]) -> String {
    let body = match lines.first() {
        Some(first) if is_marker_line(first) => &lines[1..],
        _ => lines,
    };
    body.join("\n")
}

fn strip_inline_marker(source: &str) -> &str {
    match source.split_once('\n') {
        Some((first, rest)) if is_marker_line(first) => rest,
        None if is_marker_line(source) => "",
        _ => source,
    }
}
