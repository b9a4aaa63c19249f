use log::debug;

use crate::chord::try_parse_chord;
use crate::detect::{detect_format, is_chord_line, is_marker_line};
use crate::model::{AnnotatedLine, ChordToken, Document, Format, Section, SectionKind};
use crate::section;

/// Parse a raw chord sheet, auto-detecting its format.
pub fn parse(source: &str) -> Document {
    parse_as(source, detect_format(source))
}

/// Parse a raw chord sheet as a known format.
pub fn parse_as(source: &str, format: Format) -> Document {
    let sections = match format {
        Format::Inline => vec![Section {
            kind: SectionKind::Lyric,
            label: None,
            lines: parse_inline(source),
        }],
        Format::Above => vec![Section {
            kind: SectionKind::Lyric,
            label: None,
            lines: parse_above(source),
        }],
        Format::Mixed => section::split_sections(source),
        Format::Plain => vec![Section {
            kind: SectionKind::Lyric,
            label: None,
            lines: source
                .lines()
                .map(|line| AnnotatedLine {
                    text: line.to_string(),
                    chords: Vec::new(),
                })
                .collect(),
        }],
    };
    Document { format, sections }
}

/// Parse inline-format text. A leading `#mic#` marker line is stripped;
/// every `[..]` span holding a valid chord becomes a token anchored at the
/// char offset of the text that follows it.
pub fn parse_inline(source: &str) -> Vec<AnnotatedLine> {
    let lines: Vec<&str> = source.lines().collect();
    parse_inline_block(&lines)
}

pub(crate) fn parse_inline_block(lines: &[&str]) -> Vec<AnnotatedLine> {
    let body = match lines.first() {
        Some(first) if is_marker_line(first) => &lines[1..],
        _ => lines,
    };
    body.iter().map(|line| parse_inline_line(line)).collect()
}

fn parse_inline_line(line: &str) -> AnnotatedLine {
    let mut text = String::with_capacity(line.len());
    let mut col = 0;
    let mut chords = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let run = &rest[..open];
        text.push_str(run);
        col += run.chars().count();

        let after = &rest[open + 1..];
        let close = after.find(']');
        let chord = close.and_then(|close| try_parse_chord(&after[..close]));
        match (close, chord) {
            (Some(close), Some(chord)) => {
                chords.push(ChordToken { chord, anchor: col });
                rest = &after[close + 1..];
            }
            (Some(close), None) => {
                // non-chord bracket content stays literal, brackets included
                debug!("unrecognized chord token '{}' kept as text", &after[..close]);
                let span = &after[..=close];
                text.push('[');
                text.push_str(span);
                col += 1 + span.chars().count();
                rest = &after[close + 1..];
            }
            (None, _) => {
                // unbalanced bracket: literal to end of line
                text.push('[');
                text.push_str(after);
                return AnnotatedLine { text, chords };
            }
        }
    }
    text.push_str(rest);
    AnnotatedLine { text, chords }
}

/// Parse above-format text two lines at a time: a chord-only line anchors
/// its chords, by column, over the lyric line that follows it. A chord line
/// with no lyric line after it stays as a lyric-less instrumental line.
pub fn parse_above(source: &str) -> Vec<AnnotatedLine> {
    let lines: Vec<&str> = source.lines().collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if !is_chord_line(line) {
            out.push(AnnotatedLine {
                text: line.to_string(),
                chords: Vec::new(),
            });
            i += 1;
            continue;
        }
        let chords = chord_tokens_by_column(line);
        let lyric = lines
            .get(i + 1)
            .copied()
            .filter(|next| !next.trim().is_empty() && !is_chord_line(next));
        match lyric {
            Some(lyric) => {
                out.push(AnnotatedLine {
                    text: lyric.to_string(),
                    chords,
                });
                i += 2;
            }
            None => {
                out.push(AnnotatedLine {
                    text: String::new(),
                    chords,
                });
                i += 1;
            }
        }
    }
    out
}

/// A chord-only line as a lyric-less annotated line.
pub(crate) fn chord_only_line(line: &str) -> AnnotatedLine {
    AnnotatedLine {
        text: String::new(),
        chords: chord_tokens_by_column(line),
    }
}

/// Tokens of a chord-only line, each anchored at the char column where it
/// starts. Brackets count toward the column but not toward the chord.
fn chord_tokens_by_column(line: &str) -> Vec<ChordToken> {
    let mut chords = Vec::new();
    let mut token = String::new();
    let mut token_col = 0;
    let mut col = 0;
    for c in line.chars() {
        if c.is_whitespace() {
            if !token.is_empty() {
                push_column_token(&mut chords, &token, token_col);
                token.clear();
            }
        } else {
            if token.is_empty() {
                token_col = col;
            }
            token.push(c);
        }
        col += 1;
    }
    if !token.is_empty() {
        push_column_token(&mut chords, &token, token_col);
    }
    chords
}

fn push_column_token(chords: &mut Vec<ChordToken>, token: &str, col: usize) {
    let inner = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(token);
    if let Some(chord) = try_parse_chord(inner) {
        chords.push(ChordToken { chord, anchor: col });
    } else {
        debug!("unrecognized chord token '{}' skipped", token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_strips_marker_and_anchors_chords() {
        let lines = parse_inline("#mic#\n[C]Deus está a[Am]qui");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Deus está aqui");
        assert_eq!(lines[0].chords.len(), 2);
        assert_eq!(lines[0].chords[0].chord.spelled(), "C");
        assert_eq!(lines[0].chords[0].anchor, 0);
        assert_eq!(lines[0].chords[1].chord.spelled(), "Am");
        // anchor counts chars, so the accented 'á' is one column
        assert_eq!(lines[0].chords[1].anchor, 11);
    }

    #[test]
    fn inline_keeps_non_chord_brackets_verbatim() {
        let lines = parse_inline("[xyz]text");
        assert_eq!(lines[0].text, "[xyz]text");
        assert!(lines[0].chords.is_empty());
    }

    #[test]
    fn inline_keeps_unbalanced_bracket_to_end_of_line() {
        let lines = parse_inline("la [C la la\nla la");
        assert_eq!(lines[0].text, "la [C la la");
        assert!(lines[0].chords.is_empty());
        assert_eq!(lines[1].text, "la la");
    }

    #[test]
    fn inline_mixes_chords_and_literal_brackets() {
        let lines = parse_inline("[C]la [x] la[G7]");
        assert_eq!(lines[0].text, "la [x] la");
        let anchors: Vec<usize> = lines[0].chords.iter().map(|t| t.anchor).collect();
        assert_eq!(anchors, [0, 9]);
    }

    #[test]
    fn above_pairs_chord_lines_with_lyrics() {
        let lines = parse_above("[C] [Am] [F] [G]\nDeus está aqui");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Deus está aqui");
        let anchors: Vec<usize> = lines[0].chords.iter().map(|t| t.anchor).collect();
        assert_eq!(anchors, [0, 4, 9, 13]);
    }

    #[test]
    fn above_keeps_trailing_chord_line_as_instrumental() {
        let lines = parse_above("C  G\nletra da música\nAm  Em");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "letra da música");
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[1].chords.len(), 2);
        assert_eq!(lines[1].chords[1].anchor, 4);
    }

    #[test]
    fn above_passes_plain_and_blank_lines_through() {
        let lines = parse_above("primeira linha\n\nC\nsegunda");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "primeira linha");
        assert_eq!(lines[1].text, "");
        assert!(lines[1].chords.is_empty());
        assert_eq!(lines[2].text, "segunda");
        assert_eq!(lines[2].chords[0].chord.spelled(), "C");
    }

    #[test]
    fn parse_dispatches_on_detected_format() {
        assert_eq!(parse("#mic#\n[C]oi").format, Format::Inline);
        assert_eq!(parse("[C]\nletra").format, Format::Above);
        assert_eq!(parse("só letra").format, Format::Plain);
        let doc = parse("Intro:\n[Am] [F]\n\n#mic#\n[C]Santo");
        assert_eq!(doc.format, Format::Mixed);
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn plain_documents_keep_every_line_unannotated() {
        let doc = parse_as("um\ndois\ntrês", Format::Plain);
        assert_eq!(doc.sections[0].lines.len(), 3);
        assert!(doc.sections[0].lines.iter().all(|l| l.chords.is_empty()));
        assert_eq!(doc.lyric_text(), "um\ndois\ntrês");
    }
}
