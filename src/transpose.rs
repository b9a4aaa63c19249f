use crate::chord::try_parse_chord;
use crate::detect::is_chord_line;
use crate::model::{AnnotatedLine, ChordToken, Document, Section};

/// Transpose every chord token in the document by `delta` semitones.
/// Lyric text, anchors, and section structure are copied unchanged.
pub fn transpose(doc: &Document, delta: i32) -> Document {
    Document {
        format: doc.format,
        sections: doc
            .sections
            .iter()
            .map(|section| Section {
                kind: section.kind,
                label: section.label.clone(),
                lines: section
                    .lines
                    .iter()
                    .map(|line| AnnotatedLine {
                        text: line.text.clone(),
                        chords: line
                            .chords
                            .iter()
                            .map(|token| ChordToken {
                                chord: token.chord.transposed(delta),
                                anchor: token.anchor,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Transpose annotated text by `delta` semitones, returning text in the
/// same notation.
///
/// Chord tokens are rewritten in place with canonical sharp spellings
/// (bracket interiors everywhere, bare tokens on chord-only lines) and
/// every other byte, whitespace runs included, is preserved. That makes
/// transposing by `delta` and then by `-delta` restore canonically-spelled
/// input exactly; a delta that reduces to zero returns the input verbatim.
pub fn transpose_text(source: &str, delta: i32) -> String {
    if delta.rem_euclid(12) == 0 {
        return source.to_string();
    }
    source
        .split('\n')
        .map(|line| transpose_line(line, delta))
        .collect::<Vec<_>>()
        .join("\n")
}

fn transpose_line(line: &str, delta: i32) -> String {
    if is_chord_line(line) {
        transpose_chord_line(line, delta)
    } else {
        transpose_bracket_spans(line, delta)
    }
}

/// Rewrite every token of a chord-only line, keeping whitespace verbatim.
fn transpose_chord_line(line: &str, delta: i32) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut token = String::new();
    for c in line.chars() {
        if c.is_whitespace() {
            if !token.is_empty() {
                out.push_str(&transpose_token(&token, delta));
                token.clear();
            }
            out.push(c);
        } else {
            token.push(c);
        }
    }
    if !token.is_empty() {
        out.push_str(&transpose_token(&token, delta));
    }
    out
}

fn transpose_token(token: &str, delta: i32) -> String {
    let bracketed = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'));
    match bracketed {
        Some(inner) => match try_parse_chord(inner) {
            Some(chord) => format!("[{}]", chord.transposed(delta).spelled()),
            None => token.to_string(),
        },
        None => match try_parse_chord(token) {
            Some(chord) => chord.transposed(delta).spelled(),
            None => token.to_string(),
        },
    }
}

/// Rewrite the `[..]` chord spans of a lyric line, leaving everything else
/// untouched. Non-chord and unbalanced brackets stay literal.
fn transpose_bracket_spans(line: &str, delta: i32) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                match try_parse_chord(&after[..close]) {
                    Some(chord) => {
                        out.push('[');
                        out.push_str(&chord.transposed(delta).spelled());
                        out.push(']');
                    }
                    None => {
                        out.push('[');
                        out.push_str(&after[..=close]);
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push('[');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn inline_text_transposes_in_place() {
        assert_eq!(
            transpose_text("#mic#\n[C]Deus está a[Am]qui", 2),
            "#mic#\n[D]Deus está a[Bm]qui"
        );
    }

    #[test]
    fn chord_lines_transpose_with_canonical_sharps() {
        assert_eq!(
            transpose_text("[C] [Am] [F] [G]\nDeus está aqui", -1),
            "[B] [G#m] [E] [F#]\nDeus está aqui"
        );
    }

    #[test]
    fn bare_chord_lines_keep_their_whitespace() {
        assert_eq!(transpose_text("C   Am\nletra aqui", 2), "D   Bm\nletra aqui");
        assert_eq!(transpose_text("  G  D/F#  ", 5), "  C  G/B  ");
    }

    #[test]
    fn zero_delta_returns_the_input_verbatim() {
        let source = "[Bb] [Eb]\nletra";
        assert_eq!(transpose_text(source, 0), source);
        assert_eq!(transpose_text(source, 12), source);
        assert_eq!(transpose_text(source, -12), source);
    }

    #[test]
    fn bare_words_in_lyric_lines_are_not_chords() {
        // "a" and "E" are Portuguese words here, not chords: only the
        // bracketed spans move
        assert_eq!(
            transpose_text("E [C]vamos a[G]qui", 2),
            "E [D]vamos a[A]qui"
        );
    }

    #[test]
    fn malformed_tokens_stay_literal() {
        assert_eq!(transpose_text("[xyz]text", 3), "[xyz]text");
        assert_eq!(transpose_text("la [C la la", 3), "la [C la la");
    }

    #[test]
    fn round_trip_restores_canonical_input() {
        let source = "Intro:\n[Am] [F] [C] [G]\n\n#mic#\n[C]Santo, [D/F#]santo";
        for delta in [1, 2, 5, 7, 11, 13, -3] {
            let there = transpose_text(source, delta);
            assert_eq!(transpose_text(&there, -delta), source, "delta {}", delta);
        }
    }

    #[test]
    fn document_transposition_keeps_structure() {
        let doc = parse("[C] [Am]\nDeus está aqui");
        let up = transpose(&doc, 2);
        assert_eq!(up.format, doc.format);
        assert_eq!(up.lyric_text(), doc.lyric_text());
        let spelled: Vec<String> = up.sections[0].lines[0]
            .chords
            .iter()
            .map(|t| t.chord.spelled())
            .collect();
        assert_eq!(spelled, ["D", "Bm"]);
        let anchors_up: Vec<usize> = up.sections[0].lines[0].chords.iter().map(|t| t.anchor).collect();
        let anchors: Vec<usize> = doc.sections[0].lines[0].chords.iter().map(|t| t.anchor).collect();
        assert_eq!(anchors_up, anchors);
    }

    #[test]
    fn transpose_periodicity_on_text() {
        let source = "[C#m] [F#] [B]\nletra";
        assert_eq!(transpose_text(source, 3), transpose_text(source, 15));
    }
}
