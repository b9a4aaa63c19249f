use crate::chord::try_parse_chord;
use crate::detect::is_chord_line;
use crate::model::Document;

/// The distinct chord symbols of a raw annotated text, as spelled in the
/// source, in first-occurrence order.
///
/// Runs the tokenizer over every bracket span and every bare token of
/// chord-only lines, whatever the document format. Untransposed, no side
/// effects, no rendering involved.
pub fn extract_chords(source: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for line in source.lines() {
        if is_chord_line(line) {
            for token in line.split_whitespace() {
                let inner = token
                    .strip_prefix('[')
                    .and_then(|t| t.strip_suffix(']'))
                    .unwrap_or(token);
                if try_parse_chord(inner).is_some() {
                    push_unique(&mut seen, inner);
                }
            }
        } else {
            collect_bracket_chords(line, &mut seen);
        }
    }
    seen
}

/// Same as [`extract_chords`], but over an already parsed document.
pub fn extract_document_chords(doc: &Document) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for section in &doc.sections {
        for line in &section.lines {
            for token in &line.chords {
                push_unique(&mut seen, &token.chord.raw);
            }
        }
    }
    seen
}

fn collect_bracket_chords(line: &str, seen: &mut Vec<String>) {
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                let inner = &after[..close];
                if try_parse_chord(inner).is_some() {
                    push_unique(seen, inner);
                }
                rest = &after[close + 1..];
            }
            None => return,
        }
    }
}

fn push_unique(seen: &mut Vec<String>, raw: &str) {
    if !seen.iter().any(|s| s == raw) {
        seen.push(raw.to_string());
    }
}
