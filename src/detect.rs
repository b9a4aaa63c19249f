use crate::chord::try_parse_chord;
use crate::model::Format;

/// A line consisting solely of this marker announces inline format.
pub(crate) const INLINE_MARKER: &str = "#mic#";

/// Keywords that open a standalone instrumental section.
const SECTION_KEYWORDS: [&str; 4] = ["intro", "ponte", "solo", "bridge"];

pub(crate) fn is_marker_line(line: &str) -> bool {
    line.trim() == INLINE_MARKER
}

/// The label of a section keyword line (`Intro:`, `PONTE:`, ...), matched
/// case-insensitively, trailing colon required. Returns the label with the
/// colon stripped and the author's casing kept.
pub(crate) fn section_label(line: &str) -> Option<&str> {
    let label = line.trim().strip_suffix(':')?;
    if SECTION_KEYWORDS.contains(&label.to_ascii_lowercase().as_str()) {
        Some(label)
    } else {
        None
    }
}

/// True when the line holds at least one token and every whitespace-
/// separated token is a chord, bracketed or bare.
pub(crate) fn is_chord_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|token| {
        let inner = token
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(token);
        try_parse_chord(inner).is_some()
    })
}

/// True when the line contains a `[..]` span holding a valid chord.
fn has_bracketed_chord(line: &str) -> bool {
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                if try_parse_chord(&after[..close]).is_some() {
                    return true;
                }
                rest = &after[close + 1..];
            }
            None => return false,
        }
    }
    false
}

/// Classify a raw text blob into one of the authoring conventions.
///
/// Rules, in priority order:
/// 1. a `#mic#` marker line with no section keyword anywhere is `Inline`;
/// 2. a section keyword line combined with the marker or with bracketed
///    chords inside lyric lines is `Mixed`;
/// 3. a chord-only line directly followed by a lyric line is `Above`;
/// 4. anything else is `Plain` and renders without chord handling.
///
/// Total and deterministic: every input classifies, nothing fails.
pub fn detect_format(source: &str) -> Format {
    let lines: Vec<&str> = source.lines().collect();
    let has_marker = lines.iter().any(|l| is_marker_line(l));
    let has_keyword = lines.iter().any(|l| section_label(l).is_some());

    if has_marker && !has_keyword {
        return Format::Inline;
    }

    let has_inline_chords = lines
        .iter()
        .any(|l| !is_chord_line(l) && has_bracketed_chord(l));
    if has_keyword && (has_marker || has_inline_chords) {
        return Format::Mixed;
    }

    for pair in lines.windows(2) {
        if is_chord_line(pair[0]) && !pair[1].trim().is_empty() && !is_chord_line(pair[1]) {
            return Format::Above;
        }
    }

    Format::Plain
}
