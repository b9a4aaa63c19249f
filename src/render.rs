use pulldown_cmark::{html, Parser};

use crate::chord::try_parse_chord;
use crate::model::{AnnotatedLine, ChordToken, Document, Format, Section, SectionKind};

/// Render markdown to HTML with the engine's markdown settings. The inline
/// pipeline runs this pass first and injects chord spans afterwards, so
/// chord brackets never fight emphasis or link syntax inside the grammar.
pub(crate) fn markdown_to_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    html::push_html(&mut out, Parser::new(source));
    out
}

fn chord_span(out: &mut String, spelled: &str) {
    out.push_str("<span class=\"chord\">");
    out.push_str(&html_escape::encode_text(spelled));
    out.push_str("</span>");
}

/// Serialize a parsed document to display HTML.
///
/// The output is structural only: each format wraps in its container class
/// (`chord-container-inline` / `chord-container-above`) and the external
/// stylesheet owns fonts and positioning.
pub fn render(doc: &Document) -> String {
    match doc.format {
        Format::Inline => {
            let mut out = String::new();
            inline_container(&mut out, doc.sections.iter().flat_map(|s| s.lines.iter()));
            out
        }
        Format::Above => {
            let mut out = String::new();
            above_container(&mut out, doc.sections.iter().flat_map(|s| s.lines.iter()));
            out
        }
        Format::Mixed => render_mixed(&doc.sections),
        Format::Plain => markdown_to_html(&doc.lyric_text()),
    }
}

fn render_mixed(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        if let Some(label) = &section.label {
            section_heading(&mut out, label);
        }
        match section.kind {
            SectionKind::Instrumental => above_container(&mut out, section.lines.iter()),
            SectionKind::Lyric => inline_container(&mut out, section.lines.iter()),
        }
    }
    out
}

pub(crate) fn section_heading(out: &mut String, label: &str) {
    out.push_str("<h4 class=\"section-label\">");
    out.push_str(&html_escape::encode_text(label));
    out.push_str("</h4>\n");
}

fn inline_container<'a>(out: &mut String, lines: impl Iterator<Item = &'a AnnotatedLine>) {
    out.push_str("<div class=\"chord-container-inline\">\n");
    for line in lines {
        out.push_str("<div class=\"lyric-line\">");
        inline_line_html(out, line);
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

/// Inject chord spans into a lyric line at their char anchors.
fn inline_line_html(out: &mut String, line: &AnnotatedLine) {
    let mut chars = line.text.chars();
    let mut col = 0;
    for token in &line.chords {
        let run: String = chars.by_ref().take(token.anchor.saturating_sub(col)).collect();
        col = token.anchor;
        out.push_str(&html_escape::encode_text(&run));
        chord_span(out, &token.chord.spelled());
    }
    let tail: String = chars.collect();
    out.push_str(&html_escape::encode_text(&tail));
}

pub(crate) fn above_container<'a>(out: &mut String, lines: impl Iterator<Item = &'a AnnotatedLine>) {
    out.push_str("<div class=\"chord-container-above\">\n");
    for line in lines {
        if !line.chords.is_empty() {
            out.push_str("<div class=\"chord-row\">");
            chord_row_html(out, &line.chords);
            out.push_str("</div>\n");
        }
        if !line.text.is_empty() || line.chords.is_empty() {
            out.push_str("<div class=\"lyric-row\">");
            out.push_str(&html_escape::encode_text(&line.text));
            out.push_str("</div>\n");
        }
    }
    out.push_str("</div>\n");
}

/// Lay chords out by column, left to right. A chord starts at its anchor
/// unless the previous glyph would collide, in which case it shifts right
/// by the minimum that keeps one blank cell between them. Transposition can
/// widen a symbol (`A` to `A#`); the lyric row below never moves.
fn chord_row_html(out: &mut String, chords: &[ChordToken]) {
    let mut cursor = 0;
    for token in chords {
        let min_col = if cursor == 0 { 0 } else { cursor + 1 };
        let col = token.anchor.max(min_col);
        for _ in cursor..col {
            out.push(' ');
        }
        let spelled = token.chord.spelled();
        cursor = col + spelled.chars().count();
        chord_span(out, &spelled);
    }
}

/// Post-process HTML already produced by the markdown engine: every
/// surviving `[..]` span whose content is a valid chord becomes a styled
/// span, and everything else, tags included, passes through untouched. The
/// result is wrapped in the inline container.
pub fn process_chord_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + 64);
    out.push_str("<div class=\"chord-container-inline\">\n");
    inject_chord_spans(&mut out, html);
    out.push_str("\n</div>\n");
    out
}

fn inject_chord_spans(out: &mut String, html: &str) {
    let mut rest = html;
    while let Some(pos) = rest.find(['<', '[']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(after_tag) = rest.strip_prefix('<') {
            // copy the tag through verbatim
            match after_tag.find('>') {
                Some(end) => {
                    out.push_str(&rest[..end + 2]);
                    rest = &after_tag[end + 1..];
                }
                None => {
                    out.push_str(rest);
                    return;
                }
            }
            continue;
        }

        let after = &rest[1..];
        let span = after
            .find([']', '<'])
            .filter(|&i| after[i..].starts_with(']'))
            .and_then(|i| try_parse_chord(&after[..i]).map(|chord| (i, chord)));
        match span {
            Some((close, chord)) => {
                chord_span(out, &chord.spelled());
                rest = &after[close + 1..];
            }
            None => {
                out.push('[');
                rest = after;
            }
        }
    }
    out.push_str(rest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_as};
    use crate::transpose::transpose;

    #[test]
    fn above_rendering_places_chords_and_lyrics() {
        let doc = parse_as("[C] [Am] [F] [G]\nDeus está aqui", Format::Above);
        let html = render(&doc);
        assert!(html.starts_with("<div class=\"chord-container-above\">"));
        assert!(html.contains(
            "<div class=\"chord-row\"><span class=\"chord\">C</span>   \
             <span class=\"chord\">Am</span>"
        ));
        assert!(html.contains("<div class=\"lyric-row\">Deus está aqui</div>"));
    }

    #[test]
    fn above_rendering_rejustifies_after_transposition() {
        // C at column 0, D at column 2: C# grows to two cells, so D# must
        // shift right instead of overlapping it
        let doc = parse_as("C D\nletra aqui", Format::Above);
        let up = transpose(&doc, 1);
        let html = render(&up);
        assert!(html.contains(
            "<span class=\"chord\">C#</span> <span class=\"chord\">D#</span>"
        ));
        assert!(html.contains("<div class=\"lyric-row\">letra aqui</div>"));
    }

    #[test]
    fn above_rendering_keeps_wide_gaps() {
        let doc = parse_as("C    Am\nletra aqui mesmo", Format::Above);
        let html = render(&doc);
        assert!(html.contains(
            "<span class=\"chord\">C</span>    <span class=\"chord\">Am</span>"
        ));
    }

    #[test]
    fn inline_rendering_injects_spans_at_anchors() {
        let doc = parse_as("#mic#\n[C]Deus está a[Am]qui", Format::Inline);
        let html = render(&doc);
        assert!(html.starts_with("<div class=\"chord-container-inline\">"));
        assert!(html.contains(
            "<span class=\"chord\">C</span>Deus está a<span class=\"chord\">Am</span>qui"
        ));
    }

    #[test]
    fn lyric_text_is_escaped() {
        let doc = parse_as("#mic#\n[C]pão & <vinho>", Format::Inline);
        let html = render(&doc);
        assert!(html.contains("pão &amp; &lt;vinho&gt;"));
    }

    #[test]
    fn process_chord_html_wraps_and_injects() {
        let html = process_chord_html("<p>[C]Deus está a[Am]qui</p>\n");
        assert!(html.starts_with("<div class=\"chord-container-inline\">"));
        assert!(html.contains(
            "<p><span class=\"chord\">C</span>Deus está a<span class=\"chord\">Am</span>qui</p>"
        ));
        assert!(html.ends_with("</div>\n"));
    }

    #[test]
    fn process_chord_html_leaves_non_chords_alone() {
        let html = process_chord_html("<p>[xyz]text <em>[see]</em></p>");
        assert!(html.contains("<p>[xyz]text <em>[see]</em></p>"));
        assert!(!html.contains("chord\">"));
    }

    #[test]
    fn process_chord_html_never_crosses_tags() {
        let html = process_chord_html("<p>[C<em>]</em></p>");
        assert!(html.contains("<p>[C<em>]</em></p>"));
    }

    #[test]
    fn mixed_rendering_emits_labels_and_both_containers() {
        let doc = parse("Intro:\n[Am] [F] [C] [G]\n\n#mic#\n[C]Santo");
        let html = render(&doc);
        assert!(html.contains("<h4 class=\"section-label\">Intro</h4>"));
        assert!(html.contains("chord-container-above"));
        assert!(html.contains("chord-container-inline"));
        assert!(html.contains("<span class=\"chord\">Am</span>"));
        assert!(html.contains("<span class=\"chord\">C</span>Santo"));
    }

    #[test]
    fn plain_documents_render_as_markdown() {
        let doc = parse_as("uma **linha** simples", Format::Plain);
        let html = render(&doc);
        assert!(html.contains("<strong>linha</strong>"));
        assert!(!html.contains("chord-container"));
    }
}
