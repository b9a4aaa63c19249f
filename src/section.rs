use crate::detect::{is_chord_line, section_label};
use crate::model::{Section, SectionKind};
use crate::parser;

/// A raw block of a mixed document: consecutive non-blank lines, optionally
/// opened by a section keyword line.
pub(crate) struct Block<'a> {
    pub label: Option<String>,
    pub lines: Vec<&'a str>,
}

impl Block<'_> {
    /// A block is instrumental when every line is a chord-only line.
    pub fn is_instrumental(&self) -> bool {
        self.lines.iter().all(|line| is_chord_line(line))
    }
}

/// Partition a mixed document into blocks, splitting on blank lines and
/// section keyword lines. The keyword line itself becomes the label of the
/// block it opens and is not part of the block body.
pub(crate) fn split_blocks(source: &str) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;

    for line in source.lines() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        if let Some(label) = section_label(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(Block {
                label: Some(label.to_string()),
                lines: Vec::new(),
            });
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                label: None,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }
    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

/// Split a mixed document into ordered sections.
///
/// Instrumental blocks keep their chords as lyric-less lines anchored by
/// column; lyric blocks run through the inline line parser.
pub fn split_sections(source: &str) -> Vec<Section> {
    split_blocks(source)
        .into_iter()
        .map(|block| {
            if block.is_instrumental() {
                Section {
                    kind: SectionKind::Instrumental,
                    label: block.label,
                    lines: block
                        .lines
                        .iter()
                        .map(|line| parser::chord_only_line(line))
                        .collect(),
                }
            } else {
                Section {
                    kind: SectionKind::Lyric,
                    label: block.label,
                    lines: parser::parse_inline_block(&block.lines),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_keywords_and_blank_lines() {
        let source = "Intro:\n[Am] [F] [C] [G]\n\n#mic#\n[C]Santo";
        let sections = split_sections(source);
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].kind, SectionKind::Instrumental);
        assert_eq!(sections[0].label.as_deref(), Some("Intro"));
        assert_eq!(sections[0].lines.len(), 1);
        assert_eq!(sections[0].lines[0].text, "");
        assert_eq!(sections[0].lines[0].chords.len(), 4);

        assert_eq!(sections[1].kind, SectionKind::Lyric);
        assert_eq!(sections[1].label, None);
        assert_eq!(sections[1].lines.len(), 1);
        assert_eq!(sections[1].lines[0].text, "Santo");
    }

    #[test]
    fn keyword_line_is_not_parsed_as_a_chord_line() {
        let sections = split_sections("Solo:\n[E] [A]");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label.as_deref(), Some("Solo"));
        assert_eq!(sections[0].kind, SectionKind::Instrumental);
        let spelled: Vec<String> = sections[0].lines[0]
            .chords
            .iter()
            .map(|t| t.chord.spelled())
            .collect();
        assert_eq!(spelled, ["E", "A"]);
    }

    #[test]
    fn back_to_back_keywords_split_blocks() {
        let source = "Intro:\n[C]\nBridge:\n[G] [D]";
        let sections = split_sections(source);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label.as_deref(), Some("Intro"));
        assert_eq!(sections[1].label.as_deref(), Some("Bridge"));
    }

    #[test]
    fn unlabeled_lyric_block_keeps_its_text() {
        let sections = split_sections("Deus está aqui\n[C]hoje");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Lyric);
        assert_eq!(sections[0].lines[0].text, "Deus está aqui");
        assert_eq!(sections[0].lines[1].text, "hoje");
    }
}
