//! Markdown rendering for reconstructed documents.

use crate::error::Result;
use crate::pipeline::{ParagraphKind, ReflowedDocument};

use super::text::{is_selected, selected_groups};
use super::RenderOptions;

/// Convert a reconstructed document to Markdown.
///
/// Headings become level-2 headings; running headers and footers, when
/// enabled, are emitted as block quotes.
pub fn to_markdown(doc: &ReflowedDocument, options: &RenderOptions) -> Result<String> {
    let mut blocks: Vec<String> = Vec::new();

    if options.include_headers {
        blocks.extend(selected_groups(&doc.headers, options).map(quote));
    }

    for paragraph in doc.paragraphs.iter().filter(|p| is_selected(p, options)) {
        match paragraph.kind {
            // Headings are single-line in Markdown.
            ParagraphKind::Heading => blocks.push(format!("## {}", paragraph.text.replace('\n', " "))),
            ParagraphKind::Paragraph => blocks.push(escape_line_starts(&paragraph.text)),
        }
    }

    if options.include_footers {
        blocks.extend(selected_groups(&doc.footers, options).map(quote));
    }

    Ok(blocks.join("\n\n"))
}

fn quote(text: &str) -> String {
    text.lines()
        .map(|l| format!("> {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape characters that would turn a text line into Markdown structure.
fn escape_line_starts(text: &str) -> String {
    text.lines()
        .map(|line| match line.chars().next() {
            Some('#' | '>' | '-' | '*' | '+') => format!("\\{}", line),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
