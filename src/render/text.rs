//! Plain text rendering for reconstructed documents.

use crate::error::Result;
use crate::pipeline::{ReflowedDocument, ReflowedParagraph};

use super::RenderOptions;

/// Convert a reconstructed document to plain text.
///
/// Paragraphs are separated by a blank line. Retained headers come first and
/// retained footers last, when enabled.
pub fn to_text(doc: &ReflowedDocument, options: &RenderOptions) -> Result<String> {
    let mut blocks: Vec<&str> = Vec::new();

    if options.include_headers {
        blocks.extend(selected_groups(&doc.headers, options));
    }
    blocks.extend(
        doc.paragraphs
            .iter()
            .filter(|p| is_selected(p, options))
            .map(|p| p.text.as_str()),
    );
    if options.include_footers {
        blocks.extend(selected_groups(&doc.footers, options));
    }

    Ok(blocks.join("\n\n"))
}

pub(super) fn is_selected(paragraph: &ReflowedParagraph, options: &RenderOptions) -> bool {
    paragraph
        .pages
        .iter()
        .any(|&p| options.page_selection.includes_index(p))
}

pub(super) fn selected_groups<'a>(
    groups: &'a [Option<String>],
    options: &'a RenderOptions,
) -> impl Iterator<Item = &'a str> + 'a {
    groups
        .iter()
        .enumerate()
        .filter(|(i, _)| options.page_selection.includes_index(*i))
        .filter_map(|(_, g)| g.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ParagraphKind;
    use crate::render::PageSelection;

    fn sample() -> ReflowedDocument {
        let para = |page: usize, text: &str| ReflowedParagraph {
            kind: ParagraphKind::Paragraph,
            ids: vec![page as u64],
            pages: vec![page],
            text: text.to_string(),
        };
        ReflowedDocument {
            pages: 2,
            paragraphs: vec![para(0, "Hello, world!"), para(1, "Second paragraph.")],
            headers: vec![Some("Running Title".to_string()), None],
            footers: vec![None, Some("Page 2".to_string())],
        }
    }

    #[test]
    fn test_to_text() {
        let result = to_text(&sample(), &RenderOptions::default()).unwrap();
        assert_eq!(result, "Hello, world!\n\nSecond paragraph.");
    }

    #[test]
    fn test_to_text_with_headers_and_footers() {
        let options = RenderOptions::new().with_headers(true).with_footers(true);
        let result = to_text(&sample(), &options).unwrap();
        assert!(result.starts_with("Running Title\n\n"));
        assert!(result.ends_with("\n\nPage 2"));
    }

    #[test]
    fn test_to_text_page_selection() {
        let options = RenderOptions::new().with_pages(PageSelection::Pages(vec![2]));
        assert_eq!(to_text(&sample(), &options).unwrap(), "Second paragraph.");
    }
}
