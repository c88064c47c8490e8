//! Loader for the structured OCR document schema.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Document, Element, ElementId};

use super::options::{ErrorMode, ParseOptions};

/// OCR document parser.
///
/// Reads the JSON produced by the hOCR converter and validates the
/// invariants the rest of the crate relies on.
pub struct DocumentParser {
    doc: Document,
    options: ParseOptions,
}

impl DocumentParser {
    /// Open a document file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a document file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load a document from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Load a document from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let doc = serde_json::from_slice(data)?;
        Ok(Self { doc, options })
    }

    /// Load a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Load a document from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Validate and return the document.
    pub fn parse(self) -> Result<Document> {
        validate(&self.doc, &self.options)?;
        log::debug!(
            "loaded document: {} pages, {} fonts",
            self.doc.page_count(),
            self.doc.fonts.len()
        );
        Ok(self.doc)
    }
}

/// Check the document invariants.
pub fn validate(doc: &Document, options: &ParseOptions) -> Result<()> {
    if let Some(font) = doc.fonts.iter().find(|f| !f.is_px()) {
        return Err(Error::UnsupportedFontUnit {
            font: font.id.clone(),
            unit: font.size_unit.clone(),
        });
    }

    if doc.words().next().is_none() {
        return Err(Error::EmptyDocument);
    }

    let strict = options.error_mode == ErrorMode::Strict;

    let mut seen = HashSet::new();
    for (_, element) in doc.elements() {
        for id in element_ids(element) {
            if !seen.insert(id) {
                if strict {
                    return Err(Error::DuplicateElementId(id));
                }
                log::warn!("duplicate element id {}", id);
            }
        }
    }

    let fonts: HashSet<&str> = doc.fonts.iter().map(|f| f.id.as_str()).collect();
    if let Some(word) = doc.words().find(|w| !fonts.contains(w.font.as_str())) {
        if strict {
            return Err(Error::UnknownFont(word.font.clone()));
        }
        log::warn!("word {} references unknown font {}", word.id, word.font);
    }

    Ok(())
}

/// Ids of an element and everything nested in it.
fn element_ids(element: &Element) -> Vec<ElementId> {
    match element {
        Element::Paragraph(b) | Element::Heading(b) => std::iter::once(b.id)
            .chain(b.content.iter().flat_map(|l| {
                std::iter::once(l.id).chain(l.content.iter().map(|w| w.id))
            }))
            .collect(),
        Element::Line(l) | Element::HeaderLine(l) => std::iter::once(l.id)
            .chain(l.content.iter().map(|w| w.id))
            .collect(),
        Element::Word(w) => vec![w.id],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r##"{
        "fonts": [{"id": "font_0", "size": 12, "sizeUnit": "px", "color": "#000000"}],
        "pages": [{"pageNumber": 1, "elements": [{
            "id": 1, "type": "paragraph", "box": {"l": 0, "t": 0, "w": 100, "h": 20},
            "content": [{"id": 2, "type": "line", "box": {"l": 0, "t": 0, "w": 100, "h": 20},
                "content": [{"id": 3, "type": "word", "box": {"l": 0, "t": 0, "w": 40, "h": 20},
                             "font": "font_0", "content": "Hello"}]}]
        }]}]
    }"##;

    #[test]
    fn test_parse_valid_document() {
        let doc = DocumentParser::from_bytes(VALID.as_bytes()).unwrap().parse().unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.words().count(), 1);
    }

    #[test]
    fn test_reject_non_pixel_font() {
        let json = VALID.replace("\"px\"", "\"pt\"");
        let err = DocumentParser::from_bytes(json.as_bytes()).unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFontUnit { .. }));
    }

    #[test]
    fn test_reject_empty_document() {
        let json = r#"{"fonts": [], "pages": [{"elements": []}]}"#;
        let err = DocumentParser::from_bytes(json.as_bytes()).unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::EmptyDocument));
    }

    #[test]
    fn test_duplicate_ids_strict_and_lenient() {
        let json = VALID.replace("\"id\": 3,", "\"id\": 2,");
        let err = DocumentParser::from_bytes(json.as_bytes()).unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::DuplicateElementId(2)));

        let doc = DocumentParser::from_bytes_with_options(json.as_bytes(), ParseOptions::new().lenient())
            .unwrap()
            .parse();
        assert!(doc.is_ok());
    }

    #[test]
    fn test_unknown_font() {
        let json = VALID.replace("\"font\": \"font_0\"", "\"font\": \"font_9\"");
        let err = DocumentParser::from_bytes(json.as_bytes()).unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::UnknownFont(ref f) if f == "font_9"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(DocumentParser::from_bytes(b"{not json"), Err(Error::Json(_))));
    }
}
