//! Page-level types.

use super::{BBox, Element};
use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Printed page number, when the converter recorded one
    #[serde(rename = "pageNumber", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    /// Page box
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,

    /// Elements on the page, in reading order
    #[serde(default, alias = "element")]
    pub elements: Vec<Element>,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a page from its elements.
    pub fn with_elements(elements: Vec<Element>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements flagged as running header.
    pub fn headers(&self) -> Vec<&Element> {
        self.elements.iter().filter(|e| e.is_header()).collect()
    }

    /// Elements flagged as running footer.
    pub fn footers(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| e.is_footer() && !e.is_header())
            .collect()
    }

    /// Paragraphs and headings that are neither header nor footer.
    pub fn body(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| e.is_block() && !e.is_header() && !e.is_footer())
    }
}
