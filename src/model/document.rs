//! Document-level types.

use super::{Element, Page, Word};
use serde::{Deserialize, Serialize};

/// Size unit every font in a document must use.
pub const PIXEL_UNIT: &str = "px";

/// A page-segmented OCR document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in the document
    pub pages: Vec<Page>,

    /// Font table
    #[serde(default)]
    pub fonts: Vec<Font>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Add a font to the font table.
    pub fn add_font(&mut self, font: Font) {
        self.fonts.push(font);
    }

    /// Get a font by id.
    pub fn get_font(&self, id: &str) -> Option<&Font> {
        self.fonts.iter().find(|f| f.id == id)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All top-level elements with their page index.
    pub fn elements(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(n, p)| p.elements.iter().map(move |e| (n, e)))
    }

    /// All words in document order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.elements().flat_map(|(_, e)| e.words())
    }
}

/// An entry of the document font table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Font id referenced by words
    pub id: String,

    /// Font size
    pub size: f64,

    /// Unit of `size`
    #[serde(rename = "sizeUnit")]
    pub size_unit: String,

    /// Text color
    #[serde(default)]
    pub color: String,
}

impl Font {
    /// Create a pixel-sized font.
    pub fn px(id: impl Into<String>, size: f64) -> Self {
        Self {
            id: id.into(),
            size,
            size_unit: PIXEL_UNIT.to_string(),
            color: "#000000".to_string(),
        }
    }

    /// Check if the font size is given in pixels.
    pub fn is_px(&self) -> bool {
        self.size_unit == PIXEL_UNIT
    }
}
