//! Document model types for page-segmented OCR output.
//!
//! This module mirrors the JSON schema produced by the hOCR converter:
//! pages of positioned elements (paragraphs, headings, lines, words), each
//! with a pixel bounding box, plus a document-wide font table.

mod document;
mod element;
mod geometry;
mod page;

pub use document::{Document, Font, PIXEL_UNIT};
pub use element::{Block, Element, ElementId, Line, Properties, Word};
pub use geometry::{BBox, Point};
pub use page::Page;
