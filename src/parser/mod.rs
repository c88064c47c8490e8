//! OCR document loading.

mod document_parser;
mod options;

pub use document_parser::{validate, DocumentParser};
pub use options::{ErrorMode, ParseOptions};
