//! # unocr
//!
//! Text reconstruction for OCR'd documents.
//!
//! OCR output keeps the physical layout of a page: words hyphenated at line
//! ends, paragraphs cut in two by page and column breaks, and running
//! headers and footers repeated on every page. This library turns that
//! layout back into flowing text. Ambiguous decisions are settled by asking
//! a language-model [`Scorer`](score::Scorer) which candidate reads best.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unocr::{parse_file, render, Reflow, ReflowOptions};
//! use unocr::score::FnScorer;
//!
//! fn main() -> unocr::Result<()> {
//!     let doc = parse_file("scan.json")?;
//!
//!     // Any fluency model; lower scores mean more plausible text.
//!     let scorer = FnScorer::new(|texts: &[String]| {
//!         Ok(texts.iter().map(|t| t.len() as f64).collect())
//!     });
//!
//!     let reflowed = Reflow::new(scorer, ReflowOptions::default()).reflow(&doc)?;
//!     println!("{}", render::to_text(&reflowed, &render::RenderOptions::default())?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Dehyphenation**: rejoin words split at line ends
//! - **Paragraph merging**: reconnect paragraphs split by page or column breaks
//! - **Duplicate removal**: keep one instance of running headers and footers
//! - **Decision cache**: content-addressed, optionally persisted to disk
//! - **Parallel processing**: uses Rayon for batches of documents

pub mod cache;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod score;
pub mod similarity;

// Re-export commonly used types
pub use cache::{CacheLocation, CacheOptions, DecisionCache};
pub use error::{Error, Result};
pub use layout::LayoutStatistics;
pub use model::{BBox, Block, Document, Element, ElementId, Font, Line, Page, Point, Word};
pub use parser::{DocumentParser, ErrorMode, ParseOptions};
pub use pipeline::{ParagraphKind, Reflow, ReflowOptions, ReflowedDocument, ReflowedParagraph};
pub use render::{JsonFormat, PageSelection, RenderOptions};
pub use resolve::{
    DuplicateFilter, LineBreakResolver, ParagraphMergeResolver, SimilarityThresholds, TieBreak,
};
pub use score::{RetryConfig, RetryingScorer, Scorer};

use std::io::Read;
use std::path::Path;

/// Load an OCR document file.
///
/// # Arguments
///
/// * `path` - Path to the JSON document
///
/// # Example
///
/// ```no_run
/// use unocr::parse_file;
///
/// let doc = parse_file("scan.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocumentParser::open(path)?.parse()
}

/// Load an OCR document file with custom options.
///
/// # Example
///
/// ```no_run
/// use unocr::{parse_file_with_options, ParseOptions};
///
/// let doc = parse_file_with_options("scan.json", ParseOptions::new().lenient()).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    DocumentParser::open_with_options(path, options)?.parse()
}

/// Load an OCR document from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    DocumentParser::from_bytes(data)?.parse()
}

/// Load an OCR document from a string.
pub fn parse_str(json: &str) -> Result<Document> {
    parse_bytes(json.as_bytes())
}

/// Load an OCR document from a reader.
///
/// # Example
///
/// ```no_run
/// use unocr::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("scan.json").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    DocumentParser::from_reader(reader)?.parse()
}

/// Load, reconstruct and render a document file as plain text.
///
/// # Example
///
/// ```no_run
/// use unocr::{reflow_file, ReflowOptions};
/// use unocr::score::FnScorer;
///
/// let scorer = FnScorer::new(|texts: &[String]| Ok(vec![1.0; texts.len()]));
/// let text = reflow_file("scan.json", scorer, ReflowOptions::default()).unwrap();
/// ```
pub fn reflow_file<P, S>(path: P, scorer: S, options: ReflowOptions) -> Result<String>
where
    P: AsRef<Path>,
    S: Scorer + 'static,
{
    let doc = parse_file(path)?;
    let reflowed = Reflow::new(scorer, options).reflow(&doc)?;
    render::to_text(&reflowed, &RenderOptions::default())
}
