//! End-to-end text reconstruction.
//!
//! [`Reflow`] runs the resolvers over a loaded document in reading order:
//! line-end hyphens are resolved inside every paragraph, paragraphs split by
//! page or column breaks are merged, and running headers and footers are
//! collapsed to a single instance.

mod options;

pub use options::ReflowOptions;

use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::DecisionCache;
use crate::error::Result;
use crate::layout::LayoutStatistics;
use crate::model::{Document, Element, ElementId, Line};
use crate::resolve::{DuplicateFilter, LineBreakResolver, ParagraphMergeResolver, WordLine};
use crate::score::Scorer;

static RUN_OF_BLANKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static PADDED_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r" *\n *").unwrap());

/// Kind of a reconstructed paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphKind {
    /// Body text
    Paragraph,
    /// A heading
    Heading,
}

/// A paragraph of reconstructed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflowedParagraph {
    /// Paragraph kind
    pub kind: ParagraphKind,
    /// Source element ids, in reading order
    pub ids: Vec<ElementId>,
    /// Page indices (0-based) the paragraph spans
    pub pages: Vec<usize>,
    /// Paragraph text
    pub text: String,
}

/// Reconstructed text of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflowedDocument {
    /// Number of source pages
    pub pages: usize,
    /// Body paragraphs and headings in reading order
    pub paragraphs: Vec<ReflowedParagraph>,
    /// Per page, the retained header text
    pub headers: Vec<Option<String>>,
    /// Per page, the retained footer text
    pub footers: Vec<Option<String>>,
}

impl ReflowedDocument {
    /// Paragraph texts in reading order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().map(|p| p.text.as_str())
    }
}

/// A paragraph being assembled, with the boundary lines merge decisions look at.
struct Pending<'d> {
    kind: ParagraphKind,
    ids: Vec<ElementId>,
    pages: Vec<usize>,
    lines: Vec<WordLine>,
    first_line: &'d Line,
    last_line: &'d Line,
}

impl Pending<'_> {
    fn last_page(&self) -> usize {
        self.pages.last().copied().unwrap_or_default()
    }

    fn into_paragraph(self) -> ReflowedParagraph {
        ReflowedParagraph {
            kind: self.kind,
            ids: self.ids,
            pages: self.pages,
            text: lines_to_text(&self.lines),
        }
    }
}

/// Text reconstruction driver.
///
/// Holds the scorer and the decision cache; cheap to share between threads.
pub struct Reflow {
    scorer: Arc<dyn Scorer>,
    cache: Arc<DecisionCache>,
    options: ReflowOptions,
}

impl Reflow {
    /// Create a driver with a cache built from `options.cache`.
    pub fn new<S: Scorer + 'static>(scorer: S, options: ReflowOptions) -> Self {
        let cache = Arc::new(DecisionCache::new(&options.cache));
        Self {
            scorer: Arc::new(scorer),
            cache,
            options,
        }
    }

    /// Use a shared cache instead of the configured one.
    pub fn with_cache(mut self, cache: Arc<DecisionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The decision cache.
    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// The options in use.
    pub fn options(&self) -> &ReflowOptions {
        &self.options
    }

    /// Reconstruct the text of a document.
    pub fn reflow(&self, doc: &Document) -> Result<ReflowedDocument> {
        let stats = LayoutStatistics::new(doc)?;

        let paragraphs = self.paragraphs(doc, &stats)?;
        let (headers, footers) = self.running_groups(doc)?;

        log::info!(
            "reflowed {} pages into {} paragraphs",
            doc.page_count(),
            paragraphs.len()
        );

        Ok(ReflowedDocument {
            pages: doc.page_count(),
            paragraphs,
            headers,
            footers,
        })
    }

    /// Reconstruct several documents in parallel, sharing the scorer and cache.
    pub fn reflow_batch(&self, docs: &[Document]) -> Vec<Result<ReflowedDocument>> {
        docs.par_iter().map(|doc| self.reflow(doc)).collect()
    }

    fn paragraphs(&self, doc: &Document, stats: &LayoutStatistics) -> Result<Vec<ReflowedParagraph>> {
        let linebreaks = LineBreakResolver::new(self.scorer.as_ref(), &self.cache);
        let merger = ParagraphMergeResolver::new(self.scorer.as_ref(), &self.cache);

        let mut done: Vec<Pending<'_>> = Vec::new();

        // Walk elements by position; lenient loading may leave ids reused across pages.
        for (page, source) in doc.pages.iter().enumerate() {
            for element in source.body() {
                let Some(next) = self.pending(element, page, &linebreaks)? else {
                    continue;
                };

                if let Some(prev) = done.last_mut() {
                    if self.merge_candidate(stats, prev, &next) {
                        if let Some(merged) = merger.resolve(&prev.lines, &next.lines)? {
                            log::debug!("merged paragraph {} into {}", element.id(), prev.ids[0]);
                            prev.lines = merged;
                            prev.ids.extend(next.ids);
                            if prev.last_page() != page {
                                prev.pages.push(page);
                            }
                            prev.last_line = next.last_line;
                            continue;
                        }
                    }
                }
                done.push(next);
            }
        }

        Ok(done.into_iter().map(Pending::into_paragraph).collect())
    }

    fn pending<'d>(
        &self,
        element: &'d Element,
        page: usize,
        linebreaks: &LineBreakResolver<'_>,
    ) -> Result<Option<Pending<'d>>> {
        let text_lines: Vec<&Line> = element
            .lines()
            .iter()
            .filter(|l| l.content.iter().any(|w| !w.content.is_empty()))
            .collect();
        let (Some(first_line), Some(last_line)) = (text_lines.first().copied(), text_lines.last().copied()) else {
            return Ok(None);
        };

        let tokens: Vec<WordLine> = text_lines.iter().map(|l| l.tokens()).collect();
        let lines = if self.options.dehyphenate {
            linebreaks.resolve(&tokens)?
        } else {
            tokens
        };

        let kind = if element.is_heading() {
            ParagraphKind::Heading
        } else {
            ParagraphKind::Paragraph
        };

        Ok(Some(Pending {
            kind,
            ids: vec![element.id()],
            pages: vec![page],
            lines,
            first_line,
            last_line,
        }))
    }

    fn merge_candidate(&self, stats: &LayoutStatistics, prev: &Pending<'_>, next: &Pending<'_>) -> bool {
        if !self.options.merge_paragraphs
            || prev.kind != ParagraphKind::Paragraph
            || next.kind != ParagraphKind::Paragraph
        {
            return false;
        }

        let fonts_match = match (prev.last_line.last_font(), next.first_line.first_font()) {
            (Some(f1), Some(f2)) => stats.fonts_match(f1, f2),
            _ => false,
        };
        if !fonts_match {
            return false;
        }

        !self.same_page(stats, prev, next)
            || !stats.separate_lines(prev.last_line, next.first_line, self.options.line_spacing_factor)
    }

    /// Page check by id, falling back to reading position for reused ids.
    fn same_page(&self, stats: &LayoutStatistics, prev: &Pending<'_>, next: &Pending<'_>) -> bool {
        let (Some(&last), Some(&first)) = (prev.ids.last(), next.ids.first()) else {
            return prev.last_page() == next.last_page();
        };
        match (stats.page_of(last), stats.page_of(first)) {
            (Some(_), Some(_)) => stats.on_same_page(last, first),
            _ => prev.last_page() == next.last_page(),
        }
    }

    fn running_groups(&self, doc: &Document) -> Result<(Vec<Option<String>>, Vec<Option<String>>)> {
        let headers = doc
            .pages
            .iter()
            .map(|p| p.headers().into_iter().cloned().collect())
            .collect();
        let footers = doc
            .pages
            .iter()
            .map(|p| p.footers().into_iter().cloned().collect())
            .collect();

        Ok((self.filter_groups(headers)?, self.filter_groups(footers)?))
    }

    fn filter_groups(&self, groups: Vec<Vec<Element>>) -> Result<Vec<Option<String>>> {
        let groups = if self.options.remove_duplicates {
            DuplicateFilter::new(self.scorer.as_ref(), &self.cache)
                .with_thresholds(self.options.similarity)
                .with_tie_break(self.options.tie_break)
                .filter(groups)?
        } else {
            groups
        };

        Ok(groups.iter().map(|g| group_to_text(g)).collect())
    }
}

/// Join resolver lines into flowing text.
///
/// Explicit end-of-line markers survive as newlines; other whitespace runs
/// collapse to a single space.
pub fn lines_to_text(lines: &[WordLine]) -> String {
    let joined = lines
        .iter()
        .map(|l| l.join(" "))
        .collect::<Vec<_>>()
        .join(" ");
    normalize_whitespace(&joined)
}

fn group_to_text(group: &[Element]) -> Option<String> {
    let text = group
        .iter()
        .map(Element::plain_text)
        .collect::<Vec<_>>()
        .join("\n");
    let text = normalize_whitespace(&text);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn normalize_whitespace(text: &str) -> String {
    let text = RUN_OF_BLANKS.replace_all(text, " ");
    PADDED_NEWLINE.replace_all(&text, "\n").trim().to_string()
}
