//! Document-wide layout and font statistics.
//!
//! OCR geometry is noisy, so every reference value here is a median over the
//! whole document rather than a mean.

use std::collections::{HashMap, HashSet};

use super::Frequency;
use crate::error::{Error, Result};
use crate::model::{BBox, Document, Element, ElementId, Font, Line};

/// Relative size difference under which two fonts count as the same.
const SAME_FONT_TOLERANCE: f64 = 0.2;

/// Reference values aggregated over one document.
///
/// Built once per document; read-only afterwards.
#[derive(Debug, Clone)]
pub struct LayoutStatistics {
    body_font: String,
    font_usage: Frequency<String>,
    fonts: HashMap<String, Font>,

    line_widths: Frequency<u32>,
    line_heights: Frequency<u32>,
    line_spacings: Frequency<u32>,
    median_line_width: f64,
    median_line_height: f64,
    median_line_spacing: Option<f64>,
    median_word_space: f64,

    page_order: Vec<Vec<ElementId>>,
    element_pages: HashMap<ElementId, usize>,
    reused_ids: HashSet<ElementId>,
}

impl LayoutStatistics {
    /// Aggregate statistics for a document.
    ///
    /// Fails if the document has no words or uses a non-pixel font.
    pub fn new(doc: &Document) -> Result<Self> {
        let mut fonts = HashMap::new();
        for font in &doc.fonts {
            if !font.is_px() {
                return Err(Error::UnsupportedFontUnit {
                    font: font.id.clone(),
                    unit: font.size_unit.clone(),
                });
            }
            fonts.insert(font.id.clone(), font.clone());
        }

        let mut font_usage = Frequency::new();
        font_usage.extend(doc.words().map(|w| w.font.clone()));
        let body_font = font_usage
            .most_common()
            .cloned()
            .ok_or(Error::EmptyDocument)?;

        let mut line_widths = Frequency::new();
        let mut line_heights = Frequency::new();
        let mut line_spacings = Frequency::new();
        let mut word_spaces = Vec::new();
        let mut page_order = Vec::with_capacity(doc.page_count());
        let mut element_pages = HashMap::new();
        let mut reused_ids = HashSet::new();

        for (n_page, page) in doc.pages.iter().enumerate() {
            let mut per_page = Vec::new();
            for element in &page.elements {
                record_pages(element, n_page, &mut element_pages, &mut reused_ids);

                let lines = element.lines();
                line_widths.extend(lines.iter().map(|l| l.bbox.width));
                line_heights.extend(lines.iter().map(|l| l.bbox.height));
                line_spacings.extend(
                    lines
                        .windows(2)
                        .filter_map(|pair| pair[0].bbox.vertical_gap(&pair[1].bbox)),
                );
                word_spaces.extend(lines.iter().filter(|l| l.content.len() > 1).map(avg_word_space));

                if element.is_block() && !element.is_header() && !element.is_footer() {
                    per_page.push(element.id());
                }
            }
            page_order.push(per_page);
        }

        let median_line_width = line_widths.median().unwrap_or_default();
        let median_line_height = line_heights.median().unwrap_or_default();
        let median_line_spacing = line_spacings.median();
        let median_word_space = float_median(&mut word_spaces);

        log::info!("median line width: {}", median_line_width);
        log::info!("median line height: {}", median_line_height);
        log::info!("median line space: {:?}", median_line_spacing);
        log::info!("median word space: {}", median_word_space);
        log::info!("counter width: {:?}", line_widths.top(5));
        log::info!("counter height: {:?}", line_heights.top(5));
        log::info!("counter lineheight: {:?}", line_spacings.top(5));
        log::info!("body font: {} ({} words)", body_font, font_usage.count(&body_font));

        Ok(Self {
            body_font,
            font_usage,
            fonts,
            line_widths,
            line_heights,
            line_spacings,
            median_line_width,
            median_line_height,
            median_line_spacing,
            median_word_space,
            page_order,
            element_pages,
            reused_ids,
        })
    }

    /// Most frequently used font id.
    pub fn body_font(&self) -> &str {
        &self.body_font
    }

    /// Font table entry of a font id.
    pub fn font(&self, id: &str) -> Option<&Font> {
        self.fonts.get(id)
    }

    /// Word count per font id.
    pub fn font_usage(&self) -> &Frequency<String> {
        &self.font_usage
    }

    /// Line width distribution.
    pub fn line_widths(&self) -> &Frequency<u32> {
        &self.line_widths
    }

    /// Line height distribution.
    pub fn line_heights(&self) -> &Frequency<u32> {
        &self.line_heights
    }

    /// Distribution of vertical gaps between consecutive lines.
    pub fn line_spacings(&self) -> &Frequency<u32> {
        &self.line_spacings
    }

    /// Median line width (0 without line elements).
    pub fn median_line_width(&self) -> f64 {
        self.median_line_width
    }

    /// Median line height (0 without line elements).
    pub fn median_line_height(&self) -> f64 {
        self.median_line_height
    }

    /// Median gap between consecutive lines, if any gap was observed.
    pub fn median_line_spacing(&self) -> Option<f64> {
        self.median_line_spacing
    }

    /// Median of the per-line average word spacing.
    pub fn median_word_space(&self) -> f64 {
        self.median_word_space
    }

    /// Check whether two lines are further apart than regular line spacing.
    ///
    /// The gap must exceed the median spacing by more than `factor` of it.
    /// Overlapping lines are never separate. Without a reference spacing any
    /// positive gap separates.
    pub fn separate_lines(&self, l1: &Line, l2: &Line, factor: f64) -> bool {
        self.separate_boxes(&l1.bbox, &l2.bbox, factor)
    }

    /// Box form of [`separate_lines`](Self::separate_lines).
    pub fn separate_boxes(&self, b1: &BBox, b2: &BBox, factor: f64) -> bool {
        let Some(gap) = b1.vertical_gap(b2) else {
            return false;
        };
        match self.median_line_spacing {
            Some(median) if median > 0.0 => gap as f64 > median * (1.0 + factor),
            _ => true,
        }
    }

    /// Check if both elements were recorded on the same page.
    ///
    /// Ids that occur on more than one page have no page and never match.
    pub fn on_same_page(&self, e1: ElementId, e2: ElementId) -> bool {
        match (self.page_of(e1), self.page_of(e2)) {
            (Some(p1), Some(p2)) => p1 == p2,
            _ => false,
        }
    }

    /// Page index of an element.
    ///
    /// `None` for unknown ids and for ids reused on several pages.
    pub fn page_of(&self, id: ElementId) -> Option<usize> {
        if self.reused_ids.contains(&id) {
            return None;
        }
        self.element_pages.get(&id).copied()
    }

    /// Per page, the ids of paragraphs and headings that are not header or footer.
    pub fn page_order(&self) -> &[Vec<ElementId>] {
        &self.page_order
    }

    /// Check if two fonts of the table have roughly the same size.
    ///
    /// Unknown fonts never match.
    pub fn fonts_match(&self, f1: &str, f2: &str) -> bool {
        if f1 == f2 {
            return true;
        }
        match (self.fonts.get(f1), self.fonts.get(f2)) {
            (Some(a), Some(b)) => sizes_close(a.size, b.size),
            _ => false,
        }
    }
}

/// Check if two pixel fonts differ in size by less than 20% of the larger one.
pub fn roughly_same_font(f1: &Font, f2: &Font) -> Result<bool> {
    for f in [f1, f2] {
        if !f.is_px() {
            return Err(Error::UnsupportedFontUnit {
                font: f.id.clone(),
                unit: f.size_unit.clone(),
            });
        }
    }
    Ok(sizes_close(f1.size, f2.size))
}

fn sizes_close(a: f64, b: f64) -> bool {
    (a - b).abs() < a.max(b) * SAME_FONT_TOLERANCE
}

/// Average horizontal space between the words of a line.
///
/// The first word contributes a zero margin.
pub fn avg_word_space(line: &Line) -> f64 {
    if line.content.is_empty() {
        return 0.0;
    }
    let margins: i64 = line
        .content
        .windows(2)
        .map(|pair| pair[0].bbox.horizontal_gap(&pair[1].bbox))
        .sum();
    margins as f64 / line.content.len() as f64
}

fn record_pages(
    element: &Element,
    page: usize,
    index: &mut HashMap<ElementId, usize>,
    reused: &mut HashSet<ElementId>,
) {
    let mut note = |id: ElementId| {
        if let Some(previous) = index.insert(id, page) {
            if previous != page {
                reused.insert(id);
            }
        }
    };

    note(element.id());
    if let Element::Word(_) = element {
        return;
    }
    for line in element.lines() {
        note(line.id);
        for word in &line.content {
            note(word.id);
        }
    }
}

fn float_median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
