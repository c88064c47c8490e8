//! Element types: paragraphs, headings, lines and words.

use super::BBox;
use serde::{Deserialize, Deserializer, Serialize};

/// Document-unique element identifier.
pub type ElementId = u64;

/// A positioned element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Element {
    /// A body paragraph
    Paragraph(Block),

    /// A heading
    Heading(Block),

    /// A free-standing line
    Line(Line),

    /// A line recognized as part of a running header
    HeaderLine(Line),

    /// A free-standing word
    Word(Word),
}

impl Element {
    /// Element id.
    pub fn id(&self) -> ElementId {
        match self {
            Element::Paragraph(b) | Element::Heading(b) => b.id,
            Element::Line(l) | Element::HeaderLine(l) => l.id,
            Element::Word(w) => w.id,
        }
    }

    /// Bounding box.
    pub fn bbox(&self) -> &BBox {
        match self {
            Element::Paragraph(b) | Element::Heading(b) => &b.bbox,
            Element::Line(l) | Element::HeaderLine(l) => &l.bbox,
            Element::Word(w) => &w.bbox,
        }
    }

    /// Element properties.
    pub fn properties(&self) -> &Properties {
        match self {
            Element::Paragraph(b) | Element::Heading(b) => &b.properties,
            Element::Line(l) | Element::HeaderLine(l) => &l.properties,
            Element::Word(w) => &w.properties,
        }
    }

    /// Check if this element is a paragraph or a heading.
    pub fn is_block(&self) -> bool {
        matches!(self, Element::Paragraph(_) | Element::Heading(_))
    }

    /// Check if this element is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Element::Heading(_))
    }

    /// Check if this element belongs to a running header.
    ///
    /// A block counts as header when it is flagged itself or when every one
    /// of its lines is a header line.
    pub fn is_header(&self) -> bool {
        match self {
            Element::HeaderLine(_) => true,
            Element::Paragraph(b) | Element::Heading(b) => {
                b.properties.is_header
                    || (!b.content.is_empty() && b.content.iter().all(|l| l.properties.is_header))
            }
            _ => self.properties().is_header,
        }
    }

    /// Check if this element belongs to a running footer.
    pub fn is_footer(&self) -> bool {
        self.properties().is_footer
    }

    /// Lines contained in this element.
    ///
    /// A line element yields itself; a word yields nothing.
    pub fn lines(&self) -> &[Line] {
        match self {
            Element::Paragraph(b) | Element::Heading(b) => &b.content,
            Element::Line(l) | Element::HeaderLine(l) => std::slice::from_ref(l),
            Element::Word(_) => &[],
        }
    }

    /// All words in reading order.
    pub fn words(&self) -> Box<dyn Iterator<Item = &Word> + '_> {
        match self {
            Element::Word(w) => Box::new(std::iter::once(w)),
            _ => Box::new(self.lines().iter().flat_map(|l| l.content.iter())),
        }
    }

    /// Word texts joined by a single space.
    pub fn plain_text(&self) -> String {
        self.words()
            .map(|w| w.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A paragraph or heading: an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Element id
    pub id: ElementId,

    /// Bounding box
    #[serde(rename = "box")]
    pub bbox: BBox,

    /// Element properties
    #[serde(default)]
    pub properties: Properties,

    /// Lines of the block
    #[serde(default, deserialize_with = "typed_lines")]
    pub content: Vec<Line>,
}

impl Block {
    /// Create a block from its lines.
    pub fn new(id: ElementId, bbox: BBox, content: Vec<Line>) -> Self {
        Self {
            id,
            bbox,
            properties: Properties::default(),
            content,
        }
    }

    /// Set element properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Lines as word-token sequences.
    pub fn tokens(&self) -> Vec<Vec<String>> {
        self.content
            .iter()
            .map(Line::tokens)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// A line: an ordered sequence of words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Element id
    pub id: ElementId,

    /// Bounding box
    #[serde(rename = "box")]
    pub bbox: BBox,

    /// Element properties
    #[serde(default)]
    pub properties: Properties,

    /// Words of the line
    #[serde(default)]
    pub content: Vec<Word>,
}

impl Line {
    /// Create a line from its words.
    pub fn new(id: ElementId, bbox: BBox, content: Vec<Word>) -> Self {
        Self {
            id,
            bbox,
            properties: Properties::default(),
            content,
        }
    }

    /// Word texts, skipping words without text.
    pub fn tokens(&self) -> Vec<String> {
        self.content
            .iter()
            .filter(|w| !w.content.is_empty())
            .map(|w| w.content.clone())
            .collect()
    }

    /// Font of the first word, if any.
    pub fn first_font(&self) -> Option<&str> {
        self.content.first().map(|w| w.font.as_str())
    }

    /// Font of the last word, if any.
    pub fn last_font(&self) -> Option<&str> {
        self.content.last().map(|w| w.font.as_str())
    }
}

/// A single recognized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Element id
    pub id: ElementId,

    /// Bounding box
    #[serde(rename = "box")]
    pub bbox: BBox,

    /// Element properties
    #[serde(default)]
    pub properties: Properties,

    /// Font id in the document font table
    pub font: String,

    /// Recognized text
    #[serde(default, deserialize_with = "text_or_empty")]
    pub content: String,

    /// Recognition confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<f64>,
}

impl Word {
    /// Create a word.
    pub fn new(id: ElementId, bbox: BBox, font: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            bbox,
            properties: Properties::default(),
            font: font.into(),
            content: content.into(),
            conf: None,
        }
    }
}

/// Element properties.
///
/// Only the header/footer flags are interpreted; everything else is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Part of a running header
    #[serde(rename = "isHeader", default, skip_serializing_if = "is_false")]
    pub is_header: bool,

    /// Part of a running footer
    #[serde(rename = "isFooter", default, skip_serializing_if = "is_false")]
    pub is_footer: bool,

    /// Other properties
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Properties {
    /// Properties flagging a header element.
    pub fn header() -> Self {
        Self {
            is_header: true,
            ..Self::default()
        }
    }

    /// Properties flagging a footer element.
    pub fn footer() -> Self {
        Self {
            is_footer: true,
            ..Self::default()
        }
    }
}

/// Type tag of lines recognized as running header inside a block.
const HEADER_LINE_TYPE: &str = "header";

/// Block lines may be typed `header`; those are flagged in their properties.
fn typed_lines<'de, D>(deserializer: D) -> std::result::Result<Vec<Line>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct TypedLine {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(flatten)]
        line: Line,
    }

    let lines = Vec::<TypedLine>::deserialize(deserializer)?;
    Ok(lines
        .into_iter()
        .map(|typed| {
            let mut line = typed.line;
            if typed.kind.as_deref() == Some(HEADER_LINE_TYPE) {
                line.properties.is_header = true;
            }
            line
        })
        .collect())
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Empty words are serialized by some converters as `[]` instead of `""`.
fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Other(serde_json::Value),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Other(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: ElementId, text: &str) -> Word {
        Word::new(id, BBox::new(0, 0, 10, 10), "font_0", text)
    }

    #[test]
    fn test_element_accessors() {
        let line = Line::new(2, BBox::new(0, 0, 100, 10), vec![word(3, "Hello"), word(4, "world")]);
        let para = Element::Paragraph(Block::new(1, BBox::new(0, 0, 100, 10), vec![line]));

        assert_eq!(para.id(), 1);
        assert!(para.is_block());
        assert!(!para.is_heading());
        assert_eq!(para.lines().len(), 1);
        assert_eq!(para.words().count(), 2);
        assert_eq!(para.plain_text(), "Hello world");
    }

    #[test]
    fn test_header_flags() {
        let line = Line::new(2, BBox::default(), vec![word(3, "Title")]);
        assert!(Element::HeaderLine(line.clone()).is_header());
        assert!(!Element::Line(line.clone()).is_header());

        let block = Block::new(1, BBox::default(), vec![line]).with_properties(Properties::footer());
        let el = Element::Paragraph(block);
        assert!(el.is_footer());
        assert!(!el.is_header());
    }

    #[test]
    fn test_deserialize_tagged_element() {
        let json = r#"{
            "id": 1000, "type": "paragraph",
            "box": {"l": 10, "t": 20, "w": 300, "h": 40},
            "properties": {"order": 1000, "isHeader": true},
            "content": [{
                "id": 2000, "type": "line",
                "box": {"l": 10, "t": 20, "w": 300, "h": 18},
                "content": [
                    {"id": 3000, "type": "word", "box": {"l": 10, "t": 20, "w": 40, "h": 18},
                     "font": "font_0", "content": "Annual", "conf": 96},
                    {"id": 3001, "type": "word", "box": {"l": 60, "t": 20, "w": 40, "h": 18},
                     "font": "font_0", "content": []}
                ]
            }]
        }"#;
        let el: Element = serde_json::from_str(json).unwrap();
        assert!(el.is_header());
        assert_eq!(el.properties().extra["order"], 1000);
        let words: Vec<_> = el.words().collect();
        assert_eq!(words[0].content, "Annual");
        assert_eq!(words[0].conf, Some(96.0));
        assert_eq!(words[1].content, "");
        assert_eq!(el.lines()[0].tokens(), vec!["Annual".to_string()]);
    }

    #[test]
    fn test_block_of_header_lines_is_header() {
        let json = r#"{
            "id": 1000, "type": "paragraph",
            "box": {"l": 10, "t": 20, "w": 300, "h": 20},
            "content": [{
                "id": 2000, "type": "header",
                "box": {"l": 10, "t": 20, "w": 300, "h": 18},
                "content": [{"id": 3000, "type": "word", "box": {"l": 10, "t": 20, "w": 40, "h": 18},
                             "font": "font_0", "content": "Journal"}]
            }]
        }"#;
        let el: Element = serde_json::from_str(json).unwrap();
        assert!(el.is_header());
        assert!(el.lines()[0].properties.is_header);

        let back: Element = serde_json::from_str(&serde_json::to_string(&el).unwrap()).unwrap();
        assert!(back.is_header());

        let body = json.replace("\"type\": \"header\"", "\"type\": \"line\"");
        let el: Element = serde_json::from_str(&body).unwrap();
        assert!(!el.is_header());
    }
}
