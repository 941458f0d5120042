//! Structured rich text and the plain-text converter that produces it.
//!
//! A [`RichText`] fragment is a sequence of [`Block`]s. Each block is either a
//! paragraph or a bulleted list, and holds inline [`Span`]s. The encoder
//! renders fragments into the XHTML namespace of the output document.
//!
//! [`convert`] turns plain text into a fragment:
//!
//! - blank lines separate paragraphs
//! - consecutive lines starting with `"- "` form a single bulleted list
//!
//! ```
//! use reqif::domain::rich_text::{convert, Block};
//!
//! let fragment = convert("The system shall:\n- log in\n- log out");
//! assert_eq!(fragment.blocks().len(), 2);
//! assert!(matches!(fragment.blocks()[1], Block::List(_)));
//! ```

/// Marker that opens a list item.
const LIST_MARKER: &str = "- ";

/// A run of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain text.
    Text(String),
    /// Bold text.
    Bold(String),
}

impl Span {
    /// The text of the span, without formatting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Bold(text) => text,
        }
    }
}

/// A sequence of spans forming one paragraph or one list item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inline(Vec<Span>);

impl Inline {
    /// Creates inline content holding a single plain-text span.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![Span::Text(text.into())])
    }

    /// Creates inline content from explicit spans.
    #[must_use]
    pub const fn from_spans(spans: Vec<Span>) -> Self {
        Self(spans)
    }

    /// The spans in order.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.0
    }

    /// The concatenated text of all spans, without formatting.
    #[must_use]
    pub fn text(&self) -> String {
        self.0.iter().map(Span::as_str).collect()
    }
}

/// A block-level node of a rich-text fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph of text.
    Paragraph(Inline),
    /// An unordered list; one entry per list item.
    List(Vec<Inline>),
}

/// A structured rich-text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    blocks: Vec<Block>,
}

impl RichText {
    /// A fragment holding a single paragraph with the given text.
    ///
    /// The text is used as-is, line breaks included.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![Block::Paragraph(Inline::plain(text))],
        }
    }

    /// Starts building a fragment by hand.
    #[must_use]
    pub fn builder() -> RichTextBuilder {
        RichTextBuilder::default()
    }

    /// The blocks of the fragment, in document order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// Builder for hand-assembled fragments, including bold spans.
///
/// ```
/// use reqif::domain::rich_text::{RichText, Span};
///
/// let fragment = RichText::builder()
///     .paragraph_spans(vec![
///         Span::Text("The system ".into()),
///         Span::Bold("shall".into()),
///         Span::Text(" authenticate users.".into()),
///     ])
///     .list(["with a password", "with a token"])
///     .build();
/// assert_eq!(fragment.blocks().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RichTextBuilder {
    blocks: Vec<Block>,
}

impl RichTextBuilder {
    /// Appends a plain-text paragraph.
    #[must_use]
    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Paragraph(Inline::plain(text)));
        self
    }

    /// Appends a paragraph made of explicit spans.
    #[must_use]
    pub fn paragraph_spans(mut self, spans: Vec<Span>) -> Self {
        self.blocks.push(Block::Paragraph(Inline::from_spans(spans)));
        self
    }

    /// Appends a list of plain-text items.
    #[must_use]
    pub fn list<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocks
            .push(Block::List(items.into_iter().map(Inline::plain).collect()));
        self
    }

    /// Appends a list whose items are made of explicit spans.
    #[must_use]
    pub fn list_spans(mut self, items: Vec<Vec<Span>>) -> Self {
        self.blocks.push(Block::List(
            items.into_iter().map(Inline::from_spans).collect(),
        ));
        self
    }

    /// Finishes the fragment.
    #[must_use]
    pub fn build(self) -> RichText {
        RichText {
            blocks: self.blocks,
        }
    }
}

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Collecting lines into the pending paragraph buffer.
    Paragraph,
    /// Appending items to the most recently opened list.
    List,
}

/// Accumulates blocks while lines are fed through the state machine.
#[derive(Debug)]
struct Converter {
    state: State,
    pending: Vec<String>,
    blocks: Vec<Block>,
}

impl Converter {
    const fn new() -> Self {
        Self {
            state: State::Paragraph,
            pending: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim_end();

        if line.is_empty() {
            match self.state {
                State::List => self.state = State::Paragraph,
                State::Paragraph => self.flush_paragraph(),
            }
        } else if let Some(item) = line.strip_prefix(LIST_MARKER) {
            if self.state == State::Paragraph {
                self.flush_paragraph();
                self.blocks.push(Block::List(Vec::new()));
                self.state = State::List;
            }
            self.push_item(item.trim());
        } else {
            self.state = State::Paragraph;
            self.pending.push(line.to_string());
        }
    }

    fn push_item(&mut self, item: &str) {
        if let Some(Block::List(items)) = self.blocks.last_mut() {
            items.push(Inline::plain(item));
        }
    }

    fn flush_paragraph(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let joined = self.pending.join("\n");
        self.pending.clear();
        let content = joined.trim();
        if !content.is_empty() {
            self.blocks.push(Block::Paragraph(Inline::plain(content)));
        }
    }

    fn finish(mut self) -> RichText {
        self.flush_paragraph();
        RichText {
            blocks: self.blocks,
        }
    }
}

/// Converts plain text into a rich-text fragment.
///
/// Line endings `\r\n` and `\r` are treated as `\n`. Empty input yields a
/// fragment with exactly one empty paragraph.
#[must_use]
pub fn convert(text: &str) -> RichText {
    if text.is_empty() {
        return RichText::paragraph("");
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut converter = Converter::new();
    for line in normalized.split('\n') {
        converter.feed(line);
    }
    converter.finish()
}
