//! A minimal indenting XML writer.
//!
//! Elements are written one per line, indented by two spaces per level. Text
//! content is only ever written inline, between an element's start and end
//! tags on the same line.

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub(crate) struct XmlWriter {
    out: String,
    stack: Vec<&'static str>,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        let mut writer = Self::default();
        writer
            .out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        writer
    }

    /// Opens an element. Must be balanced by [`Self::close`].
    pub(crate) fn open(&mut self, name: &'static str, attributes: &[(&str, &str)]) {
        self.start_tag(name, attributes);
        self.out.push_str(">\n");
        self.stack.push(name);
    }

    pub(crate) fn close(&mut self) {
        if let Some(name) = self.stack.pop() {
            self.indent();
            self.end_tag(name);
            self.out.push('\n');
        }
    }

    /// Writes an element with no content.
    pub(crate) fn empty(&mut self, name: &'static str, attributes: &[(&str, &str)]) {
        self.start_tag(name, attributes);
        self.out.push_str("/>\n");
    }

    /// Writes an element holding only text.
    pub(crate) fn text(&mut self, name: &'static str, attributes: &[(&str, &str)], text: &str) {
        if text.is_empty() {
            self.empty(name, attributes);
            return;
        }
        self.start_tag(name, attributes);
        self.out.push('>');
        escape_into(&mut self.out, text, false);
        self.end_tag(name);
        self.out.push('\n');
    }

    /// Starts an element whose mixed content is written with
    /// [`Self::inline_text`] and [`Self::inline_element`], then ended with
    /// [`Self::end_inline`].
    pub(crate) fn begin_inline(&mut self, name: &'static str) {
        self.start_tag(name, &[]);
        self.out.push('>');
    }

    pub(crate) fn inline_text(&mut self, text: &str) {
        escape_into(&mut self.out, text, false);
    }

    pub(crate) fn inline_element(&mut self, name: &'static str, text: &str) {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        escape_into(&mut self.out, text, false);
        self.end_tag(name);
    }

    pub(crate) fn end_inline(&mut self, name: &'static str) {
        self.end_tag(name);
        self.out.push('\n');
    }

    /// Writes pre-encoded markup exactly as given, starting on its own
    /// indented line. Whitespace inside the markup is content and is kept.
    pub(crate) fn raw(&mut self, markup: &str) {
        if markup.is_empty() {
            return;
        }
        self.indent();
        self.out.push_str(markup);
        self.out.push('\n');
    }

    pub(crate) fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.close();
        }
        self.out
    }

    fn start_tag(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attributes {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            escape_into(&mut self.out, value, true);
            self.out.push('"');
        }
    }

    fn end_tag(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn indent(&mut self) {
        for _ in 0..self.stack.len() {
            self.out.push_str(INDENT);
        }
    }
}

/// Escapes markup-significant characters and drops characters that XML 1.0
/// does not allow.
fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' if attribute => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
}

const fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
