//! Normalized spreadsheet rows.

use std::collections::BTreeMap;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// A text value.
    Text(String),
    /// A numeric value.
    Number(f64),
}

impl Cell {
    /// The cell rendered as trimmed text.
    ///
    /// Whole numbers are rendered without a fractional part, so a key typed as
    /// `1001` in a spreadsheet reads back as `"1001"`, not `"1001.0"`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => whole(*number).map_or_else(|| number.to_string(), |n| n.to_string()),
        }
    }

    /// The cell as an integer, if it holds one.
    ///
    /// Numbers are truncated towards zero. Text must parse as an integer once
    /// surrounding whitespace is removed.
    #[must_use]
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Empty => None,
            Self::Text(text) => text.trim().parse().ok(),
            Self::Number(number) => whole(number.trunc()),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn whole(number: f64) -> Option<i64> {
    (number.is_finite() && number.fract() == 0.0 && number.abs() < 9.0e15).then(|| number as i64)
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Normalizes a column header: trimmed, lower-case, with spaces, hyphens and
/// tabs replaced by underscores and runs of underscores collapsed.
///
/// ```
/// use reqif::import::normalize_header;
///
/// assert_eq!(normalize_header(" IE PUID "), "ie_puid");
/// assert_eq!(normalize_header("Source - IE PUID"), "source_ie_puid");
/// ```
#[must_use]
pub fn normalize_header(header: &str) -> String {
    let mut normalized = String::with_capacity(header.len());
    for c in header.trim().chars().flat_map(char::to_lowercase) {
        let c = if matches!(c, ' ' | '-' | '\t') { '_' } else { c };
        if c == '_' && normalized.ends_with('_') {
            continue;
        }
        normalized.push(c);
    }
    normalized
}

/// One spreadsheet row, keyed by normalized column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell. The header is normalized; empty headers are ignored.
    pub fn insert(&mut self, header: &str, cell: impl Into<Cell>) {
        let key = normalize_header(header);
        if !key.is_empty() {
            self.cells.insert(key, cell.into());
        }
    }

    /// Builder-style variant of [`Row::insert`].
    #[must_use]
    pub fn with(mut self, header: &str, cell: impl Into<Cell>) -> Self {
        self.insert(header, cell);
        self
    }

    /// The cell under a normalized column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Whether every cell is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|cell| cell.to_text().is_empty())
    }

    /// The trimmed text of the first listed column holding a non-empty value.
    pub(crate) fn text(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .filter_map(|column| self.get(column))
            .map(Cell::to_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// The first listed column holding an integer.
    pub(crate) fn integer(&self, columns: &[&str]) -> Option<i64> {
        columns
            .iter()
            .filter_map(|column| self.get(column))
            .find_map(Cell::to_integer)
    }
}

impl<K: AsRef<str>, C: Into<Cell>> FromIterator<(K, C)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (header, cell) in iter {
            row.insert(header.as_ref(), cell);
        }
        row
    }
}

/// The two row sets read from a workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheets {
    /// Requirement rows, in sheet order.
    pub requirements: Vec<Row>,
    /// Relation rows, in sheet order.
    pub relations: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("Foreign ID"), "foreign_id");
        assert_eq!(normalize_header("Relation-Type"), "relation_type");
        assert_eq!(normalize_header("  Text\tHTML "), "text_html");
        assert_eq!(normalize_header("a -  b"), "a_b");
        assert_eq!(normalize_header("ReqPrefix"), "reqprefix");
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(1001.0).to_text(), "1001");
        assert_eq!(Cell::Number(2.5).to_text(), "2.5");
        assert_eq!(Cell::Text("  padded ".into()).to_text(), "padded");
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(Cell::Number(3.7).to_integer(), Some(3));
        assert_eq!(Cell::Text(" 42 ".into()).to_integer(), Some(42));
        assert_eq!(Cell::Text("4.0".into()).to_integer(), None);
        assert_eq!(Cell::Empty.to_integer(), None);
    }

    #[test]
    fn text_takes_first_non_empty_column() {
        let row: Row = [("Type", ""), ("Req Type", "interface")].into_iter().collect();
        assert_eq!(row.text(&["type", "req_type"]), "interface");
        assert_eq!(row.text(&["missing"]), "");
    }

    #[test]
    fn blank_rows_are_detected() {
        let row = Row::new().with("Name", "").with("Order", Cell::Empty);
        assert!(row.is_blank());
        assert!(!row.with("Name", "x").is_blank());
    }
}
