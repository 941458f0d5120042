//! Mapping spreadsheet rows onto a [`Document`].
//!
//! Requirement rows are registered first, in `order` column order. Relation
//! rows can then refer to requirements by business key (the `IE PUID` column)
//! rather than by generated identifier; keys are resolved through
//! [`Document::find_by_external_key`], so a repeated key refers to the last
//! requirement registered with it.
//!
//! Rows that cannot be mapped are skipped and reported as [`Warning`]s; a bad
//! row never aborts the import.

use std::fmt;

use non_empty_string::{NonEmptyString, non_empty_string};
use tracing::{debug, instrument};

use crate::domain::{
    Document, NewRequirement, Prefixes, RelationKind, RequirementKind, convert,
};

mod row;
pub use row::{Cell, Row, Sheets, normalize_header};

const UNTITLED: &str = "Untitled";

/// Which sheet a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// The requirements sheet.
    Requirements,
    /// The relations sheet.
    Relations,
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requirements => f.write_str("requirement"),
            Self::Relations => f.write_str("relation"),
        }
    }
}

/// A row that was skipped during import.
///
/// Row numbers are 1-based positions in the sheet's data rows, in the order
/// the rows were read (before any sorting).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// The requirement type could not be classified.
    #[error("requirement row {row} skipped: invalid type '{value}'")]
    ClassificationFailure {
        /// Row number.
        row: usize,
        /// The raw type value.
        value: String,
    },

    /// The relation type is not `satisfy`, `derive` or `refine`.
    #[error("relation row {row} skipped: invalid relation type '{value}'")]
    InvalidRelationKind {
        /// Row number.
        row: usize,
        /// The raw relation type value.
        value: String,
    },

    /// Neither direct identifiers nor both business keys were given.
    #[error(
        "relation row {row} skipped: missing source/target business key and no direct identifiers"
    )]
    MissingReference {
        /// Row number.
        row: usize,
    },

    /// A business key does not name any imported requirement.
    #[error("relation row {row} skipped: could not resolve {source_key} -> {target_key}")]
    UnresolvedReference {
        /// Row number.
        row: usize,
        /// Source business key.
        source_key: String,
        /// Target business key.
        target_key: String,
    },

    /// The document refused the row.
    #[error("{sheet} row {row} rejected: {reason}")]
    Rejected {
        /// Sheet the row came from.
        sheet: SheetKind,
        /// Row number.
        row: usize,
        /// Why the row was refused.
        reason: String,
    },
}

/// Outcome of [`map_rows`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of requirement objects registered.
    pub requirements_added: usize,
    /// Number of relation edges registered.
    pub relations_added: usize,
    /// Skipped rows, requirements first, each group in processing order.
    pub warnings: Vec<Warning>,
}

/// Classifies a free-form requirement type.
///
/// Exact synonyms are tried first, then substrings. `non-functional` is
/// classified as performance.
///
/// ```
/// use reqif::{domain::RequirementKind, import::classify_kind};
///
/// assert_eq!(classify_kind("FR"), Some(RequirementKind::Functional));
/// assert_eq!(classify_kind("Interface requirement"), Some(RequirementKind::Interface));
/// assert_eq!(classify_kind("Non-Functional"), Some(RequirementKind::Performance));
/// assert_eq!(classify_kind("safety"), None);
/// ```
#[must_use]
pub fn classify_kind(raw: &str) -> Option<RequirementKind> {
    let raw = raw.trim().to_lowercase();
    match raw.as_str() {
        "functional" | "func" | "fr" | "f" => Some(RequirementKind::Functional),
        "interface" | "if" | "ir" | "i" => Some(RequirementKind::Interface),
        "performance" | "perf" | "pr" | "p" | "non-functional" | "nfr" => {
            Some(RequirementKind::Performance)
        }
        _ if raw.contains("non-functional") => Some(RequirementKind::Performance),
        _ if raw.contains("functional") => Some(RequirementKind::Functional),
        _ if raw.contains("interface") => Some(RequirementKind::Interface),
        _ if raw.contains("performance") => Some(RequirementKind::Performance),
        _ => None,
    }
}

/// Registers every mappable row of `sheets` with `document`.
///
/// Requirement rows are processed before relation rows. Rows with an integer
/// `order` are processed in ascending order; the rest follow in sheet order.
#[instrument(skip_all, fields(
    requirements = sheets.requirements.len(),
    relations = sheets.relations.len()
))]
pub fn map_rows(document: &mut Document, sheets: &Sheets, prefixes: &Prefixes) -> ImportReport {
    let mut mapper = Mapper {
        document,
        prefixes,
        report: ImportReport::default(),
    };

    let mut requirements: Vec<(usize, &Row)> = sheets.requirements.iter().enumerate().collect();
    requirements.sort_by_key(|(_, row)| (row.integer(&["order"]).is_none(), row.integer(&["order"])));

    for (index, row) in requirements {
        mapper.requirement(index + 1, row);
    }
    for (index, row) in sheets.relations.iter().enumerate() {
        mapper.relation(index + 1, row);
    }

    mapper.report
}

struct Mapper<'a> {
    document: &'a mut Document,
    prefixes: &'a Prefixes,
    report: ImportReport,
}

impl Mapper<'_> {
    fn requirement(&mut self, number: usize, row: &Row) {
        let raw_kind = row.text(&["type", "req_type"]);
        let Some(kind) = classify_kind(&raw_kind) else {
            self.skip(Warning::ClassificationFailure {
                row: number,
                value: raw_kind,
            });
            return;
        };

        let key = row.text(&["ie_puid", "iepuid"]);
        let name = row.text(&["name"]);
        let description = row.text(&["description", "desc"]);

        let display_name = [&name, &key]
            .into_iter()
            .find_map(|candidate| NonEmptyString::new(candidate.clone()).ok())
            .unwrap_or_else(|| non_empty_string!(UNTITLED));

        let text = row.text(&["text", "text_content"]);
        let html = row.text(&["texthtml", "text_html"]);
        let body = if !text.is_empty() {
            convert(&text)
        } else if html.starts_with('<') {
            convert(&html)
        } else if !description.is_empty() {
            convert(&description)
        } else {
            convert(&name)
        };

        let prefix = Some(row.text(&["reqprefix", "req_prefix"]))
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| self.prefixes.for_kind(kind).to_string());

        let requirement = NewRequirement {
            foreign_id: row.integer(&["foreign_id", "foreignid"]).unwrap_or(0),
            chapter: row.text(&["chapter"]),
            description,
            status: non_empty(row.text(&["status"])),
            priority: non_empty(row.text(&["priority"])),
            prefix,
            identifier: non_empty(row.text(&["identifier", "spec_object_id"])),
            external_key: non_empty(key),
            ..NewRequirement::new(kind.as_str(), display_name, body)
        };

        match self.document.add_requirement(requirement) {
            Ok(_) => self.report.requirements_added += 1,
            Err(e) => self.skip(Warning::Rejected {
                sheet: SheetKind::Requirements,
                row: number,
                reason: e.to_string(),
            }),
        }
    }

    fn relation(&mut self, number: usize, row: &Row) {
        let raw_kind = row.text(&["relationtype", "relation_type"]);
        let Ok(kind) = raw_kind.parse::<RelationKind>() else {
            self.skip(Warning::InvalidRelationKind {
                row: number,
                value: raw_kind,
            });
            return;
        };

        let direct_source = row.text(&["source_id"]);
        let direct_target = row.text(&["target_id"]);

        let (source, target) = if !direct_source.is_empty() && !direct_target.is_empty() {
            (direct_source, direct_target)
        } else {
            let source_key = row.text(&["sourceiepuid", "source_ie_puid"]);
            let target_key = row.text(&["targetiepuid", "target_ie_puid"]);
            if source_key.is_empty() || target_key.is_empty() {
                self.skip(Warning::MissingReference { row: number });
                return;
            }
            let source = self.resolve(&source_key);
            let target = self.resolve(&target_key);
            match (source, target) {
                (Some(source), Some(target)) => (source, target),
                _ => {
                    self.skip(Warning::UnresolvedReference {
                        row: number,
                        source_key,
                        target_key,
                    });
                    return;
                }
            }
        };

        let identifier = non_empty(row.text(&["identifier"]));
        match self
            .document
            .add_relation(kind.as_str(), &source, &target, identifier)
        {
            Ok(_) => self.report.relations_added += 1,
            Err(e) => self.skip(Warning::Rejected {
                sheet: SheetKind::Relations,
                row: number,
                reason: e.to_string(),
            }),
        }
    }

    fn resolve(&self, key: &str) -> Option<String> {
        self.document
            .find_by_external_key(key)
            .map(|object| object.identifier().to_string())
    }

    fn skip(&mut self, warning: Warning) {
        debug!(%warning, "skipping row");
        self.report.warnings.push(warning);
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{Body, rich_text::Block};

    fn document() -> Document {
        Document::with_timestamp("Test", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn import(requirements: Vec<Row>, relations: Vec<Row>) -> (Document, ImportReport) {
        let mut document = document();
        let sheets = Sheets {
            requirements,
            relations,
        };
        let report = map_rows(&mut document, &sheets, &Prefixes::default());
        (document, report)
    }

    fn requirement(key: &str, kind: &str) -> Row {
        Row::new()
            .with("IE PUID", key)
            .with("Type", kind)
            .with("Name", key)
    }

    fn body_text(document: &Document, index: usize) -> Vec<String> {
        match document.objects()[index].body() {
            Body::RichText(text) => text
                .blocks()
                .iter()
                .map(|block| match block {
                    Block::Paragraph(inline) => inline.text(),
                    Block::List(items) => items.iter().map(|i| i.text()).collect::<Vec<_>>().join("|"),
                })
                .collect(),
            Body::PreEncoded(markup) => vec![markup.clone()],
        }
    }

    #[test]
    fn satisfy_relation_by_business_key() {
        let (document, report) = import(
            vec![
                requirement("REQ-1", "functional").with("Text", "The system shall log in."),
                requirement("REQ-2", "interface").with("Text", "The UI shall show a form."),
            ],
            vec![
                Row::new()
                    .with("RelationType", "satisfy")
                    .with("SourceIEPUID", "REQ-2")
                    .with("TargetIEPUID", "REQ-1"),
            ],
        );

        assert_eq!(report.requirements_added, 2);
        assert_eq!(report.relations_added, 1);
        assert!(report.warnings.is_empty());

        let relation = &document.relations()[0];
        assert_eq!(relation.kind(), RelationKind::Satisfy);
        assert_eq!(relation.source(), "SO-I-002");
        assert_eq!(relation.target(), "SO-F-001");
    }

    #[test]
    fn rows_are_ordered_by_order_column() {
        let (document, _) = import(
            vec![
                requirement("C", "f"),
                requirement("B", "f").with("Order", 2.0),
                requirement("A", "f").with("Order", "1"),
                requirement("D", "f"),
            ],
            vec![],
        );

        let keys: Vec<&str> = document.objects().iter().map(|o| o.external_key()).collect();
        assert_eq!(keys, ["A", "B", "C", "D"]);
    }

    #[test]
    fn unclassifiable_type_is_skipped() {
        let (document, report) = import(vec![requirement("REQ-1", "safety")], vec![]);

        assert!(document.is_empty());
        assert_eq!(
            report.warnings,
            [Warning::ClassificationFailure {
                row: 1,
                value: "safety".into()
            }]
        );
    }

    #[test]
    fn type_synonyms_and_phrases() {
        assert_eq!(classify_kind(" Perf "), Some(RequirementKind::Performance));
        assert_eq!(classify_kind("nfr"), Some(RequirementKind::Performance));
        assert_eq!(classify_kind("IF"), Some(RequirementKind::Interface));
        assert_eq!(
            classify_kind("functional requirement"),
            Some(RequirementKind::Functional)
        );
        assert_eq!(
            classify_kind("non-functional requirement"),
            Some(RequirementKind::Performance)
        );
        assert_eq!(classify_kind(""), None);
    }

    #[test]
    fn prefix_defaults_per_kind() {
        let (document, _) = import(
            vec![
                requirement("A", "performance"),
                requirement("B", "interface").with("ReqPrefix", "CUSTOM"),
            ],
            vec![],
        );

        assert_eq!(document.objects()[0].prefix(), "SYS-P");
        assert_eq!(document.objects()[1].prefix(), "CUSTOM");
    }

    #[test]
    fn name_falls_back_to_key_then_untitled() {
        let (document, _) = import(
            vec![
                Row::new().with("Type", "f").with("IE PUID", "KEY-1"),
                Row::new().with("Type", "f"),
            ],
            vec![],
        );

        assert_eq!(document.objects()[0].name(), "KEY-1");
        assert_eq!(document.objects()[1].name(), UNTITLED);
        assert_eq!(document.objects()[1].external_key(), "REQ-002");
    }

    #[test]
    fn body_falls_back_through_columns() {
        let (document, _) = import(
            vec![
                requirement("A", "f").with("Text", "- one\n- two"),
                requirement("B", "f").with("TextHTML", "<b>raw</b>"),
                requirement("C", "f")
                    .with("TextHTML", "not markup")
                    .with("Description", "described"),
                requirement("D", "f"),
            ],
            vec![],
        );

        assert_eq!(body_text(&document, 0), ["one|two"]);
        assert_eq!(body_text(&document, 1), ["<b>raw</b>"]);
        assert_eq!(body_text(&document, 2), ["described"]);
        assert_eq!(body_text(&document, 3), ["D"]);
    }

    #[test]
    fn optional_columns_are_carried_over() {
        let (document, _) = import(
            vec![
                requirement("A", "f")
                    .with("Foreign ID", 1001.0)
                    .with("Chapter", "Login")
                    .with("Status", "draft")
                    .with("Priority", "high")
                    .with("Identifier", "SO-CUSTOM"),
            ],
            vec![],
        );

        let object = &document.objects()[0];
        assert_eq!(object.foreign_id(), 1001);
        assert_eq!(object.chapter(), "Login");
        assert_eq!(object.status(), crate::domain::Status::Draft);
        assert_eq!(object.priority(), crate::domain::Priority::High);
        assert_eq!(object.identifier(), "SO-CUSTOM");
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let (document, report) = import(
            vec![
                requirement("A", "f").with("Identifier", "X"),
                requirement("B", "f").with("Identifier", "X"),
            ],
            vec![],
        );

        assert_eq!(document.len(), 1);
        assert!(matches!(
            report.warnings.as_slice(),
            [Warning::Rejected {
                sheet: SheetKind::Requirements,
                row: 2,
                ..
            }]
        ));
    }

    #[test]
    fn repeated_business_key_resolves_to_latest_requirement() {
        let (document, report) = import(
            vec![requirement("K", "f"), requirement("K", "i")],
            vec![
                Row::new()
                    .with("RelationType", "satisfy")
                    .with("SourceIEPUID", "K")
                    .with("TargetIEPUID", "K"),
            ],
        );

        assert_eq!(report.relations_added, 1);
        let relation = &document.relations()[0];
        assert_eq!(relation.source(), "SO-I-002");
        assert_eq!(
            document.find_by_external_key("K").map(|o| o.identifier()),
            Some(relation.source())
        );
    }

    #[test]
    fn direct_identifiers_take_precedence() {
        let (document, report) = import(
            vec![requirement("A", "f")],
            vec![
                Row::new()
                    .with("Relation Type", "Derive")
                    .with("Source ID", "EXT-1")
                    .with("Target ID", "EXT-2")
                    .with("Source IE PUID", "A")
                    .with("Target IE PUID", "A")
                    .with("Identifier", "REL-1"),
            ],
        );

        assert_eq!(report.relations_added, 1);
        let relation = &document.relations()[0];
        assert_eq!(relation.identifier(), "REL-1");
        assert_eq!(relation.kind(), RelationKind::Derive);
        assert_eq!(relation.source(), "EXT-1");
        assert_eq!(relation.target(), "EXT-2");
    }

    #[test]
    fn relation_warnings() {
        let (document, report) = import(
            vec![requirement("A", "f")],
            vec![
                Row::new().with("RelationType", "traces"),
                Row::new().with("RelationType", "refine").with("SourceIEPUID", "A"),
                Row::new()
                    .with("RelationType", "refine")
                    .with("SourceIEPUID", "A")
                    .with("TargetIEPUID", "Z"),
            ],
        );

        assert!(document.relations().is_empty());
        assert_eq!(
            report.warnings,
            [
                Warning::InvalidRelationKind {
                    row: 1,
                    value: "traces".into()
                },
                Warning::MissingReference { row: 2 },
                Warning::UnresolvedReference {
                    row: 3,
                    source_key: "A".into(),
                    target_key: "Z".into()
                },
            ]
        );
        assert_eq!(
            report.warnings[2].to_string(),
            "relation row 3 skipped: could not resolve A -> Z"
        );
    }
}
