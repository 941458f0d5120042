//! The in-memory requirements document.
//!
//! A [`Document`] is built by appending requirement objects and relation
//! edges, then handed to the encoder. It owns identifier assignment:
//!
//! - objects without an explicit identifier get `SO-<code>-<NNN>`, where
//!   `<code>` is the kind's short code and `<NNN>` is the running count of
//!   *all* objects registered so far (not a per-kind count)
//! - objects without a business key get `REQ-<NNN>` from the same count
//! - relations without an explicit identifier get `SR-<NNN>` from the running
//!   count of relations
//!
//! If a generated identifier collides with one supplied earlier by a caller,
//! the count is advanced until a free identifier is found.

use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use non_empty_string::NonEmptyString;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{
    kind::{
        InvalidKindError, InvalidRelationKindError, Priority, RelationKind, RequirementKind,
        Status,
    },
    rich_text::RichText,
};

/// Width of the zero-padded sequence number in generated identifiers.
const SEQUENCE_DIGITS: usize = 3;

/// The main statement of a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Structured rich text, rendered by the encoder.
    RichText(RichText),
    /// XHTML markup supplied by the caller, written verbatim inside the value
    /// element.
    ///
    /// The caller is responsible for its well-formedness and for using the
    /// `xhtml` namespace prefix, e.g. `<xhtml:div><xhtml:p>…</xhtml:p></xhtml:div>`.
    PreEncoded(String),
}

impl From<RichText> for Body {
    fn from(text: RichText) -> Self {
        Self::RichText(text)
    }
}

/// Input to [`Document::add_requirement`].
///
/// `kind`, `status` and `priority` are raw strings. The kind is validated
/// strictly; status and priority are classified leniently.
#[derive(Debug, Clone)]
pub struct NewRequirement {
    /// `functional`, `interface` or `performance`.
    pub kind: String,
    /// External cross-reference number.
    pub foreign_id: i64,
    /// Display name.
    pub name: NonEmptyString,
    /// Chapter name; may be empty.
    pub chapter: String,
    /// Short plain-text description.
    pub description: String,
    /// Main requirement statement.
    pub body: Body,
    /// Raw status; see [`Status::classify`].
    pub status: Option<String>,
    /// Raw priority; see [`Priority::classify`].
    pub priority: Option<String>,
    /// Requirement prefix label, e.g. `SYS-F`.
    pub prefix: String,
    /// Explicit identifier. Generated when `None`.
    pub identifier: Option<String>,
    /// Business key. Generated when `None`.
    pub external_key: Option<String>,
}

impl NewRequirement {
    /// Creates a requirement input with empty optional fields, default status
    /// and priority, and a generated identifier and business key.
    #[must_use]
    pub fn new(kind: impl Into<String>, name: NonEmptyString, body: impl Into<Body>) -> Self {
        Self {
            kind: kind.into(),
            foreign_id: 0,
            name,
            chapter: String::new(),
            description: String::new(),
            body: body.into(),
            status: None,
            priority: None,
            prefix: String::new(),
            identifier: None,
            external_key: None,
        }
    }
}

/// A registered requirement object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementObject {
    identifier: String,
    kind: RequirementKind,
    foreign_id: i64,
    name: NonEmptyString,
    chapter: String,
    description: String,
    body: Body,
    status: Status,
    priority: Priority,
    prefix: String,
    external_key: String,
}

impl RequirementObject {
    /// Unique identifier within the document.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The requirement kind.
    #[must_use]
    pub const fn kind(&self) -> RequirementKind {
        self.kind
    }

    /// External cross-reference number.
    #[must_use]
    pub const fn foreign_id(&self) -> i64 {
        self.foreign_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Chapter name.
    #[must_use]
    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    /// Plain-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Main requirement statement.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Requirement prefix label.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Attribute-definition prefix derived from the kind.
    #[must_use]
    pub const fn attribute_prefix(&self) -> &'static str {
        self.kind.short_code()
    }

    /// Business key.
    #[must_use]
    pub fn external_key(&self) -> &str {
        &self.external_key
    }
}

/// A directed traceability link between two requirement objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    identifier: String,
    kind: RelationKind,
    source: String,
    target: String,
}

impl RelationEdge {
    /// Unique identifier within the document.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The relation kind.
    #[must_use]
    pub const fn kind(&self) -> RelationKind {
        self.kind
    }

    /// Identifier of the source object. Not checked against the document.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifier of the target object. Not checked against the document.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Errors raised while adding to a [`Document`].
///
/// The document is left unchanged whenever one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The requirement kind is not recognised.
    #[error(transparent)]
    InvalidKind(#[from] InvalidKindError),

    /// The relation kind is not recognised.
    #[error(transparent)]
    InvalidRelationKind(#[from] InvalidRelationKindError),

    /// A caller-supplied identifier is already in use.
    #[error("identifier '{0}' is already in use")]
    DuplicateIdentifier(String),
}

/// An in-memory requirements document.
#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    created: DateTime<Utc>,
    objects: Vec<RequirementObject>,
    relations: Vec<RelationEdge>,
    object_ids: HashSet<String>,
    relation_ids: HashSet<String>,
}

impl Document {
    /// Creates an empty document stamped with the current time.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_timestamp(title, Utc::now())
    }

    /// Creates an empty document with an explicit creation time.
    ///
    /// The timestamp is truncated to whole seconds.
    #[must_use]
    pub fn with_timestamp(title: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            created: created.trunc_subsecs(0),
            objects: Vec::new(),
            relations: Vec::new(),
            object_ids: HashSet::new(),
            relation_ids: HashSet::new(),
        }
    }

    /// The document title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the document was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Requirement objects in registration order.
    #[must_use]
    pub fn objects(&self) -> &[RequirementObject] {
        &self.objects
    }

    /// Relation edges in registration order.
    #[must_use]
    pub fn relations(&self) -> &[RelationEdge] {
        &self.relations
    }

    /// The number of requirement objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the document has no requirement objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Finds the object registered with the given business key.
    ///
    /// Business keys are not required to be unique; when several objects share
    /// a key the most recently registered one is returned.
    #[must_use]
    pub fn find_by_external_key(&self, key: &str) -> Option<&RequirementObject> {
        self.objects.iter().rfind(|object| object.external_key == key)
    }

    /// Registers a requirement object and returns its identifier.
    ///
    /// Unrecognised status or priority strings fall back to
    /// [`Status::Approved`] and [`Priority::Medium`].
    ///
    /// # Errors
    ///
    /// - [`DocumentError::InvalidKind`] if the kind is not `functional`,
    ///   `interface` or `performance`
    /// - [`DocumentError::DuplicateIdentifier`] if an explicit identifier is
    ///   already used by another object
    #[instrument(level = "debug", skip(self, requirement), fields(kind = %requirement.kind))]
    pub fn add_requirement(&mut self, requirement: NewRequirement) -> Result<String, DocumentError> {
        let kind: RequirementKind = requirement.kind.parse()?;

        let sequence = self.objects.len() + 1;
        let identifier = match requirement.identifier {
            Some(identifier) if self.object_ids.contains(&identifier) => {
                return Err(DocumentError::DuplicateIdentifier(identifier));
            }
            Some(identifier) => identifier,
            None => next_free(&self.object_ids, sequence, |n| {
                format!("SO-{}-{}", kind.short_code(), pad(n))
            }),
        };
        let external_key = requirement
            .external_key
            .unwrap_or_else(|| format!("REQ-{}", pad(sequence)));

        let status = Status::classify(requirement.status.as_deref().unwrap_or_default());
        let priority = Priority::classify(requirement.priority.as_deref().unwrap_or_default());

        debug!(%identifier, %external_key, ?status, ?priority, "adding requirement");

        self.object_ids.insert(identifier.clone());
        self.objects.push(RequirementObject {
            identifier: identifier.clone(),
            kind,
            foreign_id: requirement.foreign_id,
            name: requirement.name,
            chapter: requirement.chapter,
            description: requirement.description,
            body: requirement.body,
            status,
            priority,
            prefix: requirement.prefix,
            external_key,
        });

        Ok(identifier)
    }

    /// Registers a relation edge and returns its identifier.
    ///
    /// `source` and `target` are not resolved against the registered objects;
    /// they are written to the output as given.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::InvalidRelationKind`] if the kind is not `satisfy`,
    ///   `derive` or `refine`
    /// - [`DocumentError::DuplicateIdentifier`] if an explicit identifier is
    ///   already used by another relation
    #[instrument(level = "debug", skip(self))]
    pub fn add_relation(
        &mut self,
        kind: &str,
        source: &str,
        target: &str,
        identifier: Option<String>,
    ) -> Result<String, DocumentError> {
        let kind: RelationKind = kind.parse()?;

        let identifier = match identifier {
            Some(identifier) if self.relation_ids.contains(&identifier) => {
                return Err(DocumentError::DuplicateIdentifier(identifier));
            }
            Some(identifier) => identifier,
            None => next_free(&self.relation_ids, self.relations.len() + 1, |n| {
                format!("SR-{}", pad(n))
            }),
        };

        self.relation_ids.insert(identifier.clone());
        self.relations.push(RelationEdge {
            identifier: identifier.clone(),
            kind,
            source: source.to_string(),
            target: target.to_string(),
        });

        Ok(identifier)
    }
}

fn pad(n: usize) -> String {
    format!("{n:0width$}", width = SEQUENCE_DIGITS)
}

fn next_free(taken: &HashSet<String>, start: usize, format: impl Fn(usize) -> String) -> String {
    (start..)
        .map(format)
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn name(s: &str) -> NonEmptyString {
        NonEmptyString::new(s.to_string()).unwrap()
    }

    fn requirement(kind: &str) -> NewRequirement {
        NewRequirement::new(kind, name("Requirement"), RichText::paragraph("text"))
    }

    fn document() -> Document {
        Document::with_timestamp(
            "Test",
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
    }

    #[test]
    fn invalid_kind_does_not_mutate_document() {
        let mut doc = document();
        doc.add_requirement(requirement("functional")).unwrap();

        let err = doc.add_requirement(requirement("hardware")).unwrap_err();

        assert!(matches!(err, DocumentError::InvalidKind(_)));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn identifiers_use_global_sequence() {
        let mut doc = document();
        let ids: Vec<String> = ["functional", "interface", "functional", "performance"]
            .into_iter()
            .map(|kind| doc.add_requirement(requirement(kind)).unwrap())
            .collect();

        assert_eq!(ids, vec!["SO-F-001", "SO-I-002", "SO-F-003", "SO-P-004"]);
        let keys: Vec<&str> = doc.objects().iter().map(RequirementObject::external_key).collect();
        assert_eq!(keys, vec!["REQ-001", "REQ-002", "REQ-003", "REQ-004"]);
    }

    #[test]
    fn generated_identifiers_skip_explicit_ones() {
        let mut doc = document();
        let mut first = requirement("functional");
        first.identifier = Some("SO-F-002".to_string());
        doc.add_requirement(first).unwrap();

        let generated = doc.add_requirement(requirement("functional")).unwrap();

        assert_eq!(generated, "SO-F-003");
    }

    #[test]
    fn generated_identifiers_are_unique_for_any_kind_mix() {
        let mut doc = document();
        let kinds = ["interface", "performance", "functional"];
        for i in 0..50 {
            doc.add_requirement(requirement(kinds[i % 3])).unwrap();
        }
        let unique: HashSet<&str> = doc.objects().iter().map(RequirementObject::identifier).collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn duplicate_explicit_identifier_is_rejected() {
        let mut doc = document();
        let mut req = requirement("interface");
        req.identifier = Some("CUSTOM".to_string());
        doc.add_requirement(req.clone()).unwrap();

        let err = doc.add_requirement(req).unwrap_err();

        assert_eq!(err, DocumentError::DuplicateIdentifier("CUSTOM".to_string()));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn unrecognised_status_and_priority_use_defaults() {
        let mut doc = document();
        let mut req = requirement("functional");
        req.status = Some("rejected".to_string());
        req.priority = Some("urgent".to_string());
        doc.add_requirement(req).unwrap();

        let object = &doc.objects()[0];
        assert_eq!(object.status(), Status::Approved);
        assert_eq!(object.priority(), Priority::Medium);
        assert_eq!(object.attribute_prefix(), "F");
    }

    #[test]
    fn relations_accept_unknown_endpoints() {
        let mut doc = document();

        let id = doc.add_relation("satisfy", "NOPE-1", "NOPE-2", None).unwrap();

        assert_eq!(id, "SR-001");
        assert_eq!(doc.relations()[0].source(), "NOPE-1");
        assert_eq!(doc.relations()[0].target(), "NOPE-2");
    }

    #[test]
    fn invalid_relation_kind_is_rejected() {
        let mut doc = document();

        let err = doc.add_relation("traces", "A", "B", None).unwrap_err();

        assert!(matches!(err, DocumentError::InvalidRelationKind(_)));
        assert!(doc.relations().is_empty());
    }

    #[test]
    fn relation_identifiers_follow_relation_count() {
        let mut doc = document();
        doc.add_relation("derive", "A", "B", Some("LINK".to_string()))
            .unwrap();
        let id = doc.add_relation("refine", "B", "C", None).unwrap();
        assert_eq!(id, "SR-002");
    }

    #[test]
    fn find_by_external_key_returns_latest_match() {
        let mut doc = document();
        for kind in ["functional", "interface"] {
            let mut req = requirement(kind);
            req.external_key = Some("REQ-1".to_string());
            doc.add_requirement(req).unwrap();
        }

        assert_eq!(
            doc.find_by_external_key("REQ-1").map(RequirementObject::identifier),
            Some("SO-I-002")
        );
        assert!(doc.find_by_external_key("REQ-2").is_none());
    }

    #[test]
    fn timestamp_is_truncated_to_seconds() {
        let created = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let doc = Document::with_timestamp("T", created);
        assert_eq!(doc.created().timestamp_subsec_nanos(), 0);
    }
}
