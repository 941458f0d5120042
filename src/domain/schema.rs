//! The fixed type and attribute schema every document declares.
//!
//! [`SchemaCatalog::standard`] builds the catalog once; the encoder takes it by
//! reference and reads every datatype, enumeration, attribute and type
//! identifier from it. Lookups are indexed by the domain enums, so they are
//! total: there is no identifier the encoder can ask for that the catalog
//! does not hold.

use crate::domain::kind::{Priority, RelationKind, RequirementKind, Status};

/// The scalar or enumerated type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeKind {
    /// Plain string.
    String,
    /// Embedded XHTML.
    Xhtml,
    /// Integer.
    Integer,
    /// Enumeration with specified values.
    Enumeration,
}

/// A scalar datatype definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatype {
    /// Identifier, e.g. `DT-STRING`.
    pub identifier: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
    /// Scalar kind.
    pub kind: DatatypeKind,
}

/// One value of an enumeration datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Identifier, e.g. `EV-STATUS-DRAFT`.
    pub identifier: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
    /// Numeric ordinal.
    pub key: u32,
}

/// An enumeration datatype with `N` ordered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration<const N: usize> {
    /// Identifier, e.g. `DT-STATUS`.
    pub identifier: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
    /// Values in key order.
    pub values: [EnumValue; N],
}

/// The nine attributes every requirement object carries, in declaration and
/// value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `ReqIF.ForeignID`
    ForeignId,
    /// `ReqIF.Name`
    Name,
    /// `IE PUID`, the business key.
    ExternalKey,
    /// `ReqIF.ChapterName`
    Chapter,
    /// `ReqIF.Description`
    Description,
    /// `ReqIF.Prefix`
    Prefix,
    /// `ReqIF.Text`
    Text,
    /// `Status`
    Status,
    /// `Priority`
    Priority,
}

impl Field {
    /// Every field, in the fixed attribute order.
    pub const ALL: [Self; 9] = [
        Self::ForeignId,
        Self::Name,
        Self::ExternalKey,
        Self::Chapter,
        Self::Description,
        Self::Prefix,
        Self::Text,
        Self::Status,
        Self::Priority,
    ];

    const fn suffix(self) -> &'static str {
        match self {
            Self::ForeignId => "FOREIGNID",
            Self::Name => "NAME",
            Self::ExternalKey => "IEPUID",
            Self::Chapter => "CHAP",
            Self::Description => "DESC",
            Self::Prefix => "PREFIX",
            Self::Text => "TEXT",
            Self::Status => "STATUS",
            Self::Priority => "PRIORITY",
        }
    }

    const fn long_name(self) -> &'static str {
        match self {
            Self::ForeignId => "ReqIF.ForeignID",
            Self::Name => "ReqIF.Name",
            Self::ExternalKey => "IE PUID",
            Self::Chapter => "ReqIF.ChapterName",
            Self::Description => "ReqIF.Description",
            Self::Prefix => "ReqIF.Prefix",
            Self::Text => "ReqIF.Text",
            Self::Status => "Status",
            Self::Priority => "Priority",
        }
    }

    const fn datatype(self) -> (DatatypeKind, &'static str) {
        match self {
            Self::ForeignId => (DatatypeKind::Integer, DT_INTEGER),
            Self::Name | Self::ExternalKey | Self::Chapter | Self::Prefix => {
                (DatatypeKind::String, DT_STRING)
            }
            Self::Description | Self::Text => (DatatypeKind::Xhtml, DT_XHTML),
            Self::Status => (DatatypeKind::Enumeration, DT_STATUS),
            Self::Priority => (DatatypeKind::Enumeration, DT_PRIORITY),
        }
    }
}

/// An attribute definition within an object or specification type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    /// Identifier, e.g. `F-AD-NAME`.
    pub identifier: String,
    /// Human-readable name.
    pub long_name: &'static str,
    /// Datatype kind, selecting the definition and value element names.
    pub kind: DatatypeKind,
    /// Identifier of the referenced datatype.
    pub datatype: &'static str,
}

impl AttributeDefinition {
    /// Enumeration attributes are declared single-valued.
    #[must_use]
    pub fn multi_valued(&self) -> Option<bool> {
        (self.kind == DatatypeKind::Enumeration).then_some(false)
    }
}

/// A requirement object type with its attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    /// The requirement kind this type describes.
    pub kind: RequirementKind,
    /// Identifier, e.g. `T-REQ-FUNCTIONAL`.
    pub identifier: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
    attributes: [(Field, AttributeDefinition); 9],
}

impl ObjectType {
    fn new(kind: RequirementKind, identifier: &'static str) -> Self {
        let prefix = kind.short_code();
        let attributes = Field::ALL.map(|field| {
            let (datatype_kind, datatype) = field.datatype();
            (
                field,
                AttributeDefinition {
                    identifier: format!("{prefix}-AD-{}", field.suffix()),
                    long_name: field.long_name(),
                    kind: datatype_kind,
                    datatype,
                },
            )
        });
        Self {
            kind,
            identifier,
            long_name: kind.as_str(),
            attributes,
        }
    }

    /// The attributes in fixed order, paired with the field they carry.
    pub fn attributes(&self) -> impl Iterator<Item = (Field, &AttributeDefinition)> {
        self.attributes.iter().map(|(field, def)| (*field, def))
    }
}

/// A relation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationType {
    /// The relation kind this type describes.
    pub kind: RelationKind,
    /// Identifier, e.g. `T-REL-SATISFY`.
    pub identifier: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
}

/// The specification (module) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificationType {
    /// Identifier, `T-MODULE`.
    pub identifier: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
    /// The module `ID` attribute (string).
    pub id_attribute: AttributeDefinition,
    /// The module `Description` attribute (XHTML).
    pub description_attribute: AttributeDefinition,
}

const DT_STRING: &str = "DT-STRING";
const DT_XHTML: &str = "DT-XHTML";
const DT_INTEGER: &str = "DT-INTEGER";
const DT_STATUS: &str = "DT-STATUS";
const DT_PRIORITY: &str = "DT-PRIORITY";

/// The complete schema shared by every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    scalars: [Datatype; 3],
    status: Enumeration<4>,
    priority: Enumeration<3>,
    specification_type: SpecificationType,
    object_types: [ObjectType; 3],
    relation_types: [RelationType; 3],
}

impl SchemaCatalog {
    /// Builds the standard catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            scalars: [
                Datatype {
                    identifier: DT_STRING,
                    long_name: "String",
                    kind: DatatypeKind::String,
                },
                Datatype {
                    identifier: DT_XHTML,
                    long_name: "XHTMLString",
                    kind: DatatypeKind::Xhtml,
                },
                Datatype {
                    identifier: DT_INTEGER,
                    long_name: "Integer",
                    kind: DatatypeKind::Integer,
                },
            ],
            status: Enumeration {
                identifier: DT_STATUS,
                long_name: "Status",
                values: Status::ALL.map(|status| EnumValue {
                    identifier: match status {
                        Status::Draft => "EV-STATUS-DRAFT",
                        Status::Wip => "EV-STATUS-WIP",
                        Status::Reviewed => "EV-STATUS-REVIEWED",
                        Status::Approved => "EV-STATUS-APPROVED",
                    },
                    long_name: status.long_name(),
                    key: status.key(),
                }),
            },
            priority: Enumeration {
                identifier: DT_PRIORITY,
                long_name: "Priority",
                values: Priority::ALL.map(|priority| EnumValue {
                    identifier: match priority {
                        Priority::High => "EV-PRIO-HIGH",
                        Priority::Medium => "EV-PRIO-MEDIUM",
                        Priority::Low => "EV-PRIO-LOW",
                    },
                    long_name: priority.long_name(),
                    key: priority.key(),
                }),
            },
            specification_type: SpecificationType {
                identifier: "T-MODULE",
                long_name: "Stakeholder Requirements",
                id_attribute: AttributeDefinition {
                    identifier: "AD-MOD-ID".to_string(),
                    long_name: "ID",
                    kind: DatatypeKind::String,
                    datatype: DT_STRING,
                },
                description_attribute: AttributeDefinition {
                    identifier: "AD-MOD-DESC".to_string(),
                    long_name: "Description",
                    kind: DatatypeKind::Xhtml,
                    datatype: DT_XHTML,
                },
            },
            object_types: RequirementKind::ALL.map(|kind| {
                ObjectType::new(
                    kind,
                    match kind {
                        RequirementKind::Functional => "T-REQ-FUNCTIONAL",
                        RequirementKind::Interface => "T-REQ-INTERFACE",
                        RequirementKind::Performance => "T-REQ-PERFORMANCE",
                    },
                )
            }),
            relation_types: RelationKind::ALL.map(|kind| RelationType {
                kind,
                identifier: match kind {
                    RelationKind::Satisfy => "T-REL-SATISFY",
                    RelationKind::Derive => "T-REL-DERIVE",
                    RelationKind::Refine => "T-REL-REFINE",
                },
                long_name: kind.as_str(),
            }),
        }
    }

    /// The scalar datatypes (string, XHTML, integer).
    #[must_use]
    pub const fn scalars(&self) -> &[Datatype] {
        &self.scalars
    }

    /// The status enumeration.
    #[must_use]
    pub const fn status(&self) -> &Enumeration<4> {
        &self.status
    }

    /// The priority enumeration.
    #[must_use]
    pub const fn priority(&self) -> &Enumeration<3> {
        &self.priority
    }

    /// The enumeration value for a status.
    #[must_use]
    pub const fn status_value(&self, status: Status) -> &EnumValue {
        &self.status.values[status.index()]
    }

    /// The enumeration value for a priority.
    #[must_use]
    pub const fn priority_value(&self, priority: Priority) -> &EnumValue {
        &self.priority.values[priority.index()]
    }

    /// The specification (module) type.
    #[must_use]
    pub const fn specification_type(&self) -> &SpecificationType {
        &self.specification_type
    }

    /// Every object type, in declaration order.
    #[must_use]
    pub const fn object_types(&self) -> &[ObjectType] {
        &self.object_types
    }

    /// The object type for a requirement kind.
    #[must_use]
    pub const fn object_type(&self, kind: RequirementKind) -> &ObjectType {
        &self.object_types[kind.index()]
    }

    /// Every relation type, in declaration order.
    #[must_use]
    pub const fn relation_types(&self) -> &[RelationType] {
        &self.relation_types
    }

    /// The relation type for a relation kind.
    #[must_use]
    pub const fn relation_type(&self, kind: RelationKind) -> &RelationType {
        &self.relation_types[kind.index()]
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
