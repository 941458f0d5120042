//! Enumerated values used by requirement objects and relation edges.
//!
//! Requirement and relation kinds are strict: parsing an unknown value is an
//! error. Status and priority are lenient: [`Status::classify`] and
//! [`Priority::classify`] map anything they do not recognise onto a default,
//! so dirty spreadsheet data never reaches the encoder as raw text.

use std::{fmt, str::FromStr};

/// The category of a requirement object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequirementKind {
    /// Describes behaviour the system must provide.
    Functional,
    /// Describes a boundary with another system.
    Interface,
    /// Describes a measurable quality target.
    Performance,
}

impl RequirementKind {
    /// Every kind, in schema declaration order.
    pub const ALL: [Self; 3] = [Self::Functional, Self::Interface, Self::Performance];

    /// Single-letter code used in generated identifiers and as the
    /// attribute-definition prefix (`F`, `I` or `P`).
    #[must_use]
    pub const fn short_code(self) -> &'static str {
        match self {
            Self::Functional => "F",
            Self::Interface => "I",
            Self::Performance => "P",
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::Interface => "interface",
            Self::Performance => "performance",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three requirement kinds.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid requirement kind '{0}': expected functional, interface or performance")]
pub struct InvalidKindError(pub String);

impl FromStr for RequirementKind {
    type Err = InvalidKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "functional" => Ok(Self::Functional),
            "interface" => Ok(Self::Interface),
            "performance" => Ok(Self::Performance),
            _ => Err(InvalidKindError(s.to_string())),
        }
    }
}

/// The type of a traceability relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    /// The source satisfies the target.
    Satisfy,
    /// The source is derived from the target.
    Derive,
    /// The source refines the target.
    Refine,
}

impl RelationKind {
    /// Every relation kind, in schema declaration order.
    pub const ALL: [Self; 3] = [Self::Satisfy, Self::Derive, Self::Refine];

    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Satisfy => "satisfy",
            Self::Derive => "derive",
            Self::Refine => "refine",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three relation kinds.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid relation kind '{0}': expected satisfy, derive or refine")]
pub struct InvalidRelationKindError(pub String);

impl FromStr for RelationKind {
    type Err = InvalidRelationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "satisfy" => Ok(Self::Satisfy),
            "derive" => Ok(Self::Derive),
            "refine" => Ok(Self::Refine),
            _ => Err(InvalidRelationKindError(s.to_string())),
        }
    }
}

/// Lifecycle state of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    /// Initial draft.
    Draft,
    /// Work in progress.
    Wip,
    /// Reviewed, awaiting approval.
    Reviewed,
    /// Approved. The fallback for missing or unrecognised input.
    #[default]
    Approved,
}

impl Status {
    /// Every status, ordered by enumeration key.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Wip, Self::Reviewed, Self::Approved];

    /// Maps free-form input onto a status.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. Both
    /// the short name (`wip`) and the long name (`Work-in-progress`) are
    /// recognised. Anything else, including an empty string, yields
    /// [`Status::Approved`].
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| raw == status.as_str() || raw == status.long_name().to_lowercase())
            .unwrap_or_default()
    }

    /// Lower-case short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Wip => "wip",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
        }
    }

    /// Display name used in the enumeration definition.
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Wip => "Work-in-progress",
            Self::Reviewed => "Reviewed",
            Self::Approved => "Approved",
        }
    }

    /// Numeric ordinal of the enumeration value.
    #[must_use]
    pub const fn key(self) -> u32 {
        self as u32
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Importance of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    /// Must be addressed first.
    High,
    /// The fallback for missing or unrecognised input.
    #[default]
    Medium,
    /// Nice to have.
    Low,
}

impl Priority {
    /// Every priority, ordered by enumeration key.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Maps free-form input onto a priority.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unrecognised, including an empty string, yields
    /// [`Priority::Medium`].
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| raw == priority.as_str())
            .unwrap_or_default()
    }

    /// Lower-case short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Display name used in the enumeration definition.
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Numeric ordinal of the enumeration value.
    #[must_use]
    pub const fn key(self) -> u32 {
        self as u32
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
