use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::kind::RequirementKind;

/// Configuration for workbook conversion.
///
/// This struct holds settings that control where rows are read from, how the
/// generated document is titled, and how the summary is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Title of the generated document and its specification.
    pub title: String,

    /// Name of the sheet holding requirement rows.
    pub requirements_sheet: String,

    /// Name of the sheet holding relation rows.
    pub relations_sheet: String,

    /// The maximum number of warnings listed in the conversion summary.
    ///
    /// All warnings are counted; only the first `max_warnings` are shown.
    pub max_warnings: usize,

    /// Requirement prefix labels used when a row does not supply one.
    pub prefixes: Prefixes,
}

/// Default requirement prefix label per requirement kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefixes {
    /// Prefix for functional requirements.
    #[serde(default = "default_functional_prefix")]
    pub functional: String,
    /// Prefix for interface requirements.
    #[serde(default = "default_interface_prefix")]
    pub interface: String,
    /// Prefix for performance requirements.
    #[serde(default = "default_performance_prefix")]
    pub performance: String,
}

impl Prefixes {
    /// The prefix label for a requirement kind.
    #[must_use]
    pub fn for_kind(&self, kind: RequirementKind) -> &str {
        match kind {
            RequirementKind::Functional => &self.functional,
            RequirementKind::Interface => &self.interface,
            RequirementKind::Performance => &self.performance,
        }
    }
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            functional: default_functional_prefix(),
            interface: default_interface_prefix(),
            performance: default_performance_prefix(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            requirements_sheet: default_requirements_sheet(),
            relations_sheet: default_relations_sheet(),
            max_warnings: default_max_warnings(),
            prefixes: Prefixes::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

fn default_title() -> String {
    "System Requirements Specification".to_string()
}

fn default_requirements_sheet() -> String {
    "Requirements".to_string()
}

fn default_relations_sheet() -> String {
    "Relations".to_string()
}

const fn default_max_warnings() -> usize {
    10
}

fn default_functional_prefix() -> String {
    "SYS-F".to_string()
}

fn default_interface_prefix() -> String {
    "SYS-I".to_string()
}

fn default_performance_prefix() -> String {
    "SYS-P".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_title")]
        title: String,

        #[serde(default = "default_requirements_sheet")]
        requirements_sheet: String,

        #[serde(default = "default_relations_sheet")]
        relations_sheet: String,

        /// The maximum number of warnings shown in the summary.
        #[serde(default = "default_max_warnings")]
        max_warnings: usize,

        #[serde(default)]
        prefixes: Prefixes,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                title,
                requirements_sheet,
                relations_sheet,
                max_warnings,
                prefixes,
            } => Self {
                title,
                requirements_sheet,
                relations_sheet,
                max_warnings,
                prefixes,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            title: config.title,
            requirements_sheet: config.requirements_sheet,
            relations_sheet: config.relations_sheet,
            max_warnings: config.max_warnings,
            prefixes: config.prefixes,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ntitle = \"Braking System\"\nmax_warnings = 3\nrelations_sheet = \"Links\"\n\n[prefixes]\ninterface = \"BRK-I\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.title, "Braking System");
        assert_eq!(config.max_warnings, 3);
        assert_eq!(config.requirements_sheet, "Requirements");
        assert_eq!(config.relations_sheet, "Links");
        assert_eq!(config.prefixes.for_kind(RequirementKind::Interface), "BRK-I");
        assert_eq!(config.prefixes.for_kind(RequirementKind::Functional), "SYS-F");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_warnings = \"ten\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reqif.toml");
        let mut config = Config::default();
        config.title = "Avionics".to_string();
        config.prefixes.performance = "AV-P".to_string();

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
