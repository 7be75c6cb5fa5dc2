//! Configuration loading and management for br-docs
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are checked against the domain before use
//! - Default display patterns live in the domain, the file only overrides them
//! - Lookups fall back to defaults for any document type the file leaves out

use crate::domain::documents::{BrDocsError, BrDocsResult, DocumentType};
use crate::domain::regions::{BrazilianState, Country, STATE_CODE_LEN};
use crate::format::{DocumentFormatter, CNH_STATE_PATTERN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File names searched in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["br_docs.yaml", "br_docs.yml", ".br_docs.yaml"];

/// Main configuration structure for br-docs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Configuration format version
    pub version: String,
    /// Per-document display settings
    #[serde(default)]
    pub documents: BTreeMap<DocumentType, DocumentSettings>,
    /// Display pattern for a CNH followed by its state code
    #[serde(default = "default_cnh_state_pattern")]
    pub cnh_state_pattern: String,
    /// Issuing state used when generating a CNH without an explicit one
    #[serde(default)]
    pub default_state: Option<String>,
    /// Country used for phone numbers when none is given
    #[serde(default = "default_country")]
    pub default_country: String,
}

/// Display settings for one document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Placeholder pattern, `X` per digit
    pub pattern: String,
}

impl ToolkitConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BrDocsResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            BrDocsError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            BrDocsError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> BrDocsResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| BrDocsError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first default config file present in `dir`, or the built-in defaults
    pub fn discover<P: AsRef<Path>>(dir: P) -> BrDocsResult<Self> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                return Self::load_from_file(candidate);
            }
        }
        Ok(Self::default())
    }

    /// Default configuration using each document type's built-in pattern
    pub fn with_defaults() -> Self {
        let documents = DocumentType::all()
            .iter()
            .map(|doc| (*doc, DocumentSettings { pattern: doc.default_pattern().to_string() }))
            .collect();

        Self {
            version: "1.0".to_string(),
            documents,
            cnh_state_pattern: default_cnh_state_pattern(),
            default_state: None,
            default_country: default_country(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> BrDocsResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(BrDocsError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for (doc, settings) in &self.documents {
            let placeholders = DocumentFormatter::placeholder_count(&settings.pattern);
            let expected = doc.spec().total_len();
            if placeholders != expected {
                return Err(BrDocsError::config(format!(
                    "Pattern '{}' for {} has {} placeholders, expected {}",
                    settings.pattern, doc, placeholders, expected
                )));
            }
        }

        let state_len = DocumentType::Cnh.spec().total_len() + STATE_CODE_LEN;
        if DocumentFormatter::placeholder_count(&self.cnh_state_pattern) != state_len {
            return Err(BrDocsError::config(format!(
                "Pattern '{}' for cnh with state has {} placeholders, expected {}",
                self.cnh_state_pattern,
                DocumentFormatter::placeholder_count(&self.cnh_state_pattern),
                state_len
            )));
        }

        if let Some(state) = &self.default_state {
            state.parse::<BrazilianState>().map_err(|e| {
                BrDocsError::config(format!("Invalid default_state '{state}': {e}"))
            })?;
        }

        Country::lookup(&self.default_country).map_err(|e| {
            BrDocsError::config(format!(
                "Invalid default_country '{}': {e}",
                self.default_country
            ))
        })?;

        Ok(())
    }

    /// Display pattern for a document type
    pub fn pattern_for(&self, doc: DocumentType) -> &str {
        self.documents
            .get(&doc)
            .map(|s| s.pattern.as_str())
            .unwrap_or_else(|| doc.default_pattern())
    }

    /// Resolved default issuing state, if configured
    pub fn default_state(&self) -> BrDocsResult<Option<BrazilianState>> {
        self.default_state.as_deref().map(str::parse::<BrazilianState>).transpose()
    }

    /// Resolved default country
    pub fn default_country(&self) -> BrDocsResult<&'static Country> {
        Country::lookup(&self.default_country)
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> BrDocsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BrDocsError::serialization(format!("Failed to serialize config: {e}")))
    }

    /// Convert to YAML, the on-disk format
    pub fn to_yaml(&self) -> BrDocsResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BrDocsError::serialization(format!("Failed to serialize config: {e}")))
    }
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_cnh_state_pattern() -> String {
    CNH_STATE_PATTERN.to_string()
}

fn default_country() -> String {
    "br".to_string()
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: ToolkitConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: ToolkitConfig::default() }
    }

    /// Override the display pattern of a document type
    pub fn pattern(mut self, doc: DocumentType, pattern: impl Into<String>) -> Self {
        self.config.documents.insert(doc, DocumentSettings { pattern: pattern.into() });
        self
    }

    /// Override the CNH-with-state pattern
    pub fn cnh_state_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.cnh_state_pattern = pattern.into();
        self
    }

    pub fn default_state(mut self, state: BrazilianState) -> Self {
        self.config.default_state = Some(state.abbreviation().to_string());
        self
    }

    pub fn default_country(mut self, code: impl Into<String>) -> Self {
        self.config.default_country = code.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> BrDocsResult<ToolkitConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ToolkitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pattern_for(DocumentType::Cpf), "XXX.XXX.XXX-XX");
        assert_eq!(config.default_country().unwrap().dial_code, "55");
        assert_eq!(config.default_state().unwrap(), None);
    }

    #[test]
    fn test_load_from_str() {
        let yaml = r#"
version: "1.0"
documents:
  cpf:
    pattern: "XXXXXXXXX-XX"
default_state: sp
"#;
        let config = ToolkitConfig::load_from_str(yaml).unwrap();
        assert_eq!(config.pattern_for(DocumentType::Cpf), "XXXXXXXXX-XX");
        // missing entries fall back to built-in patterns
        assert_eq!(config.pattern_for(DocumentType::Cnh), "XXX.XXX.XXX-XX");
        assert_eq!(config.default_state().unwrap(), Some(BrazilianState::SP));
        assert_eq!(config.cnh_state_pattern, CNH_STATE_PATTERN);
        assert_eq!(config.default_country, "br");
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = ToolkitConfig::load_from_str("version: \"2.0\"\n").unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration version"));
    }

    #[test]
    fn test_rejects_pattern_length_mismatch() {
        let yaml = "version: \"1.0\"\ndocuments:\n  cnh:\n    pattern: \"XXX.XXX\"\n";
        let err = ToolkitConfig::load_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("expected 11"));
    }

    #[test]
    fn test_rejects_unknown_document_type() {
        let yaml = "version: \"1.0\"\ndocuments:\n  rg:\n    pattern: \"XX\"\n";
        assert!(ToolkitConfig::load_from_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_bad_defaults() {
        assert!(ToolkitConfig::load_from_str("version: \"1.0\"\ndefault_state: ZZ\n").is_err());
        assert!(ToolkitConfig::load_from_str("version: \"1.0\"\ndefault_country: zz\n").is_err());
    }

    #[test]
    fn test_load_from_file_and_discover() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(ToolkitConfig::discover(temp_dir.path()).unwrap(), ToolkitConfig::default());

        let config = ConfigBuilder::new()
            .pattern(DocumentType::Cnh, "XXXXXXXXXXX")
            .default_state(BrazilianState::RJ)
            .build()
            .unwrap();
        let path = temp_dir.path().join("br_docs.yaml");
        fs::write(&path, config.to_yaml().unwrap()).unwrap();

        let loaded = ToolkitConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(ToolkitConfig::discover(temp_dir.path()).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ToolkitConfig::load_from_file(temp_dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, BrDocsError::Configuration { .. }));
    }

    #[test]
    fn test_builder_validates() {
        assert!(ConfigBuilder::new().cnh_state_pattern("XXX").build().is_err());
        assert!(ConfigBuilder::new().default_country("pt").build().is_ok());
    }

    #[test]
    fn test_to_json() {
        let json = ToolkitConfig::default().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["version"], "1.0");
        assert_eq!(parsed["documents"]["cpf"]["pattern"], "XXX.XXX.XXX-XX");
    }
}
