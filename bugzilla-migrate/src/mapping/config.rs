//! Mappings file deserialization.

use super::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Parsed contents of a mappings TOML file.
///
/// Every table extends the built-in defaults; entries with the same key
/// replace the default value.
///
/// ```toml
/// ignored-cc = ["bridge@example.com"]
///
/// [email-to-login]
/// "walter@example.com" = "WalterBright"
///
/// [keyword-labels]
/// safe = ["kind: safe"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MappingConfig {
    /// Bugzilla e-mail address to GitHub login.
    #[serde(default)]
    pub email_to_login: HashMap<String, String>,

    /// `bug_status` value to closed flag.
    #[serde(default)]
    pub status_to_closed: HashMap<String, bool>,

    /// Keyword to labels.
    #[serde(default)]
    pub keyword_labels: HashMap<String, Vec<String>>,

    /// `resolution` value to labels.
    #[serde(default)]
    pub resolution_labels: HashMap<String, Vec<String>>,

    /// `op_sys` value to labels.
    #[serde(default)]
    pub op_sys_labels: HashMap<String, Vec<String>>,

    /// CC addresses dropped from issue bodies, in addition to the defaults.
    #[serde(default)]
    pub ignored_cc: Vec<String>,
}

impl MappingConfig {
    /// Loads and validates a mappings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading mappings");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let label_tables = [
            ("keyword-labels", &self.keyword_labels),
            ("resolution-labels", &self.resolution_labels),
            ("op-sys-labels", &self.op_sys_labels),
        ];

        for (table, entries) in label_tables {
            for (key, labels) in entries {
                if labels.iter().any(|label| label.trim().is_empty()) {
                    return Err(ConfigError::ValidationError {
                        path: path.display().to_string(),
                        message: format!("{table}: empty label for '{key}'"),
                    });
                }
            }
        }

        if let Some((email, _)) = self
            .email_to_login
            .iter()
            .find(|(_, login)| login.trim().is_empty() || login.starts_with('@'))
        {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: format!("email-to-login: invalid login for '{email}'"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_valid_mappings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mappings.toml");
        fs::write(
            &path,
            r#"
ignored-cc = ["bridge@example.com"]

[email-to-login]
"walter@example.com" = "WalterBright"

[keyword-labels]
safe = ["kind: safe"]

[status-to-closed]
WONTFIX = true
"#,
        )
        .unwrap();

        let config = MappingConfig::load(&path).unwrap();

        assert_eq!(config.ignored_cc, vec!["bridge@example.com"]);
        assert_eq!(config.email_to_login["walter@example.com"], "WalterBright");
        assert_eq!(config.keyword_labels["safe"], vec!["kind: safe"]);
        assert!(config.status_to_closed["WONTFIX"]);
        assert!(config.op_sys_labels.is_empty());
    }

    #[test]
    fn load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = MappingConfig::load(&temp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn load_rejects_unknown_tables() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mappings.toml");
        fs::write(&path, "[component-labels]\ndmd = [\"dmd\"]\n").unwrap();

        let result = MappingConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn load_rejects_empty_labels() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mappings.toml");
        fs::write(&path, "[op-sys-labels]\nHaiku = [\" \"]\n").unwrap();

        let result = MappingConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn load_rejects_prefixed_logins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mappings.toml");
        fs::write(&path, "[email-to-login]\n\"a@example.com\" = \"@someone\"\n").unwrap();

        let result = MappingConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
