use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

pub const DEFAULT_DATA_FILE: &str = "expenses.json";

/// Stores user-configurable preferences for the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom location of the expense document. Defaults to `<base>/expenses.json`.
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_file: None,
        }
    }
}

impl Config {
    /// Names accepted by [`Config::set_value`].
    pub const KEYS: [&'static str; 3] = ["currency", "ui_color_enabled", "data_file"];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_file(&self, base: &Path) -> PathBuf {
        match &self.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => base.join(DEFAULT_DATA_FILE),
        }
    }

    /// Updates a single setting from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "currency" => {
                let code = non_empty(key, value)?.to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(ConfigError::InvalidValue {
                        key: key.into(),
                        message: "expected a three-letter currency code".into(),
                    });
                }
                self.currency = code;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.into(),
                            message: "expected true or false".into(),
                        })
                    }
                }
            }
            "data_file" => {
                self.data_file = if value.is_empty() || value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Key/value listing for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            (
                "data_file",
                self.data_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "default".into()),
            ),
        ]
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.into(),
            message: "value cannot be empty".into(),
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_data_file_resolves_against_base() {
        let mut cfg = Config::default();
        let base = Path::new("/srv/spendbook");
        assert_eq!(cfg.resolve_data_file(base), base.join("expenses.json"));

        cfg.set_value("data_file", "archive/2025.json").unwrap();
        assert_eq!(cfg.resolve_data_file(base), base.join("archive/2025.json"));

        cfg.set_value("data_file", "default").unwrap();
        assert_eq!(cfg.data_file, None);
    }

    #[test]
    fn set_value_validates_input() {
        let mut cfg = Config::default();
        cfg.set_value("currency", "eur").unwrap();
        assert_eq!(cfg.currency, "EUR");
        assert!(cfg.set_value("currency", "euro").is_err());
        assert!(cfg.set_value("ui_color_enabled", "maybe").is_err());
        cfg.set_value("ui_color_enabled", "off").unwrap();
        assert!(!cfg.ui_color_enabled);
        assert!(matches!(
            cfg.set_value("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("locale", "en-GB"),
            Err(ConfigError::UnknownKey(_))
        ));
    }
}
