//! Linker configuration
//!
//! Business-field defaults for records created on the caller's behalf,
//! loaded from YAML. Every section is optional.

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinkerConfig {
    #[serde(default)]
    pub opportunity_defaults: OpportunityDefaults,
    #[serde(default)]
    pub account_defaults: AccountDefaults,
}

/// Defaults for Opportunities created by upsert
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpportunityDefaults {
    /// Stage for new opportunities (e.g., "Prospecting")
    #[serde(default = "default_stage_name")]
    pub stage_name: String,
    /// Close date = creation day + this many days, within
    /// `MAX_CLOSE_DATE_OFFSET_DAYS` either way
    #[serde(default = "default_close_date_offset_days")]
    pub close_date_offset_days: i64,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Largest accepted `close_date_offset_days` magnitude (about 100 years)
pub const MAX_CLOSE_DATE_OFFSET_DAYS: i64 = 36_500;

fn default_stage_name() -> String {
    "Prospecting".to_string()
}

fn default_close_date_offset_days() -> i64 {
    30
}

impl Default for OpportunityDefaults {
    fn default() -> Self {
        Self {
            stage_name: default_stage_name(),
            close_date_offset_days: default_close_date_offset_days(),
            amount: None,
        }
    }
}

/// Defaults for Accounts auto-created while linking
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountDefaults {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl LinkerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: LinkerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot bound on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.opportunity_defaults.close_date_offset_days;
        if !(-MAX_CLOSE_DATE_OFFSET_DAYS..=MAX_CLOSE_DATE_OFFSET_DAYS).contains(&offset) {
            return Err(ConfigError::Invalid(format!(
                "opportunity_defaults.close_date_offset_days = {} exceeds {} days",
                offset, MAX_CLOSE_DATE_OFFSET_DAYS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
opportunity_defaults:
  stage_name: "Qualification"
  close_date_offset_days: 90
  amount: 2500.0

account_defaults:
  rating: "Warm"
  industry: "Technology"
"#;

        let config = LinkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.opportunity_defaults.stage_name, "Qualification");
        assert_eq!(config.opportunity_defaults.close_date_offset_days, 90);
        assert_eq!(config.opportunity_defaults.amount, Some(2500.0));
        assert_eq!(config.account_defaults.rating.as_deref(), Some("Warm"));
        assert_eq!(
            config.account_defaults.industry.as_deref(),
            Some("Technology")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
opportunity_defaults:
  amount: 100.0
"#;

        let config = LinkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.opportunity_defaults.stage_name, "Prospecting");
        assert_eq!(config.opportunity_defaults.close_date_offset_days, 30);
        assert!(config.account_defaults.rating.is_none());
    }

    #[test]
    fn test_out_of_range_close_date_offset() {
        let yaml = r#"
opportunity_defaults:
  close_date_offset_days: 1000000000
"#;

        let err = LinkerConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("close_date_offset_days"));

        let yaml = "opportunity_defaults:\n  close_date_offset_days: -36500\n";
        let config = LinkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.opportunity_defaults.close_date_offset_days, -36_500);
    }

    #[test]
    fn test_missing_file() {
        let err = LinkerConfig::from_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = LinkerConfig::from_yaml("opportunity_defaults: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
