use crate::error::Result;
use crate::period::validate_fiscal_year_end_month;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Shown in report headings. Empty means no organisation line.
    pub organization_name: String,
    pub currency_symbol: String,
    /// 1 = January ... 12 = December. Used by fiscal-year presets.
    pub fiscal_year_end_month: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization_name: String::new(),
            currency_symbol: "$".to_string(),
            fiscal_year_end_month: 12,
        }
    }
}

impl ReportConfig {
    pub fn new(organization_name: impl Into<String>) -> Self {
        Self {
            organization_name: organization_name.into(),
            ..Self::default()
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_fiscal_year_end_month(mut self, month: u32) -> Self {
        self.fiscal_year_end_month = month;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_fiscal_year_end_month(self.fiscal_year_end_month)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ReportConfig::from_json(r#"{ "organization_name": "Northside Builders" }"#)
            .unwrap();
        assert_eq!(config.organization_name, "Northside Builders");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.fiscal_year_end_month, 12);
    }

    #[test]
    fn test_invalid_fiscal_month_rejected() {
        let result = ReportConfig::from_json(r#"{ "fiscal_year_end_month": 13 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{ "currency_symbol": "€", "fiscal_year_end_month": 6 }"#)
            .unwrap();

        let config = ReportConfig::from_path(&path).unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.fiscal_year_end_month, 6);
    }
}
