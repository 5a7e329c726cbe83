//! Optional TOML configuration: logging settings and the starting inputs of
//! each calculator.
//!
//! Every section and key is optional; missing values fall back to the
//! calculators' own defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use fincalc_core::{InterestInputs, LoanInputs, MortgageEdit, MortgageInputs};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub loan: LoanInputs,
    pub interest: InterestInputs,
    pub mortgage: MortgageConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Append log records to this file.
    pub file: Option<PathBuf>,
    /// Write log records to stderr.
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            console: true,
        }
    }
}

/// Starting mortgage inputs. The down payment is given as a percentage and
/// the amount is derived from the home price.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MortgageConfig {
    pub home_price: f64,
    pub down_payment_percent: f64,
    pub term_years: f64,
    pub annual_rate_percent: f64,
    pub property_tax_percent: f64,
    pub annual_insurance: f64,
}

impl Default for MortgageConfig {
    fn default() -> Self {
        let inputs = MortgageInputs::default();
        Self {
            home_price: inputs.home_price,
            down_payment_percent: inputs.down_payment_percent,
            term_years: inputs.term_years,
            annual_rate_percent: inputs.annual_rate_percent,
            property_tax_percent: inputs.property_tax_percent,
            annual_insurance: inputs.annual_insurance,
        }
    }
}

impl MortgageConfig {
    pub fn to_inputs(&self) -> MortgageInputs {
        let mut inputs = MortgageInputs::default();
        for edit in [
            MortgageEdit::HomePrice(self.home_price),
            MortgageEdit::DownPaymentPercent(self.down_payment_percent),
            MortgageEdit::TermYears(self.term_years),
            MortgageEdit::AnnualRate(self.annual_rate_percent),
            MortgageEdit::PropertyTax(self.property_tax_percent),
            MortgageEdit::AnnualInsurance(self.annual_insurance),
        ] {
            inputs.apply(edit);
        }
        inputs
    }
}

impl Config {
    /// Reads and parses the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use fincalc_core::CompoundingFrequency;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_uses_calculator_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.loan, LoanInputs::default());
        assert_eq!(config.interest, InterestInputs::default());
        assert_eq!(config.mortgage.to_inputs(), MortgageInputs::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml(
            r#"
            [loan]
            principal = 250000.0

            [interest]
            frequency = "semi-annually"
            "#,
        )
        .unwrap();

        assert_eq!(config.loan.principal, 250000.0);
        assert_eq!(config.loan.annual_rate_percent, 5.5);
        assert_eq!(config.interest.frequency, CompoundingFrequency::SemiAnnually);
        assert_eq!(config.interest.principal, 10000.0);
    }

    #[test]
    fn mortgage_down_payment_is_derived_from_percent() {
        let config = Config::from_toml(
            r#"
            [mortgage]
            home_price = 400000.0
            down_payment_percent = 10.0
            "#,
        )
        .unwrap();
        let inputs = config.mortgage.to_inputs();

        assert_eq!(inputs.down_payment, 40000.0);
        assert_eq!(inputs.term_years, 30.0);
    }

    #[test]
    fn logging_section_is_read() {
        let config = Config::from_toml(
            r#"
            [logging]
            level = "debug"
            file = "fincalc.log"
            console = false
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("fincalc.log")));
        assert!(!config.logging.console);
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        let result = Config::from_toml(
            r#"
            [interest]
            frequency = "hourly"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/fincalc.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
