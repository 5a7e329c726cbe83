use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown calculator '{0}' (expected basic, loan, interest or mortgage)")]
pub struct TabParseError(pub String);

/// The four calculators, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorTab {
    #[default]
    Basic,
    Loan,
    Interest,
    Mortgage,
}

impl CalculatorTab {
    pub fn all() -> &'static [CalculatorTab] {
        &[
            CalculatorTab::Basic,
            CalculatorTab::Loan,
            CalculatorTab::Interest,
            CalculatorTab::Mortgage,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Loan => "loan",
            Self::Interest => "interest",
            Self::Mortgage => "mortgage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic Calculator",
            Self::Loan => "Loan Calculator",
            Self::Interest => "Compound Interest Calculator",
            Self::Mortgage => "Mortgage Calculator",
        }
    }
}

impl FromStr for CalculatorTab {
    type Err = TabParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| TabParseError(s.to_string()))
    }
}

impl fmt::Display for CalculatorTab {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
