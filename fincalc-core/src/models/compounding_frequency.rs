use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown compounding frequency '{0}' (expected annually, semi-annually, quarterly, monthly or daily)")]
pub struct FrequencyParseError(pub String);

/// How often interest is added to principal within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompoundingFrequency {
    #[default]
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn all() -> &'static [CompoundingFrequency] {
        &[
            CompoundingFrequency::Annually,
            CompoundingFrequency::SemiAnnually,
            CompoundingFrequency::Quarterly,
            CompoundingFrequency::Monthly,
            CompoundingFrequency::Daily,
        ]
    }

    /// Number of compounding periods per year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Annually => 1,
            Self::SemiAnnually => 2,
            Self::Quarterly => 4,
            Self::Monthly => 12,
            Self::Daily => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annually => "annually",
            Self::SemiAnnually => "semi-annually",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
            Self::Daily => "daily",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Annually => "Annually",
            Self::SemiAnnually => "Semi-Annually",
            Self::Quarterly => "Quarterly",
            Self::Monthly => "Monthly",
            Self::Daily => "Daily",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == normalized)
    }
}

impl FromStr for CompoundingFrequency {
    type Err = FrequencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FrequencyParseError(s.to_string()))
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
