//! Enumerated fields: sex, medication form, request status
//!
//! Each enum serialises to the exact lowercase string stored in the database
//! and rejects anything else at deserialisation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Patient sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(ValidationError::InvalidVariant {
                field: "sex",
                value: other.to_owned(),
            }),
        }
    }
}

/// Dosage form of a medication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationForm {
    Powder,
    Tablet,
    Capsule,
    Syrup,
}

impl MedicationForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Powder => "powder",
            Self::Tablet => "tablet",
            Self::Capsule => "capsule",
            Self::Syrup => "syrup",
        }
    }
}

impl FromStr for MedicationForm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "powder" => Ok(Self::Powder),
            "tablet" => Ok(Self::Tablet),
            "capsule" => Ok(Self::Capsule),
            "syrup" => Ok(Self::Syrup),
            other => Err(ValidationError::InvalidVariant {
                field: "form",
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle status of a medication request.
///
/// Any status may follow any other; no transition rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    #[default]
    Active,
    OnHold,
    Cancelled,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnHold => "on-hold",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Active, Self::OnHold, Self::Cancelled, Self::Completed]
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
