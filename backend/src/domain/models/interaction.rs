//! Domain model for a recorded drug interaction.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InteractionSeverity {
    Minor,
    Moderate,
    Major,
    Contraindicated,
}

impl InteractionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionSeverity::Minor => "minor",
            InteractionSeverity::Moderate => "moderate",
            InteractionSeverity::Major => "major",
            InteractionSeverity::Contraindicated => "contraindicated",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(InteractionSeverity::Minor),
            "moderate" => Ok(InteractionSeverity::Moderate),
            "major" => Ok(InteractionSeverity::Major),
            "contraindicated" => Ok(InteractionSeverity::Contraindicated),
            _ => Err(format!("Invalid interaction severity: {}", s)),
        }
    }
}

/// A recorded relationship between a medication and another drug name.
///
/// Reference data: attached to one medication and matched against the
/// user's other active medications at check time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugInteraction {
    pub id: String,
    /// The medication this record is attached to
    pub medication_id: String,
    /// Free-text name of the interacting drug
    pub interacting_drug_name: String,
    pub severity: InteractionSeverity,
    pub description: String,
    pub detected_at: DateTime<Utc>,
    pub is_acknowledged: bool,
}

impl DrugInteraction {
    pub fn generate_id() -> String {
        format!("interaction::{}", Uuid::new_v4())
    }
}
