//! Domain model for a medication and its dosing frequency.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dosing cadence for a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyType {
    OnceDaily,
    TwiceDaily,
    ThreeTimesDaily,
    FourTimesDaily,
    EveryFewHours,
    AsNeeded,
    Custom,
    Weekly,
    Monthly,
}

impl FrequencyType {
    /// String form for CSV storage
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyType::OnceDaily => "once_daily",
            FrequencyType::TwiceDaily => "twice_daily",
            FrequencyType::ThreeTimesDaily => "three_times_daily",
            FrequencyType::FourTimesDaily => "four_times_daily",
            FrequencyType::EveryFewHours => "every_few_hours",
            FrequencyType::AsNeeded => "as_needed",
            FrequencyType::Custom => "custom",
            FrequencyType::Weekly => "weekly",
            FrequencyType::Monthly => "monthly",
        }
    }

    /// Parse from string for CSV loading
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "once_daily" => Ok(FrequencyType::OnceDaily),
            "twice_daily" => Ok(FrequencyType::TwiceDaily),
            "three_times_daily" => Ok(FrequencyType::ThreeTimesDaily),
            "four_times_daily" => Ok(FrequencyType::FourTimesDaily),
            "every_few_hours" => Ok(FrequencyType::EveryFewHours),
            "as_needed" => Ok(FrequencyType::AsNeeded),
            "custom" => Ok(FrequencyType::Custom),
            "weekly" => Ok(FrequencyType::Weekly),
            "monthly" => Ok(FrequencyType::Monthly),
            _ => Err(format!("Invalid frequency type: {}", s)),
        }
    }

    /// Whether this frequency needs a caller-supplied hour interval
    pub fn requires_custom_hours(&self) -> bool {
        matches!(self, FrequencyType::Custom | FrequencyType::EveryFewHours)
    }
}

/// Unit the dosage amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DosageUnit {
    Mg,
    G,
    Mcg,
    Ml,
    Tablet,
    Capsule,
    Drop,
    Unit,
}

impl DosageUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DosageUnit::Mg => "mg",
            DosageUnit::G => "g",
            DosageUnit::Mcg => "mcg",
            DosageUnit::Ml => "ml",
            DosageUnit::Tablet => "tablet",
            DosageUnit::Capsule => "capsule",
            DosageUnit::Drop => "drop",
            DosageUnit::Unit => "unit",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "mg" => Ok(DosageUnit::Mg),
            "g" => Ok(DosageUnit::G),
            "mcg" => Ok(DosageUnit::Mcg),
            "ml" => Ok(DosageUnit::Ml),
            "tablet" => Ok(DosageUnit::Tablet),
            "capsule" => Ok(DosageUnit::Capsule),
            "drop" => Ok(DosageUnit::Drop),
            "unit" => Ok(DosageUnit::Unit),
            _ => Err(format!("Invalid dosage unit: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicationStatus {
    Active,
    Discontinued,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Active => "active",
            MedicationStatus::Discontinued => "discontinued",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "active" => Ok(MedicationStatus::Active),
            "discontinued" => Ok(MedicationStatus::Discontinued),
            _ => Err(format!("Invalid medication status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    /// ID of the user this medication belongs to
    pub owner_id: String,
    pub name: String,
    pub generic_name: String,
    pub dosage: f64,
    pub dosage_unit: DosageUnit,
    pub frequency: Option<FrequencyType>,
    /// Hour interval for Custom/EveryFewHours frequencies
    pub custom_frequency_hours: Option<u32>,
    /// Comma-joined weekday names for Weekly frequency (e.g. "Monday,Thursday")
    pub days_of_week: Option<String>,
    /// Day of month (1-31) for Monthly frequency
    pub monthly_day: Option<u32>,
    pub status: MedicationStatus,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    pub fn generate_id() -> String {
        format!("medication::{}", Uuid::new_v4())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MedicationValidationError {
    #[error("Custom frequency requires a positive hour interval")]
    MissingCustomFrequencyHours,
    #[error("Weekly frequency requires at least one day of week")]
    MissingDaysOfWeek,
    #[error("Monthly frequency requires a day of month between 1 and 31")]
    InvalidMonthlyDay,
}
