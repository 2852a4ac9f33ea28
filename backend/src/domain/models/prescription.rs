//! Domain model for a prescription record.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrescriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Expired => "expired",
            PrescriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "active" => Ok(PrescriptionStatus::Active),
            "expired" => Ok(PrescriptionStatus::Expired),
            "cancelled" => Ok(PrescriptionStatus::Cancelled),
            _ => Err(format!("Invalid prescription status: {}", s)),
        }
    }
}

/// Administrative record for a medication (issuer, pharmacy, expiry).
/// Feeds refill/expiry alerts; separate from the dosing schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub medication_id: String,
    pub prescription_number: String,
    pub prescriber_name: String,
    pub prescriber_contact: String,
    pub pharmacy_name: String,
    pub pharmacy_contact: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: PrescriptionStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prescription {
    pub fn generate_id() -> String {
        format!("prescription::{}", Uuid::new_v4())
    }
}
