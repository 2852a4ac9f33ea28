//! Shared DTOs for the medication tracker.
//!
//! These are the types the UI and notification layers consume. Persisted
//! representation conventions: timestamps are RFC 3339 strings, time of day
//! is `HH:MM:SS`, day patterns are comma-joined weekday names (or a single
//! day-of-month digit for monthly schedules), and `custom_frequency_hours`
//! is `0` rather than null when a frequency has no hour interval.

use serde::{Deserialize, Serialize};

/// Dosing cadence for a medication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
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

/// Unit the dosage amount is expressed in
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicationStatus {
    Active,
    Discontinued,
}

/// Notification state of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Snoozed,
    Missed,
    Acknowledged,
}

/// Clinical severity of a drug interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionSeverity {
    Minor,
    Moderate,
    Major,
    Contraindicated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrescriptionStatus {
    Active,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMedicationRequest {
    pub owner_id: String,
    pub name: String,
    pub generic_name: String,
    pub dosage: f64,
    pub dosage_unit: DosageUnit,
    pub frequency: Option<Frequency>,
    /// Required (positive) when frequency is Custom or EveryFewHours
    pub custom_frequency_hours: Option<u32>,
    /// Comma-joined weekday names for Weekly frequency
    pub days_of_week: Option<String>,
    /// Day of month (1-31) for Monthly frequency
    pub monthly_day: Option<u32>,
    /// Start date (YYYY-MM-DD); defaults to today
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub generic_name: String,
    pub dosage: f64,
    pub dosage_unit: DosageUnit,
    pub frequency: Option<Frequency>,
    /// 0 when the frequency has no hour interval
    pub custom_frequency_hours: u32,
    pub days_of_week: Option<String>,
    pub monthly_day: Option<u32>,
    pub status: MedicationStatus,
    /// Start date (YYYY-MM-DD)
    pub start_date: String,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
    /// Ids of the schedules generated for this medication
    pub schedule_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: String,
    pub medication_id: String,
    pub frequency: Frequency,
    /// Time of day as HH:MM:SS
    pub time_of_day: String,
    /// Comma-joined weekday names, or the day-of-month digit for Monthly
    pub days_of_week: String,
    /// 0 when the frequency has no hour interval
    pub custom_frequency_hours: u32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub schedule_id: String,
    pub frequency: Option<Frequency>,
    /// Time of day as HH:MM:SS
    pub time_of_day: Option<String>,
    pub days_of_week: Option<String>,
    pub custom_frequency_hours: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseResponse {
    pub id: String,
    pub medication_id: String,
    pub owner_id: String,
    /// RFC 3339 timestamp of the expected intake
    pub scheduled_time: String,
    pub is_taken: bool,
    /// Derived: untaken and past the scheduled time
    pub is_missed: bool,
    pub taken_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDoseRequest {
    pub dose_id: String,
    pub is_taken: Option<bool>,
    pub taken_at: Option<String>,
    pub scheduled_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub medication_id: String,
    /// RFC 3339 timestamp the reminder should fire at
    pub scheduled_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReminderRequest {
    pub reminder_id: String,
    pub scheduled_time: Option<String>,
    pub status: Option<ReminderStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderResponse {
    pub id: String,
    pub medication_id: String,
    pub scheduled_time: String,
    pub status: ReminderStatus,
    pub snooze_count: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInteractionsRequest {
    /// Medication ids to cross-check; fewer than two yields no results
    pub medication_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub id: String,
    pub medication_id: String,
    pub interacting_drug_name: String,
    pub severity: InteractionSeverity,
    pub description: String,
    pub detected_at: String,
    pub is_acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub medication_id: String,
    pub prescription_number: String,
    pub prescriber_name: String,
    pub prescriber_contact: String,
    pub pharmacy_name: String,
    pub pharmacy_contact: String,
    /// YYYY-MM-DD
    pub issue_date: String,
    /// YYYY-MM-DD
    pub expiry_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionResponse {
    pub id: String,
    pub medication_id: String,
    /// Display name of the owning medication; empty when it no longer
    /// resolves
    pub medication_name: String,
    pub prescription_number: String,
    pub prescriber_name: String,
    pub prescriber_contact: String,
    pub pharmacy_name: String,
    pub pharmacy_contact: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub status: PrescriptionStatus,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringSoonRequest {
    /// Window size in days, counted from today
    pub days: i64,
}
