//! Domain model for a concrete dosing schedule slot.
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::medication::FrequencyType;

/// One time-of-day slot derived from a medication's frequency.
///
/// Schedules are only created through the generator → persist pipeline in
/// `MedicationService::create_medication`; clients never insert them
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationSchedule {
    pub id: String,
    pub medication_id: String,
    pub frequency: FrequencyType,
    pub time_of_day: NaiveTime,
    /// Comma-joined weekday names, or a single day-of-month digit for
    /// Monthly schedules
    pub days_of_week: String,
    /// 0 when the frequency has no hour interval
    pub custom_frequency_hours: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicationSchedule {
    pub fn generate_id() -> String {
        format!("schedule::{}", Uuid::new_v4())
    }
}

/// All seven weekday names, the day pattern for daily frequencies.
pub const ALL_DAYS: &str = "Monday,Tuesday,Wednesday,Thursday,Friday,Saturday,Sunday";
