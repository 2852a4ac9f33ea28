//! Domain model for a single expected dose occurrence.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One concrete occurrence of a schedule slot for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDose {
    pub id: String,
    pub medication_id: String,
    pub owner_id: String,
    pub scheduled_time: DateTime<Utc>,
    pub is_taken: bool,
    /// Derived: true iff not taken and the scheduled time has passed.
    /// Recomputed lazily on read/update, never swept by a background task.
    pub is_missed: bool,
    pub taken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MedicationDose {
    pub fn generate_id() -> String {
        format!("dose::{}", Uuid::new_v4())
    }

    /// Recompute the derived missed flag against `now`.
    pub fn evaluate_missed(&mut self, now: DateTime<Utc>) {
        self.is_missed = !self.is_taken && self.scheduled_time < now;
    }
}
