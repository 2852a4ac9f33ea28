//! Domain model for a dose reminder and its notification state.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification state for a reminder.
///
/// Transitions: Scheduled is the initial state; an overdue Scheduled
/// reminder becomes Missed on the next evaluation; Snooze pushes the
/// scheduled time forward and loops back to a pending state; Acknowledged
/// is terminal and only ever set by explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Snoozed,
    Missed,
    Acknowledged,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Scheduled => "scheduled",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Snoozed => "snoozed",
            ReminderStatus::Missed => "missed",
            ReminderStatus::Acknowledged => "acknowledged",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(ReminderStatus::Scheduled),
            "sent" => Ok(ReminderStatus::Sent),
            "snoozed" => Ok(ReminderStatus::Snoozed),
            "missed" => Ok(ReminderStatus::Missed),
            "acknowledged" => Ok(ReminderStatus::Acknowledged),
            _ => Err(format!("Invalid reminder status: {}", s)),
        }
    }

    /// Pending states still await user action.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            ReminderStatus::Scheduled | ReminderStatus::Sent | ReminderStatus::Snoozed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationReminder {
    pub id: String,
    pub medication_id: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: ReminderStatus,
    pub snooze_count: u32,
    pub created_at: DateTime<Utc>,
}

impl MedicationReminder {
    pub fn generate_id() -> String {
        format!("reminder::{}", Uuid::new_v4())
    }
}
