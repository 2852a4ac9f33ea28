//! Reminder state machine domain logic.
//!
//! States: Scheduled → Sent/Missed/Snoozed → Acknowledged. There is no
//! background timer: overdue reminders are detected when a caller updates
//! or queries them (pull model), so staleness is bounded by the caller's
//! polling interval. Every update re-evaluates the status against the
//! clock, so callers must not assume an update only changes the fields they
//! patched. Concurrent writers are last-write-wins; there is no version
//! token on the row.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::reminder::{CreateReminderCommand, UpdateReminderCommand};
use crate::domain::models::reminder::{MedicationReminder, ReminderStatus};
use crate::storage::csv::{CsvConnection, ReminderRepository};
use crate::storage::traits::ReminderStorage;

/// Fixed deferral applied by a snooze action.
const SNOOZE_MINUTES: i64 = 10;

/// Service driving reminder state transitions and queries
#[derive(Clone)]
pub struct ReminderService {
    reminder_repository: ReminderRepository,
}

impl ReminderService {
    /// Create a new ReminderService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let reminder_repository = ReminderRepository::new((*connection).clone());
        Self {
            reminder_repository,
        }
    }

    /// Create a reminder in the initial Scheduled state
    pub fn create_reminder(&self, command: CreateReminderCommand) -> Result<MedicationReminder> {
        let reminder = MedicationReminder {
            id: MedicationReminder::generate_id(),
            medication_id: command.medication_id,
            scheduled_time: command.scheduled_time,
            status: ReminderStatus::Scheduled,
            snooze_count: 0,
            created_at: Utc::now(),
        };
        self.reminder_repository.store_reminder(&reminder)?;
        Ok(reminder)
    }

    /// Get a reminder by ID
    pub fn get_reminder(&self, reminder_id: &str) -> Result<Option<MedicationReminder>> {
        self.reminder_repository.get_reminder(reminder_id)
    }

    /// Apply a patch to a reminder, then re-evaluate its status against the
    /// clock: an overdue Scheduled reminder becomes Missed, a reminder whose
    /// time now lies in the future snaps back to Scheduled. Acknowledged is
    /// terminal and never re-evaluated.
    pub fn update_reminder(
        &self,
        reminder_id: &str,
        command: UpdateReminderCommand,
    ) -> Result<MedicationReminder> {
        let mut reminder = self
            .reminder_repository
            .get_reminder(reminder_id)?
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", reminder_id))?;

        if let Some(scheduled_time) = command.scheduled_time {
            reminder.scheduled_time = scheduled_time;
        }
        if let Some(status) = command.status {
            reminder.status = status;
        }

        if reminder.status != ReminderStatus::Acknowledged {
            let now = Utc::now();
            if reminder.status == ReminderStatus::Scheduled && reminder.scheduled_time < now {
                reminder.status = ReminderStatus::Missed;
            } else if reminder.scheduled_time > now {
                reminder.status = ReminderStatus::Scheduled;
            }
        }

        self.reminder_repository.update_reminder(&reminder)?;
        Ok(reminder)
    }

    /// Defer a reminder by ten minutes. Loops the reminder back to a
    /// pending state and counts the deferral; there is no upper bound on
    /// the snooze count.
    pub fn snooze_reminder(&self, reminder_id: &str) -> Result<MedicationReminder> {
        let mut reminder = self
            .reminder_repository
            .get_reminder(reminder_id)?
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", reminder_id))?;

        if reminder.status == ReminderStatus::Acknowledged {
            return Err(anyhow::anyhow!(
                "Reminder {} is already acknowledged",
                reminder_id
            ));
        }

        reminder.scheduled_time = Utc::now() + Duration::minutes(SNOOZE_MINUTES);
        reminder.status = ReminderStatus::Snoozed;
        reminder.snooze_count += 1;
        self.reminder_repository.update_reminder(&reminder)?;

        info!(
            "⏰ Snoozed reminder {} (count {})",
            reminder.id, reminder.snooze_count
        );
        Ok(reminder)
    }

    /// Explicit terminal transition: the user acted on the reminder
    pub fn acknowledge_reminder(&self, reminder_id: &str) -> Result<MedicationReminder> {
        let mut reminder = self
            .reminder_repository
            .get_reminder(reminder_id)?
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", reminder_id))?;

        reminder.status = ReminderStatus::Acknowledged;
        self.reminder_repository.update_reminder(&reminder)?;
        Ok(reminder)
    }

    /// Reminders due now and still awaiting user action
    pub fn get_pending_reminders(&self) -> Result<Vec<MedicationReminder>> {
        let now = Utc::now();
        Ok(self
            .reminder_repository
            .list_reminders()?
            .into_iter()
            .filter(|r| r.scheduled_time <= now && r.status.is_pending())
            .collect())
    }

    /// Unresolved reminders scheduled after now and before `before`
    pub fn get_upcoming_reminders(
        &self,
        before: DateTime<Utc>,
    ) -> Result<Vec<MedicationReminder>> {
        let now = Utc::now();
        Ok(self
            .reminder_repository
            .list_reminders()?
            .into_iter()
            .filter(|r| {
                r.scheduled_time > now && r.scheduled_time < before && r.status.is_pending()
            })
            .collect())
    }

    /// Missed reminders. Overdue Scheduled reminders are evaluated on the
    /// fly and reported as Missed; the flip is persisted by the next write
    /// to the row, not by this read.
    pub fn get_missed_reminders(&self) -> Result<Vec<MedicationReminder>> {
        let now = Utc::now();
        Ok(self
            .reminder_repository
            .list_reminders()?
            .into_iter()
            .filter_map(|mut r| match r.status {
                ReminderStatus::Missed => Some(r),
                ReminderStatus::Scheduled if r.scheduled_time < now => {
                    r.status = ReminderStatus::Missed;
                    Some(r)
                }
                _ => None,
            })
            .collect())
    }

    /// Permanently remove a reminder
    pub fn delete_reminder(&self, reminder_id: &str) -> Result<bool> {
        self.reminder_repository.delete_reminder(reminder_id)
    }

    /// Reminders attached to a medication
    pub fn get_reminders_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<MedicationReminder>> {
        self.reminder_repository
            .list_reminders_by_medication(medication_id)
    }

    /// Reminders currently stored with the given status
    pub fn get_reminders_by_status(
        &self,
        status: ReminderStatus,
    ) -> Result<Vec<MedicationReminder>> {
        self.reminder_repository.list_reminders_by_status(status)
    }
}
