//! CSV-based reminder storage in `reminders.csv`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::reminder::{MedicationReminder, ReminderStatus};
use crate::storage::traits::ReminderStorage;

const REMINDERS_FILE: &str = "reminders.csv";

/// CSV record structure for reminders
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderRecord {
    id: String,
    medication_id: String,
    scheduled_time: String,
    status: String,
    snooze_count: u32,
    created_at: String,
}

impl From<MedicationReminder> for ReminderRecord {
    fn from(reminder: MedicationReminder) -> Self {
        ReminderRecord {
            id: reminder.id,
            medication_id: reminder.medication_id,
            scheduled_time: reminder.scheduled_time.to_rfc3339(),
            status: reminder.status.as_str().to_string(),
            snooze_count: reminder.snooze_count,
            created_at: reminder.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ReminderRecord> for MedicationReminder {
    type Error = anyhow::Error;

    fn try_from(record: ReminderRecord) -> Result<Self> {
        let status = ReminderStatus::from_string(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse reminder status: {}", e))?;

        Ok(MedicationReminder {
            id: record.id,
            medication_id: record.medication_id,
            scheduled_time: parse_timestamp(&record.scheduled_time)?,
            status,
            snooze_count: record.snooze_count,
            created_at: parse_timestamp(&record.created_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp: {}", e))?
        .with_timezone(&Utc))
}

/// CSV-based reminder repository
#[derive(Clone)]
pub struct ReminderRepository {
    connection: CsvConnection,
}

impl ReminderRepository {
    /// Create a new CSV reminder repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_reminders(&self) -> Result<Vec<MedicationReminder>> {
        let file_path = self.connection.file_path(REMINDERS_FILE);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut reminders = Vec::new();
        for result in csv_reader.deserialize() {
            let record: ReminderRecord = result?;
            reminders.push(MedicationReminder::try_from(record)?);
        }
        Ok(reminders)
    }

    fn write_reminders(&self, reminders: &[MedicationReminder]) -> Result<()> {
        let file_path = self.connection.file_path(REMINDERS_FILE);
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for reminder in reminders {
                csv_writer.serialize(ReminderRecord::from(reminder.clone()))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl ReminderStorage for ReminderRepository {
    fn store_reminder(&self, reminder: &MedicationReminder) -> Result<()> {
        let mut reminders = self.read_reminders()?;
        reminders.push(reminder.clone());
        self.write_reminders(&reminders)
    }

    fn get_reminder(&self, reminder_id: &str) -> Result<Option<MedicationReminder>> {
        let reminders = self.read_reminders()?;
        Ok(reminders.into_iter().find(|r| r.id == reminder_id))
    }

    fn list_reminders(&self) -> Result<Vec<MedicationReminder>> {
        let mut reminders = self.read_reminders()?;
        reminders.sort_by_key(|r| r.scheduled_time);
        Ok(reminders)
    }

    fn list_reminders_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<MedicationReminder>> {
        let mut reminders: Vec<MedicationReminder> = self
            .read_reminders()?
            .into_iter()
            .filter(|r| r.medication_id == medication_id)
            .collect();
        reminders.sort_by_key(|r| r.scheduled_time);
        Ok(reminders)
    }

    fn list_reminders_by_status(
        &self,
        status: ReminderStatus,
    ) -> Result<Vec<MedicationReminder>> {
        let mut reminders: Vec<MedicationReminder> = self
            .read_reminders()?
            .into_iter()
            .filter(|r| r.status == status)
            .collect();
        reminders.sort_by_key(|r| r.scheduled_time);
        Ok(reminders)
    }

    fn update_reminder(&self, reminder: &MedicationReminder) -> Result<()> {
        let mut reminders = self.read_reminders()?;
        let position = reminders
            .iter()
            .position(|r| r.id == reminder.id)
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", reminder.id))?;
        reminders[position] = reminder.clone();
        self.write_reminders(&reminders)
    }

    fn delete_reminder(&self, reminder_id: &str) -> Result<bool> {
        let mut reminders = self.read_reminders()?;
        let before = reminders.len();
        reminders.retain(|r| r.id != reminder_id);
        let deleted = reminders.len() < before;
        if deleted {
            self.write_reminders(&reminders)?;
        }
        Ok(deleted)
    }
}
