//! # CSV Schedule Repository
//!
//! File-based schedule storage in `schedules.csv`. Time of day is stored as
//! `HH:MM:SS`; the day pattern is a comma-joined weekday list (or a single
//! day-of-month digit for monthly schedules).

use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::medication::FrequencyType;
use crate::domain::models::schedule::MedicationSchedule;
use crate::storage::traits::ScheduleStorage;

const SCHEDULES_FILE: &str = "schedules.csv";

/// CSV record structure for schedules
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleRecord {
    id: String,
    medication_id: String,
    frequency: String,
    time_of_day: String,
    days_of_week: String,
    custom_frequency_hours: u32,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl From<MedicationSchedule> for ScheduleRecord {
    fn from(schedule: MedicationSchedule) -> Self {
        ScheduleRecord {
            id: schedule.id,
            medication_id: schedule.medication_id,
            frequency: schedule.frequency.as_str().to_string(),
            time_of_day: schedule.time_of_day.format("%H:%M:%S").to_string(),
            days_of_week: schedule.days_of_week,
            custom_frequency_hours: schedule.custom_frequency_hours,
            is_active: schedule.is_active,
            created_at: schedule.created_at.to_rfc3339(),
            updated_at: schedule.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ScheduleRecord> for MedicationSchedule {
    type Error = anyhow::Error;

    fn try_from(record: ScheduleRecord) -> Result<Self> {
        let frequency = FrequencyType::from_string(&record.frequency)
            .map_err(|e| anyhow::anyhow!("Failed to parse frequency: {}", e))?;
        let time_of_day = NaiveTime::parse_from_str(&record.time_of_day, "%H:%M:%S")
            .map_err(|e| anyhow::anyhow!("Failed to parse time_of_day: {}", e))?;

        Ok(MedicationSchedule {
            id: record.id,
            medication_id: record.medication_id,
            frequency,
            time_of_day,
            days_of_week: record.days_of_week,
            custom_frequency_hours: record.custom_frequency_hours,
            is_active: record.is_active,
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp: {}", e))?
        .with_timezone(&Utc))
}

/// CSV-based schedule repository
#[derive(Clone)]
pub struct ScheduleRepository {
    connection: CsvConnection,
}

impl ScheduleRepository {
    /// Create a new CSV schedule repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_schedules(&self) -> Result<Vec<MedicationSchedule>> {
        let file_path = self.connection.file_path(SCHEDULES_FILE);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut schedules = Vec::new();
        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            schedules.push(MedicationSchedule::try_from(record)?);
        }
        Ok(schedules)
    }

    fn write_schedules(&self, schedules: &[MedicationSchedule]) -> Result<()> {
        let file_path = self.connection.file_path(SCHEDULES_FILE);
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for schedule in schedules {
                csv_writer.serialize(ScheduleRecord::from(schedule.clone()))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl ScheduleStorage for ScheduleRepository {
    fn store_schedule(&self, schedule: &MedicationSchedule) -> Result<()> {
        let mut schedules = self.read_schedules()?;
        schedules.push(schedule.clone());
        self.write_schedules(&schedules)
    }

    fn get_schedule(&self, schedule_id: &str) -> Result<Option<MedicationSchedule>> {
        let schedules = self.read_schedules()?;
        Ok(schedules.into_iter().find(|s| s.id == schedule_id))
    }

    fn list_active_schedules(&self) -> Result<Vec<MedicationSchedule>> {
        let mut schedules: Vec<MedicationSchedule> = self
            .read_schedules()?
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        schedules.sort_by_key(|s| s.time_of_day);
        Ok(schedules)
    }

    fn list_schedules_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<MedicationSchedule>> {
        let mut schedules: Vec<MedicationSchedule> = self
            .read_schedules()?
            .into_iter()
            .filter(|s| s.medication_id == medication_id)
            .collect();
        schedules.sort_by_key(|s| s.time_of_day);
        Ok(schedules)
    }

    fn list_schedules_by_frequency(
        &self,
        frequency: FrequencyType,
    ) -> Result<Vec<MedicationSchedule>> {
        let mut schedules: Vec<MedicationSchedule> = self
            .read_schedules()?
            .into_iter()
            .filter(|s| s.frequency == frequency)
            .collect();
        schedules.sort_by_key(|s| s.time_of_day);
        Ok(schedules)
    }

    fn list_schedules_in_window(
        &self,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<MedicationSchedule>> {
        let mut schedules: Vec<MedicationSchedule> = self
            .read_schedules()?
            .into_iter()
            .filter(|s| s.is_active && s.time_of_day >= start && s.time_of_day < end)
            .collect();
        schedules.sort_by_key(|s| s.time_of_day);
        Ok(schedules)
    }

    fn update_schedule(&self, schedule: &MedicationSchedule) -> Result<()> {
        let mut schedules = self.read_schedules()?;
        let position = schedules
            .iter()
            .position(|s| s.id == schedule.id)
            .ok_or_else(|| anyhow::anyhow!("Schedule not found: {}", schedule.id))?;
        schedules[position] = schedule.clone();
        self.write_schedules(&schedules)
    }

    fn delete_schedule(&self, schedule_id: &str) -> Result<bool> {
        let mut schedules = self.read_schedules()?;
        let before = schedules.len();
        schedules.retain(|s| s.id != schedule_id);
        let deleted = schedules.len() < before;
        if deleted {
            self.write_schedules(&schedules)?;
        }
        Ok(deleted)
    }

    fn delete_schedules_by_medication(&self, medication_id: &str) -> Result<u32> {
        let mut schedules = self.read_schedules()?;
        let before = schedules.len();
        schedules.retain(|s| s.medication_id != medication_id);
        let deleted = (before - schedules.len()) as u32;
        if deleted > 0 {
            self.write_schedules(&schedules)?;
        }
        Ok(deleted)
    }
}
