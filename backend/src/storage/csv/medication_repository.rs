//! # CSV Medication Repository
//!
//! File-based medication storage. All medications live in a single
//! `medications.csv` inside the data directory.
//!
//! ## CSV Format
//!
//! ```csv
//! id,owner_id,name,generic_name,dosage,dosage_unit,frequency,custom_frequency_hours,days_of_week,monthly_day,status,start_date,created_at,updated_at
//! medication::1f0c...,user::abc,Aspirin,acetylsalicylic acid,81.0,mg,once_daily,,,,active,2025-01-20,2025-01-20T10:00:00+00:00,2025-01-20T10:00:00+00:00
//! ```
//!
//! Optional fields are stored as empty cells, never as sentinel text.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::medication::{
    DosageUnit, FrequencyType, Medication, MedicationStatus,
};
use crate::storage::traits::MedicationStorage;

const MEDICATIONS_FILE: &str = "medications.csv";

/// CSV record structure for medications
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MedicationRecord {
    id: String,
    owner_id: String,
    name: String,
    generic_name: String,
    dosage: f64,
    dosage_unit: String,
    frequency: Option<String>,
    custom_frequency_hours: Option<u32>,
    days_of_week: Option<String>,
    monthly_day: Option<u32>,
    status: String,
    start_date: String,
    created_at: String,
    updated_at: String,
}

impl From<Medication> for MedicationRecord {
    fn from(medication: Medication) -> Self {
        MedicationRecord {
            id: medication.id,
            owner_id: medication.owner_id,
            name: medication.name,
            generic_name: medication.generic_name,
            dosage: medication.dosage,
            dosage_unit: medication.dosage_unit.as_str().to_string(),
            frequency: medication.frequency.map(|f| f.as_str().to_string()),
            custom_frequency_hours: medication.custom_frequency_hours,
            days_of_week: medication.days_of_week,
            monthly_day: medication.monthly_day,
            status: medication.status.as_str().to_string(),
            start_date: medication.start_date.format("%Y-%m-%d").to_string(),
            created_at: medication.created_at.to_rfc3339(),
            updated_at: medication.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<MedicationRecord> for Medication {
    type Error = anyhow::Error;

    fn try_from(record: MedicationRecord) -> Result<Self> {
        let dosage_unit = DosageUnit::from_string(&record.dosage_unit)
            .map_err(|e| anyhow::anyhow!("Failed to parse dosage unit: {}", e))?;
        let status = MedicationStatus::from_string(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse medication status: {}", e))?;
        let frequency = record
            .frequency
            .filter(|f| !f.is_empty())
            .map(|f| FrequencyType::from_string(&f))
            .transpose()
            .map_err(|e| anyhow::anyhow!("Failed to parse frequency: {}", e))?;

        Ok(Medication {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name,
            generic_name: record.generic_name,
            dosage: record.dosage,
            dosage_unit,
            frequency,
            custom_frequency_hours: record.custom_frequency_hours,
            days_of_week: record.days_of_week.filter(|d| !d.is_empty()),
            monthly_day: record.monthly_day,
            status,
            start_date: NaiveDate::parse_from_str(&record.start_date, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("Failed to parse start_date: {}", e))?,
            created_at: parse_timestamp(&record.created_at, "created_at")?,
            updated_at: parse_timestamp(&record.updated_at, "updated_at")?,
        })
    }
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", field, e))
}

/// CSV-based medication repository
#[derive(Clone)]
pub struct MedicationRepository {
    connection: CsvConnection,
}

impl MedicationRepository {
    /// Create a new CSV medication repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all medications from the CSV file
    fn read_medications(&self) -> Result<Vec<Medication>> {
        let file_path = self.connection.file_path(MEDICATIONS_FILE);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut medications = Vec::new();
        for result in csv_reader.deserialize() {
            let record: MedicationRecord = result?;
            medications.push(Medication::try_from(record)?);
        }
        Ok(medications)
    }

    /// Write all medications atomically (temp file + rename)
    fn write_medications(&self, medications: &[Medication]) -> Result<()> {
        let file_path = self.connection.file_path(MEDICATIONS_FILE);
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for medication in medications {
                csv_writer.serialize(MedicationRecord::from(medication.clone()))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl MedicationStorage for MedicationRepository {
    fn store_medication(&self, medication: &Medication) -> Result<()> {
        let mut medications = self.read_medications()?;
        medications.push(medication.clone());
        self.write_medications(&medications)
    }

    fn get_medication(&self, medication_id: &str) -> Result<Option<Medication>> {
        let medications = self.read_medications()?;
        Ok(medications.into_iter().find(|m| m.id == medication_id))
    }

    fn list_medications(&self, owner_id: &str) -> Result<Vec<Medication>> {
        let mut medications: Vec<Medication> = self
            .read_medications()?
            .into_iter()
            .filter(|m| m.owner_id == owner_id)
            .collect();
        medications.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(medications)
    }

    fn list_medications_by_ids(&self, medication_ids: &[String]) -> Result<Vec<Medication>> {
        let medications = self.read_medications()?;
        Ok(medication_ids
            .iter()
            .filter_map(|id| medications.iter().find(|m| &m.id == id).cloned())
            .collect())
    }

    fn update_medication(&self, medication: &Medication) -> Result<()> {
        let mut medications = self.read_medications()?;
        let position = medications
            .iter()
            .position(|m| m.id == medication.id)
            .ok_or_else(|| anyhow::anyhow!("Medication not found: {}", medication.id))?;
        medications[position] = medication.clone();
        self.write_medications(&medications)
    }

    fn delete_medication(&self, medication_id: &str) -> Result<bool> {
        let mut medications = self.read_medications()?;
        let before = medications.len();
        medications.retain(|m| m.id != medication_id);
        let deleted = medications.len() < before;
        if deleted {
            self.write_medications(&medications)?;
        }
        Ok(deleted)
    }
}
