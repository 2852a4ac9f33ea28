//! CSV-based dose storage in `doses.csv`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::dose::MedicationDose;
use crate::storage::traits::DoseStorage;

const DOSES_FILE: &str = "doses.csv";

/// CSV record structure for doses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DoseRecord {
    id: String,
    medication_id: String,
    owner_id: String,
    scheduled_time: String,
    is_taken: bool,
    is_missed: bool,
    taken_at: Option<String>,
    created_at: String,
}

impl From<MedicationDose> for DoseRecord {
    fn from(dose: MedicationDose) -> Self {
        DoseRecord {
            id: dose.id,
            medication_id: dose.medication_id,
            owner_id: dose.owner_id,
            scheduled_time: dose.scheduled_time.to_rfc3339(),
            is_taken: dose.is_taken,
            is_missed: dose.is_missed,
            taken_at: dose.taken_at.map(|t| t.to_rfc3339()),
            created_at: dose.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<DoseRecord> for MedicationDose {
    type Error = anyhow::Error;

    fn try_from(record: DoseRecord) -> Result<Self> {
        Ok(MedicationDose {
            id: record.id,
            medication_id: record.medication_id,
            owner_id: record.owner_id,
            scheduled_time: parse_timestamp(&record.scheduled_time)?,
            is_taken: record.is_taken,
            is_missed: record.is_missed,
            taken_at: record
                .taken_at
                .filter(|t| !t.is_empty())
                .map(|t| parse_timestamp(&t))
                .transpose()?,
            created_at: parse_timestamp(&record.created_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp: {}", e))?
        .with_timezone(&Utc))
}

/// CSV-based dose repository
#[derive(Clone)]
pub struct DoseRepository {
    connection: CsvConnection,
}

impl DoseRepository {
    /// Create a new CSV dose repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_doses(&self) -> Result<Vec<MedicationDose>> {
        let file_path = self.connection.file_path(DOSES_FILE);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut doses = Vec::new();
        for result in csv_reader.deserialize() {
            let record: DoseRecord = result?;
            doses.push(MedicationDose::try_from(record)?);
        }
        Ok(doses)
    }

    fn write_doses(&self, doses: &[MedicationDose]) -> Result<()> {
        let file_path = self.connection.file_path(DOSES_FILE);
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for dose in doses {
                csv_writer.serialize(DoseRecord::from(dose.clone()))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl DoseStorage for DoseRepository {
    fn store_dose(&self, dose: &MedicationDose) -> Result<()> {
        let mut doses = self.read_doses()?;
        doses.push(dose.clone());
        self.write_doses(&doses)
    }

    fn get_dose(&self, dose_id: &str) -> Result<Option<MedicationDose>> {
        let doses = self.read_doses()?;
        Ok(doses.into_iter().find(|d| d.id == dose_id))
    }

    fn list_doses_by_owner(&self, owner_id: &str) -> Result<Vec<MedicationDose>> {
        let mut doses: Vec<MedicationDose> = self
            .read_doses()?
            .into_iter()
            .filter(|d| d.owner_id == owner_id)
            .collect();
        doses.sort_by_key(|d| d.scheduled_time);
        Ok(doses)
    }

    fn list_doses_by_medication(&self, medication_id: &str) -> Result<Vec<MedicationDose>> {
        let mut doses: Vec<MedicationDose> = self
            .read_doses()?
            .into_iter()
            .filter(|d| d.medication_id == medication_id)
            .collect();
        doses.sort_by_key(|d| d.scheduled_time);
        Ok(doses)
    }

    fn find_dose_at(
        &self,
        medication_id: &str,
        scheduled_time: DateTime<Utc>,
    ) -> Result<Option<MedicationDose>> {
        let doses = self.read_doses()?;
        Ok(doses
            .into_iter()
            .find(|d| d.medication_id == medication_id && d.scheduled_time == scheduled_time))
    }

    fn update_dose(&self, dose: &MedicationDose) -> Result<()> {
        let mut doses = self.read_doses()?;
        let position = doses
            .iter()
            .position(|d| d.id == dose.id)
            .ok_or_else(|| anyhow::anyhow!("Dose not found: {}", dose.id))?;
        doses[position] = dose.clone();
        self.write_doses(&doses)
    }
}
