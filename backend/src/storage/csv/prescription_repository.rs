//! CSV-based prescription storage in `prescriptions.csv`.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::prescription::{Prescription, PrescriptionStatus};
use crate::storage::traits::PrescriptionStorage;

const PRESCRIPTIONS_FILE: &str = "prescriptions.csv";

/// CSV record structure for prescriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrescriptionRecord {
    id: String,
    medication_id: String,
    prescription_number: String,
    prescriber_name: String,
    prescriber_contact: String,
    pharmacy_name: String,
    pharmacy_contact: String,
    issue_date: String,
    expiry_date: String,
    status: String,
    notes: String,
    created_at: String,
    updated_at: String,
}

impl From<Prescription> for PrescriptionRecord {
    fn from(prescription: Prescription) -> Self {
        PrescriptionRecord {
            id: prescription.id,
            medication_id: prescription.medication_id,
            prescription_number: prescription.prescription_number,
            prescriber_name: prescription.prescriber_name,
            prescriber_contact: prescription.prescriber_contact,
            pharmacy_name: prescription.pharmacy_name,
            pharmacy_contact: prescription.pharmacy_contact,
            issue_date: prescription.issue_date.format("%Y-%m-%d").to_string(),
            expiry_date: prescription.expiry_date.format("%Y-%m-%d").to_string(),
            status: prescription.status.as_str().to_string(),
            notes: prescription.notes,
            created_at: prescription.created_at.to_rfc3339(),
            updated_at: prescription.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<PrescriptionRecord> for Prescription {
    type Error = anyhow::Error;

    fn try_from(record: PrescriptionRecord) -> Result<Self> {
        let status = PrescriptionStatus::from_string(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse prescription status: {}", e))?;

        Ok(Prescription {
            id: record.id,
            medication_id: record.medication_id,
            prescription_number: record.prescription_number,
            prescriber_name: record.prescriber_name,
            prescriber_contact: record.prescriber_contact,
            pharmacy_name: record.pharmacy_name,
            pharmacy_contact: record.pharmacy_contact,
            issue_date: parse_date(&record.issue_date, "issue_date")?,
            expiry_date: parse_date(&record.expiry_date, "expiry_date")?,
            status,
            notes: record.notes,
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
        })
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", field, e))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp: {}", e))?
        .with_timezone(&Utc))
}

/// CSV-based prescription repository
#[derive(Clone)]
pub struct PrescriptionRepository {
    connection: CsvConnection,
}

impl PrescriptionRepository {
    /// Create a new CSV prescription repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_prescriptions(&self) -> Result<Vec<Prescription>> {
        let file_path = self.connection.file_path(PRESCRIPTIONS_FILE);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut prescriptions = Vec::new();
        for result in csv_reader.deserialize() {
            let record: PrescriptionRecord = result?;
            prescriptions.push(Prescription::try_from(record)?);
        }
        Ok(prescriptions)
    }

    fn write_prescriptions(&self, prescriptions: &[Prescription]) -> Result<()> {
        let file_path = self.connection.file_path(PRESCRIPTIONS_FILE);
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for prescription in prescriptions {
                csv_writer.serialize(PrescriptionRecord::from(prescription.clone()))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl PrescriptionStorage for PrescriptionRepository {
    fn store_prescription(&self, prescription: &Prescription) -> Result<()> {
        let mut prescriptions = self.read_prescriptions()?;
        prescriptions.push(prescription.clone());
        self.write_prescriptions(&prescriptions)
    }

    fn get_prescription(&self, prescription_id: &str) -> Result<Option<Prescription>> {
        let prescriptions = self.read_prescriptions()?;
        Ok(prescriptions.into_iter().find(|p| p.id == prescription_id))
    }

    fn list_prescriptions(&self) -> Result<Vec<Prescription>> {
        let mut prescriptions = self.read_prescriptions()?;
        prescriptions.sort_by_key(|p| p.expiry_date);
        Ok(prescriptions)
    }

    fn list_prescriptions_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<Prescription>> {
        let mut prescriptions: Vec<Prescription> = self
            .read_prescriptions()?
            .into_iter()
            .filter(|p| p.medication_id == medication_id)
            .collect();
        prescriptions.sort_by_key(|p| p.expiry_date);
        Ok(prescriptions)
    }

    fn update_prescription(&self, prescription: &Prescription) -> Result<()> {
        let mut prescriptions = self.read_prescriptions()?;
        let position = prescriptions
            .iter()
            .position(|p| p.id == prescription.id)
            .ok_or_else(|| anyhow::anyhow!("Prescription not found: {}", prescription.id))?;
        prescriptions[position] = prescription.clone();
        self.write_prescriptions(&prescriptions)
    }

    fn delete_prescription(&self, prescription_id: &str) -> Result<bool> {
        let mut prescriptions = self.read_prescriptions()?;
        let before = prescriptions.len();
        prescriptions.retain(|p| p.id != prescription_id);
        let deleted = prescriptions.len() < before;
        if deleted {
            self.write_prescriptions(&prescriptions)?;
        }
        Ok(deleted)
    }
}
