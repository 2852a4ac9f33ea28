//! CSV-based drug interaction storage in `interactions.csv`.
//!
//! Interaction rows are reference data: written when an interaction is
//! recorded or acknowledged, and otherwise only joined against a user's
//! active medication set at check time.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::interaction::{DrugInteraction, InteractionSeverity};
use crate::storage::traits::InteractionStorage;

const INTERACTIONS_FILE: &str = "interactions.csv";

/// CSV record structure for interactions
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InteractionRecord {
    id: String,
    medication_id: String,
    interacting_drug_name: String,
    severity: String,
    description: String,
    detected_at: String,
    is_acknowledged: bool,
}

impl From<DrugInteraction> for InteractionRecord {
    fn from(interaction: DrugInteraction) -> Self {
        InteractionRecord {
            id: interaction.id,
            medication_id: interaction.medication_id,
            interacting_drug_name: interaction.interacting_drug_name,
            severity: interaction.severity.as_str().to_string(),
            description: interaction.description,
            detected_at: interaction.detected_at.to_rfc3339(),
            is_acknowledged: interaction.is_acknowledged,
        }
    }
}

impl TryFrom<InteractionRecord> for DrugInteraction {
    type Error = anyhow::Error;

    fn try_from(record: InteractionRecord) -> Result<Self> {
        let severity = InteractionSeverity::from_string(&record.severity)
            .map_err(|e| anyhow::anyhow!("Failed to parse severity: {}", e))?;

        Ok(DrugInteraction {
            id: record.id,
            medication_id: record.medication_id,
            interacting_drug_name: record.interacting_drug_name,
            severity,
            description: record.description,
            detected_at: DateTime::parse_from_rfc3339(&record.detected_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse detected_at: {}", e))?
                .with_timezone(&Utc),
            is_acknowledged: record.is_acknowledged,
        })
    }
}

/// CSV-based interaction repository
#[derive(Clone)]
pub struct InteractionRepository {
    connection: CsvConnection,
}

impl InteractionRepository {
    /// Create a new CSV interaction repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_interactions(&self) -> Result<Vec<DrugInteraction>> {
        let file_path = self.connection.file_path(INTERACTIONS_FILE);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut interactions = Vec::new();
        for result in csv_reader.deserialize() {
            let record: InteractionRecord = result?;
            interactions.push(DrugInteraction::try_from(record)?);
        }
        Ok(interactions)
    }

    fn write_interactions(&self, interactions: &[DrugInteraction]) -> Result<()> {
        let file_path = self.connection.file_path(INTERACTIONS_FILE);
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for interaction in interactions {
                csv_writer.serialize(InteractionRecord::from(interaction.clone()))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl InteractionStorage for InteractionRepository {
    fn store_interaction(&self, interaction: &DrugInteraction) -> Result<()> {
        let mut interactions = self.read_interactions()?;
        interactions.push(interaction.clone());
        self.write_interactions(&interactions)
    }

    fn get_interaction(&self, interaction_id: &str) -> Result<Option<DrugInteraction>> {
        let interactions = self.read_interactions()?;
        Ok(interactions.into_iter().find(|i| i.id == interaction_id))
    }

    fn list_interactions_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<DrugInteraction>> {
        Ok(self
            .read_interactions()?
            .into_iter()
            .filter(|i| i.medication_id == medication_id)
            .collect())
    }

    fn list_interactions_by_medications(
        &self,
        medication_ids: &[String],
    ) -> Result<Vec<DrugInteraction>> {
        Ok(self
            .read_interactions()?
            .into_iter()
            .filter(|i| medication_ids.contains(&i.medication_id))
            .collect())
    }

    fn update_interaction(&self, interaction: &DrugInteraction) -> Result<()> {
        let mut interactions = self.read_interactions()?;
        let position = interactions
            .iter()
            .position(|i| i.id == interaction.id)
            .ok_or_else(|| anyhow::anyhow!("Interaction not found: {}", interaction.id))?;
        interactions[position] = interaction.clone();
        self.write_interactions(&interactions)
    }
}
