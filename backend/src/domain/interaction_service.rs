//! Drug interaction checking domain logic.
//!
//! Matching is exact case-insensitive equality between a record's
//! interacting drug name and the name/generic name of another medication in
//! the checked set. Brand-name vs generic-name mismatches and partial
//! variants are not resolved, so inconsistent source naming can produce
//! false negatives. This mirrors the reference data we ingest and is a
//! documented precision limit, not something this service papers over.

use anyhow::Result;
use chrono::Utc;
use log::info;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::commands::interaction::RecordInteractionCommand;
use crate::domain::models::interaction::DrugInteraction;
use crate::storage::csv::{CsvConnection, InteractionRepository, MedicationRepository};
use crate::storage::traits::{InteractionStorage, MedicationStorage};

/// Service answering "do these medications interact?"
#[derive(Clone)]
pub struct InteractionService {
    interaction_repository: InteractionRepository,
    medication_repository: MedicationRepository,
}

impl InteractionService {
    /// Create a new InteractionService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let interaction_repository = InteractionRepository::new((*connection).clone());
        let medication_repository = MedicationRepository::new((*connection).clone());
        Self {
            interaction_repository,
            medication_repository,
        }
    }

    /// Record a known interaction against a medication
    pub fn record_interaction(
        &self,
        command: RecordInteractionCommand,
    ) -> Result<DrugInteraction> {
        let interaction = DrugInteraction {
            id: DrugInteraction::generate_id(),
            medication_id: command.medication_id,
            interacting_drug_name: command.interacting_drug_name,
            severity: command.severity,
            description: command.description,
            detected_at: Utc::now(),
            is_acknowledged: false,
        };
        self.interaction_repository.store_interaction(&interaction)?;
        Ok(interaction)
    }

    /// Interaction records attached to a medication
    pub fn get_interactions_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<DrugInteraction>> {
        self.interaction_repository
            .list_interactions_by_medication(medication_id)
    }

    /// Mark an interaction record as acknowledged by the user
    pub fn acknowledge_interaction(&self, interaction_id: &str) -> Result<DrugInteraction> {
        let mut interaction = self
            .interaction_repository
            .get_interaction(interaction_id)?
            .ok_or_else(|| anyhow::anyhow!("Interaction not found: {}", interaction_id))?;

        interaction.is_acknowledged = true;
        self.interaction_repository.update_interaction(&interaction)?;
        Ok(interaction)
    }

    /// Return every known interaction relevant to a set of concurrently
    /// active medications.
    ///
    /// The result is the union of two scans, de-duplicated by record id:
    /// 1. every record attached to any supplied id (the direct set), and
    /// 2. records whose interacting drug name equals the name or generic
    ///    name of *another* medication in the set (the cross set).
    ///
    /// Fewer than two ids yields an empty result, since interactions are
    /// inherently relational. Ids that don't resolve to a medication are
    /// skipped, not an error.
    pub fn check_interactions(
        &self,
        medication_ids: &[String],
    ) -> Result<Vec<DrugInteraction>> {
        if medication_ids.len() < 2 {
            return Ok(Vec::new());
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut results: Vec<DrugInteraction> = Vec::new();

        for interaction in self
            .interaction_repository
            .list_interactions_by_medications(medication_ids)?
        {
            if seen.insert(interaction.id.clone()) {
                results.push(interaction);
            }
        }

        let medications = self
            .medication_repository
            .list_medications_by_ids(medication_ids)?;

        for medication in &medications {
            for interaction in self
                .interaction_repository
                .list_interactions_by_medication(&medication.id)?
            {
                let matches_other = medications.iter().any(|other| {
                    other.id != medication.id
                        && (other
                            .name
                            .eq_ignore_ascii_case(&interaction.interacting_drug_name)
                            || other
                                .generic_name
                                .eq_ignore_ascii_case(&interaction.interacting_drug_name))
                });
                if matches_other && seen.insert(interaction.id.clone()) {
                    results.push(interaction);
                }
            }
        }

        info!(
            "Checked {} medication(s), found {} interaction(s)",
            medication_ids.len(),
            results.len()
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::medication::CreateMedicationCommand;
    use crate::domain::medication_service::MedicationService;
    use crate::domain::models::interaction::InteractionSeverity;
    use crate::domain::models::medication::DosageUnit;

    fn create_test_services() -> (InteractionService, MedicationService, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        let interaction_service = InteractionService::new(connection.clone());
        let medication_service = MedicationService::new(connection);
        (interaction_service, medication_service, temp_dir)
    }

    fn create_medication(
        medication_service: &MedicationService,
        name: &str,
        generic_name: &str,
    ) -> String {
        medication_service
            .create_medication(CreateMedicationCommand {
                owner_id: "user::test".to_string(),
                name: name.to_string(),
                generic_name: generic_name.to_string(),
                dosage: 100.0,
                dosage_unit: DosageUnit::Mg,
                frequency: None,
                custom_frequency_hours: None,
                days_of_week: None,
                monthly_day: None,
                start_date: None,
            })
            .unwrap()
            .medication
            .id
    }

    fn record(
        interaction_service: &InteractionService,
        medication_id: &str,
        interacting_drug_name: &str,
    ) -> DrugInteraction {
        interaction_service
            .record_interaction(RecordInteractionCommand {
                medication_id: medication_id.to_string(),
                interacting_drug_name: interacting_drug_name.to_string(),
                severity: InteractionSeverity::Major,
                description: "Increased bleeding risk".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_single_id_returns_empty() {
        let (interaction_service, medication_service, _temp_dir) = create_test_services();
        let aspirin = create_medication(&medication_service, "Aspirin", "acetylsalicylic acid");
        record(&interaction_service, &aspirin, "Warfarin");

        let results = interaction_service
            .check_interactions(&[aspirin])
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_cross_name_match_returned_exactly_once() {
        let (interaction_service, medication_service, _temp_dir) = create_test_services();
        let aspirin = create_medication(&medication_service, "Aspirin", "acetylsalicylic acid");
        let warfarin = create_medication(&medication_service, "Warfarin", "warfarin sodium");
        let recorded = record(&interaction_service, &aspirin, "warfarin");

        // Scanned as both a direct record and a cross match, returned once
        let results = interaction_service
            .check_interactions(&[aspirin, warfarin])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, recorded.id);
    }

    #[test]
    fn test_matches_generic_name_case_insensitively() {
        let (interaction_service, medication_service, _temp_dir) = create_test_services();
        let aspirin = create_medication(&medication_service, "Aspirin", "acetylsalicylic acid");
        let other = create_medication(&medication_service, "Coumadin", "Warfarin Sodium");
        let recorded = record(&interaction_service, &aspirin, "WARFARIN SODIUM");

        let results = interaction_service
            .check_interactions(&[aspirin, other])
            .unwrap();
        assert!(results.iter().any(|i| i.id == recorded.id));
    }

    #[test]
    fn test_direct_records_included_even_without_cross_match() {
        let (interaction_service, medication_service, _temp_dir) = create_test_services();
        let aspirin = create_medication(&medication_service, "Aspirin", "acetylsalicylic acid");
        let metformin = create_medication(&medication_service, "Metformin", "metformin");
        // Attached to aspirin but names a drug outside the checked set
        let recorded = record(&interaction_service, &aspirin, "Ibuprofen");

        let results = interaction_service
            .check_interactions(&[aspirin, metformin])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, recorded.id);
    }

    #[test]
    fn test_unresolvable_ids_are_skipped() {
        let (interaction_service, medication_service, _temp_dir) = create_test_services();
        let aspirin = create_medication(&medication_service, "Aspirin", "acetylsalicylic acid");
        let warfarin = create_medication(&medication_service, "Warfarin", "warfarin sodium");
        let recorded = record(&interaction_service, &aspirin, "Warfarin");

        let results = interaction_service
            .check_interactions(&[
                aspirin,
                warfarin,
                "medication::missing".to_string(),
            ])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, recorded.id);
    }

    #[test]
    fn test_acknowledge_interaction() {
        let (interaction_service, medication_service, _temp_dir) = create_test_services();
        let aspirin = create_medication(&medication_service, "Aspirin", "acetylsalicylic acid");
        let recorded = record(&interaction_service, &aspirin, "Warfarin");
        assert!(!recorded.is_acknowledged);

        let acknowledged = interaction_service
            .acknowledge_interaction(&recorded.id)
            .unwrap();
        assert!(acknowledged.is_acknowledged);
    }
}
