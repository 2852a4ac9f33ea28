//! # Medication Tracker Backend
//!
//! Core library for tracking medication dosing over time: schedule
//! derivation from prescribed frequencies, taken/missed dose tracking, a
//! reminder notification state machine, drug interaction checks, and
//! prescription expiry alerts. The UI and notification layers consume this
//! library through the DTOs in the `shared` crate; all operations are
//! synchronous and run against file-backed storage behind the traits in
//! [`storage::traits`].

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod io;
pub mod storage;

pub use storage::csv::CsvConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub medication_service: domain::MedicationService,
    pub schedule_service: domain::ScheduleService,
    pub dose_service: domain::DoseService,
    pub reminder_service: domain::ReminderService,
    pub interaction_service: domain::InteractionService,
    pub prescription_service: domain::PrescriptionService,
}

impl Backend {
    /// Create a backend over the default data directory
    pub fn new() -> Result<Self> {
        let connection = Arc::new(CsvConnection::new_default()?);
        Ok(Self::with_connection(connection))
    }

    /// Create a backend over a specific data directory
    pub fn with_base_directory<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let connection = Arc::new(CsvConnection::new(base_directory)?);
        Ok(Self::with_connection(connection))
    }

    /// Create a backend over an existing connection
    pub fn with_connection(connection: Arc<CsvConnection>) -> Self {
        Self {
            medication_service: domain::MedicationService::new(connection.clone()),
            schedule_service: domain::ScheduleService::new(connection.clone()),
            dose_service: domain::DoseService::new(connection.clone()),
            reminder_service: domain::ReminderService::new(connection.clone()),
            interaction_service: domain::InteractionService::new(connection.clone()),
            prescription_service: domain::PrescriptionService::new(connection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::interaction::RecordInteractionCommand;
    use crate::domain::commands::medication::CreateMedicationCommand;
    use crate::domain::models::interaction::InteractionSeverity;
    use crate::domain::models::medication::{
        DosageUnit, FrequencyType, MedicationValidationError,
    };
    use crate::domain::models::schedule::ALL_DAYS;

    fn create_test_backend() -> (Backend, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let backend = Backend::with_base_directory(temp_dir.path()).unwrap();
        (backend, temp_dir)
    }

    fn medication_command(
        name: &str,
        generic_name: &str,
        frequency: Option<FrequencyType>,
    ) -> CreateMedicationCommand {
        CreateMedicationCommand {
            owner_id: "user::e2e".to_string(),
            name: name.to_string(),
            generic_name: generic_name.to_string(),
            dosage: 100.0,
            dosage_unit: DosageUnit::Mg,
            frequency,
            custom_frequency_hours: None,
            days_of_week: None,
            monthly_day: None,
            start_date: None,
        }
    }

    #[test]
    fn test_invalid_custom_frequency_leaves_zero_rows() {
        let (backend, _temp_dir) = create_test_backend();

        let mut command = medication_command("Painkiller", "ibuprofen", Some(FrequencyType::Custom));
        command.custom_frequency_hours = Some(0);

        let err = backend.medication_service.create_medication(command).unwrap_err();
        assert!(err.downcast_ref::<MedicationValidationError>().is_some());

        assert!(backend
            .medication_service
            .list_medications("user::e2e")
            .unwrap()
            .is_empty());
        assert!(backend
            .schedule_service
            .get_active_schedules()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_twice_daily_end_to_end() {
        let (backend, _temp_dir) = create_test_backend();

        let result = backend
            .medication_service
            .create_medication(medication_command(
                "Metformin",
                "metformin",
                Some(FrequencyType::TwiceDaily),
            ))
            .unwrap();

        assert_eq!(result.schedule_ids.len(), 2);
        let schedules = backend
            .schedule_service
            .get_schedules_by_medication(&result.medication.id)
            .unwrap();
        let times: Vec<String> = schedules
            .iter()
            .map(|s| s.time_of_day.format("%H:%M").to_string())
            .collect();
        assert_eq!(times, vec!["09:00", "21:00"]);
        assert!(schedules.iter().all(|s| s.days_of_week == ALL_DAYS));
    }

    #[test]
    fn test_aspirin_warfarin_interaction_returned_once() {
        let (backend, _temp_dir) = create_test_backend();

        let aspirin = backend
            .medication_service
            .create_medication(medication_command(
                "Aspirin",
                "acetylsalicylic acid",
                Some(FrequencyType::OnceDaily),
            ))
            .unwrap()
            .medication;
        let warfarin = backend
            .medication_service
            .create_medication(medication_command(
                "Warfarin",
                "warfarin sodium",
                Some(FrequencyType::OnceDaily),
            ))
            .unwrap()
            .medication;

        backend
            .interaction_service
            .record_interaction(RecordInteractionCommand {
                medication_id: aspirin.id.clone(),
                interacting_drug_name: "Warfarin".to_string(),
                severity: InteractionSeverity::Major,
                description: "Increased bleeding risk".to_string(),
            })
            .unwrap();

        let interactions = backend
            .interaction_service
            .check_interactions(&[aspirin.id, warfarin.id])
            .unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].interacting_drug_name, "Warfarin");
    }
}
