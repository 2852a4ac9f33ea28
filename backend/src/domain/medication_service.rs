//! Medication service domain logic for the medication tracker.
//!
//! This is the "create medication" use case: it validates the frequency
//! parameters, persists the medication, runs the schedule generator, and
//! persists the generated schedules. The medication row and its schedules
//! are written as one logical transaction: a failure anywhere rolls back
//! every row written by the call.
//!
//! ## Business Rules
//!
//! - Custom/EveryFewHours frequencies require a positive hour interval
//! - A supplied weekly day list must be non-empty, a supplied monthly day
//!   must be in 1..=31; absent values fall back to the generator defaults
//!   ("Monday" / day 1)
//! - A medication created with a frequency owns at least one schedule
//! - Validation failures abort before anything is written

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;

use crate::domain::commands::medication::{CreateMedicationCommand, CreateMedicationResult};
use crate::domain::models::medication::{
    FrequencyType, Medication, MedicationStatus, MedicationValidationError,
};
use crate::domain::models::schedule::MedicationSchedule;
use crate::domain::schedule_generator::generate_schedule_specs;
use crate::storage::csv::{CsvConnection, MedicationRepository, ScheduleRepository};
use crate::storage::traits::{MedicationStorage, ScheduleStorage};

/// Service orchestrating medication creation and lifecycle
#[derive(Clone)]
pub struct MedicationService {
    medication_repository: MedicationRepository,
    schedule_repository: ScheduleRepository,
}

impl MedicationService {
    /// Create a new MedicationService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let medication_repository = MedicationRepository::new((*connection).clone());
        let schedule_repository = ScheduleRepository::new((*connection).clone());
        Self {
            medication_repository,
            schedule_repository,
        }
    }

    /// Validate the frequency-specific parameters of a create command.
    ///
    /// Absent weekly/monthly values are allowed (the generator fills in the
    /// defaults); supplied-but-invalid values fail here, before any write.
    fn validate_frequency_parameters(
        command: &CreateMedicationCommand,
    ) -> Result<(), MedicationValidationError> {
        let Some(frequency) = command.frequency else {
            return Ok(());
        };

        if frequency.requires_custom_hours() {
            match command.custom_frequency_hours {
                Some(hours) if hours > 0 => {}
                _ => return Err(MedicationValidationError::MissingCustomFrequencyHours),
            }
        }

        if frequency == FrequencyType::Weekly {
            if let Some(days) = &command.days_of_week {
                if days.trim().is_empty() {
                    return Err(MedicationValidationError::MissingDaysOfWeek);
                }
            }
        }

        if frequency == FrequencyType::Monthly {
            if let Some(day) = command.monthly_day {
                if !(1..=31).contains(&day) {
                    return Err(MedicationValidationError::InvalidMonthlyDay);
                }
            }
        }

        Ok(())
    }

    /// Create a medication and the schedules derived from its frequency.
    ///
    /// All-or-nothing across both aggregates: a storage failure after the
    /// medication row was written deletes that row and any schedules
    /// created so far before surfacing the error.
    pub fn create_medication(
        &self,
        command: CreateMedicationCommand,
    ) -> Result<CreateMedicationResult> {
        info!(
            "💊 Creating medication '{}' for owner {}",
            command.name, command.owner_id
        );

        Self::validate_frequency_parameters(&command)?;

        let now = Utc::now();
        let medication = Medication {
            id: Medication::generate_id(),
            owner_id: command.owner_id,
            name: command.name,
            generic_name: command.generic_name,
            dosage: command.dosage,
            dosage_unit: command.dosage_unit,
            frequency: command.frequency,
            custom_frequency_hours: command.custom_frequency_hours,
            days_of_week: command.days_of_week,
            monthly_day: command.monthly_day,
            status: MedicationStatus::Active,
            start_date: command.start_date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
            updated_at: now,
        };

        self.medication_repository.store_medication(&medication)?;

        let mut schedule_ids = Vec::new();
        if let Some(frequency) = medication.frequency {
            let specs = generate_schedule_specs(
                &medication.id,
                frequency,
                medication.custom_frequency_hours,
                medication.days_of_week.as_deref(),
                medication.monthly_day,
            );

            for spec in specs {
                let schedule = MedicationSchedule {
                    id: MedicationSchedule::generate_id(),
                    medication_id: spec.medication_id,
                    frequency: spec.frequency,
                    time_of_day: spec.time_of_day,
                    days_of_week: spec.days_of_week,
                    custom_frequency_hours: spec.custom_frequency_hours,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };

                if let Err(e) = self.schedule_repository.store_schedule(&schedule) {
                    error!(
                        "Failed to persist schedule for medication {}, rolling back: {}",
                        medication.id, e
                    );
                    self.roll_back_creation(&medication.id);
                    return Err(e);
                }
                schedule_ids.push(schedule.id);
            }
        }

        info!(
            "✅ Created medication {} with {} schedule(s)",
            medication.id,
            schedule_ids.len()
        );

        Ok(CreateMedicationResult {
            medication,
            schedule_ids,
        })
    }

    /// Best-effort compensation: remove everything this create call wrote
    fn roll_back_creation(&self, medication_id: &str) {
        if let Err(e) = self
            .schedule_repository
            .delete_schedules_by_medication(medication_id)
        {
            error!("Rollback failed deleting schedules for {}: {}", medication_id, e);
        }
        if let Err(e) = self.medication_repository.delete_medication(medication_id) {
            error!("Rollback failed deleting medication {}: {}", medication_id, e);
        }
    }

    /// Get a medication by ID; absent ids resolve to None, not an error
    pub fn get_medication(&self, medication_id: &str) -> Result<Option<Medication>> {
        self.medication_repository.get_medication(medication_id)
    }

    /// List all medications for an owner
    pub fn list_medications(&self, owner_id: &str) -> Result<Vec<Medication>> {
        self.medication_repository.list_medications(owner_id)
    }

    /// List an owner's active medications (the set interaction checks run
    /// against)
    pub fn list_active_medications(&self, owner_id: &str) -> Result<Vec<Medication>> {
        Ok(self
            .medication_repository
            .list_medications(owner_id)?
            .into_iter()
            .filter(|m| m.status == MedicationStatus::Active)
            .collect())
    }

    /// Discontinue a medication and deactivate its schedules
    pub fn discontinue_medication(&self, medication_id: &str) -> Result<Medication> {
        let mut medication = self
            .medication_repository
            .get_medication(medication_id)?
            .ok_or_else(|| anyhow::anyhow!("Medication not found: {}", medication_id))?;

        let now = Utc::now();
        medication.status = MedicationStatus::Discontinued;
        medication.updated_at = now;
        self.medication_repository.update_medication(&medication)?;

        for mut schedule in self
            .schedule_repository
            .list_schedules_by_medication(medication_id)?
        {
            if schedule.is_active {
                schedule.is_active = false;
                schedule.updated_at = now;
                self.schedule_repository.update_schedule(&schedule)?;
            }
        }

        info!("Discontinued medication {}", medication_id);
        Ok(medication)
    }

    /// Hard-delete a medication and its schedules
    pub fn delete_medication(&self, medication_id: &str) -> Result<bool> {
        let deleted_schedules = self
            .schedule_repository
            .delete_schedules_by_medication(medication_id)?;
        let deleted = self.medication_repository.delete_medication(medication_id)?;
        if deleted {
            info!(
                "Deleted medication {} and {} schedule(s)",
                medication_id, deleted_schedules
            );
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::medication::DosageUnit;
    use crate::domain::models::schedule::ALL_DAYS;
    use chrono::NaiveTime;

    fn create_test_service() -> (MedicationService, Arc<CsvConnection>, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        let service = MedicationService::new(connection.clone());
        (service, connection, temp_dir)
    }

    fn base_command(frequency: Option<FrequencyType>) -> CreateMedicationCommand {
        CreateMedicationCommand {
            owner_id: "user::test".to_string(),
            name: "Aspirin".to_string(),
            generic_name: "acetylsalicylic acid".to_string(),
            dosage: 81.0,
            dosage_unit: DosageUnit::Mg,
            frequency,
            custom_frequency_hours: None,
            days_of_week: None,
            monthly_day: None,
            start_date: None,
        }
    }

    fn schedule_times(service: &MedicationService, medication_id: &str) -> Vec<NaiveTime> {
        service
            .schedule_repository
            .list_schedules_by_medication(medication_id)
            .unwrap()
            .iter()
            .map(|s| s.time_of_day)
            .collect()
    }

    #[test]
    fn test_once_daily_creates_single_morning_schedule() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::OnceDaily)))
            .unwrap();

        assert_eq!(result.schedule_ids.len(), 1);
        assert_eq!(result.medication.status, MedicationStatus::Active);
        assert_eq!(
            schedule_times(&service, &result.medication.id),
            vec![NaiveTime::from_hms_opt(9, 0, 0).unwrap()]
        );
    }

    #[test]
    fn test_twice_daily_creates_morning_and_evening_schedules() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::TwiceDaily)))
            .unwrap();

        assert_eq!(result.schedule_ids.len(), 2);
        assert_eq!(
            schedule_times(&service, &result.medication.id),
            vec![
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            ]
        );
        let schedules = service
            .schedule_repository
            .list_schedules_by_medication(&result.medication.id)
            .unwrap();
        assert!(schedules.iter().all(|s| s.days_of_week == ALL_DAYS));
        assert!(schedules.iter().all(|s| s.is_active));
    }

    #[test]
    fn test_three_times_daily_slot_table() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::ThreeTimesDaily)))
            .unwrap();

        assert_eq!(result.schedule_ids.len(), 3);
        assert_eq!(
            schedule_times(&service, &result.medication.id),
            vec![
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_four_times_daily_slot_table() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::FourTimesDaily)))
            .unwrap();

        assert_eq!(result.schedule_ids.len(), 4);
        assert_eq!(
            schedule_times(&service, &result.medication.id),
            vec![
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_custom_without_hours_fails_validation_with_zero_rows() {
        let (service, _conn, _temp_dir) = create_test_service();
        let mut command = base_command(Some(FrequencyType::Custom));
        command.custom_frequency_hours = None;

        let err = service.create_medication(command).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MedicationValidationError>(),
            Some(&MedicationValidationError::MissingCustomFrequencyHours)
        );
        assert!(service.list_medications("user::test").unwrap().is_empty());
        assert!(service
            .schedule_repository
            .list_active_schedules()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_custom_with_zero_hours_fails_validation_with_zero_rows() {
        let (service, _conn, _temp_dir) = create_test_service();
        let mut command = base_command(Some(FrequencyType::Custom));
        command.custom_frequency_hours = Some(0);

        assert!(service.create_medication(command).is_err());
        assert!(service.list_medications("user::test").unwrap().is_empty());
        assert!(service
            .schedule_repository
            .list_active_schedules()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_every_few_hours_requires_positive_interval() {
        let (service, _conn, _temp_dir) = create_test_service();
        let mut command = base_command(Some(FrequencyType::EveryFewHours));
        command.custom_frequency_hours = Some(0);
        assert!(service.create_medication(command).is_err());

        let mut command = base_command(Some(FrequencyType::EveryFewHours));
        command.custom_frequency_hours = Some(6);
        let result = service.create_medication(command).unwrap();
        let schedules = service
            .schedule_repository
            .list_schedules_by_medication(&result.medication.id)
            .unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].custom_frequency_hours, 6);
    }

    #[test]
    fn test_weekly_without_days_defaults_to_monday() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::Weekly)))
            .unwrap();

        let schedules = service
            .schedule_repository
            .list_schedules_by_medication(&result.medication.id)
            .unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].days_of_week, "Monday");
    }

    #[test]
    fn test_weekly_with_empty_days_fails_validation() {
        let (service, _conn, _temp_dir) = create_test_service();
        let mut command = base_command(Some(FrequencyType::Weekly));
        command.days_of_week = Some("  ".to_string());

        let err = service.create_medication(command).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MedicationValidationError>(),
            Some(&MedicationValidationError::MissingDaysOfWeek)
        );
    }

    #[test]
    fn test_monthly_without_day_defaults_to_first() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::Monthly)))
            .unwrap();

        let schedules = service
            .schedule_repository
            .list_schedules_by_medication(&result.medication.id)
            .unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].days_of_week, "1");
    }

    #[test]
    fn test_monthly_with_out_of_range_day_fails_validation() {
        let (service, _conn, _temp_dir) = create_test_service();
        let mut command = base_command(Some(FrequencyType::Monthly));
        command.monthly_day = Some(32);

        let err = service.create_medication(command).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MedicationValidationError>(),
            Some(&MedicationValidationError::InvalidMonthlyDay)
        );
        assert!(service.list_medications("user::test").unwrap().is_empty());
    }

    #[test]
    fn test_medication_without_frequency_creates_no_schedules() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service.create_medication(base_command(None)).unwrap();

        assert!(result.schedule_ids.is_empty());
        assert!(service
            .get_medication(&result.medication.id)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_discontinue_deactivates_schedules() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::TwiceDaily)))
            .unwrap();

        let medication = service.discontinue_medication(&result.medication.id).unwrap();
        assert_eq!(medication.status, MedicationStatus::Discontinued);

        let schedules = service
            .schedule_repository
            .list_schedules_by_medication(&result.medication.id)
            .unwrap();
        assert!(schedules.iter().all(|s| !s.is_active));
        assert!(service
            .list_active_medications("user::test")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_cascades_to_schedules() {
        let (service, _conn, _temp_dir) = create_test_service();
        let result = service
            .create_medication(base_command(Some(FrequencyType::ThreeTimesDaily)))
            .unwrap();

        assert!(service.delete_medication(&result.medication.id).unwrap());
        assert!(service
            .get_medication(&result.medication.id)
            .unwrap()
            .is_none());
        assert!(service
            .schedule_repository
            .list_schedules_by_medication(&result.medication.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_get_missing_medication_returns_none() {
        let (service, _conn, _temp_dir) = create_test_service();
        assert!(service.get_medication("medication::missing").unwrap().is_none());
    }
}
