//! Schedule service domain logic.
//!
//! Store-level operations over existing schedules. New schedules only come
//! out of `MedicationService::create_medication`; this service mutates and
//! queries what that pipeline produced.

use anyhow::Result;
use chrono::{NaiveTime, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::schedule::UpdateScheduleCommand;
use crate::domain::models::medication::FrequencyType;
use crate::domain::models::schedule::MedicationSchedule;
use crate::storage::csv::{CsvConnection, ScheduleRepository};
use crate::storage::traits::ScheduleStorage;

/// Service for schedule updates and domain queries
#[derive(Clone)]
pub struct ScheduleService {
    schedule_repository: ScheduleRepository,
}

impl ScheduleService {
    /// Create a new ScheduleService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let schedule_repository = ScheduleRepository::new((*connection).clone());
        Self {
            schedule_repository,
        }
    }

    /// Get a schedule by ID
    pub fn get_schedule(&self, schedule_id: &str) -> Result<Option<MedicationSchedule>> {
        self.schedule_repository.get_schedule(schedule_id)
    }

    /// List every active schedule
    pub fn get_active_schedules(&self) -> Result<Vec<MedicationSchedule>> {
        self.schedule_repository.list_active_schedules()
    }

    /// List schedules for a medication
    pub fn get_schedules_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<MedicationSchedule>> {
        self.schedule_repository
            .list_schedules_by_medication(medication_id)
    }

    /// List schedules with a specific frequency
    pub fn get_schedules_by_frequency(
        &self,
        frequency: FrequencyType,
    ) -> Result<Vec<MedicationSchedule>> {
        self.schedule_repository.list_schedules_by_frequency(frequency)
    }

    /// List active schedules whose time of day falls within [start, end)
    pub fn get_upcoming_schedules(
        &self,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<MedicationSchedule>> {
        self.schedule_repository.list_schedules_in_window(start, end)
    }

    /// Apply an update to a schedule, refreshing updated_at
    pub fn update_schedule(&self, command: UpdateScheduleCommand) -> Result<MedicationSchedule> {
        let mut schedule = self
            .schedule_repository
            .get_schedule(&command.schedule_id)?
            .ok_or_else(|| anyhow::anyhow!("Schedule not found: {}", command.schedule_id))?;

        if let Some(frequency) = command.frequency {
            schedule.frequency = frequency;
        }
        if let Some(time_of_day) = command.time_of_day {
            schedule.time_of_day = time_of_day;
        }
        if let Some(days_of_week) = command.days_of_week {
            schedule.days_of_week = days_of_week;
        }
        if let Some(hours) = command.custom_frequency_hours {
            schedule.custom_frequency_hours = hours;
        }
        if let Some(is_active) = command.is_active {
            schedule.is_active = is_active;
        }
        schedule.updated_at = Utc::now();

        self.schedule_repository.update_schedule(&schedule)?;
        info!("Updated schedule {}", schedule.id);
        Ok(schedule)
    }

    /// Permanently remove a schedule
    pub fn delete_schedule(&self, schedule_id: &str) -> Result<bool> {
        let deleted = self.schedule_repository.delete_schedule(schedule_id)?;
        if deleted {
            info!("Deleted schedule {}", schedule_id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::medication::CreateMedicationCommand;
    use crate::domain::medication_service::MedicationService;
    use crate::domain::models::medication::DosageUnit;

    fn create_test_services(
    ) -> (ScheduleService, MedicationService, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        let schedule_service = ScheduleService::new(connection.clone());
        let medication_service = MedicationService::new(connection);
        (schedule_service, medication_service, temp_dir)
    }

    fn create_medication(
        medication_service: &MedicationService,
        frequency: FrequencyType,
    ) -> (String, Vec<String>) {
        let result = medication_service
            .create_medication(CreateMedicationCommand {
                owner_id: "user::test".to_string(),
                name: "Metformin".to_string(),
                generic_name: "metformin".to_string(),
                dosage: 500.0,
                dosage_unit: DosageUnit::Mg,
                frequency: Some(frequency),
                custom_frequency_hours: None,
                days_of_week: None,
                monthly_day: None,
                start_date: None,
            })
            .unwrap();
        (result.medication.id, result.schedule_ids)
    }

    #[test]
    fn test_update_schedule_replaces_fields_and_refreshes_timestamp() {
        let (schedule_service, medication_service, _temp_dir) = create_test_services();
        let (_medication_id, schedule_ids) =
            create_medication(&medication_service, FrequencyType::OnceDaily);

        let before = schedule_service
            .get_schedule(&schedule_ids[0])
            .unwrap()
            .unwrap();

        let updated = schedule_service
            .update_schedule(UpdateScheduleCommand {
                schedule_id: schedule_ids[0].clone(),
                frequency: None,
                time_of_day: NaiveTime::from_hms_opt(7, 30, 0),
                days_of_week: None,
                custom_frequency_hours: None,
                is_active: Some(false),
            })
            .unwrap();

        assert_eq!(updated.time_of_day, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert!(!updated.is_active);
        assert!(updated.updated_at >= before.updated_at);
        // Untouched fields survive the update
        assert_eq!(updated.days_of_week, before.days_of_week);
    }

    #[test]
    fn test_query_by_frequency_and_window() {
        let (schedule_service, medication_service, _temp_dir) = create_test_services();
        create_medication(&medication_service, FrequencyType::TwiceDaily);
        create_medication(&medication_service, FrequencyType::Weekly);

        let twice_daily = schedule_service
            .get_schedules_by_frequency(FrequencyType::TwiceDaily)
            .unwrap();
        assert_eq!(twice_daily.len(), 2);

        // 09:00 slots fall in the morning window, the 21:00 slot does not
        let morning = schedule_service
            .get_upcoming_schedules(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(morning.len(), 2);
        assert!(morning
            .iter()
            .all(|s| s.time_of_day == NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
    }

    #[test]
    fn test_window_excludes_end_bound() {
        let (schedule_service, medication_service, _temp_dir) = create_test_services();
        create_medication(&medication_service, FrequencyType::OnceDaily);

        let window = schedule_service
            .get_upcoming_schedules(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            )
            .unwrap();
        assert!(window.is_empty());
    }

    #[test]
    fn test_delete_schedule_is_permanent() {
        let (schedule_service, medication_service, _temp_dir) = create_test_services();
        let (_medication_id, schedule_ids) =
            create_medication(&medication_service, FrequencyType::OnceDaily);

        assert!(schedule_service.delete_schedule(&schedule_ids[0]).unwrap());
        assert!(schedule_service
            .get_schedule(&schedule_ids[0])
            .unwrap()
            .is_none());
        // A second delete reports nothing was removed
        assert!(!schedule_service.delete_schedule(&schedule_ids[0]).unwrap());
    }
}
