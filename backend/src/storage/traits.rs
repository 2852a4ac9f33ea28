//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};

use crate::domain::models::dose::MedicationDose;
use crate::domain::models::interaction::DrugInteraction;
use crate::domain::models::medication::{FrequencyType, Medication};
use crate::domain::models::prescription::Prescription;
use crate::domain::models::reminder::{MedicationReminder, ReminderStatus};
use crate::domain::models::schedule::MedicationSchedule;

/// Trait defining the interface for medication storage operations
pub trait MedicationStorage: Send + Sync {
    /// Store a new medication
    fn store_medication(&self, medication: &Medication) -> Result<()>;

    /// Retrieve a specific medication by ID
    fn get_medication(&self, medication_id: &str) -> Result<Option<Medication>>;

    /// List all medications for an owner, ordered by name
    fn list_medications(&self, owner_id: &str) -> Result<Vec<Medication>>;

    /// Resolve a set of medication IDs; IDs that don't resolve are skipped
    fn list_medications_by_ids(&self, medication_ids: &[String]) -> Result<Vec<Medication>>;

    /// Update an existing medication
    fn update_medication(&self, medication: &Medication) -> Result<()>;

    /// Delete a medication by ID
    /// Returns true if the medication was found and deleted
    fn delete_medication(&self, medication_id: &str) -> Result<bool>;
}

/// Trait defining the interface for schedule storage operations
///
/// Schedules are only ever created through the generator → persist pipeline;
/// this trait exposes no way to bypass that.
pub trait ScheduleStorage: Send + Sync {
    /// Store a new schedule
    fn store_schedule(&self, schedule: &MedicationSchedule) -> Result<()>;

    /// Retrieve a specific schedule by ID
    fn get_schedule(&self, schedule_id: &str) -> Result<Option<MedicationSchedule>>;

    /// List all active schedules
    fn list_active_schedules(&self) -> Result<Vec<MedicationSchedule>>;

    /// List schedules for a specific medication
    fn list_schedules_by_medication(&self, medication_id: &str) -> Result<Vec<MedicationSchedule>>;

    /// List schedules with a specific frequency
    fn list_schedules_by_frequency(&self, frequency: FrequencyType)
        -> Result<Vec<MedicationSchedule>>;

    /// List active schedules whose time of day falls within [start, end)
    fn list_schedules_in_window(
        &self,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<MedicationSchedule>>;

    /// Update an existing schedule
    fn update_schedule(&self, schedule: &MedicationSchedule) -> Result<()>;

    /// Delete a single schedule
    /// Returns true if the schedule was found and deleted
    fn delete_schedule(&self, schedule_id: &str) -> Result<bool>;

    /// Delete all schedules owned by a medication
    /// Returns the number of schedules actually deleted
    fn delete_schedules_by_medication(&self, medication_id: &str) -> Result<u32>;
}

/// Trait defining the interface for dose storage operations
pub trait DoseStorage: Send + Sync {
    /// Store a new dose occurrence
    fn store_dose(&self, dose: &MedicationDose) -> Result<()>;

    /// Retrieve a specific dose by ID
    fn get_dose(&self, dose_id: &str) -> Result<Option<MedicationDose>>;

    /// List all doses for an owner, ordered by scheduled time
    fn list_doses_by_owner(&self, owner_id: &str) -> Result<Vec<MedicationDose>>;

    /// List all doses for a medication, ordered by scheduled time
    fn list_doses_by_medication(&self, medication_id: &str) -> Result<Vec<MedicationDose>>;

    /// Find the dose occurrence for a medication at an exact scheduled instant
    fn find_dose_at(
        &self,
        medication_id: &str,
        scheduled_time: DateTime<Utc>,
    ) -> Result<Option<MedicationDose>>;

    /// Update an existing dose
    fn update_dose(&self, dose: &MedicationDose) -> Result<()>;
}

/// Trait defining the interface for reminder storage operations
pub trait ReminderStorage: Send + Sync {
    /// Store a new reminder
    fn store_reminder(&self, reminder: &MedicationReminder) -> Result<()>;

    /// Retrieve a specific reminder by ID
    fn get_reminder(&self, reminder_id: &str) -> Result<Option<MedicationReminder>>;

    /// List all reminders, ordered by scheduled time
    fn list_reminders(&self) -> Result<Vec<MedicationReminder>>;

    /// List reminders for a specific medication
    fn list_reminders_by_medication(&self, medication_id: &str)
        -> Result<Vec<MedicationReminder>>;

    /// List reminders with a specific status
    fn list_reminders_by_status(&self, status: ReminderStatus)
        -> Result<Vec<MedicationReminder>>;

    /// Update an existing reminder
    fn update_reminder(&self, reminder: &MedicationReminder) -> Result<()>;

    /// Delete a reminder by ID
    /// Returns true if the reminder was found and deleted
    fn delete_reminder(&self, reminder_id: &str) -> Result<bool>;
}

/// Trait defining the interface for drug interaction storage operations
pub trait InteractionStorage: Send + Sync {
    /// Store a new interaction record
    fn store_interaction(&self, interaction: &DrugInteraction) -> Result<()>;

    /// Retrieve a specific interaction record by ID
    fn get_interaction(&self, interaction_id: &str) -> Result<Option<DrugInteraction>>;

    /// List interaction records attached to a medication
    fn list_interactions_by_medication(&self, medication_id: &str)
        -> Result<Vec<DrugInteraction>>;

    /// List interaction records attached to any of the given medications
    fn list_interactions_by_medications(
        &self,
        medication_ids: &[String],
    ) -> Result<Vec<DrugInteraction>>;

    /// Update an existing interaction record
    fn update_interaction(&self, interaction: &DrugInteraction) -> Result<()>;
}

/// Trait defining the interface for prescription storage operations
pub trait PrescriptionStorage: Send + Sync {
    /// Store a new prescription
    fn store_prescription(&self, prescription: &Prescription) -> Result<()>;

    /// Retrieve a specific prescription by ID
    fn get_prescription(&self, prescription_id: &str) -> Result<Option<Prescription>>;

    /// List all prescriptions
    fn list_prescriptions(&self) -> Result<Vec<Prescription>>;

    /// List prescriptions for a specific medication
    fn list_prescriptions_by_medication(&self, medication_id: &str)
        -> Result<Vec<Prescription>>;

    /// Update an existing prescription
    fn update_prescription(&self, prescription: &Prescription) -> Result<()>;

    /// Delete a prescription by ID
    /// Returns true if the prescription was found and deleted
    fn delete_prescription(&self, prescription_id: &str) -> Result<bool>;
}
