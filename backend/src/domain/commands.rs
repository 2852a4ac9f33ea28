//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The mapper layer is responsible for
//! translating the public DTOs defined in the `shared` crate to these
//! internal types.

pub mod medication {
    use crate::domain::models::medication::{DosageUnit, FrequencyType, Medication};
    use chrono::NaiveDate;

    /// Input for creating a new medication.
    #[derive(Debug, Clone)]
    pub struct CreateMedicationCommand {
        pub owner_id: String,
        pub name: String,
        pub generic_name: String,
        pub dosage: f64,
        pub dosage_unit: DosageUnit,
        pub frequency: Option<FrequencyType>,
        pub custom_frequency_hours: Option<u32>,
        pub days_of_week: Option<String>,
        pub monthly_day: Option<u32>,
        /// Defaults to today when not provided
        pub start_date: Option<NaiveDate>,
    }

    /// Result of creating a medication, including the ids of the schedules
    /// generated for it.
    #[derive(Debug, Clone)]
    pub struct CreateMedicationResult {
        pub medication: Medication,
        pub schedule_ids: Vec<String>,
    }
}

pub mod schedule {
    use crate::domain::models::medication::FrequencyType;
    use chrono::NaiveTime;

    /// Input for updating an existing schedule. `None` fields are left
    /// unchanged.
    #[derive(Debug, Clone)]
    pub struct UpdateScheduleCommand {
        pub schedule_id: String,
        pub frequency: Option<FrequencyType>,
        pub time_of_day: Option<NaiveTime>,
        pub days_of_week: Option<String>,
        pub custom_frequency_hours: Option<u32>,
        pub is_active: Option<bool>,
    }
}

pub mod dose {
    use chrono::{DateTime, Utc};

    /// Input for inserting a pending dose occurrence.
    #[derive(Debug, Clone)]
    pub struct CreateDoseCommand {
        pub medication_id: String,
        pub owner_id: String,
        pub scheduled_time: DateTime<Utc>,
    }

    /// Input for updating a dose. `None` fields are left unchanged; the
    /// missed flag is always recomputed regardless of what was patched.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateDoseCommand {
        pub is_taken: Option<bool>,
        pub taken_at: Option<DateTime<Utc>>,
        pub scheduled_time: Option<DateTime<Utc>>,
    }
}

pub mod reminder {
    use crate::domain::models::reminder::ReminderStatus;
    use chrono::{DateTime, Utc};

    /// Input for creating a reminder. Status always starts as Scheduled.
    #[derive(Debug, Clone)]
    pub struct CreateReminderCommand {
        pub medication_id: String,
        pub scheduled_time: DateTime<Utc>,
    }

    /// Input for updating a reminder. After the patch is applied the status
    /// is re-evaluated against the clock, so callers must not assume the
    /// update only changes what they asked for.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateReminderCommand {
        pub scheduled_time: Option<DateTime<Utc>>,
        pub status: Option<ReminderStatus>,
    }
}

pub mod interaction {
    use crate::domain::models::interaction::InteractionSeverity;

    /// Input for recording a known interaction against a medication.
    #[derive(Debug, Clone)]
    pub struct RecordInteractionCommand {
        pub medication_id: String,
        pub interacting_drug_name: String,
        pub severity: InteractionSeverity,
        pub description: String,
    }
}

pub mod prescription {
    use crate::domain::models::prescription::{Prescription, PrescriptionStatus};
    use chrono::NaiveDate;

    /// Input for creating a prescription record.
    #[derive(Debug, Clone)]
    pub struct CreatePrescriptionCommand {
        pub medication_id: String,
        pub prescription_number: String,
        pub prescriber_name: String,
        pub prescriber_contact: String,
        pub pharmacy_name: String,
        pub pharmacy_contact: String,
        pub issue_date: NaiveDate,
        pub expiry_date: NaiveDate,
        pub notes: String,
    }

    /// Input for updating a prescription. `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdatePrescriptionCommand {
        pub prescription_number: Option<String>,
        pub prescriber_name: Option<String>,
        pub prescriber_contact: Option<String>,
        pub pharmacy_name: Option<String>,
        pub pharmacy_contact: Option<String>,
        pub expiry_date: Option<NaiveDate>,
        pub status: Option<PrescriptionStatus>,
        pub notes: Option<String>,
    }

    /// A prescription expiring soon, projected with its medication name
    /// for display.
    #[derive(Debug, Clone)]
    pub struct ExpiringPrescription {
        pub prescription: Prescription,
        pub medication_name: String,
    }
}
