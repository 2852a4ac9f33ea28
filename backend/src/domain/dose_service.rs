//! Dose tracking domain logic.
//!
//! Doses are per-occurrence records of a schedule slot. The missed flag is
//! derived data: `is_missed = !is_taken && scheduled_time < now`, recomputed
//! on every read and update rather than swept by a background task, so
//! freshness is bounded by how often a client polls. Reads never write the
//! recomputed flag back; the next update persists it.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::dose::{CreateDoseCommand, UpdateDoseCommand};
use crate::domain::models::dose::MedicationDose;
use crate::domain::models::medication::{FrequencyType, MedicationStatus};
use crate::domain::models::schedule::MedicationSchedule;
use crate::storage::csv::{CsvConnection, DoseRepository, MedicationRepository, ScheduleRepository};
use crate::storage::traits::{DoseStorage, MedicationStorage, ScheduleStorage};

/// Service for dose occurrences and taken/missed tracking
#[derive(Clone)]
pub struct DoseService {
    dose_repository: DoseRepository,
    medication_repository: MedicationRepository,
    schedule_repository: ScheduleRepository,
}

impl DoseService {
    /// Create a new DoseService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let dose_repository = DoseRepository::new((*connection).clone());
        let medication_repository = MedicationRepository::new((*connection).clone());
        let schedule_repository = ScheduleRepository::new((*connection).clone());
        Self {
            dose_repository,
            medication_repository,
            schedule_repository,
        }
    }

    /// Insert a pending dose occurrence (not taken, not missed)
    pub fn create_dose(&self, command: CreateDoseCommand) -> Result<MedicationDose> {
        let dose = MedicationDose {
            id: MedicationDose::generate_id(),
            medication_id: command.medication_id,
            owner_id: command.owner_id,
            scheduled_time: command.scheduled_time,
            is_taken: false,
            is_missed: false,
            taken_at: None,
            created_at: Utc::now(),
        };
        self.dose_repository.store_dose(&dose)?;
        Ok(dose)
    }

    /// Get a dose by ID with its missed flag evaluated against the clock
    pub fn get_dose(&self, dose_id: &str) -> Result<Option<MedicationDose>> {
        let now = Utc::now();
        Ok(self.dose_repository.get_dose(dose_id)?.map(|mut dose| {
            dose.evaluate_missed(now);
            dose
        }))
    }

    /// Apply a patch to a dose. The missed flag is recomputed and persisted
    /// on every update, even when the patch itself changes nothing.
    pub fn update_dose(&self, dose_id: &str, command: UpdateDoseCommand) -> Result<MedicationDose> {
        let mut dose = self
            .dose_repository
            .get_dose(dose_id)?
            .ok_or_else(|| anyhow::anyhow!("Dose not found: {}", dose_id))?;

        if let Some(scheduled_time) = command.scheduled_time {
            dose.scheduled_time = scheduled_time;
        }
        if let Some(is_taken) = command.is_taken {
            dose.is_taken = is_taken;
            if is_taken && command.taken_at.is_none() && dose.taken_at.is_none() {
                dose.taken_at = Some(Utc::now());
            }
            if !is_taken {
                dose.taken_at = None;
            }
        }
        if let Some(taken_at) = command.taken_at {
            dose.taken_at = Some(taken_at);
        }

        dose.evaluate_missed(Utc::now());
        self.dose_repository.update_dose(&dose)?;
        Ok(dose)
    }

    /// Record that a dose was taken now
    pub fn mark_dose_taken(&self, dose_id: &str) -> Result<MedicationDose> {
        self.update_dose(
            dose_id,
            UpdateDoseCommand {
                is_taken: Some(true),
                taken_at: Some(Utc::now()),
                scheduled_time: None,
            },
        )
    }

    /// Doses scheduled today (UTC) for an owner
    pub fn get_today_doses(&self, owner_id: &str) -> Result<Vec<MedicationDose>> {
        let now = Utc::now();
        let today = now.date_naive();
        Ok(self
            .dose_repository
            .list_doses_by_owner(owner_id)?
            .into_iter()
            .filter(|d| d.scheduled_time.date_naive() == today)
            .map(|mut d| {
                d.evaluate_missed(now);
                d
            })
            .collect())
    }

    /// Doses an owner has missed: untaken and past their scheduled time
    pub fn get_missed_doses(&self, owner_id: &str) -> Result<Vec<MedicationDose>> {
        let now = Utc::now();
        Ok(self
            .dose_repository
            .list_doses_by_owner(owner_id)?
            .into_iter()
            .map(|mut d| {
                d.evaluate_missed(now);
                d
            })
            .filter(|d| d.is_missed)
            .collect())
    }

    /// All doses recorded for a medication
    pub fn get_doses_by_medication(&self, medication_id: &str) -> Result<Vec<MedicationDose>> {
        let now = Utc::now();
        Ok(self
            .dose_repository
            .list_doses_by_medication(medication_id)?
            .into_iter()
            .map(|mut d| {
                d.evaluate_missed(now);
                d
            })
            .collect())
    }

    /// Derive the dose occurrences due on `date` from the owner's active
    /// schedules, inserting any that don't exist yet. Returns the number of
    /// doses inserted. Safe to call repeatedly; existing occurrences are
    /// left untouched.
    pub fn generate_due_doses(&self, owner_id: &str, date: NaiveDate) -> Result<u32> {
        info!("📅 Generating due doses for {} on {}", owner_id, date);

        let medications = self
            .medication_repository
            .list_medications(owner_id)?
            .into_iter()
            .filter(|m| m.status == MedicationStatus::Active && m.frequency.is_some());

        let mut created = 0;
        for medication in medications {
            for schedule in self
                .schedule_repository
                .list_schedules_by_medication(&medication.id)?
            {
                if !schedule.is_active || !Self::slot_applies_on(&schedule, date) {
                    continue;
                }

                let scheduled_time = DateTime::<Utc>::from_naive_utc_and_offset(
                    date.and_time(schedule.time_of_day),
                    Utc,
                );
                if self
                    .dose_repository
                    .find_dose_at(&medication.id, scheduled_time)?
                    .is_some()
                {
                    continue;
                }

                self.create_dose(CreateDoseCommand {
                    medication_id: medication.id.clone(),
                    owner_id: owner_id.to_string(),
                    scheduled_time,
                })?;
                created += 1;
            }
        }

        info!("📅 Generated {} dose(s) for {}", created, owner_id);
        Ok(created)
    }

    /// Whether a schedule's day pattern covers the given date.
    /// Weekly patterns match the weekday name, monthly patterns the
    /// day-of-month; every other frequency applies daily.
    fn slot_applies_on(schedule: &MedicationSchedule, date: NaiveDate) -> bool {
        match schedule.frequency {
            FrequencyType::Weekly => {
                let weekday = date.format("%A").to_string();
                schedule
                    .days_of_week
                    .split(',')
                    .any(|day| day.trim().eq_ignore_ascii_case(&weekday))
            }
            FrequencyType::Monthly => schedule.days_of_week.trim() == date.day().to_string(),
            _ => true,
        }
    }
}
