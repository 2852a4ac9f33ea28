//! Prescription lifecycle domain logic.
//!
//! Prescriptions are administrative records (issuer, pharmacy, expiry)
//! alongside a medication's dosing schedule. The expiring-soon query feeds
//! refill/expiry alerts to the notification layer; it does not drive the
//! reminder state machine.

use anyhow::Result;
use chrono::{Duration, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::prescription::{
    CreatePrescriptionCommand, ExpiringPrescription, UpdatePrescriptionCommand,
};
use crate::domain::models::prescription::{Prescription, PrescriptionStatus};
use crate::storage::csv::{CsvConnection, MedicationRepository, PrescriptionRepository};
use crate::storage::traits::{MedicationStorage, PrescriptionStorage};

/// Service for prescription records and expiry alerts
#[derive(Clone)]
pub struct PrescriptionService {
    prescription_repository: PrescriptionRepository,
    medication_repository: MedicationRepository,
}

impl PrescriptionService {
    /// Create a new PrescriptionService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let prescription_repository = PrescriptionRepository::new((*connection).clone());
        let medication_repository = MedicationRepository::new((*connection).clone());
        Self {
            prescription_repository,
            medication_repository,
        }
    }

    /// Create a prescription record in the Active state
    pub fn create_prescription(
        &self,
        command: CreatePrescriptionCommand,
    ) -> Result<Prescription> {
        let now = Utc::now();
        let prescription = Prescription {
            id: Prescription::generate_id(),
            medication_id: command.medication_id,
            prescription_number: command.prescription_number,
            prescriber_name: command.prescriber_name,
            prescriber_contact: command.prescriber_contact,
            pharmacy_name: command.pharmacy_name,
            pharmacy_contact: command.pharmacy_contact,
            issue_date: command.issue_date,
            expiry_date: command.expiry_date,
            status: PrescriptionStatus::Active,
            notes: command.notes,
            created_at: now,
            updated_at: now,
        };
        self.prescription_repository
            .store_prescription(&prescription)?;
        Ok(prescription)
    }

    /// Get a prescription by ID
    pub fn get_prescription(&self, prescription_id: &str) -> Result<Option<Prescription>> {
        self.prescription_repository.get_prescription(prescription_id)
    }

    /// Prescriptions attached to a medication
    pub fn get_prescriptions_by_medication(
        &self,
        medication_id: &str,
    ) -> Result<Vec<Prescription>> {
        self.prescription_repository
            .list_prescriptions_by_medication(medication_id)
    }

    /// Apply a patch to a prescription, refreshing updated_at
    pub fn update_prescription(
        &self,
        prescription_id: &str,
        command: UpdatePrescriptionCommand,
    ) -> Result<Prescription> {
        let mut prescription = self
            .prescription_repository
            .get_prescription(prescription_id)?
            .ok_or_else(|| anyhow::anyhow!("Prescription not found: {}", prescription_id))?;

        if let Some(number) = command.prescription_number {
            prescription.prescription_number = number;
        }
        if let Some(name) = command.prescriber_name {
            prescription.prescriber_name = name;
        }
        if let Some(contact) = command.prescriber_contact {
            prescription.prescriber_contact = contact;
        }
        if let Some(name) = command.pharmacy_name {
            prescription.pharmacy_name = name;
        }
        if let Some(contact) = command.pharmacy_contact {
            prescription.pharmacy_contact = contact;
        }
        if let Some(expiry_date) = command.expiry_date {
            prescription.expiry_date = expiry_date;
        }
        if let Some(status) = command.status {
            prescription.status = status;
        }
        if let Some(notes) = command.notes {
            prescription.notes = notes;
        }
        prescription.updated_at = Utc::now();

        self.prescription_repository
            .update_prescription(&prescription)?;
        Ok(prescription)
    }

    /// Permanently remove a prescription
    pub fn delete_prescription(&self, prescription_id: &str) -> Result<bool> {
        self.prescription_repository.delete_prescription(prescription_id)
    }

    /// Prescriptions expiring within the next `days` days, projected with
    /// their medication's name for display. A prescription whose medication
    /// no longer resolves keeps an empty display name rather than failing
    /// the whole query.
    pub fn get_expiring_soon(&self, days: i64) -> Result<Vec<ExpiringPrescription>> {
        let today = Utc::now().date_naive();
        let window_end = today + Duration::days(days);

        let mut expiring = Vec::new();
        for prescription in self.prescription_repository.list_prescriptions()? {
            if prescription.expiry_date < today || prescription.expiry_date > window_end {
                continue;
            }
            let medication_name = self
                .medication_repository
                .get_medication(&prescription.medication_id)?
                .map(|m| m.name)
                .unwrap_or_default();
            expiring.push(ExpiringPrescription {
                prescription,
                medication_name,
            });
        }

        info!(
            "Found {} prescription(s) expiring within {} day(s)",
            expiring.len(),
            days
        );
        Ok(expiring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::medication::CreateMedicationCommand;
    use crate::domain::medication_service::MedicationService;
    use crate::domain::models::medication::DosageUnit;

    fn create_test_services() -> (PrescriptionService, MedicationService, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        let prescription_service = PrescriptionService::new(connection.clone());
        let medication_service = MedicationService::new(connection);
        (prescription_service, medication_service, temp_dir)
    }

    fn create_medication(medication_service: &MedicationService, name: &str) -> String {
        medication_service
            .create_medication(CreateMedicationCommand {
                owner_id: "user::test".to_string(),
                name: name.to_string(),
                generic_name: name.to_lowercase(),
                dosage: 20.0,
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

    fn create_prescription(
        prescription_service: &PrescriptionService,
        medication_id: &str,
        expires_in_days: i64,
    ) -> Prescription {
        let today = Utc::now().date_naive();
        prescription_service
            .create_prescription(CreatePrescriptionCommand {
                medication_id: medication_id.to_string(),
                prescription_number: "RX-1001".to_string(),
                prescriber_name: "Dr. Osei".to_string(),
                prescriber_contact: "555-0101".to_string(),
                pharmacy_name: "Central Pharmacy".to_string(),
                pharmacy_contact: "555-0202".to_string(),
                issue_date: today - Duration::days(30),
                expiry_date: today + Duration::days(expires_in_days),
                notes: String::new(),
            })
            .unwrap()
    }

    #[test]
    fn test_expiring_soon_filters_the_window() {
        let (prescription_service, medication_service, _temp_dir) = create_test_services();
        let medication_id = create_medication(&medication_service, "Atorvastatin");

        let inside = create_prescription(&prescription_service, &medication_id, 5);
        create_prescription(&prescription_service, &medication_id, 60);
        // Already expired: outside [today, today + days]
        create_prescription(&prescription_service, &medication_id, -1);

        let expiring = prescription_service.get_expiring_soon(14).unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].prescription.id, inside.id);
        assert_eq!(expiring[0].medication_name, "Atorvastatin");
    }

    #[test]
    fn test_expiring_today_is_included() {
        let (prescription_service, medication_service, _temp_dir) = create_test_services();
        let medication_id = create_medication(&medication_service, "Atorvastatin");
        create_prescription(&prescription_service, &medication_id, 0);

        let expiring = prescription_service.get_expiring_soon(7).unwrap();
        assert_eq!(expiring.len(), 1);
    }

    #[test]
    fn test_expiring_soon_is_lenient_about_missing_medication() {
        let (prescription_service, _medication_service, _temp_dir) = create_test_services();
        create_prescription(&prescription_service, "medication::missing", 3);

        let expiring = prescription_service.get_expiring_soon(7).unwrap();
        assert_eq!(expiring.len(), 1);
        assert!(expiring[0].medication_name.is_empty());
    }

    #[test]
    fn test_update_patches_fields_and_refreshes_timestamp() {
        let (prescription_service, medication_service, _temp_dir) = create_test_services();
        let medication_id = create_medication(&medication_service, "Atorvastatin");
        let prescription = create_prescription(&prescription_service, &medication_id, 30);

        let updated = prescription_service
            .update_prescription(
                &prescription.id,
                UpdatePrescriptionCommand {
                    status: Some(PrescriptionStatus::Cancelled),
                    notes: Some("Switched to new dosage".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, PrescriptionStatus::Cancelled);
        assert_eq!(updated.notes, "Switched to new dosage");
        assert_eq!(updated.prescription_number, prescription.prescription_number);
        assert!(updated.updated_at >= prescription.updated_at);
    }

    #[test]
    fn test_get_missing_prescription_returns_none() {
        let (prescription_service, _medication_service, _temp_dir) = create_test_services();
        assert!(prescription_service
            .get_prescription("prescription::missing")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_prescription() {
        let (prescription_service, medication_service, _temp_dir) = create_test_services();
        let medication_id = create_medication(&medication_service, "Atorvastatin");
        let prescription = create_prescription(&prescription_service, &medication_id, 30);

        assert!(prescription_service.delete_prescription(&prescription.id).unwrap());
        assert!(!prescription_service.delete_prescription(&prescription.id).unwrap());
    }
}
