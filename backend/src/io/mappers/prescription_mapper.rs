use anyhow::Result;
use chrono::NaiveDate;
use shared::{CreatePrescriptionRequest, PrescriptionResponse};

use crate::domain::commands::prescription::{CreatePrescriptionCommand, ExpiringPrescription};
use crate::domain::models::prescription::{
    Prescription, PrescriptionStatus as DomainPrescriptionStatus,
};

pub struct PrescriptionMapper;

impl PrescriptionMapper {
    pub fn status_to_dto(domain: DomainPrescriptionStatus) -> shared::PrescriptionStatus {
        match domain {
            DomainPrescriptionStatus::Active => shared::PrescriptionStatus::Active,
            DomainPrescriptionStatus::Expired => shared::PrescriptionStatus::Expired,
            DomainPrescriptionStatus::Cancelled => shared::PrescriptionStatus::Cancelled,
        }
    }

    /// Convert a domain prescription to the response DTO. The medication
    /// name is supplied by the caller (empty when not projected).
    pub fn to_dto(prescription: Prescription, medication_name: String) -> PrescriptionResponse {
        PrescriptionResponse {
            id: prescription.id,
            medication_id: prescription.medication_id,
            medication_name,
            prescription_number: prescription.prescription_number,
            prescriber_name: prescription.prescriber_name,
            prescriber_contact: prescription.prescriber_contact,
            pharmacy_name: prescription.pharmacy_name,
            pharmacy_contact: prescription.pharmacy_contact,
            issue_date: prescription.issue_date.format("%Y-%m-%d").to_string(),
            expiry_date: prescription.expiry_date.format("%Y-%m-%d").to_string(),
            status: Self::status_to_dto(prescription.status),
            notes: prescription.notes,
            created_at: prescription.created_at.to_rfc3339(),
            updated_at: prescription.updated_at.to_rfc3339(),
        }
    }

    /// Convert expiring-soon projections to response DTOs
    pub fn to_expiring_dto_list(expiring: Vec<ExpiringPrescription>) -> Vec<PrescriptionResponse> {
        expiring
            .into_iter()
            .map(|e| Self::to_dto(e.prescription, e.medication_name))
            .collect()
    }

    /// Convert a create request into the internal command
    pub fn to_create_command(
        request: CreatePrescriptionRequest,
    ) -> Result<CreatePrescriptionCommand> {
        Ok(CreatePrescriptionCommand {
            medication_id: request.medication_id,
            prescription_number: request.prescription_number,
            prescriber_name: request.prescriber_name,
            prescriber_contact: request.prescriber_contact,
            pharmacy_name: request.pharmacy_name,
            pharmacy_contact: request.pharmacy_contact,
            issue_date: parse_date(&request.issue_date, "issue_date")?,
            expiry_date: parse_date(&request.expiry_date, "expiry_date")?,
            notes: request.notes,
        })
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", field, e))
}
