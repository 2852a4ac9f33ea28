use anyhow::Result;
use chrono::NaiveDate;
use shared::{CreateMedicationRequest, MedicationResponse};

use crate::domain::commands::medication::{CreateMedicationCommand, CreateMedicationResult};
use crate::domain::models::medication::{
    DosageUnit as DomainDosageUnit, FrequencyType, Medication,
    MedicationStatus as DomainMedicationStatus,
};

pub struct MedicationMapper;

impl MedicationMapper {
    /// Convert shared Frequency to domain FrequencyType
    pub fn frequency_to_domain(dto: shared::Frequency) -> FrequencyType {
        match dto {
            shared::Frequency::OnceDaily => FrequencyType::OnceDaily,
            shared::Frequency::TwiceDaily => FrequencyType::TwiceDaily,
            shared::Frequency::ThreeTimesDaily => FrequencyType::ThreeTimesDaily,
            shared::Frequency::FourTimesDaily => FrequencyType::FourTimesDaily,
            shared::Frequency::EveryFewHours => FrequencyType::EveryFewHours,
            shared::Frequency::AsNeeded => FrequencyType::AsNeeded,
            shared::Frequency::Custom => FrequencyType::Custom,
            shared::Frequency::Weekly => FrequencyType::Weekly,
            shared::Frequency::Monthly => FrequencyType::Monthly,
        }
    }

    /// Convert domain FrequencyType to shared Frequency
    pub fn frequency_to_dto(domain: FrequencyType) -> shared::Frequency {
        match domain {
            FrequencyType::OnceDaily => shared::Frequency::OnceDaily,
            FrequencyType::TwiceDaily => shared::Frequency::TwiceDaily,
            FrequencyType::ThreeTimesDaily => shared::Frequency::ThreeTimesDaily,
            FrequencyType::FourTimesDaily => shared::Frequency::FourTimesDaily,
            FrequencyType::EveryFewHours => shared::Frequency::EveryFewHours,
            FrequencyType::AsNeeded => shared::Frequency::AsNeeded,
            FrequencyType::Custom => shared::Frequency::Custom,
            FrequencyType::Weekly => shared::Frequency::Weekly,
            FrequencyType::Monthly => shared::Frequency::Monthly,
        }
    }

    pub fn dosage_unit_to_domain(dto: shared::DosageUnit) -> DomainDosageUnit {
        match dto {
            shared::DosageUnit::Mg => DomainDosageUnit::Mg,
            shared::DosageUnit::G => DomainDosageUnit::G,
            shared::DosageUnit::Mcg => DomainDosageUnit::Mcg,
            shared::DosageUnit::Ml => DomainDosageUnit::Ml,
            shared::DosageUnit::Tablet => DomainDosageUnit::Tablet,
            shared::DosageUnit::Capsule => DomainDosageUnit::Capsule,
            shared::DosageUnit::Drop => DomainDosageUnit::Drop,
            shared::DosageUnit::Unit => DomainDosageUnit::Unit,
        }
    }

    pub fn dosage_unit_to_dto(domain: DomainDosageUnit) -> shared::DosageUnit {
        match domain {
            DomainDosageUnit::Mg => shared::DosageUnit::Mg,
            DomainDosageUnit::G => shared::DosageUnit::G,
            DomainDosageUnit::Mcg => shared::DosageUnit::Mcg,
            DomainDosageUnit::Ml => shared::DosageUnit::Ml,
            DomainDosageUnit::Tablet => shared::DosageUnit::Tablet,
            DomainDosageUnit::Capsule => shared::DosageUnit::Capsule,
            DomainDosageUnit::Drop => shared::DosageUnit::Drop,
            DomainDosageUnit::Unit => shared::DosageUnit::Unit,
        }
    }

    pub fn status_to_dto(domain: DomainMedicationStatus) -> shared::MedicationStatus {
        match domain {
            DomainMedicationStatus::Active => shared::MedicationStatus::Active,
            DomainMedicationStatus::Discontinued => shared::MedicationStatus::Discontinued,
        }
    }

    /// Convert a create request into the internal command
    pub fn to_create_command(request: CreateMedicationRequest) -> Result<CreateMedicationCommand> {
        let start_date = request
            .start_date
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Failed to parse start_date: {}", e))
            })
            .transpose()?;

        Ok(CreateMedicationCommand {
            owner_id: request.owner_id,
            name: request.name,
            generic_name: request.generic_name,
            dosage: request.dosage,
            dosage_unit: Self::dosage_unit_to_domain(request.dosage_unit),
            frequency: request.frequency.map(Self::frequency_to_domain),
            custom_frequency_hours: request.custom_frequency_hours,
            days_of_week: request.days_of_week,
            monthly_day: request.monthly_day,
            start_date,
        })
    }

    /// Convert a domain medication and its schedule ids to the response DTO
    pub fn to_response(medication: Medication, schedule_ids: Vec<String>) -> MedicationResponse {
        MedicationResponse {
            id: medication.id,
            owner_id: medication.owner_id,
            name: medication.name,
            generic_name: medication.generic_name,
            dosage: medication.dosage,
            dosage_unit: Self::dosage_unit_to_dto(medication.dosage_unit),
            frequency: medication.frequency.map(Self::frequency_to_dto),
            custom_frequency_hours: medication.custom_frequency_hours.unwrap_or(0),
            days_of_week: medication.days_of_week,
            monthly_day: medication.monthly_day,
            status: Self::status_to_dto(medication.status),
            start_date: medication.start_date.format("%Y-%m-%d").to_string(),
            created_at: medication.created_at.to_rfc3339(),
            updated_at: medication.updated_at.to_rfc3339(),
            schedule_ids,
        }
    }

    /// Convert a create result to the response DTO
    pub fn to_create_response(result: CreateMedicationResult) -> MedicationResponse {
        Self::to_response(result.medication, result.schedule_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_response_uses_zero_for_unused_hours() {
        let now = Utc::now();
        let medication = Medication {
            id: "medication::1".to_string(),
            owner_id: "user::1".to_string(),
            name: "Aspirin".to_string(),
            generic_name: "acetylsalicylic acid".to_string(),
            dosage: 81.0,
            dosage_unit: DomainDosageUnit::Mg,
            frequency: Some(FrequencyType::OnceDaily),
            custom_frequency_hours: None,
            days_of_week: None,
            monthly_day: None,
            status: DomainMedicationStatus::Active,
            start_date: now.date_naive(),
            created_at: now,
            updated_at: now,
        };

        let response = MedicationMapper::to_response(medication, vec!["schedule::1".to_string()]);
        assert_eq!(response.custom_frequency_hours, 0);
        assert_eq!(response.schedule_ids.len(), 1);
        assert_eq!(response.frequency, Some(shared::Frequency::OnceDaily));
    }
}
