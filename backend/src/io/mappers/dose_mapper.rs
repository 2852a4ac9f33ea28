use anyhow::Result;
use chrono::{DateTime, Utc};
use shared::{DoseResponse, UpdateDoseRequest};

use crate::domain::commands::dose::UpdateDoseCommand;
use crate::domain::models::dose::MedicationDose;

pub struct DoseMapper;

impl DoseMapper {
    /// Convert a domain dose to the response DTO
    pub fn to_dto(dose: MedicationDose) -> DoseResponse {
        DoseResponse {
            id: dose.id,
            medication_id: dose.medication_id,
            owner_id: dose.owner_id,
            scheduled_time: dose.scheduled_time.to_rfc3339(),
            is_taken: dose.is_taken,
            is_missed: dose.is_missed,
            taken_at: dose.taken_at.map(|t| t.to_rfc3339()),
            created_at: dose.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(doses: Vec<MedicationDose>) -> Vec<DoseResponse> {
        doses.into_iter().map(Self::to_dto).collect()
    }

    /// Convert an update request into the internal command
    pub fn to_update_command(request: UpdateDoseRequest) -> Result<UpdateDoseCommand> {
        Ok(UpdateDoseCommand {
            is_taken: request.is_taken,
            taken_at: request.taken_at.map(|t| parse_timestamp(&t)).transpose()?,
            scheduled_time: request
                .scheduled_time
                .map(|t| parse_timestamp(&t))
                .transpose()?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp: {}", e))?
        .with_timezone(&Utc))
}
