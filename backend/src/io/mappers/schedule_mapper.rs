use anyhow::Result;
use chrono::NaiveTime;
use shared::{ScheduleResponse, UpdateScheduleRequest};

use super::medication_mapper::MedicationMapper;
use crate::domain::commands::schedule::UpdateScheduleCommand;
use crate::domain::models::schedule::MedicationSchedule;

pub struct ScheduleMapper;

impl ScheduleMapper {
    /// Convert a domain schedule to the response DTO
    pub fn to_dto(schedule: MedicationSchedule) -> ScheduleResponse {
        ScheduleResponse {
            id: schedule.id,
            medication_id: schedule.medication_id,
            frequency: MedicationMapper::frequency_to_dto(schedule.frequency),
            time_of_day: schedule.time_of_day.format("%H:%M:%S").to_string(),
            days_of_week: schedule.days_of_week,
            custom_frequency_hours: schedule.custom_frequency_hours,
            is_active: schedule.is_active,
            created_at: schedule.created_at.to_rfc3339(),
            updated_at: schedule.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(schedules: Vec<MedicationSchedule>) -> Vec<ScheduleResponse> {
        schedules.into_iter().map(Self::to_dto).collect()
    }

    /// Convert an update request into the internal command
    pub fn to_update_command(request: UpdateScheduleRequest) -> Result<UpdateScheduleCommand> {
        let time_of_day = request
            .time_of_day
            .map(|t| {
                NaiveTime::parse_from_str(&t, "%H:%M:%S")
                    .map_err(|e| anyhow::anyhow!("Failed to parse time_of_day: {}", e))
            })
            .transpose()?;

        Ok(UpdateScheduleCommand {
            schedule_id: request.schedule_id,
            frequency: request.frequency.map(MedicationMapper::frequency_to_domain),
            time_of_day,
            days_of_week: request.days_of_week,
            custom_frequency_hours: request.custom_frequency_hours,
            is_active: request.is_active,
        })
    }
}
