use anyhow::Result;
use chrono::{DateTime, Utc};
use shared::{CreateReminderRequest, ReminderResponse, UpdateReminderRequest};

use crate::domain::commands::reminder::{CreateReminderCommand, UpdateReminderCommand};
use crate::domain::models::reminder::{MedicationReminder, ReminderStatus as DomainReminderStatus};

pub struct ReminderMapper;

impl ReminderMapper {
    /// Convert shared ReminderStatus to domain ReminderStatus
    pub fn status_to_domain(dto: shared::ReminderStatus) -> DomainReminderStatus {
        match dto {
            shared::ReminderStatus::Scheduled => DomainReminderStatus::Scheduled,
            shared::ReminderStatus::Sent => DomainReminderStatus::Sent,
            shared::ReminderStatus::Snoozed => DomainReminderStatus::Snoozed,
            shared::ReminderStatus::Missed => DomainReminderStatus::Missed,
            shared::ReminderStatus::Acknowledged => DomainReminderStatus::Acknowledged,
        }
    }

    /// Convert domain ReminderStatus to shared ReminderStatus
    pub fn status_to_dto(domain: DomainReminderStatus) -> shared::ReminderStatus {
        match domain {
            DomainReminderStatus::Scheduled => shared::ReminderStatus::Scheduled,
            DomainReminderStatus::Sent => shared::ReminderStatus::Sent,
            DomainReminderStatus::Snoozed => shared::ReminderStatus::Snoozed,
            DomainReminderStatus::Missed => shared::ReminderStatus::Missed,
            DomainReminderStatus::Acknowledged => shared::ReminderStatus::Acknowledged,
        }
    }

    /// Convert a domain reminder to the response DTO
    pub fn to_dto(reminder: MedicationReminder) -> ReminderResponse {
        ReminderResponse {
            id: reminder.id,
            medication_id: reminder.medication_id,
            scheduled_time: reminder.scheduled_time.to_rfc3339(),
            status: Self::status_to_dto(reminder.status),
            snooze_count: reminder.snooze_count,
            created_at: reminder.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(reminders: Vec<MedicationReminder>) -> Vec<ReminderResponse> {
        reminders.into_iter().map(Self::to_dto).collect()
    }

    /// Convert a create request into the internal command
    pub fn to_create_command(request: CreateReminderRequest) -> Result<CreateReminderCommand> {
        Ok(CreateReminderCommand {
            medication_id: request.medication_id,
            scheduled_time: parse_timestamp(&request.scheduled_time)?,
        })
    }

    /// Convert an update request into the internal command
    pub fn to_update_command(request: UpdateReminderRequest) -> Result<UpdateReminderCommand> {
        Ok(UpdateReminderCommand {
            scheduled_time: request
                .scheduled_time
                .map(|t| parse_timestamp(&t))
                .transpose()?,
            status: request.status.map(Self::status_to_domain),
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp: {}", e))?
        .with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_command_parses_rfc3339() {
        let command = ReminderMapper::to_create_command(CreateReminderRequest {
            medication_id: "medication::1".to_string(),
            scheduled_time: "2025-06-02T09:00:00+00:00".to_string(),
        })
        .unwrap();
        assert_eq!(command.scheduled_time.to_rfc3339(), "2025-06-02T09:00:00+00:00");
    }

    #[test]
    fn test_create_command_rejects_garbage_timestamp() {
        let result = ReminderMapper::to_create_command(CreateReminderRequest {
            medication_id: "medication::1".to_string(),
            scheduled_time: "nine in the morning".to_string(),
        });
        assert!(result.is_err());
    }
}
