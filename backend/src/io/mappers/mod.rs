//! Mappers between domain types and the public DTOs in the `shared` crate.

pub mod dose_mapper;
pub mod interaction_mapper;
pub mod medication_mapper;
pub mod prescription_mapper;
pub mod reminder_mapper;
pub mod schedule_mapper;

pub use dose_mapper::DoseMapper;
pub use interaction_mapper::InteractionMapper;
pub use medication_mapper::MedicationMapper;
pub use prescription_mapper::PrescriptionMapper;
pub use reminder_mapper::ReminderMapper;
pub use schedule_mapper::ScheduleMapper;
