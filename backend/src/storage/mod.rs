//! Storage layer: abstraction traits plus the CSV file backend.

pub mod csv;
pub mod traits;

pub use traits::{
    DoseStorage, InteractionStorage, MedicationStorage, PrescriptionStorage, ReminderStorage,
    ScheduleStorage,
};
