//! # CSV Storage Module
//!
//! File-based storage implementation for the medication tracker. Each
//! aggregate is persisted in its own CSV file inside the data directory:
//!
//! ```text
//! data/
//! ├── medications.csv
//! ├── schedules.csv
//! ├── doses.csv
//! ├── reminders.csv
//! ├── interactions.csv
//! └── prescriptions.csv
//! ```
//!
//! Repositories read the whole file, mutate in memory, and write everything
//! back through a temp file + rename so a crashed write never leaves a
//! half-written file behind.

pub mod connection;
pub mod dose_repository;
pub mod interaction_repository;
pub mod medication_repository;
pub mod prescription_repository;
pub mod reminder_repository;
pub mod schedule_repository;

pub use connection::CsvConnection;
pub use dose_repository::DoseRepository;
pub use interaction_repository::InteractionRepository;
pub use medication_repository::MedicationRepository;
pub use prescription_repository::PrescriptionRepository;
pub use reminder_repository::ReminderRepository;
pub use schedule_repository::ScheduleRepository;
