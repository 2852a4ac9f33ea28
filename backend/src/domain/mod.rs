//! # Domain Module
//!
//! Contains all business logic for the medication tracker.
//!
//! This module encapsulates the core rules, entities, and services that
//! define how medications are scheduled, dosed, and monitored. It operates
//! independently of any UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **schedule_generator**: pure derivation of schedule slots from a
//!   dosing frequency
//! - **medication_service**: the create-medication use case (validate →
//!   persist medication → persist generated schedules, all-or-nothing)
//!   plus medication lifecycle
//! - **schedule_service**: schedule updates and domain queries
//! - **dose_service**: per-occurrence dose tracking with lazily derived
//!   missed state
//! - **reminder_service**: the reminder notification state machine
//! - **interaction_service**: cross-checks of concurrently active
//!   medications against known drug interactions
//! - **prescription_service**: prescription records and expiry alerts
//!
//! ## Key Invariants
//!
//! - Custom frequencies carry a positive hour interval, validated before
//!   anything is written
//! - A medication created with a frequency owns at least one schedule
//! - Missed state (doses and reminders) is derived on read/update, never
//!   swept by a background task

pub mod commands;
pub mod dose_service;
pub mod interaction_service;
pub mod medication_service;
pub mod models;
pub mod prescription_service;
pub mod reminder_service;
pub mod schedule_generator;
pub mod schedule_service;

pub use dose_service::DoseService;
pub use interaction_service::InteractionService;
pub use medication_service::MedicationService;
pub use prescription_service::PrescriptionService;
pub use reminder_service::ReminderService;
pub use schedule_service::ScheduleService;
