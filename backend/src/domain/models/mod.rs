//! Domain entities for the medication tracker.

pub mod dose;
pub mod interaction;
pub mod medication;
pub mod prescription;
pub mod reminder;
pub mod schedule;
