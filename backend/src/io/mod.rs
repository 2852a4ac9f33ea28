//! IO layer: DTO mapping for the external interface.

pub mod mappers;
