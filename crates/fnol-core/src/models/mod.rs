//! Data models for claim intake.

pub mod claim;
pub mod config;
