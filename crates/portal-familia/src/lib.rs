//! Dignômetro questionnaire, poverty scoring and assessment history for Portal da Família.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
