//! Configuration loading and management for the OB engine.
//!
//! This module provides functionality to load the engine configuration from
//! YAML files: settings, shift types, the rotation pattern, OB and on-call
//! rule tables, tax brackets and the team.
//!
//! # Example
//!
//! ```no_run
//! use ob_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/sweden").unwrap();
//! println!("Rotation starts {}", loader.config().settings().rotation_start_date);
//! ```

mod loader;
mod types;

#[cfg(test)]
pub(crate) use types::fixtures;

pub use loader::ConfigLoader;
pub use types::{
    AbsenceSettings, DerivedOnCallRule, EngineConfig, ObRulesConfig, OnCallConfig,
    OvertimeSettings, PersonsFile, RotationFile, Settings, ShiftTypesFile, TaxBracketsFile,
    VacationSettings,
};
