//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::RotationPattern;

use super::types::{
    EngineConfig, ObRulesConfig, OnCallConfig, PersonsFile, RotationFile, Settings,
    ShiftTypesFile, TaxBracketsFile,
};

/// Loads engine configuration from a directory of YAML files.
///
/// # Directory Structure
///
/// ```text
/// config/sweden/
/// ├── settings.yaml      # Rotation start, monthly hours, overtime and absence settings
/// ├── shift_types.yaml   # Shift codes and their times
/// ├── rotation.yaml      # The ten-week pattern
/// ├── ob_rules.yaml      # Priority tiers and OB rules
/// ├── on_call.yaml       # On-call rate table
/// ├── tax_brackets.yaml  # Preliminary tax brackets
/// └── persons.yaml       # Team members, wages, offsets and vacation weeks
/// ```
///
/// # Example
///
/// ```no_run
/// use ob_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sweden")?;
/// println!("Persons: {}", loader.config().persons().count());
/// # Ok::<(), ob_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParse`)
    /// - The files are inconsistent with each other (`Configuration`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<Settings>(&path.join("settings.yaml"))?;
        let shift_types = Self::load_yaml::<ShiftTypesFile>(&path.join("shift_types.yaml"))?;
        let rotation_file = Self::load_yaml::<RotationFile>(&path.join("rotation.yaml"))?;
        let ob = Self::load_yaml::<ObRulesConfig>(&path.join("ob_rules.yaml"))?;
        let on_call = Self::load_yaml::<OnCallConfig>(&path.join("on_call.yaml"))?;
        let tax = Self::load_yaml::<TaxBracketsFile>(&path.join("tax_brackets.yaml"))?;
        let persons = Self::load_yaml::<PersonsFile>(&path.join("persons.yaml"))?;

        let rotation = RotationPattern::from_keyed(&rotation_file.weeks)?;
        let config = EngineConfig::new(
            settings,
            shift_types.shift_types,
            rotation,
            ob,
            on_call,
            tax.brackets,
            persons.persons,
        )?;

        info!(
            path = %path.display(),
            persons = config.persons().count(),
            shift_types = config.shift_types().len(),
            "Loaded configuration"
        );

        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// The directory this configuration was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayRate, PersonId, ShiftCode};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/sweden"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Copies the shipped configuration into a fresh temp directory.
    fn scratch_copy(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ob-engine-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for entry in fs::read_dir(config_path()).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), dir.join(entry.file_name())).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert!(loader.config().persons().count() >= 2);
        assert_eq!(loader.path(), Path::new(config_path()));
    }

    #[test]
    fn test_shipped_ob_rates_use_divisors() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let ob = loader.config().ob();

        let evening = ob.rules.iter().find(|r| r.code == "OB1").unwrap();
        assert_eq!(evening.rate, PayRate::Divisor { divisor: dec("600") });
        assert_eq!(
            loader.config().tier(5).unwrap().rate,
            Some(PayRate::Divisor { divisor: dec("150") })
        );
    }

    #[test]
    fn test_shipped_shift_times() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let n3 = loader.config().shift_type(&ShiftCode::from("N3")).unwrap();
        assert_eq!(n3.start.to_string(), "22:00");
        assert_eq!(n3.end.to_string(), "06:30");
    }

    #[test]
    fn test_shipped_overtime_settings() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let settings = loader.config().settings();
        assert_eq!(settings.overtime.rate, PayRate::Divisor { divisor: dec("72") });
        assert_eq!(settings.overtime.default_hours, dec("8.5"));
        // The overtime divisor is independent of the standard monthly hours.
        assert_ne!(settings.standard_monthly_hours, dec("72"));
    }

    #[test]
    fn test_shipped_vacation_settings() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let vacation = &loader.config().settings().vacation;
        assert_eq!(vacation.year_start_month, 4);
        assert_eq!(vacation.days_per_year, 25);
        assert_eq!(vacation.payout_percent, dec("4.6"));

        let fredrik = loader.config().person(PersonId(6)).unwrap();
        assert!(fredrik.employment_start.is_some());
        let anna = loader.config().person(PersonId(1)).unwrap();
        assert_eq!(anna.vacation_saved.values().sum::<u32>(), 5);
    }

    #[test]
    fn test_persons_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let person = loader.config().person(PersonId(1)).unwrap();
        assert!(person.monthly_wage > Decimal::ZERO);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = scratch_copy("parse");
        fs::write(dir.join("ob_rules.yaml"), "tiers: [unclosed").unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParse { path, .. }) => {
                assert!(path.contains("ob_rules.yaml"));
            }
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_undefined_code_in_rotation_returns_configuration_error() {
        let dir = scratch_copy("rotation");
        let rotation = fs::read_to_string(dir.join("rotation.yaml")).unwrap();
        fs::write(dir.join("rotation.yaml"), rotation.replacen("N1", "N9", 1)).unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::Configuration { message }) => {
                assert!(message.contains("N9"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }
}
