//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax schedules
//! from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{BracketTable, ExemptionPhaseout, FederalSchedule, JurisdictionSchedule, TaxSchedule};

/// Loads and provides access to a tax schedule.
///
/// # Directory Structure
///
/// ```text
/// config/tax2016/
/// ├── federal.yaml        # Exemptions, AMT, federal brackets, payroll taxes
/// └── jurisdictions/
///     ├── CA.yaml         # One file per jurisdiction
///     └── WA.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use offer_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/tax2016").unwrap();
/// println!("Loaded tax year {}", loader.schedule().tax_year());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    schedule: TaxSchedule,
}

impl ConfigLoader {
    /// Loads a tax schedule from the specified directory.
    ///
    /// Returns an error if any file is missing or unparsable, or if a table
    /// violates its invariants (see [`BracketTable::validate`] and
    /// [`ExemptionPhaseout::validate`]).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let federal_path = path.join("federal.yaml");
        let federal = Self::load_yaml::<FederalSchedule>(&federal_path)?;
        Self::validate_federal(&federal, &federal_path)?;

        let jurisdictions_dir = path.join("jurisdictions");
        let jurisdictions = Self::load_jurisdictions(&jurisdictions_dir)?;

        let schedule = TaxSchedule::new(federal, jurisdictions)?;
        Ok(Self { schedule })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every jurisdiction file from the jurisdictions directory.
    fn load_jurisdictions(dir: &Path) -> EngineResult<Vec<JurisdictionSchedule>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut jurisdictions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let jurisdiction = Self::load_yaml::<JurisdictionSchedule>(&path)?;
                Self::check_table(&jurisdiction.brackets, &path, "brackets")?;
                Self::check_table(
                    &jurisdiction.disability_insurance_brackets,
                    &path,
                    "disability_insurance_brackets",
                )?;
                jurisdictions.push(jurisdiction);
            }
        }

        if jurisdictions.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no jurisdiction files found)", dir_str),
            });
        }

        Ok(jurisdictions)
    }

    fn validate_federal(federal: &FederalSchedule, path: &Path) -> EngineResult<()> {
        Self::check_table(&federal.brackets, path, "brackets")?;
        Self::check_table(&federal.amt_brackets, path, "amt_brackets")?;
        Self::check_table(&federal.medicare_brackets, path, "medicare_brackets")?;
        Self::check_table(
            &federal.social_security_brackets,
            path,
            "social_security_brackets",
        )?;
        Self::check_phaseout(&federal.personal_exemption, path, "personal_exemption")?;
        Self::check_phaseout(&federal.amt_exemption, path, "amt_exemption")
    }

    fn check_table(table: &BracketTable, path: &Path, name: &str) -> EngineResult<()> {
        table.validate().map_err(|message| EngineError::InvalidConfig {
            path: path.display().to_string(),
            message: format!("{}: {}", name, message),
        })
    }

    fn check_phaseout(phaseout: &ExemptionPhaseout, path: &Path, name: &str) -> EngineResult<()> {
        phaseout.validate().map_err(|message| EngineError::InvalidConfig {
            path: path.display().to_string(),
            message: format!("{}: {}", name, message),
        })
    }

    /// Returns the loaded tax schedule.
    pub fn schedule(&self) -> &TaxSchedule {
        &self.schedule
    }

    /// Consumes the loader, returning the tax schedule.
    pub fn into_schedule(self) -> TaxSchedule {
        self.schedule
    }
}
