//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading regulatory
//! parameters from YAML files.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

use super::resolver::ParameterSource;
use super::types::{
    FamilyAllowanceBracket, IndicatorSet, ParameterSetMetadata, PeriodParameterFile, TaxBracket,
    TaxableCaps,
};

/// Loads and provides access to period-keyed regulatory parameters.
///
/// # Directory Structure
///
/// ```text
/// config/cl/
/// ├── parameters.yaml     # Parameter set metadata
/// └── periods/
///     ├── 2025-01.yaml    # Parameters for January 2025
///     └── 2025-02.yaml
/// ```
///
/// Each period file names its own year and month; the file name is only a
/// convention.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::{ConfigLoader, resolve_period};
/// use payroll_engine::models::PayrollPeriod;
///
/// let loader = ConfigLoader::load("./config/cl")?;
/// let period = PayrollPeriod::new(2025, 1)?;
/// let params = resolve_period(&loader, period)?;
/// println!("UF for {}: {}", period, params.uf);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    metadata: ParameterSetMetadata,
    periods: BTreeMap<PayrollPeriod, PeriodParameterFile>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if the metadata file or the `periods` directory is
    /// missing, if any file contains invalid YAML, if a file names an
    /// invalid month, or if two files claim the same period.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ParameterSetMetadata>(&path.join("parameters.yaml"))?;

        let periods_dir = path.join("periods");
        let files = Self::load_periods(&periods_dir)?;

        let loader = Self::from_sources(metadata, files)?;
        tracing::info!(
            code = %loader.metadata.code,
            periods = loader.periods.len(),
            "Loaded regulatory parameters"
        );
        Ok(loader)
    }

    /// Builds a loader from already-parsed period files.
    ///
    /// Errors name the offending file by the period it claims.
    pub fn from_files(
        metadata: ParameterSetMetadata,
        files: Vec<PeriodParameterFile>,
    ) -> EngineResult<Self> {
        let sources = files
            .into_iter()
            .map(|file| (format!("{}-{:02}", file.year, file.month), file))
            .collect();
        Self::from_sources(metadata, sources)
    }

    /// Indexes period files by period. Each file comes with the path used
    /// to report errors against it.
    fn from_sources(
        metadata: ParameterSetMetadata,
        sources: Vec<(String, PeriodParameterFile)>,
    ) -> EngineResult<Self> {
        let mut periods = BTreeMap::new();
        for (path, file) in sources {
            let period = PayrollPeriod::new(file.year, file.month).map_err(|_| {
                EngineError::ConfigParseError {
                    path: path.clone(),
                    message: format!("invalid period {}-{:02}", file.year, file.month),
                }
            })?;
            if periods.insert(period, file).is_some() {
                return Err(EngineError::ConfigParseError {
                    path,
                    message: format!("period {} defined more than once", period),
                });
            }
        }
        Ok(Self { metadata, periods })
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

    /// Loads all period files from the periods directory.
    fn load_periods(periods_dir: &Path) -> EngineResult<Vec<(String, PeriodParameterFile)>> {
        let dir_str = periods_dir.display().to_string();

        let entries = fs::read_dir(periods_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                let file = Self::load_yaml::<PeriodParameterFile>(&path)?;
                files.push((path.display().to_string(), file));
            }
        }

        if files.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no period files found)", dir_str),
            });
        }

        Ok(files)
    }

    /// Returns the parameter set metadata.
    pub fn metadata(&self) -> &ParameterSetMetadata {
        &self.metadata
    }

    /// Returns the loaded periods in ascending order.
    pub fn periods(&self) -> impl Iterator<Item = PayrollPeriod> + '_ {
        self.periods.keys().copied()
    }

    fn file(&self, period: &PayrollPeriod) -> Option<&PeriodParameterFile> {
        self.periods.get(period)
    }
}

impl ParameterSource for ConfigLoader {
    fn indicators(&self, period: &PayrollPeriod) -> Option<IndicatorSet> {
        self.file(period)?.indicators.clone()
    }

    fn taxable_caps(&self, period: &PayrollPeriod) -> Option<TaxableCaps> {
        self.file(period)?.taxable_caps
    }

    fn pension_rates(&self, period: &PayrollPeriod) -> Option<BTreeMap<String, Decimal>> {
        self.file(period)?.pension_rates.clone()
    }

    fn tax_brackets(&self, period: &PayrollPeriod) -> Option<Vec<TaxBracket>> {
        self.file(period)?.tax_brackets.clone()
    }

    fn family_allowance_brackets(
        &self,
        period: &PayrollPeriod,
    ) -> Option<Vec<FamilyAllowanceBracket>> {
        self.file(period)?.family_allowance_brackets.clone()
    }
}
