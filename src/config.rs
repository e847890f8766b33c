use crate::util::GenericResult;
use crate::{Algorithm, SearchLimits, SolveOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Settings of the benchmark binary, read from a TOML file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub algorithm: Algorithm,
    /// How many times the solver is run to average its time.
    pub runs: usize,
    pub max_subset_size: Option<usize>,
    pub timeout_secs: Option<f64>,
    pub parallel_closure: bool,
    pub log_level: String,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Kou,
            runs: 1,
            max_subset_size: None,
            timeout_secs: None,
            parallel_closure: true,
            log_level: "info".to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> GenericResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> GenericResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> GenericResult<()> {
        if self.runs == 0 {
            return Err("runs must be at least 1".into());
        }
        if let Some(secs) = self.timeout_secs {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(format!("invalid timeout_secs: {}", secs).into());
            }
        }
        Ok(())
    }

    /// Solver options for one run. A timeout is turned into a deadline counted from now.
    pub fn solve_options(&self) -> SolveOptions {
        let mut limits = SearchLimits::unbounded();
        if let Some(k) = self.max_subset_size {
            limits = limits.with_max_subset_size(k);
        }
        if let Some(secs) = self.timeout_secs {
            limits = limits.with_timeout(Duration::from_secs_f64(secs));
        }
        SolveOptions {
            limits,
            parallel_closure: self.parallel_closure,
        }
    }
}
