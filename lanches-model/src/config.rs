use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use lanches_data::loader::LoaderConfig;

use crate::validation::DEFAULT_TOLERANCE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Training table.
    pub file: PathBuf,
    /// Maximum |predicted - actual| for a row to pass the proportionality test.
    pub tolerance: f64,
    pub loader: LoaderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("assets/lanches.csv"),
            tolerance: DEFAULT_TOLERANCE,
            loader: LoaderConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossível ler {}", path.display()))?;
        let config: Config = serde_json::from_str(&json)
            .with_context(|| format!("JSON inválido em {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            bail!("Tolerância inválida: {}", self.tolerance);
        }
        Ok(())
    }
}
