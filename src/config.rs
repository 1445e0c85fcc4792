//! Run configuration: an optional config file with CLI flags layered on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::state::Category;
use crate::mapping::{read_document, MappingError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error(transparent)]
    Load(#[from] MappingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// High-level model table (TOON or JSON)
    #[serde(default)]
    pub hlm: Option<PathBuf>,

    /// Raw source model table (TOON or JSON)
    #[serde(default)]
    pub sm: Option<PathBuf>,

    /// Report destination; the extension picks the format
    #[serde(default = "default_out")]
    pub out: PathBuf,

    /// Newline-separated external calls to drop from the source model
    #[serde(default)]
    pub exclude_calls_file: Option<PathBuf>,

    /// Categories that make the run fail
    #[serde(default = "default_fail_on")]
    pub fail_on: Vec<Category>,
}

fn default_out() -> PathBuf {
    PathBuf::from("reflexion-model.toon")
}

fn default_fail_on() -> Vec<Category> {
    vec![Category::Absence, Category::Divergence]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            hlm: None,
            sm: None,
            out: default_out(),
            exclude_calls_file: None,
            fail_on: default_fail_on(),
        }
    }
}

/// Values given on the command line; `None` keeps whatever the file said.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub hlm: Option<PathBuf>,
    pub sm: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub exclude_calls_file: Option<PathBuf>,
    pub fail_on: Option<Vec<Category>>,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(read_document(path)?)
    }

    pub fn with_overrides(mut self, o: Overrides) -> Self {
        if let Some(hlm) = o.hlm {
            self.hlm = Some(hlm);
        }
        if let Some(sm) = o.sm {
            self.sm = Some(sm);
        }
        if let Some(out) = o.out {
            self.out = out;
        }
        if let Some(ex) = o.exclude_calls_file {
            self.exclude_calls_file = Some(ex);
        }
        if let Some(fail_on) = o.fail_on {
            self.fail_on = fail_on;
        }
        self
    }

    pub fn hlm_path(&self) -> Result<&Path, ConfigError> {
        self.hlm.as_deref().ok_or(ConfigError::Missing("hlm"))
    }

    pub fn sm_path(&self) -> Result<&Path, ConfigError> {
        self.sm.as_deref().ok_or(ConfigError::Missing("sm"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hlm_path()?;
        self.sm_path()?;
        Ok(())
    }
}
