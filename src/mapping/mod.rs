//! File contracts around the engine: the HLM and SM input tables, the flat
//! reflexion report, and the delta between two reports.
//!
//! Every document is a TOON or JSON file, picked by extension.

pub mod delta;
pub mod loader;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::ReflexionError;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOON in {path}: {message}")]
    Toon { path: PathBuf, message: String },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported file format for {0} (expected .toon or .json)")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Reflexion(#[from] ReflexionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toon,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, MappingError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toon") => Ok(DocumentFormat::Toon),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DocumentFormat::Json),
            _ => Err(MappingError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Tabular document: a single `rows` array of flat records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<T> {
    pub rows: Vec<T>,
}

fn json_error(path: &Path, source: serde_json::Error) -> MappingError {
    MappingError::Json { path: path.to_path_buf(), source }
}

fn toon_error(path: &Path, err: impl std::fmt::Display) -> MappingError {
    MappingError::Toon { path: path.to_path_buf(), message: err.to_string() }
}

pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, MappingError> {
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| MappingError::Io { path: path.to_path_buf(), source })?;

    match format {
        DocumentFormat::Json => serde_json::from_str(&text).map_err(|e| json_error(path, e)),
        DocumentFormat::Toon => {
            //TOON decodes to a JSON data model first, then into the record type
            let value: serde_json::Value = toon_format::decode_default(&text).map_err(|e| toon_error(path, e))?;
            serde_json::from_value(value).map_err(|e| json_error(path, e))
        }
    }
}

pub fn write_document<T: Serialize>(path: &Path, doc: &T) -> Result<(), MappingError> {
    let format = DocumentFormat::from_path(path)?;

    let text = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(doc).map_err(|e| json_error(path, e))?,
        DocumentFormat::Toon => {
            let value = serde_json::to_value(doc).map_err(|e| json_error(path, e))?;
            toon_format::encode_default(&value).map_err(|e| toon_error(path, e))?
        }
    };

    fs::write(path, text).map_err(|source| MappingError::Io { path: path.to_path_buf(), source })
}
