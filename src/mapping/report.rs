// reflexion entries -> flat report records
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::entry::ReflexionEntry;
use crate::core::state::{Category, EntityType};
use crate::core::types::{HlmEntity, Location, SmEntity};
use crate::mapping::{read_document, write_document, MappingError, Table};

/// One entry flattened for downstream tooling: multi-valued fields are
/// pipe-joined, locations are a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRecord {
    pub entity_type: EntityType,
    pub entity_key: String,
    pub category: Category,
    pub details: String,
    pub hlm_matches: String,
    pub sm_matches: String,
    pub locations: String,
}

//sourceType:sourceName:flowName:targetName
fn hlm_match(h: &HlmEntity) -> String {
    format!("{}:{}:{}:{}", h.source().component_type, h.source().name, h.flow.name, h.target().name)
}

//process:entryPoint:externalCall:dataflowName:direction
fn sm_match(s: &SmEntity) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        s.process_name, s.entry_point, s.external_call, s.dataflow_name, s.direction
    )
}

/// Process entries point at the entry point, dataflow entries at the internal
/// call. Duplicates are dropped, first occurrence wins.
pub fn entry_locations(entry: &ReflexionEntry) -> Vec<Location> {
    let mut out: Vec<Location> = Vec::new();
    for s in &entry.sm_matches {
        let loc = match entry.entity_type {
            EntityType::Process => &s.entry_point_location,
            EntityType::Dataflow => &s.internal_call_location,
        };
        if !out.contains(loc) {
            out.push(loc.clone());
        }
    }
    out
}

impl ReportRecord {
    pub fn from_entry(entry: &ReflexionEntry) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entity_type: entry.entity_type,
            entity_key: entry.entity_key.clone(),
            category: entry.category,
            details: entry.details.join("|"),
            hlm_matches: entry.hlm_matches.iter().map(hlm_match).collect::<Vec<_>>().join("|"),
            sm_matches: entry.sm_matches.iter().map(sm_match).collect::<Vec<_>>().join("|"),
            locations: serde_json::to_string(&entry_locations(entry))?,
        })
    }

    pub fn is_violation(&self) -> bool {
        self.category.is_violation()
    }
}

pub fn to_records(entries: &[ReflexionEntry]) -> Result<Vec<ReportRecord>, serde_json::Error> {
    entries.iter().map(ReportRecord::from_entry).collect()
}

/// Flatten and write the whole report in one go; nothing is written when
/// flattening fails.
pub fn write_report(path: &Path, entries: &[ReflexionEntry]) -> Result<(), MappingError> {
    let rows = to_records(entries).map_err(|source| MappingError::Json { path: path.to_path_buf(), source })?;
    write_document(path, &Table { rows })?;
    info!(path = %path.display(), entries = entries.len(), "wrote reflexion report");
    Ok(())
}

pub fn read_report(path: &Path) -> Result<Vec<ReportRecord>, MappingError> {
    let table: Table<ReportRecord> = read_document(path)?;
    Ok(table.rows)
}
