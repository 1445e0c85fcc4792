// input tables -> engine types
/*
Inputs:

    hlm table (one flat row per declared dataflow, from the diagram converter)

    sm table (one row per extracted call path, from the extraction engine)

    optional excluded external calls (newline separated)

Outputs:

    Vec<HlmEntity>, Vec<SmEntity>
*/
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::core::names::NameKey;
use crate::core::normalize::expand_raw;
use crate::core::types::{Component, ComponentType, Dataflow, HlmEntity, Location, RawSmEntity, SmEntity};
use crate::mapping::{read_document, MappingError, Table};

//hand-written TOON tables often leave ids and names unquoted, so accept scalars of any kind
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HlmRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub dataflow_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub dataflow_name: String,
    #[serde(default)]
    pub dataflow_out_of_scope: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub component_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub component_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub component_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub component_description: String,
    #[serde(default)]
    pub component_out_of_scope: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub target_component_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_component_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub target_component_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_component_description: String,
    #[serde(default)]
    pub target_component_out_of_scope: bool,
}

impl HlmRecord {
    pub fn into_entity(self) -> HlmEntity {
        HlmEntity {
            flow: Dataflow {
                id: self.dataflow_id.trim().to_string(),
                name: self.dataflow_name.trim().to_string(),
                out_of_scope: self.dataflow_out_of_scope,
                source: Component {
                    id: self.component_id.trim().to_string(),
                    component_type: ComponentType::parse(&self.component_type),
                    name: self.component_name.trim().to_string(),
                    description: self.component_description.trim().to_string(),
                    out_of_scope: self.component_out_of_scope,
                },
                target: Component {
                    id: self.target_component_id.trim().to_string(),
                    component_type: ComponentType::parse(&self.target_component_type),
                    name: self.target_component_name.trim().to_string(),
                    description: self.target_component_description.trim().to_string(),
                    out_of_scope: self.target_component_out_of_scope,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSmRecord {
    #[serde(rename = "entrypoint", deserialize_with = "lenient_string")]
    pub entry_point: String,
    #[serde(rename = "internalcall", default, deserialize_with = "lenient_string")]
    pub internal_call: String,
    #[serde(rename = "externalcall", default, deserialize_with = "lenient_string")]
    pub external_call: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_name: String,
    #[serde(rename = "dataflowName", default, deserialize_with = "lenient_string")]
    pub raw_dataflow_names: String,
    #[serde(rename = "dataflowMethodName", default, deserialize_with = "lenient_string")]
    pub raw_dataflow_method_names: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub process_file_path: String,
    #[serde(default)]
    pub process_start_line: u32,
    #[serde(default)]
    pub process_start_column: u32,
    #[serde(default)]
    pub process_end_line: u32,
    #[serde(default)]
    pub process_end_column: u32,

    #[serde(default, deserialize_with = "lenient_string")]
    pub internal_call_file_path: String,
    #[serde(default)]
    pub internal_call_start_line: u32,
    #[serde(default)]
    pub internal_call_start_column: u32,
    #[serde(default)]
    pub internal_call_end_line: u32,
    #[serde(default)]
    pub internal_call_end_column: u32,
}

impl RawSmRecord {
    pub fn into_raw(self) -> RawSmEntity {
        RawSmEntity {
            entry_point: self.entry_point,
            internal_call: self.internal_call,
            external_call: self.external_call,
            process_name: self.process_name,
            raw_dataflow_names: self.raw_dataflow_names,
            raw_dataflow_method_names: self.raw_dataflow_method_names,
            entry_point_location: Location {
                file_path: self.process_file_path,
                start_line: self.process_start_line,
                start_column: self.process_start_column,
                end_line: self.process_end_line,
                end_column: self.process_end_column,
            },
            internal_call_location: Location {
                file_path: self.internal_call_file_path,
                start_line: self.internal_call_start_line,
                start_column: self.internal_call_start_column,
                end_line: self.internal_call_end_line,
                end_column: self.internal_call_end_column,
            },
        }
    }
}

/// External calls removed from the source model before expansion.
#[derive(Debug, Clone, Default)]
pub struct CallExclusions {
    calls: HashSet<NameKey>,
}

impl CallExclusions {
    //one call per line, blank lines and `#` comments skipped
    pub fn parse(text: &str) -> Self {
        let calls = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(NameKey::new)
            .collect();
        Self { calls }
    }

    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Io { path: path.to_path_buf(), source })?;
        Ok(Self::parse(&text))
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn excludes(&self, external_call: &str) -> bool {
        self.calls.contains(&NameKey::new(external_call))
    }

    pub fn apply(&self, raws: Vec<RawSmEntity>) -> Vec<RawSmEntity> {
        if self.is_empty() {
            return raws;
        }
        let before = raws.len();
        let kept: Vec<RawSmEntity> = raws.into_iter().filter(|r| !self.excludes(&r.external_call)).collect();
        if kept.len() != before {
            warn!(dropped = before - kept.len(), "source rows removed by call exclusions");
        }
        kept
    }
}

pub fn load_hlm(path: &Path) -> Result<Vec<HlmEntity>, MappingError> {
    let table: Table<HlmRecord> = read_document(path)?;
    let hlm: Vec<HlmEntity> = table.rows.into_iter().map(HlmRecord::into_entity).collect();

    for h in hlm.iter().filter(|h| h.flow.name.is_empty()) {
        warn!(id = %h.flow.id, "dataflow without a name can never match");
    }
    info!(path = %path.display(), dataflows = hlm.len(), "loaded high-level model");
    Ok(hlm)
}

pub fn load_raw_sm(path: &Path) -> Result<Vec<RawSmEntity>, MappingError> {
    let table: Table<RawSmRecord> = read_document(path)?;
    Ok(table.rows.into_iter().map(RawSmRecord::into_raw).collect())
}

/// Load, filter and expand the source model.
pub fn load_sm(path: &Path, exclusions: &CallExclusions) -> Result<Vec<SmEntity>, MappingError> {
    let raws = exclusions.apply(load_raw_sm(path)?);
    let rows = raws.len();
    let sm = expand_raw(&raws)?;
    info!(path = %path.display(), rows, facts = sm.len(), "loaded source model");
    Ok(sm)
}
