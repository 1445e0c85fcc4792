// model types shared by the normalizer and both classifiers
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Actor,
    Process,
    Store,
    //blank or anything the diagram converter did not recognise
    Unknown,
}

impl ComponentType {
    /// Lenient parse: case-insensitive, trimmed, never fails.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("process") {
            ComponentType::Process
        } else if raw.eq_ignore_ascii_case("actor") {
            ComponentType::Actor
        } else if raw.eq_ignore_ascii_case("store") {
            ComponentType::Store
        } else {
            ComponentType::Unknown
        }
    }

    pub fn is_process(self) -> bool {
        matches!(self, ComponentType::Process)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Actor => "Actor",
            ComponentType::Process => "Process",
            ComponentType::Store => "Store",
            ComponentType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub component_type: ComponentType,
    pub name: String,
    pub description: String,
    pub out_of_scope: bool,
}

impl Component {
    pub fn new(id: impl Into<String>, component_type: ComponentType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type,
            name: name.into(),
            description: String::new(),
            out_of_scope: false,
        }
    }

    pub fn is_process(&self) -> bool {
        self.component_type.is_process()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataflow {
    pub id: String,
    pub name: String,
    pub out_of_scope: bool,
    pub source: Component,
    pub target: Component,
}

/// One designer-declared dataflow with both endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HlmEntity {
    pub flow: Dataflow,
}

impl HlmEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: Component, target: Component) -> Self {
        Self {
            flow: Dataflow {
                id: id.into(),
                name: name.into(),
                out_of_scope: false,
                source,
                target,
            },
        }
    }

    pub fn source(&self) -> &Component {
        &self.flow.source
    }

    pub fn target(&self) -> &Component {
        &self.flow.target
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.file_path.trim().is_empty()
    }
}

/// Direction of a dataflow relative to the process performing the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Push,
    Pull,
    //process observed without any dataflow call
    Unknown,
}

impl Direction {
    /// Only the `Pull` prefix matters: `Pull<T>`, `pullAsync` and `PULL` are all Pull,
    /// every other tag is Push.
    pub fn from_method_tag(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("pull") => Direction::Pull,
            _ => Direction::Push,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Push => "Push",
            Direction::Pull => "Pull",
            Direction::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One semantic fact extracted from code: `process_name` pushes or pulls `dataflow_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmEntity {
    pub entry_point: String,
    pub internal_call: String,
    pub external_call: String,
    pub process_name: String,
    pub dataflow_name: String,
    pub direction: Direction,
    pub entry_point_location: Location,
    pub internal_call_location: Location,
}

impl SmEntity {
    pub fn has_process(&self) -> bool {
        !self.process_name.trim().is_empty()
    }

    //name used in divergence keys: the entry point stands in for a missing process
    pub fn display_process(&self) -> &str {
        if self.has_process() {
            &self.process_name
        } else {
            &self.entry_point
        }
    }
}

/// A row as produced by the extraction engine, before multi-value expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSmEntity {
    pub entry_point: String,
    pub internal_call: String,
    pub external_call: String,
    pub process_name: String,
    /// `"A|B|..."`
    pub raw_dataflow_names: String,
    /// `"Push|Pull<T>|..."`
    pub raw_dataflow_method_names: String,
    pub entry_point_location: Location,
    pub internal_call_location: Location,
}
