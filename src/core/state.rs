// reflexion categories and entity kinds
use std::fmt;

use serde::{Deserialize, Serialize};

pub const HLM_ONLY: &str = "Present in HLM only";
pub const SM_ONLY: &str = "Present in SM only";

/*

Convergence: declared ∧ implemented

Absence: declared ∧ not implemented

Divergence: implemented ∧ not declared

*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Convergence,
    Absence,
    Divergence,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Convergence, Category::Absence, Category::Divergence];

    //anything that is not a match between both models gets reported
    pub fn is_violation(self) -> bool {
        !matches!(self, Category::Convergence)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Convergence => "Convergence",
            Category::Absence => "Absence",
            Category::Divergence => "Divergence",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Process,
    Dataflow,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Process => "Process",
            EntityType::Dataflow => "Dataflow",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
