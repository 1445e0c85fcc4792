// reflexion aggregation: process pass, then dataflow pass
use tracing::info;

use crate::core::dataflow::classify_dataflows;
use crate::core::entry::ReflexionEntry;
use crate::core::error::ReflexionError;
use crate::core::normalize::expand_raw;
use crate::core::process::classify_processes;
use crate::core::state::Category;
use crate::core::types::{HlmEntity, RawSmEntity, SmEntity};

/// Both models, fully loaded. Running it never mutates the inputs, so the same
/// model can be classified any number of times with identical results.
#[derive(Debug, Clone, Default)]
pub struct ReflexionModel {
    hlm: Vec<HlmEntity>,
    sm: Vec<SmEntity>,
}

impl ReflexionModel {
    pub fn new(hlm: Vec<HlmEntity>, sm: Vec<SmEntity>) -> Self {
        Self { hlm, sm }
    }

    pub fn from_raw(hlm: Vec<HlmEntity>, raws: &[RawSmEntity]) -> Result<Self, ReflexionError> {
        Ok(Self::new(hlm, expand_raw(raws)?))
    }

    //Run a full classification:
    // - all process entries (convergence, absence, divergence, anonymous divergence)
    // - then all dataflow entries (one per HLM flow, then unclaimed facts)
    pub fn run(&self) -> Reflexion {
        let entries = classify(&self.hlm, &self.sm);
        let reflexion = Reflexion { entries };

        let summary = reflexion.summary();
        info!(
            hlm = self.hlm.len(),
            sm = self.sm.len(),
            convergence = summary.convergence,
            absence = summary.absence,
            divergence = summary.divergence,
            "reflexion model generated"
        );
        reflexion
    }
}

/// Strict two-phase concatenation; output order is part of the contract.
pub fn classify(hlm: &[HlmEntity], sm: &[SmEntity]) -> Vec<ReflexionEntry> {
    let mut entries = classify_processes(hlm, sm);
    entries.extend(classify_dataflows(hlm, sm));
    entries
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub convergence: usize,
    pub absence: usize,
    pub divergence: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reflexion {
    entries: Vec<ReflexionEntry>,
}

impl Reflexion {
    pub fn entries(&self) -> &[ReflexionEntry] {
        &self.entries
    }

    pub fn count_violations(&self) -> usize {
        self.entries.iter().filter(|e| e.is_violation()).count()
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary::default();
        for e in &self.entries {
            match e.category {
                Category::Convergence => s.convergence += 1,
                Category::Absence => s.absence += 1,
                Category::Divergence => s.divergence += 1,
            }
        }
        s
    }

    pub fn has_any(&self, categories: &[Category]) -> bool {
        self.entries.iter().any(|e| categories.contains(&e.category))
    }
}
