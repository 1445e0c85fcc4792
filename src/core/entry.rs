use serde::{Deserialize, Serialize};

use crate::core::state::{Category, EntityType, HLM_ONLY, SM_ONLY};
use crate::core::types::{HlmEntity, SmEntity};

/// One classified element with the HLM and SM facts that support the verdict.
///
/// Created once by a classifier, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflexionEntry {
    pub entity_type: EntityType,
    pub entity_key: String,
    pub category: Category,
    pub details: Vec<String>,
    pub hlm_matches: Vec<HlmEntity>,
    pub sm_matches: Vec<SmEntity>,
}

impl ReflexionEntry {
    pub fn convergence(
        entity_type: EntityType,
        entity_key: impl Into<String>,
        hlm_matches: Vec<HlmEntity>,
        sm_matches: Vec<SmEntity>,
    ) -> Self {
        Self {
            entity_type,
            entity_key: entity_key.into(),
            category: Category::Convergence,
            details: Vec::new(),
            hlm_matches,
            sm_matches,
        }
    }

    pub fn absence(entity_type: EntityType, entity_key: impl Into<String>, hlm_matches: Vec<HlmEntity>) -> Self {
        Self {
            entity_type,
            entity_key: entity_key.into(),
            category: Category::Absence,
            details: vec![HLM_ONLY.to_string()],
            hlm_matches,
            sm_matches: Vec::new(),
        }
    }

    pub fn divergence(entity_type: EntityType, entity_key: impl Into<String>, sm_matches: Vec<SmEntity>) -> Self {
        Self {
            entity_type,
            entity_key: entity_key.into(),
            category: Category::Divergence,
            details: vec![SM_ONLY.to_string()],
            hlm_matches: Vec::new(),
            sm_matches,
        }
    }

    pub fn is_violation(&self) -> bool {
        self.category.is_violation()
    }
}
