// report-to-report diffs
use std::collections::HashMap;

use crate::core::state::{Category, EntityType};
use crate::mapping::report::ReportRecord;

/// Identity of a report entry across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub entity_type: EntityType,
    pub entity_key: String,
}

impl EntryId {
    pub fn of(r: &ReportRecord) -> Self {
        Self { entity_type: r.entity_type, entity_key: r.entity_key.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChange {
    pub id: EntryId,
    pub from: Category,
    pub to: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDelta {
    pub added: Vec<ReportRecord>,
    pub removed: Vec<ReportRecord>,
    pub changed: Vec<CategoryChange>,
}

impl ReportDelta {
    /// Added and changed follow the current report's order, removed follows the
    /// previous report's order. An id repeated within one report (e.g. one
    /// divergence per identical fact) is matched occurrence by occurrence.
    pub fn between(previous: &[ReportRecord], current: &[ReportRecord]) -> Self {
        let mut prev_by_id: HashMap<EntryId, Vec<(usize, Category)>> = HashMap::new();
        for (i, r) in previous.iter().enumerate().rev() {
            prev_by_id.entry(EntryId::of(r)).or_default().push((i, r.category));
        }

        let mut matched = vec![false; previous.len()];
        let mut delta = ReportDelta::default();

        for r in current {
            let id = EntryId::of(r);
            match prev_by_id.get_mut(&id).and_then(Vec::pop) {
                Some((i, from)) => {
                    matched[i] = true;
                    if from != r.category {
                        delta.changed.push(CategoryChange { id, from, to: r.category });
                    }
                }
                None => delta.added.push(r.clone()),
            }
        }

        delta.removed = previous
            .iter()
            .zip(&matched)
            .filter(|(_, m)| !**m)
            .map(|(r, _)| r.clone())
            .collect();
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    //new findings that would be reported
    pub fn new_violations(&self) -> usize {
        self.added.iter().filter(|r| r.is_violation()).count()
            + self.changed.iter().filter(|c| c.to.is_violation()).count()
    }
}
