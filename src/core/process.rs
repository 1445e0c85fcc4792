// process classification: does this component exist in code?
/*

HLM names: source/target endpoints of type Process
SM names: non-blank process names of the extracted facts

Convergence: SM name ∈ HLM names
Absence: HLM name ∉ SM names
Divergence: SM name ∉ HLM names, plus one entry per entry point for facts without a process

*/
use tracing::{debug, warn};

use crate::core::entry::ReflexionEntry;
use crate::core::names::{names_match, OrderedNames};
use crate::core::state::EntityType;
use crate::core::types::{HlmEntity, SmEntity};

/// The three name sets the process passes partition.
#[derive(Debug, Clone, Default)]
pub struct ProcessNames {
    pub hlm_sources: OrderedNames,
    pub hlm_targets: OrderedNames,
    pub sm: OrderedNames,
}

impl ProcessNames {
    pub fn collect(hlm: &[HlmEntity], sm: &[SmEntity]) -> Self {
        let hlm_sources = hlm
            .iter()
            .map(HlmEntity::source)
            .filter(|c| c.is_process())
            .map(|c| c.name.as_str())
            .collect();
        let hlm_targets = hlm
            .iter()
            .map(HlmEntity::target)
            .filter(|c| c.is_process())
            .map(|c| c.name.as_str())
            .collect();
        let sm = sm
            .iter()
            .filter(|s| s.has_process())
            .map(|s| s.process_name.as_str())
            .collect();

        Self { hlm_sources, hlm_targets, sm }
    }

    pub fn in_hlm(&self, name: &str) -> bool {
        self.hlm_sources.contains(name) || self.hlm_targets.contains(name)
    }
}

fn hlm_touching(hlm: &[HlmEntity], name: &str) -> Vec<HlmEntity> {
    hlm.iter()
        .filter(|h| names_match(&h.source().name, name) || names_match(&h.target().name, name))
        .cloned()
        .collect()
}

fn sm_with_process(sm: &[SmEntity], name: &str) -> Vec<SmEntity> {
    sm.iter()
        .filter(|s| names_match(&s.process_name, name))
        .cloned()
        .collect()
}

/// Run the four process passes in order: convergence, absence, named divergence,
/// anonymous divergence.
pub fn classify_processes(hlm: &[HlmEntity], sm: &[SmEntity]) -> Vec<ReflexionEntry> {
    let names = ProcessNames::collect(hlm, sm);
    let mut out = Vec::new();

    //convergence: SM process also declared in the HLM
    for name in names.sm.iter().filter(|n| names.in_hlm(n)) {
        out.push(ReflexionEntry::convergence(
            EntityType::Process,
            name,
            hlm_touching(hlm, name),
            sm_with_process(sm, name),
        ));
    }

    //absence: declared process never seen in code
    let declared = names.hlm_sources.union(&names.hlm_targets);
    for name in declared.iter().filter(|n| !names.sm.contains(n)) {
        out.push(ReflexionEntry::absence(EntityType::Process, name, hlm_touching(hlm, name)));
    }

    //divergence: process in code that the HLM does not know
    for name in names.sm.iter().filter(|n| !names.in_hlm(n)) {
        out.push(ReflexionEntry::divergence(EntityType::Process, name, sm_with_process(sm, name)));
    }

    out.extend(anonymous_divergence(sm));

    debug!(
        sm_processes = names.sm.len(),
        hlm_processes = declared.len(),
        entries = out.len(),
        "classified processes"
    );
    out
}

/// Facts without a process name, grouped by entry point in first-seen order.
fn anonymous_divergence(sm: &[SmEntity]) -> Vec<ReflexionEntry> {
    let mut groups: Vec<(String, Vec<SmEntity>)> = Vec::new();

    for s in sm.iter().filter(|s| !s.has_process()) {
        //grouping is exact on the trimmed entry point
        let entry_point = s.entry_point.trim();
        match groups.iter_mut().find(|(ep, _)| ep == entry_point) {
            Some((_, facts)) => facts.push(s.clone()),
            None => groups.push((entry_point.to_string(), vec![s.clone()])),
        }
    }

    groups
        .into_iter()
        .map(|(entry_point, facts)| {
            if entry_point.is_empty() {
                warn!(facts = facts.len(), "source facts with neither process name nor entry point");
            }
            ReflexionEntry::divergence(EntityType::Process, entry_point, facts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Category, HLM_ONLY, SM_ONLY};
    use crate::core::types::{Component, ComponentType, Direction, Location};

    fn mk_hlm(src: (ComponentType, &str), name: &str, dst: (ComponentType, &str)) -> HlmEntity {
        HlmEntity::new(
            format!("{}-{}", src.1, dst.1),
            name,
            Component::new(src.1, src.0, src.1),
            Component::new(dst.1, dst.0, dst.1),
        )
    }

    fn mk_fact(process: &str, entry_point: &str, dataflow: &str, direction: Direction) -> SmEntity {
        SmEntity {
            entry_point: entry_point.into(),
            internal_call: format!("{entry_point}.call"),
            external_call: "Ext.Call".into(),
            process_name: process.into(),
            dataflow_name: dataflow.into(),
            direction,
            entry_point_location: Location::default(),
            internal_call_location: Location::default(),
        }
    }

    #[test]
    fn converges_on_process_seen_in_both_models() {
        let hlm = vec![mk_hlm((ComponentType::Process, "Gateway"), "Sync", (ComponentType::Process, "Worker"))];
        let sm = vec![
            mk_fact("gateway", "Gw.Main", "Sync", Direction::Push),
            mk_fact("Gateway", "Gw.Other", "Sync", Direction::Push),
        ];

        let out = classify_processes(&hlm, &sm);

        let gw = out.iter().find(|e| e.entity_key == "gateway").unwrap();
        assert_eq!(gw.category, Category::Convergence);
        assert!(gw.details.is_empty());
        assert_eq!(gw.hlm_matches.len(), 1);
        assert_eq!(gw.sm_matches.len(), 2, "both spellings belong to the same process");

        let worker = out.iter().find(|e| e.entity_key == "Worker").unwrap();
        assert_eq!(worker.category, Category::Absence);
        assert_eq!(worker.details, vec![HLM_ONLY.to_string()]);
        assert!(worker.sm_matches.is_empty());
        assert_eq!(worker.hlm_matches.len(), 1);
    }

    #[test]
    fn named_divergence_for_unknown_process() {
        let hlm = vec![mk_hlm((ComponentType::Actor, "User"), "Login", (ComponentType::Process, "AuthSvc"))];
        let sm = vec![mk_fact("Billing", "Billing.Run", "Charge", Direction::Push)];

        let out = classify_processes(&hlm, &sm);

        assert_eq!(out.len(), 2);
        assert_eq!((out[0].entity_key.as_str(), out[0].category), ("AuthSvc", Category::Absence));
        assert_eq!((out[1].entity_key.as_str(), out[1].category), ("Billing", Category::Divergence));
        assert_eq!(out[1].details, vec![SM_ONLY.to_string()]);
        assert!(out[1].hlm_matches.is_empty());
    }

    #[test]
    fn actors_and_stores_are_not_processes() {
        let hlm = vec![mk_hlm((ComponentType::Actor, "User"), "Save", (ComponentType::Store, "Db"))];
        let sm = vec![mk_fact("User", "User.Main", "Save", Direction::Push)];

        let out = classify_processes(&hlm, &sm);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_key, "User");
        assert_eq!(out[0].category, Category::Divergence);
    }

    #[test]
    fn anonymous_facts_group_by_entry_point() {
        let sm = vec![
            mk_fact("", "Handler.Run", "A", Direction::Push),
            mk_fact("  ", "Handler.Run ", "B", Direction::Pull),
            mk_fact("", "Other.Run", "", Direction::Unknown),
        ];

        let out = classify_processes(&[], &sm);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].entity_key, "Handler.Run");
        assert_eq!(out[0].category, Category::Divergence);
        assert_eq!(out[0].entity_type, EntityType::Process);
        assert_eq!(out[0].sm_matches.len(), 2);
        assert_eq!(out[1].entity_key, "Other.Run");
    }

    #[test]
    fn blank_hlm_process_is_absent_and_never_claims_anonymous_facts() {
        let hlm = vec![mk_hlm((ComponentType::Process, " "), "Sync", (ComponentType::Process, "Worker"))];
        let sm = vec![mk_fact("", "Anon.Run", "Sync", Direction::Push)];

        let out = classify_processes(&hlm, &sm);
        let got: Vec<_> = out.iter().map(|e| (e.entity_key.as_str(), e.category)).collect();

        assert_eq!(
            got,
            vec![
                ("", Category::Absence),
                ("Worker", Category::Absence),
                ("Anon.Run", Category::Divergence),
            ]
        );
        assert_eq!(out[0].hlm_matches, hlm);
        assert_eq!(out[2].sm_matches, sm);
    }

    #[test]
    fn facts_without_process_or_entry_point_share_a_blank_key() {
        let sm = vec![
            mk_fact("", "", "A", Direction::Push),
            mk_fact("", "Handler.Run", "B", Direction::Push),
            mk_fact(" ", "  ", "", Direction::Unknown),
        ];

        let out = classify_processes(&[], &sm);

        assert_eq!(out.len(), 2);
        assert_eq!((out[0].entity_key.as_str(), out[0].category), ("", Category::Divergence));
        assert_eq!(out[0].sm_matches, vec![sm[0].clone(), sm[2].clone()]);
        assert_eq!(out[1].entity_key, "Handler.Run");
    }

    #[test]
    fn passes_emit_in_fixed_order() {
        let hlm = vec![
            mk_hlm((ComponentType::Process, "A"), "f", (ComponentType::Process, "B")),
            mk_hlm((ComponentType::Process, "C"), "g", (ComponentType::Store, "S")),
        ];
        let sm = vec![
            mk_fact("Z", "Z.Main", "x", Direction::Push),
            mk_fact("", "Anon.Main", "", Direction::Unknown),
            mk_fact("C", "C.Main", "g", Direction::Push),
        ];

        let out = classify_processes(&hlm, &sm);
        let got: Vec<_> = out.iter().map(|e| (e.entity_key.as_str(), e.category)).collect();

        assert_eq!(
            got,
            vec![
                ("C", Category::Convergence),
                ("A", Category::Absence),
                ("B", Category::Absence),
                ("Z", Category::Divergence),
                ("Anon.Main", Category::Divergence),
            ]
        );
    }
}
