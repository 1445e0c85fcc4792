use proptest::prelude::*;
use reflexion_modeler::core::dataflow::classify_dataflows;
use reflexion_modeler::core::process::classify_processes;
use reflexion_modeler::{
    classify, Category, Component, ComponentType, Direction, EntityType, HlmEntity, Location, SmEntity,
};

const PROCESSES: [&str; 4] = ["Api", "Worker", "Db", "User"];
const FLOWS: [&str; 3] = ["Orders", "Sync", "Login"];

fn component() -> impl Strategy<Value = Component> {
    (
        prop::sample::select(PROCESSES.to_vec()),
        prop::sample::select(vec![ComponentType::Process, ComponentType::Actor, ComponentType::Store]),
    )
        .prop_map(|(name, ty)| Component::new(format!("c-{name}"), ty, name))
}

fn hlm() -> impl Strategy<Value = Vec<HlmEntity>> {
    prop::collection::vec((component(), prop::sample::select(FLOWS.to_vec()), component()), 0..6).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (src, flow, dst))| HlmEntity::new(format!("df-{i}"), flow, src, dst))
            .collect()
    })
}

//every fact gets its own entry point so facts are distinct values
fn sm() -> impl Strategy<Value = Vec<SmEntity>> {
    let process = prop::sample::select(vec!["Api", "Worker", "Db", "User", "Billing", ""]);
    let direction = prop::sample::select(vec![Direction::Push, Direction::Pull, Direction::Unknown]);
    prop::collection::vec((process, prop::sample::select(FLOWS.to_vec()), direction), 0..12).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (process, flow, direction))| SmEntity {
                entry_point: format!("Entry{i}.Run"),
                internal_call: format!("Entry{i}.Call"),
                external_call: "Dataflow.Push".into(),
                process_name: process.into(),
                dataflow_name: if direction == Direction::Unknown { String::new() } else { flow.into() },
                direction,
                entry_point_location: Location::default(),
                internal_call_location: Location::default(),
            })
            .collect()
    })
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() })
        .collect()
}

fn shape(entries: &[reflexion_modeler::ReflexionEntry]) -> Vec<(EntityType, Category)> {
    entries.iter().map(|e| (e.entity_type, e.category)).collect()
}

proptest! {
    #[test]
    fn every_hlm_flow_yields_exactly_one_dataflow_entry(hlm in hlm(), sm in sm()) {
        let out = classify_dataflows(&hlm, &sm);
        let declared: Vec<_> = out.iter().filter(|e| e.category != Category::Divergence).collect();

        prop_assert_eq!(declared.len(), hlm.len());
        for (entry, h) in declared.iter().zip(&hlm) {
            prop_assert_eq!(&entry.hlm_matches, &vec![h.clone()]);
        }
        prop_assert!(out.iter().filter(|e| e.category == Category::Divergence).all(|e| e.hlm_matches.is_empty()));
    }

    #[test]
    fn every_fact_is_claimed_or_diverges_once(hlm in hlm(), sm in sm()) {
        let out = classify_dataflows(&hlm, &sm);

        for fact in &sm {
            let claimed = out
                .iter()
                .any(|e| e.category == Category::Convergence && e.sm_matches.contains(fact));
            let diverged = out
                .iter()
                .filter(|e| e.category == Category::Divergence && e.sm_matches.contains(fact))
                .count();
            prop_assert!(claimed != (diverged == 1), "fact {:?}: claimed={} diverged={}", fact, claimed, diverged);
            prop_assert!(diverged <= 1);
        }
    }

    #[test]
    fn every_fact_lands_in_exactly_one_process_entry(hlm in hlm(), sm in sm()) {
        let out = classify_processes(&hlm, &sm);

        for fact in &sm {
            let hits = out.iter().filter(|e| e.sm_matches.contains(fact)).count();
            prop_assert_eq!(hits, 1);
        }
        prop_assert!(out.iter().all(|e| e.entity_type == EntityType::Process));
    }

    #[test]
    fn dataflow_names_match_regardless_of_case(hlm in hlm(), sm in sm()) {
        let flipped_hlm: Vec<HlmEntity> = hlm
            .iter()
            .cloned()
            .map(|mut h| { h.flow.name = swap_case(&h.flow.name); h })
            .collect();
        let flipped_sm: Vec<SmEntity> = sm
            .iter()
            .cloned()
            .map(|mut s| { s.dataflow_name = swap_case(&s.dataflow_name); s })
            .collect();

        prop_assert_eq!(shape(&classify(&hlm, &sm)), shape(&classify(&flipped_hlm, &sm)));
        prop_assert_eq!(shape(&classify(&hlm, &sm)), shape(&classify(&hlm, &flipped_sm)));
    }

    #[test]
    fn process_classification_ignores_process_name_case(hlm in hlm(), sm in sm()) {
        let upper: Vec<SmEntity> = sm
            .iter()
            .cloned()
            .map(|mut s| { s.process_name = s.process_name.to_uppercase(); s })
            .collect();

        prop_assert_eq!(shape(&classify_processes(&hlm, &sm)), shape(&classify_processes(&hlm, &upper)));
    }

    #[test]
    fn classification_is_idempotent(hlm in hlm(), sm in sm()) {
        prop_assert_eq!(classify(&hlm, &sm), classify(&hlm, &sm));
    }
}
