// dataflow classification: does this specific labeled flow exist in code?
/*

Push fact: the process is the flow's source
Pull fact: the process is the flow's target

Convergent: every Process endpoint of the HLM flow has a matching fact
Absent: a required match is missing (or no endpoint is a Process)
Divergent: a fact that no convergent flow claimed

*/
use std::collections::HashSet;

use tracing::debug;

use crate::core::entry::ReflexionEntry;
use crate::core::names::names_match;
use crate::core::state::EntityType;
use crate::core::types::{Direction, HlmEntity, SmEntity};

/// Which side(s) of an HLM flow must be observed in code for it to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointPolicy {
    //Process -> Process
    Both,
    //Process -> Store/Actor
    PushOnly,
    //Store/Actor -> Process
    PullOnly,
    //nothing on either side runs code
    Neither,
}

impl EndpointPolicy {
    pub fn for_flow(h: &HlmEntity) -> Self {
        match (h.source().is_process(), h.target().is_process()) {
            (true, true) => EndpointPolicy::Both,
            (true, false) => EndpointPolicy::PushOnly,
            (false, true) => EndpointPolicy::PullOnly,
            (false, false) => EndpointPolicy::Neither,
        }
    }
}

pub fn dataflow_key(h: &HlmEntity) -> String {
    format!("{}->{}->{}", h.source().name, h.flow.name.trim(), h.target().name)
}

/// Key of a fact nobody claimed. `...` marks the endpoint the code does not tell us.
pub fn divergence_key(s: &SmEntity) -> String {
    let process = s.display_process();
    match s.direction {
        Direction::Push => format!("{}->{}->...", process, s.dataflow_name),
        Direction::Pull => format!("...->{}->{}", s.dataflow_name, process),
        Direction::Unknown => format!("{}:{}:{}", process, s.internal_call, s.external_call),
    }
}

//dataflow names compare case-insensitively, process names exactly; a blank name never matches
fn matching_facts<'a>(sm: &'a [SmEntity], flow_name: &str, direction: Direction, process: &str) -> Vec<&'a SmEntity> {
    let process = process.trim();
    if process.is_empty() || flow_name.trim().is_empty() {
        return Vec::new();
    }
    sm.iter()
        .filter(|s| {
            s.direction == direction && names_match(&s.dataflow_name, flow_name) && s.process_name.trim() == process
        })
        .collect()
}

/// Facts claimed by one HLM flow. Empty means the flow is absent.
pub fn required_matches<'a>(h: &HlmEntity, sm: &'a [SmEntity]) -> Vec<&'a SmEntity> {
    let name = h.flow.name.trim();
    let push = || matching_facts(sm, name, Direction::Push, &h.source().name);
    let pull = || matching_facts(sm, name, Direction::Pull, &h.target().name);

    match EndpointPolicy::for_flow(h) {
        EndpointPolicy::Both => {
            let (push, pull) = (push(), pull());
            if push.is_empty() || pull.is_empty() {
                Vec::new()
            } else {
                push.into_iter().chain(pull).collect()
            }
        }
        EndpointPolicy::PushOnly => push(),
        EndpointPolicy::PullOnly => pull(),
        EndpointPolicy::Neither => Vec::new(),
    }
}

/// One entry per HLM flow (in HLM order), then one divergence entry per
/// distinct unclaimed fact (in SM order of first occurrence).
///
/// Facts are compared by value: identical extraction rows are one fact.
pub fn classify_dataflows(hlm: &[HlmEntity], sm: &[SmEntity]) -> Vec<ReflexionEntry> {
    let mut claimed: HashSet<&SmEntity> = HashSet::new();
    let mut out = Vec::with_capacity(hlm.len());

    for h in hlm {
        let key = dataflow_key(h);
        let matched = required_matches(h, sm);

        if matched.is_empty() {
            debug!(flow = %key, policy = ?EndpointPolicy::for_flow(h), "dataflow absent");
            out.push(ReflexionEntry::absence(EntityType::Dataflow, key, vec![h.clone()]));
        } else {
            debug!(flow = %key, facts = matched.len(), "dataflow converges");
            claimed.extend(matched.iter().copied());
            let facts = matched.into_iter().cloned().collect();
            out.push(ReflexionEntry::convergence(EntityType::Dataflow, key, vec![h.clone()], facts));
        }
    }

    //set difference: inserting into `claimed` also drops repeats of an emitted fact
    for s in sm {
        if claimed.insert(s) {
            out.push(ReflexionEntry::divergence(EntityType::Dataflow, divergence_key(s), vec![s.clone()]));
        }
    }

    out
}
