//! Execution-plan construction: deprecation closure, dependency
//! validation and deterministic topological ordering.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::check::CheckDescriptor;
use crate::error::{ReviewError, Result};

/// Produce the ordered execution plan for the descriptors surviving
/// registry and selection filtering.
///
/// Deprecated checks are dropped to a fixed point, every `needs` edge is
/// validated, and the remainder is topologically sorted with ties broken
/// by group name then check name, so the plan is identical across runs.
///
/// # Errors
/// `UnresolvedDependency` when a surviving check needs an unknown or
/// removed name; `CyclicDependency` when the needs graph has a cycle.
pub fn resolve(descriptors: &[CheckDescriptor]) -> Result<Vec<CheckDescriptor>> {
    let survivors = apply_deprecations(descriptors);
    validate_needs(&survivors)?;
    detect_cycles(&survivors)?;
    order(&survivors)
}

/// Remove every check that a surviving check deprecates. A deprecation
/// only counts while its declaring check survives, so removing a
/// deprecator retracts its deprecations; the removal set is recomputed
/// from the survivors until it stops changing. Cyclic deprecation never
/// settles; the loop then stops at the first repeated state, dropping
/// the cycle members.
fn apply_deprecations(descriptors: &[CheckDescriptor]) -> Vec<CheckDescriptor> {
    let mut removed: BTreeSet<String> = BTreeSet::new();
    let mut seen: Vec<BTreeSet<String>> = Vec::new();
    loop {
        let next: BTreeSet<String> = descriptors
            .iter()
            .filter(|d| !removed.contains(&d.name))
            .flat_map(|d| d.deprecates.iter().cloned())
            .collect();
        if next == removed || seen.contains(&next) {
            break;
        }
        seen.push(std::mem::replace(&mut removed, next));
    }
    for name in &removed {
        debug!("{name} is deprecated, dropped from the plan");
    }
    descriptors
        .iter()
        .filter(|d| !removed.contains(&d.name))
        .cloned()
        .collect()
}

fn validate_needs(survivors: &[CheckDescriptor]) -> Result<()> {
    let known: HashSet<&str> = survivors.iter().map(|d| d.name.as_str()).collect();
    for desc in survivors {
        for need in &desc.needs {
            if !known.contains(need.as_str()) {
                return Err(ReviewError::UnresolvedDependency {
                    check: desc.name.clone(),
                    missing: need.clone(),
                });
            }
        }
    }
    Ok(())
}

fn detect_cycles(survivors: &[CheckDescriptor]) -> Result<()> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for desc in survivors {
        nodes.insert(&desc.name, graph.add_node(desc.name.clone()));
    }
    for desc in survivors {
        for need in &desc.needs {
            // Edge from dependency to dependent: toposort yields needs first.
            graph.add_edge(nodes[need.as_str()], nodes[desc.name.as_str()], ());
        }
    }
    match petgraph::algo::toposort(&graph, None) {
        Ok(_) => Ok(()),
        Err(cycle) => Err(ReviewError::CyclicDependency {
            cycle: find_cycle_path(&graph, cycle.node_id()),
        }),
    }
}

/// Walk outgoing edges from a node known to sit on a cycle, for the error
/// message.
fn find_cycle_path(graph: &DiGraph<String, ()>, start: NodeIndex) -> String {
    let mut path = vec![graph[start].clone()];
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut current = start;

    while let Some(edge) = graph.edges(current).next() {
        let target = edge.target();
        path.push(graph[target].clone());
        if target == start || visited.contains(&target) {
            break;
        }
        visited.insert(target);
        current = target;
    }
    path.join(" -> ")
}

/// Kahn's algorithm with a sorted ready set: among checks whose needs are
/// all placed, the (group, name) minimum goes next.
fn order(survivors: &[CheckDescriptor]) -> Result<Vec<CheckDescriptor>> {
    let by_name: BTreeMap<&str, &CheckDescriptor> =
        survivors.iter().map(|d| (d.name.as_str(), d)).collect();

    let mut indegree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for desc in survivors {
        indegree.insert(&desc.name, desc.needs.len());
        for need in &desc.needs {
            dependents
                .entry(need.as_str())
                .or_default()
                .push(&desc.name);
        }
    }

    let mut ready: BTreeSet<(String, String)> = survivors
        .iter()
        .filter(|d| d.needs.is_empty())
        .map(CheckDescriptor::order_key)
        .collect();

    let mut plan = Vec::with_capacity(survivors.len());
    while let Some(key) = ready.first().cloned() {
        ready.remove(&key);
        let desc = by_name[key.1.as_str()];
        plan.push(desc.clone());
        for dependent in dependents.get(key.1.as_str()).into_iter().flatten() {
            let remaining = indegree
                .get_mut(dependent)
                .expect("dependent is a survivor");
            *remaining -= 1;
            if *remaining == 0 {
                ready.insert(by_name[dependent].order_key());
            }
        }
    }

    // Cycles are caught earlier; a short plan here would be a logic error.
    debug_assert_eq!(plan.len(), survivors.len());
    Ok(plan)
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
