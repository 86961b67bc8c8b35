//! Parallel pass partitioning.
//!
//! Components within one TLM pass may run concurrently when they touch
//! disjoint nodes; the schedule groups a pass into node-disjoint barrier
//! groups. Execution stays sequential here, but a multi-threaded runner can
//! take a group per worker set and barrier between groups.

use std::collections::HashSet;
use tlm_core::{CompId, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParallelSchedule {
    /// Barrier groups in execution order; components within a group touch
    /// disjoint node sets.
    pub groups: Vec<Vec<CompId>>,
}

impl ParallelSchedule {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn component_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

/// Greedy first-fit partition of one pass.
///
/// Each entry is a component with the set of nodes it reads or writes
/// during the pass. First-fit preserves registration order within groups.
pub fn partition(work: &[(CompId, Vec<NodeId>)]) -> ParallelSchedule {
    let mut groups: Vec<Vec<CompId>> = Vec::new();
    let mut group_nodes: Vec<HashSet<NodeId>> = Vec::new();

    for (id, nodes) in work {
        let slot = group_nodes
            .iter()
            .position(|g| nodes.iter().all(|n| !g.contains(n)));
        match slot {
            Some(i) => {
                groups[i].push(*id);
                group_nodes[i].extend(nodes.iter().copied());
            }
            None => {
                groups.push(vec![*id]);
                group_nodes.push(nodes.iter().copied().collect());
            }
        }
    }

    ParallelSchedule { groups }
}
