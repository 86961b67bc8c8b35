//! Signal component ordering.
//!
//! Signal components run once per step in data-flow order: a component is
//! scheduled only after every component feeding its inputs. The sort is a
//! repeated sweep over the unscheduled components in registration order,
//! which keeps the result deterministic for a given build sequence. Unit
//! delays are always ready, so a feedback loop through one schedules; a loop
//! without one leaves components unscheduled and fails, naming them.

use crate::error::{SimError, SimResult};
use std::collections::HashMap;
use tlm_core::{CompId, NodeId};

/// Per-component sorting facts, gathered by the owning system.
#[derive(Debug, Clone)]
pub struct SortEntry {
    pub id: CompId,
    pub name: String,
    pub breaks_loop: bool,
    /// Nodes read by connected input ports.
    pub reads: Vec<NodeId>,
    /// Nodes written by output ports.
    pub writes: Vec<NodeId>,
}

pub fn sort_signal(entries: &[SortEntry]) -> SimResult<Vec<CompId>> {
    let mut writer: HashMap<NodeId, CompId> = HashMap::new();
    for e in entries {
        for &n in &e.writes {
            writer.insert(n, e.id);
        }
    }

    let mut scheduled: Vec<CompId> = Vec::with_capacity(entries.len());
    let mut done = vec![false; entries.len()];

    loop {
        let mut progressed = false;
        for (i, e) in entries.iter().enumerate() {
            if done[i] {
                continue;
            }
            let ready = e.breaks_loop
                || e.reads.iter().all(|n| match writer.get(n) {
                    // Inputs fed from outside this set count as resolved.
                    None => true,
                    Some(w) => scheduled.contains(w),
                });
            if ready {
                scheduled.push(e.id);
                done[i] = true;
                progressed = true;
            }
        }
        if scheduled.len() == entries.len() {
            return Ok(scheduled);
        }
        if !progressed {
            let stuck: Vec<&str> = entries
                .iter()
                .enumerate()
                .filter(|(i, _)| !done[*i])
                .map(|(_, e)| e.name.as_str())
                .collect();
            return Err(SimError::Sort {
                what: format!("algebraic loop involving: {}", stuck.join(", ")),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(idx: u32, name: &str, reads: &[u32], writes: &[u32]) -> SortEntry {
        SortEntry {
            id: CompId::from_index(idx),
            name: name.to_string(),
            breaks_loop: false,
            reads: reads.iter().map(|&n| NodeId::from_index(n)).collect(),
            writes: writes.iter().map(|&n| NodeId::from_index(n)).collect(),
        }
    }

    #[test]
    fn chain_sorts_source_first() {
        // sink registered first, then gain, then source; data flow is
        // source(w0) -> gain(r0, w1) -> sink(r1).
        let entries = vec![
            entry(0, "sink", &[1], &[]),
            entry(1, "gain", &[0], &[1]),
            entry(2, "source", &[], &[0]),
        ];
        let order = sort_signal(&entries).unwrap();
        assert_eq!(
            order,
            vec![
                CompId::from_index(2),
                CompId::from_index(1),
                CompId::from_index(0)
            ]
        );
    }

    #[test]
    fn registration_order_kept_among_independent() {
        let entries = vec![
            entry(0, "a", &[], &[0]),
            entry(1, "b", &[], &[1]),
            entry(2, "c", &[], &[2]),
        ];
        let order = sort_signal(&entries).unwrap();
        assert_eq!(
            order,
            vec![
                CompId::from_index(0),
                CompId::from_index(1),
                CompId::from_index(2)
            ]
        );
    }

    #[test]
    fn loop_without_delay_fails_naming_members() {
        // a reads what b writes and vice versa.
        let entries = vec![entry(0, "a", &[1], &[0]), entry(1, "b", &[0], &[1])];
        let err = sort_signal(&entries).unwrap_err();
        match err {
            SimError::Sort { what } => {
                assert!(what.contains("a") && what.contains("b"), "{what}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unit_delay_breaks_the_loop() {
        let mut delay = entry(0, "delay", &[1], &[0]);
        delay.breaks_loop = true;
        let entries = vec![delay, entry(1, "gain", &[0], &[1])];
        let order = sort_signal(&entries).unwrap();
        assert_eq!(
            order,
            vec![CompId::from_index(0), CompId::from_index(1)]
        );
    }

    #[test]
    fn external_inputs_count_as_resolved() {
        // reads node 7 which nothing in the set writes.
        let entries = vec![entry(0, "reader", &[7], &[])];
        assert_eq!(sort_signal(&entries).unwrap().len(), 1);
    }
}
