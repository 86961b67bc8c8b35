//! Node storage arena.
//!
//! One `NodeStore` serves an entire model tree, including nested subsystems;
//! a connection anywhere in the hierarchy shares a single node between its
//! two ports. Released nodes go on a free list so repeated connect and
//! disconnect cycles do not grow the arena.

use crate::domain::Domain;
use crate::error::{GraphError, GraphResult};
use tlm_core::NodeId;

/// A typed data buffer shared by the two ports of one connection.
#[derive(Debug, Clone)]
pub struct Node {
    domain: Domain,
    data: Vec<f64>,
}

impl Node {
    fn new(domain: Domain) -> Self {
        Self {
            domain,
            data: vec![0.0; domain.slot_count()],
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn slots(&self) -> &[f64] {
        &self.data
    }
}

/// Resolve-once handle into the node store.
///
/// Components cache these during `initialize()` instead of caching raw
/// pointers; reads and writes through a `SlotRef` are plain double indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    node: NodeId,
    slot: usize,
}

impl SlotRef {
    pub fn node(self) -> NodeId {
        self.node
    }

    pub fn slot(self) -> usize {
        self.slot
    }
}

/// Arena of nodes, indexed by `NodeId`.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node of the given domain, zero-initialized.
    ///
    /// Reuses a released slot when one is available.
    pub fn create(&mut self, domain: Domain) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.idx()] = Some(Node::new(domain));
            return id;
        }
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Some(Node::new(domain)));
        id
    }

    /// Release a node back to the free list (connection removed).
    pub fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.idx()) {
            if slot.take().is_some() {
                self.free.push(id);
            }
        }
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .ok_or(GraphError::DeadNode { node: id })
    }

    /// Resolve a (node, slot) pair into a cached handle.
    ///
    /// Out-of-range slots are rejected here, at resolve time; reads and
    /// writes through the returned handle never re-check.
    pub fn slot_ref(&self, id: NodeId, slot: usize) -> GraphResult<SlotRef> {
        let node = self.node(id)?;
        if slot >= node.data.len() {
            return Err(GraphError::SlotOutOfRange {
                domain: node.domain,
                slot,
                len: node.data.len(),
            });
        }
        Ok(SlotRef { node: id, slot })
    }

    /// Resolve a slot by name.
    pub fn slot_ref_by_name(&self, id: NodeId, name: &str) -> GraphResult<SlotRef> {
        let node = self.node(id)?;
        let slot = node
            .domain
            .slot_index(name)
            .ok_or_else(|| GraphError::UnknownSlot {
                domain: node.domain,
                name: name.to_string(),
            })?;
        Ok(SlotRef { node: id, slot })
    }

    /// Read through a resolved handle.
    ///
    /// A stale handle (released node) is a kernel bug and panics.
    #[inline]
    pub fn read(&self, r: SlotRef) -> f64 {
        match &self.nodes[r.node.idx()] {
            Some(node) => node.data[r.slot],
            None => unreachable!("read through stale SlotRef"),
        }
    }

    /// Write through a resolved handle.
    #[inline]
    pub fn write(&mut self, r: SlotRef, value: f64) {
        match &mut self.nodes[r.node.idx()] {
            Some(node) => node.data[r.slot] = value,
            None => unreachable!("write through stale SlotRef"),
        }
    }
}
