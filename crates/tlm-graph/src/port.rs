//! Port specifications.
//!
//! A port is a named, typed attachment point declared by a component. The
//! owning system keeps the binding state (which node, which peer); the
//! `PortSpec` itself is fixed at configure time and never changes afterwards.

use crate::domain::Domain;

/// Kind of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Bidirectional power port; connects to exactly one peer power port of
    /// the same domain.
    Power,
    /// Unidirectional signal input.
    Read,
    /// Unidirectional signal output.
    Write,
    /// Pass-through boundary of a subsystem; shadows an internal port.
    System,
}

/// Declaration of a port: fixed at construction.
#[derive(Debug, Clone)]
pub struct PortSpec {
    pub name: String,
    pub domain: Domain,
    pub kind: PortKind,
    /// Required ports must be connected before initialization; an
    /// unconnected not-required port gets a private default-valued node.
    pub required: bool,
    /// Per-slot start values applied to the bound node before the first step.
    pub start_values: Vec<(usize, f64)>,
}

impl PortSpec {
    pub fn new(name: impl Into<String>, domain: Domain, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            domain,
            kind,
            required: true,
            start_values: Vec::new(),
        }
    }

    pub fn not_required(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_start_value(mut self, slot: usize, value: f64) -> Self {
        self.set_start_value(slot, value);
        self
    }

    /// Set or replace the start value for one slot.
    pub fn set_start_value(&mut self, slot: usize, value: f64) {
        if let Some(entry) = self.start_values.iter_mut().find(|(s, _)| *s == slot) {
            entry.1 = value;
        } else {
            self.start_values.push((slot, value));
        }
    }

    /// Can this port be one end of a connection with `other`?
    ///
    /// Power pairs with power in the same domain; a signal write pairs with a
    /// signal read. A system port shadows an internal port of its subsystem
    /// and accepts any same-domain peer; the shadowed port settles the rest
    /// when the subsystem binds it.
    pub fn can_connect(&self, other: &PortSpec) -> bool {
        if self.domain != other.domain {
            return false;
        }
        matches!(
            (self.kind, other.kind),
            (PortKind::Power, PortKind::Power)
                | (PortKind::Write, PortKind::Read)
                | (PortKind::Read, PortKind::Write)
                | (PortKind::System, _)
                | (_, PortKind::System)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hydraulic;

    #[test]
    fn power_ports_pair_within_domain() {
        let a = PortSpec::new("P1", Domain::Hydraulic, PortKind::Power);
        let b = PortSpec::new("P2", Domain::Hydraulic, PortKind::Power);
        let c = PortSpec::new("P1", Domain::Mechanic, PortKind::Power);
        assert!(a.can_connect(&b));
        assert!(!a.can_connect(&c));
    }

    #[test]
    fn signal_ports_pair_write_to_read() {
        let w = PortSpec::new("out", Domain::Signal, PortKind::Write);
        let r = PortSpec::new("in", Domain::Signal, PortKind::Read);
        assert!(w.can_connect(&r));
        assert!(r.can_connect(&w));
        assert!(!w.can_connect(&w));
        assert!(!r.can_connect(&r));
    }

    #[test]
    fn start_values_replace_per_slot() {
        let mut spec = PortSpec::new("P1", Domain::Hydraulic, PortKind::Power)
            .with_start_value(hydraulic::PRESSURE, 1e5);
        spec.set_start_value(hydraulic::PRESSURE, 2e5);
        spec.set_start_value(hydraulic::FLOW, 0.0);
        assert_eq!(spec.start_values.len(), 2);
        assert_eq!(spec.start_values[0], (hydraulic::PRESSURE, 2e5));
    }
}
