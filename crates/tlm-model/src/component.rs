//! The component trait and its lifecycle contexts.

use crate::error::{ModelError, ModelResult};
use crate::messages::MessageHub;
use crate::params::ParameterSet;
use tlm_core::{NodeId, PortId};
use tlm_graph::{Domain, NodeStore, PortKind, PortSpec, SlotRef};

/// Causality class of a component.
///
/// Immutable after construction; decides which half of each timestep the
/// component participates in. C components write wave variables and
/// characteristic impedances, Q components write flows and intensities,
/// Signal components run first each step in dependency order. `System` is a
/// plain container system; a subsystem embedded as a TLM boundary is
/// declared `C` or `Q` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CqsType {
    C,
    Q,
    Signal,
    System,
}

impl std::fmt::Display for CqsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CqsType::C => "C",
            CqsType::Q => "Q",
            CqsType::Signal => "Signal",
            CqsType::System => "System",
        };
        f.write_str(s)
    }
}

/// Collects the ports and parameters a component declares in `configure`.
///
/// Port ids are declaration indices, local to the component.
#[derive(Debug, Default)]
pub struct Setup {
    ports: Vec<PortSpec>,
    params: ParameterSet,
}

impl Setup {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_port(&mut self, spec: PortSpec) -> PortId {
        let id = PortId::from_index(self.ports.len() as u32);
        self.ports.push(spec);
        id
    }

    /// Declare a bidirectional power port of the given domain.
    pub fn add_power_port(&mut self, name: &str, domain: Domain) -> PortId {
        self.push_port(PortSpec::new(name, domain, PortKind::Power))
    }

    /// Declare a signal input. Signal inputs are not required; an
    /// unconnected one reads its default-valued private node.
    pub fn add_read_port(&mut self, name: &str) -> PortId {
        self.push_port(PortSpec::new(name, Domain::Signal, PortKind::Read).not_required())
    }

    /// Declare a signal output.
    pub fn add_write_port(&mut self, name: &str) -> PortId {
        self.push_port(PortSpec::new(name, Domain::Signal, PortKind::Write).not_required())
    }

    /// Declare a subsystem pass-through port (used by container systems
    /// when they expose an internal port to their parent).
    pub fn add_system_port(&mut self, name: &str, domain: Domain) -> PortId {
        self.push_port(PortSpec::new(name, domain, PortKind::System))
    }

    /// Mark a previously declared port as optional.
    pub fn set_not_required(&mut self, port: PortId) {
        self.ports[port.idx()].required = false;
    }

    /// Declare a start value for one slot of a port's node, applied before
    /// the first timestep.
    pub fn set_start_value(&mut self, port: PortId, slot: usize, value: f64) {
        self.ports[port.idx()].set_start_value(slot, value);
    }

    /// Register a parameter: name, description, unit and default value.
    pub fn register_parameter(&mut self, name: &str, description: &str, unit: &str, default: f64) {
        self.params.register(name, description, unit, default);
    }

    pub fn ports(&self) -> &[PortSpec] {
        &self.ports
    }

    pub fn into_parts(self) -> (Vec<PortSpec>, ParameterSet) {
        (self.ports, self.params)
    }
}

/// Runtime context handed to `initialize` and `simulate_one_timestep`.
///
/// Borrows the shared node store and this component's port bindings; `time`
/// is the current simulation time (already advanced for the step being
/// computed) and `timestep` the fixed step size inherited from the owning
/// system.
pub struct SimContext<'a> {
    pub store: &'a mut NodeStore,
    pub params: &'a ParameterSet,
    pub hub: &'a mut MessageHub,
    bindings: &'a [Option<NodeId>],
    connected: &'a [bool],
    pub time: f64,
    pub timestep: f64,
}

impl<'a> SimContext<'a> {
    pub fn new(
        store: &'a mut NodeStore,
        params: &'a ParameterSet,
        hub: &'a mut MessageHub,
        bindings: &'a [Option<NodeId>],
        connected: &'a [bool],
        time: f64,
        timestep: f64,
    ) -> Self {
        Self {
            store,
            params,
            hub,
            bindings,
            connected,
            time,
            timestep,
        }
    }

    /// Whether the port has a peer. Unconnected optional ports are still
    /// bound (to a private node); this tells them apart.
    pub fn is_connected(&self, port: PortId) -> bool {
        self.connected.get(port.idx()).copied().unwrap_or(false)
    }

    /// Node bound to one of this component's ports.
    pub fn node(&self, port: PortId) -> ModelResult<NodeId> {
        self.bindings
            .get(port.idx())
            .copied()
            .flatten()
            .ok_or(ModelError::UnboundPort { port })
    }

    /// Resolve a slot handle for caching; the usual first line of an
    /// `initialize` implementation.
    pub fn slot(&self, port: PortId, slot: usize) -> ModelResult<SlotRef> {
        let node = self.node(port)?;
        Ok(self.store.slot_ref(node, slot)?)
    }

    #[inline]
    pub fn read(&self, r: SlotRef) -> f64 {
        self.store.read(r)
    }

    #[inline]
    pub fn write(&mut self, r: SlotRef, value: f64) {
        self.store.write(r, value);
    }
}

/// A value that is either a plain parameter or fed by a signal port.
///
/// The common "input variable" pattern: a component declares both a
/// parameter and an optional read port of the same name, and resolves which
/// one applies when connections are final.
#[derive(Debug, Clone, Copy)]
pub enum InputValue {
    Port(SlotRef),
    Literal(f64),
}

impl InputValue {
    /// Use the port when connected, the parameter otherwise.
    pub fn resolve(ctx: &SimContext<'_>, port: PortId, param: &str) -> ModelResult<Self> {
        if ctx.is_connected(port) {
            Ok(InputValue::Port(ctx.slot(port, 0)?))
        } else {
            Ok(InputValue::Literal(ctx.params.value(param)?))
        }
    }

    #[inline]
    pub fn get(&self, ctx: &SimContext<'_>) -> f64 {
        match *self {
            InputValue::Port(r) => ctx.read(r),
            InputValue::Literal(v) => v,
        }
    }
}

/// A simulation component.
///
/// Lifecycle: `configure` (declare ports and parameters, once) →
/// `initialize` (resolve slot handles, reset numerical state, once per run)
/// → `simulate_one_timestep` (every step) → `finalize`.
pub trait Component {
    /// Registry key of this component type.
    fn type_name(&self) -> &'static str;

    /// Causality class; must never change over the component's lifetime.
    fn cqs_type(&self) -> CqsType;

    /// Declare ports and parameters. Called once when the component is
    /// added to a system.
    fn configure(&mut self, setup: &mut Setup);

    /// Resolve node slot handles and reset internal numerical state from
    /// current node values and parameters. Called once after all
    /// connections are final, before the first timestep.
    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()>;

    /// Advance one fixed timestep. Must write every output slot it owns
    /// exactly once; numerical guards (cavitation, saturation) are handled
    /// internally, never by the kernel.
    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>);

    /// Release per-run resources. Optional.
    fn finalize(&mut self) {}

    /// True for elements whose output does not depend on the current-step
    /// input (unit delays). The signal sorter may schedule such a component
    /// before its input source, which is how algebraic loops are broken.
    fn breaks_signal_loop(&self) -> bool {
        false
    }
}
