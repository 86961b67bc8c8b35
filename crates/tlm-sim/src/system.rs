//! The component system: ownership, connections, and the simulation loop.
//!
//! A `System` owns its components, the connection list, and the derived
//! execution order. Each simulation step advances time first, then runs the
//! three passes: Signal components in sorted data-flow order, then all
//! C-type, then all Q-type components. A system also implements `Component`
//! so it can be embedded in a parent system as a C or Q subsystem; its
//! system ports bind the parent-side node directly onto the shadowed
//! internal port, so crossing the boundary costs nothing and adds no delay.

use crate::error::{SimError, SimResult};
use crate::logger::SimLogger;
use crate::scheduler::{partition, ParallelSchedule};
use crate::sort::{sort_signal, SortEntry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tlm_core::numeric::num_steps;
use tlm_core::{CompId, NodeId, PortId};
use tlm_graph::{NodeStore, PortKind, PortSpec};
use tlm_model::{
    Component, CqsType, MessageHub, ModelError, ModelResult, ParameterSet, Setup, SimContext,
};

/// Cooperative cancellation handle; checked between steps, never mid-step.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A (component, port) pair within one system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub comp: CompId,
    pub port: PortId,
}

#[derive(Debug, Clone, Copy)]
struct Connection {
    a: Endpoint,
    b: Endpoint,
    node: NodeId,
}

#[derive(Debug)]
struct PortRecord {
    spec: PortSpec,
    node: Option<NodeId>,
    /// True when a peer (or the parent, through a system port) shares the
    /// node; a private default node leaves this false.
    connected: bool,
}

struct CompEntry {
    name: String,
    comp: Box<dyn Component>,
    ports: Vec<PortRecord>,
    params: ParameterSet,
    // Binding caches rebuilt at initialize, read every step.
    bound: Vec<Option<NodeId>>,
    conn: Vec<bool>,
}

#[derive(Debug)]
struct SystemPortRec {
    name: String,
    inner: Endpoint,
}

#[derive(Debug, Clone)]
struct LogRequest {
    endpoint: Endpoint,
    slot: usize,
    label: String,
}

/// Execution order derived at initialization.
#[derive(Debug, Clone, Default)]
pub struct SimOrder {
    pub signal: Vec<CompId>,
    pub c: Vec<CompId>,
    pub q: Vec<CompId>,
}

pub struct System {
    name: String,
    boundary: CqsType,
    comps: Vec<CompEntry>,
    by_name: HashMap<String, CompId>,
    connections: Vec<Connection>,
    system_ports: Vec<SystemPortRec>,
    log_requests: Vec<LogRequest>,
    logger: SimLogger,
    order: SimOrder,
    time: f64,
    timestep: f64,
    stop: StopFlag,
    initialized: bool,
    numeric_warned: bool,
}

impl System {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boundary: CqsType::System,
            comps: Vec::new(),
            by_name: HashMap::new(),
            connections: Vec::new(),
            system_ports: Vec::new(),
            log_requests: Vec::new(),
            logger: SimLogger::new(),
            order: SimOrder::default(),
            time: 0.0,
            timestep: 1e-3,
            stop: StopFlag::new(),
            initialized: false,
            numeric_warned: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn set_timestep(&mut self, dt: f64) -> SimResult<()> {
        if dt <= 0.0 || !dt.is_finite() {
            return Err(SimError::InvalidArg {
                what: "timestep must be positive and finite",
            });
        }
        self.timestep = dt;
        Ok(())
    }

    /// Declare what this system looks like when embedded in a parent. Only
    /// C and Q make sense across a TLM boundary.
    pub fn set_boundary(&mut self, cqs: CqsType) -> SimResult<()> {
        match cqs {
            CqsType::C | CqsType::Q => {
                self.boundary = cqs;
                Ok(())
            }
            _ => Err(SimError::InvalidArg {
                what: "subsystem boundary must be C or Q",
            }),
        }
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn logger(&self) -> &SimLogger {
        &self.logger
    }

    pub fn set_log_samples(&mut self, n: usize) {
        self.logger.set_num_samples(n);
    }

    /// Add a component under a unique name. The component's `configure`
    /// runs here, fixing its ports and parameters.
    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        mut comp: Box<dyn Component>,
    ) -> SimResult<CompId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(SimError::DuplicateName { name });
        }
        let mut setup = Setup::new();
        comp.configure(&mut setup);
        let (specs, params) = setup.into_parts();

        let id = CompId::from_index(self.comps.len() as u32);
        let ports = specs
            .into_iter()
            .map(|spec| PortRecord {
                spec,
                node: None,
                connected: false,
            })
            .collect();
        self.by_name.insert(name.clone(), id);
        self.comps.push(CompEntry {
            name,
            comp,
            ports,
            params,
            bound: Vec::new(),
            conn: Vec::new(),
        });
        self.invalidate();
        Ok(id)
    }

    pub fn component_id(&self, name: &str) -> SimResult<CompId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownComponent {
                name: name.to_string(),
            })
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.comps.iter().map(|e| e.name.as_str())
    }

    pub fn component_count(&self) -> usize {
        self.comps.len()
    }

    fn endpoint(&self, comp: &str, port: &str) -> SimResult<Endpoint> {
        let comp_id = self.component_id(comp)?;
        let entry = &self.comps[comp_id.idx()];
        let port_idx = entry
            .ports
            .iter()
            .position(|p| p.spec.name == port)
            .ok_or_else(|| SimError::UnknownPort {
                comp: comp.to_string(),
                port: port.to_string(),
            })?;
        Ok(Endpoint {
            comp: comp_id,
            port: PortId::from_index(port_idx as u32),
        })
    }

    fn record(&self, ep: Endpoint) -> &PortRecord {
        &self.comps[ep.comp.idx()].ports[ep.port.idx()]
    }

    fn record_mut(&mut self, ep: Endpoint) -> &mut PortRecord {
        &mut self.comps[ep.comp.idx()].ports[ep.port.idx()]
    }

    /// Node currently bound to a component port, if any.
    pub fn node_of(&self, comp: &str, port: &str) -> SimResult<Option<NodeId>> {
        Ok(self.record(self.endpoint(comp, port)?).node)
    }

    pub fn set_parameter(&mut self, comp: &str, param: &str, value: f64) -> SimResult<()> {
        let id = self.component_id(comp)?;
        self.comps[id.idx()].params.set(param, value)?;
        Ok(())
    }

    pub fn parameter(&self, comp: &str, param: &str) -> SimResult<f64> {
        let id = self.component_id(comp)?;
        Ok(self.comps[id.idx()].params.value(param)?)
    }

    /// Override a port start value before initialization; `slot` is the
    /// domain's slot name ("Pressure", "Flow", ...).
    pub fn set_start_value(
        &mut self,
        comp: &str,
        port: &str,
        slot: &str,
        value: f64,
    ) -> SimResult<()> {
        let ep = self.endpoint(comp, port)?;
        let rec = self.record_mut(ep);
        let idx = rec.spec.domain.slot_index(slot).ok_or_else(|| {
            SimError::Graph(tlm_graph::GraphError::UnknownSlot {
                domain: rec.spec.domain,
                name: slot.to_string(),
            })
        })?;
        rec.spec.set_start_value(idx, value);
        Ok(())
    }

    /// Register a node slot for logging, addressed as component / port /
    /// slot name. Resolved against the bound node at initialization.
    pub fn add_log(&mut self, comp: &str, port: &str, slot: &str) -> SimResult<()> {
        let ep = self.endpoint(comp, port)?;
        let domain = self.record(ep).spec.domain;
        let idx = domain.slot_index(slot).ok_or_else(|| {
            SimError::Graph(tlm_graph::GraphError::UnknownSlot {
                domain,
                name: slot.to_string(),
            })
        })?;
        self.log_requests.push(LogRequest {
            endpoint: ep,
            slot: idx,
            label: format!("{comp}.{port}.{slot}"),
        });
        Ok(())
    }

    fn cqs_of(&self, id: CompId) -> CqsType {
        self.comps[id.idx()].comp.cqs_type()
    }

    /// Connect two ports. The endpoints share one node afterwards; a
    /// refused connection changes nothing.
    pub fn connect(
        &mut self,
        store: &mut NodeStore,
        comp_a: &str,
        port_a: &str,
        comp_b: &str,
        port_b: &str,
    ) -> SimResult<()> {
        let a = self.endpoint(comp_a, port_a)?;
        let b = self.endpoint(comp_b, port_b)?;
        if a == b {
            return Err(SimError::Connection {
                what: format!("cannot connect {comp_a}:{port_a} to itself"),
            });
        }

        let spec_a = &self.record(a).spec;
        let spec_b = &self.record(b).spec;
        if !spec_a.can_connect(spec_b) {
            return Err(SimError::Connection {
                what: format!(
                    "{comp_a}:{port_a} ({} {:?}) cannot pair with {comp_b}:{port_b} ({} {:?})",
                    spec_a.domain, spec_a.kind, spec_b.domain, spec_b.kind
                ),
            });
        }

        // Power connections must join one C side with one Q side, or the
        // step ordering guarantees break down.
        if spec_a.domain != tlm_graph::Domain::Signal {
            let ca = self.cqs_of(a.comp);
            let cb = self.cqs_of(b.comp);
            let ok = matches!((ca, cb), (CqsType::C, CqsType::Q) | (CqsType::Q, CqsType::C));
            if !ok {
                return Err(SimError::Connection {
                    what: format!(
                        "{comp_a} ({ca}) and {comp_b} ({cb}) cannot share a power connection; \
                         one side must be C and the other Q"
                    ),
                });
            }
        }

        let kind_a = spec_a.kind;
        let kind_b = spec_b.kind;
        let domain = spec_a.domain;

        // A signal write port may fan out; every other port takes exactly
        // one connection. A port may carry a private default node from an
        // earlier initialization; that is not a connection.
        let fan_out_a = kind_a == PortKind::Write;
        let fan_out_b = kind_b == PortKind::Write;
        if self.record(a).connected && !fan_out_a {
            return Err(SimError::Connection {
                what: format!("{comp_a}:{port_a} is already connected"),
            });
        }
        if self.record(b).connected && !fan_out_b {
            return Err(SimError::Connection {
                what: format!("{comp_b}:{port_b} is already connected"),
            });
        }

        // A port gaining a real peer gives its private default node back.
        for ep in [a, b] {
            let rec = self.record_mut(ep);
            if !rec.connected {
                if let Some(n) = rec.node.take() {
                    store.release(n);
                }
            }
        }

        let node = match (self.record(a).node, self.record(b).node) {
            (Some(n), _) => n,
            (_, Some(n)) => n,
            (None, None) => store.create(domain),
        };

        for ep in [a, b] {
            let rec = self.record_mut(ep);
            rec.node = Some(node);
            rec.connected = true;
        }
        self.connections.push(Connection { a, b, node });
        self.invalidate();
        Ok(())
    }

    /// Remove the connection between two ports. The shared node is released
    /// once nothing references it; both ports return to their
    /// never-connected state.
    pub fn disconnect(
        &mut self,
        store: &mut NodeStore,
        comp_a: &str,
        port_a: &str,
        comp_b: &str,
        port_b: &str,
    ) -> SimResult<()> {
        let a = self.endpoint(comp_a, port_a)?;
        let b = self.endpoint(comp_b, port_b)?;
        let idx = self
            .connections
            .iter()
            .position(|c| (c.a == a && c.b == b) || (c.a == b && c.b == a))
            .ok_or_else(|| SimError::Connection {
                what: format!("{comp_a}:{port_a} and {comp_b}:{port_b} are not connected"),
            })?;
        let removed = self.connections.remove(idx);

        for ep in [a, b] {
            let still_used = self.connections.iter().any(|c| c.a == ep || c.b == ep);
            if !still_used {
                let rec = self.record_mut(ep);
                rec.node = None;
                rec.connected = false;
            }
        }
        if !self.connections.iter().any(|c| c.node == removed.node) {
            store.release(removed.node);
        }
        self.invalidate();
        Ok(())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Expose an internal port as a boundary port of this system. The
    /// parent binds its node straight onto the shadowed port.
    pub fn add_system_port(&mut self, name: impl Into<String>, comp: &str, port: &str) -> SimResult<()> {
        let name = name.into();
        if self.system_ports.iter().any(|r| r.name == name) {
            return Err(SimError::DuplicateName { name });
        }
        let inner = self.endpoint(comp, port)?;
        if self.record(inner).connected {
            return Err(SimError::Connection {
                what: format!("{comp}:{port} is already connected and cannot be exposed"),
            });
        }
        self.system_ports.push(SystemPortRec { name, inner });
        Ok(())
    }

    fn invalidate(&mut self) {
        self.order = SimOrder::default();
        self.initialized = false;
    }

    /// Prepare a run over `[start, stop]`: bind remaining ports, apply
    /// start values, derive the execution order, and initialize every
    /// component. Fails fast before the first step on any error.
    pub fn initialize(
        &mut self,
        store: &mut NodeStore,
        hub: &mut MessageHub,
        start: f64,
        stop: f64,
    ) -> SimResult<()> {
        if self.timestep <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "timestep must be positive",
            });
        }
        if !(start.is_finite() && stop.is_finite()) || stop < start {
            return Err(SimError::InvalidArg {
                what: "simulation window must be finite with stop >= start",
            });
        }
        tracing::debug!(
            system = %self.name,
            start,
            stop,
            timestep = self.timestep,
            "initializing system"
        );
        self.time = start;
        self.stop.clear();
        self.numeric_warned = false;
        let total_steps = num_steps(start, stop, self.timestep);
        self.init_inner(store, hub, total_steps)
    }

    fn init_inner(
        &mut self,
        store: &mut NodeStore,
        hub: &mut MessageHub,
        total_steps: usize,
    ) -> SimResult<()> {
        self.bind_unconnected(store)?;
        self.apply_start_values(store)?;
        self.order = self.build_order()?;
        self.refresh_binding_caches();

        // Signal components first so every input node carries a defined
        // value before the physical sides read it.
        let ids: Vec<CompId> = self
            .order
            .signal
            .iter()
            .chain(&self.order.c)
            .chain(&self.order.q)
            .copied()
            .collect();
        for id in ids {
            self.init_component(id, store, hub)?;
        }

        self.logger.clear_channels();
        let requests = self.log_requests.clone();
        for req in requests {
            let node = self
                .record(req.endpoint)
                .node
                .ok_or_else(|| SimError::Initialization {
                    what: format!("log channel '{}' has no bound node", req.label),
                })?;
            let slot = store.slot_ref(node, req.slot)?;
            self.logger.add_channel(req.label, slot);
        }
        self.logger.begin(total_steps);
        self.logger.force_sample(self.time, store);

        self.initialized = true;
        Ok(())
    }

    /// Required ports must be connected; optional ones get a private
    /// default-valued node so components can always resolve their slots.
    fn bind_unconnected(&mut self, store: &mut NodeStore) -> SimResult<()> {
        for entry in &mut self.comps {
            for rec in &mut entry.ports {
                if rec.node.is_some() {
                    continue;
                }
                if rec.spec.required {
                    return Err(SimError::Initialization {
                        what: format!(
                            "required port {}:{} is not connected",
                            entry.name, rec.spec.name
                        ),
                    });
                }
                rec.node = Some(store.create(rec.spec.domain));
            }
        }
        Ok(())
    }

    fn apply_start_values(&mut self, store: &mut NodeStore) -> SimResult<()> {
        for entry in &self.comps {
            for rec in &entry.ports {
                let Some(node) = rec.node else { continue };
                for &(slot, value) in &rec.spec.start_values {
                    let r = store.slot_ref(node, slot)?;
                    store.write(r, value);
                }
            }
        }
        Ok(())
    }

    fn build_order(&self) -> SimResult<SimOrder> {
        let mut signal_entries = Vec::new();
        let mut c = Vec::new();
        let mut q = Vec::new();

        for (i, entry) in self.comps.iter().enumerate() {
            let id = CompId::from_index(i as u32);
            match entry.comp.cqs_type() {
                CqsType::Signal => {
                    let reads = entry
                        .ports
                        .iter()
                        .filter(|p| p.spec.kind == PortKind::Read && p.connected)
                        .filter_map(|p| p.node)
                        .collect();
                    let writes = entry
                        .ports
                        .iter()
                        .filter(|p| p.spec.kind == PortKind::Write)
                        .filter_map(|p| p.node)
                        .collect();
                    signal_entries.push(SortEntry {
                        id,
                        name: entry.name.clone(),
                        breaks_loop: entry.comp.breaks_signal_loop(),
                        reads,
                        writes,
                    });
                }
                CqsType::C => c.push(id),
                CqsType::Q => q.push(id),
                CqsType::System => {
                    return Err(SimError::Initialization {
                        what: format!(
                            "subsystem '{}' must declare a C or Q boundary",
                            entry.name
                        ),
                    });
                }
            }
        }

        Ok(SimOrder {
            signal: sort_signal(&signal_entries)?,
            c,
            q,
        })
    }

    fn refresh_binding_caches(&mut self) {
        for entry in &mut self.comps {
            entry.bound = entry.ports.iter().map(|p| p.node).collect();
            entry.conn = entry.ports.iter().map(|p| p.connected).collect();
        }
    }

    fn init_component(
        &mut self,
        id: CompId,
        store: &mut NodeStore,
        hub: &mut MessageHub,
    ) -> SimResult<()> {
        let time = self.time;
        let timestep = self.timestep;
        let CompEntry {
            name,
            comp,
            params,
            bound,
            conn,
            ..
        } = &mut self.comps[id.idx()];
        let mut ctx = SimContext::new(store, params, hub, bound, conn, time, timestep);
        let result = comp.initialize(&mut ctx);
        drop(ctx);
        result.map_err(|e| {
            hub.fatal(name.clone(), e.to_string());
            SimError::Initialization {
                what: format!("{name}: {e}"),
            }
        })
    }

    /// Advance to `stop_time` in fixed steps. The stop flag is honored
    /// between steps; reaching it is not an error.
    pub fn simulate(
        &mut self,
        store: &mut NodeStore,
        hub: &mut MessageHub,
        stop_time: f64,
    ) -> SimResult<()> {
        if !self.initialized {
            return Err(SimError::Initialization {
                what: format!("system '{}' simulated before initialize", self.name),
            });
        }
        let steps = num_steps(self.time, stop_time, self.timestep);
        tracing::debug!(system = %self.name, steps, stop_time, "simulating");
        for _ in 0..steps {
            if self.stop.is_set() {
                hub.info(self.name.clone(), format!("stopped at t = {}", self.time));
                break;
            }
            self.time += self.timestep;
            self.run_passes(store, hub);
            self.logger.sample(self.time, store);
            self.check_numerics(store, hub);
        }
        Ok(())
    }

    fn run_passes(&mut self, store: &mut NodeStore, hub: &mut MessageHub) {
        let order = std::mem::take(&mut self.order);
        let time = self.time;
        let timestep = self.timestep;
        for &id in order.signal.iter().chain(&order.c).chain(&order.q) {
            let CompEntry {
                comp,
                params,
                bound,
                conn,
                ..
            } = &mut self.comps[id.idx()];
            let mut ctx = SimContext::new(store, params, hub, bound, conn, time, timestep);
            comp.simulate_one_timestep(&mut ctx);
        }
        self.order = order;
    }

    /// Non-finite values in logged channels get one warning per run; the
    /// simulation itself keeps going, as components own their guards.
    fn check_numerics(&mut self, store: &NodeStore, hub: &mut MessageHub) {
        if self.numeric_warned {
            return;
        }
        for (label, slot) in self.logger.slots() {
            let v = store.read(slot);
            if !v.is_finite() {
                hub.warning(
                    self.name.clone(),
                    format!("non-finite value in '{label}' at t = {}", self.time),
                );
                self.numeric_warned = true;
                return;
            }
        }
    }

    /// Finish a run; components drop per-run resources.
    pub fn finalize(&mut self) {
        self.finalize_children();
        self.initialized = false;
    }

    fn finalize_children(&mut self) {
        for entry in &mut self.comps {
            entry.comp.finalize();
        }
    }

    /// Node-disjoint barrier groups of the C and Q passes. Meaningful after
    /// initialization, when every port is bound.
    pub fn parallel_schedules(&self) -> (ParallelSchedule, ParallelSchedule) {
        let work = |ids: &[CompId]| -> Vec<(CompId, Vec<NodeId>)> {
            ids.iter()
                .map(|&id| {
                    let nodes = self.comps[id.idx()]
                        .ports
                        .iter()
                        .filter_map(|p| p.node)
                        .collect();
                    (id, nodes)
                })
                .collect()
        };
        (partition(&work(&self.order.c)), partition(&work(&self.order.q)))
    }

    /// The derived execution order; empty before initialization.
    pub fn sim_order(&self) -> &SimOrder {
        &self.order
    }
}

impl Component for System {
    fn type_name(&self) -> &'static str {
        "Subsystem"
    }

    fn cqs_type(&self) -> CqsType {
        self.boundary
    }

    fn configure(&mut self, setup: &mut Setup) {
        for rec in &self.system_ports {
            let domain = self.comps[rec.inner.comp.idx()].ports[rec.inner.port.idx()]
                .spec
                .domain;
            setup.add_system_port(&rec.name, domain);
        }
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        self.time = ctx.time;
        self.timestep = ctx.timestep;
        for i in 0..self.system_ports.len() {
            let ext = ctx.node(PortId::from_index(i as u32))?;
            let inner = self.system_ports[i].inner;
            let rec = &mut self.comps[inner.comp.idx()].ports[inner.port.idx()];
            if !rec.connected {
                // Drop any private default node from a stand-alone run.
                if let Some(n) = rec.node.take() {
                    if n != ext {
                        ctx.store.release(n);
                    }
                }
            }
            rec.node = Some(ext);
            rec.connected = true;
        }
        self.init_inner(ctx.store, ctx.hub, 0)
            .map_err(|e| ModelError::Initialization {
                what: e.to_string(),
            })
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        self.time = ctx.time;
        self.run_passes(ctx.store, ctx.hub);
    }

    fn finalize(&mut self) {
        self.finalize_children();
        self.initialized = false;
    }
}
