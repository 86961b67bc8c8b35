//! Signal source, block and sink components.

use tlm_core::PortId;
use tlm_graph::domain::signal;
use tlm_graph::SlotRef;
use tlm_model::{Component, CqsType, ModelResult, Setup, SimContext};
use tlm_numerics::{Delay, FirstOrderFilter};

/// Constant signal source.
#[derive(Debug, Default)]
pub struct SignalConstant {
    out: Option<SlotRef>,
    value: f64,
}

impl SignalConstant {
    const OUT: PortId = PortId::from_index(0);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for SignalConstant {
    fn type_name(&self) -> &'static str {
        "SignalConstant"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Signal
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_write_port("out");
        setup.register_parameter("y", "Constant value", "-", 0.0);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let out = ctx.slot(Self::OUT, signal::VALUE)?;
        self.value = ctx.params.value("y")?;
        ctx.write(out, self.value);
        self.out = Some(out);
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(out) = self.out else { return };
        ctx.write(out, self.value);
    }
}

/// Step source: `y_0` before `t_step`, `y_0 + y_A` from `t_step` on.
#[derive(Debug, Default)]
pub struct SignalStep {
    out: Option<SlotRef>,
    base: f64,
    amplitude: f64,
    step_time: f64,
}

impl SignalStep {
    const OUT: PortId = PortId::from_index(0);

    pub fn new() -> Self {
        Self::default()
    }

    fn value_at(&self, t: f64) -> f64 {
        if t < self.step_time {
            self.base
        } else {
            self.base + self.amplitude
        }
    }
}

impl Component for SignalStep {
    fn type_name(&self) -> &'static str {
        "SignalStep"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Signal
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_write_port("out");
        setup.register_parameter("y_0", "Base value", "-", 0.0);
        setup.register_parameter("y_A", "Amplitude", "-", 1.0);
        setup.register_parameter("t_step", "Step time", "s", 1.0);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let out = ctx.slot(Self::OUT, signal::VALUE)?;
        self.base = ctx.params.value("y_0")?;
        self.amplitude = ctx.params.value("y_A")?;
        self.step_time = ctx.params.value("t_step")?;
        ctx.write(out, self.value_at(ctx.time));
        self.out = Some(out);
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(out) = self.out else { return };
        ctx.write(out, self.value_at(ctx.time));
    }
}

/// Multiply the input by a constant gain.
#[derive(Debug, Default)]
pub struct SignalGain {
    io: Option<(SlotRef, SlotRef)>,
    k: f64,
}

impl SignalGain {
    const IN: PortId = PortId::from_index(0);
    const OUT: PortId = PortId::from_index(1);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for SignalGain {
    fn type_name(&self) -> &'static str {
        "SignalGain"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Signal
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_read_port("in");
        setup.add_write_port("out");
        setup.register_parameter("k", "Gain", "-", 1.0);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let input = ctx.slot(Self::IN, signal::VALUE)?;
        let out = ctx.slot(Self::OUT, signal::VALUE)?;
        self.k = ctx.params.value("k")?;
        ctx.write(out, self.k * ctx.read(input));
        self.io = Some((input, out));
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some((input, out)) = self.io else { return };
        let u = ctx.read(input);
        ctx.write(out, self.k * u);
    }
}

/// Terminal block that records the last value it saw.
///
/// Ensures the upstream chain is part of the sorted signal pass even when
/// nothing physical consumes it; tests and loggers read `value()`.
#[derive(Debug, Default)]
pub struct SignalSink {
    input: Option<SlotRef>,
    last: f64,
}

impl SignalSink {
    const IN: PortId = PortId::from_index(0);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.last
    }
}

impl Component for SignalSink {
    fn type_name(&self) -> &'static str {
        "SignalSink"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Signal
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_read_port("in");
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let input = ctx.slot(Self::IN, signal::VALUE)?;
        self.last = ctx.read(input);
        self.input = Some(input);
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(input) = self.input else { return };
        self.last = ctx.read(input);
    }
}

/// One-step delay: the output is the input from the previous timestep.
///
/// The only built-in that reports `breaks_signal_loop`, letting the sorter
/// schedule feedback loops that pass through it.
#[derive(Debug, Default)]
pub struct SignalUnitDelay {
    io: Option<(SlotRef, SlotRef)>,
    delay: Delay,
}

impl SignalUnitDelay {
    const IN: PortId = PortId::from_index(0);
    const OUT: PortId = PortId::from_index(1);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for SignalUnitDelay {
    fn type_name(&self) -> &'static str {
        "SignalUnitDelay"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Signal
    }

    fn breaks_signal_loop(&self) -> bool {
        true
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_read_port("in");
        setup.add_write_port("out");
        setup.register_parameter("y_0", "Initial output", "-", 0.0);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let input = ctx.slot(Self::IN, signal::VALUE)?;
        let out = ctx.slot(Self::OUT, signal::VALUE)?;
        let y0 = ctx.params.value("y_0")?;
        self.delay.initialize_steps(1, y0);
        ctx.write(out, y0);
        self.io = Some((input, out));
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some((input, out)) = self.io else { return };
        let u = ctx.read(input);
        ctx.write(out, self.delay.update(u));
    }
}

/// First order low-pass, G(s) = k / (s/omega + 1).
#[derive(Debug, Default)]
pub struct SignalLowPass {
    io: Option<(SlotRef, SlotRef)>,
    filter: Option<FirstOrderFilter>,
}

impl SignalLowPass {
    const IN: PortId = PortId::from_index(0);
    const OUT: PortId = PortId::from_index(1);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for SignalLowPass {
    fn type_name(&self) -> &'static str {
        "SignalLowPassFilter"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Signal
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_read_port("in");
        setup.add_write_port("out");
        setup.register_parameter("k", "Static gain", "-", 1.0);
        setup.register_parameter("omega", "Break frequency", "rad/s", 1000.0);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let input = ctx.slot(Self::IN, signal::VALUE)?;
        let out = ctx.slot(Self::OUT, signal::VALUE)?;
        let k = ctx.params.value("k")?;
        let omega = ctx.params.value("omega")?;
        if omega <= 0.0 {
            return Err(tlm_model::ModelError::Initialization {
                what: format!("break frequency must be positive, got {omega}"),
            });
        }

        // Start in steady state at the current input.
        let u0 = ctx.read(input);
        let y0 = k * u0;
        self.filter = Some(FirstOrderFilter::unbounded(
            ctx.timestep,
            [k, 0.0],
            [1.0, 1.0 / omega],
            u0,
            y0,
        ));
        ctx.write(out, y0);
        self.io = Some((input, out));
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let (Some((input, out)), Some(filter)) = (self.io, self.filter.as_mut()) else {
            return;
        };
        let u = ctx.read(input);
        ctx.write(out, filter.update(u));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlm_graph::{Domain, NodeStore};

    struct Rig {
        store: NodeStore,
        bindings: Vec<Option<tlm_core::NodeId>>,
        connected: Vec<bool>,
        params: tlm_model::ParameterSet,
        hub: tlm_model::MessageHub,
    }

    fn rig<C: Component>(comp: &mut C) -> Rig {
        let mut setup = Setup::new();
        comp.configure(&mut setup);
        let mut store = NodeStore::new();
        let bindings: Vec<_> = setup
            .ports()
            .iter()
            .map(|p| Some(store.create(p.domain)))
            .collect();
        let connected = vec![false; bindings.len()];
        let (_, params) = setup.into_parts();
        Rig {
            store,
            bindings,
            connected,
            params,
            hub: tlm_model::MessageHub::new(),
        }
    }

    impl Rig {
        fn ctx(&mut self, time: f64) -> SimContext<'_> {
            SimContext::new(
                &mut self.store,
                &self.params,
                &mut self.hub,
                &self.bindings,
                &self.connected,
                time,
                1e-3,
            )
        }

        fn signal(&self, port: usize) -> f64 {
            let node = self.bindings[port].unwrap();
            self.store
                .read(self.store.slot_ref(node, signal::VALUE).unwrap())
        }

        fn set_signal(&mut self, port: usize, value: f64) {
            let node = self.bindings[port].unwrap();
            let r = self.store.slot_ref(node, signal::VALUE).unwrap();
            self.store.write(r, value);
        }
    }

    #[test]
    fn constant_writes_its_value() {
        let mut c = SignalConstant::new();
        let mut r = rig(&mut c);
        r.params.set("y", 4.5).unwrap();
        c.initialize(&mut r.ctx(0.0)).unwrap();
        assert_eq!(r.signal(0), 4.5);
        c.simulate_one_timestep(&mut r.ctx(1e-3));
        assert_eq!(r.signal(0), 4.5);
    }

    #[test]
    fn step_switches_at_step_time() {
        let mut s = SignalStep::new();
        let mut r = rig(&mut s);
        r.params.set("y_0", 1.0).unwrap();
        r.params.set("y_A", 2.0).unwrap();
        r.params.set("t_step", 0.5).unwrap();
        s.initialize(&mut r.ctx(0.0)).unwrap();
        assert_eq!(r.signal(0), 1.0);
        s.simulate_one_timestep(&mut r.ctx(0.499));
        assert_eq!(r.signal(0), 1.0);
        s.simulate_one_timestep(&mut r.ctx(0.5));
        assert_eq!(r.signal(0), 3.0);
    }

    #[test]
    fn gain_scales_input() {
        let mut g = SignalGain::new();
        let mut r = rig(&mut g);
        r.params.set("k", 3.0).unwrap();
        g.initialize(&mut r.ctx(0.0)).unwrap();
        r.set_signal(0, 2.0);
        g.simulate_one_timestep(&mut r.ctx(1e-3));
        assert_eq!(r.signal(1), 6.0);
    }

    #[test]
    fn unit_delay_outputs_previous_input() {
        let mut d = SignalUnitDelay::new();
        let mut r = rig(&mut d);
        d.initialize(&mut r.ctx(0.0)).unwrap();
        assert_eq!(r.signal(1), 0.0);

        r.set_signal(0, 5.0);
        d.simulate_one_timestep(&mut r.ctx(1e-3));
        assert_eq!(r.signal(1), 0.0);

        r.set_signal(0, 7.0);
        d.simulate_one_timestep(&mut r.ctx(2e-3));
        assert_eq!(r.signal(1), 5.0);
    }

    #[test]
    fn sink_records_last_value() {
        let mut s = SignalSink::new();
        let mut r = rig(&mut s);
        s.initialize(&mut r.ctx(0.0)).unwrap();
        r.set_signal(0, -2.5);
        s.simulate_one_timestep(&mut r.ctx(1e-3));
        assert_eq!(s.value(), -2.5);
    }

    #[test]
    fn low_pass_converges_to_gained_input() {
        let mut f = SignalLowPass::new();
        let mut r = rig(&mut f);
        r.params.set("k", 2.0).unwrap();
        r.params.set("omega", 100.0).unwrap();
        f.initialize(&mut r.ctx(0.0)).unwrap();
        r.set_signal(0, 1.0);
        for i in 1..=20_000 {
            f.simulate_one_timestep(&mut r.ctx(i as f64 * 1e-3));
        }
        assert!((r.signal(1) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn low_pass_starts_steady() {
        let mut f = SignalLowPass::new();
        let mut r = rig(&mut f);
        r.set_signal(0, 3.0);
        f.initialize(&mut r.ctx(0.0)).unwrap();
        assert_eq!(r.signal(1), 3.0);
        f.simulate_one_timestep(&mut r.ctx(1e-3));
        assert!((r.signal(1) - 3.0).abs() < 1e-12);
    }
}
