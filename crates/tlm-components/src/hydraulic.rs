//! Hydraulic C and Q components.
//!
//! The C elements (source, volume) write wave variables and characteristic
//! impedances; the Q elements (orifices) read them and write back pressures
//! and flows. Cavitation is clamped locally by each Q component.

use tlm_core::PortId;
use tlm_graph::domain::hydraulic;
use tlm_graph::{Domain, SlotRef};
use tlm_model::{Component, CqsType, InputValue, ModelError, ModelResult, Setup, SimContext};
use tlm_numerics::TurbulentFlow;

/// Cached slot handles for one hydraulic power port.
#[derive(Debug, Clone, Copy)]
struct HydPort {
    p: SlotRef,
    q: SlotRef,
    c: SlotRef,
    zc: SlotRef,
}

impl HydPort {
    fn resolve(ctx: &SimContext<'_>, port: PortId) -> ModelResult<Self> {
        Ok(Self {
            p: ctx.slot(port, hydraulic::PRESSURE)?,
            q: ctx.slot(port, hydraulic::FLOW)?,
            c: ctx.slot(port, hydraulic::WAVE)?,
            zc: ctx.slot(port, hydraulic::IMPEDANCE)?,
        })
    }
}

/// Ideal pressure source, C-type.
///
/// Emits its commanded pressure as the wave variable with zero
/// characteristic impedance, so the connected Q component sees exactly that
/// pressure regardless of flow.
#[derive(Debug, Default)]
pub struct PressureSourceC {
    r: Option<SourceState>,
}

#[derive(Debug)]
struct SourceState {
    c: SlotRef,
    zc: SlotRef,
    pressure: InputValue,
}

impl PressureSourceC {
    const P1: PortId = PortId::from_index(0);
    const IN_P: PortId = PortId::from_index(1);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for PressureSourceC {
    fn type_name(&self) -> &'static str {
        "HydraulicPressureSourceC"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::C
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_power_port("P1", Domain::Hydraulic);
        setup.add_read_port("p");
        setup.register_parameter("p", "Source pressure", "Pa", 1e5);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let state = SourceState {
            c: ctx.slot(Self::P1, hydraulic::WAVE)?,
            zc: ctx.slot(Self::P1, hydraulic::IMPEDANCE)?,
            pressure: InputValue::resolve(ctx, Self::IN_P, "p")?,
        };
        let p = state.pressure.get(ctx);
        ctx.write(state.c, p);
        ctx.write(state.zc, 0.0);
        self.r = Some(state);
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(r) = &self.r else { return };
        let p = r.pressure.get(ctx);
        ctx.write(r.c, p);
        ctx.write(r.zc, 0.0);
    }
}

/// Two-port fluid volume, C-type.
///
/// The classic TLM capacitance: Zc = beta_e/V * dt / (1 - alpha), each side
/// emitting the wave reflected from the other side one step earlier. The
/// low-pass factor `alpha` damps standing delay-line waves.
#[derive(Debug)]
pub struct HydraulicVolume {
    r: Option<VolumeState>,
}

#[derive(Debug)]
struct VolumeState {
    p1: HydPort,
    p2: HydPort,
    zc: f64,
    alpha: f64,
}

impl HydraulicVolume {
    const P1: PortId = PortId::from_index(0);
    const P2: PortId = PortId::from_index(1);

    pub fn new() -> Self {
        Self { r: None }
    }
}

impl Default for HydraulicVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HydraulicVolume {
    fn type_name(&self) -> &'static str {
        "HydraulicVolume"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::C
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_power_port("P1", Domain::Hydraulic);
        setup.add_power_port("P2", Domain::Hydraulic);
        setup.register_parameter("V", "Volume", "m^3", 1e-3);
        setup.register_parameter("Beta_e", "Bulk modulus", "Pa", 1e9);
        setup.register_parameter(
            "alpha",
            "Low-pass coefficient damping standing delay-line waves",
            "-",
            0.1,
        );
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let v = ctx.params.value("V")?;
        let beta_e = ctx.params.value("Beta_e")?;
        let alpha = ctx.params.value("alpha")?;
        if v <= 0.0 || beta_e <= 0.0 {
            return Err(ModelError::Initialization {
                what: "volume and bulk modulus must be positive".into(),
            });
        }
        if !(0.0..1.0).contains(&alpha) {
            return Err(ModelError::Initialization {
                what: format!("alpha must be in [0, 1), got {alpha}"),
            });
        }

        let p1 = HydPort::resolve(ctx, Self::P1)?;
        let p2 = HydPort::resolve(ctx, Self::P2)?;
        let zc = beta_e / v * ctx.timestep / (1.0 - alpha);

        // Waves consistent with the node start values.
        let c1 = ctx.read(p1.p) + zc * ctx.read(p1.q);
        let c2 = ctx.read(p2.p) + zc * ctx.read(p2.q);
        ctx.write(p1.c, c1);
        ctx.write(p1.zc, zc);
        ctx.write(p2.c, c2);
        ctx.write(p2.zc, zc);

        self.r = Some(VolumeState { p1, p2, zc, alpha });
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(r) = &self.r else { return };
        let q1 = ctx.read(r.p1.q);
        let c1 = ctx.read(r.p1.c);
        let q2 = ctx.read(r.p2.q);
        let c2 = ctx.read(r.p2.c);

        let c10 = c2 + 2.0 * r.zc * q2;
        let c20 = c1 + 2.0 * r.zc * q1;
        ctx.write(r.p1.c, r.alpha * c1 + (1.0 - r.alpha) * c10);
        ctx.write(r.p1.zc, r.zc);
        ctx.write(r.p2.c, r.alpha * c2 + (1.0 - r.alpha) * c20);
        ctx.write(r.p2.zc, r.zc);
    }
}

/// Laminar restriction, Q-type.
///
/// q2 = Kc*(c1 - c2) / (1 + Kc*(Zc1 + Zc2)), closed form. Negative
/// pressures are clamped by zeroing the offending side's wave and impedance
/// and re-solving once.
#[derive(Debug, Default)]
pub struct LaminarOrifice {
    r: Option<OrificeState>,
}

#[derive(Debug)]
struct OrificeState {
    p1: HydPort,
    p2: HydPort,
    kc: InputValue,
    cavitating: bool,
}

impl LaminarOrifice {
    const P1: PortId = PortId::from_index(0);
    const P2: PortId = PortId::from_index(1);
    const IN_KC: PortId = PortId::from_index(2);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for LaminarOrifice {
    fn type_name(&self) -> &'static str {
        "HydraulicLaminarOrifice"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Q
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_power_port("P1", Domain::Hydraulic);
        setup.add_power_port("P2", Domain::Hydraulic);
        setup.add_read_port("Kc");
        setup.register_parameter("Kc", "Pressure-flow coefficient", "m^5/Ns", 1e-11);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        self.r = Some(OrificeState {
            p1: HydPort::resolve(ctx, Self::P1)?,
            p2: HydPort::resolve(ctx, Self::P2)?,
            kc: InputValue::resolve(ctx, Self::IN_KC, "Kc")?,
            cavitating: false,
        });
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(r) = &mut self.r else { return };
        let mut c1 = ctx.read(r.p1.c);
        let mut zc1 = ctx.read(r.p1.zc);
        let mut c2 = ctx.read(r.p2.c);
        let mut zc2 = ctx.read(r.p2.zc);
        let kc = r.kc.get(ctx).abs();

        let mut q2 = kc * (c1 - c2) / (1.0 + kc * (zc1 + zc2));
        let mut q1 = -q2;
        let mut p1 = c1 + q1 * zc1;
        let mut p2 = c2 + q2 * zc2;

        let mut cav = false;
        if p1 < 0.0 {
            c1 = 0.0;
            zc1 = 0.0;
            cav = true;
        }
        if p2 < 0.0 {
            c2 = 0.0;
            zc2 = 0.0;
            cav = true;
        }
        if cav {
            q2 = kc * (c1 - c2) / (1.0 + kc * (zc1 + zc2));
            q1 = -q2;
            p1 = (c1 + q1 * zc1).max(0.0);
            p2 = (c2 + q2 * zc2).max(0.0);
        }
        if cav && !r.cavitating {
            ctx.hub
                .warning("HydraulicLaminarOrifice", "cavitation detected");
        }
        r.cavitating = cav;

        ctx.write(r.p1.p, p1);
        ctx.write(r.p1.q, q1);
        ctx.write(r.p2.p, p2);
        ctx.write(r.p2.q, q2);
    }
}

/// Turbulent restriction, Q-type.
///
/// Square-root pressure-flow law solved in closed form against the TLM port
/// relations, Ks = C_q * A * sqrt(2/rho).
#[derive(Debug, Default)]
pub struct TurbulentOrifice {
    r: Option<TurbState>,
}

#[derive(Debug)]
struct TurbState {
    p1: HydPort,
    p2: HydPort,
    area: InputValue,
    cq: f64,
    rho: f64,
    turb: TurbulentFlow,
    cavitating: bool,
}

impl TurbulentOrifice {
    const P1: PortId = PortId::from_index(0);
    const P2: PortId = PortId::from_index(1);
    const IN_A: PortId = PortId::from_index(2);

    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for TurbulentOrifice {
    fn type_name(&self) -> &'static str {
        "HydraulicTurbulentOrifice"
    }

    fn cqs_type(&self) -> CqsType {
        CqsType::Q
    }

    fn configure(&mut self, setup: &mut Setup) {
        setup.add_power_port("P1", Domain::Hydraulic);
        setup.add_power_port("P2", Domain::Hydraulic);
        setup.add_read_port("A");
        setup.register_parameter("A", "Orifice area", "m^2", 1e-5);
        setup.register_parameter("C_q", "Flow coefficient", "-", 0.67);
        setup.register_parameter("rho", "Oil density", "kg/m^3", 870.0);
    }

    fn initialize(&mut self, ctx: &mut SimContext<'_>) -> ModelResult<()> {
        let cq = ctx.params.value("C_q")?;
        let rho = ctx.params.value("rho")?;
        if rho <= 0.0 {
            return Err(ModelError::Initialization {
                what: "density must be positive".into(),
            });
        }
        let area = InputValue::resolve(ctx, Self::IN_A, "A")?;
        let ks = cq * area.get(ctx) * (2.0 / rho).sqrt();
        self.r = Some(TurbState {
            p1: HydPort::resolve(ctx, Self::P1)?,
            p2: HydPort::resolve(ctx, Self::P2)?,
            area,
            cq,
            rho,
            turb: TurbulentFlow::new(ks),
            cavitating: false,
        });
        Ok(())
    }

    fn simulate_one_timestep(&mut self, ctx: &mut SimContext<'_>) {
        let Some(r) = &mut self.r else { return };
        if let InputValue::Port(_) = r.area {
            let ks = r.cq * r.area.get(ctx) * (2.0 / r.rho).sqrt();
            r.turb.set_flow_coefficient(ks);
        }

        let mut c1 = ctx.read(r.p1.c);
        let mut zc1 = ctx.read(r.p1.zc);
        let mut c2 = ctx.read(r.p2.c);
        let mut zc2 = ctx.read(r.p2.zc);

        let mut q2 = r.turb.flow(c1, c2, zc1, zc2);
        let mut q1 = -q2;
        let mut p1 = c1 + q1 * zc1;
        let mut p2 = c2 + q2 * zc2;

        let mut cav = false;
        if p1 < 0.0 {
            c1 = 0.0;
            zc1 = 0.0;
            cav = true;
        }
        if p2 < 0.0 {
            c2 = 0.0;
            zc2 = 0.0;
            cav = true;
        }
        if cav {
            q2 = r.turb.flow(c1, c2, zc1, zc2);
            q1 = -q2;
            p1 = (c1 + q1 * zc1).max(0.0);
            p2 = (c2 + q2 * zc2).max(0.0);
        }
        if cav && !r.cavitating {
            ctx.hub
                .warning("HydraulicTurbulentOrifice", "cavitation detected");
        }
        r.cavitating = cav;

        ctx.write(r.p1.p, p1);
        ctx.write(r.p1.q, q1);
        ctx.write(r.p2.p, p2);
        ctx.write(r.p2.q, q2);
    }
}
