//! tlm-app: the embedding facade.
//!
//! [`Essentials`] owns everything a host application needs: the component
//! factory with the built-in library registered, the shared node store for
//! the whole model tree, and the message hub. The driver API (`initialize`,
//! `simulate`, `finalize`) reports failure through a boolean plus drained
//! messages and never panics across the boundary.

use tlm_components::{
    HydraulicVolume, LaminarOrifice, PressureSourceC, SignalConstant, SignalGain, SignalLowPass,
    SignalSink, SignalStep, SignalUnitDelay, TurbulentOrifice,
};
use tlm_graph::NodeStore;
use tlm_model::{Component, CqsType, Message, MessageHub};
use tlm_project::{CqsDef, ModelDef, SystemDef};
use tlm_sim::{ComponentFactory, SimResult, System};

pub use tlm_sim::SimError;

/// Top-level error for embedding applications: anything that can go wrong
/// between a model file on disk and a finished run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Project(#[from] tlm_project::ProjectError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("run failed: {0}")]
    Run(String),
}

pub type AppResult<T> = Result<T, AppError>;

pub struct Essentials {
    factory: ComponentFactory,
    hub: MessageHub,
    store: NodeStore,
}

impl Essentials {
    /// A facade with the built-in component library registered.
    pub fn new() -> Self {
        let mut factory = ComponentFactory::new();
        // Registering fresh names into an empty factory cannot collide.
        let result = register_builtins(&mut factory);
        debug_assert!(result.is_ok());
        Self {
            factory,
            hub: MessageHub::new(),
            store: NodeStore::new(),
        }
    }

    pub fn factory(&self) -> &ComponentFactory {
        &self.factory
    }

    /// Register an external component type alongside the built-ins.
    pub fn register_creator(
        &mut self,
        name: impl Into<String>,
        creator: impl Fn() -> Box<dyn Component> + Send + Sync + 'static,
    ) -> SimResult<()> {
        self.factory.register(name, creator)
    }

    pub fn create_component(&self, type_name: &str) -> SimResult<Box<dyn Component>> {
        self.factory.create(type_name)
    }

    pub fn create_system(&self, name: impl Into<String>) -> System {
        System::new(name)
    }

    /// The node store shared by every system built through this facade.
    pub fn store(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    pub fn store_ref(&self) -> &NodeStore {
        &self.store
    }

    pub fn hub(&mut self) -> &mut MessageHub {
        &mut self.hub
    }

    /// Take all accumulated diagnostics.
    pub fn drain_messages(&mut self) -> Vec<Message> {
        self.hub.drain()
    }

    /// Instantiate a model description: create components, set parameters
    /// and start values, connect, and recurse into subsystems. The returned
    /// system is ready for `initialize`.
    pub fn build_model(&mut self, model: &ModelDef) -> SimResult<System> {
        tracing::debug!(model = %model.name, "building model");
        let mut sys = self.build_system(&model.system, &model.name)?;
        sys.set_timestep(model.settings.timestep)?;
        sys.set_log_samples(model.settings.log_samples);
        Ok(sys)
    }

    fn build_system(&mut self, def: &SystemDef, name: &str) -> SimResult<System> {
        let mut sys = System::new(name);

        for comp_def in &def.components {
            let comp = self.factory.create(&comp_def.type_name)?;
            sys.add_component(&comp_def.name, comp)?;
            for (param, &value) in &comp_def.parameters {
                sys.set_parameter(&comp_def.name, param, value)?;
            }
            for sv in &comp_def.start_values {
                sys.set_start_value(&comp_def.name, &sv.port, &sv.slot, sv.value)?;
            }
        }

        for sub_def in &def.subsystems {
            let mut sub = self.build_system(&sub_def.system, &sub_def.name)?;
            sub.set_boundary(match sub_def.cqs {
                CqsDef::C => CqsType::C,
                CqsDef::Q => CqsType::Q,
            })?;
            for port in &sub_def.ports {
                sub.add_system_port(&port.name, &port.component, &port.port)?;
            }
            sys.add_component(&sub_def.name, Box::new(sub))?;
        }

        for conn in &def.connections {
            sys.connect(
                &mut self.store,
                &conn.from.component,
                &conn.from.port,
                &conn.to.component,
                &conn.to.port,
            )?;
        }

        for log in &def.logs {
            sys.add_log(&log.component, &log.port, &log.slot)?;
        }

        Ok(sys)
    }

    /// Driver API: prepare a run. On failure the cause lands in the
    /// message hub and `false` comes back.
    pub fn initialize(&mut self, sys: &mut System, start: f64, stop: f64) -> bool {
        match sys.initialize(&mut self.store, &mut self.hub, start, stop) {
            Ok(()) => true,
            Err(e) => {
                self.hub.fatal(sys.name().to_string(), e.to_string());
                false
            }
        }
    }

    /// Driver API: advance to `stop_time`.
    pub fn simulate(&mut self, sys: &mut System, stop_time: f64) -> bool {
        match sys.simulate(&mut self.store, &mut self.hub, stop_time) {
            Ok(()) => true,
            Err(e) => {
                self.hub.fatal(sys.name().to_string(), e.to_string());
                false
            }
        }
    }

    /// Driver API: finish a run.
    pub fn finalize(&mut self, sys: &mut System) {
        sys.finalize();
    }
}

impl Default for Essentials {
    fn default() -> Self {
        Self::new()
    }
}

fn register_builtins(factory: &mut ComponentFactory) -> SimResult<()> {
    factory.register("HydraulicPressureSourceC", || {
        Box::new(PressureSourceC::new())
    })?;
    factory.register("HydraulicVolume", || Box::new(HydraulicVolume::new()))?;
    factory.register("HydraulicLaminarOrifice", || Box::new(LaminarOrifice::new()))?;
    factory.register("HydraulicTurbulentOrifice", || {
        Box::new(TurbulentOrifice::new())
    })?;
    factory.register("SignalConstant", || Box::new(SignalConstant::new()))?;
    factory.register("SignalStep", || Box::new(SignalStep::new()))?;
    factory.register("SignalGain", || Box::new(SignalGain::new()))?;
    factory.register("SignalSink", || Box::new(SignalSink::new()))?;
    factory.register("SignalUnitDelay", || Box::new(SignalUnitDelay::new()))?;
    factory.register("SignalLowPassFilter", || Box::new(SignalLowPass::new()))?;
    Ok(())
}
