//! Physical domains and their node slot layouts.
//!
//! Each power domain carries its intensity/flow pair plus the two TLM slots:
//! the wave variable and the characteristic impedance. The C pass writes the
//! TLM slots, the Q pass writes the intensity/flow slots; the two passes
//! never write the same slot of a node. Signal nodes carry a single value
//! written by exactly one write port.

/// Physical domain of a node or power port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Hydraulic,
    Mechanic,
    MechanicRotational,
    Electric,
    Pneumatic,
    Signal,
}

impl Domain {
    /// Number of data slots a node of this domain carries.
    pub fn slot_count(self) -> usize {
        self.slot_names().len()
    }

    /// Ordered slot names, indexable by the slot constants below.
    pub fn slot_names(self) -> &'static [&'static str] {
        match self {
            Domain::Hydraulic => &["Pressure", "Flow", "WaveVariable", "CharImpedance"],
            Domain::Mechanic => &[
                "Position",
                "Velocity",
                "Force",
                "WaveVariable",
                "CharImpedance",
            ],
            Domain::MechanicRotational => &[
                "Angle",
                "AngularVelocity",
                "Torque",
                "WaveVariable",
                "CharImpedance",
            ],
            Domain::Electric => &["Voltage", "Current", "WaveVariable", "CharImpedance"],
            Domain::Pneumatic => &[
                "Pressure",
                "MassFlow",
                "Temperature",
                "WaveVariable",
                "CharImpedance",
            ],
            Domain::Signal => &["Value"],
        }
    }

    /// Slot index for a name, if the domain has it.
    pub fn slot_index(self, name: &str) -> Option<usize> {
        self.slot_names().iter().position(|n| *n == name)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Domain::Hydraulic => "Hydraulic",
            Domain::Mechanic => "Mechanic",
            Domain::MechanicRotational => "MechanicRotational",
            Domain::Electric => "Electric",
            Domain::Pneumatic => "Pneumatic",
            Domain::Signal => "Signal",
        };
        f.write_str(s)
    }
}

/// Slot indices for [`Domain::Hydraulic`] nodes.
pub mod hydraulic {
    pub const PRESSURE: usize = 0;
    pub const FLOW: usize = 1;
    pub const WAVE: usize = 2;
    pub const IMPEDANCE: usize = 3;
}

/// Slot indices for [`Domain::Mechanic`] nodes.
pub mod mechanic {
    pub const POSITION: usize = 0;
    pub const VELOCITY: usize = 1;
    pub const FORCE: usize = 2;
    pub const WAVE: usize = 3;
    pub const IMPEDANCE: usize = 4;
}

/// Slot indices for [`Domain::MechanicRotational`] nodes.
pub mod rotational {
    pub const ANGLE: usize = 0;
    pub const ANGULAR_VELOCITY: usize = 1;
    pub const TORQUE: usize = 2;
    pub const WAVE: usize = 3;
    pub const IMPEDANCE: usize = 4;
}

/// Slot indices for [`Domain::Electric`] nodes.
pub mod electric {
    pub const VOLTAGE: usize = 0;
    pub const CURRENT: usize = 1;
    pub const WAVE: usize = 2;
    pub const IMPEDANCE: usize = 3;
}

/// Slot indices for [`Domain::Pneumatic`] nodes.
pub mod pneumatic {
    pub const PRESSURE: usize = 0;
    pub const MASS_FLOW: usize = 1;
    pub const TEMPERATURE: usize = 2;
    pub const WAVE: usize = 3;
    pub const IMPEDANCE: usize = 4;
}

/// Slot indices for [`Domain::Signal`] nodes.
pub mod signal {
    pub const VALUE: usize = 0;
}
