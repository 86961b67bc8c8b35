use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the simulation graph.
///
/// Stored as index+1 so that `Option<Id>` stays pointer-sized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index.
    pub const fn from_index(index: u32) -> Self {
        match NonZeroU32::new(index + 1) {
            Some(n) => Self(n),
            None => panic!("id index overflow"),
        }
    }

    /// Recover the 0-based index.
    pub const fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Index as usize, for direct arena indexing.
    pub const fn idx(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Id of a node in the shared node store.
pub type NodeId = Id;
/// Id of a component within its owning system.
pub type CompId = Id;
/// Id of a port within its owning component (declaration order).
pub type PortId = Id;
