//! Component type registry.

use crate::error::{SimError, SimResult};
use std::collections::HashMap;
use tlm_model::Component;

pub type Creator = Box<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// Maps component type names to constructors.
///
/// Registration order is preserved for listing; duplicate registration is an
/// error so two libraries cannot silently shadow each other's types.
#[derive(Default)]
pub struct ComponentFactory {
    order: Vec<String>,
    creators: HashMap<String, Creator>,
}

impl ComponentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        creator: impl Fn() -> Box<dyn Component> + Send + Sync + 'static,
    ) -> SimResult<()> {
        let name = name.into();
        if self.creators.contains_key(&name) {
            return Err(SimError::DuplicateType { name });
        }
        self.order.push(name.clone());
        self.creators.insert(name, Box::new(creator));
        Ok(())
    }

    pub fn create(&self, name: &str) -> SimResult<Box<dyn Component>> {
        let creator = self.creators.get(name).ok_or_else(|| SimError::UnknownType {
            name: name.to_string(),
        })?;
        Ok(creator())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    /// Registered type names, in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl std::fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("types", &self.order)
            .finish()
    }
}
