use std::collections::HashMap;
use std::sync::Arc;

use crate::{protocol, CompositeType, Descriptor};

/// Maps wire descriptors to the described-type definitions that know how to
/// shape them, indexed under both the numeric code and the symbolic name.
///
/// Registration is additive and happens at construction time, before the
/// registry is shared; registering a definition whose descriptor is already
/// present replaces the prior entry (last registration wins). Once built,
/// the registry is read-only and can be shared freely across threads —
/// concurrent decodes borrow it without locking.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    by_code: HashMap<u64, Arc<dyn CompositeType>>,
    by_name: HashMap<&'static str, Arc<dyn CompositeType>>,
}

impl Registry {
    /// An empty registry. Every descriptor decodes to the opaque passthrough
    /// until definitions are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry loaded with the AMQP 1.0 core layers: transport
    /// performatives, messaging types, and transaction types. The SASL layer
    /// is separate; add it with [`protocol::register_security_types`].
    pub fn standard() -> Self {
        let mut reg = Self::new();
        protocol::register_transport_types(&mut reg);
        protocol::register_messaging_types(&mut reg);
        protocol::register_transaction_types(&mut reg);
        reg
    }

    /// Register a described-type definition under both descriptor forms.
    pub fn register(&mut self, def: Arc<dyn CompositeType>) {
        let descriptor = def.descriptor();
        self.by_code.insert(descriptor.code, def.clone());
        self.by_name.insert(descriptor.name, def);
    }

    pub fn lookup_code(&self, code: u64) -> Option<&Arc<dyn CompositeType>> {
        self.by_code.get(&code)
    }

    pub fn lookup_name(&self, name: &str) -> Option<&Arc<dyn CompositeType>> {
        self.by_name.get(name)
    }

    /// Resolve either descriptor form to its registered definition.
    pub fn lookup(&self, descriptor: &Descriptor) -> Option<&Arc<dyn CompositeType>> {
        match descriptor {
            Descriptor::Code(code) => self.lookup_code(*code),
            Descriptor::Sym(sym) => self.lookup_name(sym.as_str()),
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
