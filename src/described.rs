use std::fmt;

use crate::{Symbol, Value};

/// A descriptor identifying a described type on the wire, in either of its
/// two forms: a symbolic name or a 64-bit numeric code. Both forms resolve
/// to the same logical type through the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Sym(Symbol),
    Code(u64),
}

impl Descriptor {
    pub fn code(&self) -> Option<u64> {
        match self {
            Descriptor::Code(code) => Some(*code),
            Descriptor::Sym(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Descriptor::Sym(sym) => Some(sym.as_str()),
            Descriptor::Code(_) => None,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Descriptor::Sym(sym) => f.write_str(sym.as_str()),
            Descriptor::Code(code) => write!(f, "0x{:016x}", code),
        }
    }
}

impl From<&str> for Descriptor {
    fn from(name: &str) -> Self {
        Descriptor::Sym(Symbol::from(name))
    }
}

impl From<Symbol> for Descriptor {
    fn from(sym: Symbol) -> Self {
        Descriptor::Sym(sym)
    }
}

impl From<u64> for Descriptor {
    fn from(code: u64) -> Self {
        Descriptor::Code(code)
    }
}

/// The compile-time descriptor constant owned by a described-type
/// definition: the symbolic name and numeric code are two spellings of one
/// identity, and the registry indexes both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorDef {
    pub name: &'static str,
    pub code: u64,
}

impl DescriptorDef {
    pub const fn new(name: &'static str, code: u64) -> Self {
        DescriptorDef { name, code }
    }

    /// True when `descriptor` is either spelling of this definition.
    pub fn matches(&self, descriptor: &Descriptor) -> bool {
        match descriptor {
            Descriptor::Sym(sym) => sym.as_str() == self.name,
            Descriptor::Code(code) => *code == self.code,
        }
    }
}

impl fmt::Display for DescriptorDef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:016x})", self.name, self.code)
    }
}

/// A described value whose descriptor has no registered definition: the raw
/// descriptor and body are preserved unchanged, so unknown extension types
/// pass through a decode/encode cycle intact.
#[derive(Clone, Debug, PartialEq)]
pub struct Described {
    pub descriptor: Descriptor,
    pub body: Value,
}

impl Described {
    pub fn new(descriptor: impl Into<Descriptor>, body: Value) -> Self {
        Described {
            descriptor: descriptor.into(),
            body,
        }
    }
}
