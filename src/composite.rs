use std::fmt;
use std::sync::Arc;

use crate::{DescriptorDef, Value};

/// A described-type definition the registry can hand out: the descriptor,
/// the ordered field list of the list-shaped body, and how many leading
/// fields must be present for the value to be complete.
///
/// This is the open extension point of the codec. Protocol layers register
/// implementations at construction time; the dispatcher itself never needs
/// to know about any specific described type.
pub trait CompositeType: fmt::Debug + Send + Sync {
    /// Descriptor identifying this type on the wire.
    fn descriptor(&self) -> &DescriptorDef;

    /// Ordered field names, addressed by ordinal position in the body.
    fn fields(&self) -> &[&'static str];

    /// Number of leading fields that must be present. Encoding a value with
    /// fewer significant fields fails; so does decoding a shorter body.
    fn mandatory(&self) -> usize;
}

/// A plain, const-constructible [`CompositeType`]. Every protocol-defined
/// type uses this; custom trait impls are only needed for types whose field
/// layout isn't a compile-time constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeDef {
    descriptor: DescriptorDef,
    fields: &'static [&'static str],
    mandatory: usize,
}

impl CompositeDef {
    pub const fn new(
        name: &'static str,
        code: u64,
        fields: &'static [&'static str],
        mandatory: usize,
    ) -> Self {
        CompositeDef {
            descriptor: DescriptorDef::new(name, code),
            fields,
            mandatory,
        }
    }
}

impl CompositeType for CompositeDef {
    fn descriptor(&self) -> &DescriptorDef {
        &self.descriptor
    }

    fn fields(&self) -> &[&'static str] {
        self.fields
    }

    fn mandatory(&self) -> usize {
        self.mandatory
    }
}

/// A described value whose descriptor resolved to a registered definition.
///
/// Fields are addressed by ordinal position, never by name on the wire.
/// Unset fields hold [`Value::Null`]; a trailing run of null fields is
/// omitted from the encoded body and omitted fields decode back to null,
/// never to a default.
#[derive(Clone, Debug)]
pub struct Composite {
    def: Arc<dyn CompositeType>,
    fields: Vec<Value>,
}

impl Composite {
    /// A new composite with every field unset.
    pub fn new(def: Arc<dyn CompositeType>) -> Self {
        let fields = vec![Value::Null; def.fields().len()];
        Composite { def, fields }
    }

    /// Build a composite from already-decoded body fields. Fields beyond the
    /// decoded count are null; fields beyond the declared count are kept
    /// verbatim (a newer peer may know more fields than we do).
    pub fn from_fields(def: Arc<dyn CompositeType>, mut fields: Vec<Value>) -> Self {
        if fields.len() < def.fields().len() {
            fields.resize(def.fields().len(), Value::Null);
        }
        Composite { def, fields }
    }

    pub fn def(&self) -> &Arc<dyn CompositeType> {
        &self.def
    }

    pub fn descriptor(&self) -> &DescriptorDef {
        self.def.descriptor()
    }

    pub fn name(&self) -> &'static str {
        self.def.descriptor().name
    }

    /// Set a field by ordinal. Indexes past the declared field count grow
    /// the field array, filling the gap with nulls.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, Value::Null);
        }
        self.fields[index] = value.into();
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, index: usize, value: impl Into<Value>) -> Self {
        self.set(index, value);
        self
    }

    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Value> {
        let index = self.def.fields().iter().position(|f| *f == name)?;
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// The number of fields that must go on the wire: everything up to and
    /// including the highest-indexed non-null field.
    pub fn significant_fields(&self) -> usize {
        self.fields
            .iter()
            .rposition(|f| !f.is_null())
            .map_or(0, |i| i + 1)
    }
}

impl PartialEq for Composite {
    fn eq(&self, other: &Self) -> bool {
        // Trailing nulls don't survive a round-trip, so equality only
        // considers the significant prefix.
        let n = self.significant_fields();
        self.def.descriptor() == other.def.descriptor()
            && n == other.significant_fields()
            && self.fields[..n] == other.fields[..n]
    }
}
