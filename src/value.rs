use uuid::Uuid;

use crate::{Composite, Dec128, Dec32, Dec64, Described, Symbol, Timestamp};

/// A decoded AMQP value: the closed set of shapes the codec can put on the
/// wire. Described types appear either as [`Composite`] (descriptor known to
/// the registry, fields addressed by ordinal) or as [`Described`] (opaque
/// passthrough for descriptors nobody registered).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Ubyte(u8),
    Ushort(u16),
    Uint(u32),
    Ulong(u64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Dec32(Dec32),
    Dec64(Dec64),
    Dec128(Dec128),
    Char(char),
    Timestamp(Timestamp),
    Uuid(Uuid),
    Bin(Vec<u8>),
    Str(String),
    Sym(Symbol),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Array(Vec<Value>),
    Described(Box<Described>),
    Composite(Composite),
}

impl Value {
    pub fn name(&self) -> &'static str {
        use self::Value::*;
        match self {
            Null => "Null",
            Bool(_) => "Bool",
            Ubyte(_) => "Ubyte",
            Ushort(_) => "Ushort",
            Uint(_) => "Uint",
            Ulong(_) => "Ulong",
            Byte(_) => "Byte",
            Short(_) => "Short",
            Int(_) => "Int",
            Long(_) => "Long",
            Float(_) => "Float",
            Double(_) => "Double",
            Dec32(_) => "Dec32",
            Dec64(_) => "Dec64",
            Dec128(_) => "Dec128",
            Char(_) => "Char",
            Timestamp(_) => "Timestamp",
            Uuid(_) => "Uuid",
            Bin(_) => "Bin",
            Str(_) => "Str",
            Sym(_) => "Sym",
            List(_) => "List",
            Map(_) => "Map",
            Array(_) => "Array",
            Described(_) => "Described",
            Composite(_) => "Composite",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Value::Ubyte(_) | Value::Ushort(_) | Value::Uint(_) | Value::Ulong(_)
        )
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_)
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Double(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_sym(&self) -> bool {
        matches!(self, Value::Sym(_))
    }

    pub fn is_bin(&self) -> bool {
        matches!(self, Value::Bin(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self, Value::Uuid(_))
    }

    pub fn is_described(&self) -> bool {
        matches!(self, Value::Described(_) | Value::Composite(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(v) = *self {
            Some(v)
        } else {
            None
        }
    }

    /// Widen any unsigned variant to u64.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Ubyte(v) => Some(v as u64),
            Value::Ushort(v) => Some(v as u64),
            Value::Uint(v) => Some(v as u64),
            Value::Ulong(v) => Some(v),
            _ => None,
        }
    }

    /// Widen any signed variant to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Widen either floating variant to f64.
    pub fn as_floating(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v.into()),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        if let Value::Char(v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        if let Value::Timestamp(v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        if let Value::Uuid(v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::Str(ref v) = *self {
            Some(v.as_str())
        } else {
            None
        }
    }

    pub fn as_sym(&self) -> Option<&Symbol> {
        if let Value::Sym(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> Option<&[u8]> {
        if let Value::Bin(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        if let Value::Map(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_described(&self) -> Option<&Described> {
        if let Value::Described(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        if let Value::Composite(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    /// Look up a map value by string or symbol key.
    pub fn map_get(&self, key: &str) -> Option<&Value> {
        let map = self.as_map()?;
        map.iter()
            .find(|(k, _)| match k {
                Value::Str(s) => s == key,
                Value::Sym(s) => s == &key,
                _ => false,
            })
            .map(|(_, v)| v)
    }
}

macro_rules! impl_value_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_value_from!(bool, Bool);
impl_value_from!(u8, Ubyte);
impl_value_from!(u16, Ushort);
impl_value_from!(u32, Uint);
impl_value_from!(u64, Ulong);
impl_value_from!(i8, Byte);
impl_value_from!(i16, Short);
impl_value_from!(i32, Int);
impl_value_from!(i64, Long);
impl_value_from!(f32, Float);
impl_value_from!(f64, Double);
impl_value_from!(Dec32, Dec32);
impl_value_from!(Dec64, Dec64);
impl_value_from!(Dec128, Dec128);
impl_value_from!(char, Char);
impl_value_from!(Timestamp, Timestamp);
impl_value_from!(Uuid, Uuid);
impl_value_from!(Vec<u8>, Bin);
impl_value_from!(String, Str);
impl_value_from!(Symbol, Sym);
impl_value_from!(Composite, Composite);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bin(v.to_owned())
    }
}

impl From<Described> for Value {
    fn from(v: Described) -> Self {
        Value::Described(Box::new(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(v: Vec<(Value, Value)>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}
