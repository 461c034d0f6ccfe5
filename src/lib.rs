//! amqp-pack implements the wire-level type system of AMQP 1.0: a
//! bidirectional codec between in-memory [`Value`]s and the canonical AMQP
//! byte encoding. Every higher-level protocol artifact — performatives, SASL
//! frames, message sections — is a described type built from this codec.
//!
//! What it covers:
//!
//! - Encoders and decoders for every primitive type of the core spec: null,
//!   booleans, fixed-width integers of 1/2/4/8 bytes, IEEE binary and
//!   decimal floating types, char, uuid, timestamp, and the variable-width
//!   binary/string/symbol types.
//! - The compound types — heterogeneous lists, key/value maps, homogeneous
//!   arrays (including arrays of arrays) — in both their compact 8-bit and
//!   full 32-bit size classes. Encoders pick the smallest form that fits;
//!   decoders accept every form of a logical type.
//! - Described types: a descriptor (symbolic or numeric) plus a list-shaped
//!   body of ordinally addressed fields, with trailing unset fields omitted
//!   from the wire. Descriptors known to the [`Registry`] decode into
//!   [`Composite`] values; everything else passes through opaquely as
//!   [`Described`], per the AMQP extensibility model.
//! - The [`Registry`] itself: additive, layered registration of described
//!   type definitions (transport, messaging, transactions, and optionally
//!   SASL), shared immutably across threads once built.
//!
//! The codec performs no I/O and holds no state between calls. Framing,
//! flow control, and session semantics belong to the engine layer that
//! feeds it buffers.
//!
//! ```
//! use amqp_pack::{decode_value, encode_to_vec, Registry, Value};
//!
//! let registry = Registry::standard();
//! let value = Value::List(vec![Value::Uint(300), Value::Str("hi".into())]);
//! let bytes = encode_to_vec(&value).unwrap();
//! let (decoded, rest) = decode_value(&registry, &bytes).unwrap();
//! assert_eq!(decoded, value);
//! assert!(rest.is_empty());
//! ```

mod composite;
mod decimal;
mod described;
mod error;
mod symbol;
mod timestamp;
mod value;

mod format_code;

pub mod decode;
pub mod encode;
pub mod protocol;
mod registry;

pub use self::composite::{Composite, CompositeDef, CompositeType};
pub use self::decimal::{Dec128, Dec32, Dec64};
pub use self::decode::{decode_value, Decoder};
pub use self::described::{Described, Descriptor, DescriptorDef};
pub use self::encode::{encode_to_vec, encode_value};
pub use self::error::{DecodeError, EncodeError};
pub use self::format_code::FormatCode;
pub use self::registry::Registry;
pub use self::symbol::Symbol;
pub use self::timestamp::Timestamp;
pub use self::value::Value;

pub use uuid::Uuid;

/// The deepest a value may nest compounds or described wrappers before the
/// decoder refuses it. Keeps hostile input from exhausting the stack;
/// legitimate protocol traffic nests a handful of levels at most.
pub const MAX_NEST_DEPTH: usize = 64;
