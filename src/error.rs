use std::fmt;

/// Errors that can occur while encoding a value into its wire form.
///
/// A failed encode leaves the sink exactly as it was before the value's first
/// byte; callers never see a partially written value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// A size or count field would exceed what the 32-bit wire form can carry.
    TooLong { max: usize, actual: usize },
    /// A composite had fewer significant fields than its definition requires.
    MissingFields {
        name: &'static str,
        required: usize,
        actual: usize,
    },
    /// An array contained a null element. Arrays carry one constructor for
    /// all elements, so there is no per-element null representation.
    NullInArray,
    /// An array mixed elements of different types.
    MixedArray {
        expected: &'static str,
        actual: &'static str,
    },
    /// An array contained an element type that has no array form.
    UnsupportedArrayElement(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::TooLong { max, actual } => write!(
                f,
                "Encoded size too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
            EncodeError::MissingFields {
                name,
                required,
                actual,
            } => write!(
                f,
                "Composite {} requires {} fields, but only {} were set",
                name, required, actual
            ),
            EncodeError::NullInArray => f.write_str("Arrays cannot hold null elements"),
            EncodeError::MixedArray { expected, actual } => write!(
                f,
                "Array of {} cannot hold an element of type {}",
                expected, actual
            ),
            EncodeError::UnsupportedArrayElement(name) => {
                write!(f, "Type {} has no array element form", name)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors that can occur while decoding a value from its wire form.
///
/// An unknown descriptor is *not* an error: it decodes into an opaque
/// [`Described`](crate::Described) value, per the AMQP extensibility model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The tag byte doesn't correspond to any known format code. The source
    /// is left positioned on the offending byte.
    UnknownCode(u8),
    /// The source ended before the value's payload did.
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// A described value's body list held fewer fields than the registered
    /// definition requires. Distinct from the unknown-descriptor case, so
    /// callers can tell a malformed known type from a type they don't know.
    MissingFields {
        name: &'static str,
        required: usize,
        actual: usize,
    },
    /// A char payload wasn't a valid Unicode scalar value.
    BadChar(u32),
    /// A descriptor was neither a symbol nor an unsigned long.
    BadDescriptor(&'static str),
    /// Basic wire encoding failure: declared sizes not matching content,
    /// odd map counts, invalid UTF-8, and the like.
    BadEncode(String),
    /// Nesting depth exceeded the decoder's limit.
    ParseLimit(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::UnknownCode(code) => {
                write!(f, "Unknown format code 0x{:02x}", code)
            }
            DecodeError::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            DecodeError::MissingFields {
                name,
                required,
                actual,
            } => write!(
                f,
                "Composite {} requires {} fields, but decoded only {}",
                name, required, actual
            ),
            DecodeError::BadChar(v) => {
                write!(f, "Value 0x{:08x} is not a valid char", v)
            }
            DecodeError::BadDescriptor(found) => {
                write!(f, "Descriptor must be a symbol or ulong, got {}", found)
            }
            DecodeError::BadEncode(ref err) => {
                write!(f, "Basic data encoding failure: {}", err)
            }
            DecodeError::ParseLimit(err) => write!(f, "Hit parsing limit: {}", err),
        }
    }
}

impl std::error::Error for DecodeError {}
