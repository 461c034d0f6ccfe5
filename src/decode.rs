use byteorder::{BigEndian, ReadBytesExt};
use uuid::Uuid;

use crate::{
    format_code::FormatCode, Composite, Dec128, Dec32, Dec64, DecodeError, Described, Descriptor,
    Registry, Symbol, Value, MAX_NEST_DEPTH,
};

/// Elements-worth of capacity to preallocate from wire-supplied counts.
/// Anything larger grows as it actually decodes, so a hostile count can't
/// reserve gigabytes up front.
const PREALLOC_LIMIT: usize = 4096;

/// Streaming decoder over a borrowed byte slice.
///
/// Each [`decode_value`](Self::decode_value) call consumes exactly one
/// value. The decoder peeks the tag byte before committing to a decode
/// path, so an unrecognized tag leaves the source positioned on the
/// offending byte.
#[derive(Clone, Debug)]
pub struct Decoder<'r, 'a> {
    data: &'a [u8],
    registry: &'r Registry,
    depth: usize,
}

/// Decode a single value, returning it along with the unconsumed remainder.
pub fn decode_value<'a>(
    registry: &Registry,
    data: &'a [u8],
) -> Result<(Value, &'a [u8]), DecodeError> {
    let mut decoder = Decoder::new(registry, data);
    let value = decoder.decode_value()?;
    Ok((value, decoder.remaining()))
}

impl<'r, 'a> Decoder<'r, 'a> {
    pub fn new(registry: &'r Registry, data: &'a [u8]) -> Decoder<'r, 'a> {
        Decoder {
            data,
            registry,
            depth: 0,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inspect the next tag byte without consuming it.
    pub fn peek_code(&self) -> Option<FormatCode> {
        self.data.first().and_then(|n| FormatCode::from_u8(*n))
    }

    /// Decode the next value from the source.
    pub fn decode_value(&mut self) -> Result<Value, DecodeError> {
        let byte = *self.data.first().ok_or(DecodeError::LengthTooShort {
            step: "read format code",
            actual: 0,
            expected: 1,
        })?;
        let code = FormatCode::from_u8(byte).ok_or(DecodeError::UnknownCode(byte))?;
        self.data = &self.data[1..];
        self.decode_payload(code)
    }

    // Decode the payload of a value whose tag has already been consumed.
    // Also the per-element entry point for arrays, where one shared tag
    // governs every payload.
    fn decode_payload(&mut self, code: FormatCode) -> Result<Value, DecodeError> {
        use self::FormatCode::*;
        let value = match code {
            Described => self.decode_described()?,
            Null => Value::Null,
            BoolTrue => Value::Bool(true),
            BoolFalse => Value::Bool(false),
            Bool => match self.read_u8("decode boolean")? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                v => {
                    return Err(DecodeError::BadEncode(format!(
                        "Got boolean with body byte {}",
                        v
                    )))
                }
            },
            Ubyte => Value::Ubyte(self.read_u8("decode ubyte")?),
            Ushort => Value::Ushort(self.read_u16("decode ushort")?),
            Uint => Value::Uint(self.read_u32("decode uint")?),
            SmallUint => Value::Uint(self.read_u8("decode smalluint")? as u32),
            Uint0 => Value::Uint(0),
            Ulong => Value::Ulong(self.read_u64("decode ulong")?),
            SmallUlong => Value::Ulong(self.read_u8("decode smallulong")? as u64),
            Ulong0 => Value::Ulong(0),
            Byte => Value::Byte(self.read_i8("decode byte")?),
            Short => Value::Short(self.read_i16("decode short")?),
            Int => Value::Int(self.read_i32("decode int")?),
            SmallInt => Value::Int(self.read_i8("decode smallint")? as i32),
            Long => Value::Long(self.read_i64("decode long")?),
            SmallLong => Value::Long(self.read_i8("decode smalllong")? as i64),
            Float => Value::Float(self.read_f32("decode float")?),
            Double => Value::Double(self.read_f64("decode double")?),
            Dec32 => {
                let bytes = self.take(4, "decode decimal32")?;
                Value::Dec32(self::Dec32::from_be_bytes(bytes.try_into().unwrap()))
            }
            Dec64 => {
                let bytes = self.take(8, "decode decimal64")?;
                Value::Dec64(self::Dec64::from_be_bytes(bytes.try_into().unwrap()))
            }
            Dec128 => {
                let bytes = self.take(16, "decode decimal128")?;
                Value::Dec128(self::Dec128::from_be_bytes(bytes.try_into().unwrap()))
            }
            Char => {
                let v = self.read_u32("decode char")?;
                Value::Char(char::from_u32(v).ok_or(DecodeError::BadChar(v))?)
            }
            Timestamp => Value::Timestamp(self.read_i64("decode timestamp")?.into()),
            Uuid => {
                let bytes = self.take(16, "decode uuid")?;
                Value::Uuid(self::Uuid::from_bytes(bytes.try_into().unwrap()))
            }
            Vbin8 => {
                let len = self.read_u8("decode vbin8 length")? as usize;
                Value::Bin(self.take(len, "get vbin8 content")?.to_vec())
            }
            Vbin32 => {
                let len = self.read_u32("decode vbin32 length")? as usize;
                Value::Bin(self.take(len, "get vbin32 content")?.to_vec())
            }
            Str8 => {
                let len = self.read_u8("decode str8 length")? as usize;
                Value::Str(self.take_str(len, "get str8 content")?.to_owned())
            }
            Str32 => {
                let len = self.read_u32("decode str32 length")? as usize;
                Value::Str(self.take_str(len, "get str32 content")?.to_owned())
            }
            Sym8 => {
                let len = self.read_u8("decode sym8 length")? as usize;
                Value::Sym(Symbol::from(self.take_str(len, "get sym8 content")?))
            }
            Sym32 => {
                let len = self.read_u32("decode sym32 length")? as usize;
                Value::Sym(Symbol::from(self.take_str(len, "get sym32 content")?))
            }
            List0 => Value::List(Vec::new()),
            List8 => self.decode_list(true)?,
            List32 => self.decode_list(false)?,
            Map8 => self.decode_map(true)?,
            Map32 => self.decode_map(false)?,
            Array8 => self.decode_array(true)?,
            Array32 => self.decode_array(false)?,
        };
        Ok(value)
    }

    fn decode_list(&mut self, small: bool) -> Result<Value, DecodeError> {
        let (count, body) = self.compound_header(small, "decode list")?;
        let mut inner = self.nested(body)?;
        let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            items.push(inner.decode_value()?);
        }
        inner.finish("list")?;
        Ok(Value::List(items))
    }

    fn decode_map(&mut self, small: bool) -> Result<Value, DecodeError> {
        let (count, body) = self.compound_header(small, "decode map")?;
        if count % 2 != 0 {
            return Err(DecodeError::BadEncode(format!(
                "Got map with odd entry count {}",
                count
            )));
        }
        let mut inner = self.nested(body)?;
        let mut pairs = Vec::with_capacity((count / 2).min(PREALLOC_LIMIT));
        for _ in 0..count / 2 {
            let key = inner.decode_value()?;
            let value = inner.decode_value()?;
            pairs.push((key, value));
        }
        inner.finish("map")?;
        Ok(Value::Map(pairs))
    }

    fn decode_array(&mut self, small: bool) -> Result<Value, DecodeError> {
        let (count, body) = self.compound_header(small, "decode array")?;
        let mut inner = self.nested(body)?;
        let byte = *inner.data.first().ok_or(DecodeError::LengthTooShort {
            step: "read array constructor",
            actual: 0,
            expected: 1,
        })?;
        let ctor = FormatCode::from_u8(byte).ok_or(DecodeError::UnknownCode(byte))?;
        if ctor == FormatCode::Described {
            return Err(DecodeError::BadEncode(
                "Described array elements are not supported".into(),
            ));
        }
        inner.data = &inner.data[1..];
        // every element payload takes at least one byte except under the
        // zero-width constructors (null, true, uint0, ...), and those only
        // get a modest allowance; otherwise a tiny input could declare
        // billions of elements
        if count > inner.data.len() && count > PREALLOC_LIMIT {
            return Err(DecodeError::BadEncode(format!(
                "Got array count {} with only {} body bytes",
                count,
                inner.data.len()
            )));
        }
        let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            items.push(inner.decode_payload(ctor)?);
        }
        inner.finish("array")?;
        Ok(Value::Array(items))
    }

    fn decode_described(&mut self) -> Result<Value, DecodeError> {
        // a run of described tags nests without any compound in between, so
        // the depth guard applies here too
        if self.depth >= MAX_NEST_DEPTH {
            return Err(DecodeError::ParseLimit("nesting depth exceeded"));
        }
        self.depth += 1;
        let result = self.decode_described_inner();
        self.depth -= 1;
        result
    }

    fn decode_described_inner(&mut self) -> Result<Value, DecodeError> {
        let descriptor = match self.decode_value()? {
            Value::Sym(sym) => Descriptor::Sym(sym),
            Value::Ulong(code) => Descriptor::Code(code),
            other => return Err(DecodeError::BadDescriptor(other.name())),
        };
        let body = self.decode_value()?;
        let Some(def) = self.registry.lookup(&descriptor) else {
            // unknown descriptors pass through opaquely, so extension types
            // we don't understand still round-trip intact
            return Ok(Value::Described(Box::new(Described { descriptor, body })));
        };
        match body {
            Value::List(fields) => {
                let required = def.mandatory();
                if fields.len() < required {
                    return Err(DecodeError::MissingFields {
                        name: def.descriptor().name,
                        required,
                        actual: fields.len(),
                    });
                }
                Ok(Value::Composite(Composite::from_fields(
                    def.clone(),
                    fields,
                )))
            }
            other => Err(DecodeError::BadEncode(format!(
                "Composite {} requires a list body, got {}",
                def.descriptor().name,
                other.name()
            ))),
        }
    }

    /// Read the size field, slice the declared body out of the source, and
    /// split off the count field. The returned slice holds exactly the
    /// elements, so over- and under-runs both surface as errors.
    fn compound_header(
        &mut self,
        small: bool,
        step: &'static str,
    ) -> Result<(usize, &'a [u8]), DecodeError> {
        let (size, count_width) = if small {
            (self.read_u8(step)? as usize, 1)
        } else {
            (self.read_u32(step)? as usize, 4)
        };
        let body = self.take(size, step)?;
        if body.len() < count_width {
            return Err(DecodeError::BadEncode(format!(
                "Got compound size {} too small to hold its count field",
                size
            )));
        }
        let (count_bytes, elements) = body.split_at(count_width);
        let count = if small {
            count_bytes[0] as usize
        } else {
            u32::from_be_bytes(count_bytes.try_into().unwrap()) as usize
        };
        Ok((count, elements))
    }

    fn nested(&self, body: &'a [u8]) -> Result<Decoder<'r, 'a>, DecodeError> {
        if self.depth >= MAX_NEST_DEPTH {
            return Err(DecodeError::ParseLimit("nesting depth exceeded"));
        }
        Ok(Decoder {
            data: body,
            registry: self.registry,
            depth: self.depth + 1,
        })
    }

    // Called once a compound's declared element count has been decoded; any
    // bytes left in the body mean the declared size lied.
    fn finish(&self, what: &'static str) -> Result<(), DecodeError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::BadEncode(format!(
                "Got {} whose declared size leaves {} undecoded bytes",
                what,
                self.data.len()
            )))
        }
    }

    fn take(&mut self, n: usize, step: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.data.len() {
            return Err(DecodeError::LengthTooShort {
                step,
                actual: self.data.len(),
                expected: n,
            });
        }
        let (bytes, rest) = self.data.split_at(n);
        self.data = rest;
        Ok(bytes)
    }

    fn take_str(&mut self, n: usize, step: &'static str) -> Result<&'a str, DecodeError> {
        let bytes = self.take(n, step)?;
        std::str::from_utf8(bytes).map_err(|e| DecodeError::BadEncode(format!("{}", e)))
    }

    fn read_u8(&mut self, step: &'static str) -> Result<u8, DecodeError> {
        self.data.read_u8().map_err(|_| DecodeError::LengthTooShort {
            step,
            actual: 0,
            expected: 1,
        })
    }

    fn read_i8(&mut self, step: &'static str) -> Result<i8, DecodeError> {
        self.data.read_i8().map_err(|_| DecodeError::LengthTooShort {
            step,
            actual: 0,
            expected: 1,
        })
    }

    fn read_u16(&mut self, step: &'static str) -> Result<u16, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_u16::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 2,
            })
    }

    fn read_i16(&mut self, step: &'static str) -> Result<i16, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_i16::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 2,
            })
    }

    fn read_u32(&mut self, step: &'static str) -> Result<u32, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_u32::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 4,
            })
    }

    fn read_i32(&mut self, step: &'static str) -> Result<i32, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_i32::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 4,
            })
    }

    fn read_u64(&mut self, step: &'static str) -> Result<u64, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_u64::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 8,
            })
    }

    fn read_i64(&mut self, step: &'static str) -> Result<i64, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_i64::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 8,
            })
    }

    fn read_f32(&mut self, step: &'static str) -> Result<f32, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_f32::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 4,
            })
    }

    fn read_f64(&mut self, step: &'static str) -> Result<f64, DecodeError> {
        let actual = self.data.len();
        self.data
            .read_f64::<BigEndian>()
            .map_err(|_| DecodeError::LengthTooShort {
                step,
                actual,
                expected: 8,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_to_vec, protocol, Timestamp};
    use std::sync::Arc;

    fn roundtrip(value: Value) {
        let reg = Registry::standard();
        let bytes = encode_to_vec(&value).unwrap();
        let (decoded, rest) = decode_value(&reg, &bytes).unwrap();
        assert!(rest.is_empty(), "{:?} left {} bytes", value, rest.len());
        assert_eq!(decoded, value);
    }

    fn decode_hex(reg: &Registry, hex_str: &str) -> Value {
        let bytes = hex::decode(hex_str).unwrap();
        let (value, rest) = decode_value(reg, &bytes).unwrap();
        assert!(rest.is_empty());
        value
    }

    #[test]
    fn primitive_roundtrips() {
        roundtrip(Value::Null);
        roundtrip(Value::Bool(true));
        roundtrip(Value::Bool(false));
        roundtrip(Value::Ubyte(0));
        roundtrip(Value::Ubyte(255));
        roundtrip(Value::Ushort(65535));
        roundtrip(Value::Uint(0));
        roundtrip(Value::Uint(255));
        roundtrip(Value::Uint(256));
        roundtrip(Value::Uint(u32::MAX));
        roundtrip(Value::Ulong(0));
        roundtrip(Value::Ulong(u32::MAX as u64 + 1));
        roundtrip(Value::Byte(-128));
        roundtrip(Value::Short(-1));
        roundtrip(Value::Int(-1));
        roundtrip(Value::Int(i32::MIN));
        roundtrip(Value::Long(-1));
        roundtrip(Value::Long(i64::MIN));
        roundtrip(Value::Float(std::f32::consts::PI));
        roundtrip(Value::Double(std::f64::consts::E));
        roundtrip(Value::Dec32(Dec32::from_be_bytes([1, 2, 3, 4])));
        roundtrip(Value::Dec64(Dec64::from_be_bytes([1, 2, 3, 4, 5, 6, 7, 8])));
        roundtrip(Value::Dec128(Dec128::from_be_bytes([9; 16])));
        roundtrip(Value::Char('∞'));
        roundtrip(Value::Timestamp(Timestamp::from_millis(-1)));
        roundtrip(Value::Uuid(Uuid::from_bytes([0xab; 16])));
        roundtrip(Value::Bin(vec![]));
        roundtrip(Value::Bin(vec![0; 300]));
        roundtrip(Value::Str(String::new()));
        roundtrip(Value::Str("naïveté".into()));
        roundtrip(Value::Sym(Symbol::from("amqp:decode-error")));
    }

    #[test]
    fn size_class_boundaries() {
        for len in [254usize, 255, 256, 257] {
            roundtrip(Value::Str("s".repeat(len)));
            roundtrip(Value::Bin(vec![7; len]));
            roundtrip(Value::Sym(Symbol::from("y".repeat(len))));
            roundtrip(Value::List(vec![Value::Null; len]));
            roundtrip(Value::Array(vec![Value::Ubyte(1); len]));
        }
        roundtrip(Value::Map(
            (0..200)
                .map(|i| (Value::Uint(i), Value::Bool(i % 2 == 0)))
                .collect(),
        ));
    }

    #[test]
    fn compound_roundtrips() {
        roundtrip(Value::List(vec![]));
        roundtrip(Value::List(vec![
            Value::Str("first".into()),
            Value::Uint(2),
            Value::Null,
            Value::List(vec![Value::Bool(false)]),
        ]));
        roundtrip(Value::Map(vec![
            (Value::Sym(Symbol::from("k1")), Value::Uint(1)),
            (Value::Uint(7), Value::Str("heterogeneous keys".into())),
        ]));
        roundtrip(Value::Array(vec![]));
        roundtrip(Value::Array(vec![
            Value::Str("one".into()),
            Value::Str("two".into()),
        ]));
        roundtrip(Value::Array(vec![Value::Long(-5), Value::Long(i64::MAX)]));
    }

    #[test]
    fn array_of_arrays() {
        let inner_a = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let inner_b = Value::Array(vec![Value::Int(4), Value::Int(5)]);
        let outer = Value::Array(vec![inner_a, inner_b]);
        let reg = Registry::standard();
        let bytes = encode_to_vec(&outer).unwrap();
        let (decoded, _) = decode_value(&reg, &bytes).unwrap();
        let outer_items = decoded.as_array().unwrap();
        assert_eq!(outer_items.len(), 2);
        assert_eq!(outer_items[0].as_array().unwrap().len(), 3);
        assert_eq!(outer_items[1].as_array().unwrap().len(), 2);
        assert_eq!(decoded, outer);
        // lists of arrays and arrays of lists too
        roundtrip(Value::List(vec![
            Value::Array(vec![Value::Ubyte(1)]),
            Value::Array(vec![Value::Short(-2), Value::Short(3)]),
        ]));
        roundtrip(Value::Array(vec![
            Value::List(vec![Value::Bool(true), Value::Str("mixed".into())]),
            Value::List(vec![]),
        ]));
    }

    #[test]
    fn alternate_wire_forms_accepted() {
        let reg = Registry::standard();
        // boolean in its 0x56 form
        assert_eq!(decode_hex(&reg, "5600"), Value::Bool(false));
        assert_eq!(decode_hex(&reg, "5601"), Value::Bool(true));
        // full-width forms of values the encoder would compact
        assert_eq!(decode_hex(&reg, "7000000000"), Value::Uint(0));
        assert_eq!(decode_hex(&reg, "8000000000000000ff"), Value::Ulong(255));
        assert_eq!(decode_hex(&reg, "71ffffffff"), Value::Int(-1));
        // a list8 the encoder would have written as list0
        assert_eq!(decode_hex(&reg, "c00100"), Value::List(vec![]));
    }

    #[test]
    fn boolean_bad_body() {
        let reg = Registry::standard();
        let err = decode_value(&reg, &[0x56, 0x02]).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
    }

    #[test]
    fn unknown_code_does_not_advance() {
        let reg = Registry::standard();
        let data = [0x3fu8, 0x40];
        let mut decoder = Decoder::new(&reg, &data);
        assert_eq!(
            decoder.decode_value().unwrap_err(),
            DecodeError::UnknownCode(0x3f)
        );
        assert_eq!(decoder.remaining(), &data[..]);
        assert_eq!(decoder.peek_code(), None);
    }

    #[test]
    fn truncated_payloads() {
        let reg = Registry::standard();
        assert_eq!(
            decode_value(&reg, &[0x70, 0x00, 0x00]).unwrap_err(),
            DecodeError::LengthTooShort {
                step: "decode uint",
                actual: 2,
                expected: 4
            }
        );
        assert_eq!(
            decode_value(&reg, &[0xa1, 0x05, b'h', b'i']).unwrap_err(),
            DecodeError::LengthTooShort {
                step: "get str8 content",
                actual: 2,
                expected: 5
            }
        );
        assert!(decode_value(&reg, &[]).is_err());
    }

    #[test]
    fn declared_size_must_match_content() {
        let reg = Registry::standard();
        // list8 claiming size 4 but holding one null element and a stray byte
        let err = decode_value(&reg, &[0xc0, 0x03, 0x01, 0x40, 0x40]).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
        // map with odd count
        let err = decode_value(&reg, &[0xc1, 0x02, 0x01, 0x40]).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
        // compound whose size can't hold its count field
        let err = decode_value(&reg, &[0xc0, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
    }

    #[test]
    fn bad_char_payload() {
        let reg = Registry::standard();
        // 0xd800 is a surrogate, not a scalar value
        let err = decode_value(&reg, &[0x73, 0x00, 0x00, 0xd8, 0x00]).unwrap_err();
        assert_eq!(err, DecodeError::BadChar(0xd800));
    }

    #[test]
    fn composite_roundtrip_with_trailing_omission() {
        let reg = Registry::standard();
        let open = Composite::new(reg.lookup_code(0x10).unwrap().clone())
            .with(0, "container-7")
            .with(1, "peer.example.org");
        let bytes = encode_to_vec(&Value::Composite(open.clone())).unwrap();
        let (decoded, _) = decode_value(&reg, &bytes).unwrap();
        let composite = decoded.as_composite().unwrap();
        // fields 2..10 decode to unset, not to any default
        assert_eq!(composite.fields().len(), 10);
        for i in 2..10 {
            assert_eq!(composite.field(i), Some(&Value::Null));
        }
        assert_eq!(
            composite.field_by_name("hostname"),
            Some(&Value::Str("peer.example.org".into()))
        );
        assert_eq!(decoded, Value::Composite(open));
    }

    #[test]
    fn composite_distinguishes_absent_and_empty_map() {
        let reg = Registry::standard();
        let def = reg.lookup_code(0x10).unwrap().clone();
        let absent = Composite::new(def.clone()).with(0, "c");
        let empty = Composite::new(def).with(0, "c").with(9, Value::Map(vec![]));
        let absent_bytes = encode_to_vec(&Value::Composite(absent)).unwrap();
        let empty_bytes = encode_to_vec(&Value::Composite(empty)).unwrap();
        assert_ne!(absent_bytes, empty_bytes);
        let (decoded, _) = decode_value(&reg, &empty_bytes).unwrap();
        let composite = decoded.as_composite().unwrap();
        assert_eq!(
            composite.field_by_name("properties"),
            Some(&Value::Map(vec![]))
        );
        let (decoded, _) = decode_value(&reg, &absent_bytes).unwrap();
        let composite = decoded.as_composite().unwrap();
        assert_eq!(composite.field_by_name("properties"), Some(&Value::Null));
    }

    #[test]
    fn unknown_descriptor_passthrough() {
        let reg = Registry::standard();
        // descriptor 0x99 is registered by nobody
        let value = decode_hex(&reg, "005399c0030143");
        let described = value.as_described().unwrap();
        assert_eq!(described.descriptor, Descriptor::Code(0x99));
        assert_eq!(described.body, Value::List(vec![Value::Uint(0)]));
        // and it re-encodes byte-for-byte
        assert_eq!(
            hex::encode(encode_to_vec(&value).unwrap()),
            "005399c0030143"
        );
        // symbolic descriptors pass through as well
        let sym = decode_hex(&reg, "00a3047465737445");
        assert_eq!(
            sym.as_described().unwrap().descriptor,
            Descriptor::from("test")
        );
    }

    #[test]
    fn known_descriptor_by_symbol_resolves() {
        let reg = Registry::standard();
        // "amqp:accepted:list" spelled symbolically, empty body
        let name = "amqp:accepted:list";
        let mut bytes = vec![0x00, 0xa3, name.len() as u8];
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0x45);
        let (decoded, _) = decode_value(&reg, &bytes).unwrap();
        let composite = decoded.as_composite().unwrap();
        assert_eq!(composite.descriptor().code, 0x24);
    }

    #[test]
    fn descriptor_must_be_symbol_or_ulong() {
        let reg = Registry::standard();
        // a boolean can't be a descriptor
        let err = decode_value(&reg, &[0x00, 0x41, 0x45]).unwrap_err();
        assert_eq!(err, DecodeError::BadDescriptor("Bool"));
        // neither can a uint, even though it's numeric
        let err = decode_value(&reg, &[0x00, 0x43, 0x45]).unwrap_err();
        assert_eq!(err, DecodeError::BadDescriptor("Uint"));
    }

    #[test]
    fn empty_body_composite_decodes() {
        let reg = Registry::standard();
        let (decoded, _) = decode_value(&reg, &hex::decode("00532445").unwrap()).unwrap();
        let composite = decoded.as_composite().unwrap();
        assert_eq!(composite.name(), "amqp:accepted:list");
        assert_eq!(composite.significant_fields(), 0);
    }

    #[test]
    fn composite_below_mandatory_is_distinct_error() {
        let reg = Registry::standard();
        // disposition (0x15) requires role and first; body has only role
        let err = decode_value(&reg, &hex::decode("005315c0030141").unwrap()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingFields {
                name: "amqp:disposition:list",
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn composite_with_extra_fields_is_retained() {
        let reg = Registry::standard();
        // end (0x17) declares one field; a newer peer sent two
        let (decoded, _) = decode_value(&reg, &hex::decode("005317c003024041").unwrap()).unwrap();
        let composite = decoded.as_composite().unwrap();
        assert_eq!(composite.fields().len(), 2);
        assert_eq!(composite.field(1), Some(&Value::Bool(true)));
    }

    #[test]
    fn composite_with_non_list_body_is_malformed() {
        let reg = Registry::standard();
        // transfer descriptor followed by a map body
        let err = decode_value(&reg, &hex::decode("005314c10100").unwrap()).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
    }

    #[test]
    fn described_array_elements_rejected() {
        let reg = Registry::standard();
        // array8 whose element constructor is the described tag
        let err = decode_value(&reg, &[0xe0, 0x02, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
    }

    #[test]
    fn implausible_array_count_rejected() {
        let reg = Registry::standard();
        // array32 declaring 100000 null elements in a zero-byte body
        let err = decode_value(&reg, &hex::decode("f000000005000186a040").unwrap()).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncode(_)));
        // a modest run of zero-width elements is fine
        let (decoded, _) = decode_value(&reg, &[0xe0, 0x02, 0x10, 0x41]).unwrap();
        assert_eq!(decoded, Value::Array(vec![Value::Bool(true); 16]));
    }

    #[test]
    fn nesting_depth_limit() {
        let reg = Registry::standard();
        let mut value = Value::List(vec![]);
        for _ in 0..(MAX_NEST_DEPTH + 4) {
            value = Value::List(vec![value]);
        }
        let bytes = encode_to_vec(&value).unwrap();
        let err = decode_value(&reg, &bytes).unwrap_err();
        assert_eq!(err, DecodeError::ParseLimit("nesting depth exceeded"));
    }

    #[test]
    fn sasl_layer_roundtrip() {
        let mut reg = Registry::standard();
        protocol::register_security_types(&mut reg);
        let init = Composite::new(Arc::new(protocol::SASL_INIT))
            .with(0, Symbol::from("PLAIN"))
            .with(1, Value::Bin(b"\0user\0pass".to_vec()));
        let bytes = encode_to_vec(&Value::Composite(init.clone())).unwrap();
        let (decoded, _) = decode_value(&reg, &bytes).unwrap();
        assert_eq!(decoded, Value::Composite(init));
        // without the security layer the same bytes are an opaque described value
        let core_only = Registry::standard();
        let (decoded, _) = decode_value(&core_only, &bytes).unwrap();
        assert!(decoded.as_described().is_some());
    }

    #[test]
    fn randomized_scalar_roundtrips() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let value = match rng.gen_range(0..10) {
                0 => Value::Ubyte(rng.gen()),
                1 => Value::Ushort(rng.gen()),
                2 => Value::Uint(rng.gen()),
                3 => Value::Ulong(rng.gen()),
                4 => Value::Byte(rng.gen()),
                5 => Value::Short(rng.gen()),
                6 => Value::Int(rng.gen()),
                7 => Value::Long(rng.gen()),
                8 => Value::Timestamp(Timestamp::from_millis(rng.gen())),
                _ => Value::Char(rng.gen()),
            };
            roundtrip(value);
        }
    }

    #[test]
    fn decoder_streams_multiple_values() {
        let reg = Registry::standard();
        let mut buf = bytes::BytesMut::new();
        crate::encode_value(&mut buf, &Value::Uint(1)).unwrap();
        crate::encode_value(&mut buf, &Value::Str("two".into())).unwrap();
        crate::encode_value(&mut buf, &Value::Bool(true)).unwrap();
        let mut decoder = Decoder::new(&reg, &buf);
        assert_eq!(decoder.peek_code(), Some(FormatCode::SmallUint));
        assert_eq!(decoder.decode_value().unwrap(), Value::Uint(1));
        assert_eq!(decoder.decode_value().unwrap(), Value::Str("two".into()));
        assert_eq!(decoder.decode_value().unwrap(), Value::Bool(true));
        assert!(decoder.is_empty());
    }
}
