use bytes::{BufMut, BytesMut};

use crate::{format_code::FormatCode, Composite, Descriptor, EncodeError, Value};

/// Largest payload a 32-bit size field can declare.
const MAX_SIZE: usize = u32::MAX as usize;

/// Encode a value onto the sink in its canonical wire form.
///
/// On failure the sink is truncated back to where this value started, so a
/// rejected value never leaves partial bytes behind.
pub fn encode_value(buf: &mut BytesMut, value: &Value) -> Result<(), EncodeError> {
    let start = buf.len();
    write_value(buf, value).map_err(|err| {
        buf.truncate(start);
        err
    })
}

/// Encode a value into a fresh byte vector.
pub fn encode_to_vec(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = BytesMut::new();
    encode_value(&mut buf, value)?;
    Ok(buf.to_vec())
}

fn write_value(buf: &mut BytesMut, value: &Value) -> Result<(), EncodeError> {
    use self::Value::*;
    match value {
        Null => buf.put_u8(FormatCode::Null.into()),
        Bool(v) => buf.put_u8(
            if *v {
                FormatCode::BoolTrue
            } else {
                FormatCode::BoolFalse
            }
            .into(),
        ),
        Ubyte(v) => {
            buf.put_u8(FormatCode::Ubyte.into());
            buf.put_u8(*v);
        }
        Ushort(v) => {
            buf.put_u8(FormatCode::Ushort.into());
            buf.put_u16(*v);
        }
        Uint(v) => {
            if *v == 0 {
                buf.put_u8(FormatCode::Uint0.into());
            } else if *v <= u8::MAX as u32 {
                buf.put_u8(FormatCode::SmallUint.into());
                buf.put_u8(*v as u8);
            } else {
                buf.put_u8(FormatCode::Uint.into());
                buf.put_u32(*v);
            }
        }
        Ulong(v) => write_ulong(buf, *v),
        Byte(v) => {
            buf.put_u8(FormatCode::Byte.into());
            buf.put_i8(*v);
        }
        Short(v) => {
            buf.put_u8(FormatCode::Short.into());
            buf.put_i16(*v);
        }
        Int(v) => {
            if *v >= i8::MIN as i32 && *v <= i8::MAX as i32 {
                buf.put_u8(FormatCode::SmallInt.into());
                buf.put_i8(*v as i8);
            } else {
                buf.put_u8(FormatCode::Int.into());
                buf.put_i32(*v);
            }
        }
        Long(v) => {
            if *v >= i8::MIN as i64 && *v <= i8::MAX as i64 {
                buf.put_u8(FormatCode::SmallLong.into());
                buf.put_i8(*v as i8);
            } else {
                buf.put_u8(FormatCode::Long.into());
                buf.put_i64(*v);
            }
        }
        Float(v) => {
            buf.put_u8(FormatCode::Float.into());
            buf.put_f32(*v);
        }
        Double(v) => {
            buf.put_u8(FormatCode::Double.into());
            buf.put_f64(*v);
        }
        Dec32(v) => {
            buf.put_u8(FormatCode::Dec32.into());
            buf.put_slice(v.as_bytes());
        }
        Dec64(v) => {
            buf.put_u8(FormatCode::Dec64.into());
            buf.put_slice(v.as_bytes());
        }
        Dec128(v) => {
            buf.put_u8(FormatCode::Dec128.into());
            buf.put_slice(v.as_bytes());
        }
        Char(v) => {
            buf.put_u8(FormatCode::Char.into());
            buf.put_u32(*v as u32);
        }
        Timestamp(v) => {
            buf.put_u8(FormatCode::Timestamp.into());
            buf.put_i64(v.millis());
        }
        Uuid(v) => {
            buf.put_u8(FormatCode::Uuid.into());
            buf.put_slice(v.as_bytes());
        }
        Bin(v) => write_variable(buf, FormatCode::Vbin8, FormatCode::Vbin32, v)?,
        Str(v) => write_variable(buf, FormatCode::Str8, FormatCode::Str32, v.as_bytes())?,
        Sym(v) => write_variable(buf, FormatCode::Sym8, FormatCode::Sym32, v.as_bytes())?,
        List(items) => write_list(buf, items)?,
        Map(pairs) => write_map(buf, pairs)?,
        Array(items) => write_array(buf, items)?,
        Described(d) => {
            buf.put_u8(FormatCode::Described.into());
            match &d.descriptor {
                Descriptor::Sym(sym) => {
                    write_variable(buf, FormatCode::Sym8, FormatCode::Sym32, sym.as_bytes())?
                }
                Descriptor::Code(code) => write_ulong(buf, *code),
            }
            write_value(buf, &d.body)?;
        }
        Composite(c) => write_composite(buf, c)?,
    }
    Ok(())
}

fn write_ulong(buf: &mut BytesMut, v: u64) {
    if v == 0 {
        buf.put_u8(FormatCode::Ulong0.into());
    } else if v <= u8::MAX as u64 {
        buf.put_u8(FormatCode::SmallUlong.into());
        buf.put_u8(v as u8);
    } else {
        buf.put_u8(FormatCode::Ulong.into());
        buf.put_u64(v);
    }
}

/// Variable-width types know their payload length up front (for strings,
/// the UTF-8 byte length), so the size class is chosen before writing.
fn write_variable(
    buf: &mut BytesMut,
    small: FormatCode,
    large: FormatCode,
    payload: &[u8],
) -> Result<(), EncodeError> {
    let len = payload.len();
    if len > MAX_SIZE {
        return Err(EncodeError::TooLong {
            max: MAX_SIZE,
            actual: len,
        });
    }
    if len <= u8::MAX as usize {
        buf.put_u8(small.into());
        buf.put_u8(len as u8);
    } else {
        buf.put_u8(large.into());
        buf.put_u32(len as u32);
    }
    buf.put_slice(payload);
    Ok(())
}

/// Write the size and count fields of a 32-bit compound form, then the body,
/// backpatching the size once the body length is known. Returns the body
/// length in bytes (count field excluded).
fn write_body32<F>(buf: &mut BytesMut, count: usize, body: F) -> Result<usize, EncodeError>
where
    F: FnOnce(&mut BytesMut) -> Result<(), EncodeError>,
{
    if count > MAX_SIZE {
        return Err(EncodeError::TooLong {
            max: MAX_SIZE,
            actual: count,
        });
    }
    let size_at = buf.len();
    buf.put_u32(0); // size, backpatched below
    buf.put_u32(count as u32);
    let body_start = buf.len();
    body(buf)?;
    let body_len = buf.len() - body_start;
    let size = body_len + 4;
    if size > MAX_SIZE {
        return Err(EncodeError::TooLong {
            max: MAX_SIZE,
            actual: size,
        });
    }
    buf[size_at..size_at + 4].copy_from_slice(&(size as u32).to_be_bytes());
    Ok(body_len)
}

/// Compound writer shared by lists, maps, arrays, and composite bodies:
/// optimistically write the 32-bit form, then squeeze out the six surplus
/// header bytes if the finished body fits the 8-bit form.
fn write_compound<F>(
    buf: &mut BytesMut,
    small: FormatCode,
    large: FormatCode,
    count: usize,
    body: F,
) -> Result<(), EncodeError>
where
    F: FnOnce(&mut BytesMut) -> Result<(), EncodeError>,
{
    buf.put_u8(large.into());
    let size_at = buf.len();
    let body_len = write_body32(buf, count, body)?;
    if body_len + 1 <= u8::MAX as usize && count <= u8::MAX as usize {
        let tag_at = size_at - 1;
        let body_start = size_at + 8;
        buf[tag_at] = small.into();
        buf[tag_at + 1] = (body_len + 1) as u8;
        buf[tag_at + 2] = count as u8;
        buf.copy_within(body_start..body_start + body_len, tag_at + 3);
        buf.truncate(tag_at + 3 + body_len);
    }
    Ok(())
}

fn write_list(buf: &mut BytesMut, items: &[Value]) -> Result<(), EncodeError> {
    if items.is_empty() {
        buf.put_u8(FormatCode::List0.into());
        return Ok(());
    }
    write_compound(
        buf,
        FormatCode::List8,
        FormatCode::List32,
        items.len(),
        |buf| items.iter().try_for_each(|item| write_value(buf, item)),
    )
}

fn write_map(buf: &mut BytesMut, pairs: &[(Value, Value)]) -> Result<(), EncodeError> {
    // the on-wire count is keys plus values, not pairs
    write_compound(
        buf,
        FormatCode::Map8,
        FormatCode::Map32,
        pairs.len() * 2,
        |buf| {
            pairs.iter().try_for_each(|(key, value)| {
                write_value(buf, key)?;
                write_value(buf, value)
            })
        },
    )
}

fn write_array(buf: &mut BytesMut, items: &[Value]) -> Result<(), EncodeError> {
    write_compound(
        buf,
        FormatCode::Array8,
        FormatCode::Array32,
        items.len(),
        |buf| write_array_body(buf, items),
    )
}

/// The element constructor, written once, followed by payload-only elements.
fn write_array_body(buf: &mut BytesMut, items: &[Value]) -> Result<(), EncodeError> {
    let Some(first) = items.first() else {
        // an empty array still carries a constructor; null is the only
        // choice that doesn't invent an element type
        buf.put_u8(FormatCode::Null.into());
        return Ok(());
    };
    for item in items {
        if item.is_null() {
            return Err(EncodeError::NullInArray);
        }
        if std::mem::discriminant(item) != std::mem::discriminant(first) {
            return Err(EncodeError::MixedArray {
                expected: first.name(),
                actual: item.name(),
            });
        }
    }
    buf.put_u8(array_constructor(first)?.into());
    items
        .iter()
        .try_for_each(|item| write_array_payload(buf, item))
}

/// One wire form must serve every element, so compact and small forms are
/// off the table: numerics are full-width, variable-width and compound
/// elements use their 32-bit forms.
fn array_constructor(value: &Value) -> Result<FormatCode, EncodeError> {
    use self::Value::*;
    Ok(match value {
        Bool(_) => FormatCode::Bool,
        Ubyte(_) => FormatCode::Ubyte,
        Ushort(_) => FormatCode::Ushort,
        Uint(_) => FormatCode::Uint,
        Ulong(_) => FormatCode::Ulong,
        Byte(_) => FormatCode::Byte,
        Short(_) => FormatCode::Short,
        Int(_) => FormatCode::Int,
        Long(_) => FormatCode::Long,
        Float(_) => FormatCode::Float,
        Double(_) => FormatCode::Double,
        Dec32(_) => FormatCode::Dec32,
        Dec64(_) => FormatCode::Dec64,
        Dec128(_) => FormatCode::Dec128,
        Char(_) => FormatCode::Char,
        Timestamp(_) => FormatCode::Timestamp,
        Uuid(_) => FormatCode::Uuid,
        Bin(_) => FormatCode::Vbin32,
        Str(_) => FormatCode::Str32,
        Sym(_) => FormatCode::Sym32,
        List(_) => FormatCode::List32,
        Map(_) => FormatCode::Map32,
        Array(_) => FormatCode::Array32,
        Null | Described(_) | Composite(_) => {
            return Err(EncodeError::UnsupportedArrayElement(value.name()))
        }
    })
}

fn write_array_payload(buf: &mut BytesMut, value: &Value) -> Result<(), EncodeError> {
    use self::Value::*;
    match value {
        Bool(v) => buf.put_u8(*v as u8),
        Ubyte(v) => buf.put_u8(*v),
        Ushort(v) => buf.put_u16(*v),
        Uint(v) => buf.put_u32(*v),
        Ulong(v) => buf.put_u64(*v),
        Byte(v) => buf.put_i8(*v),
        Short(v) => buf.put_i16(*v),
        Int(v) => buf.put_i32(*v),
        Long(v) => buf.put_i64(*v),
        Float(v) => buf.put_f32(*v),
        Double(v) => buf.put_f64(*v),
        Dec32(v) => buf.put_slice(v.as_bytes()),
        Dec64(v) => buf.put_slice(v.as_bytes()),
        Dec128(v) => buf.put_slice(v.as_bytes()),
        Char(v) => buf.put_u32(*v as u32),
        Timestamp(v) => buf.put_i64(v.millis()),
        Uuid(v) => buf.put_slice(v.as_bytes()),
        Bin(v) => write_variable32(buf, v)?,
        Str(v) => write_variable32(buf, v.as_bytes())?,
        Sym(v) => write_variable32(buf, v.as_bytes())?,
        List(items) => {
            write_body32(buf, items.len(), |buf| {
                items.iter().try_for_each(|item| write_value(buf, item))
            })?;
        }
        Map(pairs) => {
            write_body32(buf, pairs.len() * 2, |buf| {
                pairs.iter().try_for_each(|(key, value)| {
                    write_value(buf, key)?;
                    write_value(buf, value)
                })
            })?;
        }
        Array(items) => {
            write_body32(buf, items.len(), |buf| write_array_body(buf, items))?;
        }
        Null | Described(_) | Composite(_) => {
            return Err(EncodeError::UnsupportedArrayElement(value.name()))
        }
    }
    Ok(())
}

fn write_variable32(buf: &mut BytesMut, payload: &[u8]) -> Result<(), EncodeError> {
    if payload.len() > MAX_SIZE {
        return Err(EncodeError::TooLong {
            max: MAX_SIZE,
            actual: payload.len(),
        });
    }
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    Ok(())
}

/// Described tag, numeric descriptor, then the significant fields as a list
/// body with the trailing null run omitted. The mandatory-field check runs
/// before any byte is committed.
fn write_composite(buf: &mut BytesMut, composite: &Composite) -> Result<(), EncodeError> {
    let significant = composite.significant_fields();
    let required = composite.def().mandatory();
    if significant < required {
        return Err(EncodeError::MissingFields {
            name: composite.name(),
            required,
            actual: significant,
        });
    }
    buf.put_u8(FormatCode::Described.into());
    write_ulong(buf, composite.descriptor().code);
    let fields = &composite.fields()[..significant];
    if fields.is_empty() {
        buf.put_u8(FormatCode::List0.into());
        return Ok(());
    }
    write_compound(
        buf,
        FormatCode::List8,
        FormatCode::List32,
        fields.len(),
        |buf| fields.iter().try_for_each(|field| write_value(buf, field)),
    )
}
