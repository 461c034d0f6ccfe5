//! IEEE 754-2008 decimal floating types.
//!
//! The codec carries decimal payloads opaquely: values round-trip through the
//! wire byte-for-byte, and no decimal arithmetic or normalization is
//! performed. Interpreting the payload belongs to whatever layer actually
//! does decimal math.

use std::fmt;

use serde::{
    de::{Deserialize, Deserializer},
    ser::{Serialize, Serializer},
};
use serde_bytes::ByteBuf;

macro_rules! decimal_type {
    ($name:ident, $size:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name([u8; $size]);

        impl $name {
            pub const SIZE: usize = $size;

            /// Wrap a raw big-endian decimal payload.
            pub fn from_be_bytes(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// The raw big-endian payload.
            pub fn to_be_bytes(self) -> [u8; $size] {
                self.0
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(0x"))?;
                for b in self.0.iter() {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, ")")
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bytes(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                use serde::de::Error;
                let buf = ByteBuf::deserialize(deserializer)?;
                let bytes: [u8; $size] = buf
                    .as_ref()
                    .try_into()
                    .map_err(|_| D::Error::invalid_length(buf.len(), &concat!($size, " bytes")))?;
                Ok($name(bytes))
            }
        }
    };
}

decimal_type!(Dec32, 4, "A decimal32 payload: IEEE 754-2008 decimal32 in big-endian byte order.");
decimal_type!(Dec64, 8, "A decimal64 payload: IEEE 754-2008 decimal64 in big-endian byte order.");
decimal_type!(Dec128, 16, "A decimal128 payload: IEEE 754-2008 decimal128 in big-endian byte order.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_passthrough() {
        let raw = [0x22u8, 0x30, 0x00, 0x00];
        let d = Dec32::from_be_bytes(raw);
        assert_eq!(d.to_be_bytes(), raw);
        assert_eq!(d.as_bytes(), &raw);
        assert_eq!(format!("{:?}", d), "Dec32(0x22300000)");
    }
}
