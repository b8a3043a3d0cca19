//! Recursive binary serialization
//!
//! A value is encoded as either a fixed-width little-endian leaf or a
//! length-prefixed sequence whose elements are encoded recursively:
//!
//! ```text
//! leaf:      sizeof(T) bytes, little-endian
//! sequence:  u64 length, then each element recursively
//! ```
//!
//! Sequences nest, so `Vec<Vec<u32>>`, `Vec<String>` and similar shapes
//! round-trip without any per-type code. Custom types plug in by
//! implementing [`Serializable`] directly.

use crate::error::{JacobsonError, Result};
use crate::io::{DataInput, DataOutput};

/// A type with a defined binary encoding
pub trait Serializable: Sized {
    /// Write the value to `output`
    fn serialize<O: DataOutput>(&self, output: &mut O) -> Result<()>;

    /// Read a value back from `input`, expecting the `serialize` format
    fn deserialize<I: DataInput>(input: &mut I) -> Result<Self>;
}

macro_rules! impl_leaf_serializable {
    ($($t:ty),*) => {
        $(
            impl Serializable for $t {
                fn serialize<O: DataOutput>(&self, output: &mut O) -> Result<()> {
                    output.write_bytes(&self.to_le_bytes())
                }

                fn deserialize<I: DataInput>(input: &mut I) -> Result<Self> {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    input.read_bytes(&mut buf)?;
                    Ok(<$t>::from_le_bytes(buf))
                }
            }
        )*
    };
}

impl_leaf_serializable!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

/// Encode a slice as a length-prefixed sequence.
///
/// This is the sequence half of the format without requiring an owned
/// `Vec`; the `Vec<T>` impl delegates here.
pub fn serialize_seq<T: Serializable, O: DataOutput>(values: &[T], output: &mut O) -> Result<()> {
    output.write_u64(values.len() as u64)?;
    for value in values {
        value.serialize(output)?;
    }
    Ok(())
}

/// Read and validate a sequence length prefix.
///
/// Every element occupies at least one encoded byte, so a declared length
/// larger than the remaining input is rejected before any allocation.
fn read_sequence_len<I: DataInput>(input: &mut I) -> Result<usize> {
    let len = input.read_u64()?;
    if len > input.remaining() as u64 {
        return Err(JacobsonError::corrupt(format!(
            "sequence length {} exceeds {} remaining input bytes",
            len,
            input.remaining()
        )));
    }
    Ok(len as usize)
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize<O: DataOutput>(&self, output: &mut O) -> Result<()> {
        serialize_seq(self, output)
    }

    fn deserialize<I: DataInput>(input: &mut I) -> Result<Self> {
        let len = read_sequence_len(input)?;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(T::deserialize(input)?);
        }
        Ok(values)
    }
}

impl Serializable for String {
    fn serialize<O: DataOutput>(&self, output: &mut O) -> Result<()> {
        output.write_u64(self.len() as u64)?;
        output.write_bytes(self.as_bytes())
    }

    fn deserialize<I: DataInput>(input: &mut I) -> Result<Self> {
        let len = read_sequence_len(input)?;
        let bytes = input.read_vec(len)?;
        String::from_utf8(bytes)
            .map_err(|e| JacobsonError::corrupt(format!("invalid UTF-8 string: {}", e)))
    }
}
