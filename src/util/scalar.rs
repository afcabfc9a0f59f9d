//! Scalar primitive types and little-endian scalar decoding.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// Primitive scalar type of a binary field.
///
/// Each type has a fixed size and a little-endian binary representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    Uint8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    Uint16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    Uint32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    Uint64,
    /// 32-bit floating point
    #[default]
    Float32,
    /// 64-bit floating point
    Float64,
}

impl ScalarType {
    /// Returns the size in bytes of a single value of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
        }
    }

    /// Parse a PLY property type name.
    ///
    /// Accepts both the classic names (`uchar`, `float`, ...) and the sized
    /// aliases (`uint8`, `float32`, ...). Anything else decodes as `Float32`.
    pub fn from_ply_name(name: &str) -> Self {
        match name {
            "char" | "int8" => Self::Int8,
            "uchar" | "uint8" => Self::Uint8,
            "short" | "int16" => Self::Int16,
            "ushort" | "uint16" => Self::Uint16,
            "int" | "int32" => Self::Int32,
            "uint" | "uint32" => Self::Uint32,
            "long" | "int64" => Self::Int64,
            "ulong" | "uint64" => Self::Uint64,
            "float" | "float32" => Self::Float32,
            "double" | "float64" => Self::Float64,
            _ => Self::Float32,
        }
    }

    /// Returns the canonical PLY name of this type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "char",
            Self::Uint8 => "uchar",
            Self::Int16 => "short",
            Self::Uint16 => "ushort",
            Self::Int32 => "int",
            Self::Uint32 => "uint",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float",
            Self::Float64 => "double",
        }
    }

    /// Returns true for the 8-bit unsigned type, the only one whose color
    /// channels get scaled into unit range.
    #[inline]
    pub const fn is_u8(self) -> bool {
        matches!(self, Self::Uint8)
    }

    /// Read one value of this type from `buf` at `offset`.
    ///
    /// Returns `None` when the value would run past the end of the buffer.
    #[inline]
    pub fn read(self, buf: &[u8], offset: usize) -> Option<f64> {
        let bytes = buf.get(offset..offset.checked_add(self.num_bytes())?)?;
        Some(match self {
            Self::Int8 => bytes[0] as i8 as f64,
            Self::Uint8 => bytes[0] as f64,
            Self::Int16 => LittleEndian::read_i16(bytes) as f64,
            Self::Uint16 => LittleEndian::read_u16(bytes) as f64,
            Self::Int32 => LittleEndian::read_i32(bytes) as f64,
            Self::Uint32 => LittleEndian::read_u32(bytes) as f64,
            Self::Int64 => LittleEndian::read_i64(bytes) as f64,
            Self::Uint64 => LittleEndian::read_u64(bytes) as f64,
            Self::Float32 => LittleEndian::read_f32(bytes) as f64,
            Self::Float64 => LittleEndian::read_f64(bytes),
        })
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read a little-endian f32 at `offset`, `None` past the end of `buf`.
#[inline]
pub(crate) fn read_f32_le(buf: &[u8], offset: usize) -> Option<f32> {
    let bytes = buf.get(offset..offset.checked_add(4)?)?;
    Some(LittleEndian::read_f32(bytes))
}
