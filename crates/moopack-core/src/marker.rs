//! Opcode (marker) byte constants for the supported MessagePack subset.
//!
//! Every multi-byte payload that follows a marker is big-endian.

// Positive fixint: 0x00..=0x7F
pub const POSITIVE_FIXINT_MAX: u8 = 0x7F;

// Fixed-size containers: high bits select the family, low bits carry the length.
pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXSTR: u8 = 0xA0;

pub const FIXMAP_MASK: u8 = 0xF0;
pub const FIXARRAY_MASK: u8 = 0xF0;
pub const FIXSTR_MASK: u8 = 0xE0;

pub const FIXMAP_LEN: u8 = 0x0F;
pub const FIXARRAY_LEN: u8 = 0x0F;
pub const FIXSTR_LEN: u8 = 0x1F;

// Nil / Boolean
pub const NIL: u8 = 0xC0;
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

// Float (IEEE 754)
pub const FLOAT_32: u8 = 0xCA;
pub const FLOAT_64: u8 = 0xCB;

// Unsigned integer
pub const UINT_8: u8 = 0xCC;
pub const UINT_16: u8 = 0xCD;
pub const UINT_32: u8 = 0xCE;

// Signed integer
pub const INT_8: u8 = 0xD0;
pub const INT_16: u8 = 0xD1;
pub const INT_32: u8 = 0xD2;

// String
pub const STR_8: u8 = 0xD9;
pub const STR_16: u8 = 0xDA;

// Array
pub const ARRAY_16: u8 = 0xDC;
pub const ARRAY_32: u8 = 0xDD;

// Map
pub const MAP_16: u8 = 0xDE;
pub const MAP_32: u8 = 0xDF;

// Negative fixint: 0xE0..=0xFF (-32..=-1)
pub const NEGATIVE_FIXINT: u8 = 0xE0;

/// Smallest integer the encoder emits as an integer opcode.
pub const INT_MIN: i64 = i32::MIN as i64;
/// Largest integer the encoder emits as an integer opcode.
pub const INT_MAX: i64 = u32::MAX as i64;

/// Length exclusive upper bounds for the fixed-size families.
pub const FIXSTR_LIMIT: usize = 32;
pub const FIXCOLLECTION_LIMIT: usize = 16;
