//! Packet decoder: converts MessagePack-subset bytes into a [`Value`] tree.
//!
//! The decoder is a cursor over a borrowed byte slice. Each call to
//! [`Decoder::read`] dispatches on one opcode byte and consumes exactly one
//! encoded value, recursing into arrays and maps.
//!
//! # Key design decisions
//!
//! - **Checked cursor**: every primitive read goes through `take`, which uses
//!   checked arithmetic and reports `OutOfBounds` with the offset, the bytes
//!   needed and the bytes left. The cursor never wraps.
//! - **Bounded pre-allocation**: a 32-bit container length is attacker
//!   controlled, so `Vec::with_capacity` is capped by the bytes remaining
//!   (every element occupies at least one byte).
//! - **Small recursive frames**: only container headers are parsed on the
//!   recursive path; the scalar opcode table lives in its own function.
//! - **Lossy strings**: malformed UTF-8 falls back to a Latin-1 passthrough
//!   instead of failing, so replayed captures never lose a packet to one bad
//!   string.
//!
//! # Example
//! ```
//! use moopack_core::{decode, Value};
//! let value = decode(&[0x93, 0x01, 0x02, 0x03]).unwrap();
//! assert_eq!(value, Value::Array(vec![1.into(), 2.into(), 3.into()]));
//! ```

use crate::error::{MoopackError, Result};
use crate::marker;
use crate::value::Value;
use tracing::{debug, trace};

/// Default nesting limit shared by the decoder and the encoder. Each level
/// costs a few recursive frames, so this must stay well inside a 2 MiB thread
/// stack even in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decode exactly one value from the front of `bytes`.
///
/// Trailing bytes after the first value are ignored. Use [`decode_all`] to
/// read a buffer of concatenated values.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    Decoder::new(bytes).read()
}

/// Decode every value in a buffer of concatenated encodings.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Value>> {
    Decoder::new(bytes).collect()
}

#[derive(Debug, Clone, Copy)]
enum Header {
    Array(usize),
    Map(usize),
    Scalar,
}

/// Read cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    max_depth: usize,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Decoder {
            buf,
            pos: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            failed: false,
        }
    }

    /// Reject containers nested deeper than `max_depth`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Current cursor offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume one encoded value starting at the cursor.
    pub fn read(&mut self) -> Result<Value> {
        self.read_value(0)
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        let b = self.u8()?;
        match self.read_header(b)? {
            Header::Array(len) => self.read_array(len, depth),
            Header::Map(len) => self.read_map(len, depth),
            Header::Scalar => self.read_scalar(b),
        }
    }

    /// Consume the length prefix of a container opcode. Scalars consume
    /// nothing here.
    fn read_header(&mut self, b: u8) -> Result<Header> {
        let header = match b {
            _ if b & marker::FIXMAP_MASK == marker::FIXMAP => {
                Header::Map(usize::from(b & marker::FIXMAP_LEN))
            }
            _ if b & marker::FIXARRAY_MASK == marker::FIXARRAY => {
                Header::Array(usize::from(b & marker::FIXARRAY_LEN))
            }
            marker::ARRAY_16 => Header::Array(usize::from(self.u16()?)),
            marker::ARRAY_32 => Header::Array(self.u32_len()?),
            marker::MAP_16 => Header::Map(usize::from(self.u16()?)),
            marker::MAP_32 => Header::Map(self.u32_len()?),
            _ => return Ok(Header::Scalar),
        };
        trace!(?header, offset = self.pos, "container");
        Ok(header)
    }

    fn read_scalar(&mut self, b: u8) -> Result<Value> {
        if b <= marker::POSITIVE_FIXINT_MAX {
            return Ok(Value::Integer(i64::from(b)));
        }
        if b & marker::FIXSTR_MASK == marker::FIXSTR {
            return self.read_str(usize::from(b & marker::FIXSTR_LEN));
        }

        match b {
            marker::NIL => Ok(Value::Nil),
            marker::FALSE => Ok(Value::Bool(false)),
            marker::TRUE => Ok(Value::Bool(true)),

            marker::FLOAT_32 => Ok(Value::Float(f64::from(f32::from_be_bytes(self.array()?)))),
            marker::FLOAT_64 => Ok(Value::Float(f64::from_be_bytes(self.array()?))),

            marker::UINT_8 => Ok(Value::Integer(i64::from(self.u8()?))),
            marker::UINT_16 => Ok(Value::Integer(i64::from(self.u16()?))),
            marker::UINT_32 => Ok(Value::Integer(i64::from(self.u32()?))),

            marker::INT_8 => Ok(Value::Integer(i64::from(i8::from_be_bytes(self.array()?)))),
            marker::INT_16 => Ok(Value::Integer(i64::from(i16::from_be_bytes(self.array()?)))),
            marker::INT_32 => Ok(Value::Integer(i64::from(i32::from_be_bytes(self.array()?)))),

            marker::STR_8 => {
                let len = usize::from(self.u8()?);
                self.read_str(len)
            }
            marker::STR_16 => {
                let len = usize::from(self.u16()?);
                self.read_str(len)
            }

            b if b >= marker::NEGATIVE_FIXINT => Ok(Value::Integer(i64::from(b as i8))),

            other => {
                debug!(opcode = other, offset = self.pos - 1, "unsupported opcode");
                Err(MoopackError::opcode(other))
            }
        }
    }

    fn read_str(&mut self, len: usize) -> Result<Value> {
        let bytes = self.take(len)?;
        let text = match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(err) => {
                debug!(len, %err, "malformed UTF-8, falling back to Latin-1");
                latin1(bytes)
            }
        };
        Ok(Value::String(text))
    }

    fn read_array(&mut self, len: usize, depth: usize) -> Result<Value> {
        let depth = self.enter(depth)?;
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(self.read_value(depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value> {
        let depth = self.enter(depth)?;
        let mut pairs = Vec::with_capacity(len.min(self.remaining() / 2));
        for _ in 0..len {
            let key = self.read_value(depth)?;
            let value = self.read_value(depth)?;
            pairs.push((key, value));
        }
        Ok(Value::Map(pairs))
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        if depth >= self.max_depth {
            debug!(limit = self.max_depth, offset = self.pos, "nesting too deep");
            return Err(MoopackError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    /// Advance the cursor by `n` bytes and return the span it passed over.
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let buf = self.buf;
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| MoopackError::OutOfBounds {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            })?;
        let span = &buf[self.pos..end];
        self.pos = end;
        Ok(span)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u32_len(&mut self) -> Result<usize> {
        let len = self.u32()?;
        // Lengths beyond the address space cannot be satisfied by any buffer.
        usize::try_from(len).map_err(|_| MoopackError::OutOfBounds {
            offset: self.pos,
            needed: usize::MAX,
            available: self.remaining(),
        })
    }
}

/// Reads consecutive values until the buffer is exhausted. Stops after the
/// first error.
impl Iterator for Decoder<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.is_empty() {
            return None;
        }
        let item = self.read();
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Map each byte to the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_preserves_every_byte() {
        let s = latin1(&[0x41, 0xe9, 0xff]);
        assert_eq!(s, "A\u{e9}\u{ff}");
        assert_eq!(s.chars().count(), 3);
    }

    #[test]
    fn take_reports_offset_and_shortfall() {
        let mut d = Decoder::new(&[0xcd, 0x01]);
        d.u8().unwrap();
        match d.u16() {
            Err(MoopackError::OutOfBounds {
                offset,
                needed,
                available,
            }) => {
                assert_eq!((offset, needed, available), (1, 2, 1));
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn forged_length_does_not_preallocate() {
        // array32 claiming u32::MAX elements with nothing behind it
        let err = decode(&[0xdd, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut d = Decoder::new(&[0x01, 0xc1, 0x02]);
        assert_eq!(d.next().unwrap().unwrap(), Value::Integer(1));
        assert!(d.next().unwrap().is_err());
        assert!(d.next().is_none());
    }
}
