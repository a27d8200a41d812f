//! Packet encoder: converts a [`Value`] tree into MessagePack-subset bytes.
//!
//! Every value is written in the smallest representation the supported opcode
//! table allows:
//!
//! - **Integers** in `[-2^31, 2^32-1]`: fixint, then 8/16/32-bit unsigned for
//!   non-negative values and 8/16/32-bit signed for negative ones
//! - **Floats** and out-of-range integers: always float64
//! - **Strings**: fixstr, str8, str16 by UTF-8 byte length
//! - **Arrays / maps**: fix family, then 16-bit and 32-bit length prefixes
//!
//! # Example
//! ```
//! use moopack_core::{encode, Value};
//! let bytes = encode(&Value::from("hello")).unwrap();
//! assert_eq!(bytes, [0xa5, b'h', b'e', b'l', b'l', b'o']);
//! ```

use crate::decoder::DEFAULT_MAX_DEPTH;
use crate::error::{MoopackError, Result};
use crate::marker;
use crate::value::Value;
use tracing::{debug, trace};

/// Initial output capacity, enough for a typical game packet.
const DEFAULT_CAPACITY: usize = 256;

/// Encode a value tree into a freshly allocated, exactly sized buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut enc = Encoder::new();
    enc.write(value)?;
    Ok(enc.into_bytes())
}

/// Append the encoding of `value` to `out`.
///
/// On error `out` is truncated back to its original length, so a failed value
/// never leaves half a packet behind.
pub fn encode_into(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    let mut enc = Encoder::from_vec(std::mem::take(out));
    let result = enc.write(value);
    *out = enc.buf;
    if result.is_err() {
        out.truncate(start);
    }
    result
}

/// Growable output buffer plus the recursive writer.
#[derive(Debug, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
    max_depth: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// An encoder whose buffer starts with room for `capacity` bytes. The
    /// buffer still doubles on demand.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    fn from_vec(buf: Vec<u8>) -> Self {
        Encoder {
            buf,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Reject containers nested deeper than `max_depth`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Finish encoding, trimming the buffer to its exact length.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.shrink_to_fit();
        self.buf
    }

    /// Append one value.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        self.write_value(value, 0)
    }

    fn write_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Nil => self.put(marker::NIL),
            Value::Bool(b) => self.put(if *b { marker::TRUE } else { marker::FALSE }),
            Value::Integer(n) => self.write_integer(*n),
            Value::Float(f) => self.write_f64(*f),
            Value::String(s) => self.write_str(s)?,
            Value::Array(items) => {
                let depth = self.enter(depth)?;
                self.write_len(
                    items.len(),
                    marker::FIXARRAY,
                    marker::ARRAY_16,
                    marker::ARRAY_32,
                    "array64",
                )?;
                for item in items {
                    self.write_value(item, depth)?;
                }
            }
            Value::Map(pairs) => {
                let depth = self.enter(depth)?;
                self.write_len(
                    pairs.len(),
                    marker::FIXMAP,
                    marker::MAP_16,
                    marker::MAP_32,
                    "map64",
                )?;
                for (key, val) in pairs {
                    self.write_value(key, depth)?;
                    self.write_value(val, depth)?;
                }
            }
        }
        Ok(())
    }

    fn write_integer(&mut self, n: i64) {
        if !(marker::INT_MIN..=marker::INT_MAX).contains(&n) {
            // No 64-bit integer opcodes: large magnitudes travel as doubles.
            self.write_f64(n as f64);
            return;
        }
        if n >= 0 {
            if n <= i64::from(marker::POSITIVE_FIXINT_MAX) {
                self.put(n as u8);
            } else if let Ok(v) = u8::try_from(n) {
                self.put(marker::UINT_8);
                self.put(v);
            } else if let Ok(v) = u16::try_from(n) {
                self.put(marker::UINT_16);
                self.extend(&v.to_be_bytes());
            } else {
                self.put(marker::UINT_32);
                self.extend(&(n as u32).to_be_bytes());
            }
        } else if n >= -32 {
            self.put(marker::NEGATIVE_FIXINT | (n + 32) as u8);
        } else if let Ok(v) = i8::try_from(n) {
            self.put(marker::INT_8);
            self.extend(&v.to_be_bytes());
        } else if let Ok(v) = i16::try_from(n) {
            self.put(marker::INT_16);
            self.extend(&v.to_be_bytes());
        } else {
            self.put(marker::INT_32);
            self.extend(&(n as i32).to_be_bytes());
        }
    }

    fn write_f64(&mut self, f: f64) {
        self.put(marker::FLOAT_64);
        self.extend(&f.to_be_bytes());
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        let n = bytes.len();
        if n < marker::FIXSTR_LIMIT {
            self.put(marker::FIXSTR | n as u8);
        } else if let Ok(len) = u8::try_from(n) {
            self.put(marker::STR_8);
            self.put(len);
        } else if let Ok(len) = u16::try_from(n) {
            self.put(marker::STR_16);
            self.extend(&len.to_be_bytes());
        } else {
            return Err(unsupported("str32"));
        }
        self.extend(bytes);
        Ok(())
    }

    /// Write a container header. Fails only when `n` exceeds 32 bits.
    fn write_len(
        &mut self,
        n: usize,
        fix: u8,
        tier16: u8,
        tier32: u8,
        oversize: &'static str,
    ) -> Result<()> {
        trace!(len = n, fix, "container");
        if n < marker::FIXCOLLECTION_LIMIT {
            self.put(fix | n as u8);
        } else if let Ok(len) = u16::try_from(n) {
            self.put(tier16);
            self.extend(&len.to_be_bytes());
        } else {
            let len = u32::try_from(n).map_err(|_| unsupported(oversize))?;
            self.put(tier32);
            self.extend(&len.to_be_bytes());
        }
        Ok(())
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        if depth >= self.max_depth {
            debug!(limit = self.max_depth, "nesting too deep");
            return Err(MoopackError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn put(&mut self, b: u8) {
        self.buf.push(b);
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

fn unsupported(type_name: &'static str) -> MoopackError {
    debug!(type_name, "value has no encoding");
    MoopackError::value(type_name)
}
