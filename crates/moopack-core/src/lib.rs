//! # moopack-core
//!
//! Pure-Rust encoder and decoder for the **MessagePack subset** spoken by
//! MooMoo game packets.
//!
//! Only the shapes those packets use are supported: nil, booleans, 32-bit
//! signed and unsigned integers, floats, strings, arrays and maps. Every value
//! is written in its smallest representation, and floats always travel as
//! float64. Binary, extension, timestamp and 64-bit integer opcodes are
//! neither emitted nor accepted.
//!
//! ## Quick start
//!
//! ```rust
//! use moopack_core::{decode, encode, Value};
//!
//! let packet = Value::Array(vec!["ch".into(), Value::Array(vec!["hi".into()])]);
//! let bytes = encode(&packet).unwrap();
//! assert_eq!(bytes, [0x92, 0xa2, b'c', b'h', 0x91, 0xa2, b'h', b'i']);
//!
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back, packet);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — `Value` → bytes
//! - [`decoder`] — bytes → `Value`
//! - [`value`] — the `Value` tree
//! - [`marker`] — opcode constants of the wire format
//! - [`json`] — `serde_json` bridge (`encode_json`, `decode_to_json`)
//! - [`error`] — error types for encode/decode failures

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod marker;
pub mod value;

pub use decoder::{decode, decode_all, Decoder, DEFAULT_MAX_DEPTH};
pub use encoder::{encode, encode_into, Encoder};
pub use error::{MoopackError, Result, UnsupportedType};
pub use json::{decode_to_json, encode_json};
pub use value::Value;
