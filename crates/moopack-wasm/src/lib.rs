//! WASM bindings for moopack-core.
//!
//! Exposes `encode` and `decode` as `#[wasm_bindgen]` functions so the browser
//! client can swap its JavaScript packet codec for this one. Values cross the
//! boundary as JSON text; packets cross as `Uint8Array`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p moopack-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/moopack_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Encode a JSON string into packet bytes.
///
/// Returns a `Uint8Array`, or throws a JS error if the input is not valid JSON
/// or holds a value the packet format cannot represent.
#[wasm_bindgen]
pub fn encode(json: &str) -> std::result::Result<Vec<u8>, JsValue> {
    moopack_core::encode_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode one packet into compact JSON text.
///
/// Throws a JS error on an unsupported opcode or a truncated packet.
#[wasm_bindgen]
pub fn decode(bytes: &[u8]) -> std::result::Result<String, JsValue> {
    moopack_core::decode_to_json(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}
