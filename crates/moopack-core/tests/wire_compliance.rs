/// Wire-format compliance tests
///
/// Byte-exact vectors for the supported MessagePack subset. Every encoding the
/// game server expects is pinned here, along with the boundary where each
/// value family moves to its next opcode tier. Standard MessagePack encoders
/// produce the same bytes for these inputs, so captured packets from the real
/// client decode unchanged.
use moopack_core::{decode, encode, marker, MoopackError, UnsupportedType, Value};

/// Assert that encoding produces the exact expected bytes, and that the bytes
/// decode back to the input.
fn assert_wire(value: Value, expected: &[u8]) {
    let bytes = encode(&value).unwrap();
    assert_eq!(
        bytes, expected,
        "Encode mismatch:\n  input:    {value:?}\n  got:      {bytes:02x?}\n  expected: {expected:02x?}"
    );
    assert_eq!(decode(&bytes).unwrap(), value, "decode mismatch for {value:?}");
}

fn encoded_len(value: impl Into<Value>) -> usize {
    encode(&value.into()).unwrap().len()
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn nil_scenario() {
    assert_wire(Value::Nil, &[0xc0]);
}

#[test]
fn hello_scenario() {
    assert_wire("hello".into(), &[0xa5, 0x68, 0x65, 0x6c, 0x6c, 0x6f]);
}

#[test]
fn small_array_scenario() {
    assert_wire(
        Value::Array(vec![1.into(), 2.into(), 3.into()]),
        &[0x93, 0x01, 0x02, 0x03],
    );
}

#[test]
fn single_key_map_scenario() {
    assert_wire(
        [("a", 1)].into_iter().collect(),
        &[0x81, 0xa1, 0x61, 0x01],
    );
}

#[test]
fn float_scenario() {
    assert_wire(
        1.5.into(),
        &[0xcb, 0x3f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    );
}

// ============================================================================
// Minimal integer encoding
// ============================================================================

#[test]
fn minimal_integer_encodings() {
    assert_wire(0.into(), &[0x00]);
    assert_wire(200.into(), &[0xcc, 0xc8]);
    assert_wire((-1).into(), &[0xff]);
}

#[test]
fn every_integer_uses_its_smallest_tier() {
    let cases: [(i64, usize); 16] = [
        (0, 1),
        (127, 1),
        (128, 2),
        (255, 2),
        (256, 3),
        (65_535, 3),
        (65_536, 5),
        (4_294_967_295, 5),
        (-1, 1),
        (-32, 1),
        (-33, 2),
        (-128, 2),
        (-129, 3),
        (-32_768, 3),
        (-32_769, 5),
        (-2_147_483_648, 5),
    ];
    for (n, len) in cases {
        assert_eq!(encoded_len(n), len, "wrong tier for {n}");
    }
}

#[test]
fn fixint_uint8_boundary() {
    assert_eq!(encoded_len(127), 1);
    assert_eq!(encoded_len(128), 2);
}

#[test]
fn negative_fixint_int8_boundary() {
    assert_eq!(encoded_len(-32), 1);
    assert_eq!(encoded_len(-33), 2);
}

#[test]
fn negative_fixint_bytes() {
    for n in -32i64..0 {
        let bytes = encode(&Value::Integer(n)).unwrap();
        assert_eq!(bytes, [n as i8 as u8]);
        assert!(bytes[0] >= marker::NEGATIVE_FIXINT);
    }
}

#[test]
fn positive_fixint_bytes() {
    for n in 0u8..=127 {
        assert_wire(Value::Integer(i64::from(n)), &[n]);
    }
}

#[test]
fn non_negative_values_prefer_unsigned_opcodes() {
    // 200 fits int16 too, but non-negative values always take the unsigned family
    assert_eq!(encode(&Value::Integer(200)).unwrap()[0], marker::UINT_8);
    assert_eq!(encode(&Value::Integer(40_000)).unwrap()[0], marker::UINT_16);
    assert_eq!(encode(&Value::Integer(3_000_000_000)).unwrap()[0], marker::UINT_32);
}

// ============================================================================
// Container tier boundaries
// ============================================================================

#[test]
fn fixarray_array16_boundary() {
    let fifteen = encode(&Value::Array(vec![0.into(); 15])).unwrap();
    let sixteen = encode(&Value::Array(vec![0.into(); 16])).unwrap();
    assert_eq!(fifteen[0], 0x9f);
    assert_eq!(&sixteen[..3], [marker::ARRAY_16, 0x00, 0x10]);
    assert_eq!(sixteen.len() - fifteen.len(), 3);
}

#[test]
fn fixmap_map16_boundary() {
    let fifteen: Value = (0..15).map(|i| (i, 0)).collect();
    let sixteen: Value = (0..16).map(|i| (i, 0)).collect();
    assert_eq!(encode(&fifteen).unwrap()[0], 0x8f);
    assert_eq!(encode(&sixteen).unwrap()[0], marker::MAP_16);
}

#[test]
fn fixstr_str8_str16_boundaries() {
    assert_eq!(encode(&"a".repeat(31).into()).unwrap()[0], 0xbf);
    assert_eq!(encode(&"a".repeat(32).into()).unwrap()[0], marker::STR_8);
    assert_eq!(encode(&"a".repeat(255).into()).unwrap()[0], marker::STR_8);
    assert_eq!(encode(&"a".repeat(256).into()).unwrap()[0], marker::STR_16);
}

// ============================================================================
// Error scenarios
// ============================================================================

#[test]
fn reserved_opcode_is_unsupported() {
    let err = decode(&[0xc1]).unwrap_err();
    assert!(err.is_unsupported_type());
    assert!(matches!(
        err,
        MoopackError::UnsupportedType(UnsupportedType::Opcode(0xc1))
    ));
}

#[test]
fn uint8_without_payload_is_out_of_bounds() {
    let err = decode(&[0xcc]).unwrap_err();
    assert!(err.is_out_of_bounds());
    assert!(matches!(
        err,
        MoopackError::OutOfBounds {
            offset: 1,
            needed: 1,
            available: 0
        }
    ));
}

#[test]
fn unrepresentable_value_is_unsupported() {
    let err = encode(&Value::String("x".repeat(70_000))).unwrap_err();
    assert!(err.is_unsupported_type());
    assert_eq!(err.to_string(), "unsupported type: str32");
}

#[test]
fn every_unsupported_opcode_is_rejected() {
    let unsupported = [0xc1u8]
        .into_iter()
        .chain(0xc4..=0xc9)
        .chain([0xcf])
        .chain(0xd3..=0xd8)
        .chain([0xdb]);
    for op in unsupported {
        // pad generously so the error cannot be a bounds error
        let mut bytes = vec![op];
        bytes.extend_from_slice(&[0u8; 16]);
        let err = decode(&bytes).unwrap_err();
        assert!(
            matches!(err, MoopackError::UnsupportedType(UnsupportedType::Opcode(b)) if b == op),
            "opcode 0x{op:02x} gave {err:?}"
        );
    }
}

#[test]
fn every_supported_opcode_decodes_with_padding() {
    let unsupported = |b: u8| matches!(b, 0xc1 | 0xc4..=0xc9 | 0xcf | 0xd3..=0xd8 | 0xdb);
    for op in 0u8..=255 {
        if unsupported(op) {
            continue;
        }
        // Zero padding reads as length 0 after a prefixed opcode and as fixint 0
        // inside fix containers; 64 bytes covers the largest fixmap (30 bytes).
        let mut bytes = vec![op];
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(decode(&bytes).is_ok(), "opcode 0x{op:02x} failed to decode");
    }
}
