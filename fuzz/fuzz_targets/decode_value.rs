#![no_main]
use std::sync::OnceLock;

use amqp_pack::{decode_value, encode_to_vec, Registry};
use libfuzzer_sys::fuzz_target;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let registry = REGISTRY.get_or_init(Registry::standard);
    if let Ok((value, _)) = decode_value(registry, data) {
        // anything that decodes must re-encode, and the re-encoding must be
        // a fixed point (value equality would trip over NaN floats)
        let bytes = encode_to_vec(&value).unwrap();
        let (again, rest) = decode_value(registry, &bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(encode_to_vec(&again).unwrap(), bytes);
    }
});
