use xxhash_rust::xxh3::xxh3_128;

pub fn xxhash_128(input: &[u8]) -> u128 {
  xxh3_128(input)
}

/// Lowercase hex digest.
pub fn xxhash_hex(input: &[u8]) -> String {
  format!("{:032x}", xxh3_128(input))
}

#[test]
fn test_xxhash_is_stable() {
  assert_eq!(xxhash_hex(b"hello"), xxhash_hex(b"hello"));
  assert_ne!(xxhash_hex(b"hello"), xxhash_hex(b"world"));
  assert_eq!(xxhash_hex(b"hello").len(), 32);
}
