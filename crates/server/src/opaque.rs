//! Opaque public identifiers.
//!
//! Internal numeric row ids are never exposed directly; responses carry a
//! reversible token instead. The codec is a keyed XOR over the id bytes
//! rendered as URL-safe base64: reversible obfuscation, not authentication.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Reversible numeric-id / token codec.
#[derive(Debug, Clone)]
pub struct OpaqueIdCodec {
    key: u64,
}

impl OpaqueIdCodec {
    pub fn new(key: u64) -> Self {
        Self { key }
    }

    /// Encode an internal id into its public token.
    pub fn encode(&self, id: i64) -> String {
        let masked = (id as u64) ^ self.key;
        URL_SAFE_NO_PAD.encode(masked.to_be_bytes())
    }

    /// Decode a public token back to the internal id.
    ///
    /// Returns `None` for anything that is not a well-formed token.
    pub fn decode(&self, token: &str) -> Option<i64> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        let raw: [u8; 8] = bytes.try_into().ok()?;
        Some((u64::from_be_bytes(raw) ^ self.key) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let codec = OpaqueIdCodec::new(0x9e37_79b9_7f4a_7c15);
        for id in [0, 1, 42, 1_000_000, i64::MAX] {
            let token = codec.encode(id);
            assert_eq!(codec.decode(&token), Some(id));
        }
    }

    #[test]
    fn tokens_are_not_the_raw_id() {
        let codec = OpaqueIdCodec::new(0x9e37_79b9_7f4a_7c15);
        assert!(!codec.encode(42).contains("42"));
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        let codec = OpaqueIdCodec::new(1);
        assert_eq!(codec.decode(""), None);
        assert_eq!(codec.decode("not base64!!"), None);
        // Valid base64 of the wrong length.
        assert_eq!(codec.decode("AAAA"), None);
    }

    #[test]
    fn different_keys_produce_different_tokens() {
        let a = OpaqueIdCodec::new(1);
        let b = OpaqueIdCodec::new(2);
        assert_ne!(a.encode(7), b.encode(7));
    }
}
