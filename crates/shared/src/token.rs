//! Opaque random tokens for invite links and public group joins.

use rand::RngCore;

/// Number of random bytes in a generated token.
const TOKEN_BYTES: usize = 32;

/// Generates a cryptographically random opaque token.
///
/// 32 random bytes, hex-encoded: 64 lowercase hex characters. Used as the
/// public lookup key for invite links and group join links.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_charset() {
        let token = generate_opaque_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_opaque_token();
        assert!(!token.contains('/'));
        assert!(!token.contains('+'));
        assert!(!token.contains('='));
    }
}
