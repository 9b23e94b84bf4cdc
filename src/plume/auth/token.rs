//! Opaque token minting for auxiliary client use (anti-replay nonces).

use chrono::Utc;
use rand::Rng;

use crate::plume::digest::md5_hex;

/// Mint an opaque, fixed-length token.
///
/// A millisecond time component plus a bounded pseudo-random nonce, rendered
/// as decimal text and one-way digested so the output is non-reversible.
/// Uniqueness is best effort; callers may rely on unpredictability only.
#[must_use]
pub fn mint() -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce: i64 = rand::thread_rng().gen_range(0..999_999_999);
    md5_hex((millis + nonce).to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_tokens_differ() {
        assert_ne!(mint(), mint());
    }

    #[test]
    fn minted_token_is_fixed_length_hex() {
        let token = mint();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_lowercase());
    }
}
