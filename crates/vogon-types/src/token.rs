//! Random `id` and `revision` tokens.
//!
//! Tokens are drawn from the operating system's cryptographic random source
//! and rendered as fixed-width lowercase hex. The empty string is reserved
//! for "not set" and is never produced.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a token. Rendered as twice as many hex digits.
pub const TOKEN_BYTES: usize = 16;

/// Generate a fresh random token.
///
/// # Panics
///
/// Panics if the OS random source fails. That indicates a broken execution
/// environment and there is nothing sensible to fall back to.
pub fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
        panic!("OS random source failed: {e}");
    }
    hex::encode(bytes)
}
