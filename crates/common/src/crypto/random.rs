//! Cryptographically strong random strings.

use rand::RngCore;

use super::encoding::base64url_encode;

/// Fill `byte_length` bytes from the thread-local CSPRNG and return them
/// base64url-encoded without padding.
///
/// `rand::thread_rng` is a ChaCha-based CSPRNG reseeded from the operating
/// system, which is what PKCE verifiers and CSRF states require. Output length
/// is `ceil(byte_length * 4 / 3)` characters.
///
/// # Examples
///
/// ```
/// use autonomos_common::crypto::random_string;
///
/// let state = random_string(16);
/// assert_eq!(state.len(), 22);
/// assert!(!state.contains('='));
/// ```
#[must_use]
pub fn random_string(byte_length: usize) -> String {
    let mut bytes = vec![0_u8; byte_length];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64url_encode(&bytes)
}

#[cfg(test)]
mod tests {
    //! Unit tests for crypto::random.
    use super::*;

    /// Validates `random_string` output alphabet for the lengths the PKCE
    /// flow and tests rely on.
    ///
    /// Assertions:
    /// - Ensures no `+`, `/` or `=` appears for n in {1, 16, 32}.
    /// - Confirms the unpadded base64 length for each n.
    #[test]
    fn test_random_string_is_base64url_without_padding() {
        for (n, expected_len) in [(1_usize, 2_usize), (16, 22), (32, 43)] {
            let value = random_string(n);
            assert_eq!(value.len(), expected_len, "unexpected length for n={n}");
            assert!(!value.contains('+'), "found '+' for n={n}: {value}");
            assert!(!value.contains('/'), "found '/' for n={n}: {value}");
            assert!(!value.contains('='), "found '=' for n={n}: {value}");
        }
    }

    /// Validates `random_string` uniqueness across calls.
    ///
    /// Assertions:
    /// - Confirms two 32-byte draws differ.
    #[test]
    fn test_random_string_unique() {
        assert_ne!(random_string(32), random_string(32));
    }

    /// Validates `random_string` for the zero-length edge case.
    ///
    /// Assertions:
    /// - Confirms an empty string is returned.
    #[test]
    fn test_random_string_zero_length() {
        assert_eq!(random_string(0), "");
    }
}
