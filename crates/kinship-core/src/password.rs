//! Salted PBKDF2-HMAC-SHA256 password hashing for admin accounts.
//!
//! Stored format is `salt_hex || digest_hex`: 32 hex characters of salt
//! followed by 64 hex characters of derived key. The PBKDF2 salt input is the
//! ASCII hex string itself, not the decoded bytes, so hashes written by
//! earlier deployments of the service keep verifying.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 100_000;
pub const SALT_BYTES: usize = 16;
const SALT_HEX_LEN: usize = SALT_BYTES * 2;
const DIGEST_BYTES: usize = 32;

fn derive(password: &str, salt_hex: &str) -> [u8; DIGEST_BYTES] {
    let mut out = [0u8; DIGEST_BYTES];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt_hex.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut out,
    );
    out
}

/// Hash a password with a freshly generated random salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_BYTES] = rand::random();
    hash_password_with_salt(password, &hex::encode(salt))
}

/// Hash a password with a caller-supplied hex salt.
pub fn hash_password_with_salt(password: &str, salt_hex: &str) -> String {
    let digest = derive(password, salt_hex);
    format!("{salt_hex}{}", hex::encode(digest))
}

/// Check `password` against a stored `salt_hex || digest_hex` value.
///
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if stored.len() <= SALT_HEX_LEN || !stored.is_char_boundary(SALT_HEX_LEN) {
        return false;
    }
    let (salt_hex, digest_hex) = stored.split_at(SALT_HEX_LEN);
    let expected = match hex::decode(digest_hex) {
        Ok(bytes) if bytes.len() == DIGEST_BYTES => bytes,
        _ => return false,
    };
    let actual = derive(password, salt_hex);
    actual.ct_eq(&expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_layout() {
        let stored = hash_password("admin123");
        assert_eq!(stored.len(), SALT_HEX_LEN + DIGEST_BYTES * 2);
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_accepts_original_and_rejects_others() {
        let stored = hash_password("admin123");
        assert!(verify_password("admin123", &stored));
        assert!(!verify_password("admin124", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn test_salts_are_random() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_known_salt_is_deterministic() {
        let salt = "00112233445566778899aabbccddeeff";
        let a = hash_password_with_salt("secret", salt);
        let b = hash_password_with_salt("secret", salt);
        assert_eq!(a, b);
        assert!(a.starts_with(salt));
        assert!(verify_password("secret", &a));
    }

    #[test]
    fn test_malformed_stored_hash_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "abc"));
        assert!(!verify_password("x", &"0".repeat(SALT_HEX_LEN)));
        let bad_digest = format!("{}{}", "0".repeat(SALT_HEX_LEN), "zz".repeat(DIGEST_BYTES));
        assert!(!verify_password("x", &bad_digest));
    }
}
