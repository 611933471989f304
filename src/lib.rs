//! The bcrypt adaptive password-hashing primitive, from scratch.
//!
//! bcrypt derives a verifiable password hash by running the Blowfish key
//! schedule a tunable 2^cost times, keyed alternately by the password and a
//! 16-byte random salt, then encodes the result in the classic
//! `$2a$10$<salt><digest>` text format. The whole crate is a pure, stateless
//! function library: every call builds its own cipher, and concurrent calls
//! need no synchronization.
//!
//! ```no_run
//! use bcrypt_core::{checkpw, gensalt, hashpw, DEFAULT_COST};
//!
//! # fn main() -> Result<(), bcrypt_core::BcryptError> {
//! let hash = hashpw("correct horse", &gensalt(DEFAULT_COST)?)?;
//! assert!(checkpw("correct horse", &hash)?);
//! assert!(!checkpw("incorrect pony", &hash)?);
//! # Ok(())
//! # }
//! ```
//!
//! Passwords are byte sequences; `&str` arguments contribute their UTF-8
//! bytes verbatim. Only the first [`MAX_KEY_LEN`] bytes (terminator
//! included) reach the cipher — material past that is silently ignored, a
//! documented property of the algorithm, not a defect.

mod b64;
mod blowfish;
mod eks;
mod error;
mod format;

pub use error::BcryptError;
pub use format::Version;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Minimum cost factor (log2 rounds).
pub const MIN_COST: u32 = 4;
/// Maximum cost factor. 2^31 key-schedule iterations; expect to wait.
pub const MAX_COST: u32 = 31;
/// Cost used by [`gensalt`] callers that have no stronger opinion.
pub const DEFAULT_COST: u32 = 10;
/// Raw salt size in bytes.
pub const SALT_LEN: usize = 16;
/// Raw digest size in bytes (184 bits; 31 encoded characters).
pub const DIGEST_LEN: usize = 23;
/// Bytes of key material the cipher consumes, trailing NUL included.
pub const MAX_KEY_LEN: usize = 72;

/// Generates a salt string `$2a$<cost>$<22 chars>` from the OS random
/// number generator.
///
/// Fails if `log_rounds` falls outside `[4, 31]`. New salts always carry
/// the `2a` tag; the legacy tags are accepted on input only.
pub fn gensalt(log_rounds: u32) -> Result<String, BcryptError> {
    gensalt_with_rng(log_rounds, &mut OsRng)
}

/// [`gensalt`] with a caller-supplied entropy source.
///
/// The `CryptoRng` bound keeps non-cryptographic generators out at compile
/// time.
pub fn gensalt_with_rng<R>(log_rounds: u32, rng: &mut R) -> Result<String, BcryptError>
where
    R: RngCore + CryptoRng,
{
    if log_rounds < MIN_COST {
        return Err(BcryptError::TooFewRounds(log_rounds));
    }
    if log_rounds > MAX_COST {
        return Err(BcryptError::TooManyRounds(log_rounds));
    }
    let mut salt = [0_u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    format::serialize(Version::TwoA, log_rounds, &salt, None)
}

/// Hashes a password against a salt string, returning the full encoded
/// hash.
///
/// `salt` may be a bare salt from [`gensalt`] or a complete stored hash;
/// in the latter case the digest suffix is ignored, so the output can be
/// compared against the input to verify a password. The version tag of the
/// salt is honored: all five revisions hash compatibly, and the legacy `2`
/// tag reproduces the original format's missing key terminator.
pub fn hashpw<P: AsRef<[u8]>>(password: P, salt: &str) -> Result<String, BcryptError> {
    let parsed = format::parse(salt)?;

    let mut key = Zeroizing::new(Vec::with_capacity(password.as_ref().len() + 1));
    key.extend_from_slice(password.as_ref());
    if parsed.version.appends_nul() {
        key.push(0);
    }

    let digest = eks::derive(&key, &parsed.salt, parsed.cost)?;
    format::serialize(parsed.version, parsed.cost, &parsed.salt, Some(&digest))
}

/// Checks a password against a stored hash.
///
/// Recomputes the hash with the stored string as the salt and compares the
/// two encodings in constant time. A wrong password is `Ok(false)`; a
/// malformed stored hash is an error, so callers can tell corrupt data
/// apart from a failed login.
pub fn checkpw<P: AsRef<[u8]>>(password: P, hashed: &str) -> Result<bool, BcryptError> {
    let computed = hashpw(password, hashed)?;
    Ok(equals_no_early_return(hashed, &computed))
}

/// Compares two strings in time independent of where they first differ.
///
/// Always walks the full length of the longer operand, folding differences
/// into an accumulator with bitwise OR; indexes past either end compare a
/// fixed placeholder, and a length mismatch is folded in the same way. No
/// branch returns early.
fn equals_no_early_return(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Reference vectors from the original bcrypt test suite.
    const VECTORS: &[(&str, &str, &str)] = &[
        (
            "",
            "$2a$06$DCq7YPn5Rq63x1Lad4cll.",
            "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.",
        ),
        (
            "",
            "$2a$08$HqWuK6/Ng6sg9gQzbLrgb.",
            "$2a$08$HqWuK6/Ng6sg9gQzbLrgb.Tl.ZHfXLhvt/SgVyWhQqgqcZ7ZuUtye",
        ),
        (
            "",
            "$2b$06$8eVN9RiU8Yki430X.wBvN.",
            "$2b$06$8eVN9RiU8Yki430X.wBvN.LWaqh2962emLVSVXVZIXJvDYLsV0oFu",
        ),
        (
            "",
            "$2y$06$mFDtkz6UN7B3GZ2qi2hhaO",
            "$2y$06$mFDtkz6UN7B3GZ2qi2hhaO3OFWzNEdcY84ELw6iHCPruuQfSAXBLK",
        ),
        (
            "a",
            "$2a$06$m0CrhHm10qJ3lXRY.5zDGO",
            "$2a$06$m0CrhHm10qJ3lXRY.5zDGO3rS2KdeeWLuGmsfGlMfOxih58VYVfxe",
        ),
        (
            "a",
            "$2a$10$k87L/MF28Q673VKh8/cPi.",
            "$2a$10$k87L/MF28Q673VKh8/cPi.SUl7MU/rWuSiIDDFayrKk/1tBsSQu4u",
        ),
        (
            "a",
            "$2b$06$ehKGYiS4wt2HAr7KQXS5z.",
            "$2b$06$ehKGYiS4wt2HAr7KQXS5z.OaRjB4jHO7rBHJKlGXbqEH3QVJfO7iO",
        ),
        (
            "a",
            "$2y$06$LUdD6/aD0e/UbnxVAVbvGu",
            "$2y$06$LUdD6/aD0e/UbnxVAVbvGuUmIoJ3l/OK94ThhadpMWwKC34LrGEey",
        ),
        (
            "abc",
            "$2a$06$If6bvum7DFjUnE9p2uDeDu",
            "$2a$06$If6bvum7DFjUnE9p2uDeDu0YHzrHM6tf.iqN8.yx.jNN1ILEf7h0i",
        ),
        (
            "abc",
            "$2a$12$EXRkfkdmXn2gzds2SSitu.",
            "$2a$12$EXRkfkdmXn2gzds2SSitu.MW9.gAVqa9eLS1//RYtYCmB1eLHg.9q",
        ),
        (
            "abc",
            "$2y$06$ACfku9dT6.H8VjdKb8nhlu",
            "$2y$06$ACfku9dT6.H8VjdKb8nhluaoBmhJyK7GfoNScEfOfrJffUxoUeCjK",
        ),
        (
            "abcdefghijklmnopqrstuvwxyz",
            "$2a$06$.rCVZVOThsIa97pEDOxvGu",
            "$2a$06$.rCVZVOThsIa97pEDOxvGuRRgzG64bvtJ0938xuqzv18d3ZpQhstC",
        ),
        (
            "abcdefghijklmnopqrstuvwxyz",
            "$2b$06$O8E89AQPj1zJQA05YvIAU.",
            "$2b$06$O8E89AQPj1zJQA05YvIAU.hMpj25BXri1bupl/Q7CJMlpLwZDNBoO",
        ),
        (
            "~!@#$%^&*()      ~!@#$%^&*()PNBFRD",
            "$2a$06$fPIsBO8qRqkjj273rfaOI.",
            "$2a$06$fPIsBO8qRqkjj273rfaOI.HtSV9jLDpTbZn782DC6/t7qT67P6FfO",
        ),
        (
            "~!@#$%^&*()      ~!@#$%^&*()PNBFRD",
            "$2y$06$sYDFHqOcXTjBgOsqC0WCKe",
            "$2y$06$sYDFHqOcXTjBgOsqC0WCKeMd3T1UhHuWQSxncLGtXDLMrcE6vFDti",
        ),
    ];

    // Raw byte passwords, including high-bit values that would break a
    // sign-extending implementation.
    const BYTE_VECTORS: &[(&[u8], &str, &str)] = &[
        (
            &[],
            "$2a$06$fPIsBO8qRqkjj273rfaOI.",
            "$2a$06$fPIsBO8qRqkjj273rfaOI.uiVGfgi6Z1Iz.vZr11mi/38o09TUVCy",
        ),
        (
            &[0xf5],
            "$2a$06$fPIsBO8qRqkjj273rfaOI.",
            "$2a$06$fPIsBO8qRqkjj273rfaOI.AyMTPwvUEmZ2EdJM/p0S0eP3UQpBas.",
        ),
        (
            &[0xf5],
            "$2y$06$sYDFHqOcXTjBgOsqC0WCKe",
            "$2y$06$sYDFHqOcXTjBgOsqC0WCKeduM9n5k0YfzTlgg69FIgGpw4ChTQNu2",
        ),
        (
            &[0x4c, 0xc8, 0xf4, 0x09, 0x8c],
            "$2a$06$fPIsBO8qRqkjj273rfaOI.",
            "$2a$06$fPIsBO8qRqkjj273rfaOI.5m8yX4eGfjqx/tyHtmte7/HbWtUS9u.",
        ),
    ];

    #[test]
    fn hashpw_matches_reference_vectors() {
        for &(password, salt, expected) in VECTORS {
            assert_eq!(hashpw(password, salt).unwrap(), expected);
        }
    }

    #[test]
    fn hashpw_matches_reference_byte_vectors() {
        for &(password, salt, expected) in BYTE_VECTORS {
            assert_eq!(hashpw(password, salt).unwrap(), expected);
        }
    }

    #[test]
    fn hashpw_works_with_old_revision() {
        assert_eq!(
            hashpw("password", "$2$05$......................").unwrap(),
            "$2$05$......................bvpG2UfzdyW/S0ny/4YyEZrmczoJfVm"
        );
    }

    #[test]
    fn checkpw_accepts_good_passwords() {
        for &(password, _, expected) in VECTORS {
            assert!(checkpw(password, expected).unwrap());
        }
        for &(password, _, expected) in BYTE_VECTORS {
            assert!(checkpw(password, expected).unwrap());
        }
    }

    #[test]
    fn checkpw_rejects_bad_passwords() {
        for (i, &(password, _, _)) in VECTORS.iter().enumerate() {
            let other = VECTORS[(i + 4) % VECTORS.len()].2;
            assert!(!checkpw(password, other).unwrap());
        }
    }

    #[test]
    fn checkpw_propagates_malformed_hashes() {
        assert!(checkpw("password", "").is_err());
        assert!(checkpw("password", "$2a$10$tooshort").is_err());
        assert!(checkpw("password", "not a hash at all").is_err());
    }

    #[test]
    fn rehashing_with_a_full_hash_reproduces_it() {
        for cost in [4, 6] {
            let salt = gensalt(cost).unwrap();
            let first = hashpw("secret", &salt).unwrap();
            let second = hashpw("secret", &first).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn round_trips_through_generated_salts() {
        for cost in MIN_COST..=8 {
            let hash = hashpw("secret", &gensalt(cost).unwrap()).unwrap();
            assert!(checkpw("secret", &hash).unwrap());
            assert!(!checkpw("Secret", &hash).unwrap());
        }
    }

    #[test]
    fn gensalt_checks_cost_bounds() {
        assert_eq!(gensalt(3), Err(BcryptError::TooFewRounds(3)));
        assert_eq!(gensalt(32), Err(BcryptError::TooManyRounds(32)));
    }

    #[test]
    fn gensalt_emits_the_requested_prefix() {
        assert!(gensalt(4).unwrap().starts_with("$2a$04$"));
        assert!(gensalt(31).unwrap().starts_with("$2a$31$"));
        assert_eq!(gensalt(10).unwrap().len(), 29);
    }

    #[test]
    fn gensalt_draws_fresh_entropy() {
        assert_ne!(gensalt(6).unwrap(), gensalt(6).unwrap());
    }

    #[test]
    fn gensalt_with_seeded_rng_is_reproducible() {
        let a = gensalt_with_rng(6, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = gensalt_with_rng(6, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn hashpw_checks_cost_bounds_in_salt() {
        assert_eq!(
            hashpw("password", "$2a$03$......................"),
            Err(BcryptError::TooFewRounds(3))
        );
        assert_eq!(
            hashpw("password", "$2a$32$......................"),
            Err(BcryptError::TooManyRounds(32))
        );
    }

    #[test]
    fn hashpw_rejects_empty_and_truncated_salts() {
        assert!(hashpw("", "").is_err());
        assert!(hashpw("password", "$2a$10$123456789012345678901").is_err());
    }

    #[test]
    fn passwords_agree_past_the_key_limit() {
        let salt = gensalt(4).unwrap();
        let base = "a".repeat(MAX_KEY_LEN);
        let with_x = hashpw(format!("{base}x"), &salt).unwrap();
        let with_y = hashpw(format!("{base}y"), &salt).unwrap();
        assert_eq!(with_x, with_y);
        // One byte earlier the difference still lands inside the key.
        let shorter = "a".repeat(MAX_KEY_LEN - 1);
        assert_ne!(
            hashpw(format!("{shorter}x"), &salt).unwrap(),
            hashpw(format!("{shorter}y"), &salt).unwrap()
        );
    }

    #[test]
    fn international_passwords_do_not_collide() {
        let h1 = hashpw("ππππππππ", &gensalt(4).unwrap()).unwrap();
        assert!(!checkpw("????????", &h1).unwrap());
        let h2 = hashpw("????????", &gensalt(4).unwrap()).unwrap();
        assert!(!checkpw("ππππππππ", &h2).unwrap());
    }

    #[test]
    fn equals_no_early_return_is_correct() {
        assert!(equals_no_early_return("", ""));
        assert!(equals_no_early_return("test", "test"));
        assert!(!equals_no_early_return("test", ""));
        assert!(!equals_no_early_return("", "test"));
        assert!(!equals_no_early_return("test", "pass"));
        assert!(!equals_no_early_return("test", "tests"));
    }
}
