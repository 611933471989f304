//! The expensive key schedule ("eksblowfish") at the heart of bcrypt.
//!
//! Plain Blowfish is fast; bcrypt makes it deliberately slow by re-running
//! the full key schedule 2^cost times, alternating between the password and
//! the salt, so that precomputation and parallel guessing stay expensive.

use crate::blowfish::Blowfish;
use crate::error::BcryptError;
use crate::{DIGEST_LEN, MAX_COST, MIN_COST};

// "OrpheanBeholderScryDoubt" as three 64-bit blocks.
const CIPHERTEXT: [u32; 6] = [
    0x4f727068, 0x65616e42, 0x65686f6c, 0x64657253, 0x63727944, 0x6f756274,
];

/// Derives the 23-byte bcrypt digest from prepared key material.
///
/// `key` is the password bytes exactly as the hash version dictates (with
/// the trailing NUL for `2a` and later); only the first 72 bytes ever get
/// consumed. Fails fast on an empty key or a cost outside [4, 31] — cost 32
/// would be a 4-billion-iteration loop, not a hash.
pub(crate) fn derive(key: &[u8], salt: &[u8; 16], cost: u32) -> Result<[u8; DIGEST_LEN], BcryptError> {
    if cost < MIN_COST {
        return Err(BcryptError::TooFewRounds(cost));
    }
    if cost > MAX_COST {
        return Err(BcryptError::TooManyRounds(cost));
    }
    if key.is_empty() {
        return Err(BcryptError::EmptyKey);
    }

    let mut cipher = Blowfish::new();
    cipher.salted_expand_key(salt, key);
    // 2^31 does not fit a u32 loop bound.
    let rounds = 1_u64 << cost;
    for _ in 0..rounds {
        cipher.expand_key(key);
        cipher.expand_key(salt);
    }

    let mut cdata = CIPHERTEXT;
    for _ in 0..64 {
        for i in (0..CIPHERTEXT.len()).step_by(2) {
            let (l, r) = cipher.encrypt_block(cdata[i], cdata[i + 1]);
            cdata[i] = l;
            cdata[i + 1] = r;
        }
    }

    let mut digest = [0_u8; DIGEST_LEN];
    for (chunk, word) in digest.chunks_mut(4).zip(cdata.iter()) {
        let be = word.to_be_bytes();
        chunk.copy_from_slice(&be[..chunk.len()]);
    }
    Ok(digest)
}
