//! Parsing and printing of the textual hash format.
//!
//! The wire format is `$<version>$<cost>$<salt22><digest31>`, where the cost
//! is two zero-padded decimal digits, the salt is 22 bcrypt-base64
//! characters (16 raw bytes), and the digest is 31 characters (23 raw
//! bytes). A string that stops after the salt is a valid hashing request —
//! that is exactly what `gensalt` produces — but not a valid stored hash.

use std::fmt;

use crate::b64;
use crate::error::BcryptError;
use crate::{DIGEST_LEN, MAX_COST, MIN_COST, SALT_LEN};

/// Number of characters in the encoded salt field.
const ENC_SALT_LEN: usize = 22;

/// A bcrypt format revision.
///
/// All revisions share the same key setup. `2b`, `2x` and `2y` exist to
/// flag historical bugs in other implementations and hash identically to
/// `2a` here; `2` is the original OpenBSD format, which fed the password to
/// the cipher without the trailing NUL byte that every later revision
/// appends. That off-by-one is kept as an explicit per-tag property so old
/// `$2$` hashes keep verifying.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Version {
    /// Original `$2$` format, no key terminator.
    Two,
    /// The common revision; the only one `gensalt` emits.
    TwoA,
    /// OpenBSD's wraparound-fix revision.
    TwoB,
    /// Openwall's marker for hashes from the buggy pre-`2y` code.
    TwoX,
    /// Openwall's fixed revision.
    TwoY,
}

impl Version {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Version::Two => "2",
            Version::TwoA => "2a",
            Version::TwoB => "2b",
            Version::TwoX => "2x",
            Version::TwoY => "2y",
        }
    }

    /// Whether this revision appends the NUL terminator to the key.
    pub(crate) fn appends_nul(self) -> bool {
        !matches!(self, Version::Two)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The salt portion of a hash string, decoded.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedSalt {
    pub(crate) version: Version,
    pub(crate) cost: u32,
    pub(crate) salt: [u8; SALT_LEN],
}

/// Parses the leading `$<version>$<cost>$<salt22>` of a salt or full hash
/// string. Anything after the 22 salt characters (i.e. the digest of a
/// stored hash) is ignored, which lets a prior hash be reused directly as
/// the salt argument when re-hashing for comparison.
pub(crate) fn parse(s: &str) -> Result<ParsedSalt, BcryptError> {
    let b = s.as_bytes();
    if b.len() < 2 || b[0] != b'$' || b[1] != b'2' {
        return Err(BcryptError::InvalidSaltVersion);
    }

    let (version, off) = if b.get(2) == Some(&b'$') {
        (Version::Two, 3)
    } else {
        let version = match b.get(2).copied() {
            Some(b'a') => Version::TwoA,
            Some(b'b') => Version::TwoB,
            Some(b'x') => Version::TwoX,
            Some(b'y') => Version::TwoY,
            _ => return Err(BcryptError::InvalidSaltRevision),
        };
        if b.get(3) != Some(&b'$') {
            return Err(BcryptError::InvalidSaltRevision);
        }
        (version, 4)
    };

    // Exactly two digits, then the next field separator.
    let cost = match (
        b.get(off).copied(),
        b.get(off + 1).copied(),
        b.get(off + 2).copied(),
    ) {
        (Some(d0 @ b'0'..=b'9'), Some(d1 @ b'0'..=b'9'), Some(b'$')) => {
            u32::from(d0 - b'0') * 10 + u32::from(d1 - b'0')
        }
        _ => return Err(BcryptError::MissingSaltRounds),
    };
    if cost < MIN_COST {
        return Err(BcryptError::TooFewRounds(cost));
    }
    if cost > MAX_COST {
        return Err(BcryptError::TooManyRounds(cost));
    }

    let field_start = off + 3;
    let field_end = (field_start + ENC_SALT_LEN).min(s.len());
    let field = s
        .get(field_start..field_end)
        .ok_or(BcryptError::SaltTooShort)?;
    let decoded = b64::decode(field, SALT_LEN)?;
    if decoded.len() < SALT_LEN {
        return Err(BcryptError::SaltTooShort);
    }
    let mut salt = [0_u8; SALT_LEN];
    salt.copy_from_slice(&decoded);

    Ok(ParsedSalt {
        version,
        cost,
        salt,
    })
}

/// Prints a salt string, or a full hash when a digest is given.
pub(crate) fn serialize(
    version: Version,
    cost: u32,
    salt: &[u8; SALT_LEN],
    digest: Option<&[u8; DIGEST_LEN]>,
) -> Result<String, BcryptError> {
    let mut out = String::with_capacity(60);
    out.push('$');
    out.push_str(version.as_str());
    out.push('$');
    out.push_str(&format!("{cost:02}"));
    out.push('$');
    out.push_str(&b64::encode(salt, SALT_LEN)?);
    if let Some(digest) = digest {
        out.push_str(&b64::encode(digest, DIGEST_LEN)?);
    }
    Ok(out)
}
