//! The bcrypt variant of base64.
//!
//! Not interchangeable with RFC 4648: the alphabet starts with `.` and `/`,
//! there is no padding, and decoding is lazy — it stops at the first
//! character outside the alphabet and returns whatever was decoded up to
//! that point. The laziness is intentional and matches the reference
//! implementation, which decodes the salt field straight out of a longer
//! hash string.

use crate::error::BcryptError;

// Index 0 is '.', index 63 is '9'. Order matters.
const ALPHABET: &[u8; 64] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn char64(c: u8) -> Option<u8> {
    match c {
        b'.' => Some(0),
        b'/' => Some(1),
        b'A'..=b'Z' => Some(c - b'A' + 2),
        b'a'..=b'z' => Some(c - b'a' + 28),
        b'0'..=b'9' => Some(c - b'0' + 54),
        _ => None,
    }
}

/// Encodes the first `len` bytes of `data`.
///
/// A trailing group of 1 or 2 source bytes becomes 2 or 3 characters, with
/// the missing low bits taken as zero. Fails if `len` is zero or exceeds
/// the input.
pub(crate) fn encode(data: &[u8], len: usize) -> Result<String, BcryptError> {
    if len == 0 || len > data.len() {
        return Err(BcryptError::InvalidEncodeLength {
            requested: len,
            available: data.len(),
        });
    }

    let mut out = String::with_capacity((len * 4 + 2) / 3);
    let mut off = 0;
    while off < len {
        let b0 = data[off];
        off += 1;
        out.push(ALPHABET[(b0 >> 2) as usize] as char);
        let carry = (b0 & 0x03) << 4;
        if off >= len {
            out.push(ALPHABET[carry as usize] as char);
            break;
        }
        let b1 = data[off];
        off += 1;
        out.push(ALPHABET[(carry | (b1 >> 4)) as usize] as char);
        let carry = (b1 & 0x0f) << 2;
        if off >= len {
            out.push(ALPHABET[carry as usize] as char);
            break;
        }
        let b2 = data[off];
        off += 1;
        out.push(ALPHABET[(carry | (b2 >> 6)) as usize] as char);
        out.push(ALPHABET[(b2 & 0x3f) as usize] as char);
    }
    Ok(out)
}

/// Decodes at most `max_len` bytes from `s`.
///
/// Consumes characters left to right and stops at the first one outside the
/// alphabet (or at end of input), returning the bytes decoded so far. A
/// lone trailing character carries fewer than 8 bits and is dropped. Fails
/// only if `max_len` is zero.
pub(crate) fn decode(s: &str, max_len: usize) -> Result<Vec<u8>, BcryptError> {
    if max_len == 0 {
        return Err(BcryptError::InvalidDecodeLength);
    }

    let b = s.as_bytes();
    let mut out = Vec::with_capacity(max_len.min((b.len() * 3) / 4 + 1));
    let mut off = 0;
    while off + 1 < b.len() && out.len() < max_len {
        let (c1, c2) = match (char64(b[off]), char64(b[off + 1])) {
            (Some(c1), Some(c2)) => (c1, c2),
            _ => break,
        };
        off += 2;
        out.push((c1 << 2) | ((c2 & 0x30) >> 4));
        if out.len() >= max_len || off >= b.len() {
            break;
        }
        let c3 = match char64(b[off]) {
            Some(c3) => c3,
            None => break,
        };
        off += 1;
        out.push(((c2 & 0x0f) << 4) | ((c3 & 0x3c) >> 2));
        if out.len() >= max_len || off >= b.len() {
            break;
        }
        let c4 = match char64(b[off]) {
            Some(c4) => c4,
            None => break,
        };
        off += 1;
        out.push(((c3 & 0x03) << 6) | c4);
    }
    Ok(out)
}
