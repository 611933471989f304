//! The Blowfish block cipher, as bcrypt needs it.
//!
//! Blowfish keeps its key material in an 18-word P-array and four 256-word
//! S-boxes, all seeded from the hexadecimal expansion of π. bcrypt depends
//! on reproducing that canonical state and the key schedule bit for bit, so
//! the tables are spelled out in full (`sboxes.in`) rather than derived at
//! runtime.

const P_INIT: [u32; 18] = [
    0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344, 0xa4093822, 0x299f31d0,
    0x082efa98, 0xec4e6c89, 0x452821e6, 0x38d01377, 0xbe5466cf, 0x34e90c6c,
    0xc0ac29b7, 0xc97c50dd, 0x3f84d5b5, 0xb5470917, 0x9216d5d9, 0x8979fb1b,
];

const S_INIT: [[u32; 256]; 4] = include!("sboxes.in");

/// Reads a byte sequence as a cyclic stream of big-endian 32-bit words.
///
/// This is how the key schedule consumes both passwords and salts: the
/// material repeats as often as needed, and bytes past what the schedule
/// asks for are never read at all (the source of bcrypt's 72-byte cap).
struct WordStream<'a> {
    data: &'a [u8],
    off: usize,
}

impl<'a> WordStream<'a> {
    fn new(data: &'a [u8]) -> Self {
        debug_assert!(!data.is_empty());
        WordStream { data, off: 0 }
    }

    fn next_word(&mut self) -> u32 {
        let mut word = 0_u32;
        for _ in 0..4 {
            word = (word << 8) | u32::from(self.data[self.off]);
            self.off = (self.off + 1) % self.data.len();
        }
        word
    }
}

#[derive(Clone)]
pub(crate) struct Blowfish {
    p: [u32; 18],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    /// A cipher in the canonical π-seeded state, before any key is applied.
    pub(crate) fn new() -> Self {
        Blowfish {
            p: P_INIT,
            s: S_INIT,
        }
    }

    fn f(&self, x: u32) -> u32 {
        let [b0, b1, b2, b3] = x.to_be_bytes();
        let h = self.s[0][usize::from(b0)].wrapping_add(self.s[1][usize::from(b1)]);
        (h ^ self.s[2][usize::from(b2)]).wrapping_add(self.s[3][usize::from(b3)])
    }

    /// Runs the 16-round Feistel network over one 64-bit block.
    ///
    /// Pure with respect to cipher state; only the key schedule mutates it.
    pub(crate) fn encrypt_block(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        for i in (0..16).step_by(2) {
            l ^= self.p[i];
            r ^= self.f(l);
            r ^= self.p[i + 1];
            l ^= self.f(r);
        }
        l ^= self.p[16];
        r ^= self.p[17];
        (r, l)
    }

    /// The standard Blowfish key schedule.
    ///
    /// XORs the cyclically repeated key into the P-array, then regenerates
    /// every P and S entry by repeatedly encrypting a running block that
    /// starts at zero, each encryption seeing the state left by the last.
    pub(crate) fn expand_key(&mut self, key: &[u8]) {
        let mut words = WordStream::new(key);
        for p in &mut self.p {
            *p ^= words.next_word();
        }

        let (mut l, mut r) = (0_u32, 0_u32);
        for i in (0..18).step_by(2) {
            (l, r) = self.encrypt_block(l, r);
            self.p[i] = l;
            self.p[i + 1] = r;
        }
        for b in 0..4 {
            for i in (0..256).step_by(2) {
                (l, r) = self.encrypt_block(l, r);
                self.s[b][i] = l;
                self.s[b][i + 1] = r;
            }
        }
    }

    /// The salted key schedule that opens the eksblowfish setup.
    ///
    /// Like [`expand_key`](Self::expand_key), except the salt (read as its
    /// own cyclic word stream, so its two 64-bit halves alternate) is XORed
    /// into the running block before every encryption of the regeneration
    /// pass.
    pub(crate) fn salted_expand_key(&mut self, salt: &[u8], key: &[u8]) {
        let mut words = WordStream::new(key);
        for p in &mut self.p {
            *p ^= words.next_word();
        }

        let mut salt_words = WordStream::new(salt);
        let (mut l, mut r) = (0_u32, 0_u32);
        for i in (0..18).step_by(2) {
            l ^= salt_words.next_word();
            r ^= salt_words.next_word();
            (l, r) = self.encrypt_block(l, r);
            self.p[i] = l;
            self.p[i + 1] = r;
        }
        for b in 0..4 {
            for i in (0..256).step_by(2) {
                l ^= salt_words.next_word();
                r ^= salt_words.next_word();
                (l, r) = self.encrypt_block(l, r);
                self.s[b][i] = l;
                self.s[b][i + 1] = r;
            }
        }
    }
}
