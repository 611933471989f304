use thiserror::Error;

/// Errors reported by the bcrypt primitive.
///
/// There are two flavors: invalid arguments (bad lengths or costs handed to
/// the codec or the key setup) and invalid formats (a salt or stored hash
/// string that does not parse). Neither is retryable; both indicate a
/// programming or data error on the caller's side. A wrong password is *not*
/// an error — `checkpw` reports it as `Ok(false)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BcryptError {
    /// The salt string does not start with a recognized `$2...$` prefix.
    #[error("invalid salt version")]
    InvalidSaltVersion,

    /// The character after `$2` is not one of the known revision letters.
    #[error("invalid salt revision")]
    InvalidSaltRevision,

    /// The cost field is not exactly two decimal digits followed by `$`.
    #[error("missing salt rounds")]
    MissingSaltRounds,

    /// Cost below the minimum of 4.
    #[error("too few rounds: {0}")]
    TooFewRounds(u32),

    /// Cost above the maximum of 31.
    #[error("too many rounds: {0}")]
    TooManyRounds(u32),

    /// The salt field decoded to fewer than 16 bytes of entropy.
    #[error("salt too short")]
    SaltTooShort,

    /// The key material was empty. Only reachable with a version `2` salt,
    /// where no terminator byte is appended to the password.
    #[error("empty key")]
    EmptyKey,

    /// `encode` was asked for zero bytes or for more bytes than supplied.
    #[error("invalid encode length: {requested} of {available} bytes")]
    InvalidEncodeLength {
        /// Number of bytes the caller asked to encode.
        requested: usize,
        /// Number of bytes actually available.
        available: usize,
    },

    /// `decode` was asked to produce zero bytes.
    #[error("invalid decode length")]
    InvalidDecodeLength,
}
