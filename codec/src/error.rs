// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Encrypted payload errors
///
/// Variants fall into two operator-facing classes: malformed input (rescan the
/// QR) and [`Error::WrongKey`] (re-enter the password), see [`Error::is_malformed`].
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error {
    /// Buffer too short for the encoded fields
    #[error("invalid payload length")]
    InvalidLength,

    /// Mnemonic identifier exceeds the single-byte length field
    #[error("mnemonic id too long ({0} bytes, max 255)")]
    IdTooLong(usize),

    /// Mnemonic identifier is not valid UTF-8
    #[error("mnemonic id is not valid utf-8")]
    InvalidUtf8,

    /// Cipher mode byte is neither ECB nor CBC
    #[error("unknown cipher mode {0}")]
    UnknownCipherMode(u8),

    /// Iteration count is zero, does not fit the wire encoding, or exceeds
    /// the 32-bit PBKDF2 round count (wire fields above
    /// [MAX_DERIVABLE_FIELD][crate::MAX_DERIVABLE_FIELD])
    #[error("invalid key derivation iteration count")]
    InvalidIterations,

    /// Ciphertext does not hold a 12 or 24 word record
    #[error("invalid record length ({0} bytes)")]
    InvalidRecordLength(usize),

    /// Mnemonic failed BIP39 validation
    #[error("invalid mnemonic")]
    InvalidMnemonic,

    /// Mnemonic word count is not supported by the record format
    #[error("unsupported mnemonic word count {0}")]
    UnsupportedWordCount(usize),

    /// Block cipher rejected the input (key / iv / block length)
    #[error("cipher failure")]
    Cipher,

    /// Integrity tag mismatch following decryption
    #[error("decryption failed, wrong key")]
    WrongKey,
}

impl Error {
    /// Check whether decryption failed integrity verification
    pub fn is_wrong_key(&self) -> bool {
        matches!(self, Error::WrongKey)
    }

    /// Check whether the error stems from unparseable input
    pub fn is_malformed(&self) -> bool {
        !self.is_wrong_key()
    }
}

impl From<encdec::Error> for Error {
    fn from(_: encdec::Error) -> Self {
        Error::InvalidLength
    }
}
