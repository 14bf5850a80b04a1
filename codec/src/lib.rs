// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Encrypted SeedQR payload definitions
//!
//! This crate provides the wire format and reference implementation for
//! password-protected BIP39 mnemonics carried inside a single QR code.
//!
//! A payload binds a public mnemonic identifier (also used as the PBKDF2 salt)
//! and key-derivation parameters to an AES ciphertext of the packed mnemonic
//! entropy followed by a truncated SHA-256 integrity tag. The tag allows a
//! wrong password to be distinguished from malformed input without ever
//! returning corrupted words.
//!
//! ## Encoding
//!
//! ```text
//!  byte 0          : ID_LEN (N)
//!  bytes 1..N      : MNEMONIC_ID (UTF-8)
//!  byte N+1        : CIPHER_MODE (0 = AES-ECB, 1 = AES-CBC)
//!  bytes N+2..N+4  : ITERATIONS / 10000, big-endian 24-bit
//! [bytes N+5..N+20 : IV, CBC only]
//!  remaining       : AES(PACKED_ENTROPY || SHA256(PACKED_ENTROPY)[..16])
//! ```
//!
//! ## Operations
//!
//! - [`EncryptedPayload::encrypt`] builds a new (CBC) payload for display
//! - [`EncryptedPayload::parse`] validates scanned bytes
//! - [`EncryptedPayload::decrypt`] recovers the mnemonic or reports
//!   [`Error::WrongKey`]

use num_enum::{IntoPrimitive, TryFromPrimitive};
use static_assertions::const_assert_eq;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

pub mod cipher;

mod error;
pub use error::Error;

pub mod payload;
pub use payload::EncryptedPayload;

pub mod record;
pub use record::PlaintextRecord;

/// Re-export BIP39 types used at the API boundary
pub use bip39::{Language, Mnemonic};

/// Iteration counts are carried on the wire as multiples of this value
pub const ITERATION_MULTIPLE: u32 = 10_000;

/// Largest iteration field representable in the 24-bit wire encoding
pub const MAX_ITERATION_FIELD: u32 = 0x00ff_ffff;

/// Largest iteration field accepted on decode
///
/// PBKDF2 round counts are 32-bit, fields above this value (up to
/// [MAX_ITERATION_FIELD]) are well formed but cannot be derived and are
/// rejected with [Error::InvalidIterations].
pub const MAX_DERIVABLE_FIELD: u32 = u32::MAX / ITERATION_MULTIPLE;

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// CBC initialisation vector length
pub const IV_LEN: usize = AES_BLOCK_SIZE;

/// Truncated SHA-256 integrity tag length
pub const TAG_LEN: usize = 16;

/// Maximum mnemonic identifier length (single length byte)
pub const MAX_ID_LEN: usize = u8::MAX as usize;

/// Derived AES-256 key length
pub const KEY_LEN: usize = 32;

/// Packed entropy length for a 12-word mnemonic (132 - 4 checksum bits)
pub const PACKED_LEN_12: usize = 16;

/// Packed entropy length for a 24-word mnemonic (264 - 8 checksum bits)
pub const PACKED_LEN_24: usize = 32;

// Records always land on a block boundary so no padding is ever stripped
const_assert_eq!((PACKED_LEN_12 + TAG_LEN) % AES_BLOCK_SIZE, 0);
const_assert_eq!((PACKED_LEN_24 + TAG_LEN) % AES_BLOCK_SIZE, 0);

const_assert_eq!(MAX_DERIVABLE_FIELD, 429_496);

/// Cipher mode / payload version byte
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Debug,
    Display,
    EnumString,
    EnumVariantNames,
    EnumIter,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum CipherMode {
    /// PBKDF2-HMAC + AES-ECB, accepted for legacy payloads only
    #[strum(serialize = "AES-ECB")]
    Ecb = 0,

    /// PBKDF2-HMAC + AES-CBC with a random IV
    #[strum(serialize = "AES-CBC")]
    Cbc = 1,
}

impl CipherMode {
    /// Length of the IV carried ahead of the ciphertext for this mode
    pub const fn iv_len(&self) -> usize {
        match self {
            CipherMode::Ecb => 0,
            CipherMode::Cbc => IV_LEN,
        }
    }
}

impl Default for CipherMode {
    fn default() -> Self {
        CipherMode::Cbc
    }
}
