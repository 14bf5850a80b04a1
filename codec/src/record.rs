// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Plaintext mnemonic record
//!
//! Each BIP39 word maps to an 11-bit index, the concatenated index bits end
//! with a checksum over the preceding bits (4 bits for 12 words, 8 bits for
//! 24 words). The record drops the checksum and packs the remaining bits
//! big-endian / left-justified, which is exactly the BIP39 entropy, then
//! appends `SHA-256(packed)[..16]` as an integrity tag:
//!
//! ```text
//! 12 words: 132 - 4 = 128 bits = 16 bytes packed + 16 byte tag = 32 bytes
//! 24 words: 264 - 8 = 256 bits = 32 bytes packed + 16 byte tag = 48 bytes
//! ```
//!
//! On decode the checksum is recomputed by the BIP39 implementation.

use bip39::{Language, Mnemonic};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, PACKED_LEN_12, PACKED_LEN_24, TAG_LEN};

/// Packed mnemonic entropy with trailing integrity tag
///
/// Always holds a complete 12 or 24 word record, cleared on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaintextRecord {
    buff: Vec<u8>,
}

impl Drop for PlaintextRecord {
    fn drop(&mut self) {
        self.buff.zeroize();
    }
}

impl ZeroizeOnDrop for PlaintextRecord {}

impl PlaintextRecord {
    /// Build a record from a 12 or 24 word English mnemonic phrase
    pub fn from_phrase(phrase: &str) -> Result<Self, Error> {
        let words = phrase.split_whitespace().count();
        if words != 12 && words != 24 {
            return Err(Error::UnsupportedWordCount(words));
        }

        // Normalise whitespace before validation
        let mut normalised = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let r = Mnemonic::from_phrase(&normalised, Language::English);
        normalised.zeroize();

        let mnemonic = r.map_err(|_| Error::InvalidMnemonic)?;

        Self::from_mnemonic(&mnemonic)
    }

    /// Build a record from a parsed mnemonic
    pub fn from_mnemonic(mnemonic: &Mnemonic) -> Result<Self, Error> {
        Self::from_packed(mnemonic.entropy())
    }

    /// Build a record from packed entropy, computing the tag
    pub fn from_packed(packed: &[u8]) -> Result<Self, Error> {
        if packed.len() != PACKED_LEN_12 && packed.len() != PACKED_LEN_24 {
            return Err(Error::InvalidRecordLength(packed.len()));
        }

        let mut buff = Vec::with_capacity(packed.len() + TAG_LEN);
        buff.extend_from_slice(packed);
        buff.extend_from_slice(&tag(packed));

        Ok(Self { buff })
    }

    /// Verify a decrypted buffer and wrap it as a record
    ///
    /// Returns [`Error::WrongKey`] on tag mismatch, regardless of content.
    pub fn verify(decrypted: &[u8]) -> Result<Self, Error> {
        let packed_len = decrypted
            .len()
            .checked_sub(TAG_LEN)
            .ok_or(Error::InvalidRecordLength(decrypted.len()))?;

        let (packed, expected) = decrypted.split_at(packed_len);

        // Tag check precedes any interpretation of the plaintext
        if tag(packed)[..] != expected[..] {
            return Err(Error::WrongKey);
        }

        if packed_len != PACKED_LEN_12 && packed_len != PACKED_LEN_24 {
            return Err(Error::InvalidRecordLength(packed_len));
        }

        Ok(Self {
            buff: decrypted.to_vec(),
        })
    }

    /// Packed entropy (excluding tag)
    pub fn packed(&self) -> &[u8] {
        &self.buff[..self.buff.len() - TAG_LEN]
    }

    /// Integrity tag
    pub fn tag(&self) -> &[u8] {
        &self.buff[self.buff.len() - TAG_LEN..]
    }

    /// Number of mnemonic words encoded by this record
    pub fn word_count(&self) -> usize {
        // 11 bits per word, one checksum bit per 32 entropy bits
        let bits = self.packed().len() * 8;
        (bits + bits / 32) / 11
    }

    /// Rebuild the mnemonic, recomputing the BIP39 checksum
    pub fn to_mnemonic(&self) -> Result<Mnemonic, Error> {
        Mnemonic::from_entropy(self.packed(), Language::English).map_err(|_| Error::InvalidMnemonic)
    }

    /// Complete record bytes (packed entropy followed by tag)
    pub fn as_bytes(&self) -> &[u8] {
        &self.buff
    }

    /// Record length in bytes
    pub fn len(&self) -> usize {
        self.buff.len()
    }

    /// Records are never empty, provided for completeness
    pub fn is_empty(&self) -> bool {
        self.buff.is_empty()
    }
}

impl core::fmt::Debug for PlaintextRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PlaintextRecord({} words)", self.word_count())
    }
}

/// Compute the truncated SHA-256 integrity tag
pub fn tag(packed: &[u8]) -> [u8; TAG_LEN] {
    let d = Sha256::digest(packed);

    let mut t = [0u8; TAG_LEN];
    t.copy_from_slice(&d[..TAG_LEN]);
    t
}
