// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Encrypted mnemonic payload
//!
//! ## Encoding
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    ID_LEN     |                 MNEMONIC_ID...                /
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  CIPHER_MODE  |           ITERATIONS / 10000 (BE)             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! /                      IV (16 bytes, CBC only)                  /
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! /                 CIPHERTEXT (32 or 48 bytes)...                /
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Iterations are divided by [`ITERATION_MULTIPLE`] on the wire, callers
//! passing a count that is not a clean multiple will see it truncated.
//! This matches payloads already issued and must not change.

use bip39::Mnemonic;
use byteorder::{BigEndian, ByteOrder};
use encdec::{DecodeOwned, Encode};
use rand_core::CryptoRngCore;

#[cfg(feature = "log")]
use log::debug;

use crate::{
    cipher::AesCipher, CipherMode, Error, PlaintextRecord, ITERATION_MULTIPLE, IV_LEN,
    MAX_DERIVABLE_FIELD, MAX_ID_LEN, MAX_ITERATION_FIELD, PACKED_LEN_12, PACKED_LEN_24, TAG_LEN,
};

/// Length of fixed header fields (id length, cipher mode, iterations)
const HEADER_LEN: usize = 5;

/// Encrypted mnemonic payload, see [module][self] docs for encoding
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EncryptedPayload {
    /// Public mnemonic identifier, also the key derivation salt
    mnemonic_id: String,

    /// Cipher mode / version
    cipher_mode: CipherMode,

    /// Key derivation iterations (always a multiple of [`ITERATION_MULTIPLE`])
    iterations: u32,

    /// Ciphertext region, IV prefixed for CBC
    ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    /// Encrypt a mnemonic phrase for display as a QR code
    ///
    /// New payloads are always AES-CBC with an IV drawn from `rng`.
    pub fn encrypt(
        password: &str,
        mnemonic_id: &str,
        phrase: &str,
        iterations: u32,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self, Error> {
        let mut iv = [0u8; IV_LEN];
        rng.fill_bytes(&mut iv);

        Self::encrypt_with_iv(password, mnemonic_id, phrase, iterations, &iv)
    }

    /// Encrypt a mnemonic phrase with AES-CBC using the provided IV
    pub fn encrypt_with_iv(
        password: &str,
        mnemonic_id: &str,
        phrase: &str,
        iterations: u32,
        iv: &[u8; IV_LEN],
    ) -> Result<Self, Error> {
        Self::seal(
            password,
            mnemonic_id,
            phrase,
            CipherMode::Cbc,
            iterations,
            Some(iv),
        )
    }

    /// Build a payload in any mode, ECB is only reachable from within the crate
    pub(crate) fn seal(
        password: &str,
        mnemonic_id: &str,
        phrase: &str,
        cipher_mode: CipherMode,
        iterations: u32,
        iv: Option<&[u8; IV_LEN]>,
    ) -> Result<Self, Error> {
        if mnemonic_id.len() > MAX_ID_LEN {
            return Err(Error::IdTooLong(mnemonic_id.len()));
        }

        let iterations = truncate_iterations(iterations)?;

        let record = PlaintextRecord::from_phrase(phrase)?;

        let cipher = AesCipher::new(password, mnemonic_id, iterations);
        let ciphertext = cipher.encrypt(cipher_mode, iv, record.as_bytes())?;

        #[cfg(feature = "log")]
        debug!(
            "sealed {} word record ({}, {} iterations)",
            record.word_count(),
            cipher_mode,
            iterations
        );

        Ok(Self {
            mnemonic_id: mnemonic_id.to_string(),
            cipher_mode,
            iterations,
            ciphertext,
        })
    }

    /// Parse scanned wire bytes
    pub fn parse(buff: &[u8]) -> Result<Self, Error> {
        let (p, _n) = Self::decode_owned(buff)?;
        Ok(p)
    }

    /// Decrypt the payload, returning the mnemonic on success
    ///
    /// Fails with [`Error::WrongKey`] where the integrity tag does not verify.
    pub fn decrypt(&self, password: &str) -> Result<Mnemonic, Error> {
        let cipher = AesCipher::new(password, &self.mnemonic_id, self.iterations);

        let decrypted = cipher.decrypt(self.cipher_mode, &self.ciphertext)?;

        let record = match PlaintextRecord::verify(&decrypted) {
            Ok(r) => r,
            Err(e) => {
                #[cfg(feature = "log")]
                debug!("record verification failed: {}", e);
                return Err(e);
            }
        };

        record.to_mnemonic()
    }

    /// Encode payload to a newly allocated buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buff = vec![0u8; self.encode_len()?];
        let n = self.encode(&mut buff)?;
        buff.truncate(n);
        Ok(buff)
    }

    /// Public mnemonic identifier
    pub fn mnemonic_id(&self) -> &str {
        &self.mnemonic_id
    }

    /// Cipher mode / version
    pub fn cipher_mode(&self) -> CipherMode {
        self.cipher_mode
    }

    /// Key derivation iterations
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Ciphertext region (including IV for CBC)
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Number of mnemonic words carried by this payload
    pub fn word_count(&self) -> usize {
        match self.ciphertext.len() - self.cipher_mode.iv_len() - TAG_LEN {
            PACKED_LEN_12 => 12,
            _ => 24,
        }
    }
}

/// Truncate an iteration count to the wire representable value
///
/// Returns the iteration count actually used for key derivation.
pub fn truncate_iterations(iterations: u32) -> Result<u32, Error> {
    let field = iterations / ITERATION_MULTIPLE;

    if field == 0 || field > MAX_ITERATION_FIELD {
        return Err(Error::InvalidIterations);
    }

    Ok(field * ITERATION_MULTIPLE)
}

impl Encode for EncryptedPayload {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(HEADER_LEN + self.mnemonic_id.len() + self.ciphertext.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let id = self.mnemonic_id.as_bytes();

        if id.len() > MAX_ID_LEN {
            return Err(Error::IdTooLong(id.len()));
        }
        if buff.len() < self.encode_len()? {
            return Err(Error::InvalidLength);
        }

        let mut index = 0;

        // Write mnemonic id
        buff[0] = id.len() as u8;
        buff[1..][..id.len()].copy_from_slice(id);
        index += 1 + id.len();

        // Write cipher mode
        buff[index] = self.cipher_mode.into();
        index += 1;

        // Write iterations field
        BigEndian::write_u24(&mut buff[index..], self.iterations / ITERATION_MULTIPLE);
        index += 3;

        // Write ciphertext (IV prefixed for CBC)
        buff[index..][..self.ciphertext.len()].copy_from_slice(&self.ciphertext);
        index += self.ciphertext.len();

        Ok(index)
    }
}

impl DecodeOwned for EncryptedPayload {
    type Output = Self;

    type Error = Error;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let mut index = 0;

        // Fetch mnemonic id
        let id_len = *buff.first().ok_or(Error::InvalidLength)? as usize;
        index += 1;

        if buff.len() < HEADER_LEN + id_len {
            return Err(Error::InvalidLength);
        }

        let mnemonic_id = core::str::from_utf8(&buff[index..][..id_len])
            .map_err(|_| Error::InvalidUtf8)?
            .to_string();
        index += id_len;

        // Fetch cipher mode
        let mode = buff[index];
        let cipher_mode = CipherMode::try_from(mode).map_err(|_| Error::UnknownCipherMode(mode))?;
        index += 1;

        // Fetch iterations, fields above MAX_DERIVABLE_FIELD exceed
        // the PBKDF2 round count
        let field = BigEndian::read_u24(&buff[index..]);
        if field == 0 || field > MAX_DERIVABLE_FIELD {
            return Err(Error::InvalidIterations);
        }
        let iterations = field * ITERATION_MULTIPLE;
        index += 3;

        // Check the remaining region holds exactly one 12 or 24 word record
        let packed_len = (buff.len() - index)
            .checked_sub(cipher_mode.iv_len() + TAG_LEN)
            .ok_or(Error::InvalidRecordLength(0))?;

        if packed_len != PACKED_LEN_12 && packed_len != PACKED_LEN_24 {
            return Err(Error::InvalidRecordLength(packed_len));
        }

        let ciphertext = buff[index..].to_vec();
        index += ciphertext.len();

        Ok((
            Self {
                mnemonic_id,
                cipher_mode,
                iterations,
                ciphertext,
            },
            index,
        ))
    }
}

/// Operator facing summary of public payload fields
impl core::fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Encrypted QR Code:")?;
        writeln!(f, "ID: {}", self.mnemonic_id)?;
        writeln!(f, "Version: {}", self.cipher_mode)?;
        write!(f, "Key iter.: {}", self.iterations)
    }
}
