// Copyright (c) 2022-2023 The MobileCoin Foundation

//! PBKDF2-HMAC-SHA256 key derivation and AES-256 ECB / CBC block encryption
//!
//! Encryption zero-pads input to the AES block boundary, decryption never
//! strips padding (records are always block aligned). No authentication is
//! provided at this layer, see [`PlaintextRecord`][crate::PlaintextRecord]
//! for the integrity tag.

use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{CipherMode, Error, AES_BLOCK_SIZE, IV_LEN, KEY_LEN};

type Aes256EcbEnc = ecb::Encryptor<aes::Aes256>;
type Aes256EcbDec = ecb::Decryptor<aes::Aes256>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key derived from a password, cleared on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Derive a key via PBKDF2-HMAC-SHA256
    pub fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Self {
        let mut key = [0u8; KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
        Self(key)
    }

    /// Access raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl core::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Password based AES cipher
///
/// The key is derived once on construction and reused for each operation.
#[derive(Debug)]
pub struct AesCipher {
    key: DerivedKey,
}

impl AesCipher {
    /// Create a cipher keyed by `PBKDF2-HMAC-SHA256(password, salt, iterations)`
    pub fn new(password: &str, salt: &str, iterations: u32) -> Self {
        Self {
            key: DerivedKey::derive(password.as_bytes(), salt.as_bytes(), iterations),
        }
    }

    /// Create a cipher from an existing key
    pub fn from_key(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Encrypt `data`, zero-padded to the block size
    ///
    /// CBC requires an IV, which is prepended to the returned ciphertext.
    /// ECB takes no IV.
    pub fn encrypt(
        &self,
        mode: CipherMode,
        iv: Option<&[u8; IV_LEN]>,
        data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let padded_len = padded_len(data.len());

        let mut buff = Zeroizing::new(vec![0u8; padded_len]);
        buff[..data.len()].copy_from_slice(data);

        let key = self.key.as_bytes().as_slice();

        match (mode, iv) {
            (CipherMode::Ecb, None) => {
                Aes256EcbEnc::new_from_slice(key)
                    .map_err(|_| Error::Cipher)?
                    .encrypt_padded_mut::<NoPadding>(&mut buff, padded_len)
                    .map_err(|_| Error::Cipher)?;

                Ok(buff.to_vec())
            }
            (CipherMode::Cbc, Some(iv)) => {
                Aes256CbcEnc::new_from_slices(key, iv)
                    .map_err(|_| Error::Cipher)?
                    .encrypt_padded_mut::<NoPadding>(&mut buff, padded_len)
                    .map_err(|_| Error::Cipher)?;

                let mut out = Vec::with_capacity(IV_LEN + padded_len);
                out.extend_from_slice(iv);
                out.extend_from_slice(&buff);
                Ok(out)
            }
            _ => Err(Error::Cipher),
        }
    }

    /// Decrypt `data`, splitting the leading IV for CBC
    pub fn decrypt(&self, mode: CipherMode, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
        let key = self.key.as_bytes().as_slice();

        match mode {
            CipherMode::Ecb => {
                let mut buff = Zeroizing::new(data.to_vec());

                Aes256EcbDec::new_from_slice(key)
                    .map_err(|_| Error::Cipher)?
                    .decrypt_padded_mut::<NoPadding>(&mut buff)
                    .map_err(|_| Error::Cipher)?;

                Ok(buff)
            }
            CipherMode::Cbc => {
                if data.len() < IV_LEN {
                    return Err(Error::InvalidLength);
                }
                let (iv, ciphertext) = data.split_at(IV_LEN);
                let mut buff = Zeroizing::new(ciphertext.to_vec());

                Aes256CbcDec::new_from_slices(key, iv)
                    .map_err(|_| Error::Cipher)?
                    .decrypt_padded_mut::<NoPadding>(&mut buff)
                    .map_err(|_| Error::Cipher)?;

                Ok(buff)
            }
        }
    }
}

/// Round a length up to the next AES block boundary
pub const fn padded_len(n: usize) -> usize {
    (n + AES_BLOCK_SIZE - 1) / AES_BLOCK_SIZE * AES_BLOCK_SIZE
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pbkdf2_rfc7914_vector() {
        // RFC 7914 §11, PBKDF2-HMAC-SHA256 ("passwd", "salt", c = 1)
        let key = DerivedKey::derive(b"passwd", b"salt", 1);

        assert_eq!(
            &key.as_bytes()[..16],
            &[
                0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25,
                0x44, 0xb6, 0x05
            ]
        );
    }

    #[test]
    fn padding() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 16);
        assert_eq!(padded_len(16), 16);
        assert_eq!(padded_len(33), 48);
    }

    #[test]
    fn ecb_encrypt_decrypt() {
        let c = AesCipher::new("pass", "salt", 1);
        let data = [0xa5u8; 20];

        let enc = c.encrypt(CipherMode::Ecb, None, &data).unwrap();
        assert_eq!(enc.len(), 32);

        let dec = c.decrypt(CipherMode::Ecb, &enc).unwrap();
        assert_eq!(&dec[..20], &data);
        assert_eq!(&dec[20..], &[0u8; 12]);
    }

    #[test]
    fn cbc_encrypt_decrypt() {
        let c = AesCipher::new("pass", "salt", 1);
        let iv = [7u8; IV_LEN];
        let data = [0x5au8; 32];

        let enc = c.encrypt(CipherMode::Cbc, Some(&iv), &data).unwrap();
        assert_eq!(enc.len(), IV_LEN + 32);
        assert_eq!(&enc[..IV_LEN], &iv);

        let dec = c.decrypt(CipherMode::Cbc, &enc).unwrap();
        assert_eq!(&dec[..], &data);
    }

    #[test]
    fn ecb_exposes_repeated_blocks() {
        let c = AesCipher::new("pass", "salt", 1);
        let data = [0x11u8; 32];

        let ecb = c.encrypt(CipherMode::Ecb, None, &data).unwrap();
        assert_eq!(ecb[..16], ecb[16..32]);

        let cbc = c.encrypt(CipherMode::Cbc, Some(&[0u8; IV_LEN]), &data).unwrap();
        assert_ne!(cbc[IV_LEN..][..16], cbc[IV_LEN..][16..32]);
    }

    #[test]
    fn mode_iv_mismatch() {
        let c = AesCipher::new("pass", "salt", 1);

        assert_eq!(c.encrypt(CipherMode::Cbc, None, &[0u8; 16]), Err(Error::Cipher));
        assert_eq!(
            c.encrypt(CipherMode::Ecb, Some(&[0u8; IV_LEN]), &[0u8; 16]),
            Err(Error::Cipher)
        );
    }

    #[test]
    fn decrypt_unaligned() {
        let c = AesCipher::new("pass", "salt", 1);

        assert_eq!(c.decrypt(CipherMode::Ecb, &[0u8; 17]).err(), Some(Error::Cipher));
        assert_eq!(c.decrypt(CipherMode::Cbc, &[0u8; 8]).err(), Some(Error::InvalidLength));
    }
}
