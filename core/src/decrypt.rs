// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Encrypted SeedQR ingestion
//!
//! Once a scan completes with an encrypted payload, the public fields are
//! shown to the operator for review ([review]), an encryption key is
//! collected, and the mnemonic recovered via [decrypt_scanned]. Every
//! failure maps to a distinct operator [Notice].

use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use crate::{
    codec::{self, EncryptedPayload, Mnemonic},
    engine::ScanOutcome,
};

/// Maximum encryption key length (in characters)
pub const MAX_KEY_LEN: usize = 200;

/// Encrypted QR decryption failures
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum DecryptFailure {
    /// Key exceeds [MAX_KEY_LEN]
    #[error("key length is too long")]
    KeyTooLong,

    /// Payload could not be parsed
    #[error("malformed encrypted QR")]
    Malformed,

    /// Integrity check failed, the key is wrong (or the payload tampered)
    #[error("wrong encryption key")]
    WrongKey,
}

impl From<codec::Error> for DecryptFailure {
    fn from(e: codec::Error) -> Self {
        match e.is_wrong_key() {
            true => DecryptFailure::WrongKey,
            false => DecryptFailure::Malformed,
        }
    }
}

/// Parse scanned bytes for operator review prior to key entry
///
/// The returned payload's `Display` impl renders the public summary.
pub fn review(data: &[u8]) -> Result<EncryptedPayload, DecryptFailure> {
    EncryptedPayload::parse(data).map_err(|_e| {
        #[cfg(feature = "log")]
        log::warn!("encrypted QR parse failed: {}", _e);

        DecryptFailure::Malformed
    })
}

/// Check an operator supplied key prior to decryption
pub fn check_key(key: &str) -> Result<(), DecryptFailure> {
    match key.chars().count() > MAX_KEY_LEN {
        true => Err(DecryptFailure::KeyTooLong),
        false => Ok(()),
    }
}

/// Recover a mnemonic from scanned encrypted QR bytes
pub fn decrypt_scanned(data: &[u8], key: &str) -> Result<Mnemonic, DecryptFailure> {
    check_key(key)?;

    let payload = review(data)?;

    payload.decrypt(key).map_err(|e| {
        #[cfg(feature = "log")]
        log::warn!("encrypted QR decrypt failed: {}", e);

        DecryptFailure::from(e)
    })
}

/// Follow-up action offered with a [Notice]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumVariantNames, EnumIter)]
pub enum NoticeAction {
    /// Return to scanning
    Rescan,
    /// Return to key entry
    RetypeKey,
    /// Abandon the flow
    Abandon,
}

/// Operator facing messages, one per failure / terminal class
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumVariantNames, EnumIter)]
pub enum Notice {
    /// Scanned payload invalid or unsupported
    ScanInvalid,
    /// Scan cancelled via button input
    ScanCancelled,
    /// Encrypted QR could not be parsed
    MalformedQr,
    /// Integrity check failed following decryption
    WrongKey,
    /// Encryption key exceeds [MAX_KEY_LEN]
    KeyTooLong,
}

impl Notice {
    /// Screen title
    pub fn title(&self) -> &'static str {
        match self {
            Notice::ScanCancelled => "Scan",
            Notice::ScanInvalid | Notice::MalformedQr | Notice::WrongKey | Notice::KeyTooLong => {
                "Error"
            }
        }
    }

    /// Status headline
    pub fn headline(&self) -> &'static str {
        match self {
            Notice::ScanInvalid => "Unknown QR Type",
            Notice::ScanCancelled => "Scan Cancelled",
            Notice::MalformedQr => "Invalid Encrypted QR",
            Notice::WrongKey => "Decryption Failure",
            Notice::KeyTooLong => "Invalid Key",
        }
    }

    /// Body text
    pub fn text(&self) -> &'static str {
        match self {
            Notice::ScanInvalid => "QRCode is invalid or is a data format not yet supported.",
            Notice::ScanCancelled => "No data was captured.",
            Notice::MalformedQr => "Encrypted QR data could not be read.",
            Notice::WrongKey => "Review your encryption key.",
            Notice::KeyTooLong => "Key length is too long.",
        }
    }

    /// Follow-up action
    pub fn action(&self) -> NoticeAction {
        match self {
            Notice::ScanInvalid | Notice::MalformedQr => NoticeAction::Rescan,
            Notice::WrongKey | Notice::KeyTooLong => NoticeAction::RetypeKey,
            Notice::ScanCancelled => NoticeAction::Abandon,
        }
    }

    /// Resolve a notice for a scan outcome, `None` on success
    pub fn for_outcome(outcome: ScanOutcome) -> Option<Self> {
        match outcome {
            ScanOutcome::Complete => None,
            ScanOutcome::Invalid => Some(Notice::ScanInvalid),
            ScanOutcome::Cancelled => Some(Notice::ScanCancelled),
        }
    }
}

impl From<DecryptFailure> for Notice {
    fn from(f: DecryptFailure) -> Self {
        match f {
            DecryptFailure::KeyTooLong => Notice::KeyTooLong,
            DecryptFailure::Malformed => Notice::MalformedQr,
            DecryptFailure::WrongKey => Notice::WrongKey,
        }
    }
}
