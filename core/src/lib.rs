// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Air-gapped signer QR scanning core
//!
//! This provides the [Scanner][engine::Scanner] coordinating live camera capture,
//! QR decoding and on-screen feedback for hardware signing devices, as well as
//! the [decrypt] flow for encrypted SeedQR payloads (see [codec] for the wire format).
//!
//! Platform collaborators are provided via the [`FrameSource`], [`Decoder`] and
//! [`Display`] traits.
//!
//! ## Operations
//!
//! ### Scanning a QR code
//!
//! 1. Create a [`Scanner`][engine::Scanner] with a [`ScanConfig`]
//! 2. Hand a [`CancelToken`][engine::CancelToken] to the button handler
//! 3. Call [`Scanner::run`][engine::Scanner::run], which returns once the decoder
//!    completes, reports an invalid payload, or the scan is cancelled
//!
//! While running, the decode loop classifies each frame as a
//! [`ScanStatus`] and the render loop composites progress feedback over the
//! live preview via [`ui::compose`].
//!
//! ### Decrypting an encrypted SeedQR
//!
//! 1. Parse scanned bytes with [`decrypt::review`] and show the public summary
//! 2. Collect the encryption key from the operator
//! 3. Call [`decrypt::decrypt_scanned`], mapping any failure to a [`Notice`]
//!    so the operator can rescan, retype the key, or abandon

pub use seedqr_codec::{self as codec};

mod config;
pub use config::*;

mod driver;
pub use driver::*;

mod status;
pub use status::*;

pub mod decrypt;
pub use decrypt::Notice;

pub mod engine;

pub mod ui;
