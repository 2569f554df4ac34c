#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## Usage
//!
//! ```
//! # #[cfg(feature = "getrandom")]
//! # {
//! use p256_applet::{Applet, AID, provider::SoftwareProvider};
//!
//! let mut applet = Applet::new(SoftwareProvider::from_os_rng());
//!
//! // SELECT by AID
//! let mut select = vec![0x00, 0xA4, 0x04, 0x00, AID.len() as u8];
//! select.extend_from_slice(&AID);
//! assert_eq!(applet.transmit(&select), [0x90, 0x00]);
//!
//! // export the base point (tag stripped)
//! let response = applet.transmit(&[0x00, 0xEC, 0x05, 0x00]);
//! assert_eq!(response.len(), 64 + 2);
//! assert_eq!(&response[64..], &[0x90, 0x00]);
//! # }
//! ```

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod apdu;
pub mod engine;
pub mod export;
pub mod keystore;
pub mod params;
pub mod provider;

mod applet;
mod error;

pub use crate::{
    applet::{Applet, State, AID, GREETING},
    error::{CryptoReason, Error, Result},
    keystore::{KeyPair, KeyStore},
};
