#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Bundle layout
//!
//! The output follows [RFC7292]:
//!
//! ```text
//! PFX (version 3)
//! ├── authSafe: ContentInfo{data}
//! │   └── AuthenticatedSafe
//! │       ├── ContentInfo{data} → SafeContents
//! │       │   ├── certBag (leaf, with localKeyId / friendlyName)
//! │       │   └── certBag (intermediates, no attributes)
//! │       └── ContentInfo{data} → SafeContents
//! │           └── keyBag | pkcs8ShroudedKeyBag (same attributes)
//! └── macData: HMAC-SHA-1 over the AuthenticatedSafe
//! ```
//!
//! The certificate `ContentInfo` is left out when the chain holds no
//! certificates, and `macData` when [`Pkcs12Options::without_mac`] is used.
//!
//! # Usage
//!
//! ```
//! use pfx_builder::{EncryptionAlgorithm, Pkcs12Builder, Pkcs12Options};
//! use hex_literal::hex;
//!
//! # fn main() -> pfx_builder::Result<()> {
//! // Ed25519 PrivateKeyInfo
//! let key = hex!(
//!     "302e020100300506032b657004220420"
//!     "d4ee72dbf913584ad5b6d8f1f769f8ad3afe7c28cbf1d4fbe097a88f44755842"
//! );
//! let chain = "-----BEGIN CERTIFICATE-----\nMAYCAQECAQI=\n-----END CERTIFICATE-----\n";
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//! let builder = Pkcs12Builder::new(
//!     Pkcs12Options::new()
//!         .with_algorithm(EncryptionAlgorithm::Aes256)
//!         .with_friendly_name("example"),
//! );
//! let pfx = builder.build(&mut rng, &key, chain, Some("correct horse battery"))?;
//! assert_eq!(pfx.as_bytes()[0], 0x30);
//! # Ok(())
//! # }
//! ```
//!
//! [RFC7292]: https://datatracker.ietf.org/doc/html/rfc7292

#[cfg(doctest)]
pub struct ReadmeDoctests;

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use const_oid;
pub use der;
pub use pkcs8;
pub use rand_core;

pub mod algorithms;
pub mod asn1;
pub mod attributes;
pub mod bags;
pub mod errors;
pub mod key_bag;
pub mod mac;
pub mod oids;
pub mod options;
pub mod pem;
pub mod pfx;
pub mod traits;

pub use crate::{
    algorithms::{EncryptionAlgorithm, Pbkdf2Prf},
    asn1::Asn1Node,
    errors::{Error, Result},
    mac::MacData,
    options::Pkcs12Options,
    pfx::{Pfx, Pkcs12Builder},
    traits::ToAsn1,
};
