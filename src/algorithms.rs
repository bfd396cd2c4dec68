//! Password-based encryption algorithms supported for shrouding the private key.

pub mod cbc;
pub mod kdf;

use core::fmt;
use core::str::FromStr;

use const_oid::ObjectIdentifier;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::oids;

/// Cipher used to encrypt the private key.
///
/// 3DES is the default: it is the only PKCS#12 scheme that every mainstream
/// certificate store still imports. The AES variants are encrypted with
/// PBES2 and need a reasonably recent importer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EncryptionAlgorithm {
    /// `pbeWithSHAAnd3-KeyTripleDES-CBC`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "3des"))]
    TripleDes,
    /// PBES2 with AES-128-CBC
    Aes128,
    /// PBES2 with AES-192-CBC
    Aes192,
    /// PBES2 with AES-256-CBC
    Aes256,
}

impl EncryptionAlgorithm {
    /// Cipher key size in bytes.
    pub fn key_len(self) -> usize {
        match self {
            EncryptionAlgorithm::TripleDes => 24,
            EncryptionAlgorithm::Aes128 => 16,
            EncryptionAlgorithm::Aes192 => 24,
            EncryptionAlgorithm::Aes256 => 32,
        }
    }

    /// CBC initialization vector size in bytes.
    pub fn iv_len(self) -> usize {
        match self {
            EncryptionAlgorithm::TripleDes => 8,
            _ => 16,
        }
    }

    /// Shortest password accepted by [`crate::Pkcs12Options::check_password`].
    pub fn min_password_len(self) -> usize {
        match self {
            EncryptionAlgorithm::TripleDes => 12,
            _ => 8,
        }
    }

    /// Whether the key and IV come from the PKCS#12 KDF rather than PBKDF2.
    pub fn is_pkcs12_pbe(self) -> bool {
        self == EncryptionAlgorithm::TripleDes
    }

    /// OID of the cipher (for AES, the PBES2 encryption scheme) or of the
    /// PKCS#12 PBE scheme (for 3DES).
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            EncryptionAlgorithm::TripleDes => oids::PBE_WITH_SHA_AND_3_KEY_TRIPLE_DES_CBC,
            EncryptionAlgorithm::Aes128 => oids::AES_128_CBC,
            EncryptionAlgorithm::Aes192 => oids::AES_192_CBC,
            EncryptionAlgorithm::Aes256 => oids::AES_256_CBC,
        }
    }

    /// Selector string, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            EncryptionAlgorithm::TripleDes => "3des",
            EncryptionAlgorithm::Aes128 => "aes128",
            EncryptionAlgorithm::Aes192 => "aes192",
            EncryptionAlgorithm::Aes256 => "aes256",
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "3des" => Ok(EncryptionAlgorithm::TripleDes),
            "aes128" => Ok(EncryptionAlgorithm::Aes128),
            "aes192" => Ok(EncryptionAlgorithm::Aes192),
            "aes256" => Ok(EncryptionAlgorithm::Aes256),
            _ => Err(Error::UnsupportedAlgorithm),
        }
    }
}

/// PRF used by PBKDF2 for the AES variants.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pbkdf2Prf {
    /// `hmacWithSHA1`, the PKCS#5 default. Omitted from the encoded parameters.
    #[default]
    HmacWithSha1,
    /// `hmacWithSHA256`
    HmacWithSha256,
}

impl Pbkdf2Prf {
    /// OID of the PRF.
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            Pbkdf2Prf::HmacWithSha1 => oids::HMAC_WITH_SHA1,
            Pbkdf2Prf::HmacWithSha256 => oids::HMAC_WITH_SHA256,
        }
    }

    /// Whether this is the default PRF, which DER requires to be omitted.
    pub fn is_default(self) -> bool {
        self == Pbkdf2Prf::HmacWithSha1
    }
}
