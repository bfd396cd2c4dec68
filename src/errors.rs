//! Error types.

use crate::algorithms::EncryptionAlgorithm;

/// Alias for [`core::result::Result`] with the `pfx-builder` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Password is shorter than the policy minimum for the selected algorithm.
    WeakPassword {
        /// Algorithm the password was checked against.
        algorithm: EncryptionAlgorithm,
        /// Minimum number of characters required.
        required: usize,
    },

    /// Algorithm selector is not one of `3des`, `aes128`, `aes192`, `aes256`.
    UnsupportedAlgorithm,

    /// Iteration count is zero or does not fit a DER INTEGER.
    InvalidIterationCount,

    /// Salt size is zero.
    InvalidSaltSize,

    /// Certificate at the given chain position is not valid base64 DER.
    CertificateEncoding {
        /// Position of the certificate in the PEM chain.
        index: usize,
    },

    /// Supplied `localKeyId` is not valid hex.
    LocalKeyId,

    /// Malformed DER input.
    Asn1(der::Error),

    /// Private key is not a PKCS#8 `PrivateKeyInfo`.
    PrivateKey(pkcs8::Error),

    /// Base64 decoding error.
    Base64(base64ct::Error),

    /// Cipher rejected the derived key or IV.
    Crypto,

    /// Decryption or unpadding failed.
    Decryption,

    /// MAC check failed.
    MacVerification,
}

impl core::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::WeakPassword {
                algorithm,
                required,
            } => write!(
                f,
                "password must be at least {} characters long for {}",
                required, algorithm
            ),
            Error::UnsupportedAlgorithm => write!(f, "unsupported PKCS#12 algorithm"),
            Error::InvalidIterationCount => write!(f, "invalid iteration count"),
            Error::InvalidSaltSize => write!(f, "invalid salt size"),
            Error::CertificateEncoding { index } => {
                write!(f, "certificate #{} is not valid base64 DER", index)
            }
            Error::LocalKeyId => write!(f, "local key id is not valid hex"),
            Error::Asn1(err) => write!(f, "ASN.1 error: {}", err),
            Error::PrivateKey(err) => write!(f, "private key error: {}", err),
            Error::Base64(err) => write!(f, "base64 error: {}", err),
            Error::Crypto => write!(f, "invalid cipher key or IV length"),
            Error::Decryption => write!(f, "decryption error"),
            Error::MacVerification => write!(f, "MAC verification error"),
        }
    }
}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Error {
        Error::Asn1(err)
    }
}

impl From<pkcs8::Error> for Error {
    fn from(err: pkcs8::Error) -> Error {
        Error::PrivateKey(err)
    }
}

impl From<base64ct::Error> for Error {
    fn from(err: base64ct::Error) -> Error {
        Error::Base64(err)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Error {
        Error::LocalKeyId
    }
}
