//! Bundle configuration.

use alloc::string::{String, ToString};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithms::{EncryptionAlgorithm, Pbkdf2Prf};
use crate::errors::{Error, Result};

/// Default salt size in bytes, for both key encryption and the MAC.
pub const DEFAULT_SALT_SIZE: usize = 8;

/// Default iteration count, for both key encryption and the MAC.
pub const DEFAULT_ITERATIONS: u32 = 2048;

/// Options controlling how a PKCS#12 bundle is assembled.
///
/// Every field has an explicit default (see [`Pkcs12Options::default`]);
/// the `with_*` methods return a modified copy.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pkcs12Options {
    /// Private key encryption algorithm. Defaults to 3DES.
    pub algorithm: EncryptionAlgorithm,
    /// PBKDF2 PRF for the AES algorithms. Defaults to `hmacWithSHA1`.
    pub prf: Pbkdf2Prf,
    /// Salt size in bytes. Defaults to 8.
    pub salt_size: usize,
    /// KDF iteration count. Defaults to 2048.
    pub iterations: u32,
    /// Whether to seal the bundle with a MAC. Defaults to `true`.
    pub use_mac: bool,
    /// Hex-encoded `localKeyId` overriding the derived one.
    pub local_key_id: Option<String>,
    /// Generate a random `localKeyId` when there is no certificate to
    /// derive one from. Defaults to `true`.
    pub generate_local_key_id: bool,
    /// `friendlyName` attribute for the first certificate and the key.
    pub friendly_name: Option<String>,
    /// Skip the minimum password length check. Defaults to `false`.
    pub allow_weak_password: bool,
}

impl Default for Pkcs12Options {
    fn default() -> Self {
        Self {
            algorithm: EncryptionAlgorithm::TripleDes,
            prf: Pbkdf2Prf::HmacWithSha1,
            salt_size: DEFAULT_SALT_SIZE,
            iterations: DEFAULT_ITERATIONS,
            use_mac: true,
            local_key_id: None,
            generate_local_key_id: true,
            friendly_name: None,
            allow_weak_password: false,
        }
    }
}

impl Pkcs12Options {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `algorithm` to encrypt the private key.
    pub fn with_algorithm(self, algorithm: EncryptionAlgorithm) -> Self {
        Self { algorithm, ..self }
    }

    /// Use `prf` for PBKDF2 when an AES algorithm is selected.
    pub fn with_prf(self, prf: Pbkdf2Prf) -> Self {
        Self { prf, ..self }
    }

    /// Use `salt_size` bytes of salt.
    pub fn with_salt_size(self, salt_size: usize) -> Self {
        Self { salt_size, ..self }
    }

    /// Use `iterations` KDF iterations.
    pub fn with_iterations(self, iterations: u32) -> Self {
        Self { iterations, ..self }
    }

    /// Leave out the MacData integrity seal.
    pub fn without_mac(self) -> Self {
        Self {
            use_mac: false,
            ..self
        }
    }

    /// Use the hex-encoded `local_key_id` instead of deriving one.
    pub fn with_local_key_id(self, local_key_id: &str) -> Self {
        Self {
            local_key_id: Some(local_key_id.to_string()),
            ..self
        }
    }

    /// Do not generate a random `localKeyId` for certificate-less bundles.
    pub fn without_generated_local_key_id(self) -> Self {
        Self {
            generate_local_key_id: false,
            ..self
        }
    }

    /// Attach `name` as the `friendlyName` attribute.
    pub fn with_friendly_name(self, name: &str) -> Self {
        Self {
            friendly_name: Some(name.to_string()),
            ..self
        }
    }

    /// Accept passwords shorter than the algorithm's minimum.
    pub fn allow_weak_password(self) -> Self {
        Self {
            allow_weak_password: true,
            ..self
        }
    }

    /// Check the salt size and iteration count.
    pub fn validate(&self) -> Result<()> {
        if self.salt_size == 0 {
            return Err(Error::InvalidSaltSize);
        }
        crate::algorithms::kdf::checked_iterations(self.iterations)?;
        Ok(())
    }

    /// Apply the password policy for the selected algorithm.
    ///
    /// Unless [`Pkcs12Options::allow_weak_password`] is set, a missing
    /// password or one shorter than
    /// [`EncryptionAlgorithm::min_password_len`] characters is rejected.
    ///
    /// Length is counted in Unicode scalar values, so a character outside
    /// the Basic Multilingual Plane counts once. Counting UTF-16 code units
    /// instead, as some PKCS#12 tools do, would count it twice.
    pub fn check_password(&self, password: Option<&str>) -> Result<()> {
        if self.allow_weak_password {
            log::warn!("password length check disabled");
            return Ok(());
        }

        let required = self.algorithm.min_password_len();
        match password {
            Some(password) if password.chars().count() >= required => Ok(()),
            _ => Err(Error::WeakPassword {
                algorithm: self.algorithm,
                required,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Pkcs12Options::default();
        assert_eq!(opts.algorithm, EncryptionAlgorithm::TripleDes);
        assert_eq!(opts.salt_size, 8);
        assert_eq!(opts.iterations, 2048);
        assert!(opts.use_mac);
        assert!(opts.generate_local_key_id);
        assert!(!opts.allow_weak_password);
        assert_eq!(opts.local_key_id, None);
        assert_eq!(opts.friendly_name, None);
    }

    #[test]
    fn test_builder_returns_modified_copy() {
        let base = Pkcs12Options::new();
        let aes = base.clone().with_algorithm(EncryptionAlgorithm::Aes256);
        assert_eq!(base.algorithm, EncryptionAlgorithm::TripleDes);
        assert_eq!(aes.algorithm, EncryptionAlgorithm::Aes256);
        assert_eq!(aes.iterations, base.iterations);
    }

    #[test]
    fn test_password_policy() {
        let opts = Pkcs12Options::new();
        assert_eq!(
            opts.check_password(Some("short")),
            Err(Error::WeakPassword {
                algorithm: EncryptionAlgorithm::TripleDes,
                required: 12
            })
        );
        assert!(opts.check_password(Some("twelve chars")).is_ok());
        assert!(opts.check_password(None).is_err());

        let aes = opts.clone().with_algorithm(EncryptionAlgorithm::Aes128);
        assert!(aes.check_password(Some("8 chars!")).is_ok());
        assert!(aes.check_password(Some("7 chars")).is_err());

        // Counted in characters, not bytes.
        assert!(aes.check_password(Some("ääääääää")).is_ok());
        assert!(aes.check_password(Some("äääääää")).is_err());
        assert!(aes.check_password(Some("\u{1F40E}\u{1F40E}\u{1F40E}\u{1F40E}")).is_err());

        let weak = opts.allow_weak_password();
        assert!(weak.check_password(Some("short")).is_ok());
        assert!(weak.check_password(None).is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(Pkcs12Options::new().validate().is_ok());
        assert_eq!(
            Pkcs12Options::new().with_salt_size(0).validate(),
            Err(Error::InvalidSaltSize)
        );
        assert_eq!(
            Pkcs12Options::new().with_iterations(0).validate(),
            Err(Error::InvalidIterationCount)
        );
        assert_eq!(
            Pkcs12Options::new()
                .with_iterations(i32::MAX as u32 + 1)
                .validate(),
            Err(Error::InvalidIterationCount)
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde() {
        let opts: Pkcs12Options =
            serde_json::from_str(r#"{"algorithm":"aes256","friendly_name":"me"}"#).unwrap();
        assert_eq!(
            opts,
            Pkcs12Options::new()
                .with_algorithm(EncryptionAlgorithm::Aes256)
                .with_friendly_name("me")
        );

        let tdes: Pkcs12Options = serde_json::from_str(r#"{"algorithm":"3des"}"#).unwrap();
        assert_eq!(tdes.algorithm, EncryptionAlgorithm::TripleDes);
    }
}
