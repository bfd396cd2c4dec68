//! Password-based key derivation.
//!
//! The PKCS#12 key derivation function ([RFC 7292 Appendix B.2]) feeds both
//! the 3DES key/IV and the MAC key; PBKDF2 ([RFC 8018 § 5.2]) feeds the AES
//! variants through PBES2.
//!
//! [RFC 7292 Appendix B.2]: https://datatracker.ietf.org/doc/html/rfc7292#appendix-B.2
//! [RFC 8018 § 5.2]: https://datatracker.ietf.org/doc/html/rfc8018#section-5.2

use alloc::vec::Vec;
use pkcs12::kdf::{derive_key, Pkcs12KeyType};
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::algorithms::Pbkdf2Prf;
use crate::errors::{Error, Result};

/// Purpose ("ID" byte) of key material derived with the PKCS#12 KDF.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyPurpose {
    /// Cipher key material (ID 1).
    Encryption,
    /// Initialization vector (ID 2).
    Iv,
    /// MAC key (ID 3).
    Mac,
}

impl From<KeyPurpose> for Pkcs12KeyType {
    fn from(purpose: KeyPurpose) -> Pkcs12KeyType {
        match purpose {
            KeyPurpose::Encryption => Pkcs12KeyType::EncryptionKey,
            KeyPurpose::Iv => Pkcs12KeyType::Iv,
            KeyPurpose::Mac => Pkcs12KeyType::Mac,
        }
    }
}

/// Converts an iteration count into the signed form used by the KDFs and
/// the DER `INTEGER` encoding.
pub(crate) fn checked_iterations(iterations: u32) -> Result<i32> {
    match i32::try_from(iterations) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidIterationCount),
    }
}

/// Derive `len` bytes for `purpose` from `password` and `salt` with the
/// SHA-1 based PKCS#12 KDF.
///
/// The password is encoded as NUL-terminated big-endian UTF-16, with
/// characters outside the Basic Multilingual Plane written as surrogate
/// pairs. A missing password is treated as an empty octet string, without
/// terminator, which is how the MAC of a password-less bundle is keyed.
pub fn derive_pkcs12_key(
    password: Option<&str>,
    salt: &[u8],
    iterations: u32,
    purpose: KeyPurpose,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let rounds = checked_iterations(iterations)?;
    let password = Zeroizing::new(password.map_or_else(Vec::new, utf16be_with_nul));
    let key = derive_key::<Sha1>(&password, salt, purpose.into(), rounds, len);
    Ok(Zeroizing::new(key))
}

fn utf16be_with_nul(password: &str) -> Vec<u8> {
    password
        .encode_utf16()
        .chain(Some(0))
        .flat_map(u16::to_be_bytes)
        .collect()
}

/// Derive `len` bytes from `password` and `salt` with PBKDF2.
///
/// The password is used as its UTF-8 bytes.
pub fn derive_pbkdf2_key(
    password: &str,
    salt: &[u8],
    iterations: u32,
    prf: Pbkdf2Prf,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    checked_iterations(iterations)?;
    let mut key = Zeroizing::new(vec![0u8; len]);
    match prf {
        Pbkdf2Prf::HmacWithSha1 => {
            pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), salt, iterations, &mut key[..])
        }
        Pbkdf2Prf::HmacWithSha256 => {
            pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key[..])
        }
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_pkcs12_kdf_sha1() {
        let salt = hex!("0102030405060708");
        let key =
            derive_pkcs12_key(Some("ge@äheim"), &salt, 100, KeyPurpose::Encryption, 24).unwrap();
        assert_eq!(key.len(), 24);

        let iv = derive_pkcs12_key(Some("ge@äheim"), &salt, 100, KeyPurpose::Iv, 8).unwrap();
        let mac = derive_pkcs12_key(Some("ge@äheim"), &salt, 100, KeyPurpose::Mac, 20).unwrap();
        assert_ne!(&key[..8], &iv[..]);
        assert_ne!(&key[..20], &mac[..]);

        // Longer outputs extend shorter ones.
        let long = derive_pkcs12_key(Some("ge@äheim"), &salt, 100, KeyPurpose::Mac, 40).unwrap();
        assert_eq!(&long[..20], &mac[..]);
    }

    #[test]
    fn test_pkcs12_kdf_known_answers() {
        let key = derive_pkcs12_key(
            Some("smeg"),
            &hex!("0A58CF64530D823F"),
            1,
            KeyPurpose::Encryption,
            24,
        )
        .unwrap();
        assert_eq!(
            &key[..],
            &hex!("8AAAE6297B6CB04642AB5B077851284EB7128F1A2A7FBCA3")
        );

        let iv =
            derive_pkcs12_key(Some("smeg"), &hex!("0A58CF64530D823F"), 1, KeyPurpose::Iv, 8)
                .unwrap();
        assert_eq!(&iv[..], &hex!("79993DFE048D3B76"));

        let mac =
            derive_pkcs12_key(Some("smeg"), &hex!("3D83C0E4546AC140"), 1, KeyPurpose::Mac, 20)
                .unwrap();
        assert_eq!(&mac[..], &hex!("8D967D88F6CAA9D714800AB3D48051D63F73A312"));
    }

    #[test]
    fn test_pkcs12_kdf_surrogate_pairs() {
        let salt = hex!("0102030405060708");
        let key = derive_pkcs12_key(Some("\u{1F40E}"), &salt, 1, KeyPurpose::Mac, 20).unwrap();
        let expected = derive_key::<Sha1>(&hex!("d83ddc0e 0000"), &salt, Pkcs12KeyType::Mac, 1, 20);
        assert_eq!(&key[..], &expected[..]);

        let bmp = derive_pkcs12_key(Some("\u{F40E}"), &salt, 1, KeyPurpose::Mac, 20).unwrap();
        assert_ne!(key, bmp);
    }

    #[test]
    fn test_missing_password_differs_from_empty() {
        let salt = hex!("0102030405060708");
        let none = derive_pkcs12_key(None, &salt, 1, KeyPurpose::Mac, 20).unwrap();
        let empty = derive_pkcs12_key(Some(""), &salt, 1, KeyPurpose::Mac, 20).unwrap();
        assert_ne!(none, empty);
    }

    #[test]
    fn test_pbkdf2_sha1_rfc6070() {
        let key = derive_pbkdf2_key("password", b"salt", 2, Pbkdf2Prf::HmacWithSha1, 20).unwrap();
        assert_eq!(&key[..], &hex!("ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"));
    }

    #[test]
    fn test_pbkdf2_sha256() {
        let key =
            derive_pbkdf2_key("password", b"salt", 1, Pbkdf2Prf::HmacWithSha256, 32).unwrap();
        assert_eq!(
            &key[..],
            &hex!("120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b")
        );
    }

    #[test]
    fn test_iteration_bounds() {
        let salt = [0u8; 8];
        assert_eq!(
            derive_pkcs12_key(Some("pw"), &salt, 0, KeyPurpose::Mac, 20),
            Err(Error::InvalidIterationCount)
        );
        assert_eq!(
            derive_pbkdf2_key("pw", &salt, u32::MAX, Pbkdf2Prf::HmacWithSha1, 16),
            Err(Error::InvalidIterationCount)
        );
        assert_eq!(checked_iterations(i32::MAX as u32), Ok(i32::MAX));
    }
}
