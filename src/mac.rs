//! Integrity MAC over the AuthenticatedSafe.
//!
//! ```text
//! MacData ::= SEQUENCE {
//!     mac         DigestInfo,
//!     macSalt     OCTET STRING,
//!     iterations  INTEGER DEFAULT 1
//! }
//! ```

use alloc::vec::Vec;
use hmac::{Hmac, Mac};
use rand_core::CryptoRngCore;
use sha1::Sha1;

use crate::algorithms::kdf::{checked_iterations, derive_pkcs12_key, KeyPurpose};
use crate::asn1::Asn1Node;
use crate::errors::{Error, Result};
use crate::oids;
use crate::traits::ToAsn1;

/// Size of the HMAC-SHA-1 key and output.
pub const MAC_LEN: usize = 20;

type HmacSha1 = Hmac<Sha1>;

/// `MacData` sealing a bundle: HMAC-SHA-1 keyed by the PKCS#12 KDF.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacData {
    salt: Vec<u8>,
    iterations: u32,
    mac: Vec<u8>,
}

impl MacData {
    /// Compute the MAC of `auth_safe_der` with a fresh `salt_size`-byte salt.
    ///
    /// A missing password keys the MAC from the empty octet string.
    pub fn compute<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        auth_safe_der: &[u8],
        password: Option<&str>,
        salt_size: usize,
        iterations: u32,
    ) -> Result<Self> {
        if salt_size == 0 {
            return Err(Error::InvalidSaltSize);
        }
        checked_iterations(iterations)?;

        let mut salt = vec![0u8; salt_size];
        rng.fill_bytes(&mut salt);

        let mac = hmac_for(password, &salt, iterations)?
            .chain_update(auth_safe_der)
            .finalize()
            .into_bytes()
            .to_vec();

        Ok(Self {
            salt,
            iterations,
            mac,
        })
    }

    /// Recompute the MAC of `auth_safe_der` and compare it in constant time.
    pub fn verify(&self, auth_safe_der: &[u8], password: Option<&str>) -> Result<()> {
        hmac_for(password, &self.salt, self.iterations)?
            .chain_update(auth_safe_der)
            .verify_slice(&self.mac)
            .map_err(|_| Error::MacVerification)
    }

    /// MAC salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// KDF iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// HMAC-SHA-1 value.
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }
}

fn hmac_for(password: Option<&str>, salt: &[u8], iterations: u32) -> Result<HmacSha1> {
    let key = derive_pkcs12_key(password, salt, iterations, KeyPurpose::Mac, MAC_LEN)?;
    HmacSha1::new_from_slice(&key).map_err(|_| Error::Crypto)
}

impl ToAsn1 for MacData {
    fn to_asn1(&self) -> Result<Asn1Node> {
        let digest_info = Asn1Node::sequence(vec![
            Asn1Node::sequence(vec![Asn1Node::oid(&oids::SHA1), Asn1Node::null()]),
            Asn1Node::octet_string(self.mac.clone()),
        ]);
        Ok(Asn1Node::sequence(vec![
            digest_info,
            Asn1Node::octet_string(self.salt.clone()),
            Asn1Node::integer(i64::from(self.iterations))?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const DATA: &[u8] = b"authenticated safe";

    #[test]
    fn test_compute_and_verify() {
        let mut rng = ChaCha8Rng::from_seed([3; 32]);
        let mac = MacData::compute(&mut rng, DATA, Some("password"), 8, 2048).unwrap();
        assert_eq!(mac.salt().len(), 8);
        assert_eq!(mac.mac().len(), MAC_LEN);
        assert_eq!(mac.iterations(), 2048);

        assert!(mac.verify(DATA, Some("password")).is_ok());
        assert_eq!(
            mac.verify(DATA, Some("passw0rd")),
            Err(Error::MacVerification)
        );
        assert_eq!(
            mac.verify(b"authenticated safe!", Some("password")),
            Err(Error::MacVerification)
        );
        assert_eq!(mac.verify(DATA, None), Err(Error::MacVerification));
    }

    #[test]
    fn test_known_answer() {
        // MAC key from the "smeg" KDF vector, applied by hand.
        let salt = hex!("3d83c0e4546ac140");
        let key = derive_pkcs12_key(Some("smeg"), &salt, 1, KeyPurpose::Mac, MAC_LEN).unwrap();
        assert_eq!(
            key.as_slice(),
            hex!("8D967D88F6CAA9D714800AB3D48051D63F73A312")
        );

        let expected = HmacSha1::new_from_slice(&key)
            .unwrap()
            .chain_update(DATA)
            .finalize()
            .into_bytes();
        let mac = MacData {
            salt: salt.to_vec(),
            iterations: 1,
            mac: expected.to_vec(),
        };
        assert!(mac.verify(DATA, Some("smeg")).is_ok());
    }

    #[test]
    fn test_missing_password() {
        let mut rng = ChaCha8Rng::from_seed([3; 32]);
        let mac = MacData::compute(&mut rng, DATA, None, 8, 1).unwrap();
        assert!(mac.verify(DATA, None).is_ok());
        assert_eq!(mac.verify(DATA, Some("")), Err(Error::MacVerification));
    }

    #[test]
    fn test_encoding() {
        let mac = MacData {
            salt: hex!("0102").to_vec(),
            iterations: 2048,
            mac: vec![0xaa; MAC_LEN],
        };
        let mut expected = hex!("302b 3021 3009 06052b0e03021a 0500 0414").to_vec();
        expected.extend_from_slice(&[0xaa; MAC_LEN]);
        expected.extend_from_slice(&hex!("04020102 02020800"));
        assert_eq!(mac.to_der().unwrap(), expected);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut rng = ChaCha8Rng::from_seed([3; 32]);
        assert_eq!(
            MacData::compute(&mut rng, DATA, Some("pw"), 0, 1),
            Err(Error::InvalidSaltSize)
        );
        assert_eq!(
            MacData::compute(&mut rng, DATA, Some("pw"), 8, 0),
            Err(Error::InvalidIterationCount)
        );
    }
}
