//! PKCS#12 bag attributes (`localKeyId` and `friendlyName`).

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use digest::Digest;
use rand_core::CryptoRngCore;
use sha1::Sha1;

use crate::asn1::Asn1Node;
use crate::errors::Result;
use crate::oids;
use crate::traits::ToAsn1;

/// Length of a generated `localKeyId`, matching a SHA-1 digest.
pub const LOCAL_KEY_ID_LEN: usize = 20;

/// Attributes shared by the first certificate bag and the key bag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BagAttributes {
    local_key_id: Option<Vec<u8>>,
    friendly_name: Option<String>,
}

impl BagAttributes {
    /// Resolve the attribute set for a bundle.
    ///
    /// The `localKeyId` is, in order of precedence: `explicit_local_key_id`
    /// decoded from hex; the SHA-1 digest of `first_cert`; 20 random bytes
    /// when `generate_if_absent` is set; otherwise absent. Randomness is only
    /// consumed in the third case. The `friendlyName` is included whenever
    /// given.
    ///
    /// Returns `None` when neither attribute applies.
    pub fn build<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        first_cert: Option<&[u8]>,
        explicit_local_key_id: Option<&str>,
        friendly_name: Option<&str>,
        generate_if_absent: bool,
    ) -> Result<Option<Self>> {
        let local_key_id = match (explicit_local_key_id, first_cert) {
            (Some(hex_id), _) => Some(hex::decode(hex_id)?),
            (None, Some(cert)) => Some(Sha1::digest(cert).to_vec()),
            (None, None) if generate_if_absent => {
                let mut id = vec![0u8; LOCAL_KEY_ID_LEN];
                rng.fill_bytes(&mut id);
                Some(id)
            }
            (None, None) => None,
        };

        let attrs = Self {
            local_key_id,
            friendly_name: friendly_name.map(ToString::to_string),
        };

        if attrs.local_key_id.is_none() && attrs.friendly_name.is_none() {
            Ok(None)
        } else {
            Ok(Some(attrs))
        }
    }

    /// The `localKeyId` octets, if any.
    pub fn local_key_id(&self) -> Option<&[u8]> {
        self.local_key_id.as_deref()
    }

    /// The `friendlyName`, if any.
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }
}

fn attribute(oid: &const_oid::ObjectIdentifier, value: Asn1Node) -> Asn1Node {
    Asn1Node::sequence(vec![Asn1Node::oid(oid), Asn1Node::set(vec![value])])
}

impl ToAsn1 for BagAttributes {
    /// `SET OF PKCS12Attribute`
    fn to_asn1(&self) -> Result<Asn1Node> {
        let mut attrs = Vec::with_capacity(2);
        if let Some(id) = &self.local_key_id {
            attrs.push(attribute(&oids::LOCAL_KEY_ID, Asn1Node::octet_string(id.clone())));
        }
        if let Some(name) = &self.friendly_name {
            attrs.push(attribute(&oids::FRIENDLY_NAME, Asn1Node::bmp_string(name)));
        }
        Asn1Node::set_of(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const CERT: [u8; 5] = hex!("3003020103");

    #[test]
    fn test_explicit_id_wins() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let attrs = BagAttributes::build(&mut rng, Some(&CERT), Some("0a0b"), None, true)
            .unwrap()
            .unwrap();
        assert_eq!(attrs.local_key_id(), Some(&hex!("0a0b")[..]));
        assert_eq!(attrs.friendly_name(), None);
    }

    #[test]
    fn test_cert_digest() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let attrs = BagAttributes::build(&mut rng, Some(&CERT), None, Some("me"), true)
            .unwrap()
            .unwrap();
        assert_eq!(attrs.local_key_id(), Some(Sha1::digest(CERT).as_slice()));
        assert_eq!(attrs.friendly_name(), Some("me"));
    }

    #[test]
    fn test_random_without_cert() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let a = BagAttributes::build(&mut rng, None, None, None, true)
            .unwrap()
            .unwrap();
        let b = BagAttributes::build(&mut rng, None, None, None, true)
            .unwrap()
            .unwrap();
        assert_eq!(a.local_key_id().unwrap().len(), LOCAL_KEY_ID_LEN);
        assert_ne!(a.local_key_id(), b.local_key_id());
    }

    #[test]
    fn test_nothing_to_emit() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        assert_eq!(
            BagAttributes::build(&mut rng, None, None, None, false).unwrap(),
            None
        );

        let attrs = BagAttributes::build(&mut rng, None, None, Some("only"), false)
            .unwrap()
            .unwrap();
        assert_eq!(attrs.local_key_id(), None);

        // A certificate digest does not need generating.
        let attrs = BagAttributes::build(&mut rng, Some(&CERT), None, None, false)
            .unwrap()
            .unwrap();
        assert_eq!(attrs.local_key_id(), Some(Sha1::digest(CERT).as_slice()));
    }

    #[test]
    fn test_invalid_hex() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        assert_eq!(
            BagAttributes::build(&mut rng, None, Some("xyz"), None, true),
            Err(crate::Error::LocalKeyId)
        );
    }

    #[test]
    fn test_encoding() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let attrs = BagAttributes::build(&mut rng, None, Some("01"), Some("A"), true)
            .unwrap()
            .unwrap();
        assert_eq!(
            attrs.to_der().unwrap(),
            hex!(
                "3125"
                "3010 06092a864886f70d010915 3103 040101"
                "3011 06092a864886f70d010914 3104 1e020041"
            )
        );
    }

    #[test]
    fn test_set_of_order_follows_encoding() {
        // With a full digest id the friendlyName attribute is the shorter
        // encoding and sorts first.
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let attrs = BagAttributes::build(&mut rng, Some(&CERT), None, Some("A"), true)
            .unwrap()
            .unwrap();
        let mut expected = hex!(
            "3138"
            "3011 06092a864886f70d010914 3104 1e020041"
            "3023 06092a864886f70d010915 3116 0414"
        )
        .to_vec();
        expected.extend_from_slice(&Sha1::digest(CERT));
        assert_eq!(attrs.to_der().unwrap(), expected);
    }
}
