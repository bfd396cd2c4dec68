//! Trait definitions.

use alloc::vec::Vec;

use crate::asn1::Asn1Node;
use crate::errors::Result;

/// A PKCS#12 structure that can be lowered to an ASN.1 tree.
///
/// Every structure in the bundle (`CertBag`, `SafeBag`, `ContentInfo`,
/// `EncryptedPrivateKeyInfo`, `MacData`, ...) implements this, so the
/// schema for each one is written down in exactly one place.
pub trait ToAsn1 {
    /// Build the ASN.1 tree for this structure.
    fn to_asn1(&self) -> Result<Asn1Node>;

    /// Serialize this structure to DER.
    fn to_der(&self) -> Result<Vec<u8>> {
        self.to_asn1()?.to_der()
    }
}

impl ToAsn1 for Asn1Node {
    fn to_asn1(&self) -> Result<Asn1Node> {
        Ok(self.clone())
    }

    fn to_der(&self) -> Result<Vec<u8>> {
        Asn1Node::to_der(self)
    }
}
