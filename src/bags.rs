//! SafeBags, SafeContents and `ContentInfo` wrappers.
//!
//! ```text
//! SafeBag ::= SEQUENCE {
//!     bagId          BAG-TYPE.&id ({PKCS12BagSet}),
//!     bagValue       [0] EXPLICIT BAG-TYPE.&Type({PKCS12BagSet}{@bagId}),
//!     bagAttributes  SET OF PKCS12Attribute OPTIONAL
//! }
//!
//! CertBag ::= SEQUENCE {
//!     certId    BAG-TYPE.&id   ({CertTypes}),
//!     certValue [0] EXPLICIT BAG-TYPE.&Type ({CertTypes}{@certId})
//! }
//! ```

use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use der::{asn1::AnyRef, Decode, TagNumber};

use crate::asn1::Asn1Node;
use crate::attributes::BagAttributes;
use crate::errors::{Error, Result};
use crate::oids;
use crate::traits::ToAsn1;

/// An X.509 certificate wrapped as a PKCS#12 `CertBag`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertBag {
    der: Vec<u8>,
}

impl CertBag {
    /// Wrap `der`, which must be exactly one DER value.
    ///
    /// Only the outer framing is checked. The bytes are embedded as given
    /// and their X.509 contents are not validated.
    pub fn new(der: &[u8]) -> Result<Self> {
        AnyRef::from_der(der)?;
        Ok(Self { der: der.to_vec() })
    }

    /// DER encoding of the wrapped certificate.
    pub fn certificate(&self) -> &[u8] {
        &self.der
    }
}

impl ToAsn1 for CertBag {
    fn to_asn1(&self) -> Result<Asn1Node> {
        Ok(Asn1Node::sequence(vec![
            Asn1Node::oid(&oids::X509_CERTIFICATE),
            Asn1Node::explicit(TagNumber::N0, Asn1Node::octet_string(self.der.clone())),
        ]))
    }
}

/// One typed item of a SafeContents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SafeBag {
    bag_id: ObjectIdentifier,
    value: Asn1Node,
    attributes: Option<BagAttributes>,
}

impl SafeBag {
    /// Bag with an arbitrary `bagId` and already-built value.
    pub fn new(
        bag_id: ObjectIdentifier,
        value: Asn1Node,
        attributes: Option<BagAttributes>,
    ) -> Self {
        Self {
            bag_id,
            value,
            attributes,
        }
    }

    /// `certBag` holding `cert`.
    pub fn cert(cert: &CertBag, attributes: Option<BagAttributes>) -> Result<Self> {
        Ok(Self::new(oids::CERT_BAG, cert.to_asn1()?, attributes))
    }

    /// `bagId` of this bag.
    pub fn bag_id(&self) -> ObjectIdentifier {
        self.bag_id
    }

    /// Attributes attached to this bag.
    pub fn attributes(&self) -> Option<&BagAttributes> {
        self.attributes.as_ref()
    }
}

impl ToAsn1 for SafeBag {
    fn to_asn1(&self) -> Result<Asn1Node> {
        let mut fields = vec![
            Asn1Node::oid(&self.bag_id),
            Asn1Node::explicit(TagNumber::N0, self.value.clone()),
        ];
        if let Some(attrs) = &self.attributes {
            fields.push(attrs.to_asn1()?);
        }
        Ok(Asn1Node::sequence(fields))
    }
}

/// PKCS#7 `ContentInfo` of type `data`, wrapping DER-encoded content in an
/// OCTET STRING.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentInfo {
    content: Vec<u8>,
}

impl ContentInfo {
    /// `ContentInfo{data}` around the DER encoding of `content`.
    pub fn data(content: &Asn1Node) -> Result<Self> {
        Ok(Self {
            content: content.to_der()?,
        })
    }

    /// `ContentInfo{data}` around a SafeContents holding `bags`.
    pub fn safe_contents(bags: &[SafeBag]) -> Result<Self> {
        let bags = bags
            .iter()
            .map(ToAsn1::to_asn1)
            .collect::<Result<Vec<_>>>()?;
        Self::data(&Asn1Node::sequence(bags))
    }

    /// The wrapped DER content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl ToAsn1 for ContentInfo {
    fn to_asn1(&self) -> Result<Asn1Node> {
        Ok(Asn1Node::sequence(vec![
            Asn1Node::oid(&oids::ID_DATA),
            Asn1Node::explicit(TagNumber::N0, Asn1Node::octet_string(self.content.clone())),
        ]))
    }
}

/// Build the certificate `ContentInfo` for `chain`.
///
/// Every certificate gets its own `certBag`, in chain order; only the first
/// one carries `attrs`. Returns `None` for an empty chain.
pub fn build_cert_bags(
    chain: &[Vec<u8>],
    attrs: Option<&BagAttributes>,
) -> Result<Option<ContentInfo>> {
    if chain.is_empty() {
        return Ok(None);
    }

    let bags = chain
        .iter()
        .enumerate()
        .map(|(index, der)| {
            let cert = CertBag::new(der).map_err(|_| Error::CertificateEncoding { index })?;
            let bag_attrs = if index == 0 { attrs.cloned() } else { None };
            SafeBag::cert(&cert, bag_attrs)
        })
        .collect::<Result<Vec<_>>>()?;

    log::trace!("built {} certificate bag(s)", bags.len());
    ContentInfo::safe_contents(&bags).map(Some)
}
