//! Minimal owned ASN.1 tree encoded with [`der`].
//!
//! PKCS#12 structures are assembled bottom-up as [`Asn1Node`] trees and
//! serialized once with [`Asn1Node::to_der`]. The tree carries no schema:
//! the constructors in [`crate::bags`], [`crate::key_bag`] and [`crate::mac`]
//! are responsible for producing well-formed PKCS#12 structures.
//!
//! [`Asn1Node`] implements [`der::Tagged`] and [`der::EncodeValue`], so
//! identifiers, lengths and integer contents are all written by `der`.

use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use der::{
    Decode, Encode, EncodeValue, FixedTag, Header, Length, Reader, SliceReader, SliceWriter, Tag,
    TagNumber, Tagged, Writer,
};

use crate::errors::Result;

/// Contents of an [`Asn1Node`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Body {
    /// Content octets, emitted as given.
    Content(Vec<u8>),
    /// Child nodes, encoded in order.
    Children(Vec<Asn1Node>),
}

/// A node of an ASN.1 tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asn1Node {
    tag: Tag,
    body: Body,
}

impl Asn1Node {
    /// Node with the given tag and content octets.
    pub fn primitive(tag: Tag, content: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            body: Body::Content(content.into()),
        }
    }

    /// Node with the given tag and children.
    ///
    /// The constructed bit of the encoding comes from `tag`.
    pub fn constructed(tag: Tag, children: Vec<Asn1Node>) -> Self {
        Self {
            tag,
            body: Body::Children(children),
        }
    }

    /// Primitive node holding the DER content octets of `value`.
    pub fn from_value<T: FixedTag + EncodeValue>(value: &T) -> Result<Self> {
        let mut content = vec![0u8; usize::try_from(value.value_len()?)?];
        let mut writer = SliceWriter::new(&mut content);
        value.encode_value(&mut writer)?;
        writer.finish()?;
        Ok(Self::primitive(T::TAG, content))
    }

    /// `SEQUENCE` of the given children.
    pub fn sequence(children: Vec<Asn1Node>) -> Self {
        Self::constructed(Tag::Sequence, children)
    }

    /// `SET` of the given children.
    ///
    /// Children are encoded in the order given; callers building a `SET OF`
    /// with more than one element are responsible for DER ordering.
    pub fn set(children: Vec<Asn1Node>) -> Self {
        Self::constructed(Tag::Set, children)
    }

    /// `SET OF` the given children, sorted by their DER encodings.
    pub fn set_of(children: Vec<Asn1Node>) -> Result<Self> {
        let mut keyed = children
            .into_iter()
            .map(|child| Ok((child.to_der()?, child)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(Self::set(keyed.into_iter().map(|(_, child)| child).collect()))
    }

    /// Explicitly tagged `[number]` wrapper around `inner`.
    pub fn explicit(number: TagNumber, inner: Asn1Node) -> Self {
        Self::constructed(
            Tag::ContextSpecific {
                constructed: true,
                number,
            },
            vec![inner],
        )
    }

    /// `OCTET STRING`
    pub fn octet_string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::primitive(Tag::OctetString, bytes)
    }

    /// `NULL`
    pub fn null() -> Self {
        Self::primitive(Tag::Null, Vec::new())
    }

    /// `OBJECT IDENTIFIER`
    pub fn oid(oid: &ObjectIdentifier) -> Self {
        Self::primitive(Tag::ObjectIdentifier, oid.as_bytes())
    }

    /// `INTEGER` holding a signed value.
    pub fn integer(value: i64) -> Result<Self> {
        Self::from_value(&value)
    }

    /// `BMPString` (big-endian UTF-16, no terminator).
    ///
    /// Characters outside the Basic Multilingual Plane become surrogate
    /// pairs.
    pub fn bmp_string(s: &str) -> Self {
        let content: Vec<u8> = s.encode_utf16().flat_map(u16::to_be_bytes).collect();
        Self::primitive(Tag::BmpString, content)
    }

    /// Node contents.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Content octets, unless the node holds children.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Content(bytes) => Some(bytes),
            Body::Children(_) => None,
        }
    }

    /// Children, if the node was built or parsed as a tree.
    pub fn children(&self) -> Option<&[Asn1Node]> {
        match &self.body {
            Body::Content(_) => None,
            Body::Children(children) => Some(children),
        }
    }

    /// Serialize to DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(Encode::to_der(self)?)
    }

    /// Parse exactly one DER-encoded value into a tree.
    ///
    /// Constructed values are parsed recursively; trailing data after the
    /// value is rejected.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let mut reader = SliceReader::new(bytes)?;
        let node = Self::decode_one(&mut reader)?;
        reader.finish(())?;
        Ok(node)
    }

    /// Parse exactly one DER-encoded value without looking inside it.
    ///
    /// Only the outer tag and length are checked. The content octets are
    /// kept as given, so the node encodes back to `bytes` whatever types
    /// appear nested inside.
    pub fn from_tlv(bytes: &[u8]) -> Result<Self> {
        let mut reader = SliceReader::new(bytes)?;
        let header = Header::decode(&mut reader)?;
        let content = reader.read_slice(header.length)?;
        reader.finish(())?;
        Ok(Self::primitive(header.tag, content))
    }

    fn decode_one(reader: &mut SliceReader<'_>) -> Result<Self> {
        let header = Header::decode(reader)?;
        let content = reader.read_slice(header.length)?;

        if header.tag.is_constructed() {
            let mut inner = SliceReader::new(content)?;
            let mut children = Vec::new();
            while !inner.is_finished() {
                children.push(Self::decode_one(&mut inner)?);
            }
            Ok(Self::constructed(header.tag, children))
        } else {
            Ok(Self::primitive(header.tag, content))
        }
    }
}

impl Tagged for Asn1Node {
    fn tag(&self) -> Tag {
        self.tag
    }
}

impl EncodeValue for Asn1Node {
    fn value_len(&self) -> der::Result<Length> {
        match &self.body {
            Body::Content(bytes) => Length::try_from(bytes.len()),
            Body::Children(children) => children
                .iter()
                .try_fold(Length::ZERO, |len, child| len + child.encoded_len()?),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        match &self.body {
            Body::Content(bytes) => writer.write(bytes),
            Body::Children(children) => {
                for child in children {
                    child.encode(writer)?;
                }
                Ok(())
            }
        }
    }
}
