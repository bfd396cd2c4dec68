//! Splitting PEM certificate chains.

use alloc::string::String;
use alloc::vec::Vec;
use base64ct::{Base64, Encoding};

use crate::errors::{Error, Result};

const BEGIN_CERTIFICATE: &str = "-----BEGIN CERTIFICATE-----";
const END_CERTIFICATE: &str = "-----END CERTIFICATE-----";

/// Ordered DER certificates, leaf first as supplied by the caller.
pub type CertificateChain = Vec<Vec<u8>>;

/// Extract the base64 bodies of every `CERTIFICATE` block in `pem_chain`,
/// in input order, with all whitespace removed.
///
/// Scanning stops as soon as either marker is missing from the remaining
/// text, so input without markers yields an empty list. The bodies are not
/// checked for valid base64.
pub fn split_certificate_chain(pem_chain: &str) -> Vec<String> {
    let mut certs = Vec::new();
    let mut remaining = pem_chain;

    loop {
        let (Some(begin), Some(end)) = (
            remaining.find(BEGIN_CERTIFICATE),
            remaining.find(END_CERTIFICATE),
        ) else {
            break;
        };

        let body_start = begin + BEGIN_CERTIFICATE.len();
        let body = remaining.get(body_start..end).unwrap_or_default();
        certs.push(body.chars().filter(|c| !c.is_whitespace()).collect());
        remaining = &remaining[end + END_CERTIFICATE.len()..];
    }

    certs
}

/// Split `pem_chain` and base64-decode every certificate body.
pub fn decode_certificate_chain(pem_chain: &str) -> Result<CertificateChain> {
    split_certificate_chain(pem_chain)
        .iter()
        .enumerate()
        .map(|(index, body)| {
            Base64::decode_vec(body).map_err(|_| Error::CertificateEncoding { index })
        })
        .collect()
}
