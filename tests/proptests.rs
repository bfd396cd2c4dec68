//! Property-based tests.

use base64ct::{Base64, Encoding};
use der::{Decode, Encode, Length};
use hex_literal::hex;
use pfx_builder::{
    pem::{decode_certificate_chain, split_certificate_chain},
    Asn1Node, EncryptionAlgorithm, Pkcs12Builder, Pkcs12Options,
};
use proptest::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

const KEY: [u8; 48] = hex!(
    "302e020100300506032b657004220420"
    "d4ee72dbf913584ad5b6d8f1f769f8ad3afe7c28cbf1d4fbe097a88f44755842"
);

fn algorithm() -> impl Strategy<Value = EncryptionAlgorithm> {
    prop_oneof![
        Just(EncryptionAlgorithm::TripleDes),
        Just(EncryptionAlgorithm::Aes128),
        Just(EncryptionAlgorithm::Aes192),
        Just(EncryptionAlgorithm::Aes256),
    ]
}

fn to_pem(certs: &[Vec<u8>], separator: &str) -> String {
    certs
        .iter()
        .map(|der| {
            format!(
                "-----BEGIN CERTIFICATE-----\n{}\n-----END CERTIFICATE-----",
                Base64::encode_string(der)
            )
        })
        .collect::<Vec<_>>()
        .join(separator)
}

proptest! {
    #[test]
    fn integer_matches_der(value in any::<i64>()) {
        let encoded = Asn1Node::integer(value).unwrap().to_der().unwrap();
        prop_assert_eq!(i64::from_der(&encoded).unwrap(), value);
    }

    #[test]
    fn octet_string_parses_back(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let node = Asn1Node::octet_string(bytes.clone());
        let der = node.to_der().unwrap();
        prop_assert_eq!(Length::try_from(der.len()).unwrap(), node.encoded_len().unwrap());
        let parsed = der::asn1::OctetString::from_der(&der).unwrap();
        prop_assert_eq!(parsed.as_bytes(), &bytes[..]);
    }

    #[test]
    fn pem_chain_preserves_order(
        bodies in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..64), 0..5),
        separator in "[ \t\r\n]{0,4}",
    ) {
        let pem = to_pem(&bodies, &separator);
        prop_assert_eq!(split_certificate_chain(&pem).len(), bodies.len());
        prop_assert_eq!(decode_certificate_chain(&pem).unwrap(), bodies);
    }

    #[test]
    fn bundle_parses_for_any_password(
        seed in any::<[u8; 32]>(),
        alg in algorithm(),
        password in "[a-zA-Z0-9 äöüß€\u{1F40E}\u{1D11E}\u{20000}]{12,24}",
    ) {
        let mut rng = ChaCha8Rng::from_seed(seed);
        let options = Pkcs12Options::new().with_algorithm(alg).with_iterations(1);
        let pfx = Pkcs12Builder::new(options)
            .build(&mut rng, &KEY, "", Some(&password))
            .unwrap();

        let root = Asn1Node::from_der(pfx.as_bytes()).unwrap();
        prop_assert_eq!(root.to_der().unwrap(), pfx.as_bytes());
        prop_assert_eq!(&root.children().unwrap()[0], &Asn1Node::integer(3).unwrap());
    }
}
