//! Private key bag: plain `keyBag` or password-shrouded `pkcs8ShroudedKeyBag`.
//!
//! ```text
//! EncryptedPrivateKeyInfo ::= SEQUENCE {
//!     encryptionAlgorithm  AlgorithmIdentifier,
//!     encryptedData        OCTET STRING
//! }
//!
//! pkcs-12PbeParams ::= SEQUENCE {
//!     salt        OCTET STRING,
//!     iterations  INTEGER
//! }
//! ```
//!
//! The AES variants use PBES2 ([RFC 8018 § 6.2]) instead of `pkcs-12PbeParams`.
//!
//! [RFC 8018 § 6.2]: https://datatracker.ietf.org/doc/html/rfc8018#section-6.2

use alloc::vec::Vec;
use der::{asn1::AnyRef, Decode};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::cbc::{decrypt_cbc, encrypt_cbc};
use crate::algorithms::kdf::{derive_pbkdf2_key, derive_pkcs12_key, KeyPurpose};
use crate::algorithms::{EncryptionAlgorithm, Pbkdf2Prf};
use crate::asn1::Asn1Node;
use crate::attributes::BagAttributes;
use crate::bags::{ContentInfo, SafeBag};
use crate::errors::Result;
use crate::oids;
use crate::options::Pkcs12Options;
use crate::traits::ToAsn1;

/// Parameters of the password-based encryption scheme, as encoded in the
/// `AlgorithmIdentifier` of an [`EncryptedPrivateKeyInfo`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PbeParameters {
    /// `pbeWithSHAAnd3-KeyTripleDES-CBC` keyed by the PKCS#12 KDF.
    Pkcs12TripleDes {
        /// KDF salt.
        salt: Vec<u8>,
        /// KDF iteration count.
        iterations: u32,
    },
    /// PBES2 with PBKDF2 and AES-CBC.
    Pbes2 {
        /// AES key size.
        algorithm: EncryptionAlgorithm,
        /// PBKDF2 PRF.
        prf: Pbkdf2Prf,
        /// PBKDF2 salt.
        salt: Vec<u8>,
        /// PBKDF2 iteration count.
        iterations: u32,
        /// CBC initialization vector.
        iv: Vec<u8>,
    },
}

impl PbeParameters {
    /// Draw fresh salt (and IV, for PBES2) from `rng`.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R, options: &Pkcs12Options) -> Self {
        let mut salt = vec![0u8; options.salt_size];
        rng.fill_bytes(&mut salt);

        match options.algorithm {
            EncryptionAlgorithm::TripleDes => PbeParameters::Pkcs12TripleDes {
                salt,
                iterations: options.iterations,
            },
            algorithm => {
                let mut iv = vec![0u8; algorithm.iv_len()];
                rng.fill_bytes(&mut iv);
                PbeParameters::Pbes2 {
                    algorithm,
                    prf: options.prf,
                    salt,
                    iterations: options.iterations,
                    iv,
                }
            }
        }
    }

    /// Cipher the parameters drive.
    pub fn algorithm(&self) -> EncryptionAlgorithm {
        match self {
            PbeParameters::Pkcs12TripleDes { .. } => EncryptionAlgorithm::TripleDes,
            PbeParameters::Pbes2 { algorithm, .. } => *algorithm,
        }
    }

    /// Derive the cipher key and IV from `password`.
    fn key_and_iv(&self, password: &str) -> Result<(Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>)> {
        match self {
            PbeParameters::Pkcs12TripleDes { salt, iterations } => {
                let alg = EncryptionAlgorithm::TripleDes;
                let key = derive_pkcs12_key(
                    Some(password),
                    salt,
                    *iterations,
                    KeyPurpose::Encryption,
                    alg.key_len(),
                )?;
                let iv = derive_pkcs12_key(
                    Some(password),
                    salt,
                    *iterations,
                    KeyPurpose::Iv,
                    alg.iv_len(),
                )?;
                Ok((key, iv))
            }
            PbeParameters::Pbes2 {
                algorithm,
                prf,
                salt,
                iterations,
                iv,
            } => {
                let key =
                    derive_pbkdf2_key(password, salt, *iterations, *prf, algorithm.key_len())?;
                Ok((key, Zeroizing::new(iv.clone())))
            }
        }
    }

    /// Encrypt `plaintext` under a key derived from `password`.
    pub fn encrypt(&self, password: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let (key, iv) = self.key_and_iv(password)?;
        encrypt_cbc(self.algorithm(), &key, &iv, plaintext)
    }

    /// Decrypt `ciphertext` produced by [`PbeParameters::encrypt`].
    pub fn decrypt(&self, password: &str, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let (key, iv) = self.key_and_iv(password)?;
        decrypt_cbc(self.algorithm(), &key, &iv, ciphertext).map(Zeroizing::new)
    }

    fn iterations_node(iterations: u32) -> Result<Asn1Node> {
        Asn1Node::integer(i64::from(iterations))
    }
}

impl ToAsn1 for PbeParameters {
    /// The full `AlgorithmIdentifier`.
    fn to_asn1(&self) -> Result<Asn1Node> {
        match self {
            PbeParameters::Pkcs12TripleDes { salt, iterations } => Ok(Asn1Node::sequence(vec![
                Asn1Node::oid(&oids::PBE_WITH_SHA_AND_3_KEY_TRIPLE_DES_CBC),
                Asn1Node::sequence(vec![
                    Asn1Node::octet_string(salt.clone()),
                    Self::iterations_node(*iterations)?,
                ]),
            ])),
            PbeParameters::Pbes2 {
                algorithm,
                prf,
                salt,
                iterations,
                iv,
            } => {
                let mut kdf_params = vec![
                    Asn1Node::octet_string(salt.clone()),
                    Self::iterations_node(*iterations)?,
                    Asn1Node::integer(algorithm.key_len() as i64)?,
                ];
                if !prf.is_default() {
                    kdf_params.push(Asn1Node::sequence(vec![
                        Asn1Node::oid(&prf.oid()),
                        Asn1Node::null(),
                    ]));
                }

                Ok(Asn1Node::sequence(vec![
                    Asn1Node::oid(&oids::PBES2),
                    Asn1Node::sequence(vec![
                        Asn1Node::sequence(vec![
                            Asn1Node::oid(&oids::PBKDF2),
                            Asn1Node::sequence(kdf_params),
                        ]),
                        Asn1Node::sequence(vec![
                            Asn1Node::oid(&algorithm.oid()),
                            Asn1Node::octet_string(iv.clone()),
                        ]),
                    ]),
                ]))
            }
        }
    }
}

/// PKCS#8 `EncryptedPrivateKeyInfo`, the value of a `pkcs8ShroudedKeyBag`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncryptedPrivateKeyInfo {
    params: PbeParameters,
    ciphertext: Vec<u8>,
}

impl EncryptedPrivateKeyInfo {
    /// Encrypt the DER `PrivateKeyInfo` with `params` and `password`.
    pub fn encrypt(params: PbeParameters, password: &str, private_key_der: &[u8]) -> Result<Self> {
        let ciphertext = params.encrypt(password, private_key_der)?;
        Ok(Self { params, ciphertext })
    }

    /// Recover the DER `PrivateKeyInfo`.
    pub fn decrypt(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        self.params.decrypt(password, &self.ciphertext)
    }

    /// Encryption scheme parameters.
    pub fn params(&self) -> &PbeParameters {
        &self.params
    }

    /// Encrypted `PrivateKeyInfo`.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl ToAsn1 for EncryptedPrivateKeyInfo {
    fn to_asn1(&self) -> Result<Asn1Node> {
        Ok(Asn1Node::sequence(vec![
            self.params.to_asn1()?,
            Asn1Node::octet_string(self.ciphertext.clone()),
        ]))
    }
}

/// Check that `private_key_der` is one DER value holding a PKCS#8
/// `PrivateKeyInfo`. The bytes themselves are embedded unchanged.
fn check_private_key(private_key_der: &[u8]) -> Result<()> {
    AnyRef::from_der(private_key_der)?;
    pkcs8::PrivateKeyInfo::try_from(private_key_der)?;
    Ok(())
}

/// Build the key `SafeBag`.
///
/// Without a password the `PrivateKeyInfo` goes into a plain `keyBag`.
/// Otherwise a fresh salt (and, for AES, IV) is drawn from `rng` and the key
/// is encrypted into a `pkcs8ShroudedKeyBag`.
pub fn key_safe_bag<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    private_key_der: &[u8],
    password: Option<&str>,
    options: &Pkcs12Options,
    attrs: Option<&BagAttributes>,
) -> Result<SafeBag> {
    check_private_key(private_key_der)?;

    let Some(password) = password else {
        log::debug!("embedding private key unencrypted");
        let key = Asn1Node::from_tlv(private_key_der)?;
        return Ok(SafeBag::new(oids::KEY_BAG, key, attrs.cloned()));
    };

    options.validate()?;
    log::debug!("shrouding private key with {}", options.algorithm);

    let params = PbeParameters::generate(rng, options);
    let encrypted = EncryptedPrivateKeyInfo::encrypt(params, password, private_key_der)?;
    Ok(SafeBag::new(
        oids::PKCS8_SHROUDED_KEY_BAG,
        encrypted.to_asn1()?,
        attrs.cloned(),
    ))
}

/// Build the key `ContentInfo`: a SafeContents holding the single key bag
/// from [`key_safe_bag`].
pub fn protect_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    private_key_der: &[u8],
    password: Option<&str>,
    options: &Pkcs12Options,
    attrs: Option<&BagAttributes>,
) -> Result<ContentInfo> {
    let bag = key_safe_bag(rng, private_key_der, password, options, attrs)?;
    ContentInfo::safe_contents(&[bag])
}
