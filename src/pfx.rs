//! AuthenticatedSafe and PFX assembly.
//!
//! ```text
//! PFX ::= SEQUENCE {
//!     version     INTEGER {v3(3)}(v3,...),
//!     authSafe    ContentInfo,
//!     macData     MacData OPTIONAL
//! }
//!
//! AuthenticatedSafe ::= SEQUENCE OF ContentInfo
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use base64ct::{Base64, Encoding};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::asn1::Asn1Node;
use crate::attributes::BagAttributes;
use crate::bags::{build_cert_bags, ContentInfo};
use crate::errors::Result;
use crate::key_bag::protect_key;
use crate::mac::MacData;
use crate::options::Pkcs12Options;
use crate::pem::decode_certificate_chain;
use crate::traits::ToAsn1;

/// PFX syntax version.
pub const PFX_VERSION: i64 = 3;

/// `AuthenticatedSafe` holding `content_infos` in order.
pub fn auth_safe(content_infos: &[ContentInfo]) -> Result<Asn1Node> {
    let content_infos = content_infos
        .iter()
        .map(ToAsn1::to_asn1)
        .collect::<Result<Vec<_>>>()?;
    Ok(Asn1Node::sequence(content_infos))
}

/// Top-level `PFX` around the DER of `auth_safe`, sealed with `mac_data`
/// when given.
pub fn pfx(auth_safe: &Asn1Node, mac_data: Option<&MacData>) -> Result<Asn1Node> {
    let mut fields = vec![
        Asn1Node::integer(PFX_VERSION)?,
        ContentInfo::data(auth_safe)?.to_asn1()?,
    ];
    if let Some(mac_data) = mac_data {
        fields.push(mac_data.to_asn1()?);
    }
    Ok(Asn1Node::sequence(fields))
}

/// DER-encoded PKCS#12 bundle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pfx(Vec<u8>);

impl Pfx {
    /// Media type for serving a bundle as a download.
    pub const MIME_TYPE: &'static str = "application/x-pkcs12";

    /// Conventional file extension, without the dot.
    pub const FILE_EXTENSION: &'static str = "p12";

    /// DER bytes of the bundle.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the bundle, returning its DER bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Standard (padded) base64 of the DER bytes.
    pub fn to_base64(&self) -> String {
        Base64::encode_string(&self.0)
    }
}

impl AsRef<[u8]> for Pfx {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Pfx> for Vec<u8> {
    fn from(pfx: Pfx) -> Vec<u8> {
        pfx.into_bytes()
    }
}

/// Assembles PKCS#12 bundles from a private key and a PEM certificate chain.
///
/// # Example
///
/// ```no_run
/// use pfx_builder::{EncryptionAlgorithm, Pkcs12Builder, Pkcs12Options};
///
/// # fn run(key_der: &[u8], chain_pem: &str) -> pfx_builder::Result<()> {
/// let mut rng = rand::thread_rng(); // rand@0.8
/// let options = Pkcs12Options::new()
///     .with_algorithm(EncryptionAlgorithm::Aes256)
///     .with_friendly_name("server");
/// let pfx = Pkcs12Builder::new(options).build(
///     &mut rng,
///     key_der,
///     chain_pem,
///     Some("correct horse battery staple"),
/// )?;
/// std::fs::write("server.p12", pfx.as_bytes()).unwrap();
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pkcs12Builder {
    options: Pkcs12Options,
}

impl Pkcs12Builder {
    /// Builder using `options`.
    pub fn new(options: Pkcs12Options) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &Pkcs12Options {
        &self.options
    }

    /// Assemble a bundle from a DER PKCS#8 `private_key_der` and the
    /// certificates in `cert_chain_pem`, leaf first.
    ///
    /// The password policy is enforced before anything is drawn from `rng`.
    /// A chain without any `CERTIFICATE` block yields a key-only bundle.
    pub fn build<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        private_key_der: &[u8],
        cert_chain_pem: &str,
        password: Option<&str>,
    ) -> Result<Pfx> {
        let options = &self.options;
        options.check_password(password)?;
        options.validate()?;

        let chain = decode_certificate_chain(cert_chain_pem)?;
        log::debug!(
            "building PKCS#12 bundle: {} certificate(s), {}",
            chain.len(),
            if password.is_some() {
                options.algorithm.as_str()
            } else {
                "unencrypted key"
            }
        );

        let attrs = BagAttributes::build(
            rng,
            chain.first().map(Vec::as_slice),
            options.local_key_id.as_deref(),
            options.friendly_name.as_deref(),
            options.generate_local_key_id,
        )?;

        let mut content_infos = Vec::with_capacity(2);
        if let Some(certs) = build_cert_bags(&chain, attrs.as_ref())? {
            content_infos.push(certs);
        }
        content_infos.push(protect_key(
            rng,
            private_key_der,
            password,
            options,
            attrs.as_ref(),
        )?);

        let auth_safe = auth_safe(&content_infos)?;
        let mac_data = if options.use_mac {
            log::trace!("sealing bundle with MAC");
            let auth_safe_der = auth_safe.to_der()?;
            Some(MacData::compute(
                rng,
                &auth_safe_der,
                password,
                options.salt_size,
                options.iterations,
            )?)
        } else {
            log::debug!("MAC disabled");
            None
        };

        let der = pfx(&auth_safe, mac_data.as_ref())?.to_der()?;
        log::trace!("PKCS#12 bundle is {} bytes", der.len());
        Ok(Pfx(der))
    }

    /// Like [`Pkcs12Builder::build`], with the private key given as base64 DER.
    pub fn build_from_base64_key<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        private_key_base64: &str,
        cert_chain_pem: &str,
        password: Option<&str>,
    ) -> Result<Pfx> {
        self.options.check_password(password)?;
        let key = Zeroizing::new(Base64::decode_vec(private_key_base64.trim())?);
        self.build(rng, &key, cert_chain_pem, password)
    }

    /// Like [`Pkcs12Builder::build_from_base64_key`], returning the bundle
    /// as base64.
    pub fn build_base64<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        private_key_base64: &str,
        cert_chain_pem: &str,
        password: Option<&str>,
    ) -> Result<String> {
        self.build_from_base64_key(rng, private_key_base64, cert_chain_pem, password)
            .map(|pfx| pfx.to_base64())
    }

    /// [`Pkcs12Builder::build`] drawing randomness from the operating system.
    #[cfg(feature = "getrandom")]
    pub fn build_with_os_rng(
        &self,
        private_key_der: &[u8],
        cert_chain_pem: &str,
        password: Option<&str>,
    ) -> Result<Pfx> {
        self.build(
            &mut rand_core::OsRng,
            private_key_der,
            cert_chain_pem,
            password,
        )
    }
}
