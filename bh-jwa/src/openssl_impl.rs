// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use bherror::{traits::ForeignError as _, Error, Result};
use openssl::{
    bn::BigNum,
    ec::EcKeyRef,
    ecdsa::EcdsaSig,
    hash::MessageDigest,
    memcmp,
    pkey::{HasPublic, PKey, PKeyRef, Private, Public},
    rsa::Padding,
    sign::{RsaPssSaltlen, Signer as OpensslSigner, Verifier as OpensslVerifier},
};

use crate::{
    error::CryptoError, utils, BoxError, DigestAlgorithm, KeyRole, SignatureVerifier, Signer,
    SigningAlgorithm,
};

fn message_digest(digest: DigestAlgorithm) -> MessageDigest {
    match digest {
        DigestAlgorithm::Sha256 => MessageDigest::sha256(),
        DigestAlgorithm::Sha384 => MessageDigest::sha384(),
        DigestAlgorithm::Sha512 => MessageDigest::sha512(),
    }
}

fn decode_key_text(key: &str) -> Result<Vec<u8>, CryptoError> {
    utils::base64_decode(key).foreign_err(|| CryptoError::InvalidKeyEncoding)
}

/// One side of an asymmetric key pair, decoded from its base64 key text:
/// PKCS#8 DER for the private side, X.509 `SubjectPublicKeyInfo` DER for the
/// public one.
#[derive(Debug)]
enum AsymmetricKey {
    Private(PKey<Private>),
    Public(PKey<Public>),
}

impl AsymmetricKey {
    fn from_encoded(key: &str, role: KeyRole) -> Result<Self, CryptoError> {
        let der = decode_key_text(key)?;
        match role {
            KeyRole::Private => PKey::private_key_from_pkcs8(&der)
                .foreign_err(|| CryptoError::InvalidKeyEncoding)
                .map(Self::Private),
            KeyRole::Public => PKey::public_key_from_der(&der)
                .foreign_err(|| CryptoError::InvalidKeyEncoding)
                .map(Self::Public),
            // Unreachable through `KeyRole::resolve`, which never maps an
            // asymmetric family to the secret role.
            KeyRole::Secret => Err(Error::root(CryptoError::KeyRoleMismatch("asymmetric"))),
        }
    }

    fn private(&self) -> Result<&PKeyRef<Private>, CryptoError> {
        match self {
            Self::Private(key) => Ok(key),
            Self::Public(_) => Err(Error::root(CryptoError::KeyRoleMismatch("private"))),
        }
    }

    fn public(&self) -> Result<&PKeyRef<Public>, CryptoError> {
        match self {
            Self::Public(key) => Ok(key),
            Self::Private(_) => Err(Error::root(CryptoError::KeyRoleMismatch("public"))),
        }
    }
}

/// [`openssl`] backed signer/verifier with one strategy per algorithm family.
///
/// An engine is the transient signing context of a single operation: it is
/// constructed from the algorithm, the encoded key text and the [`KeyRole`]
/// resolved for the direction of the call, used once, and dropped. Nothing is
/// cached across calls, since key material may differ per call.
#[derive(Debug)]
pub enum SignatureEngine {
    /// Keyed-hash strategy for the `HS*` algorithms.
    Hmac(HmacStrategy),
    /// RSASSA-PKCS1-v1_5 strategy for the `RS*` algorithms.
    RsaPkcs1(RsaPkcs1Strategy),
    /// ECDSA strategy for the `ES*` algorithms.
    Ecdsa(EcdsaStrategy),
    /// RSASSA-PSS strategy for the `PS*` algorithms.
    RsaPss(RsaPssStrategy),
}

impl SignatureEngine {
    /// Build the strategy for `algorithm` over the given encoded key text.
    ///
    /// The `role` determines how the key text is decoded: the shared secret
    /// and private keys can sign, public keys can only verify. Malformed key
    /// text fails here with [`CryptoError::InvalidKeyEncoding`] rather than
    /// surfacing as a signature mismatch later.
    pub fn new(algorithm: SigningAlgorithm, key: &str, role: KeyRole) -> Result<Self, CryptoError> {
        match algorithm {
            SigningAlgorithm::Hs256 | SigningAlgorithm::Hs384 | SigningAlgorithm::Hs512 => {
                Ok(Self::Hmac(HmacStrategy::new(algorithm, key)?))
            }
            SigningAlgorithm::Rs256 | SigningAlgorithm::Rs384 | SigningAlgorithm::Rs512 => Ok(
                Self::RsaPkcs1(RsaPkcs1Strategy::new(algorithm, key, role)?),
            ),
            SigningAlgorithm::Es256 | SigningAlgorithm::Es384 | SigningAlgorithm::Es512 => {
                Ok(Self::Ecdsa(EcdsaStrategy::new(algorithm, key, role)?))
            }
            SigningAlgorithm::Ps256 | SigningAlgorithm::Ps384 | SigningAlgorithm::Ps512 => {
                Ok(Self::RsaPss(RsaPssStrategy::new(algorithm, key, role)?))
            }
        }
    }

    fn algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::Hmac(strategy) => strategy.algorithm,
            Self::RsaPkcs1(strategy) => strategy.algorithm,
            Self::Ecdsa(strategy) => strategy.algorithm,
            Self::RsaPss(strategy) => strategy.algorithm,
        }
    }

    fn sign_bytes(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Hmac(strategy) => strategy.sign(message),
            Self::RsaPkcs1(strategy) => strategy.sign(message),
            Self::Ecdsa(strategy) => strategy.sign(message),
            Self::RsaPss(strategy) => strategy.sign(message),
        }
    }

    fn verify_bytes(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        match self {
            Self::Hmac(strategy) => strategy.verify(message, signature),
            Self::RsaPkcs1(strategy) => strategy.verify(message, signature),
            Self::Ecdsa(strategy) => strategy.verify(message, signature),
            Self::RsaPss(strategy) => strategy.verify(message, signature),
        }
    }
}

impl Signer for SignatureEngine {
    fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm()
    }

    fn sign(&self, message: &[u8]) -> std::result::Result<Vec<u8>, BoxError> {
        Ok(self.sign_bytes(message)?)
    }
}

impl SignatureVerifier for SignatureEngine {
    fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm()
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> std::result::Result<bool, BoxError> {
        Ok(self.verify_bytes(message, signature)?)
    }
}

/// Keyed-hash strategy for the HMAC family.
#[derive(Debug)]
pub struct HmacStrategy {
    algorithm: SigningAlgorithm,
    key: PKey<Private>,
}

impl HmacStrategy {
    fn new(algorithm: SigningAlgorithm, key: &str) -> Result<Self, CryptoError> {
        let secret = decode_key_text(key)?;
        let key = PKey::hmac(&secret).foreign_err(|| CryptoError::CryptoBackend)?;
        Ok(Self { algorithm, key })
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let md = message_digest(self.algorithm.digest());
        let mut signer =
            OpensslSigner::new(md, &self.key).foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .sign_oneshot_to_vec(message)
            .foreign_err(|| CryptoError::CryptoBackend)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let expected = self.sign(message)?;
        if expected.len() != signature.len() {
            return Ok(false);
        }
        // `memcmp::eq` is constant-time, so the comparison leaks nothing
        // about the expected MAC through timing.
        Ok(memcmp::eq(&expected, signature))
    }
}

/// RSASSA-PKCS1-v1_5 strategy.
#[derive(Debug)]
pub struct RsaPkcs1Strategy {
    algorithm: SigningAlgorithm,
    key: AsymmetricKey,
}

impl RsaPkcs1Strategy {
    fn new(algorithm: SigningAlgorithm, key: &str, role: KeyRole) -> Result<Self, CryptoError> {
        let key = AsymmetricKey::from_encoded(key, role)?;
        Ok(Self { algorithm, key })
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let md = message_digest(self.algorithm.digest());
        let mut signer = OpensslSigner::new(md, self.key.private()?)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .set_rsa_padding(Padding::PKCS1)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .sign_oneshot_to_vec(message)
            .foreign_err(|| CryptoError::CryptoBackend)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let md = message_digest(self.algorithm.digest());
        let mut verifier = OpensslVerifier::new(md, self.key.public()?)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        verifier
            .set_rsa_padding(Padding::PKCS1)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        // The backend reports undecodable signature bytes as an error; for
        // verification purposes that is simply a mismatch.
        Ok(verifier.verify_oneshot(signature, message).unwrap_or(false))
    }
}

/// ECDSA strategy.
///
/// Signatures are the JOSE raw `r || s` concatenation, each coordinate
/// zero-padded to the curve order size, rather than the DER form the backend
/// natively produces.
#[derive(Debug)]
pub struct EcdsaStrategy {
    algorithm: SigningAlgorithm,
    key: AsymmetricKey,
}

fn coordinate_size<T>(ec_key: &EcKeyRef<T>) -> usize
where
    T: HasPublic,
{
    ec_key.group().order_bits().div_ceil(8) as usize
}

impl EcdsaStrategy {
    fn new(algorithm: SigningAlgorithm, key: &str, role: KeyRole) -> Result<Self, CryptoError> {
        let key = AsymmetricKey::from_encoded(key, role)?;
        Ok(Self { algorithm, key })
    }

    fn digest(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let md = message_digest(self.algorithm.digest());
        openssl::hash::hash(md, message)
            .map(|digest| digest.to_vec())
            .foreign_err(|| CryptoError::CryptoBackend)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let ec_key = self
            .key
            .private()?
            .ec_key()
            .foreign_err(|| CryptoError::InvalidKeyEncoding)?;
        let digest = self.digest(message)?;
        let signature =
            EcdsaSig::sign(&digest, &ec_key).foreign_err(|| CryptoError::CryptoBackend)?;

        let size = coordinate_size(&ec_key);
        let mut jws = signature
            .r()
            .to_vec_padded(size as i32)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        let s = signature
            .s()
            .to_vec_padded(size as i32)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        jws.extend_from_slice(&s);
        Ok(jws)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let ec_key = self
            .key
            .public()?
            .ec_key()
            .foreign_err(|| CryptoError::InvalidKeyEncoding)?;

        let size = coordinate_size(&ec_key);
        if signature.len() != 2 * size {
            return Ok(false);
        }
        let (r, s) = signature.split_at(size);
        let Ok(r) = BigNum::from_slice(r) else {
            return Ok(false);
        };
        let Ok(s) = BigNum::from_slice(s) else {
            return Ok(false);
        };
        let Ok(ecdsa_sig) = EcdsaSig::from_private_components(r, s) else {
            return Ok(false);
        };

        let digest = self.digest(message)?;
        Ok(ecdsa_sig.verify(&digest, &ec_key).unwrap_or(false))
    }
}

/// RSASSA-PSS strategy.
///
/// The salt length equals the digest output length, per the RFC 8017
/// recommendation, and MGF1 is parameterized with the same digest as the
/// message.
#[derive(Debug)]
pub struct RsaPssStrategy {
    algorithm: SigningAlgorithm,
    key: AsymmetricKey,
}

impl RsaPssStrategy {
    fn new(algorithm: SigningAlgorithm, key: &str, role: KeyRole) -> Result<Self, CryptoError> {
        let key = AsymmetricKey::from_encoded(key, role)?;
        Ok(Self { algorithm, key })
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let md = message_digest(self.algorithm.digest());
        let mut signer = OpensslSigner::new(md, self.key.private()?)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .set_rsa_padding(Padding::PKCS1_PSS)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .set_rsa_mgf1_md(md)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        signer
            .sign_oneshot_to_vec(message)
            .foreign_err(|| CryptoError::CryptoBackend)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let md = message_digest(self.algorithm.digest());
        let mut verifier = OpensslVerifier::new(md, self.key.public()?)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        verifier
            .set_rsa_padding(Padding::PKCS1_PSS)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        verifier
            .set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        verifier
            .set_rsa_mgf1_md(md)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        Ok(verifier.verify_oneshot(signature, message).unwrap_or(false))
    }
}
