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

//! Generation of key material for the supported algorithm families.
//!
//! Keys travel through the API as base64 text over their platform-native
//! encodings: raw bytes for shared secrets, PKCS#8 DER for private keys and
//! X.509 `SubjectPublicKeyInfo` DER for public keys.

use bherror::{traits::ForeignError as _, Error, Result};
use openssl::{
    ec::{EcGroup, EcKey},
    nid::Nid,
    pkey::{PKey, Private},
    rsa::Rsa,
};

use crate::{error::CryptoError, utils, DigestAlgorithm, KeyFamily, SigningAlgorithm};

/// A shared secret for the HMAC family, as base64 text over raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey {
    encoded: String,
}

/// The private side of an asymmetric key pair, as base64 text over its
/// PKCS#8 DER encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    encoded: String,
}

/// The public side of an asymmetric key pair, as base64 text over its X.509
/// `SubjectPublicKeyInfo` DER encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    encoded: String,
}

/// An asymmetric key pair produced by [`generate_key_pair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl SecretKey {
    /// Wrap already-encoded secret key text.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// The base64 key text.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl PrivateKey {
    /// Wrap already-encoded private key text.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// The base64 key text.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl PublicKey {
    /// Wrap already-encoded public key text.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// The base64 key text.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl KeyPair {
    /// The private side of the pair.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The public side of the pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// RSA modulus sizes accepted by [`generate_key_pair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 2048-bit modulus.
    Low,
    /// 3072-bit modulus.
    Middle,
    /// 4096-bit modulus.
    High,
}

impl KeySize {
    /// The modulus size in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Low => 2048,
            Self::Middle => 3072,
            Self::High => 4096,
        }
    }
}

/// Generate a fresh random shared secret for an HMAC-family algorithm.
///
/// The secret is as long as the digest output of the algorithm. Asymmetric
/// algorithms fail with [`CryptoError::Unsupported`].
pub fn generate_secret_key(algorithm: SigningAlgorithm) -> Result<SecretKey, CryptoError> {
    if algorithm.key_family() != KeyFamily::Hmac {
        return Err(Error::root(CryptoError::Unsupported(format!(
            "{} does not use a shared secret",
            algorithm
        ))));
    }

    let mut secret = vec![0u8; algorithm.digest().output_size()];
    openssl::rand::rand_bytes(&mut secret).foreign_err(|| CryptoError::KeyGenerationFailed)?;

    Ok(SecretKey {
        encoded: utils::base64_encode(secret),
    })
}

/// Generate a fresh asymmetric key pair for an RSA or EC algorithm.
///
/// The `size` selects the RSA modulus; EC keys ignore it and use the curve
/// matching the algorithm (P-256, P-384 or P-521). HMAC algorithms fail with
/// [`CryptoError::Unsupported`].
pub fn generate_key_pair(algorithm: SigningAlgorithm, size: KeySize) -> Result<KeyPair, CryptoError> {
    let key = match algorithm.key_family() {
        KeyFamily::Rsa => {
            let rsa =
                Rsa::generate(size.bits()).foreign_err(|| CryptoError::KeyGenerationFailed)?;
            PKey::from_rsa(rsa).foreign_err(|| CryptoError::CryptoBackend)?
        }
        KeyFamily::Ec => {
            let group = EcGroup::from_curve_name(curve_nid(algorithm.digest()))
                .foreign_err(|| CryptoError::CryptoBackend)?;
            let ec_key =
                EcKey::generate(group.as_ref()).foreign_err(|| CryptoError::KeyGenerationFailed)?;
            PKey::from_ec_key(ec_key).foreign_err(|| CryptoError::CryptoBackend)?
        }
        KeyFamily::Hmac => {
            return Err(Error::root(CryptoError::Unsupported(format!(
                "{} uses a shared secret, not a key pair",
                algorithm
            ))))
        }
    };

    pair_from_pkey(key)
}

fn curve_nid(digest: DigestAlgorithm) -> Nid {
    match digest {
        // X9_62_PRIME256V1 is an alias for secp256r1, i.e. NIST P-256
        DigestAlgorithm::Sha256 => Nid::X9_62_PRIME256V1,
        DigestAlgorithm::Sha384 => Nid::SECP384R1,
        DigestAlgorithm::Sha512 => Nid::SECP521R1,
    }
}

fn pair_from_pkey(key: PKey<Private>) -> Result<KeyPair, CryptoError> {
    let private_der = key
        .private_key_to_pkcs8()
        .foreign_err(|| CryptoError::CryptoBackend)?;
    let public_der = key
        .public_key_to_der()
        .foreign_err(|| CryptoError::CryptoBackend)?;

    Ok(KeyPair {
        private_key: PrivateKey {
            encoded: utils::base64_encode(private_der),
        },
        public_key: PublicKey {
            encoded: utils::base64_encode(public_der),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_key_has_digest_length() {
        for (algorithm, expected_len) in [
            (SigningAlgorithm::Hs256, 32),
            (SigningAlgorithm::Hs384, 48),
            (SigningAlgorithm::Hs512, 64),
        ] {
            let secret = generate_secret_key(algorithm).unwrap();
            let raw = utils::base64_decode(secret.encoded()).unwrap();
            assert_eq!(raw.len(), expected_len);
        }
    }

    #[test]
    fn secret_key_rejects_asymmetric_algorithms() {
        let error = generate_secret_key(SigningAlgorithm::Rs256).unwrap_err();
        assert!(matches!(error.error, CryptoError::Unsupported(_)));
    }

    #[test]
    fn key_pair_rejects_hmac_algorithms() {
        let error = generate_key_pair(SigningAlgorithm::Hs256, KeySize::Low).unwrap_err();
        assert!(matches!(error.error, CryptoError::Unsupported(_)));
    }

    #[test]
    fn rsa_key_pair_encodings_decode() {
        let pair = generate_key_pair(SigningAlgorithm::Rs256, KeySize::Low).unwrap();

        let private_der = utils::base64_decode(pair.private_key().encoded()).unwrap();
        PKey::private_key_from_pkcs8(&private_der).unwrap();

        let public_der = utils::base64_decode(pair.public_key().encoded()).unwrap();
        PKey::public_key_from_der(&public_der).unwrap();
    }

    #[test]
    fn ec_key_pair_uses_matching_curve() {
        for (algorithm, nid) in [
            (SigningAlgorithm::Es256, Nid::X9_62_PRIME256V1),
            (SigningAlgorithm::Es384, Nid::SECP384R1),
            (SigningAlgorithm::Es512, Nid::SECP521R1),
        ] {
            let pair = generate_key_pair(algorithm, KeySize::Low).unwrap();

            let private_der = utils::base64_decode(pair.private_key().encoded()).unwrap();
            let key = PKey::private_key_from_pkcs8(&private_der).unwrap();
            let curve = key.ec_key().unwrap().group().curve_name().unwrap();
            assert_eq!(curve, nid);
        }
    }
}
