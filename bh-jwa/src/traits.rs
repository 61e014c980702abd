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

use std::str::FromStr;

use bherror::Error;
use serde::{Deserialize, Serialize};

use crate::{error::SignatureError, utils::BoxError};

/// JWA digital signature algorithms supported for signing and verifying
/// tokens.
///
/// # Algorithms
///
/// This enumeration contains the twelve JOSE digital signature algorithms
/// specified in [RFC7518, section 3.1], three per family: HMAC with SHA-2,
/// RSASSA-PKCS1-v1_5, ECDSA and RSASSA-PSS.
///
/// The set is closed and never constructed dynamically; every dispatch over
/// it is exhaustive, so extending it is a compile-time-checked change.
///
/// [RFC7518, section 3.1]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningAlgorithm {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// RSASSA-PSS with SHA-256 and MGF1 with SHA-256
    Ps256,
    /// RSASSA-PSS with SHA-384 and MGF1 with SHA-384
    Ps384,
    /// RSASSA-PSS with SHA-512 and MGF1 with SHA-512
    Ps512,
}

/// JWS `"alg"` header parameter value for **HMAC using SHA-256**.
pub const SIGNING_ALG_HS256: &str = "HS256";
/// JWS `"alg"` header parameter value for **HMAC using SHA-384**.
pub const SIGNING_ALG_HS384: &str = "HS384";
/// JWS `"alg"` header parameter value for **HMAC using SHA-512**.
pub const SIGNING_ALG_HS512: &str = "HS512";
/// JWS `"alg"` header parameter value for **RSASSA-PKCS1-v1_5 using SHA-256**.
pub const SIGNING_ALG_RS256: &str = "RS256";
/// JWS `"alg"` header parameter value for **RSASSA-PKCS1-v1_5 using SHA-384**.
pub const SIGNING_ALG_RS384: &str = "RS384";
/// JWS `"alg"` header parameter value for **RSASSA-PKCS1-v1_5 using SHA-512**.
pub const SIGNING_ALG_RS512: &str = "RS512";
/// JWS `"alg"` header parameter value for **ECDSA using P-256 and SHA-256**.
pub const SIGNING_ALG_ES256: &str = "ES256";
/// JWS `"alg"` header parameter value for **ECDSA using P-384 and SHA-384**.
pub const SIGNING_ALG_ES384: &str = "ES384";
/// JWS `"alg"` header parameter value for **ECDSA using P-521 and SHA-512**.
pub const SIGNING_ALG_ES512: &str = "ES512";
/// JWS `"alg"` header parameter value for **RSASSA-PSS using SHA-256 and MGF1 with SHA-256**.
pub const SIGNING_ALG_PS256: &str = "PS256";
/// JWS `"alg"` header parameter value for **RSASSA-PSS using SHA-384 and MGF1 with SHA-384**.
pub const SIGNING_ALG_PS384: &str = "PS384";
/// JWS `"alg"` header parameter value for **RSASSA-PSS using SHA-512 and MGF1 with SHA-512**.
pub const SIGNING_ALG_PS512: &str = "PS512";

impl FromStr for SigningAlgorithm {
    type Err = Error<SignatureError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SIGNING_ALG_HS256 => Ok(SigningAlgorithm::Hs256),
            SIGNING_ALG_HS384 => Ok(SigningAlgorithm::Hs384),
            SIGNING_ALG_HS512 => Ok(SigningAlgorithm::Hs512),
            SIGNING_ALG_RS256 => Ok(SigningAlgorithm::Rs256),
            SIGNING_ALG_RS384 => Ok(SigningAlgorithm::Rs384),
            SIGNING_ALG_RS512 => Ok(SigningAlgorithm::Rs512),
            SIGNING_ALG_ES256 => Ok(SigningAlgorithm::Es256),
            SIGNING_ALG_ES384 => Ok(SigningAlgorithm::Es384),
            SIGNING_ALG_ES512 => Ok(SigningAlgorithm::Es512),
            SIGNING_ALG_PS256 => Ok(SigningAlgorithm::Ps256),
            SIGNING_ALG_PS384 => Ok(SigningAlgorithm::Ps384),
            SIGNING_ALG_PS512 => Ok(SigningAlgorithm::Ps512),
            _ => Err(Error::root(SignatureError::UnsupportedAlgorithm(
                value.to_string(),
            ))),
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let message = match self {
            Self::Hs256 => SIGNING_ALG_HS256,
            Self::Hs384 => SIGNING_ALG_HS384,
            Self::Hs512 => SIGNING_ALG_HS512,
            Self::Rs256 => SIGNING_ALG_RS256,
            Self::Rs384 => SIGNING_ALG_RS384,
            Self::Rs512 => SIGNING_ALG_RS512,
            Self::Es256 => SIGNING_ALG_ES256,
            Self::Es384 => SIGNING_ALG_ES384,
            Self::Es512 => SIGNING_ALG_ES512,
            Self::Ps256 => SIGNING_ALG_PS256,
            Self::Ps384 => SIGNING_ALG_PS384,
            Self::Ps512 => SIGNING_ALG_PS512,
        };
        write!(f, "{}", message)
    }
}

impl SigningAlgorithm {
    /// Return the structural category of key material this algorithm needs.
    pub fn key_family(self) -> KeyFamily {
        match self {
            Self::Hs256 | Self::Hs384 | Self::Hs512 => KeyFamily::Hmac,
            Self::Rs256 | Self::Rs384 | Self::Rs512 => KeyFamily::Rsa,
            Self::Es256 | Self::Es384 | Self::Es512 => KeyFamily::Ec,
            Self::Ps256 | Self::Ps384 | Self::Ps512 => KeyFamily::Rsa,
        }
    }

    /// Return the message digest this algorithm signs with.
    pub fn digest(self) -> DigestAlgorithm {
        match self {
            Self::Hs256 | Self::Rs256 | Self::Es256 | Self::Ps256 => DigestAlgorithm::Sha256,
            Self::Hs384 | Self::Rs384 | Self::Es384 | Self::Ps384 => DigestAlgorithm::Sha384,
            Self::Hs512 | Self::Rs512 | Self::Es512 | Self::Ps512 => DigestAlgorithm::Sha512,
        }
    }
}

/// The structural category of key material a [`SigningAlgorithm`] needs:
/// a shared secret, or one side of an asymmetric key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// Shared secret (HMAC algorithms).
    Hmac,
    /// RSA key pair (both the PKCS1 and the PSS algorithms).
    Rsa,
    /// Elliptic-curve key pair.
    Ec,
}

/// The hash primitive a [`SigningAlgorithm`] digests messages with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// The conventional name of the digest, e.g. `"SHA-256"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    /// The digest output size in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// The direction of a cryptographic operation, used to resolve which
/// [`KeyRole`] the operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUse {
    /// Producing a signature.
    Signing,
    /// Checking a signature.
    Verification,
}

/// Which side of a key family a given operation must use.
///
/// A role is never stored; it is always re-derived from the algorithm and the
/// direction of the operation via [`KeyRole::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// The shared secret of the HMAC family.
    Secret,
    /// The private side of an asymmetric key pair.
    Private,
    /// The public side of an asymmetric key pair.
    Public,
}

impl KeyRole {
    /// Determine the key role required by `algorithm` for the given `key_use`.
    ///
    /// The HMAC family uses the shared secret regardless of direction;
    /// asymmetric families sign with the private key and verify with the
    /// public one. The function is total over the closed algorithm set.
    pub fn resolve(algorithm: SigningAlgorithm, key_use: KeyUse) -> Self {
        match algorithm.key_family() {
            KeyFamily::Hmac => KeyRole::Secret,
            KeyFamily::Rsa | KeyFamily::Ec => match key_use {
                KeyUse::Signing => KeyRole::Private,
                KeyUse::Verification => KeyRole::Public,
            },
        }
    }
}

/// A signing backend, used for computing a JWS signature.
///
/// The output of the signer, regardless of the algorithm, must be a valid
/// **JWS signature**. See step 5 in [section 5.1 of RFC7515][1] for more
/// information.
///
/// [1]: https://www.rfc-editor.org/rfc/rfc7515.html#section-5.1
pub trait Signer {
    /// The algorithm this signer uses. Must be a constant function.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Produce a JWS signature as a byte array, not yet base64url-encoded.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, BoxError>;
}

/// A backend for signature verification, used for verifying JWS signatures.
pub trait SignatureVerifier: Sync {
    /// The algorithm used for the signature verification.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Verifies the signature of the message.
    ///
    /// # Return
    /// Method returns `Ok(true)` if the signature is valid for the given
    /// message, `Ok(false)` if it isn't (but there was no issue with the
    /// verifier itself), and `Err(_)` when the verifier itself encounters an
    /// error for any other reason.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, BoxError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const ALL_ALGORITHMS: &[(SigningAlgorithm, &str)] = &[
        (SigningAlgorithm::Hs256, SIGNING_ALG_HS256),
        (SigningAlgorithm::Hs384, SIGNING_ALG_HS384),
        (SigningAlgorithm::Hs512, SIGNING_ALG_HS512),
        (SigningAlgorithm::Rs256, SIGNING_ALG_RS256),
        (SigningAlgorithm::Rs384, SIGNING_ALG_RS384),
        (SigningAlgorithm::Rs512, SIGNING_ALG_RS512),
        (SigningAlgorithm::Es256, SIGNING_ALG_ES256),
        (SigningAlgorithm::Es384, SIGNING_ALG_ES384),
        (SigningAlgorithm::Es512, SIGNING_ALG_ES512),
        (SigningAlgorithm::Ps256, SIGNING_ALG_PS256),
        (SigningAlgorithm::Ps384, SIGNING_ALG_PS384),
        (SigningAlgorithm::Ps512, SIGNING_ALG_PS512),
    ];

    #[test]
    fn signing_algorithms_serialize_correctly() {
        for (alg, alg_str) in ALL_ALGORITHMS {
            let serialized = serde_json::to_string(alg).unwrap();
            let expected = format!("\"{}\"", alg_str);
            assert_eq!(expected, serialized);

            let deserialized_serde: SigningAlgorithm = serde_json::from_str(&expected).unwrap();
            assert_eq!(alg, &deserialized_serde);

            let deserialized_str = SigningAlgorithm::from_str(alg_str).unwrap();
            assert_eq!(alg, &deserialized_str);

            assert_eq!(*alg, SigningAlgorithm::from_str(&alg.to_string()).unwrap());
        }
    }

    #[test]
    fn unknown_algorithm_name_is_rejected() {
        let error = SigningAlgorithm::from_str("HS123").unwrap_err();
        assert_eq!(
            error.error,
            SignatureError::UnsupportedAlgorithm("HS123".to_string())
        );
    }

    #[test]
    fn key_families_and_digests() {
        for (alg, name) in ALL_ALGORITHMS {
            let expected_family = match &name[..2] {
                "HS" => KeyFamily::Hmac,
                "RS" | "PS" => KeyFamily::Rsa,
                "ES" => KeyFamily::Ec,
                _ => unreachable!(),
            };
            assert_eq!(alg.key_family(), expected_family);

            let expected_digest = match &name[2..] {
                "256" => DigestAlgorithm::Sha256,
                "384" => DigestAlgorithm::Sha384,
                "512" => DigestAlgorithm::Sha512,
                _ => unreachable!(),
            };
            assert_eq!(alg.digest(), expected_digest);
        }
    }

    #[test]
    fn key_role_resolution() {
        for (alg, _) in ALL_ALGORITHMS {
            let signing = KeyRole::resolve(*alg, KeyUse::Signing);
            let verification = KeyRole::resolve(*alg, KeyUse::Verification);

            match alg.key_family() {
                KeyFamily::Hmac => {
                    assert_eq!(signing, KeyRole::Secret);
                    assert_eq!(verification, KeyRole::Secret);
                }
                KeyFamily::Rsa | KeyFamily::Ec => {
                    assert_eq!(signing, KeyRole::Private);
                    assert_eq!(verification, KeyRole::Public);
                }
            }
        }
    }
}
