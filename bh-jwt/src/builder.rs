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

//! Provides the [`TokenBuilder`] type for issuing signed tokens.

use bh_jwa::{
    base64_url_encode, construct_signing_input, KeyRole, KeyUse, PrivateKey, SecretKey,
    SignatureEngine, Signer as _, SigningAlgorithm,
};
use bherror::{
    traits::{ErrorContext as _, ForeignBoxed as _, ForeignError as _, PropagateError as _},
    Error,
};
use serde_json::Value;

use crate::{
    claims::{
        IntoEpochSeconds, JsonObject, CLAIM_AUDIENCE, CLAIM_EXPIRATION, CLAIM_ISSUED_AT,
        CLAIM_ISSUER, CLAIM_NOT_BEFORE_AT, CLAIM_SUBJECT,
    },
    error::{BuilderError, Result},
    header::Header,
};

/// Builder accumulating a claim set and producing the signed three-segment
/// compact serialization.
///
/// Setting a claim under a name that was already set overwrites the previous
/// value; the last write wins. The builder owns its claims exclusively until
/// [`build`](TokenBuilder::build) serializes them.
///
/// # Examples
///
/// ```
/// use bh_jwa::SigningAlgorithm;
/// use bh_jwt::TokenBuilder;
///
/// let secret = bh_jwa::generate_secret_key(SigningAlgorithm::Hs256).unwrap();
///
/// let token = TokenBuilder::new()
///     .algorithm(SigningAlgorithm::Hs256)
///     .secret_key(&secret)
///     .issuer("https://issuer.example.com")
///     .subject("user-17")
///     .expiration(1883000000)
///     .build()
///     .unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// ```
#[derive(Default)]
pub struct TokenBuilder {
    algorithm: Option<SigningAlgorithm>,
    key: Option<String>,
    claims: JsonObject,
}

impl TokenBuilder {
    /// Construct an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signing algorithm.
    pub fn algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set the shared secret to sign with, for the HMAC family.
    pub fn secret_key(self, key: &SecretKey) -> Self {
        self.key_text(key.encoded())
    }

    /// Set the private key to sign with, for the asymmetric families.
    pub fn private_key(self, key: &PrivateKey) -> Self {
        self.key_text(key.encoded())
    }

    /// Set the signing key from its raw base64 key text.
    pub fn key_text(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the `issuer` claim.
    pub fn issuer(self, issuer: impl Into<String>) -> Self {
        self.claim(CLAIM_ISSUER, issuer.into())
    }

    /// Set the `subject` claim.
    pub fn subject(self, subject: impl Into<String>) -> Self {
        self.claim(CLAIM_SUBJECT, subject.into())
    }

    /// Set the `audience` claim.
    pub fn audience(self, audience: impl Into<String>) -> Self {
        self.claim(CLAIM_AUDIENCE, audience.into())
    }

    /// Set the `issuedAt` claim, from epoch seconds or a point in time.
    pub fn issued_at(self, issued_at: impl IntoEpochSeconds) -> Self {
        self.claim(CLAIM_ISSUED_AT, issued_at.into_epoch_seconds())
    }

    /// Set the `expiration` claim, from epoch seconds or a point in time.
    pub fn expiration(self, expiration: impl IntoEpochSeconds) -> Self {
        self.claim(CLAIM_EXPIRATION, expiration.into_epoch_seconds())
    }

    /// Set the `notBeforeAt` claim, from epoch seconds or a point in time.
    pub fn not_before_at(self, not_before_at: impl IntoEpochSeconds) -> Self {
        self.claim(CLAIM_NOT_BEFORE_AT, not_before_at.into_epoch_seconds())
    }

    /// Set an arbitrary claim.
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Assemble and sign the token.
    ///
    /// Fails with [`BuilderError::MissingAlgorithm`] or
    /// [`BuilderError::MissingKey`] when the respective requirement was not
    /// set, regardless of claim content. On success returns the compact
    /// serialization `<header>.<payload>.<signature>`; no partial token is
    /// ever produced on failure.
    pub fn build(self) -> Result<String, BuilderError> {
        let algorithm = self
            .algorithm
            .ok_or_else(|| Error::root(BuilderError::MissingAlgorithm))?;
        let key = self
            .key
            .ok_or_else(|| Error::root(BuilderError::MissingKey))?;

        let header_json = serde_json::to_string(&Header::new(algorithm))
            .foreign_err(|| BuilderError::SerializationFailed)?;
        let payload_json = serde_json::to_string(&self.claims)
            .foreign_err(|| BuilderError::SerializationFailed)?;

        let header_segment = base64_url_encode(header_json);
        let payload_segment = base64_url_encode(payload_json);

        let role = KeyRole::resolve(algorithm, KeyUse::Signing);
        let engine = SignatureEngine::new(algorithm, &key, role)
            .with_err(|| BuilderError::SigningFailed)
            .ctx(|| format!("building the {algorithm} signing engine"))?;

        let signing_input = construct_signing_input(&header_segment, &payload_segment);
        let signature = engine
            .sign(signing_input.as_bytes())
            .foreign_boxed_err(|| BuilderError::SigningFailed)?;

        Ok(format!(
            "{header_segment}.{payload_segment}.{}",
            base64_url_encode(signature)
        ))
    }
}
