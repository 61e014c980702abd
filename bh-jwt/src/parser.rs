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

//! Provides the [`TokenParser`] type for verifying and reading signed tokens.

use std::{str::FromStr as _, time::SystemTime};

use bh_jwa::{
    base64_url_decode, construct_signing_input, KeyRole, KeyUse, PublicKey, SecretKey,
    SignatureEngine, SignatureVerifier as _, SigningAlgorithm,
};
use bherror::{
    traits::{ErrorContext as _, ForeignBoxed as _, ForeignError as _, PropagateError as _},
    Error,
};
use serde::Deserialize;

use crate::{
    claims::{ClaimSet, IntoEpochSeconds as _, SecondsSinceEpoch},
    error::{ParserError, Result},
    header::Header,
};

/// Parser verifying tokens against a single verification key.
///
/// Every accessor performs the full validation pipeline before yielding any
/// token content: structural checks, signature verification under the
/// configured key, and the temporal claim checks. There is no way to read a
/// header or a claim out of a token this parser has not fully validated.
///
/// # Examples
///
/// ```
/// use bh_jwa::SigningAlgorithm;
/// use bh_jwt::{TokenBuilder, TokenParser};
///
/// let secret = bh_jwa::generate_secret_key(SigningAlgorithm::Hs256).unwrap();
///
/// let token = TokenBuilder::new()
///     .algorithm(SigningAlgorithm::Hs256)
///     .secret_key(&secret)
///     .subject("user-17")
///     .build()
///     .unwrap();
///
/// let claims = TokenParser::from_secret_key(&secret).payload(&token).unwrap();
/// assert_eq!(claims.subject().unwrap(), Some("user-17"));
/// ```
#[derive(Debug, Clone)]
pub struct TokenParser {
    verification_key: String,
}

/// Header form used during parsing, before the algorithm name is checked
/// against the supported set.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
    typ: String,
}

impl TokenParser {
    /// Construct a parser verifying against the given base64 key text.
    ///
    /// The key is interpreted according to the algorithm each token declares:
    /// as a shared secret for the HMAC family, and as a public key for the
    /// asymmetric families.
    pub fn new(verification_key: impl Into<String>) -> Self {
        Self {
            verification_key: verification_key.into(),
        }
    }

    /// Construct a parser verifying HMAC-family tokens with a shared secret.
    pub fn from_secret_key(key: &SecretKey) -> Self {
        Self::new(key.encoded())
    }

    /// Construct a parser verifying asymmetric-family tokens with a public
    /// key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Self::new(key.encoded())
    }

    /// Validate `token` and return its header.
    pub fn header(&self, token: &str) -> Result<Header, ParserError> {
        self.header_at(token, current_unix_time())
    }

    /// Validate `token` and return its claim set.
    pub fn payload(&self, token: &str) -> Result<ClaimSet, ParserError> {
        self.payload_at(token, current_unix_time())
    }

    /// Validate `token` against the provided clock reading and return its
    /// header.
    pub fn header_at(
        &self,
        token: &str,
        current_time: SecondsSinceEpoch,
    ) -> Result<Header, ParserError> {
        self.validate(token, current_time).map(|(header, _)| header)
    }

    /// Validate `token` against the provided clock reading and return its
    /// claim set.
    pub fn payload_at(
        &self,
        token: &str,
        current_time: SecondsSinceEpoch,
    ) -> Result<ClaimSet, ParserError> {
        self.validate(token, current_time).map(|(_, claims)| claims)
    }

    fn validate(
        &self,
        token: &str,
        current_time: SecondsSinceEpoch,
    ) -> Result<(Header, ClaimSet), ParserError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header_segment, payload_segment, signature_segment]: [&str; 3] = segments
            .try_into()
            .map_err(|_| Error::root(ParserError::MalformedToken))?;

        let header = parse_header(header_segment)?;

        self.verify_signature(&header.alg, header_segment, payload_segment, signature_segment)?;

        let claims = parse_payload(payload_segment)?;
        validate_temporal_claims(&claims, current_time)?;

        Ok((header, claims))
    }

    fn verify_signature(
        &self,
        algorithm: &SigningAlgorithm,
        header_segment: &str,
        payload_segment: &str,
        signature_segment: &str,
    ) -> Result<(), ParserError> {
        let signature = base64_url_decode(signature_segment)
            .foreign_err(|| ParserError::InvalidSignature)?;

        let role = KeyRole::resolve(*algorithm, KeyUse::Verification);
        let engine = SignatureEngine::new(*algorithm, &self.verification_key, role)
            .with_err(|| ParserError::InvalidSignature)
            .ctx(|| format!("building the {algorithm} verification engine"))?;

        let signing_input = construct_signing_input(header_segment, payload_segment);
        let valid = engine
            .verify(signing_input.as_bytes(), &signature)
            .foreign_boxed_err(|| ParserError::InvalidSignature)?;

        if !valid {
            return Err(Error::root(ParserError::InvalidSignature));
        }

        Ok(())
    }
}

fn parse_header(header_segment: &str) -> Result<Header, ParserError> {
    let header_json =
        base64_url_decode(header_segment).foreign_err(|| ParserError::ParsingError)?;
    let raw: RawHeader =
        serde_json::from_slice(&header_json).foreign_err(|| ParserError::ParsingError)?;

    let alg = SigningAlgorithm::from_str(&raw.alg)
        .with_err(|| ParserError::UnsupportedAlgorithm(raw.alg.clone()))?;

    Ok(Header { alg, typ: raw.typ })
}

fn parse_payload(payload_segment: &str) -> Result<ClaimSet, ParserError> {
    let payload_json =
        base64_url_decode(payload_segment).foreign_err(|| ParserError::ParsingError)?;
    let claims = serde_json::from_slice(&payload_json)
        .foreign_err(|| ParserError::ParsingError)
        .ctx(|| "the payload is not a JSON object")?;
    Ok(ClaimSet::new(claims))
}

fn validate_temporal_claims(
    claims: &ClaimSet,
    current_time: SecondsSinceEpoch,
) -> Result<(), ParserError> {
    let expiration = claims
        .expiration()
        .with_err(|| ParserError::ParsingError)?;
    if let Some(expiration) = expiration {
        if expiration < current_time {
            return Err(Error::root(ParserError::Expired(current_time, expiration)));
        }
    }

    let not_before_at = claims
        .not_before_at()
        .with_err(|| ParserError::ParsingError)?;
    if let Some(not_before_at) = not_before_at {
        if not_before_at > current_time {
            return Err(Error::root(ParserError::NotYetValid(
                current_time,
                not_before_at,
            )));
        }
    }

    Ok(())
}

fn current_unix_time() -> SecondsSinceEpoch {
    SystemTime::now().into_epoch_seconds()
}

#[cfg(test)]
mod tests {
    use bh_jwa::{
        base64_url_encode, generate_key_pair, generate_secret_key, KeySize,
    };

    use super::*;
    use crate::builder::TokenBuilder;

    const NOW: SecondsSinceEpoch = 1700000000;

    fn hmac_token(secret: &SecretKey) -> String {
        TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(secret)
            .issuer("https://issuer.example.com")
            .subject("user-17")
            .issued_at(NOW - 60)
            .expiration(NOW + 3600)
            .build()
            .unwrap()
    }

    #[test]
    fn round_trip_hmac() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = hmac_token(&secret);

        let parser = TokenParser::from_secret_key(&secret);
        let header = parser.header_at(&token, NOW).unwrap();
        assert_eq!(header, Header::new(SigningAlgorithm::Hs256));

        let claims = parser.payload_at(&token, NOW).unwrap();
        assert_eq!(claims.issuer().unwrap(), Some("https://issuer.example.com"));
        assert_eq!(claims.subject().unwrap(), Some("user-17"));
        assert_eq!(claims.expiration().unwrap(), Some(NOW + 3600));
    }

    #[test]
    fn round_trip_asymmetric_families() {
        for algorithm in [
            SigningAlgorithm::Rs256,
            SigningAlgorithm::Es256,
            SigningAlgorithm::Ps256,
        ] {
            let pair = generate_key_pair(algorithm, KeySize::Low).unwrap();
            let token = TokenBuilder::new()
                .algorithm(algorithm)
                .private_key(pair.private_key())
                .subject("user-17")
                .expiration(NOW + 3600)
                .build()
                .unwrap();

            let claims = TokenParser::from_public_key(pair.public_key())
                .payload_at(&token, NOW)
                .unwrap();
            assert_eq!(claims.subject().unwrap(), Some("user-17"));
        }
    }

    #[test]
    fn malformed_token_is_rejected() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let parser = TokenParser::from_secret_key(&secret);

        for token in ["", "abc", "a.b", "a.b.c.d"] {
            let error = parser.payload_at(token, NOW).unwrap_err();
            assert_eq!(error.error, ParserError::MalformedToken, "token {token:?}");
        }
    }

    #[test]
    fn garbage_segments_are_parsing_errors() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let parser = TokenParser::from_secret_key(&secret);

        // header is not base64url
        let error = parser.payload_at("!!!.e30.c2ln", NOW).unwrap_err();
        assert_eq!(error.error, ParserError::ParsingError);

        // header decodes but is not JSON
        let header_segment = base64_url_encode("not json");
        let error = parser
            .payload_at(&format!("{header_segment}.e30.c2ln"), NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::ParsingError);
    }

    #[test]
    fn unknown_algorithm_name_is_rejected() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let header_segment = base64_url_encode(r#"{"alg":"none","typ":"JWT"}"#);
        let error = TokenParser::from_secret_key(&secret)
            .payload_at(&format!("{header_segment}.e30.c2ln"), NOW)
            .unwrap_err();
        assert_eq!(
            error.error,
            ParserError::UnsupportedAlgorithm("none".to_owned())
        );
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let other = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = hmac_token(&secret);

        let error = TokenParser::from_secret_key(&other)
            .payload_at(&token, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::InvalidSignature);
    }

    #[test]
    fn wrong_public_key_is_invalid_signature() {
        let pair = generate_key_pair(SigningAlgorithm::Es256, KeySize::Low).unwrap();
        let other = generate_key_pair(SigningAlgorithm::Es256, KeySize::Low).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Es256)
            .private_key(pair.private_key())
            .subject("user-17")
            .build()
            .unwrap();

        let error = TokenParser::from_public_key(other.public_key())
            .payload_at(&token, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::InvalidSignature);
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = hmac_token(&secret);

        let mut segments: Vec<&str> = token.split('.').collect();
        let forged = base64_url_encode(r#"{"subject":"admin"}"#);
        segments[1] = &forged;
        let tampered = segments.join(".");

        let error = TokenParser::from_secret_key(&secret)
            .payload_at(&tampered, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::InvalidSignature);
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(&secret)
            .expiration(NOW - 1)
            .build()
            .unwrap();

        let error = TokenParser::from_secret_key(&secret)
            .payload_at(&token, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::Expired(NOW, NOW - 1));
    }

    #[test]
    fn expiration_at_current_time_is_still_valid() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(&secret)
            .expiration(NOW)
            .build()
            .unwrap();

        TokenParser::from_secret_key(&secret)
            .payload_at(&token, NOW)
            .unwrap();
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(&secret)
            .not_before_at(NOW + 60)
            .build()
            .unwrap();

        let error = TokenParser::from_secret_key(&secret)
            .payload_at(&token, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::NotYetValid(NOW, NOW + 60));

        // becomes valid once the clock reaches the claim
        TokenParser::from_secret_key(&secret)
            .payload_at(&token, NOW + 60)
            .unwrap();
    }

    #[test]
    fn non_numeric_temporal_claim_is_parsing_error() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(&secret)
            .claim("expiration", "tomorrow")
            .build()
            .unwrap();

        let error = TokenParser::from_secret_key(&secret)
            .payload_at(&token, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::ParsingError);
    }

    #[test]
    fn header_accessor_re_verifies() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let other = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = hmac_token(&secret);

        let error = TokenParser::from_secret_key(&other)
            .header_at(&token, NOW)
            .unwrap_err();
        assert_eq!(error.error, ParserError::InvalidSignature);
    }

    #[test]
    fn system_clock_accessors_validate_a_live_token() {
        use std::time::{Duration, SystemTime};

        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(&secret)
            .subject("user-17")
            .expiration(SystemTime::now() + Duration::from_secs(3600))
            .build()
            .unwrap();

        let parser = TokenParser::from_secret_key(&secret);
        parser.header(&token).unwrap();
        let claims = parser.payload(&token).unwrap();
        assert_eq!(claims.subject().unwrap(), Some("user-17"));
    }

    #[test]
    fn token_without_temporal_claims_is_valid() {
        let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();
        let token = TokenBuilder::new()
            .algorithm(SigningAlgorithm::Hs256)
            .secret_key(&secret)
            .subject("user-17")
            .build()
            .unwrap();

        TokenParser::from_secret_key(&secret)
            .payload_at(&token, NOW)
            .unwrap();
    }
}
