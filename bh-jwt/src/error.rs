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

use crate::claims::SecondsSinceEpoch;

/// Error type related to [`TokenBuilder`](crate::TokenBuilder) operations.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum BuilderError {
    /// Error indicating that the signing algorithm was not set before
    /// building.
    #[strum(to_string = "The algorithm is required")]
    MissingAlgorithm,

    /// Error indicating that the signing key was not set before building.
    #[strum(to_string = "The signing key is required")]
    MissingKey,

    /// Error indicating that the header or the claims could not be
    /// serialized.
    #[strum(to_string = "Token serialization failed")]
    SerializationFailed,

    /// Error indicating that the signing of the token failed.
    #[strum(to_string = "Signing failed")]
    SigningFailed,
}

impl bherror::BhError for BuilderError {}

/// Error type related to [`TokenParser`](crate::TokenParser) operations.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum ParserError {
    /// Error indicating that the token does not have exactly three
    /// dot-separated segments.
    #[strum(to_string = "The token is malformed")]
    MalformedToken,

    /// Error indicating that the header or the payload segment is not a
    /// valid serialized form.
    #[strum(to_string = "Error occurred during token parsing")]
    ParsingError,

    /// Error indicating that the header declares an algorithm name outside
    /// of the supported set.
    #[strum(to_string = "Unsupported signing algorithm {0}")]
    UnsupportedAlgorithm(String),

    /// Error indicating that the token signature does not verify under the
    /// provided key.
    #[strum(to_string = "The token signature is invalid")]
    InvalidSignature,

    /// Error indicating that the token expired, i.e. its `expiration` claim
    /// is in the past.
    #[strum(to_string = "Token expired: current time is {0}, expiration is {1}")]
    Expired(SecondsSinceEpoch, SecondsSinceEpoch),

    /// Error indicating that the token is not yet valid, i.e. its
    /// `notBeforeAt` claim is in the future.
    #[strum(to_string = "Token not yet valid: current time is {0}, notBeforeAt is {1}")]
    NotYetValid(SecondsSinceEpoch, SecondsSinceEpoch),
}

impl bherror::BhError for ParserError {}

/// Error type related to typed [`ClaimSet`](crate::ClaimSet) access.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum ClaimError {
    /// Error indicating that a claim is present but its stored value does
    /// not have the requested type.
    #[strum(to_string = "Claim {name} is not of type {expected}")]
    TypeMismatch {
        /// The name of the requested claim.
        name: String,
        /// The requested type.
        expected: &'static str,
    },
}

impl bherror::BhError for ClaimError {}

/// Result type used across the crate.
pub type Result<T, E> = bherror::Result<T, E>;
