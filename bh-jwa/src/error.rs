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

/// Error in the JWS signature algorithm selection
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum SignatureError {
    /// Error that occurs when the signing algorithm name is outside of the
    /// supported set
    #[strum(to_string = "Unsupported signing algorithm {0}")]
    UnsupportedAlgorithm(String),
}

impl bherror::BhError for SignatureError {}

/// Cryptographic error
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum CryptoError {
    /// Error that occurs when key generation failed
    #[strum(to_string = "Key generation failed")]
    KeyGenerationFailed,
    /// Error that occurs when the cryptographic backend
    /// unexpectedly failed
    #[strum(to_string = "Crypto backend failed")]
    CryptoBackend,
    /// Error that occurs when the provided key text is not valid base64, or
    /// the decoded bytes are not a valid key of the expected kind
    #[strum(to_string = "Invalid key encoding")]
    InvalidKeyEncoding,
    /// Error that occurs when the requested operation is unsupported for the
    /// algorithm
    #[strum(to_string = "Unsupported: {0}")]
    Unsupported(String),
    /// Error that occurs when an operation is attempted with the wrong side
    /// of a key pair, e.g. signing with a public key
    #[strum(to_string = "Operation requires the {0} key")]
    KeyRoleMismatch(&'static str),
}

impl bherror::BhError for CryptoError {}
