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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides the [JSON Web Algorithm (JWA)][1] signing and
//! verification primitives used to produce and consume [JWS][2] signatures.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7518
//! [2]: https://datatracker.ietf.org/doc/html/rfc7515
//!
//! # Details
//!
//! The supported algorithms are the twelve JWA digital signature algorithms
//! spanning four families: HMAC (`HS256`/`HS384`/`HS512`), RSASSA-PKCS1-v1_5
//! (`RS256`/`RS384`/`RS512`), ECDSA (`ES256`/`ES384`/`ES512`) and RSASSA-PSS
//! (`PS256`/`PS384`/`PS512`). The [`SigningAlgorithm`] enumeration is the
//! catalog of this set; it is closed on purpose so that adding an algorithm
//! is a compile-time-checked change.
//!
//! Signing and verification go through the [`Signer`] and
//! [`SignatureVerifier`] traits. A default [`openssl`] backed implementation
//! is available as the [`SignatureEngine`] enum, with one strategy per
//! algorithm family. It is constructed per call from an algorithm, the
//! encoded key text and the [`KeyRole`] resolved for the operation, and never
//! cached, since key material may differ between calls.
//!
//! Key material comes from [`generate_secret_key`] and [`generate_key_pair`]:
//! a random shared secret for the HMAC family, and RSA/EC key pairs encoded
//! as base64 text over PKCS#8 (private) and X.509 `SubjectPublicKeyInfo`
//! (public) DER.
//!
//! # Examples
//!
//! ## Sign and verify raw bytes
//!
//! ```
//! use bh_jwa::{KeyRole, KeyUse, SignatureEngine, SignatureVerifier, Signer, SigningAlgorithm};
//!
//! let secret = bh_jwa::generate_secret_key(SigningAlgorithm::Hs256).unwrap();
//!
//! let engine = SignatureEngine::new(
//!     SigningAlgorithm::Hs256,
//!     secret.encoded(),
//!     KeyRole::resolve(SigningAlgorithm::Hs256, KeyUse::Signing),
//! )
//! .unwrap();
//! let signature = engine.sign(b"message").unwrap();
//!
//! let engine = SignatureEngine::new(
//!     SigningAlgorithm::Hs256,
//!     secret.encoded(),
//!     KeyRole::resolve(SigningAlgorithm::Hs256, KeyUse::Verification),
//! )
//! .unwrap();
//! assert!(engine.verify(b"message", &signature).unwrap());
//! ```

#[cfg(feature = "openssl")]
mod keygen;
#[cfg(feature = "openssl")]
mod openssl_impl;

mod error;
mod traits;
mod utils;

pub use error::*;
#[cfg(feature = "openssl")]
pub use keygen::*;
#[cfg(feature = "openssl")]
pub use openssl_impl::*;
pub use traits::*;
pub use utils::*;

/// Helper macro with the same syntax as [`serde_json::json`] specialized for
/// constructing JSON objects.
///
/// It will construct a more specific type ([`serde_json::Map<String,Value>`])
/// than just [`serde_json::Value`] when constructing an object, and panic if
/// the syntax is valid JSON but not an object.
#[macro_export]
macro_rules! json_object {
    ($stuff:tt) => {
        match ::serde_json::json!($stuff) {
            ::serde_json::Value::Object(o) => o,
            _ => unreachable!("JSON literal wasn't an object"),
        }
    };
}
