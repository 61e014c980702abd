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

//! This crate provides issuance and verification of [JSON Web Tokens
//! (JWT)][1] in the compact serialization.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7519
//!
//! # Details
//!
//! A token is issued with a [`TokenBuilder`]: set the signing algorithm and
//! key, accumulate claims, and [`build`](TokenBuilder::build) the
//! `<header>.<payload>.<signature>` string. A token is consumed with a
//! [`TokenParser`], which verifies the signature and the temporal claims
//! before handing out the [`Header`] or the [`ClaimSet`].
//!
//! The cryptography is provided by the [`bh_jwa`] crate, re-exported here;
//! see [`bh_jwa::SigningAlgorithm`] for the supported algorithms.
//!
//! # Examples
//!
//! ```
//! use bh_jwa::{KeySize, SigningAlgorithm};
//! use bh_jwt::{TokenBuilder, TokenParser};
//!
//! let pair = bh_jwa::generate_key_pair(SigningAlgorithm::Es256, KeySize::Low).unwrap();
//!
//! let token = TokenBuilder::new()
//!     .algorithm(SigningAlgorithm::Es256)
//!     .private_key(pair.private_key())
//!     .issuer("https://issuer.example.com")
//!     .subject("user-17")
//!     .expiration(1883000000)
//!     .claim("admin", true)
//!     .build()
//!     .unwrap();
//!
//! let parser = TokenParser::from_public_key(pair.public_key());
//! let claims = parser.payload(&token).unwrap();
//!
//! assert_eq!(claims.subject().unwrap(), Some("user-17"));
//! assert_eq!(claims.boolean("admin").unwrap(), Some(true));
//! ```

mod builder;
mod claims;
mod error;
mod header;
mod parser;

pub use bh_jwa;
pub use builder::TokenBuilder;
pub use claims::{
    ClaimSet, IntoEpochSeconds, JsonObject, SecondsSinceEpoch, CLAIM_AUDIENCE, CLAIM_EXPIRATION,
    CLAIM_ISSUED_AT, CLAIM_ISSUER, CLAIM_NOT_BEFORE_AT, CLAIM_SUBJECT,
};
pub use error::{BuilderError, ClaimError, ParserError, Result};
pub use header::{Header, TYP_JWT};
pub use parser::TokenParser;
