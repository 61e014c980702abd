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

use bh_jwa::SigningAlgorithm;
use serde::{Deserialize, Serialize};

/// Value of the `typ` header parameter, as specified in
/// [RFC7519, section 5.1](https://datatracker.ietf.org/doc/html/rfc7519#section-5.1).
pub const TYP_JWT: &str = "JWT";

/// JWT Header.
///
/// The header always has exactly these two members; its serialized form is
/// e.g. `{"alg":"HS256","typ":"JWT"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    /// Algorithm used to sign the token.
    pub alg: SigningAlgorithm,

    /// Type of the token; always [`TYP_JWT`] when produced by this crate.
    pub typ: String,
}

impl Header {
    /// Construct the header for a token signed with `alg`.
    pub fn new(alg: SigningAlgorithm) -> Self {
        Self {
            alg,
            typ: TYP_JWT.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_serializes_with_alg_then_typ() {
        let header = Header::new(SigningAlgorithm::Hs256);
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"alg":"HS256","typ":"JWT"}"#
        );
    }

    #[test]
    fn header_round_trips() {
        let header = Header::new(SigningAlgorithm::Ps512);
        let json = serde_json::to_string(&header).unwrap();
        let parsed: Header = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, header);
    }
}
