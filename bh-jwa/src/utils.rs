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

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};

/// Type alias for a boxed error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Create the signing input for a JWS, given its encoded header and claims
/// segments.
///
/// The input is constructed by concatenating the segments with the `.`
/// character, i.e. `<header>.<claims>`, as defined [here]. The signature is
/// always computed over these exact ASCII bytes, never over decoded content.
///
/// [here]: https://www.rfc-editor.org/rfc/rfc7515.html#section-5.1
pub fn construct_signing_input(header: &str, claims: &str) -> String {
    format!("{header}.{claims}")
}

/// Returns the `base64url`-encoded string of the given `input`, without
/// padding.
pub fn base64_url_encode<T: AsRef<[u8]>>(input: T) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes the given `payload` as the `base64url`-encoded string **without
/// padding** into bytes.
pub fn base64_url_decode<T: AsRef<[u8]>>(payload: T) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(payload)
}

/// Returns the standard `base64`-encoded string of the given `input`.
///
/// Key material travels through the API in this encoding, as opposed to the
/// token segments which use [`base64_url_encode`].
pub fn base64_encode<T: AsRef<[u8]>>(input: T) -> String {
    STANDARD.encode(input)
}

/// Decodes the given standard `base64`-encoded `payload` into bytes.
pub fn base64_decode<T: AsRef<[u8]>>(payload: T) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_url_is_unpadded() {
        // lengths chosen to exercise every padding residue
        for input in [&b""[..], b"f", b"fo", b"foo", b"foob"] {
            let encoded = base64_url_encode(input);
            assert!(!encoded.contains('='));
            assert_eq!(base64_url_decode(&encoded).unwrap(), input);
        }
    }

    #[test]
    fn signing_input_is_dot_joined() {
        assert_eq!(construct_signing_input("aGVhZGVy", "Y2xhaW1z"), "aGVhZGVy.Y2xhaW1z");
    }
}
