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

//! The claim set carried in a token payload, with typed accessors.

use std::time::SystemTime;

use bherror::{traits::ForeignError as _, Error};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClaimError, Result};

/// A JSON object, preserving the insertion order of its members.
pub type JsonObject = serde_json::Map<String, Value>;

/// Timestamp as the number of seconds since the Unix epoch, zone-agnostic.
pub type SecondsSinceEpoch = u64;

/// Name of the reserved claim carrying the token issuer.
pub const CLAIM_ISSUER: &str = "issuer";
/// Name of the reserved claim carrying the token subject.
pub const CLAIM_SUBJECT: &str = "subject";
/// Name of the reserved claim carrying the token audience.
pub const CLAIM_AUDIENCE: &str = "audience";
/// Name of the reserved claim carrying the issuance time, in epoch seconds.
pub const CLAIM_ISSUED_AT: &str = "issuedAt";
/// Name of the reserved claim carrying the expiration time, in epoch seconds.
pub const CLAIM_EXPIRATION: &str = "expiration";
/// Name of the reserved claim carrying the start of validity, in epoch
/// seconds.
pub const CLAIM_NOT_BEFORE_AT: &str = "notBeforeAt";

/// Conversion into a zone-agnostic epoch-second timestamp.
///
/// Implemented for raw epoch seconds and for [`SystemTime`], so the time
/// claims can be set either from a number or from a point in time. The
/// [`SystemTime`] conversion truncates to whole seconds; a time before the
/// Unix epoch maps to zero.
pub trait IntoEpochSeconds {
    /// The timestamp as whole seconds since the Unix epoch.
    fn into_epoch_seconds(self) -> SecondsSinceEpoch;
}

impl IntoEpochSeconds for SecondsSinceEpoch {
    fn into_epoch_seconds(self) -> SecondsSinceEpoch {
        self
    }
}

impl IntoEpochSeconds for SystemTime {
    fn into_epoch_seconds(self) -> SecondsSinceEpoch {
        self.duration_since(SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// The set of claims carried in a token payload.
///
/// Claim values are arbitrary JSON; the typed accessors project a value by
/// its expected type and fail with [`ClaimError::TypeMismatch`] when the
/// stored value has a different runtime type, never coercing silently.
/// Absent claims yield `Ok(None)` rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    claims: JsonObject,
}

impl ClaimSet {
    pub(crate) fn new(claims: JsonObject) -> Self {
        Self { claims }
    }

    /// Borrow the underlying claim mapping.
    pub fn claims(&self) -> &JsonObject {
        &self.claims
    }

    /// Consume the claim set, returning the underlying mapping.
    pub fn into_claims(self) -> JsonObject {
        self.claims
    }

    /// Project the claim `name` as a string.
    pub fn string(&self, name: &str) -> Result<Option<&str>, ClaimError> {
        match self.claims.get(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(mismatch(name, "string")),
        }
    }

    /// Project the claim `name` as an integer.
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ClaimError> {
        match self.claims.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| mismatch(name, "integer")),
        }
    }

    /// Project the claim `name` as a boolean.
    pub fn boolean(&self, name: &str) -> Result<Option<bool>, ClaimError> {
        match self.claims.get(name) {
            None => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(mismatch(name, "boolean")),
        }
    }

    /// Project the claim `name` into a caller-supplied shape.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ClaimError> {
        match self.claims.get(name) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .foreign_err(|| ClaimError::TypeMismatch {
                    name: name.to_owned(),
                    expected: std::any::type_name::<T>(),
                }),
        }
    }

    /// The `issuer` claim.
    pub fn issuer(&self) -> Result<Option<&str>, ClaimError> {
        self.string(CLAIM_ISSUER)
    }

    /// The `subject` claim.
    pub fn subject(&self) -> Result<Option<&str>, ClaimError> {
        self.string(CLAIM_SUBJECT)
    }

    /// The `audience` claim.
    pub fn audience(&self) -> Result<Option<&str>, ClaimError> {
        self.string(CLAIM_AUDIENCE)
    }

    /// The `issuedAt` claim, in epoch seconds.
    pub fn issued_at(&self) -> Result<Option<SecondsSinceEpoch>, ClaimError> {
        self.epoch_seconds(CLAIM_ISSUED_AT)
    }

    /// The `expiration` claim, in epoch seconds.
    pub fn expiration(&self) -> Result<Option<SecondsSinceEpoch>, ClaimError> {
        self.epoch_seconds(CLAIM_EXPIRATION)
    }

    /// The `notBeforeAt` claim, in epoch seconds.
    pub fn not_before_at(&self) -> Result<Option<SecondsSinceEpoch>, ClaimError> {
        self.epoch_seconds(CLAIM_NOT_BEFORE_AT)
    }

    fn epoch_seconds(&self, name: &str) -> Result<Option<SecondsSinceEpoch>, ClaimError> {
        match self.claims.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| mismatch(name, "epoch seconds")),
        }
    }
}

impl From<JsonObject> for ClaimSet {
    fn from(claims: JsonObject) -> Self {
        Self::new(claims)
    }
}

fn mismatch(name: &str, expected: &'static str) -> Error<ClaimError> {
    Error::root(ClaimError::TypeMismatch {
        name: name.to_owned(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use bh_jwa::json_object;
    use serde::Deserialize;

    use super::*;

    fn claim_set() -> ClaimSet {
        ClaimSet::new(json_object!({
            "issuer": "https://issuer.example.com",
            "subject": "user-17",
            "issuedAt": 1683000000,
            "expiration": 1883000000,
            "admin": true,
            "retries": 3,
            "address": { "city": "Zagreb", "zip": "10000" },
        }))
    }

    #[test]
    fn system_time_converts_exactly_to_epoch_seconds() {
        use std::time::Duration;

        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1700000000);
        assert_eq!(time.into_epoch_seconds(), 1700000000);

        // sub-second precision truncates rather than rounds
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1700000000_900);
        assert_eq!(time.into_epoch_seconds(), 1700000000);

        assert_eq!(1700000000u64.into_epoch_seconds(), 1700000000);
    }

    #[test]
    fn absent_claim_yields_none() {
        let claims = claim_set();
        assert_eq!(claims.string("nonexistent").unwrap(), None);
        assert_eq!(claims.integer("nonexistent").unwrap(), None);
        assert_eq!(claims.audience().unwrap(), None);
        assert_eq!(claims.not_before_at().unwrap(), None);
    }

    #[test]
    fn typed_accessors_project_values() {
        let claims = claim_set();
        assert_eq!(claims.issuer().unwrap(), Some("https://issuer.example.com"));
        assert_eq!(claims.subject().unwrap(), Some("user-17"));
        assert_eq!(claims.issued_at().unwrap(), Some(1683000000));
        assert_eq!(claims.expiration().unwrap(), Some(1883000000));
        assert_eq!(claims.boolean("admin").unwrap(), Some(true));
        assert_eq!(claims.integer("retries").unwrap(), Some(3));
    }

    #[test]
    fn type_mismatch_is_not_coerced() {
        let claims = claim_set();

        // stored as a string, requested as an integer
        let error = claims.integer("subject").unwrap_err();
        assert_eq!(
            error.error,
            ClaimError::TypeMismatch {
                name: "subject".to_owned(),
                expected: "integer",
            }
        );

        let error = claims.string("retries").unwrap_err();
        assert_eq!(
            error.error,
            ClaimError::TypeMismatch {
                name: "retries".to_owned(),
                expected: "string",
            }
        );

        let error = claims.epoch_seconds("subject").unwrap_err();
        assert_eq!(
            error.error,
            ClaimError::TypeMismatch {
                name: "subject".to_owned(),
                expected: "epoch seconds",
            }
        );
    }

    #[test]
    fn caller_supplied_shape() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Address {
            city: String,
            zip: String,
        }

        let claims = claim_set();
        let address: Address = claims.get("address").unwrap().unwrap();
        assert_eq!(
            address,
            Address {
                city: "Zagreb".to_owned(),
                zip: "10000".to_owned(),
            }
        );

        let error = claims.get::<Address>("subject").unwrap_err();
        assert!(matches!(error.error, ClaimError::TypeMismatch { .. }));
    }
}
