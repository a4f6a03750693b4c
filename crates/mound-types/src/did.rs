use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Length of the canonical hyphenated form (8-4-4-4-12).
pub const DID_LEN: usize = 36;

/// Byte offsets of the four hyphens in the canonical form.
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Identifier naming one entity.
///
/// Always held in canonical form: 36 characters, lowercase hex, hyphenated
/// 8-4-4-4-12. Parsing accepts either letter case. The version and variant
/// are not checked here; that is the job of a [`DidProvider`](crate::DidProvider)
/// when it validates link targets.
///
/// Serializes as a bare JSON string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did {
    text: String,
    uuid: Uuid,
}

impl Did {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            text: uuid.hyphenated().to_string(),
            uuid,
        }
    }

    /// Parse a hyphenated identifier, normalising it to lowercase.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidDid {
            input: input.to_string(),
            reason: reason.into(),
        };

        if input.len() != DID_LEN {
            return Err(invalid("expected 36 characters"));
        }
        let bytes = input.as_bytes();
        if HYPHENS.iter().any(|&i| bytes[i] != b'-') {
            return Err(invalid("expected 8-4-4-4-12 hyphenated groups"));
        }
        let uuid = Uuid::try_parse(input).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self::from_uuid(uuid))
    }

    /// The canonical string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.uuid
    }

    /// Short representation (first 8 characters, the shard prefix).
    pub fn short_id(&self) -> &str {
        &self.text[..8]
    }
}

impl FromStr for Did {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.text
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for Did {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Did({})", self.short_id())
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    #[test]
    fn parse_canonical() {
        let did = Did::parse(SAMPLE).unwrap();
        assert_eq!(did.as_str(), SAMPLE);
        assert_eq!(did.short_id(), "0f8fad5b");
    }

    #[test]
    fn parse_normalises_case() {
        let upper = SAMPLE.to_uppercase();
        let did = Did::parse(&upper).unwrap();
        assert_eq!(did.as_str(), SAMPLE);
        assert_eq!(did, Did::parse(SAMPLE).unwrap());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = Did::parse("0f8fad5b").unwrap_err();
        assert!(matches!(err, TypeError::InvalidDid { .. }));
    }

    #[test]
    fn rejects_simple_form() {
        // Same 128 bits, no hyphens: 32 characters, so not canonical.
        assert!(Did::parse("0f8fad5bd9cb469fa16570867728950e").is_err());
    }

    #[test]
    fn rejects_misplaced_hyphens() {
        assert!(Did::parse("0f8fad5bd-9cb-469f-a165-70867728950e").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Did::parse("0f8fad5b-d9cb-469f-a165-70867728950z").is_err());
    }

    #[test]
    fn serde_is_a_plain_string() {
        let did = Did::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));
        let parsed: Did = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, did);
    }

    #[test]
    fn serde_rejects_garbage() {
        let result: Result<Did, _> = serde_json::from_str("\"not-a-did\"");
        assert!(result.is_err());
    }

    #[test]
    fn debug_shows_short_id() {
        let did = Did::parse(SAMPLE).unwrap();
        assert_eq!(format!("{did:?}"), "Did(0f8fad5b)");
        assert_eq!(did.to_string(), SAMPLE);
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(bytes in any::<[u8; 16]>()) {
            let did = Did::from_uuid(Uuid::from_bytes(bytes));
            let parsed = Did::parse(&did.to_string()).unwrap();
            prop_assert_eq!(parsed, did);
        }

        #[test]
        fn arbitrary_short_strings_never_parse(s in "[^-]{0,35}") {
            prop_assert!(Did::parse(&s).is_err());
        }
    }
}
