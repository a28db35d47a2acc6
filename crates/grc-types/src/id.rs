//! Opaque identifiers for entities, attributes, relation types, relations,
//! and log operations.
//!
//! Identifiers are 22 characters drawn from the Base58 alphabet using the
//! operating system's CSPRNG. That is the same shape GRC-20 uses for its
//! own ids, so generated values can be published as-is.

use std::fmt;

use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base58 alphabet: no `0`, `O`, `I`, or `l`.
const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of every generated identifier.
pub const ID_LENGTH: usize = 22;

/// Generate a fresh random identifier.
pub fn generate() -> String {
    let mut rng = OsRng;
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns `true` if `s` has the shape of a generated identifier.
pub fn is_valid_id(s: &str) -> bool {
    s.len() == ID_LENGTH && s.bytes().all(|b| ALPHABET.contains(&b))
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(generate())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a knowledge-graph entity.
    EntityId
);
string_id!(
    /// Identifier of an attribute (property) of an entity.
    AttributeId
);
string_id!(
    /// Identifier of a relation type, e.g. "works at".
    RelationTypeId
);
string_id!(
    /// Identifier of one concrete relation edge.
    RelationId
);
string_id!(
    /// Identifier of an operation in the log. Used for removal-by-id.
    OperationId
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_ids_have_fixed_length() {
        for _ in 0..100 {
            assert_eq!(generate().len(), ID_LENGTH);
        }
    }

    #[test]
    fn generated_ids_are_url_safe() {
        let id = generate();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(is_valid_id(&id));
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn ambiguous_characters_are_rejected() {
        assert!(!is_valid_id("0000000000000000000000"));
        assert!(!is_valid_id("short"));
        assert!(!is_valid_id(&format!("{}l", &generate()[..21])));
    }

    #[test]
    fn newtype_display_and_serde() {
        let id = EntityId::new("E1");
        assert_eq!(id.to_string(), "E1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"E1\"");
        let parsed: EntityId = serde_json::from_str("\"E1\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn newtype_generate_is_valid() {
        assert!(is_valid_id(RelationId::generate().as_str()));
        assert_ne!(OperationId::generate(), OperationId::generate());
    }
}
