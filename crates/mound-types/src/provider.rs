use uuid::{Uuid, Variant, Version};

use crate::did::Did;
use crate::error::TypeError;

/// Source of entity identifiers.
///
/// Implementations must satisfy these invariants:
/// - Every call to `generate()` returns an identifier never handed out before
///   (random generation gives this up to the birthday bound).
/// - Every identifier returned by `generate()` passes `validate()`.
/// - `validate()` is a pure syntactic check; it never consults storage.
pub trait DidProvider: Send + Sync {
    /// Produce a fresh identifier.
    fn generate(&self) -> Result<Did, TypeError>;

    /// Returns `true` iff `token` is a canonical identifier of the kind this
    /// provider generates.
    fn validate(&self, token: &str) -> bool;
}

/// Random UUID v4 provider (RFC 4122 variant).
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomDidProvider;

impl RandomDidProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DidProvider for RandomDidProvider {
    fn generate(&self) -> Result<Did, TypeError> {
        Ok(Did::from_uuid(Uuid::new_v4()))
    }

    fn validate(&self, token: &str) -> bool {
        match Did::parse(token) {
            Ok(did) => {
                let uuid = did.as_uuid();
                uuid.get_version() == Some(Version::Random) && uuid.get_variant() == Variant::RFC4122
            }
            Err(_) => false,
        }
    }
}
