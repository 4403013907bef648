//! Key Derivation Module
//!
//! Turns a logical cache name plus an operation descriptor into a stable
//! cache key.

use sha2::{Digest, Sha256};

// == Derive Key ==
/// Derives a stable cache key from a namespace and a discriminator.
///
/// The same (namespace, discriminator) pair always yields the same key;
/// distinct pairs yield distinct keys with overwhelming probability
/// (SHA-256 over the concatenated input). The namespace is length-prefixed
/// into the digest so that the (namespace, discriminator) boundary is
/// unambiguous: `("ab", "c")` and `("a", "bc")` hash differently.
///
/// The returned key keeps the namespace as a readable prefix:
/// `{namespace}:{hex digest}`.
///
/// # Arguments
/// * `namespace` - Logical cache name, e.g. `"users:list"`
/// * `discriminator` - Bytes identifying the exact operation, e.g. a
///   serialized query descriptor
pub fn derive_key(namespace: &str, discriminator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((namespace.len() as u64).to_be_bytes());
    hasher.update(namespace.as_bytes());
    hasher.update(discriminator);
    format!("{}:{}", namespace, hex::encode(hasher.finalize()))
}
