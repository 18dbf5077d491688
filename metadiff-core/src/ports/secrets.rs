// metadiff-core/src/ports/secrets.rs

use crate::error::MetadiffError;

/// Passwords written as `gcp-secret:<name>` are looked up in a secret store.
pub const SECRET_PREFIX: &str = "gcp-secret:";

pub trait SecretStore: Send + Sync {
    fn get_secret(&self, name: &str) -> Result<String, MetadiffError>;
}

/// Return `raw` unchanged unless it references a secret.
pub fn resolve_password(raw: &str, store: &dyn SecretStore) -> Result<String, MetadiffError> {
    match raw.strip_prefix(SECRET_PREFIX) {
        Some(name) => store.get_secret(name.trim()),
        None => Ok(raw.to_string()),
    }
}
