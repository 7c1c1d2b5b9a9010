//! Client credential generation and hashing.
//!
//! Client ids are random UUIDs. Client secrets are 33 random bytes encoded as
//! URL-safe base64 without padding (44 characters) and stored as Argon2id hashes.

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;

use crate::error::CredentialError;

/// Length of a client id in canonical hyphenated UUID form.
pub const CLIENT_ID_LEN: usize = 36;
/// Length of an encoded client secret.
pub const CLIENT_SECRET_LEN: usize = 44;

const CLIENT_SECRET_BYTES: usize = 33;

/// A freshly generated client secret together with its storable hash.
pub struct ClientSecret {
    plaintext: String,
    hash: String,
}

impl ClientSecret {
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Split into `(plaintext, hash)`.
    pub fn into_parts(self) -> (String, String) {
        (self.plaintext, self.hash)
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecret")
            .field("plaintext", &"<redacted>")
            .field("hash", &self.hash)
            .finish()
    }
}

/// Source of client ids and client secrets.
pub trait CredentialGenerator: Send + Sync {
    fn new_client_id(&self) -> String;
    fn new_client_secret(&self) -> Result<ClientSecret, CredentialError>;
}

/// Generator backed by the operating system's CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureCredentialGenerator;

impl CredentialGenerator for SecureCredentialGenerator {
    fn new_client_id(&self) -> String {
        uuid::Uuid::new_v4().hyphenated().to_string()
    }

    fn new_client_secret(&self) -> Result<ClientSecret, CredentialError> {
        let mut bytes = [0u8; CLIENT_SECRET_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| CredentialError::Random(e.to_string()))?;
        let plaintext = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        let hash = hash_client_secret(&plaintext)?;
        Ok(ClientSecret { plaintext, hash })
    }
}

/// Hash a client secret using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string suitable for storage.
pub fn hash_client_secret(secret: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Verify a presented client secret against a stored hash.
pub fn verify_client_secret(secret: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_is_canonical_uuid() {
        let id = SecureCredentialGenerator.new_client_id();
        assert_eq!(id.len(), CLIENT_ID_LEN);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn client_ids_are_unique() {
        let generator = SecureCredentialGenerator;
        assert_ne!(generator.new_client_id(), generator.new_client_id());
    }

    #[test]
    fn client_secret_shape() {
        let secret = SecureCredentialGenerator
            .new_client_secret()
            .expect("generate secret");

        assert_eq!(secret.plaintext().len(), CLIENT_SECRET_LEN);
        assert!(
            secret
                .plaintext()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(secret.hash().starts_with("$argon2id$"));
        assert!(!secret.hash().contains(secret.plaintext()));
    }

    #[test]
    fn client_secret_hash_verifies() {
        let (plaintext, hash) = SecureCredentialGenerator
            .new_client_secret()
            .expect("generate secret")
            .into_parts();

        assert!(verify_client_secret(&plaintext, &hash));
        assert!(!verify_client_secret("not-the-secret", &hash));
    }

    #[test]
    fn same_secret_hashes_differently() {
        let hash1 = hash_client_secret("same-secret").expect("hash");
        let hash2 = hash_client_secret("same-secret").expect("hash");
        assert_ne!(hash1, hash2);
        assert!(verify_client_secret("same-secret", &hash1));
        assert!(verify_client_secret("same-secret", &hash2));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_client_secret("secret", ""));
        assert!(!verify_client_secret("secret", "plain-text-hash"));
    }

    #[test]
    fn debug_redacts_plaintext() {
        let secret = SecureCredentialGenerator
            .new_client_secret()
            .expect("generate secret");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains(secret.plaintext()));
        assert!(rendered.contains("<redacted>"));
    }
}
