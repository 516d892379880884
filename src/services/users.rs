//! Credential store access: idempotent provisioning and password verification.

use std::sync::Arc;

use crate::auth::password;
use crate::config;
use crate::storage::{JsonStore, StorageError, UserRecord};

/// Accounts seeded into an empty user store. Plaintext passwords exist only
/// here and in transit through provisioning; the store holds salt + hash.
const DEFAULT_USERS: &[(&str, &str)] = &[
    ("admin", "Admin@123456"),
    ("test", "Test@123456"),
];

pub struct UserService {
    store: Arc<JsonStore<UserRecord>>,
}

impl UserService {
    pub fn new(store: Arc<JsonStore<UserRecord>>) -> Self {
        Self { store }
    }

    /// Seed the default accounts, skipped entirely when the store already
    /// holds any users.
    pub fn provision_defaults(&self) -> Result<(), StorageError> {
        let security = &config::config().security;
        let iterations = security.pbkdf2_iterations;
        let key_length = security.derived_key_length;

        self.store.update(|users| {
            if !users.is_empty() {
                tracing::debug!("user store non-empty, skipping provisioning");
                return;
            }
            for (index, (username, plaintext)) in DEFAULT_USERS.iter().enumerate() {
                let salt = password::generate_salt();
                let hash = password::derive_hex(
                    plaintext.as_bytes(),
                    salt.as_bytes(),
                    iterations,
                    key_length,
                );
                users.push(UserRecord {
                    id: (index + 1) as i64,
                    username: username.to_string(),
                    salt,
                    hash,
                });
            }
            tracing::info!(count = users.len(), "provisioned default users");
        })
    }

    /// Verify a credential pair by re-deriving against the stored salt.
    /// Returns the matching record, or None for unknown user or bad password.
    pub fn verify(
        &self,
        username: &str,
        plaintext: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let security = &config::config().security;
        let users = self.store.read()?;
        Ok(users.into_iter().find(|user| {
            user.username == username
                && password::derive_hex(
                    plaintext.as_bytes(),
                    user.salt.as_bytes(),
                    security.pbkdf2_iterations,
                    security.derived_key_length,
                ) == user.hash
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UserService {
        let dir = std::env::temp_dir().join(format!("quill-users-{}", uuid::Uuid::new_v4()));
        let store = Arc::new(JsonStore::open(dir.join("users.json")).unwrap());
        UserService::new(store)
    }

    #[test]
    fn provisioning_seeds_salted_hashes_once() {
        let users = service();
        users.provision_defaults().unwrap();

        let admin = users.verify("admin", "Admin@123456").unwrap().unwrap();
        assert_eq!(admin.id, 1);
        assert!(!admin.salt.is_empty());
        assert_ne!(admin.hash, "Admin@123456");

        // Second provisioning run must not duplicate or reset accounts
        users.provision_defaults().unwrap();
        let again = users.verify("admin", "Admin@123456").unwrap().unwrap();
        assert_eq!(again.salt, admin.salt);
        assert_eq!(again.hash, admin.hash);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let users = service();
        users.provision_defaults().unwrap();
        // Single altered character
        assert!(users.verify("admin", "Admin@123457").unwrap().is_none());
        assert!(users.verify("admin", "").unwrap().is_none());
    }

    #[test]
    fn unknown_user_is_rejected() {
        let users = service();
        users.provision_defaults().unwrap();
        assert!(users.verify("nobody", "Admin@123456").unwrap().is_none());
    }

    #[test]
    fn each_user_gets_a_distinct_salt() {
        let users = service();
        users.provision_defaults().unwrap();
        let admin = users.verify("admin", "Admin@123456").unwrap().unwrap();
        let test = users.verify("test", "Test@123456").unwrap().unwrap();
        assert_ne!(admin.salt, test.salt);
    }
}
