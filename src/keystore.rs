//! Identifier to key-material map.
//!
//! Entries are raw content-key bytes or a P-256 private key with the label
//! mixed into the DH context. The top-level operations read a process-wide
//! store; every operation also has a `_with_keystore` form taking a
//! caller-owned store, so the singleton is a convenience rather than a
//! requirement.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use p256::SecretKey;
use zeroize::Zeroize;

/// Key material registered under an identifier.
#[derive(Clone)]
pub(crate) enum KeyEntry {
    /// Raw bytes fed to HKDF as-is.
    Raw(Vec<u8>),
    /// ECDH private key plus the context label it was registered with.
    Ecdh { secret: SecretKey, label: String },
}

impl Drop for KeyEntry {
    fn drop(&mut self) {
        // SecretKey zeroizes itself on drop.
        if let KeyEntry::Raw(key) = self {
            key.zeroize();
        }
    }
}

/// Thread-safe keystore: concurrent readers, serialized writers.
pub struct KeyStore {
    entries: RwLock<HashMap<String, KeyEntry>>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register raw key bytes under `id`, replacing any previous entry.
    pub fn save_raw(&self, id: &str, key: &[u8]) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), KeyEntry::Raw(key.to_vec()));
    }

    /// Register an ECDH private key and its DH context label under `id`.
    pub fn save_ecdh(&self, id: &str, secret: SecretKey, label: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id.to_string(),
                KeyEntry::Ecdh {
                    secret,
                    label: label.to_string(),
                },
            );
    }

    pub(crate) fn get(&self, id: &str) -> Option<KeyEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_KEYSTORE: OnceLock<KeyStore> = OnceLock::new();

/// The process-wide keystore backing the top-level operations.
pub fn default_keystore() -> &'static KeyStore {
    DEFAULT_KEYSTORE.get_or_init(KeyStore::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecdh::generate_keypair;

    #[test]
    fn raw_entry_round_trips() {
        let store = KeyStore::new();
        store.save_raw("k1", &[7u8; 16]);
        match &store.get("k1") {
            Some(KeyEntry::Raw(key)) => assert_eq!(key, &[7u8; 16]),
            _ => panic!("expected raw entry"),
        }
    }

    #[test]
    fn missing_entry_is_none() {
        assert!(KeyStore::new().get("nope").is_none());
    }

    #[test]
    fn saving_twice_overwrites() {
        let store = KeyStore::new();
        store.save_raw("k1", &[1u8; 16]);
        store.save_raw("k1", &[2u8; 16]);
        match &store.get("k1") {
            Some(KeyEntry::Raw(key)) => assert_eq!(key[0], 2),
            _ => panic!("expected raw entry"),
        }
    }

    #[test]
    fn ecdh_entry_keeps_its_label() {
        let store = KeyStore::new();
        let (secret, _) = generate_keypair();
        store.save_ecdh("recipient", secret, "P-256");
        match &store.get("recipient") {
            Some(KeyEntry::Ecdh { label, .. }) => assert_eq!(label, "P-256"),
            _ => panic!("expected ecdh entry"),
        }
    }

    #[test]
    fn raw_overwrite_can_change_kind() {
        let store = KeyStore::new();
        let (secret, _) = generate_keypair();
        store.save_ecdh("id", secret, "P-256");
        store.save_raw("id", &[3u8; 16]);
        assert!(matches!(store.get("id"), Some(KeyEntry::Raw(_))));
    }

    #[test]
    fn default_store_is_shared() {
        default_keystore().save_raw("keystore-test-shared", &[9u8; 16]);
        assert!(default_keystore().get("keystore-test-shared").is_some());
    }
}
