//! In-memory store for tests and ephemeral hosts.

use std::collections::BTreeMap;
use std::net::IpAddr;

use parking_lot::RwLock;

use super::{IpBlockList, LeecherStore, StoreError};

/// Non-persistent store implementing both [`LeecherStore`] and [`IpBlockList`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    leechers: RwLock<Vec<String>>,
    blocked: RwLock<BTreeMap<IpAddr, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a leecher list.
    pub fn with_leechers<I, S>(leechers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            leechers: RwLock::new(leechers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn leechers(&self) -> Vec<String> {
        self.leechers.read().clone()
    }
}

impl LeecherStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.leechers.read().clone())
    }

    fn save(&self, leechers: &[String]) -> Result<(), StoreError> {
        *self.leechers.write() = leechers.to_vec();
        Ok(())
    }
}

impl IpBlockList for MemoryStore {
    fn contains(&self, ip: &IpAddr) -> bool {
        self.blocked.read().contains_key(ip)
    }

    fn append(&self, ip: IpAddr, user: &str) -> Result<(), StoreError> {
        self.blocked.write().entry(ip).or_insert_with(|| user.to_owned());
        Ok(())
    }

    fn entries(&self) -> Vec<(IpAddr, String)> {
        self.blocked
            .read()
            .iter()
            .map(|(ip, user)| (*ip, user.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leecher_roundtrip() {
        let store = MemoryStore::with_leechers(["alice"]);
        assert_eq!(store.load().unwrap(), vec!["alice".to_owned()]);

        store
            .save(&["alice".to_owned(), "bob".to_owned()])
            .unwrap();
        assert_eq!(store.leechers().len(), 2);
    }

    #[test]
    fn test_block_keeps_first_user() {
        let store = MemoryStore::new();
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(!store.contains(&ip));
        store.append(ip, "alice").unwrap();
        store.append(ip, "bob").unwrap();

        assert!(store.contains(&ip));
        assert_eq!(store.entries(), vec![(ip, "alice".to_owned())]);
    }
}
