//! Persisted list of users previously confirmed as leechers.

use tracing::warn;

use crate::store::{LeecherStore, StoreError};

/// Confirmed leechers, kept in insertion order and written through to a
/// [`LeecherStore`] on every change.
pub struct LeecherRegistry {
    leechers: Vec<String>,
    store: Box<dyn LeecherStore>,
}

impl std::fmt::Debug for LeecherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeecherRegistry")
            .field("leechers", &self.leechers)
            .finish_non_exhaustive()
    }
}

impl LeecherRegistry {
    /// Load the list from `store`. Duplicate entries are collapsed.
    pub fn load(store: impl LeecherStore + 'static) -> Result<Self, StoreError> {
        let mut leechers: Vec<String> = Vec::new();
        for user in store.load()? {
            if !leechers.contains(&user) {
                leechers.push(user);
            }
        }

        Ok(Self {
            leechers,
            store: Box::new(store),
        })
    }

    /// Empty registry backed by a [`MemoryStore`](crate::store::MemoryStore).
    pub fn ephemeral() -> Self {
        Self {
            leechers: Vec::new(),
            store: Box::new(crate::store::MemoryStore::new()),
        }
    }

    pub fn contains(&self, user: &str) -> bool {
        self.leechers.iter().any(|u| u == user)
    }

    /// Add a user. Returns true if the user was not listed before.
    pub fn insert(&mut self, user: &str) -> bool {
        if self.contains(user) {
            return false;
        }
        self.leechers.push(user.to_owned());
        self.persist();
        true
    }

    /// Remove a user. Returns true if the user was listed.
    pub fn remove(&mut self, user: &str) -> bool {
        let before = self.leechers.len();
        self.leechers.retain(|u| u != user);
        if self.leechers.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn users(&self) -> &[String] {
        &self.leechers
    }

    pub fn len(&self) -> usize {
        self.leechers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leechers.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.leechers) {
            warn!(error = %e, "failed to persist leecher list");
        }
    }
}
