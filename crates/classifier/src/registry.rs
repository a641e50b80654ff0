//! Owned per-user bookkeeping for the classifier.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use tracing::trace;

use crate::address::ResolvedAddress;
use crate::error::ClassifierError;
use crate::state::ProbeState;

/// Bundles probe states, resolved addresses, upload counters and the buddy
/// snapshot. Entries are never evicted.
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    probes: HashMap<String, ProbeState>,
    addresses: HashMap<String, ResolvedAddress>,
    upload_counts: HashMap<String, u64>,
    buddies: HashSet<String>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, user: &str) -> Option<ProbeState> {
        self.probes.get(user).copied()
    }

    pub fn is_tracked(&self, user: &str) -> bool {
        self.probes.contains_key(user)
    }

    /// Start tracking a user in `RequestingStats`. Returns false if the user
    /// was already tracked, in which case nothing changes.
    pub fn begin_probe(&mut self, user: &str) -> bool {
        if self.probes.contains_key(user) {
            return false;
        }
        self.probes
            .insert(user.to_owned(), ProbeState::RequestingStats);
        trace!(user, "probe started");
        true
    }

    /// Move a tracked user to `next`, checking the transition table.
    ///
    /// Returns the previous state.
    pub fn advance(&mut self, user: &str, next: ProbeState) -> Result<ProbeState, ClassifierError> {
        let current = self
            .probes
            .get_mut(user)
            .ok_or_else(|| ClassifierError::Untracked(user.to_owned()))?;

        let previous = *current;
        if !previous.can_transition_to(next) {
            return Err(ClassifierError::IllegalTransition {
                user: user.to_owned(),
                from: previous,
                to: next,
            });
        }

        *current = next;
        trace!(user, %previous, %next, "probe state changed");
        Ok(previous)
    }

    /// Count a queued upload for a user and return the new total.
    pub fn record_upload(&mut self, user: &str) -> u64 {
        let count = self.upload_counts.entry(user.to_owned()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn upload_count(&self, user: &str) -> u64 {
        self.upload_counts.get(user).copied().unwrap_or(0)
    }

    /// Insert a resolved address or merge the country into the existing one.
    pub fn merge_address(&mut self, user: &str, ip: IpAddr, port: u16, country: Option<&str>) {
        match self.addresses.get_mut(user) {
            Some(existing) => {
                if existing.merge_country(country) {
                    trace!(user, country = ?existing.country, "country updated");
                }
            }
            None => {
                self.addresses.insert(
                    user.to_owned(),
                    ResolvedAddress::new(ip, port, country.map(str::to_owned)),
                );
            }
        }
    }

    pub fn address(&self, user: &str) -> Option<&ResolvedAddress> {
        self.addresses.get(user)
    }

    /// Replace the buddy snapshot.
    pub fn refresh_buddies<I>(&mut self, buddies: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.buddies = buddies.into_iter().collect();
    }

    pub fn is_buddy(&self, user: &str) -> bool {
        self.buddies.contains(user)
    }

    /// Tracked users and their states, sorted by name.
    pub fn probes(&self) -> Vec<(String, ProbeState)> {
        let mut probes: Vec<_> = self
            .probes
            .iter()
            .map(|(user, state)| (user.clone(), *state))
            .collect();
        probes.sort_by(|a, b| a.0.cmp(&b.0));
        probes
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_begin_probe_once() {
        let mut registry = ProbeRegistry::new();

        assert!(registry.is_empty());
        assert!(registry.begin_probe("alice"));
        assert!(!registry.begin_probe("alice"));
        assert_eq!(registry.state("alice"), Some(ProbeState::RequestingStats));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_advance_checks_table() {
        let mut registry = ProbeRegistry::new();
        registry.begin_probe("alice");

        let previous = registry.advance("alice", ProbeState::PendingLeecher).unwrap();
        assert_eq!(previous, ProbeState::RequestingStats);

        assert_matches!(
            registry.advance("alice", ProbeState::RequestingShares),
            Err(ClassifierError::IllegalTransition {
                from: ProbeState::PendingLeecher,
                to: ProbeState::RequestingShares,
                ..
            })
        );
        assert_eq!(registry.state("alice"), Some(ProbeState::PendingLeecher));
    }

    #[test]
    fn test_advance_untracked() {
        let mut registry = ProbeRegistry::new();
        assert_matches!(
            registry.advance("ghost", ProbeState::Okay),
            Err(ClassifierError::Untracked(user)) if user == "ghost"
        );
        assert!(!registry.is_tracked("ghost"));
    }

    #[test]
    fn test_upload_counter() {
        let mut registry = ProbeRegistry::new();

        assert_eq!(registry.upload_count("alice"), 0);
        assert_eq!(registry.record_upload("alice"), 1);
        assert_eq!(registry.record_upload("alice"), 2);
        assert_eq!(registry.upload_count("alice"), 2);
        assert_eq!(registry.upload_count("bob"), 0);
    }

    #[test]
    fn test_merge_address_keeps_ip_and_port() {
        let mut registry = ProbeRegistry::new();
        let ip: IpAddr = "1.2.3.4".parse().unwrap();

        registry.merge_address("bob", ip, 2234, Some("US"));
        registry.merge_address("bob", "5.6.7.8".parse().unwrap(), 9999, Some("DE"));

        let address = registry.address("bob").unwrap();
        assert_eq!(address.ip, ip);
        assert_eq!(address.port, 2234);
        assert_eq!(address.country.as_deref(), Some("DE"));
    }

    #[test]
    fn test_buddy_snapshot_is_replaced() {
        let mut registry = ProbeRegistry::new();

        registry.refresh_buddies(vec!["carol".to_owned()]);
        assert!(registry.is_buddy("carol"));

        registry.refresh_buddies(vec!["dave".to_owned()]);
        assert!(!registry.is_buddy("carol"));
        assert!(registry.is_buddy("dave"));
    }
}
