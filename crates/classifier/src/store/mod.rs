//! Persistence for confirmed leechers and blocked IP addresses (memory, file).

mod file;
mod memory;

use std::net::IpAddr;

use auto_impl::auto_impl;
use thiserror::Error;

pub use file::{FileIpBlockList, FileLeecherStore};
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Backing storage for the confirmed-leecher list, with auto-impl for &, Box, Arc.
#[auto_impl(&, Box, Arc)]
pub trait LeecherStore: Send + Sync {
    fn load(&self) -> Result<Vec<String>, StoreError>;

    /// Replace the stored list.
    fn save(&self, leechers: &[String]) -> Result<(), StoreError>;
}

/// Durable IP block list shared with the host's network filter.
#[auto_impl(&, Box, Arc)]
pub trait IpBlockList: Send + Sync {
    fn contains(&self, ip: &IpAddr) -> bool;

    /// Record `ip` as blocked on behalf of `user`. The entry must survive a restart.
    fn append(&self, ip: IpAddr, user: &str) -> Result<(), StoreError>;

    /// All blocked addresses with the user that caused the block.
    fn entries(&self) -> Vec<(IpAddr, String)>;
}
