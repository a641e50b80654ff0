//! Leecher classification and enforcement for file-sharing peers.
//!
//! Observes upload, stats and address notifications from a host application,
//! decides whether a remote user shares enough to be let through, and bans,
//! ignores, blocks or warns those who do not.

pub mod address;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod leechers;
mod metrics;
pub mod registry;
pub mod state;
pub mod store;
pub mod template;
pub mod traits;

pub use address::ResolvedAddress;
pub use classifier::{Classifier, Verdict};
pub use config::{ClassifierConfig, LogConfig};
pub use error::ClassifierError;
pub use events::{ClassifierEvent, EventEmitter, HostEvent};
pub use leechers::LeecherRegistry;
pub use registry::ProbeRegistry;
pub use state::ProbeState;
pub use store::{FileIpBlockList, FileLeecherStore, IpBlockList, LeecherStore, MemoryStore, StoreError};
pub use template::MessageTemplate;
pub use traits::{ClassifierHost, MessageOptions, UserStats};
