//! Host notifications in, classifier events out.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notification delivered by the host's peer-session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Loaded,
    UploadQueued {
        user: String,
        #[serde(default)]
        path: String,
    },
    UploadFinished {
        user: String,
    },
    UserStats {
        user: String,
        #[serde(default)]
        files: Option<u64>,
        #[serde(default)]
        folders: Option<u64>,
    },
    AddressResolved {
        user: String,
        ip: IpAddr,
        port: u16,
        #[serde(default)]
        country: Option<String>,
    },
}

impl HostEvent {
    pub fn user(&self) -> Option<&str> {
        match self {
            Self::Loaded => None,
            Self::UploadQueued { user, .. }
            | Self::UploadFinished { user }
            | Self::UserStats { user, .. }
            | Self::AddressResolved { user, .. } => Some(user),
        }
    }
}

/// Decision or enforcement action taken by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierEvent {
    Tracked { user: String },
    ShareRequested { user: String },
    Accepted { user: String, files: u64, folders: u64 },
    Banned { user: String, files: u64, folders: u64 },
    Messaged { user: String, lines: usize },
    IpBlocked { user: String, ip: IpAddr },
    Rechecked { user: String, uploads: u64 },
}

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Non-blocking broadcast emitter. Slow subscribers drop events independently.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<ClassifierEvent>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, event: ClassifierEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClassifierEvent> {
        self.tx.subscribe()
    }
}
