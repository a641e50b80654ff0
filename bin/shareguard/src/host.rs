//! In-process host backing the classifier during a replay.

use std::collections::{BTreeSet, HashMap};

use parking_lot::Mutex;
use shareguard_classifier::{ClassifierHost, MessageOptions, UserStats};
use tracing::info;

/// Keeps the network filter in memory and learns watched stats from the
/// replayed event stream.
#[derive(Debug, Default)]
pub(crate) struct ReplayHost {
    buddies: Vec<String>,
    banned: Mutex<BTreeSet<String>>,
    ignored: Mutex<BTreeSet<String>>,
    watched: Mutex<HashMap<String, UserStats>>,
    messages_sent: Mutex<usize>,
}

impl ReplayHost {
    pub(crate) fn new(buddies: Vec<String>) -> Self {
        Self {
            buddies,
            ..Self::default()
        }
    }

    /// Cache stats the way a peer watcher would.
    pub(crate) fn watch(&self, user: &str, stats: UserStats) {
        self.watched.lock().insert(user.to_owned(), stats);
    }

    pub(crate) fn is_banned(&self, user: &str) -> bool {
        self.banned.lock().contains(user)
    }

    pub(crate) fn is_ignored(&self, user: &str) -> bool {
        self.ignored.lock().contains(user)
    }

    pub(crate) fn messages_sent(&self) -> usize {
        *self.messages_sent.lock()
    }
}

impl ClassifierHost for ReplayHost {
    fn buddy_list(&self) -> Vec<String> {
        self.buddies.clone()
    }

    fn ban_user(&self, user: &str) {
        self.banned.lock().insert(user.to_owned());
    }

    fn unban_user(&self, user: &str) {
        self.banned.lock().remove(user);
    }

    fn ignore_user(&self, user: &str) {
        self.ignored.lock().insert(user.to_owned());
    }

    fn unignore_user(&self, user: &str) {
        self.ignored.lock().remove(user);
    }

    fn request_user_shares(&self, user: &str) {
        info!(user, "share browse requested");
    }

    fn watched_stats(&self, user: &str) -> Option<UserStats> {
        self.watched.lock().get(user).copied()
    }

    fn send_private_message(&self, user: &str, text: &str, options: MessageOptions) {
        *self.messages_sent.lock() += 1;
        info!(user, show_ui = options.show_ui, "private message: {text}");
    }
}
