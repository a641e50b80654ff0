//! Services the classifier needs from the host application.

use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

/// Share statistics for a user. Either count may still be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub files: Option<u64>,
    pub folders: Option<u64>,
}

impl UserStats {
    pub fn new(files: u64, folders: u64) -> Self {
        Self {
            files: Some(files),
            folders: Some(folders),
        }
    }

    /// Both counts, if both are known.
    pub fn counts(&self) -> Option<(u64, u64)> {
        Some((self.files?, self.folders?))
    }
}

/// Presentation hints for a private message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageOptions {
    /// Open a chat tab for the conversation.
    pub show_ui: bool,
    /// Focus the chat tab.
    pub switch_page: bool,
}

/// Host-side peer services, with auto-impl for &, Box, Arc.
///
/// Ban and ignore mutations must be idempotent. Calls must not block on
/// network I/O: `request_user_shares` completes later through a separate
/// stats notification, and `watched_stats` only returns cached values.
#[auto_impl(&, Box, Arc)]
pub trait ClassifierHost {
    /// Current trusted buddies.
    fn buddy_list(&self) -> Vec<String>;

    fn ban_user(&self, user: &str);

    fn unban_user(&self, user: &str);

    fn ignore_user(&self, user: &str);

    fn unignore_user(&self, user: &str);

    /// Ask the peer for its share list; the result arrives as a stats event.
    fn request_user_shares(&self, user: &str);

    /// Cached statistics for a watched user.
    fn watched_stats(&self, user: &str) -> Option<UserStats>;

    /// Fire-and-forget private message.
    fn send_private_message(&self, user: &str, text: &str, options: MessageOptions);
}
