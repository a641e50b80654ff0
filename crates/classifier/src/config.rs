//! Configuration for the classifier.

use serde::{Deserialize, Serialize};

/// Lowest accepted value for `min_files`.
pub const MIN_FILES_FLOOR: u64 = 0;

/// Lowest accepted value for `min_folders`.
pub const MIN_FOLDERS_FLOOR: u64 = 1;

/// Default warning sent to banned users.
pub const DEFAULT_MESSAGE: &str =
    "Please share more files if you wish to download from me again. You are banned until then. Thanks!";

/// Classifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum number of shared files (default: 100).
    pub min_files: u64,
    /// Minimum number of shared folders (default: 20, at least 1).
    pub min_folders: u64,
    /// Minimum total share size in megabytes (default: 1000).
    ///
    /// Carried for hosts that expose it; share size does not take part in
    /// classification.
    pub ban_min_megabytes: u64,
    /// Also block the IP address of banned users, if resolved (default: false).
    pub block_ip_on_ban: bool,
    /// Ignore users who do not meet the requirement (default: false).
    pub ignore_on_ban: bool,
    /// Let buddies bypass the share requirement (default: true).
    pub bypass_buddies: bool,
    /// Open chat tabs when messaging leechers (default: false).
    pub open_private_chat: bool,
    /// Send the warning message to banned users (default: false).
    pub message_banned_users: bool,
    /// Warning template. Each line is sent as its own message.
    pub message: String,
    /// Re-check tracked users every `recheck_interval` queued uploads (default: true).
    pub recheck_enabled: bool,
    /// Queued uploads between re-checks; 0 disables re-checking (default: 10).
    pub recheck_interval: u64,
    pub log: LogConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_files: 100,
            min_folders: 20,
            ban_min_megabytes: 1000,
            block_ip_on_ban: false,
            ignore_on_ban: false,
            bypass_buddies: true,
            open_private_chat: false,
            message_banned_users: false,
            message: DEFAULT_MESSAGE.to_owned(),
            recheck_enabled: true,
            recheck_interval: 10,
            log: LogConfig::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_min_files(mut self, min_files: u64) -> Self {
        self.min_files = min_files;
        self
    }

    pub fn with_min_folders(mut self, min_folders: u64) -> Self {
        self.min_folders = min_folders;
        self
    }

    pub fn with_block_ip_on_ban(mut self, enabled: bool) -> Self {
        self.block_ip_on_ban = enabled;
        self
    }

    pub fn with_ignore_on_ban(mut self, enabled: bool) -> Self {
        self.ignore_on_ban = enabled;
        self
    }

    pub fn with_bypass_buddies(mut self, enabled: bool) -> Self {
        self.bypass_buddies = enabled;
        self
    }

    /// Enable the warning message with the given template.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self.message_banned_users = true;
        self
    }

    pub fn with_recheck(mut self, enabled: bool, interval: u64) -> Self {
        self.recheck_enabled = enabled;
        self.recheck_interval = interval;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Clamp thresholds to their documented minimums.
    pub fn normalize(&mut self) {
        self.min_files = self.min_files.max(MIN_FILES_FLOOR);
        self.min_folders = self.min_folders.max(MIN_FOLDERS_FLOOR);
    }

    /// Interval to re-check on, if re-checking is active.
    pub fn recheck_every(&self) -> Option<u64> {
        (self.recheck_enabled && self.recheck_interval > 0).then_some(self.recheck_interval)
    }

    /// Whether the warning message should be sent at all.
    pub fn sends_message(&self) -> bool {
        self.message_banned_users && !self.message.trim().is_empty()
    }
}

/// Log suppression switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Silence every classifier log line.
    pub suppress_all: bool,
    pub suppress_banned_user_logs: bool,
    /// Silence "meets criteria" lines (default: true).
    pub suppress_accepted_user_logs: bool,
    pub suppress_ip_ban_logs: bool,
    pub suppress_share_request_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            suppress_all: false,
            suppress_banned_user_logs: false,
            suppress_accepted_user_logs: true,
            suppress_ip_ban_logs: false,
            suppress_share_request_logs: false,
        }
    }
}

impl LogConfig {
    /// Everything logged.
    pub fn verbose() -> Self {
        Self {
            suppress_all: false,
            suppress_banned_user_logs: false,
            suppress_accepted_user_logs: false,
            suppress_ip_ban_logs: false,
            suppress_share_request_logs: false,
        }
    }

    pub fn general(&self) -> bool {
        !self.suppress_all
    }

    pub fn banned(&self) -> bool {
        !self.suppress_all && !self.suppress_banned_user_logs
    }

    pub fn accepted(&self) -> bool {
        !self.suppress_all && !self.suppress_accepted_user_logs
    }

    pub fn ip_ban(&self) -> bool {
        !self.suppress_all && !self.suppress_ip_ban_logs
    }

    pub fn share_request(&self) -> bool {
        !self.suppress_all && !self.suppress_share_request_logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.min_files, 100);
        assert_eq!(config.min_folders, 20);
        assert_eq!(config.recheck_interval, 10);
        assert!(config.bypass_buddies);
        assert!(!config.sends_message());
        assert_eq!(config.recheck_every(), Some(10));
    }

    #[test]
    fn test_normalize_clamps_folders() {
        let mut config = ClassifierConfig::default()
            .with_min_files(0)
            .with_min_folders(0);
        config.normalize();

        assert_eq!(config.min_files, 0);
        assert_eq!(config.min_folders, 1);
    }

    #[test]
    fn test_zero_interval_disables_recheck() {
        let config = ClassifierConfig::default().with_recheck(true, 0);
        assert_eq!(config.recheck_every(), None);

        let config = ClassifierConfig::default().with_recheck(false, 5);
        assert_eq!(config.recheck_every(), None);
    }

    #[test]
    fn test_blank_message_is_not_sent() {
        let config = ClassifierConfig::default().with_message("  \n ");
        assert!(!config.sends_message());
    }

    #[test]
    fn test_suppress_all_wins() {
        let log = LogConfig {
            suppress_all: true,
            ..LogConfig::verbose()
        };
        assert!(!log.general());
        assert!(!log.banned());
        assert!(!log.accepted());
        assert!(!log.ip_ban());
        assert!(!log.share_request());

        let log = LogConfig::default();
        assert!(log.banned());
        assert!(!log.accepted());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"min_files": 5, "log": {"suppress_all": true}}"#).unwrap();

        assert_eq!(config.min_files, 5);
        assert_eq!(config.min_folders, 20);
        assert!(config.log.suppress_all);
        assert!(config.log.suppress_accepted_user_logs);
    }
}
