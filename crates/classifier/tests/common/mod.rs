#![allow(dead_code)]

use std::collections::HashMap;

use parking_lot::Mutex;
use shareguard_classifier::{
    ClassifierConfig, ClassifierEvent, ClassifierHost, MessageOptions, UserStats,
};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ban(String),
    Unban(String),
    Ignore(String),
    Unignore(String),
    RequestShares(String),
    Message {
        user: String,
        text: String,
        show_ui: bool,
    },
}

/// Host that records every service call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub buddies: Mutex<Vec<String>>,
    pub stats: Mutex<HashMap<String, UserStats>>,
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingHost {
    pub fn set_stats(&self, user: &str, files: u64, folders: u64) {
        self.stats
            .lock()
            .insert(user.to_owned(), UserStats::new(files, folders));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn bans(&self, user: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, Call::Ban(u) if u == user))
            .count()
    }

    pub fn messages(&self, user: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Message { user: u, text, .. } if u == user => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ClassifierHost for RecordingHost {
    fn buddy_list(&self) -> Vec<String> {
        self.buddies.lock().clone()
    }

    fn ban_user(&self, user: &str) {
        self.calls.lock().push(Call::Ban(user.to_owned()));
    }

    fn unban_user(&self, user: &str) {
        self.calls.lock().push(Call::Unban(user.to_owned()));
    }

    fn ignore_user(&self, user: &str) {
        self.calls.lock().push(Call::Ignore(user.to_owned()));
    }

    fn unignore_user(&self, user: &str) {
        self.calls.lock().push(Call::Unignore(user.to_owned()));
    }

    fn request_user_shares(&self, user: &str) {
        self.calls.lock().push(Call::RequestShares(user.to_owned()));
    }

    fn watched_stats(&self, user: &str) -> Option<UserStats> {
        self.stats.lock().get(user).copied()
    }

    fn send_private_message(&self, user: &str, text: &str, options: MessageOptions) {
        self.calls.lock().push(Call::Message {
            user: user.to_owned(),
            text: text.to_owned(),
            show_ui: options.show_ui,
        });
    }
}

/// Config with every log line enabled so tests exercise the logging paths.
pub fn verbose_config() -> ClassifierConfig {
    ClassifierConfig::default().with_log(shareguard_classifier::LogConfig::verbose())
}

/// Drain everything currently buffered on a subscription.
pub fn drain(rx: &mut broadcast::Receiver<ClassifierEvent>) -> Vec<ClassifierEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
