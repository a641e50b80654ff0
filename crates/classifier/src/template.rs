//! Warning message templates.
//!
//! Placeholders are substituted with live configuration values at send time,
//! so changing a threshold changes the wording without editing the template.

use crate::config::ClassifierConfig;

/// Placeholder for the configured minimum file count.
pub const FILES_PLACEHOLDER: &str = "%files%";

/// Placeholder for the configured minimum folder count.
pub const FOLDERS_PLACEHOLDER: &str = "%folders%";

/// Multi-line message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate<'a> {
    text: &'a str,
}

impl<'a> MessageTemplate<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Render into one message per non-blank line.
    pub fn render(&self, config: &ClassifierConfig) -> Vec<String> {
        let files = config.min_files.to_string();
        let folders = config.min_folders.to_string();

        self.text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.replace(FILES_PLACEHOLDER, &files)
                    .replace(FOLDERS_PLACEHOLDER, &folders)
            })
            .collect()
    }
}
