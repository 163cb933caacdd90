//! CLI-specific progress handling for roadgraph
//!
//! Imports have no meaningful byte count once the file is read, so the CLI shows
//! a spinner with elapsed time instead of a bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Creates a spinner for CLI display on stderr
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress manager for a single import
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    pub fn new(message: &str) -> Self {
        Self {
            pb: create_spinner(message),
        }
    }

    pub fn finish(&self, message: String) {
        self.pb.finish_with_message(message);
    }

    /// Stop the spinner and leave the error reporting to the caller
    pub fn fail(&self) {
        self.pb.abandon();
    }
}
