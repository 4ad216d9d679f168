//! Feedback that records everything it is told.

use std::sync::Mutex;

use super::{CancellationToken, Feedback};

/// Feedback implementation for tests.
///
/// Captures progress texts, percentages and tool output, and can be told to
/// cancel itself as soon as a given progress text is reported.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    token: CancellationToken,
    cancel_after: Option<String>,
    texts: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
    percents: Mutex<Vec<f64>>,
}

impl RecordingFeedback {
    /// Create a recorder that never cancels on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that cancels once `text` is reported.
    pub fn cancel_after(text: &str) -> Self {
        Self {
            cancel_after: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Create a recorder observing an existing token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Default::default()
        }
    }

    /// The token this recorder reports from.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Progress texts in the order reported.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Tool output lines in the order reported.
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().map(|i| i.clone()).unwrap_or_default()
    }

    /// Percentages in the order reported.
    pub fn percents(&self) -> Vec<f64> {
        self.percents.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Feedback for RecordingFeedback {
    fn is_canceled(&self) -> bool {
        self.token.is_canceled()
    }

    fn set_progress_text(&self, text: &str) {
        if let Ok(mut texts) = self.texts.lock() {
            texts.push(text.to_string());
        }
        if self.cancel_after.as_deref() == Some(text) {
            self.token.cancel();
        }
    }

    fn set_progress(&self, percent: f64) {
        if let Ok(mut percents) = self.percents.lock() {
            percents.push(percent);
        }
    }

    fn push_info(&self, info: &str) {
        if let Ok(mut infos) = self.infos.lock() {
            infos.push(info.to_string());
        }
    }
}
