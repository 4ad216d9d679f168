//! Terminal feedback backed by an indicatif progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::ui::OutputMode;

use super::{CancellationToken, Feedback};

/// Feedback for the command line.
///
/// In interactive mode a spinner shows the current progress text and the
/// running tool's percentage. Otherwise the bar is hidden and progress text
/// goes to the log.
pub struct ConsoleFeedback {
    bar: ProgressBar,
    token: CancellationToken,
    mode: OutputMode,
}

impl ConsoleFeedback {
    /// Create feedback for the given mode.
    pub fn new(mode: OutputMode, interactive: bool, token: CancellationToken) -> Self {
        let bar = if interactive && mode.shows_spinners() {
            let bar = ProgressBar::new(100);
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("  {spinner:.magenta} {msg} {pos:>3}%")
            {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar, token, mode }
    }

    /// Feedback that shows nothing (for silent runs and tests).
    pub fn hidden(token: CancellationToken) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            token,
            mode: OutputMode::Silent,
        }
    }

    /// The token this feedback reports from.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Show that a stage has started.
    pub fn set_stage(&self, text: &str) {
        self.bar.set_message(text.to_string());
        self.bar.set_position(0);
    }

    /// Run `f` with the bar hidden so it can write to the terminal.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Feedback for ConsoleFeedback {
    fn is_canceled(&self) -> bool {
        self.token.is_canceled()
    }

    fn set_progress_text(&self, text: &str) {
        tracing::info!("{}", text);
        self.bar.set_message(text.to_string());
        self.bar.set_position(0);
    }

    fn set_progress(&self, percent: f64) {
        self.bar.set_position(percent.clamp(0.0, 100.0) as u64);
    }

    fn push_info(&self, info: &str) {
        tracing::debug!("tool: {}", info);
        if self.mode.shows_command_output() {
            if self.bar.is_hidden() {
                println!("    {}", info);
            } else {
                self.bar.println(format!("    {}", info));
            }
        }
    }
}

impl Drop for ConsoleFeedback {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_feedback_reports_token_state() {
        let token = CancellationToken::new();
        let fb = ConsoleFeedback::hidden(token.clone());
        assert!(!fb.is_canceled());
        token.cancel();
        assert!(fb.is_canceled());
    }

    #[test]
    fn non_interactive_bar_is_hidden() {
        let fb = ConsoleFeedback::new(OutputMode::Normal, false, CancellationToken::new());
        fb.set_progress_text("DEM filled");
        fb.set_progress(150.0);
        fb.push_info("line");
        fb.finish();
    }
}
