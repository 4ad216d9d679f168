//! Progress reporting and cancellation.
//!
//! The pipeline and toolbox never talk to the terminal directly. They report
//! through a [`Feedback`] implementation supplied by whoever runs them:
//! - [`ConsoleFeedback`] drives a progress bar for the CLI
//! - [`RecordingFeedback`] captures everything for assertions in tests
//!
//! Cancellation is signalled through a [`CancellationToken`], which the CLI
//! wires to SIGINT.

mod cancel;
mod console;
mod recording;

pub use cancel::{install_interrupt_handler, CancellationToken};
pub use console::ConsoleFeedback;
pub use recording::RecordingFeedback;

/// Sink for progress information and source of cancellation requests.
pub trait Feedback {
    /// Whether the user asked to stop.
    fn is_canceled(&self) -> bool;

    /// Replace the current progress text.
    fn set_progress_text(&self, text: &str);

    /// Report completion of the current tool, 0 to 100.
    fn set_progress(&self, percent: f64);

    /// Informational console output from a delegated tool.
    fn push_info(&self, info: &str);
}
