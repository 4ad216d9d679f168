//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set by the SIGINT handler.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Shared cancellation flag.
///
/// Clones observe the same flag. A token created with
/// [`CancellationToken::with_interrupts`] also reports cancellation once the
/// process has received an interrupt.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    interrupts: bool,
}

impl CancellationToken {
    /// Create a token that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that is also cancelled by SIGINT.
    ///
    /// Requires [`install_interrupt_handler`] to have been called.
    pub fn with_interrupts() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            interrupts: true,
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || (self.interrupts && INTERRUPTED.load(Ordering::SeqCst))
    }
}

#[cfg(unix)]
extern "C" fn on_interrupt(_signum: libc::c_int) {
    // A second interrupt means the user wants out now.
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // SAFETY: signal() and raise() are async-signal-safe.
        unsafe {
            libc::signal(libc::SIGINT, libc::SIG_DFL);
            libc::raise(libc::SIGINT);
        }
    }
}

/// Route SIGINT into cancellation instead of immediate termination.
///
/// Returns whether a handler was installed.
pub fn install_interrupt_handler() -> bool {
    #[cfg(unix)]
    {
        let handler = on_interrupt as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: the handler only touches an atomic and async-signal-safe libc calls.
        let previous = unsafe { libc::signal(libc::SIGINT, handler) };
        let installed = previous != libc::SIG_ERR;
        tracing::debug!("SIGINT handler installed: {}", installed);
        installed
    }

    #[cfg(not(unix))]
    {
        tracing::debug!("SIGINT handling not supported on this platform");
        false
    }
}
