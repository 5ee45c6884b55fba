//! Process Signal Configuration
//!
//! The relay writes to sockets whose peer may vanish at any moment. By
//! default such a write raises `SIGPIPE`, which terminates the process.
//! [`ignore_broken_pipe`] must run before [`crate::relay::Relay::run`] so
//! the condition surfaces as an ordinary `EPIPE` write error instead.

use std::io;

/// Ignore `SIGPIPE` for the whole process.
#[cfg(unix)]
pub fn ignore_broken_pipe() -> io::Result<()> {
    // SAFETY: installing SIG_IGN has no handler code to race with and is
    // done once at startup.
    let previous = unsafe { libc::signal(libc::SIGPIPE, libc::SIG_IGN) };
    if previous == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    tracing::trace!("SIGPIPE is now ignored");
    Ok(())
}

/// Broken pipes never raise a signal on this platform.
#[cfg(not(unix))]
pub fn ignore_broken_pipe() -> io::Result<()> {
    Ok(())
}
