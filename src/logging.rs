//! Logging Setup
//!
//! The sink is chosen once at startup and handed to [`init`]; nothing in
//! the relay core knows where its log lines end up.

use std::io::IsTerminal;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Result;

/// Where log lines are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSink {
    #[default]
    Stderr,
    /// The system log facility
    Syslog,
}

impl LogSink {
    pub fn from_flag(use_syslog: bool) -> Self {
        if use_syslog {
            Self::Syslog
        } else {
            Self::Stderr
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init(sink: LogSink, level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match sink {
        LogSink::Stderr => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_level(true)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .with(env_filter)
            .try_init()
            .context("Failed to install stderr logger")?,
        #[cfg(unix)]
        LogSink::Syslog => {
            syslog::open();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(syslog::SyslogMakeWriter)
                        .without_time()
                        .with_target(false)
                        .with_level(false)
                        .with_ansi(false),
                )
                .with(env_filter)
                .try_init()
                .context("Failed to install syslog logger")?
        }
        #[cfg(not(unix))]
        LogSink::Syslog => anyhow::bail!("syslog output is only available on unix"),
    }

    Ok(())
}

#[cfg(unix)]
pub mod syslog {
    //! `tracing` writer backed by syslog(3).

    use std::ffi::CString;
    use std::io;

    use libc::c_int;
    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    static IDENT: &[u8] = b"remote-dump1090\0";
    static FORMAT: &[u8] = b"%s\0";

    /// Open the connection to the system logger.
    pub fn open() {
        // SAFETY: IDENT is a static NUL-terminated string, as openlog
        // keeps the pointer for the lifetime of the process.
        unsafe { libc::openlog(IDENT.as_ptr().cast(), libc::LOG_PID, libc::LOG_DAEMON) };
    }

    /// Syslog priority for a tracing level
    pub fn priority(level: &Level) -> c_int {
        match *level {
            Level::ERROR => libc::LOG_ERR,
            Level::WARN => libc::LOG_WARNING,
            Level::INFO => libc::LOG_INFO,
            Level::DEBUG | Level::TRACE => libc::LOG_DEBUG,
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct SyslogMakeWriter;

    impl<'a> MakeWriter<'a> for SyslogMakeWriter {
        type Writer = SyslogWriter;

        fn make_writer(&'a self) -> Self::Writer {
            SyslogWriter::new(libc::LOG_INFO)
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            SyslogWriter::new(priority(meta.level()))
        }
    }

    /// Buffers one formatted event and submits it when dropped.
    #[derive(Debug)]
    pub struct SyslogWriter {
        priority: c_int,
        buf: Vec<u8>,
    }

    impl SyslogWriter {
        fn new(priority: c_int) -> Self {
            Self {
                priority,
                buf: Vec::new(),
            }
        }

        fn message(&self) -> Option<CString> {
            let line: Vec<u8> = self
                .buf
                .iter()
                .copied()
                .filter(|&b| b != 0)
                .collect();
            let end = line
                .iter()
                .rposition(|b| !b.is_ascii_whitespace())
                .map_or(0, |i| i + 1);
            if end == 0 {
                return None;
            }
            CString::new(&line[..end]).ok()
        }
    }

    impl io::Write for SyslogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for SyslogWriter {
        fn drop(&mut self) {
            if let Some(msg) = self.message() {
                // SAFETY: both pointers are valid NUL-terminated strings and
                // the message is passed as an argument, never as the format.
                unsafe { libc::syslog(self.priority, FORMAT.as_ptr().cast(), msg.as_ptr()) };
            }
        }
    }

}
