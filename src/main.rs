//! remote-dump1090 - send data from a dump1090 instance to another instance
//!
//! Connects to a source (for example a dump1090 raw output port) and a
//! destination (another instance's raw input port) and copies everything
//! the source emits to the destination, reconnecting either side whenever
//! it drops.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};

use remote_dump1090::cli::{self, CliArgs};
use remote_dump1090::config::{Config, ConfigManager};
use remote_dump1090::logging::{self, LogSink};
use remote_dump1090::{signal, Relay};

/// Exit status for argument and configuration errors
const EXIT_USAGE: u8 = 2;
/// Exit status for fatal conditions raised by the relay core
const EXIT_FATAL: u8 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Writes to a vanished peer must fail with EPIPE, not kill us
    if let Err(e) = signal::ignore_broken_pipe() {
        eprintln!("error: failed to ignore SIGPIPE: {}", e);
        return ExitCode::from(EXIT_FATAL);
    }

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", CliArgs::usage());
            let sink = LogSink::from_flag(cli::wants_syslog(std::env::args()));
            if logging::init(sink, &Config::default().logging.level).is_err() {
                eprintln!("error: {}", cli::describe_error(&e));
            }
            error!("{}", cli::describe_error(&e));
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let sink = LogSink::from_flag(args.syslog);
    let config = match ConfigManager::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            if logging::init(sink, &Config::default().logging.level).is_err() {
                eprintln!("error: {:#}", e);
            }
            error!("{:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if let Err(e) = logging::init(sink, &config.logging.level) {
        eprintln!("error: {:#}", e);
        return ExitCode::from(EXIT_FATAL);
    }

    let source = args.source();
    let destination = args.destination();
    info!(
        "Starting remote-dump1090 v{}: relaying {} -> {}",
        env!("CARGO_PKG_VERSION"),
        source,
        destination
    );

    let relay = Relay::from_config(source, destination, &config.relay);
    match relay.run().await {
        Ok(never) => match never {},
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
