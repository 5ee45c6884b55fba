//! Command-line interface

use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, CommandFactory, Parser};

use crate::endpoint::Endpoint;

pub const DEFAULT_SOURCE_PORT: u16 = 30002;
pub const DEFAULT_DESTINATION_PORT: u16 = 30001;

/// CLI arguments for remote-dump1090
#[derive(Parser, Debug)]
#[command(name = "remote-dump1090")]
#[command(about = "A helper to send data from a dump1090 instance to another instance")]
#[command(version, disable_version_flag = true)]
pub struct CliArgs {
    /// Show version and exit
    #[allow(dead_code)]
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Send output messages to syslog
    #[arg(short = 'l')]
    pub syslog: bool,

    /// Source instance port
    #[arg(short = 's', value_name = "SRC_PORT", default_value_t = DEFAULT_SOURCE_PORT)]
    pub source_port: u16,

    /// Destination instance port
    #[arg(short = 'd', value_name = "DST_PORT", default_value_t = DEFAULT_DESTINATION_PORT)]
    pub destination_port: u16,

    /// Configuration file (TOML)
    #[arg(short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source instance host name
    #[arg(value_name = "SRC_HOST")]
    pub source_host: String,

    /// Destination instance host name
    #[arg(value_name = "DST_HOST")]
    pub destination_host: String,
}

impl CliArgs {
    pub fn source(&self) -> Endpoint {
        Endpoint::new(self.source_host.clone(), self.source_port)
    }

    pub fn destination(&self) -> Endpoint {
        Endpoint::new(self.destination_host.clone(), self.destination_port)
    }

    /// One-line usage string
    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }
}

/// Whether the raw arguments ask for syslog output.
///
/// Used to pick the sink for reporting an argument error, when parsing
/// itself has failed.
pub fn wants_syslog<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().skip(1).any(|arg| arg.as_ref() == "-l")
}

/// Short, single-line description of an argument error for the log.
pub fn describe_error(err: &clap::Error) -> String {
    match (err.kind(), err.get(ContextKind::InvalidArg)) {
        (ErrorKind::MissingRequiredArgument, Some(ContextValue::Strings(args))) => {
            // Report only the first missing host, in argument order
            let first = args
                .first()
                .map(|arg| arg.trim_start_matches('<').trim_end_matches('>'))
                .unwrap_or("argument");
            format!("{} is required", first)
        }
        (ErrorKind::UnknownArgument, Some(ContextValue::String(arg))) => {
            format!("invalid argument: {}", arg)
        }
        _ => err
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("remote-dump1090").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["radar.local", "aggregator.local"]).unwrap();
        assert_eq!(args.source(), Endpoint::new("radar.local", 30002));
        assert_eq!(args.destination(), Endpoint::new("aggregator.local", 30001));
        assert!(!args.syslog);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_ports_attached_and_separate() {
        let args = parse(&["-s4000", "-d", "4001", "-l", "src", "dst"]).unwrap();
        assert_eq!(args.source_port, 4000);
        assert_eq!(args.destination_port, 4001);
        assert!(args.syslog);

        let args = parse(&["src", "-d4001", "dst", "-s", "4000"]).unwrap();
        assert_eq!(args.source(), Endpoint::new("src", 4000));
        assert_eq!(args.destination(), Endpoint::new("dst", 4001));
    }

    #[test]
    fn test_missing_hosts() {
        let err = parse(&["radar.local"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(describe_error(&err), "DST_HOST is required");

        let err = parse(&[]).unwrap_err();
        assert_eq!(describe_error(&err), "SRC_HOST is required");
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse(&["-x", "src", "dst"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
        assert!(describe_error(&err).contains("-x"));
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        let err = parse(&["-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);

        let err = parse(&["-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_wants_syslog() {
        assert!(wants_syslog(["remote-dump1090", "-l", "src"]));
        assert!(!wants_syslog(["remote-dump1090", "src", "dst"]));
        assert!(!wants_syslog(["-l"]));
    }

    #[test]
    fn test_usage_mentions_hosts() {
        let usage = CliArgs::usage();
        assert!(usage.contains("SRC_HOST"));
        assert!(usage.contains("DST_HOST"));
    }
}
