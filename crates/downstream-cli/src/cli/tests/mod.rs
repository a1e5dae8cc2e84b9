//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::{CommandFactory, Parser};

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_serve_defaults() {
    match parse(&["downstream", "serve"]) {
        CliCommand::Serve { listen, upstream } => {
            assert!(listen.is_none());
            assert!(upstream.is_none());
        }
        _ => panic!("expected Serve"),
    }
}

#[test]
fn cli_parse_serve_overrides() {
    match parse(&[
        "downstream",
        "serve",
        "--listen",
        "127.0.0.1:8080",
        "--upstream",
        "http://localhost:7000",
    ]) {
        CliCommand::Serve { listen, upstream } => {
            assert_eq!(listen.as_deref(), Some("127.0.0.1:8080"));
            assert_eq!(upstream.as_deref(), Some("http://localhost:7000"));
        }
        _ => panic!("expected Serve"),
    }
}

#[test]
fn cli_parse_call() {
    match parse(&["downstream", "call", "--upstream", "http://10.0.0.2:7000"]) {
        CliCommand::Call { upstream } => {
            assert_eq!(upstream.as_deref(), Some("http://10.0.0.2:7000"))
        }
        _ => panic!("expected Call"),
    }
}

#[test]
fn cli_parse_upstream_defaults() {
    match parse(&["downstream", "upstream"]) {
        CliCommand::Upstream { listen, graceful } => {
            assert_eq!(listen, "0.0.0.0:7000");
            assert!(!graceful);
        }
        _ => panic!("expected Upstream"),
    }
}

#[test]
fn cli_parse_upstream_graceful() {
    match parse(&["downstream", "upstream", "--graceful", "--listen", "127.0.0.1:7001"]) {
        CliCommand::Upstream { listen, graceful } => {
            assert_eq!(listen, "127.0.0.1:7001");
            assert!(graceful);
        }
        _ => panic!("expected Upstream"),
    }
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["downstream", "download"]).is_err());
}

#[test]
fn cli_upstream_graceful_reads_env() {
    let cmd = Cli::command();
    let upstream = cmd.find_subcommand("upstream").unwrap();
    let graceful = upstream
        .get_arguments()
        .find(|a| a.get_id() == "graceful")
        .unwrap();
    assert_eq!(graceful.get_env(), Some(std::ffi::OsStr::new("GRACEFUL")));
}

