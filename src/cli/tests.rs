#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Unit tests for CLI commands

use crate::cli::{render_table, render_text, Cli, Commands, OutputFormat};
use crate::spec::{HttpMethod, RouteSpec};
use crate::table::RouteTableBuilder;
use clap::Parser;

#[test]
fn test_resolve_command_defaults() {
    let cli = Cli::try_parse_from(["apirouter", "resolve", "--manifest", "handlers.yaml"]).unwrap();

    match cli.command {
        Commands::Resolve {
            manifest, format, ..
        } => {
            assert_eq!(manifest.to_string_lossy(), "handlers.yaml");
            assert_eq!(format, OutputFormat::Text);
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn test_resolve_command_with_format_and_config() {
    let cli = Cli::try_parse_from([
        "apirouter",
        "resolve",
        "-m",
        "handlers.json",
        "--config",
        "router.toml",
        "--format",
        "yaml",
    ])
    .unwrap();

    match cli.command {
        Commands::Resolve {
            config, format, ..
        } => {
            assert_eq!(config.unwrap().to_string_lossy(), "router.toml");
            assert_eq!(format, OutputFormat::Yaml);
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn test_check_command_with_flags() {
    let cli = Cli::try_parse_from([
        "apirouter",
        "check",
        "--manifest",
        "handlers.yaml",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Check {
            manifest,
            errors_only,
            fail_on_error,
            ..
        } => {
            assert_eq!(manifest.to_string_lossy(), "handlers.yaml");
            assert!(errors_only);
            assert!(fail_on_error);
        }
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["apirouter", "resolve", "--manifest", "m.yaml"],
        vec!["apirouter", "check", "--manifest", "m.yaml"],
        vec!["apirouter", "watch", "--manifest", "m.yaml"],
    ];
    for args in commands {
        assert!(Cli::try_parse_from(&args).is_ok(), "failed to parse {args:?}");
    }
}

#[test]
fn test_manifest_is_required() {
    assert!(Cli::try_parse_from(["apirouter", "resolve"]).is_err());
    assert!(Cli::try_parse_from(["apirouter", "resolve", "-m", "x", "--format", "csv"]).is_err());
}

fn sample_table() -> crate::table::RouteTable {
    let mut show = RouteSpec::new("/users/<id>");
    show.handler = Some("Users".into());
    show.actions = vec!["show".into(), "read".into()];

    let mut delete = RouteSpec::new("/users/<id>");
    delete.handler = Some("Users".into());
    delete.method = Some(HttpMethod::Delete);
    delete.action = Some("delete".into());
    delete.disabled = true;

    let mut builder = RouteTableBuilder::new();
    builder.push(0, delete);
    builder.push(0, show);
    builder.build()
}

#[test]
fn test_render_text() {
    let text = render_text(&sample_table());
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "[routes] count=2");
    assert_eq!(
        lines[1],
        "[route] #0 /users/<id> -> Users (DELETE delete) format=json [disabled]"
    );
    assert_eq!(
        lines[2],
        "[route] #1 /users/<id> -> Users (* show, GET read) format=json"
    );
}

#[test]
fn test_render_json_and_yaml() {
    let table = sample_table();

    let json = render_table(&table, OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["method"], "DELETE");
    assert_eq!(parsed[1]["actions"][0], "show");

    let yaml = render_table(&table, OutputFormat::Yaml).unwrap();
    let parsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed[1]["path"], "/users/<id>");
}
