//! # CLI Module
//!
//! Command-line front end for the `apirouter` binary.
//!
//! ## Commands
//!
//! ### `resolve`
//!
//! Resolve a handler manifest and print the ordered route table:
//!
//! ```bash
//! apirouter resolve --manifest handlers.yaml --format json
//! ```
//!
//! Exits non-zero if any declaration is invalid; nothing is printed then.
//!
//! ### `check`
//!
//! Report every problem in a manifest instead of stopping at the first:
//!
//! ```bash
//! apirouter check --manifest handlers.yaml --fail-on-error
//! ```
//!
//! ### `watch`
//!
//! Resolve once, then rebuild whenever the manifest changes. A broken edit
//! is logged and the previous table stays in place:
//!
//! ```bash
//! APIROUTER_LOG_FORMAT=pretty apirouter watch --manifest handlers.yaml
//! ```
//!
//! All commands take `--config <FILE>` (or `APIROUTER_CONFIG`) naming a
//! router config with the metadata names to ignore.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{render_table, render_text, run, run_cli, Cli, Commands, OutputFormat};
