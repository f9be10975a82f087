use crate::config::RouterConfig;
use crate::hot_reload::{rebuild_table, watch_manifest};
use crate::linter::{has_errors, lint_manifest, print_lint_issues, LintSeverity};
use crate::manifest::Manifest;
use crate::spec::RouteSpec;
use crate::table::RouteTable;
use anyhow::{bail, Context};
use arc_swap::ArcSwap;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for apirouter
///
/// Resolves handler manifests into route tables and checks them for
/// mistakes.
#[derive(Parser)]
#[command(name = "apirouter")]
#[command(version, about = "Route table resolver for handler manifests", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a manifest and print the ordered route table
    Resolve {
        /// Path to the handler manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to the router config (YAML, JSON or TOML)
        #[arg(short, long, env = "APIROUTER_CONFIG")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check every declaration in a manifest and report all issues
    ///
    /// Reports validation errors, unknown annotations, suppressed class
    /// routes, disabled routes, undeclared placeholders and tags without a
    /// color.
    Check {
        /// Path to the handler manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to the router config (YAML, JSON or TOML)
        #[arg(short, long, env = "APIROUTER_CONFIG")]
        config: Option<PathBuf>,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,
    },
    /// Resolve a manifest, then rebuild the table whenever it changes
    Watch {
        /// Path to the handler manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to the router config (YAML, JSON or TOML)
        #[arg(short, long, env = "APIROUTER_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Output format of `resolve`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per route
    Text,
    /// Pretty-printed JSON array
    Json,
    /// YAML sequence
    Yaml,
}

/// Parse the process arguments and execute the command
///
/// # Errors
///
/// Returns an error if:
/// - The manifest or config cannot be loaded
/// - Resolution fails
/// - `check --fail-on-error` finds errors
/// - The watcher cannot be installed
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Execute an already parsed command
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Resolve {
            manifest,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            let table = rebuild_table(&manifest, &config)?;
            print!("{}", render_table(&table, format)?);
            Ok(())
        }
        Commands::Check {
            manifest,
            config,
            errors_only,
            fail_on_error,
        } => {
            let config = load_config(config.as_deref())?;
            let manifest = Manifest::load_unchecked(&manifest)?;
            let mut issues = lint_manifest(&manifest, &config);
            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);

            if fail_on_error && has_errors(&issues) {
                let count = issues
                    .iter()
                    .filter(|i| i.severity == LintSeverity::Error)
                    .count();
                bail!("{count} error(s) found in handler manifest");
            }
            Ok(())
        }
        Commands::Watch { manifest, config } => {
            let config = load_config(config.as_deref())?;
            let table = rebuild_table(&manifest, &config)?;
            print!("{}", render_text(&table));

            let shared = Arc::new(ArcSwap::from_pointee(table));
            let _watcher = watch_manifest(&manifest, config, Arc::clone(&shared), |table| {
                print!("{}", render_text(table));
            })
            .with_context(|| format!("Failed to watch {}", manifest.display()))?;

            info!(manifest = %manifest.display(), "Watching handler manifest for changes");
            loop {
                std::thread::park();
            }
        }
    }
}

/// Config file if given, else defaults; environment entries are appended.
fn load_config(path: Option<&Path>) -> anyhow::Result<RouterConfig> {
    let config = match path {
        Some(path) => RouterConfig::load(path)?,
        None => RouterConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Render the table in the requested format.
///
/// # Errors
///
/// Fails if serialization fails.
pub fn render_table(table: &RouteTable, format: OutputFormat) -> anyhow::Result<String> {
    let routes: Vec<&RouteSpec> = table.iter().collect();
    match format {
        OutputFormat::Text => Ok(render_text(table)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&routes)
                .context("Failed to serialize route table as JSON")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&routes).context("Failed to serialize route table as YAML")
        }
    }
}

/// One line per route: position, verb/action bindings, path and handler.
#[must_use]
pub fn render_text(table: &RouteTable) -> String {
    let mut lines = vec![format!("[routes] count={}", table.len())];
    for (i, route) in table.iter().enumerate() {
        let bindings = route
            .bindings()
            .iter()
            .map(|b| {
                let method = b.method.as_ref().map_or("*", |m| m.as_str());
                format!("{method} {}", b.action)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let handler = route.handler.as_deref().unwrap_or("-");
        let disabled = if route.disabled { " [disabled]" } else { "" };
        lines.push(format!(
            "[route] #{i} {} -> {handler} ({bindings}) format={}{disabled}",
            route.path,
            route.format()
        ));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
