//! # Hot Reload Module
//!
//! Rebuilds the route table when the handler manifest changes.
//!
//! ## Overview
//!
//! A rebuild is a full resolution pass: the manifest is re-read, every
//! declaration is validated again and a brand-new [`RouteTable`] is built.
//! The shared table lives in an [`ArcSwap`]; a successful rebuild replaces it
//! in one atomic store, so readers see either the old table or the new one and
//! never a partially built one.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use apirouter::config::RouterConfig;
//! use apirouter::hot_reload::{rebuild_table, watch_manifest};
//! use arc_swap::ArcSwap;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = RouterConfig::default();
//! let path = Path::new("handlers.yaml");
//! let table = Arc::new(ArcSwap::from_pointee(rebuild_table(path, &config)?));
//!
//! let _watcher = watch_manifest(path, config, Arc::clone(&table), |table| {
//!     println!("Reloaded {} routes", table.len());
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! If the changed manifest fails to load or resolve:
//! - The error is logged
//! - The previous table stays active
//!
//! Saving a half-edited manifest therefore never takes routes away.

use crate::config::RouterConfig;
use crate::manifest::Manifest;
use crate::resolver::resolve_routes;
use crate::table::RouteTable;
use anyhow::Context;
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Run a full resolution pass over the manifest at `path`.
///
/// # Errors
///
/// Fails if the manifest cannot be loaded or any declaration is invalid.
pub fn rebuild_table(path: &Path, config: &RouterConfig) -> anyhow::Result<RouteTable> {
    let manifest = Manifest::load(path, config)?;
    let classes = manifest.handler_classes();
    let routes = resolve_routes(&classes, &manifest)
        .with_context(|| format!("Failed to resolve routes from {}", path.display()))?;
    Ok(RouteTable::from_resolved(routes))
}

/// Rebuild the table and swap it into `shared`.
///
/// On failure `shared` is left untouched.
///
/// # Errors
///
/// Returns the rebuild error.
pub fn reload_into(
    path: &Path,
    config: &RouterConfig,
    shared: &ArcSwap<RouteTable>,
) -> anyhow::Result<Arc<RouteTable>> {
    let table = Arc::new(rebuild_table(path, config)?);
    shared.store(Arc::clone(&table));
    info!(
        manifest = %path.display(),
        routes = table.len(),
        "hot-reload: route table replaced"
    );
    Ok(table)
}

/// Watch the manifest at `path` and rebuild the shared table when it changes.
///
/// `on_reload` receives each successfully built table. The watcher stops when
/// the returned handle is dropped.
///
/// # Errors
///
/// Fails if the watcher cannot be created or the path cannot be watched.
pub fn watch_manifest<P, F>(
    path: P,
    config: RouterConfig,
    shared: Arc<ArcSwap<RouteTable>>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&RouteTable) + Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload_into(&watch_path, &config, &shared) {
                        Ok(table) => on_reload(&table),
                        Err(e) => warn!(
                            manifest = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: rebuild failed, keeping previous route table"
                        ),
                    }
                }
            }
            Err(e) => warn!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
