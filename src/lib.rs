//! # apirouter
//!
//! **apirouter** turns declarative route metadata attached to handler classes
//! and their methods into a single, validated, priority-ordered route table
//! for an HTTP dispatcher.
//!
//! ## Overview
//!
//! A handler class may carry a class-level route declaration (the *base
//! spec*); each of its methods may carry its own. Resolution validates every
//! declaration, merges method declarations with the base spec they belong to
//! and orders the result by priority. The output is an immutable
//! [`RouteTable`] that a dispatcher registers in one batch.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Route declarations, their typed form and validation
//! - **[`resolver`]** - Class/method merge rules and the metadata boundary
//! - **[`table`]** - Priority ordering and the dispatcher hand-off
//! - **[`manifest`]** - File-backed metadata source (YAML/JSON)
//! - **[`config`]** - Ignored metadata names, from file or environment
//! - **[`linter`]** - Collect-all diagnostics for a manifest
//! - **[`hot_reload`]** - Rebuild and atomically swap the table on change
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `apirouter` command line
//!
//! ### Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Source as MetadataSource
//!     participant Validator as spec::validate_spec
//!     participant Resolver as RouteResolver
//!     participant Builder as RouteTableBuilder
//!     participant Dispatcher as RouteRegistry
//!
//!     Resolver->>Source: class_spec(class)
//!     Source-->>Resolver: Option<RawSpec>
//!     Resolver->>Validator: validate base spec
//!     loop every method
//!         Resolver->>Source: method_spec(class, method)
//!         Resolver->>Validator: validate override (inherits path)
//!     end
//!     Resolver-->>Builder: Vec<ResolvedRoute>
//!     Builder-->>Dispatcher: prepend_routes(ordered routes)
//! ```
//!
//! Resolution is fail-fast: the first invalid declaration aborts the pass and
//! no partial table is ever produced.
//!
//! ## Quick Start
//!
//! ```rust
//! use apirouter::config::RouterConfig;
//! use apirouter::manifest::Manifest;
//! use apirouter::resolver::resolve_routes;
//! use apirouter::table::RouteTable;
//!
//! let yaml = r#"
//! handlers:
//!   - class: UsersPresenter
//!     annotations:
//!       route:
//!         path: /users/<id>
//!         parameters:
//!           id: { type: int }
//!     methods:
//!       - actionShow
//!       - name: actionDelete
//!         annotations:
//!           route: { method: DELETE }
//! "#;
//!
//! let manifest = Manifest::from_str_with(yaml, "yaml", &RouterConfig::default())?;
//! let routes = resolve_routes(&manifest.handler_classes(), &manifest)?;
//! let table = RouteTable::from_resolved(routes);
//!
//! assert_eq!(table.len(), 2);
//! let first = table.iter().next().unwrap();
//! assert_eq!(first.action.as_deref(), Some("delete"));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Declarations
//!
//! | Key | Meaning |
//! |---|---|
//! | `path` | URL mask with `<name>` placeholders (required) |
//! | `method` | `CREATE`, `READ`, `UPDATE`, `DELETE` or `OPTIONS` |
//! | `parameters` | placeholder name to `{requirement, type, description, default}` |
//! | `priority` | lower sorts earlier, default `0` |
//! | `format` | `json` (default) or `xml` |
//! | `example`, `section`, `description` | informational |
//! | `tags` | names, or name to color (default `#9b59b6`) |
//! | `response_codes` | status code to description |
//! | `disable` | truthy value keeps the route out of the dispatcher |
//! | `handler`, `action` | explicit handler/action names |
//!
//! ## Logging
//!
//! Every resolution pass logs through `tracing`. Binaries call
//! [`logging::init_logging`] once; libraries embedding apirouter install
//! their own subscriber.

pub mod cli;
pub mod config;
pub mod hot_reload;
pub mod linter;
pub mod logging;
pub mod manifest;
pub mod resolver;
pub mod spec;
pub mod table;

pub use config::RouterConfig;
pub use manifest::Manifest;
pub use resolver::{
    resolve_routes, HandlerClass, MetadataError, MetadataSource, ResolveError, ResolvedRoute,
    RouteResolver,
};
pub use spec::{validate_spec, RawSpec, RouteSpec, SpecError, SpecKind};
pub use table::{RouteRegistry, RouteTable, RouteTableBuilder};
