//! # Spec Module
//!
//! Route declarations and their validation.
//!
//! A declaration arrives as a [`RawSpec`] (a JSON object) from a metadata
//! source, attached either to a handler class or to one handler method. The
//! validator turns it into a typed [`RouteSpec`] or rejects it with a
//! [`SpecError`] naming the offending key and the declaration kind.
//!
//! ```rust
//! use apirouter::spec::{validate_spec, SpecKind};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "path": "/users/<id>",
//!     "parameters": { "id": { "type": "int" } },
//!     "format": "xml",
//! });
//! let spec = validate_spec(raw.as_object().unwrap(), SpecKind::Class).unwrap();
//! assert_eq!(spec.placeholders(), vec!["id"]);
//! ```

mod error;
mod types;
mod validate;


pub use error::{SpecError, SpecKind};
pub use types::{
    ActionBinding, Format, HttpMethod, ParamDescriptor, RawSpec, RouteSpec, TagDecl,
    DEFAULT_TAG_COLOR, DESCRIPTOR_KEYS,
};
pub use validate::{known_properties, validate_method_spec, validate_spec};
