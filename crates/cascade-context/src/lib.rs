//! Cascade Context
//!
//! Nested scopes contribute partial configuration for named component kinds.
//! Outer scopes supply defaults, inner scopes override them, and every scope
//! sees one fully composed, immutable [`Snapshot`].
//!
//! # Core Operations
//!
//! - **Read**: [`Scope::current_snapshot`] returns what the calling point
//!   sees (the empty snapshot at the root)
//! - **Provide**: [`Provider::provide`] composes a [`Layer`] onto the parent
//!   scope and builds a subtree in the result
//! - **Resolve**: [`resolve_props`] splices a component's overrides into its
//!   own props
//!
//! # Architecture
//!
//! ```text
//! Scope::root() ─▶ Provider(outer) ─▶ Scope ─▶ Provider(inner) ─▶ Scope ─▶ resolve_props
//!                       │                            │
//!                   memo on (inherited id, layer id), stability diagnostic
//! ```
//!
//! # Example
//!
//! ```
//! use cascade_context::{Layer, Provider, Scope};
//! use cascade_value::PropMap;
//!
//! let outer = Layer::new([("Card", PropMap::new().with("elevation", 10))]);
//! let inner = Layer::new([(
//!     "Card",
//!     PropMap::new().with("style", PropMap::new().with("background", "white")),
//! )]);
//!
//! let mut outer_provider = Provider::new("outer");
//! let mut inner_provider = Provider::new("inner");
//!
//! let subtree = outer_provider.provide(&Scope::root(), &outer, |scope| {
//!     inner_provider.provide(scope, &inner, |scope| scope.current_snapshot().to_json())
//! });
//!
//! assert_eq!(
//!     subtree.output.output,
//!     serde_json::json!({"Card": {"elevation": 10, "style": {"background": "white"}}})
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cascade;
pub mod config;
pub mod connect;
pub mod diagnostics;
pub mod error;
mod handle;
mod layer;
mod provider;
mod scope;
mod snapshot;
mod tree;

// Re-exports for convenience
pub use cascade::{compose, compose_or_reuse, is_noop};
pub use config::{CascadeConfig, DiagnosticMode, DIAGNOSTICS_ENV};
pub use connect::{resolve_props, Connected};
pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use error::{ConfigError, LayerError};
pub use handle::HandleId;
pub use layer::{Layer, LayerBuilder};
pub use provider::{ComposedSubtree, Provider, ProviderStats};
pub use scope::{Scope, ScopePath};
pub use snapshot::{Components, Snapshot};
pub use tree::ScopeTree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the cascade
    pub use crate::config::CascadeConfig;
    pub use crate::connect::{resolve_props, Connected};
    pub use crate::layer::Layer;
    pub use crate::provider::Provider;
    pub use crate::scope::Scope;
    pub use crate::snapshot::Snapshot;
    pub use crate::tree::ScopeTree;
    pub use cascade_value::{OpaqueValue, PropMap, PropValue};
}
