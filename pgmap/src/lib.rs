//! pgmap: type mapping and expression translation for a PostgreSQL-flavored
//! relational store.
//!
//! This crate is the primary entrypoint for the pgmap core. It re-exports
//! the mapping registry, the evaluatability filter and the translator chain
//! from the underlying `pgmap-*` crates, providing a unified API surface for
//! host query-compilation pipelines.
//!
//! # Quick Start
//!
//! Resolve a type mapping and render a literal:
//!
//! ```rust
//! use pgmap::{ResolveRequest, TypeMappingRegistry, Value};
//!
//! let registry = TypeMappingRegistry::with_builtins();
//! let mapping = registry
//!     .resolve(&ResolveRequest::by_store_type("integer[]"))
//!     .unwrap();
//! let literal = mapping
//!     .generate_literal(&Value::Array(vec![Value::Int32(1), Value::Int32(2)]))
//!     .unwrap();
//! assert_eq!(literal, "ARRAY[1,2]");
//! ```
//!
//! # Architecture
//!
//! pgmap is organized as a layered workspace:
//!
//! - **Values and types** (`pgmap-types`): The boundary value model and host
//!   type descriptors.
//! - **Expressions** (`pgmap-expr`): The host expression tree and the
//!   translated SQL fragment form.
//! - **Mapping** (`pgmap-mapping`): Scalar and container type mappings,
//!   comparers, and the two-keyed resolving registry.
//! - **Translation** (`pgmap-translate`): The evaluatability veto chain and
//!   the capability translators (temporal, full-text, network).

// Re-export the registry as the primary user-facing API
pub use pgmap_mapping::{
    ComparerTier, ContainerKind, ContainerMapping, MappingPlugin, RegistryBuilder,
    ResolveRequest, ScalarMapping, TypeMapping, TypeMappingRegistry, ValueComparer,
    ValueConverter,
};

// Re-export the translation boundary
pub use pgmap_translate::{
    CompositeEvaluatabilityFilter, EvaluatabilitySubFilter, TranslatorChain,
};

// Re-export the expression forms hosts construct and consume
pub use pgmap_expr::expr::{
    FullTextMethod, HostCall, HostExpr, HostMember, HostMemberAccess, HostMethod,
    NetworkMethod, TemporalMember, TemporalMethod,
};
pub use pgmap_expr::sql::{SqlExpr, SqlOperator};

// Re-export the value model and result types
pub use pgmap_result::{Error, Result};
pub use pgmap_types::{HostType, Value};

/// Built-in scalar mappings, re-exported for plugin authors who extend the
/// registry with derived mappings.
pub mod builtin {
    pub use pgmap_mapping::builtin::*;
}
