//! Type mapping core: the correspondence between host in-memory values and
//! store column types.
//!
//! A [`TypeMapping`] knows one store type: its name, its host type, how to
//! render a value as a store literal, how to normalize a value before
//! parameter binding, and how two values of the type are compared, hashed
//! and snapshotted for change tracking. The [`TypeMappingRegistry`] is the
//! two-keyed catalog (store-type name, host type) that resolves mappings,
//! synthesizing parametrized and container variants on demand and caching
//! them for concurrent reuse.

#![forbid(unsafe_code)]

pub mod builtin;
pub mod comparer;
pub mod container;
pub mod mapping;
pub mod registry;
pub mod scalar;

pub use comparer::{ComparerTier, ValueComparer, container_comparer};
pub use container::{ContainerKind, ContainerMapping};
pub use mapping::TypeMapping;
pub use registry::{MappingPlugin, RegistryBuilder, ResolveRequest, TypeMappingRegistry};
pub use scalar::{ScalarMapping, ValueConverter};
