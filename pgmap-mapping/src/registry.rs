//! The two-keyed mapping catalog.
//!
//! Resolution tries, in order: a verbatim store-type name hit (filtered by
//! the host type when the request carries one), a container synthesis for
//! `name[]` requests, a parametrized synthesis for `name(...)` requests,
//! then a host-type lookup with on-demand facet synthesis. Synthesized
//! mappings are memoized so repeated and concurrent resolution of the same
//! request observes a single shared instance.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use pgmap_types::HostType;

use crate::builtin;
use crate::container::{ContainerKind, ContainerMapping};
use crate::mapping::TypeMapping;
use crate::scalar::ScalarMapping;

/// Declared sizes beyond this are treated as unbounded: the store rejects
/// larger varchar length modifiers, so resolution falls back to the
/// unconstrained text mapping.
pub const MAX_TEXT_SIZE: i32 = 10_485_760;

/// One resolution request. Either key may be absent; facets (size,
/// precision, scale) refine whichever key is present.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub store_type: Option<String>,
    pub host_type: Option<HostType>,
    pub size: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<i8>,
}

impl ResolveRequest {
    pub fn by_store_type(store_type: impl Into<String>) -> Self {
        Self {
            store_type: Some(store_type.into()),
            ..Self::default()
        }
    }

    pub fn by_host_type(host_type: HostType) -> Self {
        Self {
            host_type: Some(host_type),
            ..Self::default()
        }
    }

    pub fn with_host_type(mut self, host_type: HostType) -> Self {
        self.host_type = Some(host_type);
        self
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: Option<i8>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }
}

/// Extension point for store plugins (PostGIS-style capability packs,
/// user-defined enum types). Plugins register extra mappings before the
/// registry is frozen.
pub trait MappingPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn register(&self, builder: &mut RegistryBuilder);
}

/// Mutable registration surface. All registration happens here; `freeze`
/// produces the immutable, concurrently-shareable registry.
#[derive(Default)]
pub struct RegistryBuilder {
    by_name: FxHashMap<String, Vec<Arc<TypeMapping>>>,
    by_type: FxHashMap<HostType, Arc<TypeMapping>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-seeded with the built-in store mappings.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        builtin::register_builtins(&mut builder);
        builder
    }

    /// Register a scalar mapping under its base store-type name.
    pub fn register(&mut self, mapping: ScalarMapping) {
        self.register_mapping(TypeMapping::Scalar(mapping));
    }

    /// Register any mapping. The first mapping registered for a host type
    /// becomes that type's default; later candidates for the same name stay
    /// reachable through host-type-constrained name resolution.
    pub fn register_mapping(&mut self, mapping: TypeMapping) {
        let name = match &mapping {
            TypeMapping::Scalar(m) => m.base_store_type().to_string(),
            TypeMapping::Container(m) => m.store_type().to_string(),
        };
        let host_type = mapping.host_type();
        let shared = Arc::new(mapping);
        self.by_name.entry(name).or_default().push(shared.clone());
        self.by_type.entry(host_type).or_insert(shared);
    }

    pub fn apply_plugin(&mut self, plugin: &dyn MappingPlugin) {
        tracing::debug!(plugin = plugin.name(), "applying mapping plugin");
        plugin.register(self);
    }

    pub fn freeze(self) -> TypeMappingRegistry {
        TypeMappingRegistry {
            by_name: self.by_name,
            by_type: self.by_type,
            name_cache: DashMap::new(),
            type_cache: DashMap::new(),
        }
    }
}

/// Immutable mapping catalog with concurrent memoization of synthesized
/// variants.
pub struct TypeMappingRegistry {
    by_name: FxHashMap<String, Vec<Arc<TypeMapping>>>,
    by_type: FxHashMap<HostType, Arc<TypeMapping>>,
    name_cache: DashMap<String, Arc<TypeMapping>>,
    type_cache: DashMap<HostType, Arc<TypeMapping>>,
}

impl TypeMappingRegistry {
    /// Registry holding only the built-in mappings.
    pub fn with_builtins() -> Self {
        RegistryBuilder::with_builtins().freeze()
    }

    /// Resolve a mapping for `request`. Absence of a mapping is a normal
    /// outcome, not an error: the caller decides whether an unmapped type is
    /// fatal in its context.
    ///
    /// A store-type name is authoritative: when one is given and name-based
    /// resolution misses (including a verbatim hit whose candidates all fail
    /// the host-type constraint), the request is NotFound. Host-type lookup
    /// applies only to requests carrying no store-type name.
    pub fn resolve(&self, request: &ResolveRequest) -> Option<Arc<TypeMapping>> {
        let resolved = match (&request.store_type, &request.host_type) {
            (Some(name), _) => self.resolve_by_store_type(name, request),
            (None, Some(ty)) => self.resolve_by_host_type(ty, request),
            (None, None) => None,
        };
        if resolved.is_none() {
            tracing::debug!(request = ?request, "no mapping resolved");
        }
        resolved
    }

    fn resolve_by_store_type(
        &self,
        name: &str,
        request: &ResolveRequest,
    ) -> Option<Arc<TypeMapping>> {
        // The host-type constraint is part of the memo key, so constrained
        // and unconstrained resolutions of one name never alias.
        let key = match &request.host_type {
            Some(ty) => format!("{name}|{ty}"),
            None => name.to_string(),
        };
        if let Some(hit) = self.name_cache.get(&key) {
            return Some(hit.clone());
        }
        let built = self.build_by_store_type(name, request)?;
        Some(self.name_cache.entry(key).or_insert(built).clone())
    }

    fn build_by_store_type(
        &self,
        name: &str,
        request: &ResolveRequest,
    ) -> Option<Arc<TypeMapping>> {
        if let Some(candidates) = self.by_name.get(name) {
            return match &request.host_type {
                Some(ty) => candidates.iter().find(|m| &m.host_type() == ty).cloned(),
                None => candidates.first().cloned(),
            };
        }

        if let Some(element_name) = name.strip_suffix("[]") {
            let mut element_request = ResolveRequest::by_store_type(element_name);
            if let Some(el) = request.host_type.as_ref().and_then(|t| t.element()) {
                element_request.host_type = Some(el.ty.clone());
            }
            let element = self.resolve(&element_request)?;
            let (kind, element_nullable) = match &request.host_type {
                Some(HostType::Array(el)) => (ContainerKind::Array, el.nullable),
                Some(HostType::List(el)) => (ContainerKind::List, el.nullable),
                _ => (ContainerKind::List, true),
            };
            let container = ContainerMapping::new(element, kind, element_nullable).ok()?;
            return Some(Arc::new(TypeMapping::Container(container)));
        }

        if let Some((base, params)) = parse_store_type_params(name) {
            let candidates = self.by_name.get(base)?;
            let base_mapping = match &request.host_type {
                Some(ty) => candidates.iter().find(|m| &m.host_type() == ty)?,
                None => candidates.first()?,
            };
            let scalar = base_mapping.as_scalar()?;
            let synthesized = match params {
                // A single parameter on a decimal base is a precision, not
                // a size.
                TypeParams::Size(size) if scalar.host_type() == &HostType::Decimal => {
                    let precision = u8::try_from(size).ok()?;
                    scalar.with_precision(name, precision, None)
                }
                TypeParams::Size(size) => scalar.with_store_type(name, Some(size)),
                TypeParams::Numeric { precision, scale } => {
                    scalar.with_precision(name, precision, scale)
                }
            };
            return Some(Arc::new(TypeMapping::Scalar(synthesized)));
        }

        None
    }

    fn resolve_by_host_type(
        &self,
        ty: &HostType,
        request: &ResolveRequest,
    ) -> Option<Arc<TypeMapping>> {
        if ty.is_container() {
            if let Some(hit) = self.type_cache.get(ty) {
                return Some(hit.clone());
            }
            let element = ty.element()?;
            let element_mapping =
                self.resolve(&ResolveRequest::by_host_type(element.ty.clone()))?;
            let container = ContainerMapping::from_host_type(ty, element_mapping).ok()?;
            let shared = Arc::new(TypeMapping::Container(container));
            return Some(self.type_cache.entry(ty.clone()).or_insert(shared).clone());
        }

        let base = self.by_type.get(ty)?;

        if let Some(size) = request.size {
            if matches!(ty, HostType::Text | HostType::Char) {
                if size > MAX_TEXT_SIZE {
                    // Over-ceiling sizes fall back to the unbounded mapping.
                    return Some(base.clone());
                }
                let sized_name = match ty {
                    HostType::Char => format!("character({size})"),
                    _ => format!("character varying({size})"),
                };
                let sized_request =
                    ResolveRequest::by_store_type(&sized_name).with_host_type(ty.clone());
                return self.resolve(&sized_request);
            }
        }

        if let Some(precision) = request.precision {
            if *ty == HostType::Decimal {
                let name = match request.scale {
                    Some(scale) => format!("numeric({precision},{scale})"),
                    None => format!("numeric({precision})"),
                };
                return self.resolve(&ResolveRequest::by_store_type(name));
            }
        }

        // Facets that do not apply to this type are ignored rather than
        // treated as a miss.
        Some(base.clone())
    }
}

enum TypeParams {
    Size(i32),
    Numeric { precision: u8, scale: Option<i8> },
}

/// Split `varchar(50)` / `numeric(10,2)` into a base name and its facets.
fn parse_store_type_params(name: &str) -> Option<(&str, TypeParams)> {
    let open = name.find('(')?;
    let inner = name[open + 1..].strip_suffix(')')?;
    let base = name[..open].trim_end();
    if base.is_empty() {
        return None;
    }
    let mut parts = inner.split(',').map(str::trim);
    let first = parts.next()?;
    match parts.next() {
        None => {
            let size: i32 = first.parse().ok()?;
            Some((base, TypeParams::Size(size)))
        }
        Some(second) => {
            if parts.next().is_some() {
                return None;
            }
            let precision: u8 = first.parse().ok()?;
            let scale: i8 = second.parse().ok()?;
            Some((
                base,
                TypeParams::Numeric {
                    precision,
                    scale: Some(scale),
                },
            ))
        }
    }
}
