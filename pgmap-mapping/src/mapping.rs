//! The tagged mapping variant shared across the registry.
//!
//! Mappings are immutable values: a scalar or a container, with all
//! transformations (`with_store_type`, `make_non_nullable`) producing new
//! instances. This replaces a deep clone-override hierarchy with two
//! variants and explicit transforms.

use pgmap_result::Result;
use pgmap_types::{HostType, Value};

use crate::comparer::ValueComparer;
use crate::container::ContainerMapping;
use crate::scalar::ScalarMapping;

/// A resolved correspondence between one host type and one store type.
#[derive(Debug, Clone)]
pub enum TypeMapping {
    Scalar(ScalarMapping),
    Container(ContainerMapping),
}

impl TypeMapping {
    /// The store-side type name, including any size/precision suffix or
    /// array marker.
    pub fn store_type(&self) -> &str {
        match self {
            TypeMapping::Scalar(m) => m.store_type(),
            TypeMapping::Container(m) => m.store_type(),
        }
    }

    /// The host type this mapping serves.
    pub fn host_type(&self) -> HostType {
        match self {
            TypeMapping::Scalar(m) => m.host_type().clone(),
            TypeMapping::Container(m) => m.host_type(),
        }
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, TypeMapping::Container(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarMapping> {
        match self {
            TypeMapping::Scalar(m) => Some(m),
            TypeMapping::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerMapping> {
        match self {
            TypeMapping::Container(m) => Some(m),
            TypeMapping::Scalar(_) => None,
        }
    }

    /// Render a value as a store literal. `NULL` is uniform across types.
    pub fn generate_literal(&self, value: &Value) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        match self {
            TypeMapping::Scalar(m) => m.generate_literal(value),
            TypeMapping::Container(m) => m.generate_literal(value),
        }
    }

    /// Last-mile parameter normalization before binding.
    pub fn configure_parameter(&self, value: Value) -> Value {
        match self {
            TypeMapping::Scalar(m) => m.configure_parameter(value),
            TypeMapping::Container(m) => m.configure_parameter(value),
        }
    }

    /// The comparer governing equality/hash/snapshot for this mapping.
    /// Scalars without a registered comparer use the value model's native
    /// equality contract.
    pub fn comparer(&self) -> ValueComparer {
        match self {
            TypeMapping::Scalar(m) => m
                .custom_comparer()
                .cloned()
                .unwrap_or_else(ValueComparer::native),
            TypeMapping::Container(m) => m.comparer().clone(),
        }
    }

    /// The mapping-specific comparer, if one was registered. Containers
    /// always carry one.
    pub fn custom_comparer(&self) -> Option<&ValueComparer> {
        match self {
            TypeMapping::Scalar(m) => m.custom_comparer(),
            TypeMapping::Container(m) => Some(m.comparer()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    #[test]
    fn null_literal_is_uniform() {
        let mapping = TypeMapping::Scalar(builtin::integer());
        assert_eq!(mapping.generate_literal(&Value::Null).unwrap(), "NULL");
    }

    #[test]
    fn scalar_accessors_round_trip() {
        let mapping = TypeMapping::Scalar(builtin::text());
        assert!(!mapping.is_container());
        assert!(mapping.as_scalar().is_some());
        assert!(mapping.as_container().is_none());
        assert_eq!(mapping.store_type(), "text");
        assert_eq!(mapping.host_type(), HostType::Text);
    }
}
