//! Container (array/list) type mappings.
//!
//! A container mapping wraps exactly one element mapping and derives its
//! literal generation, comparer and nullability contract from it. The store
//! models nesting via multi-dimensional arrays, not arrays of arrays, so an
//! element that is itself a container is rejected at construction.

use std::sync::Arc;

use pgmap_result::{Error, Result};
use pgmap_types::{HostType, Value};

use crate::comparer::{ValueComparer, container_comparer};
use crate::mapping::TypeMapping;

/// Whether the host container is a fixed-rank array or a dynamically-sized
/// ordered list. Both share literal and comparer behavior; the distinction
/// only matters for the host-type correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array,
    List,
}

/// Mapping for a homogeneous ordered container of one element type.
#[derive(Debug, Clone)]
pub struct ContainerMapping {
    element: Arc<TypeMapping>,
    kind: ContainerKind,
    element_nullable: bool,
    store_type: String,
    comparer: ValueComparer,
}

impl ContainerMapping {
    /// Wrap `element` as a container mapping.
    ///
    /// Fails with a configuration error if `element` is itself a container
    /// mapping.
    pub fn new(
        element: Arc<TypeMapping>,
        kind: ContainerKind,
        element_nullable: bool,
    ) -> Result<Self> {
        if element.is_container() {
            return Err(Error::configuration(format!(
                "cannot build a container mapping over container mapping '{}'; \
                 the store models nesting as multi-dimensional arrays",
                element.store_type()
            )));
        }
        let store_type = format!("{}[]", element.store_type());
        let comparer = container_comparer(element.custom_comparer().cloned());
        Ok(Self {
            element,
            kind,
            element_nullable,
            store_type,
            comparer,
        })
    }

    /// Build a container mapping from a declared host container type.
    ///
    /// Kind and element nullability come from the declared type, never from
    /// data. Multi-dimensional declarations (a container whose declared
    /// element is itself a container) are rejected.
    pub fn from_host_type(container_ty: &HostType, element: Arc<TypeMapping>) -> Result<Self> {
        let (kind, declared) = match container_ty {
            HostType::Array(el) => (ContainerKind::Array, el),
            HostType::List(el) => (ContainerKind::List, el),
            other => {
                return Err(Error::configuration(format!(
                    "host type {other} is not a container type"
                )));
            }
        };
        if declared.ty.is_container() {
            return Err(Error::configuration(format!(
                "multi-dimensional container type {container_ty} is not supported"
            )));
        }
        Self::new(element, kind, declared.nullable)
    }

    #[inline]
    pub fn element(&self) -> &Arc<TypeMapping> {
        &self.element
    }

    #[inline]
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    #[inline]
    pub fn element_nullable(&self) -> bool {
        self.element_nullable
    }

    #[inline]
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    pub fn comparer(&self) -> &ValueComparer {
        &self.comparer
    }

    /// Host type this mapping corresponds to.
    pub fn host_type(&self) -> HostType {
        let element = self.element.host_type().clone();
        match self.kind {
            ContainerKind::Array => HostType::array_of(element, self.element_nullable),
            ContainerKind::List => HostType::list_of(element, self.element_nullable),
        }
    }

    /// New mapping asserting that no element may be null. Only the declared
    /// contract changes; no data is re-examined.
    pub fn make_non_nullable(&self) -> Self {
        let mut clone = self.clone();
        clone.element_nullable = false;
        clone
    }

    /// Render a container value as a store array literal, delegating each
    /// element to the element mapping.
    pub fn generate_literal(&self, value: &Value) -> Result<String> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(Error::data_shape(
                    &self.store_type,
                    format!("expected a container value, got {}", other.type_name()),
                ));
            }
        };
        if items.is_empty() {
            // The bare form has no inferable element type at the store.
            return Ok(format!("ARRAY[]::{}", self.store_type));
        }
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            if item.is_null() {
                if !self.element_nullable {
                    return Err(Error::data_shape(
                        &self.store_type,
                        "null element in a container declared non-nullable",
                    ));
                }
                rendered.push("NULL".to_string());
            } else {
                rendered.push(self.element.generate_literal(item)?);
            }
        }
        Ok(format!("ARRAY[{}]", rendered.join(",")))
    }

    /// Apply the element mapping's parameter normalization to each element.
    pub fn configure_parameter(&self, value: Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| {
                        if item.is_null() {
                            Value::Null
                        } else {
                            self.element.configure_parameter(item)
                        }
                    })
                    .collect(),
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    fn integer_element() -> Arc<TypeMapping> {
        Arc::new(TypeMapping::Scalar(builtin::integer()))
    }

    #[test]
    fn literal_renders_elements_in_order() {
        let mapping =
            ContainerMapping::new(integer_element(), ContainerKind::List, true).unwrap();
        let value = Value::Array(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]);
        assert_eq!(mapping.generate_literal(&value).unwrap(), "ARRAY[1,2,3]");
        assert_eq!(mapping.store_type(), "integer[]");
    }

    #[test]
    fn empty_container_gets_an_explicit_cast() {
        let mapping =
            ContainerMapping::new(integer_element(), ContainerKind::List, true).unwrap();
        assert_eq!(
            mapping.generate_literal(&Value::Array(vec![])).unwrap(),
            "ARRAY[]::integer[]"
        );
    }

    #[test]
    fn null_elements_honor_the_declared_contract() {
        let nullable =
            ContainerMapping::new(integer_element(), ContainerKind::List, true).unwrap();
        let value = Value::Array(vec![Value::Int32(1), Value::Null]);
        assert_eq!(nullable.generate_literal(&value).unwrap(), "ARRAY[1,NULL]");

        let non_null = nullable.make_non_nullable();
        assert!(!non_null.element_nullable());
        assert!(matches!(
            non_null.generate_literal(&value),
            Err(Error::DataShape { .. })
        ));
        // The origin keeps its contract.
        assert!(nullable.element_nullable());
    }

    #[test]
    fn container_over_container_is_rejected_for_both_kinds() {
        let inner = Arc::new(TypeMapping::Container(
            ContainerMapping::new(integer_element(), ContainerKind::List, true).unwrap(),
        ));
        for kind in [ContainerKind::Array, ContainerKind::List] {
            assert!(matches!(
                ContainerMapping::new(inner.clone(), kind, true),
                Err(Error::Configuration(_))
            ));
        }
    }

    #[test]
    fn multi_dimensional_host_type_is_rejected() {
        let nested = HostType::array_of(HostType::array_of(HostType::Int32, true), true);
        assert!(matches!(
            ContainerMapping::from_host_type(&nested, integer_element()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn scalar_host_type_is_rejected() {
        assert!(matches!(
            ContainerMapping::from_host_type(&HostType::Int32, integer_element()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn wrong_value_shape_fails_loudly() {
        let mapping =
            ContainerMapping::new(integer_element(), ContainerKind::List, true).unwrap();
        assert!(matches!(
            mapping.generate_literal(&Value::Int32(1)),
            Err(Error::DataShape { .. })
        ));
    }
}
