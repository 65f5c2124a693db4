//! Scalar (element) type mappings.
//!
//! A `ScalarMapping` is immutable once constructed. Parametrized variants
//! (`varchar(50)`, `numeric(10,2)`) are produced by the `with_*` transforms,
//! which return new instances sharing the same literal, parameter, converter
//! and comparer factories — the origin mapping is never touched.

use std::sync::Arc;

use pgmap_result::Result;
use pgmap_types::{HostType, Value};

use crate::comparer::ValueComparer;

pub type LiteralFn = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;
pub type ParameterFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub type ConvertFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Bidirectional conversion between the host's in-memory form and the form
/// actually persisted at the store.
///
/// When a converter is present, the mapping's comparer operates on the
/// converted (store-side) form, so comparisons reflect what is persisted
/// rather than the raw host representation.
#[derive(Clone)]
pub struct ValueConverter {
    pub to_store: ConvertFn,
    pub from_store: ConvertFn,
}

/// Mapping for one scalar store type.
#[derive(Clone)]
pub struct ScalarMapping {
    store_type: String,
    base_store_type: String,
    ty: HostType,
    size: Option<i32>,
    precision: Option<u8>,
    scale: Option<i8>,
    literal: LiteralFn,
    parameter: Option<ParameterFn>,
    converter: Option<ValueConverter>,
    comparer: Option<ValueComparer>,
}

impl ScalarMapping {
    /// Create a mapping for an unparametrized store type.
    pub fn new(store_type: &str, ty: HostType, literal: LiteralFn) -> Self {
        debug_assert!(!store_type.is_empty());
        Self {
            store_type: store_type.to_string(),
            base_store_type: store_type.to_string(),
            ty,
            size: None,
            precision: None,
            scale: None,
            literal,
            parameter: None,
            converter: None,
            comparer: None,
        }
    }

    /// Attach a last-mile parameter configurator (e.g. right-trimming the
    /// padding of fixed-width text so store comparisons behave like host
    /// equality).
    pub fn with_parameter(mut self, parameter: ParameterFn) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn with_converter(mut self, converter: ValueConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_comparer(mut self, comparer: ValueComparer) -> Self {
        self.comparer = Some(comparer);
        self
    }

    #[inline]
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    /// The unparametrized store-type name this mapping derives from.
    #[inline]
    pub fn base_store_type(&self) -> &str {
        &self.base_store_type
    }

    #[inline]
    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    #[inline]
    pub fn size(&self) -> Option<i32> {
        self.size
    }

    #[inline]
    pub fn precision(&self) -> Option<u8> {
        self.precision
    }

    #[inline]
    pub fn scale(&self) -> Option<i8> {
        self.scale
    }

    pub fn converter(&self) -> Option<&ValueConverter> {
        self.converter.as_ref()
    }

    /// Mapping-specific comparer, when one was registered.
    pub fn custom_comparer(&self) -> Option<&ValueComparer> {
        self.comparer.as_ref()
    }

    /// Render `value` as a store-syntax literal.
    ///
    /// An unsupported value shape is an upstream contract violation and
    /// fails loudly with a data-shape error.
    pub fn generate_literal(&self, value: &Value) -> Result<String> {
        match &self.converter {
            Some(converter) => {
                let converted = (converter.to_store)(value)?;
                (self.literal)(&converted)
            }
            None => (self.literal)(value),
        }
    }

    /// Apply last-mile normalization before binding `value` as a parameter.
    pub fn configure_parameter(&self, value: Value) -> Value {
        match &self.parameter {
            Some(parameter) => parameter(value),
            None => value,
        }
    }

    /// New mapping with a different store-type string and size, preserving
    /// literal/parameter/converter/comparer factories and the base name.
    pub fn with_store_type(&self, store_type: &str, size: Option<i32>) -> Self {
        debug_assert!(!store_type.is_empty());
        let mut clone = self.clone();
        clone.store_type = store_type.to_string();
        clone.size = size;
        clone
    }

    /// New mapping with numeric precision and scale baked into the
    /// store-type string.
    pub fn with_precision(&self, store_type: &str, precision: u8, scale: Option<i8>) -> Self {
        let mut clone = self.clone();
        clone.store_type = store_type.to_string();
        clone.precision = Some(precision);
        clone.scale = scale;
        clone
    }
}

impl std::fmt::Debug for ScalarMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarMapping")
            .field("store_type", &self.store_type)
            .field("base_store_type", &self.base_store_type)
            .field("ty", &self.ty)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgmap_result::Error;

    fn int_mapping() -> ScalarMapping {
        ScalarMapping::new(
            "integer",
            HostType::Int32,
            Arc::new(|v| match v {
                Value::Int32(i) => Ok(i.to_string()),
                other => Err(Error::data_shape("integer", other.type_name())),
            }),
        )
    }

    #[test]
    fn literal_generation_uses_the_renderer() {
        let mapping = int_mapping();
        assert_eq!(mapping.generate_literal(&Value::Int32(42)).unwrap(), "42");
        assert!(matches!(
            mapping.generate_literal(&Value::Text("x".into())),
            Err(Error::DataShape { .. })
        ));
    }

    #[test]
    fn with_store_type_clones_without_mutating_origin() {
        let base = int_mapping();
        let sized = base.with_store_type("integer(9)", Some(9));

        assert_eq!(base.store_type(), "integer");
        assert_eq!(base.size(), None);
        assert_eq!(sized.store_type(), "integer(9)");
        assert_eq!(sized.base_store_type(), "integer");
        assert_eq!(sized.size(), Some(9));
        // Renderer factory is shared.
        assert_eq!(sized.generate_literal(&Value::Int32(1)).unwrap(), "1");
    }

    #[test]
    fn converter_feeds_the_renderer_converted_values() {
        let mapping = ScalarMapping::new(
            "text",
            HostType::Text,
            Arc::new(|v| match v {
                Value::Text(s) => Ok(format!("'{s}'")),
                other => Err(Error::data_shape("text", other.type_name())),
            }),
        )
        .with_converter(ValueConverter {
            to_store: Arc::new(|v| match v {
                Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
                other => Ok(other.clone()),
            }),
            from_store: Arc::new(|v| Ok(v.clone())),
        });
        assert_eq!(
            mapping.generate_literal(&Value::Text("abc".into())).unwrap(),
            "'ABC'"
        );
    }

    #[test]
    fn parameter_configurator_normalizes_values() {
        let mapping = ScalarMapping::new(
            "character",
            HostType::Text,
            Arc::new(|_| Ok(String::new())),
        )
        .with_parameter(Arc::new(|v| match v {
            Value::Text(s) => Value::Text(s.trim_end_matches(' ').to_string()),
            other => other,
        }));
        assert_eq!(
            mapping.configure_parameter(Value::Text("ab   ".into())),
            Value::Text("ab".into())
        );
    }
}
