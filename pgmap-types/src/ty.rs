//! Host-side type descriptors.
//!
//! `HostType` names the representation the host query layer uses for a
//! value. The mapping registry keys its in-memory lookup table on this enum,
//! so it must stay cheap to clone, hash and compare. Conversions to and from
//! Arrow types are provided for hosts whose pipelines are Arrow-shaped.

use arrow::datatypes::{DataType, TimeUnit};

/// The host's name for a value representation.
///
/// Parametrized store facets (length, precision, scale) are not part of the
/// host type; they travel separately in the resolve request, mirroring how
/// the host declares them per column rather than per type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    /// A single character. Distinct from `Text` so the fixed-length store
    /// type can carry both candidates.
    Char,
    Text,
    Bytes,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    Inet,
    MacAddr,
    TsVector,
    TsQuery,
    /// Single-dimensional array of one element type.
    Array(Box<ElementType>),
    /// Dynamically-sized ordered list of one element type.
    List(Box<ElementType>),
}

/// Element descriptor for container types. Nullability is part of the
/// declared type, never inferred from data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementType {
    pub ty: HostType,
    pub nullable: bool,
}

impl HostType {
    /// Build an array type over `element`.
    pub fn array_of(element: HostType, nullable: bool) -> HostType {
        HostType::Array(Box::new(ElementType {
            ty: element,
            nullable,
        }))
    }

    /// Build a list type over `element`.
    pub fn list_of(element: HostType, nullable: bool) -> HostType {
        HostType::List(Box::new(ElementType {
            ty: element,
            nullable,
        }))
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, HostType::Array(_) | HostType::List(_))
    }

    /// Element descriptor when this is a container type.
    pub fn element(&self) -> Option<&ElementType> {
        match self {
            HostType::Array(el) | HostType::List(el) => Some(el),
            _ => None,
        }
    }

    /// Closest Arrow physical type, when one exists. Capability-domain types
    /// without an Arrow analog (inet, macaddr, tsvector, tsquery) return
    /// `None`.
    pub fn to_arrow(&self) -> Option<DataType> {
        match self {
            HostType::Bool => Some(DataType::Boolean),
            HostType::Int16 => Some(DataType::Int16),
            HostType::Int32 => Some(DataType::Int32),
            HostType::Int64 => Some(DataType::Int64),
            HostType::Float32 => Some(DataType::Float32),
            HostType::Float64 => Some(DataType::Float64),
            HostType::Decimal => Some(DataType::Decimal128(38, 10)),
            HostType::Char | HostType::Text => Some(DataType::Utf8),
            HostType::Bytes => Some(DataType::Binary),
            HostType::Uuid => Some(DataType::FixedSizeBinary(16)),
            HostType::Date => Some(DataType::Date32),
            HostType::Time => Some(DataType::Time64(TimeUnit::Microsecond)),
            HostType::Timestamp => Some(DataType::Timestamp(TimeUnit::Microsecond, None)),
            HostType::TimestampTz => {
                Some(DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())))
            }
            HostType::Interval => Some(DataType::Interval(
                arrow::datatypes::IntervalUnit::MonthDayNano,
            )),
            HostType::Inet
            | HostType::MacAddr
            | HostType::TsVector
            | HostType::TsQuery
            | HostType::Array(_)
            | HostType::List(_) => None,
        }
    }

    /// Map an Arrow type back to a host type. Containers come through as
    /// lists (`List`/`LargeList`) or arrays (`FixedSizeList`).
    pub fn from_arrow(ty: &DataType) -> Option<HostType> {
        match ty {
            DataType::Boolean => Some(HostType::Bool),
            DataType::Int16 => Some(HostType::Int16),
            DataType::Int32 => Some(HostType::Int32),
            DataType::Int64 => Some(HostType::Int64),
            DataType::Float32 => Some(HostType::Float32),
            DataType::Float64 => Some(HostType::Float64),
            DataType::Decimal128(_, _) => Some(HostType::Decimal),
            DataType::Utf8 | DataType::LargeUtf8 => Some(HostType::Text),
            DataType::Binary | DataType::LargeBinary => Some(HostType::Bytes),
            DataType::FixedSizeBinary(16) => Some(HostType::Uuid),
            DataType::Date32 => Some(HostType::Date),
            DataType::Time64(_) => Some(HostType::Time),
            DataType::Timestamp(_, None) => Some(HostType::Timestamp),
            DataType::Timestamp(_, Some(_)) => Some(HostType::TimestampTz),
            DataType::Interval(_) => Some(HostType::Interval),
            DataType::List(field) | DataType::LargeList(field) => {
                let element = HostType::from_arrow(field.data_type())?;
                Some(HostType::list_of(element, field.is_nullable()))
            }
            DataType::FixedSizeList(field, _) => {
                let element = HostType::from_arrow(field.data_type())?;
                Some(HostType::array_of(element, field.is_nullable()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostType::Array(el) => write!(f, "{}[]", el.ty),
            HostType::List(el) => write!(f, "list<{}>", el.ty),
            other => {
                let name = match other {
                    HostType::Bool => "bool",
                    HostType::Int16 => "int16",
                    HostType::Int32 => "int32",
                    HostType::Int64 => "int64",
                    HostType::Float32 => "float32",
                    HostType::Float64 => "float64",
                    HostType::Decimal => "decimal",
                    HostType::Char => "char",
                    HostType::Text => "text",
                    HostType::Bytes => "bytes",
                    HostType::Uuid => "uuid",
                    HostType::Date => "date",
                    HostType::Time => "time",
                    HostType::Timestamp => "timestamp",
                    HostType::TimestampTz => "timestamptz",
                    HostType::Interval => "interval",
                    HostType::Inet => "inet",
                    HostType::MacAddr => "macaddr",
                    HostType::TsVector => "tsvector",
                    HostType::TsQuery => "tsquery",
                    HostType::Array(_) | HostType::List(_) => unreachable!(),
                };
                f.write_str(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_helpers_expose_element() {
        let ty = HostType::array_of(HostType::Int32, true);
        assert!(ty.is_container());
        let el = ty.element().unwrap();
        assert_eq!(el.ty, HostType::Int32);
        assert!(el.nullable);
        assert!(!HostType::Int32.is_container());
    }

    #[test]
    fn arrow_roundtrip_for_scalars() {
        for ty in [
            HostType::Bool,
            HostType::Int32,
            HostType::Int64,
            HostType::Float64,
            HostType::Text,
            HostType::Date,
        ] {
            let arrow = ty.to_arrow().unwrap();
            assert_eq!(HostType::from_arrow(&arrow), Some(ty));
        }
    }

    #[test]
    fn arrow_list_carries_element_nullability() {
        use arrow::datatypes::Field;
        use std::sync::Arc;

        let non_null = DataType::List(Arc::new(Field::new("item", DataType::Int32, false)));
        assert_eq!(
            HostType::from_arrow(&non_null),
            Some(HostType::list_of(HostType::Int32, false))
        );

        let nullable = DataType::List(Arc::new(Field::new("item", DataType::Utf8, true)));
        assert_eq!(
            HostType::from_arrow(&nullable),
            Some(HostType::list_of(HostType::Text, true))
        );
    }

    #[test]
    fn capability_types_have_no_arrow_analog() {
        assert_eq!(HostType::Inet.to_arrow(), None);
        assert_eq!(HostType::TsVector.to_arrow(), None);
    }

    #[test]
    fn display_names_are_compact() {
        assert_eq!(HostType::Int32.to_string(), "int32");
        assert_eq!(
            HostType::array_of(HostType::Int32, true).to_string(),
            "int32[]"
        );
        assert_eq!(
            HostType::list_of(HostType::Text, false).to_string(),
            "list<text>"
        );
    }
}
