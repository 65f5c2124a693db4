//! Untyped boundary values plus helpers for moving them in and out of
//! Arrow-shaped host data.
//!
//! A `Value` captures a query parameter or constant before the mapping
//! registry knows the concrete store type of the column it will meet.
//! Conversion and literal generation are deferred until resolution time.

use std::net::IpAddr;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Decimal128Array, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, LargeStringArray, ListArray, StringArray,
};
use arrow::datatypes::DataType;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

use pgmap_result::{Error, Result};

use crate::decimal::DecimalValue;
use crate::interval::IntervalValue;

/// An in-memory value crossing the host/store boundary.
///
/// The variant tag describes the value's own shape, not the store type it
/// will be mapped to; one variant can serve several store types (e.g.
/// `Text` backs `text`, `varchar`, `character`, `tsvector` and enum labels).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(DecimalValue),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    TimestampTz(OffsetDateTime),
    Interval(IntervalValue),
    Inet { addr: IpAddr, prefix: u8 },
    MacAddr([u8; 6]),
    /// Homogeneous ordered container. Whether it maps to a store array or a
    /// list is decided by the container mapping, not by the value.
    Array(Vec<Value>),
}

macro_rules! impl_from_for_value {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value!(Bool, bool);
impl_from_for_value!(Int16, i16);
impl_from_for_value!(Int32, i32);
impl_from_for_value!(Int64, i64);
impl_from_for_value!(Float32, f32);
impl_from_for_value!(Float64, f64);
impl_from_for_value!(Decimal, DecimalValue);
impl_from_for_value!(Text, String);
impl_from_for_value!(Bytes, Vec<u8>);
impl_from_for_value!(Uuid, Uuid);
impl_from_for_value!(Date, Date);
impl_from_for_value!(Time, Time);
impl_from_for_value!(Timestamp, PrimitiveDateTime);
impl_from_for_value!(TimestampTz, OffsetDateTime);
impl_from_for_value!(Interval, IntervalValue);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl Value {
    /// Name of the value's own shape, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Interval(_) => "interval",
            Value::Inet { .. } => "inet",
            Value::MacAddr(_) => "macaddr",
            Value::Array(_) => "array",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-friendly rendering used in diagnostics and plan output. This is
    /// not a store literal; literal generation belongs to the type mapping.
    pub fn format_display(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int16(i) => i.to_string(),
            Value::Int32(i) => i.to_string(),
            Value::Int64(i) => i.to_string(),
            Value::Float32(f) => f.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Text(s) => format!("\"{}\"", escape_string(s)),
            Value::Bytes(b) => format!("0x{}", hex_encode(b)),
            Value::Uuid(u) => u.to_string(),
            Value::Date(d) => format_date(*d),
            Value::Time(t) => format_time(*t),
            Value::Timestamp(ts) => {
                format!("{} {}", format_date(ts.date()), format_time(ts.time()))
            }
            Value::TimestampTz(ts) => format!(
                "{} {} {}",
                format_date(ts.date()),
                format_time(ts.time()),
                ts.offset()
            ),
            Value::Interval(iv) => format!(
                "{{ months: {}, days: {}, nanos: {} }}",
                iv.months, iv.days, iv.nanos
            ),
            Value::Inet { addr, prefix } => format!("{addr}/{prefix}"),
            Value::MacAddr(mac) => mac
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(":"),
            Value::Array(items) => {
                let inner: Vec<_> = items.iter().map(|v| v.format_display()).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    /// Pull a single value out of an Arrow array, for hosts whose pipeline
    /// carries parameters in columnar batches.
    pub fn from_array_ref(array: &ArrayRef, index: usize) -> Result<Value> {
        if array.is_null(index) {
            return Ok(Value::Null);
        }

        match array.data_type() {
            DataType::Boolean => {
                let arr = downcast::<BooleanArray>(array)?;
                Ok(Value::Bool(arr.value(index)))
            }
            DataType::Int16 => {
                let arr = downcast::<Int16Array>(array)?;
                Ok(Value::Int16(arr.value(index)))
            }
            DataType::Int32 => {
                let arr = downcast::<Int32Array>(array)?;
                Ok(Value::Int32(arr.value(index)))
            }
            DataType::Int64 => {
                let arr = downcast::<Int64Array>(array)?;
                Ok(Value::Int64(arr.value(index)))
            }
            DataType::Float32 => {
                let arr = downcast::<Float32Array>(array)?;
                Ok(Value::Float32(arr.value(index)))
            }
            DataType::Float64 => {
                let arr = downcast::<Float64Array>(array)?;
                Ok(Value::Float64(arr.value(index)))
            }
            DataType::Utf8 => {
                let arr = downcast::<StringArray>(array)?;
                Ok(Value::Text(arr.value(index).to_string()))
            }
            DataType::LargeUtf8 => {
                let arr = downcast::<LargeStringArray>(array)?;
                Ok(Value::Text(arr.value(index).to_string()))
            }
            DataType::Binary => {
                let arr = downcast::<BinaryArray>(array)?;
                Ok(Value::Bytes(arr.value(index).to_vec()))
            }
            DataType::Date32 => {
                let arr = downcast::<Date32Array>(array)?;
                Ok(Value::Date(date_from_days(arr.value(index))?))
            }
            DataType::Decimal128(_, scale) => {
                let arr = downcast::<Decimal128Array>(array)?;
                let decimal = DecimalValue::new(arr.value(index), *scale)
                    .map_err(|err| Error::Internal(format!("invalid decimal value: {err}")))?;
                Ok(Value::Decimal(decimal))
            }
            DataType::List(_) => {
                let arr = downcast::<ListArray>(array)?;
                let child = arr.value(index);
                let mut items = Vec::with_capacity(child.len());
                for i in 0..child.len() {
                    items.push(Value::from_array_ref(&child, i)?);
                }
                Ok(Value::Array(items))
            }
            other => Err(Error::Internal(format!(
                "unsupported Arrow type for value extraction: {other:?}"
            ))),
        }
    }
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::Internal("Arrow array downcast failed".to_string()))
}

fn date_from_days(days: i32) -> Result<Date> {
    let epoch = Date::from_calendar_date(1970, Month::January, 1)
        .expect("1970-01-01 is a valid date")
        .to_julian_day();
    let julian = epoch
        .checked_add(days)
        .ok_or_else(|| Error::Internal(format!("Date32 value {days} out of range")))?;
    Date::from_julian_day(julian)
        .map_err(|err| Error::Internal(format!("Date32 value {days} out of range: {err}")))
}

/// Render a date in the `YYYY-MM-DD` form store literals use.
pub fn format_date(date: Date) -> String {
    let (year, month, day) = date.to_calendar_date();
    format!("{:04}-{:02}-{:02}", year, month as u8, day)
}

/// Render a time of day, carrying microseconds only when non-zero.
pub fn format_time(time: Time) -> String {
    let (h, m, s, micro) = time.as_hms_micro();
    if micro == 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{h:02}:{m:02}:{s:02}.{micro:06}")
    }
}

/// Lowercase hex, no separator.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn escape_string(value: &str) -> String {
    value.chars().flat_map(|c| c.escape_default()).collect()
}
