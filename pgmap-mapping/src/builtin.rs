//! Built-in store type mappings and their literal renderers.
//!
//! Every renderer must produce a literal the store parses back to a value
//! equal (per the mapping's comparer) to the input, across the whole domain
//! of the mapped host type — including empty strings, numeric extremes and
//! non-printable bytes.

use std::sync::Arc;

use pgmap_result::{Error, Result};
use pgmap_types::{HostType, Value};
use pgmap_types::value::{format_date, format_time, hex_encode};

use crate::comparer::{ValueComparer, structural_eq, structural_hash};
use crate::registry::RegistryBuilder;
use crate::scalar::{ScalarMapping, ValueConverter};

/// Seed `builder` with the built-in mappings. Registration order matters
/// only where one store type carries several candidates: the first
/// registered candidate wins unconstrained resolution.
pub fn register_builtins(builder: &mut RegistryBuilder) {
    builder.register(boolean());
    builder.register(smallint());
    builder.register(integer());
    builder.register(bigint());
    builder.register(real());
    builder.register(double_precision());
    builder.register(numeric());
    builder.register(text());
    builder.register(varchar());
    // "character" is ambiguous between a string and a single character;
    // the string candidate is declared first.
    builder.register(character());
    builder.register(character_char());
    builder.register(bytea());
    builder.register(uuid());
    builder.register(date());
    builder.register(time_of_day());
    builder.register(timestamp());
    builder.register(timestamptz());
    builder.register(interval());
    builder.register(inet());
    builder.register(macaddr());
    builder.register(tsvector());
    builder.register(tsquery());
}

pub fn boolean() -> ScalarMapping {
    ScalarMapping::new(
        "boolean",
        HostType::Bool,
        Arc::new(|v| match v {
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            other => Err(Error::data_shape("boolean", other.type_name())),
        }),
    )
}

pub fn smallint() -> ScalarMapping {
    ScalarMapping::new(
        "smallint",
        HostType::Int16,
        Arc::new(|v| match v {
            Value::Int16(i) => Ok(i.to_string()),
            other => Err(Error::data_shape("smallint", other.type_name())),
        }),
    )
}

pub fn integer() -> ScalarMapping {
    ScalarMapping::new(
        "integer",
        HostType::Int32,
        Arc::new(|v| match v {
            Value::Int16(i) => Ok(i.to_string()),
            Value::Int32(i) => Ok(i.to_string()),
            other => Err(Error::data_shape("integer", other.type_name())),
        }),
    )
}

pub fn bigint() -> ScalarMapping {
    ScalarMapping::new(
        "bigint",
        HostType::Int64,
        Arc::new(|v| match v {
            Value::Int16(i) => Ok(i.to_string()),
            Value::Int32(i) => Ok(i.to_string()),
            Value::Int64(i) => Ok(i.to_string()),
            other => Err(Error::data_shape("bigint", other.type_name())),
        }),
    )
}

pub fn real() -> ScalarMapping {
    ScalarMapping::new(
        "real",
        HostType::Float32,
        Arc::new(|v| match v {
            Value::Float32(f) => Ok(float_literal(*f as f64, "real")),
            other => Err(Error::data_shape("real", other.type_name())),
        }),
    )
}

pub fn double_precision() -> ScalarMapping {
    ScalarMapping::new(
        "double precision",
        HostType::Float64,
        Arc::new(|v| match v {
            Value::Float32(f) => Ok(float_literal(*f as f64, "double precision")),
            Value::Float64(f) => Ok(float_literal(*f, "double precision")),
            other => Err(Error::data_shape("double precision", other.type_name())),
        }),
    )
}

pub fn numeric() -> ScalarMapping {
    ScalarMapping::new(
        "numeric",
        HostType::Decimal,
        Arc::new(|v| match v {
            Value::Decimal(d) => Ok(d.to_string()),
            Value::Int16(i) => Ok(i.to_string()),
            Value::Int32(i) => Ok(i.to_string()),
            Value::Int64(i) => Ok(i.to_string()),
            other => Err(Error::data_shape("numeric", other.type_name())),
        }),
    )
}

pub fn text() -> ScalarMapping {
    ScalarMapping::new("text", HostType::Text, Arc::new(text_literal("text")))
}

pub fn varchar() -> ScalarMapping {
    ScalarMapping::new(
        "character varying",
        HostType::Text,
        Arc::new(text_literal("character varying")),
    )
}

/// Fixed-length blank-padded text, string candidate. Binding trims trailing
/// padding so store comparisons behave like host equality.
pub fn character() -> ScalarMapping {
    ScalarMapping::new(
        "character",
        HostType::Text,
        Arc::new(text_literal("character")),
    )
    .with_parameter(Arc::new(trim_padding))
}

/// Fixed-length text, single-character candidate.
pub fn character_char() -> ScalarMapping {
    ScalarMapping::new(
        "character",
        HostType::Char,
        Arc::new(text_literal("character")),
    )
    .with_parameter(Arc::new(trim_padding))
}

pub fn bytea() -> ScalarMapping {
    ScalarMapping::new(
        "bytea",
        HostType::Bytes,
        Arc::new(|v| match v {
            Value::Bytes(b) => Ok(format!("'\\x{}'", hex_encode(b))),
            other => Err(Error::data_shape("bytea", other.type_name())),
        }),
    )
}

pub fn uuid() -> ScalarMapping {
    ScalarMapping::new(
        "uuid",
        HostType::Uuid,
        Arc::new(|v| match v {
            Value::Uuid(u) => Ok(format!("UUID '{u}'")),
            other => Err(Error::data_shape("uuid", other.type_name())),
        }),
    )
}

pub fn date() -> ScalarMapping {
    ScalarMapping::new(
        "date",
        HostType::Date,
        Arc::new(|v| match v {
            Value::Date(d) => Ok(format!("DATE '{}'", format_date(*d))),
            other => Err(Error::data_shape("date", other.type_name())),
        }),
    )
}

pub fn time_of_day() -> ScalarMapping {
    ScalarMapping::new(
        "time",
        HostType::Time,
        Arc::new(|v| match v {
            Value::Time(t) => Ok(format!("TIME '{}'", format_time(*t))),
            other => Err(Error::data_shape("time", other.type_name())),
        }),
    )
}

pub fn timestamp() -> ScalarMapping {
    ScalarMapping::new(
        "timestamp",
        HostType::Timestamp,
        Arc::new(|v| match v {
            Value::Timestamp(ts) => Ok(format!(
                "TIMESTAMP '{} {}'",
                format_date(ts.date()),
                format_time(ts.time())
            )),
            other => Err(Error::data_shape("timestamp", other.type_name())),
        }),
    )
}

pub fn timestamptz() -> ScalarMapping {
    ScalarMapping::new(
        "timestamptz",
        HostType::TimestampTz,
        Arc::new(|v| match v {
            Value::TimestampTz(ts) => {
                let (h, m, _) = ts.offset().as_hms();
                let sign = if h < 0 || m < 0 { '-' } else { '+' };
                Ok(format!(
                    "TIMESTAMPTZ '{} {}{}{:02}:{:02}'",
                    format_date(ts.date()),
                    format_time(ts.time()),
                    sign,
                    h.unsigned_abs(),
                    m.unsigned_abs()
                ))
            }
            other => Err(Error::data_shape("timestamptz", other.type_name())),
        }),
    )
}

pub fn interval() -> ScalarMapping {
    ScalarMapping::new(
        "interval",
        HostType::Interval,
        Arc::new(|v| match v {
            Value::Interval(iv) => Ok(format!("INTERVAL '{}'", iv.format_sql_body())),
            other => Err(Error::data_shape("interval", other.type_name())),
        }),
    )
}

pub fn inet() -> ScalarMapping {
    ScalarMapping::new(
        "inet",
        HostType::Inet,
        Arc::new(|v| match v {
            Value::Inet { addr, prefix } => {
                let full = match addr {
                    std::net::IpAddr::V4(_) => 32,
                    std::net::IpAddr::V6(_) => 128,
                };
                if *prefix == full {
                    Ok(format!("INET '{addr}'"))
                } else {
                    Ok(format!("INET '{addr}/{prefix}'"))
                }
            }
            other => Err(Error::data_shape("inet", other.type_name())),
        }),
    )
}

pub fn macaddr() -> ScalarMapping {
    ScalarMapping::new(
        "macaddr",
        HostType::MacAddr,
        Arc::new(|v| match v {
            Value::MacAddr(mac) => {
                let body: Vec<String> = mac.iter().map(|b| format!("{b:02x}")).collect();
                Ok(format!("MACADDR '{}'", body.join(":")))
            }
            other => Err(Error::data_shape("macaddr", other.type_name())),
        }),
    )
}

pub fn tsvector() -> ScalarMapping {
    ScalarMapping::new(
        "tsvector",
        HostType::TsVector,
        Arc::new(|v| match v {
            Value::Text(s) => Ok(format!("'{}'::tsvector", escape_text(s))),
            other => Err(Error::data_shape("tsvector", other.type_name())),
        }),
    )
}

pub fn tsquery() -> ScalarMapping {
    ScalarMapping::new(
        "tsquery",
        HostType::TsQuery,
        Arc::new(|v| match v {
            Value::Text(s) => Ok(format!("'{}'::tsquery", escape_text(s))),
            other => Err(Error::data_shape("tsquery", other.type_name())),
        }),
    )
}

/// Mapping for a user-defined enum store type.
///
/// Labels are persisted as their store spelling; the converter validates
/// membership, and the comparer operates on the converted label — not the
/// raw host value — so comparisons reflect what is actually persisted.
pub fn enum_mapping(store_type: &str, labels: &[&str]) -> ScalarMapping {
    let owned: Arc<Vec<String>> = Arc::new(labels.iter().map(|l| l.to_string()).collect());

    let check_labels = owned.clone();
    let store_name = store_type.to_string();
    let to_store: Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync> =
        Arc::new(move |v| match v {
            Value::Text(s) if check_labels.iter().any(|l| l == s) => {
                Ok(Value::Text(s.clone()))
            }
            Value::Text(s) => Err(Error::data_shape(
                &store_name,
                format!("'{s}' is not a label of this enum type"),
            )),
            other => Err(Error::data_shape(&store_name, other.type_name())),
        });

    let literal_store_name = store_type.to_string();
    ScalarMapping::new(
        store_type,
        HostType::Text,
        Arc::new(move |v| match v {
            Value::Text(s) => Ok(format!("'{}'::{}", escape_text(s), literal_store_name)),
            other => Err(Error::data_shape(&literal_store_name, other.type_name())),
        }),
    )
    .with_converter(ValueConverter {
        to_store: to_store.clone(),
        from_store: Arc::new(|v| Ok(v.clone())),
    })
    .with_comparer(ValueComparer::custom(
        {
            let convert = to_store.clone();
            Arc::new(move |a, b| match (convert(a), convert(b)) {
                (Ok(a), Ok(b)) => structural_eq(&a, &b),
                _ => structural_eq(a, b),
            })
        },
        Arc::new(structural_hash),
        Arc::new(Value::clone),
    ))
}

fn text_literal(store_type: &'static str) -> impl Fn(&Value) -> Result<String> {
    move |v| match v {
        Value::Text(s) => Ok(format!("'{}'", escape_text(s))),
        other => Err(Error::data_shape(store_type, other.type_name())),
    }
}

fn escape_text(s: &str) -> String {
    s.replace('\'', "''")
}

fn trim_padding(value: Value) -> Value {
    match value {
        Value::Text(s) => Value::Text(s.trim_end_matches(' ').to_string()),
        other => other,
    }
}

fn float_literal(f: f64, store_type: &str) -> String {
    if f.is_finite() {
        let text = f.to_string();
        if text.contains('.') || text.contains('e') || text.contains('E') {
            text
        } else {
            // Keep the literal unambiguously floating-point.
            format!("{text}.0")
        }
    } else if f.is_nan() {
        format!("'NaN'::{store_type}")
    } else if f > 0.0 {
        format!("'Infinity'::{store_type}")
    } else {
        format!("'-Infinity'::{store_type}")
    }
}
