//! In-memory value model for the pgmap boundary.
//!
//! Values captured here are what the host query pipeline hands across the
//! store boundary: query parameters before binding, constants awaiting
//! literal generation, and snapshots held by change tracking. The concrete
//! store-side type of each value is decided later by the mapping registry,
//! so `Value` stays deliberately untyped beyond its own variant tag.

#![forbid(unsafe_code)]

pub mod decimal;
pub mod interval;
pub mod ty;
pub mod value;

pub use decimal::{DecimalValue, MAX_DECIMAL_PRECISION};
pub use interval::IntervalValue;
pub use ty::{ElementType, HostType};
pub use value::Value;
