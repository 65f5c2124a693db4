//! Equality, hashing and snapshotting of boundary values.
//!
//! Change tracking compares a live value against a snapshot taken earlier,
//! so the three operations must agree: values that compare equal must hash
//! equal, and a snapshot must be isolated from later mutation of the
//! original. Containers get all three behaviors element-wise.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::sync::Arc;

use pgmap_types::Value;

pub type EqualsFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;
pub type HashFn = Arc<dyn Fn(&Value, &mut dyn Hasher) + Send + Sync>;
pub type SnapshotFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Hash contribution of an absent container element. Fixed so that
/// `[1, NULL]` and `[1]` never collide by accident of combination order.
const NULL_ELEMENT_HASH: u64 = 0x9e37_79b9_7f4a_7c15;

/// Which strategy a comparer was built from.
///
/// Container comparers pick the highest applicable tier at construction
/// time: a custom element comparer is wrapped per-element; otherwise the
/// value model's own structural equality serves; the generic fallback is the
/// last resort for element types without a native equality contract. The
/// priority order is policy, kept explicit so it can be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparerTier {
    Custom,
    NativeEquality,
    Fallback,
}

/// The (equals, hash, snapshot) triple governing comparison and
/// change-detection for one mapped type.
#[derive(Clone)]
pub struct ValueComparer {
    tier: ComparerTier,
    equals: EqualsFn,
    hash: HashFn,
    snapshot: SnapshotFn,
}

impl ValueComparer {
    /// Comparer with mapping-specific semantics supplied by the caller.
    pub fn custom(equals: EqualsFn, hash: HashFn, snapshot: SnapshotFn) -> Self {
        Self {
            tier: ComparerTier::Custom,
            equals,
            hash,
            snapshot,
        }
    }

    /// Comparer using the value model's structural equality contract.
    pub fn native() -> Self {
        Self {
            tier: ComparerTier::NativeEquality,
            equals: Arc::new(structural_eq),
            hash: Arc::new(structural_hash),
            snapshot: Arc::new(Value::clone),
        }
    }

    /// Generic last-resort comparer. Behaviorally identical to [`native`]
    /// for this value model; kept as a distinct tier so the selection policy
    /// stays visible.
    ///
    /// [`native`]: ValueComparer::native
    pub fn fallback() -> Self {
        Self {
            tier: ComparerTier::Fallback,
            equals: Arc::new(structural_eq),
            hash: Arc::new(structural_hash),
            snapshot: Arc::new(Value::clone),
        }
    }

    #[inline]
    pub fn tier(&self) -> ComparerTier {
        self.tier
    }

    #[inline]
    pub fn equals(&self, left: &Value, right: &Value) -> bool {
        (self.equals)(left, right)
    }

    #[inline]
    pub fn hash_into(&self, value: &Value, hasher: &mut dyn Hasher) {
        (self.hash)(value, hasher)
    }

    /// Convenience 64-bit hash of a single value.
    pub fn hash_value(&self, value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_into(value, &mut hasher);
        hasher.finish()
    }

    /// Deep copy suitable for later comparison against a mutated original.
    #[inline]
    pub fn snapshot(&self, value: &Value) -> Value {
        (self.snapshot)(value)
    }
}

impl std::fmt::Debug for ValueComparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueComparer")
            .field("tier", &self.tier)
            .finish()
    }
}

/// Structural equality over the value model. Floats compare by bit pattern
/// so a NaN value does not register as perpetually modified.
pub fn structural_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
        (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structural_eq(x, y))
        }
        (a, b) => a == b,
    }
}

/// Structural hash consistent with [`structural_eq`].
pub fn structural_hash(value: &Value, hasher: &mut dyn Hasher) {
    match value {
        Value::Null => hasher.write_u64(NULL_ELEMENT_HASH),
        Value::Bool(b) => hasher.write_u8(*b as u8),
        Value::Int16(i) => hasher.write_i16(*i),
        Value::Int32(i) => hasher.write_i32(*i),
        Value::Int64(i) => hasher.write_i64(*i),
        Value::Float32(f) => hasher.write_u32(f.to_bits()),
        Value::Float64(f) => hasher.write_u64(f.to_bits()),
        Value::Decimal(d) => {
            hasher.write_i128(d.raw_value());
            hasher.write_i8(d.scale());
        }
        Value::Text(s) => hasher.write(s.as_bytes()),
        Value::Bytes(b) => hasher.write(b),
        Value::Uuid(u) => hasher.write(u.as_bytes()),
        Value::Date(d) => hasher.write_i32(d.to_julian_day()),
        Value::Time(t) => hasher.write_u64(t.as_hms_micro().3 as u64 ^ encode_hms(*t)),
        Value::Timestamp(ts) => {
            hasher.write_i32(ts.date().to_julian_day());
            hasher.write_u64(encode_hms(ts.time()));
        }
        Value::TimestampTz(ts) => {
            hasher.write_i128(ts.unix_timestamp_nanos());
        }
        Value::Interval(iv) => {
            hasher.write_i32(iv.months);
            hasher.write_i32(iv.days);
            hasher.write_i64(iv.nanos);
        }
        Value::Inet { addr, prefix } => {
            match addr {
                std::net::IpAddr::V4(v4) => hasher.write(&v4.octets()),
                std::net::IpAddr::V6(v6) => hasher.write(&v6.octets()),
            }
            hasher.write_u8(*prefix);
        }
        Value::MacAddr(mac) => hasher.write(mac),
        Value::Array(items) => {
            hasher.write_usize(items.len());
            for item in items {
                structural_hash(item, hasher);
            }
        }
    }
}

fn encode_hms(t: time::Time) -> u64 {
    let (h, m, s, micro) = t.as_hms_micro();
    ((h as u64) << 48) | ((m as u64) << 40) | ((s as u64) << 32) | micro as u64
}

/// Build the comparer for a container mapping from its element comparer.
///
/// Tier selection happens here, in priority order: a custom element comparer
/// is wrapped so container equality/hash/snapshot delegate per element;
/// otherwise the element type's native equality contract is used directly;
/// the generic fallback closes the gap for elements carrying neither.
pub fn container_comparer(element: Option<ValueComparer>) -> ValueComparer {
    let (tier, element) = match element {
        Some(c) if c.tier() == ComparerTier::Custom => (ComparerTier::Custom, c),
        Some(c) if c.tier() == ComparerTier::Fallback => (ComparerTier::Fallback, c),
        Some(c) => (ComparerTier::NativeEquality, c),
        None => (ComparerTier::NativeEquality, ValueComparer::native()),
    };

    let eq_element = element.clone();
    let equals: EqualsFn = Arc::new(move |left, right| match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(x, y)| match (x, y) {
                    (Value::Null, Value::Null) => true,
                    (Value::Null, _) | (_, Value::Null) => false,
                    (x, y) => eq_element.equals(x, y),
                })
        }
        _ => false,
    });

    let hash_element = element.clone();
    let hash: HashFn = Arc::new(move |value, hasher| match value {
        Value::Array(items) => {
            hasher.write_usize(items.len());
            for item in items {
                if item.is_null() {
                    hasher.write_u64(NULL_ELEMENT_HASH);
                } else {
                    hash_element.hash_into(item, hasher);
                }
            }
        }
        other => structural_hash(other, hasher),
    });

    let snap_element = element;
    let snapshot: SnapshotFn = Arc::new(move |value| match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| {
                    if item.is_null() {
                        Value::Null
                    } else {
                        snap_element.snapshot(item)
                    }
                })
                .collect(),
        ),
        other => other.clone(),
    });

    ValueComparer {
        tier,
        equals,
        hash,
        snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    #[test]
    fn container_equality_is_structural_not_referential() {
        let cmp = container_comparer(None);
        let a = arr(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]);
        let b = arr(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]);
        assert!(cmp.equals(&a, &b));
        assert_eq!(cmp.hash_value(&a), cmp.hash_value(&b));

        let changed = arr(vec![Value::Int32(1), Value::Int32(9), Value::Int32(3)]);
        let reordered = arr(vec![Value::Int32(3), Value::Int32(2), Value::Int32(1)]);
        let shorter = arr(vec![Value::Int32(1), Value::Int32(2)]);
        assert!(!cmp.equals(&a, &changed));
        assert!(!cmp.equals(&a, &reordered));
        assert!(!cmp.equals(&a, &shorter));
    }

    #[test]
    fn null_elements_are_distinguishable() {
        let cmp = container_comparer(None);
        let with_null = arr(vec![Value::Int32(1), Value::Null]);
        let without = arr(vec![Value::Int32(1)]);
        assert!(!cmp.equals(&with_null, &without));
        assert_ne!(cmp.hash_value(&with_null), cmp.hash_value(&without));
        assert!(cmp.equals(&with_null, &with_null.clone()));
    }

    #[test]
    fn both_null_containers_are_equal() {
        let cmp = container_comparer(None);
        assert!(cmp.equals(&Value::Null, &Value::Null));
        assert!(!cmp.equals(&Value::Null, &arr(vec![])));
    }

    #[test]
    fn custom_element_comparer_is_wrapped() {
        // Case-insensitive text elements.
        let custom = ValueComparer::custom(
            Arc::new(|a, b| match (a, b) {
                (Value::Text(x), Value::Text(y)) => x.eq_ignore_ascii_case(y),
                (a, b) => structural_eq(a, b),
            }),
            Arc::new(|v, hasher| match v {
                Value::Text(s) => hasher.write(s.to_ascii_lowercase().as_bytes()),
                other => structural_hash(other, hasher),
            }),
            Arc::new(Value::clone),
        );
        let cmp = container_comparer(Some(custom));
        assert_eq!(cmp.tier(), ComparerTier::Custom);

        let a = arr(vec![Value::Text("Fat".into()), Value::Text("RAT".into())]);
        let b = arr(vec![Value::Text("fat".into()), Value::Text("rat".into())]);
        assert!(cmp.equals(&a, &b));
        assert_eq!(cmp.hash_value(&a), cmp.hash_value(&b));
    }

    #[test]
    fn tier_priority_follows_element_comparer() {
        assert_eq!(container_comparer(None).tier(), ComparerTier::NativeEquality);
        assert_eq!(
            container_comparer(Some(ValueComparer::native())).tier(),
            ComparerTier::NativeEquality
        );
        assert_eq!(
            container_comparer(Some(ValueComparer::fallback())).tier(),
            ComparerTier::Fallback
        );
    }

    #[test]
    fn snapshot_is_isolated_from_source_mutation() {
        let cmp = container_comparer(None);
        let mut original = arr(vec![Value::Int32(1), Value::Int32(2)]);
        let reference = cmp.snapshot(&original);
        let snapshot = cmp.snapshot(&original);

        if let Value::Array(items) = &mut original {
            items[0] = Value::Int32(99);
        }
        assert!(cmp.equals(&snapshot, &reference));
        assert!(!cmp.equals(&original, &snapshot));
    }

    #[test]
    fn float_values_compare_by_bits() {
        let native = ValueComparer::native();
        let nan = Value::Float64(f64::NAN);
        assert!(native.equals(&nan, &nan.clone()));
        assert!(!native.equals(&Value::Float64(0.0), &Value::Float64(-0.0)));
    }
}
