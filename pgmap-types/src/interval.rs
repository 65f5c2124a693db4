//! Interval values stored as calendar months, whole days, and nanoseconds.

/// Interval value stored as a combination of calendar months, whole days,
/// and nanoseconds.
///
/// Months capture month and year components (12 months == 1 year); days are
/// whole 24-hour periods; nanoseconds hold sub-day precision. The store's
/// interval type has the same three-field structure, so no component mixing
/// happens at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntervalValue {
    pub months: i32,
    pub days: i32,
    pub nanos: i64,
}

impl IntervalValue {
    pub const fn new(months: i32, days: i32, nanos: i64) -> Self {
        Self {
            months,
            days,
            nanos,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    pub const fn is_zero(self) -> bool {
        self.months == 0 && self.days == 0 && self.nanos == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            months: self.months.checked_add(other.months)?,
            days: self.days.checked_add(other.days)?,
            nanos: self.nanos.checked_add(other.nanos)?,
        })
    }

    /// Render the interval body in the store's `N mons N days N seconds`
    /// spelling (without surrounding quotes or the INTERVAL keyword).
    pub fn format_sql_body(self) -> String {
        let mut parts = Vec::new();
        if self.months != 0 {
            parts.push(format!("{} mons", self.months));
        }
        if self.days != 0 {
            parts.push(format!("{} days", self.days));
        }
        if self.nanos != 0 || parts.is_empty() {
            let secs = self.nanos / 1_000_000_000;
            let frac = (self.nanos % 1_000_000_000).unsigned_abs();
            if frac == 0 {
                parts.push(format!("{secs} seconds"));
            } else {
                // Keep microsecond resolution; the store stores no finer.
                parts.push(format!("{}.{:06} seconds", secs, frac / 1_000));
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_renders_zero_seconds() {
        assert_eq!(IntervalValue::zero().format_sql_body(), "0 seconds");
        assert!(IntervalValue::zero().is_zero());
    }

    #[test]
    fn mixed_components_render_in_order() {
        let iv = IntervalValue::new(14, 3, 90_500_000_000);
        assert_eq!(iv.format_sql_body(), "14 mons 3 days 90.500000 seconds");
    }

    #[test]
    fn checked_add_combines_componentwise() {
        let a = IntervalValue::new(1, 2, 3);
        let b = IntervalValue::new(10, 20, 30);
        assert_eq!(a.checked_add(b), Some(IntervalValue::new(11, 22, 33)));
        assert_eq!(
            IntervalValue::new(i32::MAX, 0, 0).checked_add(IntervalValue::new(1, 0, 0)),
            None
        );
    }
}
