//! Arbitrary-precision-ish decimal values backed by a scaled `i128`.
//!
//! The store's `numeric` type is mapped through this helper so literal
//! generation and comparison never round-trip through binary floats.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum total digit count representable without overflow headroom games.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Errors that can occur while building or parsing decimal values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("decimal scale {scale} outside supported range")]
    ScaleOutOfRange { scale: i8 },
    #[error("decimal value {value} with scale {scale} exceeds maximum precision")]
    PrecisionOverflow { value: i128, scale: i8 },
    #[error("decimal parse overflow")]
    Overflow,
}

/// A decimal value as a scaled integer: `value * 10^-scale`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    value: i128,
    scale: i8,
}

impl DecimalValue {
    /// Create a decimal from its raw parts, validating precision bounds.
    pub fn new(value: i128, scale: i8) -> Result<Self, DecimalError> {
        let max = MAX_DECIMAL_PRECISION as i16;
        if !(-max..=max).contains(&(scale as i16)) {
            return Err(DecimalError::ScaleOutOfRange { scale });
        }
        if digit_count(value) > MAX_DECIMAL_PRECISION {
            return Err(DecimalError::PrecisionOverflow { value, scale });
        }
        Ok(Self { value, scale })
    }

    /// Construct a decimal from an integer with zero scale.
    pub fn from_i64(value: i64) -> Self {
        Self::new(value as i128, 0).expect("i64 fits within decimal limits")
    }

    /// The scaled integer backing this decimal.
    #[inline]
    pub fn raw_value(self) -> i128 {
        self.value
    }

    /// Number of fractional digits.
    #[inline]
    pub fn scale(self) -> i8 {
        self.scale
    }

    /// Total digit count.
    #[inline]
    pub fn precision(self) -> u8 {
        digit_count(self.value)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            // Negative scale means trailing zeros; value * 10^|scale|.
            let mut out = self.value.to_string();
            for _ in 0..(-self.scale) {
                out.push('0');
            }
            return f.write_str(&out);
        }
        let negative = self.value < 0;
        let digits = self.value.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if negative {
            f.write_str("-")?;
        }
        if digits.len() <= scale {
            write!(f, "0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        } else {
            let split = digits.len() - scale;
            f.write_str(&digits[..split])?;
            f.write_str(".")?;
            f.write_str(&digits[split..])
        }
    }
}

impl FromStr for DecimalValue {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        let scale = frac_part.len();
        if scale > MAX_DECIMAL_PRECISION as usize {
            return Err(DecimalError::ScaleOutOfRange { scale: scale as i8 });
        }

        let combined = format!("{int_part}{frac_part}");
        let value = combined
            .parse::<i128>()
            .map_err(|_| DecimalError::Overflow)?;

        Self::new(value, scale as i8)
    }
}

impl PartialOrd for DecimalValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalValue {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.scale == other.scale {
            return self.value.cmp(&other.value);
        }
        // Rescale the lower-scale side. On overflow the rescaled side has
        // larger magnitude than anything representable, so its sign decides.
        if self.scale < other.scale {
            let diff = (other.scale - self.scale) as u32;
            match rescale(self.value, diff) {
                Some(scaled) => scaled.cmp(&other.value),
                None => sign_ordering(self.value),
            }
        } else {
            let diff = (self.scale - other.scale) as u32;
            match rescale(other.value, diff) {
                Some(scaled) => self.value.cmp(&scaled),
                None => sign_ordering(other.value).reverse(),
            }
        }
    }
}

fn rescale(value: i128, pow: u32) -> Option<i128> {
    let factor = 10_i128.checked_pow(pow)?;
    value.checked_mul(factor)
}

fn sign_ordering(value: i128) -> Ordering {
    if value >= 0 {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

fn digit_count(mut value: i128) -> u8 {
    if value == 0 {
        return 1;
    }
    if value < 0 {
        value = value.wrapping_neg();
    }
    let mut count: u8 = 0;
    while value != 0 {
        value /= 10;
        count += 1;
    }
    count
}
