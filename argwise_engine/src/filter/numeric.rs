use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::error::{ConfigError, FilterError};
use crate::filter::ValueFilter;
use crate::model::Value;

const DECIMAL_RADIX: u32 = 10;

fn check_radix(radix: u32) -> Result<u32, ConfigError> {
    if (2..=36).contains(&radix) {
        Ok(radix)
    } else {
        Err(ConfigError::InvalidFilter(format!(
            "radix {radix} is outside of [2, 36]."
        )))
    }
}

fn radix_suffix(radix: u32) -> String {
    if radix == DECIMAL_RADIX {
        String::default()
    } else {
        format!(" (radix {radix})")
    }
}

fn bounds_text<T: std::fmt::Display>(min: Option<&T>, max: Option<&T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(" in [{min}, {max}]"),
        (Some(min), None) => format!(" >= {min}"),
        (None, Some(max)) => format!(" <= {max}"),
        (None, None) => String::default(),
    }
}

/// Accepts 64-bit signed integers within an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerFilter {
    min: i64,
    max: i64,
    radix: u32,
}

impl Default for IntegerFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerFilter {
    /// An unbounded decimal integer filter.
    pub fn new() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
            radix: DECIMAL_RADIX,
        }
    }

    /// Set the inclusive lower bound.
    pub fn min(mut self, min: i64) -> Self {
        self.min = min;
        self
    }

    /// Set the inclusive upper bound.
    pub fn max(mut self, max: i64) -> Self {
        self.max = max;
        self
    }

    /// Parse with the given radix (2 to 36).
    ///
    /// ### Example
    /// ```
    /// # use argwise_engine as argwise;
    /// use argwise::{IntegerFilter, Value, ValueFilter};
    ///
    /// let filter = IntegerFilter::new().radix(16).unwrap();
    /// assert_eq!(filter.parse("ff").unwrap(), Value::Integer(255));
    /// assert!(IntegerFilter::new().radix(40).is_err());
    /// ```
    pub fn radix(mut self, radix: u32) -> Result<Self, ConfigError> {
        self.radix = check_radix(radix)?;
        Ok(self)
    }

    /// The inclusive lower bound.
    pub fn lower(&self) -> i64 {
        self.min
    }

    /// The inclusive upper bound.
    pub fn upper(&self) -> i64 {
        self.max
    }

    /// The radix values are parsed in.
    pub fn base(&self) -> u32 {
        self.radix
    }
}

impl ValueFilter for IntegerFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        let suffix = radix_suffix(self.radix);
        let value = i64::from_str_radix(raw, self.radix)
            .map_err(|_| FilterError::new(format!("'{raw}' is not an integer{suffix}.")))?;

        if value < self.min || value > self.max {
            return Err(FilterError::new(format!(
                "'{raw}' is not within [{}, {}]{suffix}.",
                self.min, self.max
            )));
        }

        Ok(Value::Integer(value))
    }

    fn describe(&self) -> String {
        let min = (self.min != i64::MIN).then_some(&self.min);
        let max = (self.max != i64::MAX).then_some(&self.max);
        format!(
            "integer{}{}",
            bounds_text(min, max),
            radix_suffix(self.radix)
        )
    }
}

/// Accepts arbitrary precision integers, optionally bounded (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigIntegerFilter {
    min: Option<BigInt>,
    max: Option<BigInt>,
    radix: u32,
}

impl Default for BigIntegerFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BigIntegerFilter {
    /// An unbounded decimal big integer filter.
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
            radix: DECIMAL_RADIX,
        }
    }

    /// Reject values below `min`.
    pub fn min(mut self, min: impl Into<BigInt>) -> Self {
        self.min.replace(min.into());
        self
    }

    /// Reject values above `max`.
    pub fn max(mut self, max: impl Into<BigInt>) -> Self {
        self.max.replace(max.into());
        self
    }

    /// Parse with the given radix (2 to 36).
    pub fn radix(mut self, radix: u32) -> Result<Self, ConfigError> {
        self.radix = check_radix(radix)?;
        Ok(self)
    }

    /// The inclusive lower bound, if any.
    pub fn lower(&self) -> Option<&BigInt> {
        self.min.as_ref()
    }

    /// The inclusive upper bound, if any.
    pub fn upper(&self) -> Option<&BigInt> {
        self.max.as_ref()
    }

    /// The radix values are parsed in.
    pub fn base(&self) -> u32 {
        self.radix
    }
}

impl ValueFilter for BigIntegerFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        let suffix = radix_suffix(self.radix);
        let value = BigInt::parse_bytes(raw.as_bytes(), self.radix)
            .ok_or_else(|| FilterError::new(format!("'{raw}' is not an integer{suffix}.")))?;

        let too_small = self.min.as_ref().is_some_and(|min| &value < min);
        let too_large = self.max.as_ref().is_some_and(|max| &value > max);

        if too_small || too_large {
            return Err(FilterError::new(format!(
                "'{raw}' is not{}{suffix}.",
                bounds_text(self.min.as_ref(), self.max.as_ref())
            )));
        }

        Ok(Value::BigInteger(value))
    }

    fn describe(&self) -> String {
        format!(
            "big integer{}{}",
            bounds_text(self.min.as_ref(), self.max.as_ref()),
            radix_suffix(self.radix)
        )
    }
}

/// Accepts IEEE double precision numbers, optionally bounded (inclusive).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecimalFilter {
    min: Option<f64>,
    max: Option<f64>,
}

impl DecimalFilter {
    /// An unbounded decimal filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values below `min`.
    pub fn min(mut self, min: f64) -> Self {
        self.min.replace(min);
        self
    }

    /// Reject values above `max`.
    pub fn max(mut self, max: f64) -> Self {
        self.max.replace(max);
        self
    }

    /// The inclusive lower bound, if any.
    pub fn lower(&self) -> Option<f64> {
        self.min
    }

    /// The inclusive upper bound, if any.
    pub fn upper(&self) -> Option<f64> {
        self.max
    }
}

impl ValueFilter for DecimalFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        let value = f64::from_str(raw)
            .map_err(|_| FilterError::new(format!("'{raw}' is not a decimal number.")))?;

        let too_small = self.min.is_some_and(|min| !(value >= min));
        let too_large = self.max.is_some_and(|max| !(value <= max));

        if too_small || too_large {
            return Err(FilterError::new(format!(
                "'{raw}' is not{}.",
                bounds_text(self.min.as_ref(), self.max.as_ref())
            )));
        }

        Ok(Value::Decimal(value))
    }

    fn describe(&self) -> String {
        format!(
            "decimal{}",
            bounds_text(self.min.as_ref(), self.max.as_ref())
        )
    }
}

/// Accepts arbitrary precision decimals, optionally bounded (inclusive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BigDecimalFilter {
    min: Option<BigDecimal>,
    max: Option<BigDecimal>,
}

impl BigDecimalFilter {
    /// An unbounded big decimal filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values below `min`.
    pub fn min(mut self, min: BigDecimal) -> Self {
        self.min.replace(min);
        self
    }

    /// Reject values above `max`.
    pub fn max(mut self, max: BigDecimal) -> Self {
        self.max.replace(max);
        self
    }

    /// The inclusive lower bound, if any.
    pub fn lower(&self) -> Option<&BigDecimal> {
        self.min.as_ref()
    }

    /// The inclusive upper bound, if any.
    pub fn upper(&self) -> Option<&BigDecimal> {
        self.max.as_ref()
    }
}

impl ValueFilter for BigDecimalFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        let value = BigDecimal::from_str(raw)
            .map_err(|_| FilterError::new(format!("'{raw}' is not a decimal number.")))?;

        let too_small = self.min.as_ref().is_some_and(|min| &value < min);
        let too_large = self.max.as_ref().is_some_and(|max| &value > max);

        if too_small || too_large {
            return Err(FilterError::new(format!(
                "'{raw}' is not{}.",
                bounds_text(self.min.as_ref(), self.max.as_ref())
            )));
        }

        Ok(Value::BigDecimal(value))
    }

    fn describe(&self) -> String {
        format!(
            "big decimal{}",
            bounds_text(self.min.as_ref(), self.max.as_ref())
        )
    }
}
