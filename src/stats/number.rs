//! Validation of numeric and percentage options
//!
//! Every numeric option goes through [`parse_positive_number`] so that bounds
//! and error messages stay uniform.

use std::str::FromStr;

use crate::stats::error::NumberError;

/// Upper bound for any percentage value
pub const PERCENT_BOUND: f64 = 100.0;

/// Parse `text` as a non-negative number no larger than `upper_bound`
pub fn parse_positive_number(text: &str, upper_bound: f64) -> Result<f64, NumberError> {
    let value = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| NumberError::Parse(text.to_string()))?;

    check_bounds(value, upper_bound)
}

fn check_bounds(value: f64, upper_bound: f64) -> Result<f64, NumberError> {
    if value < 0.0 {
        return Err(NumberError::Negative(value));
    }
    if value > upper_bound {
        return Err(NumberError::OutOfBound {
            value,
            bound: upper_bound,
        });
    }

    Ok(value)
}

/// A number that is either already numeric or still textual
#[derive(Debug, Clone, PartialEq)]
pub enum NumberInput<'a> {
    Number(f64),
    Text(&'a str),
}

/// Numbers are accepted as-is, text is validated with [`parse_positive_number`]
pub fn ensure_positive_number(input: NumberInput<'_>) -> Result<f64, NumberError> {
    match input {
        NumberInput::Number(value) => Ok(value),
        NumberInput::Text(text) => parse_positive_number(text, f64::INFINITY),
    }
}

/// A percentage in `[0, 100]`, written with a trailing `%`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(f64);

impl Percentage {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// The share of `total` this percentage stands for
    pub fn of(&self, total: u64) -> f64 {
        total as f64 * self.0 / 100.0
    }
}

/// Error produced when parsing a [`Percentage`]
#[derive(Debug, Clone, PartialEq)]
pub enum PercentageError {
    MissingSuffix,
    Number(NumberError),
}

impl FromStr for Percentage {
    type Err = PercentageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_suffix('%')
            .ok_or(PercentageError::MissingSuffix)?;
        parse_positive_number(digits, PERCENT_BOUND)
            .map(Percentage)
            .map_err(PercentageError::Number)
    }
}

/// Lower bound on downloads, absolute or relative to the total
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Absolute(f64),
    Percentage(Percentage),
}

impl Threshold {
    /// Resolve to an absolute download count against the pre-filter `total`
    pub fn resolve(&self, total: u64) -> f64 {
        match self {
            Threshold::Absolute(value) => *value,
            Threshold::Percentage(pct) => pct.of(total),
        }
    }
}

impl FromStr for Threshold {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Percentage>() {
            Ok(pct) => Ok(Threshold::Percentage(pct)),
            Err(PercentageError::Number(e)) => Err(e),
            Err(PercentageError::MissingSuffix) => {
                ensure_positive_number(NumberInput::Text(s)).map(Threshold::Absolute)
            }
        }
    }
}
