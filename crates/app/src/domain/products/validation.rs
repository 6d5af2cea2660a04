//! Product field validation.
//!
//! Every value that reaches the products service has passed through one of the
//! constructors in this module. Fields are private so an unchecked value can't
//! be assembled elsewhere.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use thiserror::Error;

/// Maximum product name length, counted in characters after trimming.
pub const NAME_MAX_CHARS: usize = 255;

/// Maximum product description length, counted in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 10_000;

/// Total significant digits allowed in a price (`NUMERIC(10, 2)`).
pub const PRICE_MAX_DIGITS: u32 = 10;

/// Fractional digits allowed in a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// A single field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field required")]
    Missing,

    #[error("must be between {min} and {max} characters")]
    Length { min: usize, max: usize },

    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    #[error("must be greater than zero")]
    NotPositive,

    #[error("must have at most {max} decimal places")]
    TooManyDecimalPlaces { max: u32 },

    #[error("must have at most {max} digits in total")]
    TooManyDigits { max: u32 },

    #[error("must not be negative")]
    Negative,
}

/// A validation failure tied to the field it was raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub error: FieldError,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// One or more field violations collected from a single payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`.
    pub fn push(&mut self, field: &'static str, error: FieldError) {
        self.violations.push(FieldViolation { field, error });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> impl Iterator<Item = &FieldViolation> {
        self.violations.iter()
    }

    /// Returns `true` if any violation was raised for `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }

    /// Keep the value when no violations were recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// Unwrap a field result, recording its error under `field`.
    pub(crate) fn check<T>(
        &mut self,
        field: &'static str,
        result: Result<T, FieldError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(field, error);

                None
            }
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            Display::fmt(violation, f)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A product name, trimmed and between 1 and 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    /// # Errors
    ///
    /// Returns [`FieldError::Length`] when the trimmed name is empty or too long.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();

        if chars == 0 || chars > NAME_MAX_CHARS {
            return Err(FieldError::Length {
                min: 1,
                max: NAME_MAX_CHARS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ProductName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A product description of at most 10,000 characters. Empty is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDescription(String);

impl ProductDescription {
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] when the description exceeds the limit.
    pub fn parse(raw: String) -> Result<Self, FieldError> {
        if raw.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(FieldError::TooLong {
                max: DESCRIPTION_MAX_CHARS,
            });
        }

        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A strictly positive price that fits `NUMERIC(10, 2)`, held at scale 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductPrice(Decimal);

impl ProductPrice {
    /// Trailing fractional zeros are not significant, so `12.500` is accepted
    /// as `12.50` while `12.505` is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error when the price is zero or negative, has more than two
    /// significant decimal places, or has more than ten digits in total.
    pub fn parse(raw: Decimal) -> Result<Self, FieldError> {
        if raw <= Decimal::ZERO {
            return Err(FieldError::NotPositive);
        }

        let mut price = raw.normalize();

        if price.scale() > PRICE_DECIMAL_PLACES {
            return Err(FieldError::TooManyDecimalPlaces {
                max: PRICE_DECIMAL_PLACES,
            });
        }

        // Eight integer digits leave room for the two fractional ones.
        if price >= Decimal::from(100_000_000_u32) {
            return Err(FieldError::TooManyDigits {
                max: PRICE_MAX_DIGITS,
            });
        }

        price.rescale(PRICE_DECIMAL_PLACES);

        Ok(Self(price))
    }

    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}
