// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip price, stored as whole cents.
//!
//! Prices cross the API boundary as decimal strings ("45.00") and are stored
//! as integer cents. No floating point is involved at any stage.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A trip price in whole cents.
///
/// Serializes as its decimal string form ("45.00") rather than a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Price(i64);

impl Price {
    /// Creates a price from a cent count.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the price as whole cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Parses a decimal price string such as "45", "45.5", or "45.00".
    ///
    /// At most two fractional digits are accepted. The price must be
    /// greater than zero.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the string is empty, contains
    /// anything other than digits and a single decimal point, has more than
    /// two fractional digits, is zero, or overflows.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPrice(
                "price cannot be empty".to_string(),
            ));
        }

        let (whole_part, fraction_part) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, "0"),
        };

        if whole_part.is_empty() || !whole_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPrice(format!(
                "'{trimmed}' is not a decimal amount"
            )));
        }

        if fraction_part.is_empty()
            || fraction_part.len() > 2
            || !fraction_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(DomainError::InvalidPrice(format!(
                "'{trimmed}' must have one or two fractional digits"
            )));
        }

        let whole: i64 = whole_part
            .parse()
            .map_err(|_| DomainError::InvalidPrice(format!("'{trimmed}' is out of range")))?;

        // "45.5" means 45 dollars 50 cents, not 45 dollars 5 cents.
        let mut fraction: i64 = fraction_part
            .parse()
            .map_err(|_| DomainError::InvalidPrice(format!("'{trimmed}' is out of range")))?;
        if fraction_part.len() == 1 {
            fraction *= 10;
        }

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(|| DomainError::InvalidPrice(format!("'{trimmed}' is out of range")))?;

        if cents == 0 {
            return Err(DomainError::InvalidPrice(
                "price must be greater than zero".to_string(),
            ));
        }

        Ok(Self(cents))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

impl TryFrom<String> for Price {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
