use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Weights applied positionally to the seven base digits.
const WEIGHTS: [u32; 7] = [7, 9, 10, 5, 8, 4, 2];

/// Number of digits in the base part of a business id.
pub const BASE_DIGITS: usize = 7;

// Optional country prefix, six (legacy) or seven base digits, optional hyphen
// and a single check digit. Nothing may follow the check digit.
static FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:FI)?([0-9]{6,7})-?([0-9])$").expect("this must never fail")
});

/// A validated Finnish business identifier (Y-tunnus).
///
/// Format:
/// `{DIGITS}-{CHECK}`, where:
/// - `DIGITS` is a seven digit base number. Legacy identifiers with six digits
///   are left-padded with a zero.
/// - `CHECK` is a single mod-11 check digit computed from `DIGITS`.
///
/// Values of this type only exist for input which passed both the format and
/// the checksum validation. Two ids are equal when their canonical forms are
/// equal, regardless of how the input was written.
///
/// # Examples
///
/// ```
/// use ytj::BusinessId;
///
/// let id = BusinessId::normalize("FI01120389").unwrap();
/// assert_eq!(id.to_string(), "0112038-9");
/// assert_eq!(id, BusinessId::normalize(" 0112038-9 ").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct BusinessId {
    raw: String,
    digits: String,
    check_digit: u8,
}

impl BusinessId {
    /// Validates and normalizes a raw business id.
    ///
    /// Accepts an optional `FI` prefix (in either case), surrounding
    /// whitespace and a missing hyphen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the input does not look like a business
    /// id, and [`Error::Checksum`] if the check digit does not match the base
    /// digits.
    pub fn normalize(raw: &str) -> Result<Self, Error> {
        let (digits, check_digit) =
            parse_format(raw).ok_or_else(|| Error::Format(raw.to_string()))?;
        let digits = pad_digits(&digits);

        match compute_checksum(&digits) {
            Some(expected) if expected == check_digit => Ok(Self {
                raw: raw.to_string(),
                digits,
                check_digit,
            }),
            _ => Err(Error::Checksum(raw.to_string())),
        }
    }

    /// Returns the input exactly as it was supplied.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the seven base digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the check digit.
    #[must_use]
    pub const fn check_digit(&self) -> u8 {
        self.check_digit
    }
}

impl PartialEq for BusinessId {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits && self.check_digit == other.check_digit
    }
}

impl Eq for BusinessId {}

impl Hash for BusinessId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
        self.check_digit.hash(state);
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.digits, self.check_digit)
    }
}

impl FromStr for BusinessId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<&str> for BusinessId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::normalize(value)
    }
}

impl Serialize for BusinessId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BusinessId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::normalize(&raw).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when validating a business id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input does not match the business id pattern.
    #[error("Invalid business id format: '{0}'")]
    Format(String),

    /// The check digit does not match the base digits.
    #[error("Invalid business id checksum: '{0}'")]
    Checksum(String),
}

/// Splits a raw business id into its base digits and check digit.
///
/// Only the format is checked. The returned base digits are exactly as
/// captured, so legacy identifiers yield six digits.
#[must_use]
pub fn parse_format(raw: &str) -> Option<(String, u8)> {
    let captures = FORMAT.captures(raw.trim())?;
    let digits = captures.get(1)?.as_str().to_string();
    let check_digit = captures.get(2)?.as_str().parse().ok()?;
    Some((digits, check_digit))
}

/// Left-pads base digits with zeros to seven digits.
#[must_use]
pub fn pad_digits(digits: &str) -> String {
    let width = BASE_DIGITS;
    format!("{digits:0>width$}")
}

/// Computes the expected check digit for seven base digits.
///
/// Returns `None` when the weighted sum leaves a remainder of 1, for which no
/// check digit exists. Characters other than ASCII digits are skipped, so the
/// input should come from [`pad_digits`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn compute_checksum(digits: &str) -> Option<u8> {
    let sum: u32 = digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .zip(WEIGHTS)
        .map(|(digit, weight)| digit * weight)
        .sum();

    match sum % 11 {
        0 => Some(0),
        1 => None,
        remainder => Some((11 - remainder) as u8),
    }
}

/// Checks whether the input looks like a business id, ignoring the checksum.
#[must_use]
pub fn is_valid_format(raw: &str) -> bool {
    parse_format(raw).is_some()
}

/// Checks whether the input is well-formed and carries the correct check
/// digit.
#[must_use]
pub fn is_valid_checksum(raw: &str) -> bool {
    parse_format(raw).is_some_and(|(digits, check_digit)| {
        compute_checksum(&pad_digits(&digits)) == Some(check_digit)
    })
}
