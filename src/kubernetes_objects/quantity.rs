use std::fmt::Display;
use std::str::FromStr;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use thiserror::Error;

const BINARY_SI_SUFFIXES: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const DECIMAL_SI_SUFFIXES: [&str; 9] = ["n", "u", "m", "k", "M", "G", "T", "P", "E"];

/// A Kubernetes resource quantity such as `200m` or `500Mi`.
///
/// Only the syntax is checked; whether the amount is schedulable is up to the
/// API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuantity(String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityParseError {
    #[error("quantity is empty")]
    Empty,

    #[error("quantity '{0}' does not start with a decimal number")]
    InvalidNumber(String),

    #[error("quantity '{quantity}' has unknown suffix '{suffix}'")]
    UnknownSuffix { quantity: String, suffix: String },
}

impl ResourceQuantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn to_quantity(&self) -> Quantity {
        Quantity(self.0.clone())
    }
}

impl FromStr for ResourceQuantity {
    type Err = QuantityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(QuantityParseError::Empty);
        }

        let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
        let number_end = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(number_end);

        if !is_decimal(number) {
            return Err(QuantityParseError::InvalidNumber(s.to_string()));
        }

        let known_suffix = suffix.is_empty()
            || BINARY_SI_SUFFIXES.contains(&suffix)
            || DECIMAL_SI_SUFFIXES.contains(&suffix)
            || is_exponent(suffix);

        if known_suffix {
            Ok(ResourceQuantity(s.to_string()))
        } else {
            Err(QuantityParseError::UnknownSuffix {
                quantity: s.to_string(),
                suffix: suffix.to_string(),
            })
        }
    }
}

impl Display for ResourceQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_decimal(number: &str) -> bool {
    number.matches('.').count() <= 1 && number.chars().any(|c| c.is_ascii_digit())
}

/// `e3`, `E-2`, `e+10`
fn is_exponent(suffix: &str) -> bool {
    let Some(exponent) = suffix.strip_prefix(['e', 'E']) else {
        return false;
    };
    let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
