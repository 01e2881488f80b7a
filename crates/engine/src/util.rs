//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Declares a string-backed enum with `as_str`, `Display` and a fallible
/// `TryFrom<&str>` that reports the offending value as `InvalidInput`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err($crate::EngineError::InvalidInput(format!(
                        concat!("invalid ", $label, ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

pub(crate) use string_enum;

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

pub(crate) fn parse_optional_uuid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    value.map(|v| parse_uuid(v, label)).transpose()
}

/// Generates a human-facing reference such as `CTR-3F9A12BC`: the prefix
/// followed by the first 8 hex digits of a fresh v4 UUID, upper-cased.
pub(crate) fn reference_number(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", hex[..8].to_uppercase())
}

pub(crate) fn require_positive(value: f64, field: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::InvalidInput(format!("{field} must be > 0")));
    }
    Ok(value)
}

/// `quantity * unit_price`, refusing a product that is not a finite number.
pub(crate) fn total_price(quantity: f64, unit_price: f64) -> ResultEngine<f64> {
    let total = quantity * unit_price;
    if !total.is_finite() {
        return Err(EngineError::InvalidInput(
            "total_price_ngn out of range".to_string(),
        ));
    }
    Ok(total)
}

pub(crate) fn normalize_required_text(value: &str, field: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_number_has_prefix_and_eight_upper_hex_digits() {
        let number = reference_number("CTR");
        let (prefix, digits) = number.split_once('-').unwrap();
        assert_eq!(prefix, "CTR");
        assert_eq!(digits.len(), 8);
        assert!(
            digits
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn positive_values_are_enforced() {
        assert_eq!(require_positive(1.5, "quantity_kg"), Ok(1.5));
        assert_eq!(
            require_positive(0.0, "quantity_kg"),
            Err(EngineError::InvalidInput(
                "quantity_kg must be > 0".to_string()
            ))
        );
        assert!(require_positive(-3.0, "unit_price_ngn").is_err());
        assert!(require_positive(f64::NAN, "unit_price_ngn").is_err());
    }

    #[test]
    fn total_price_must_stay_finite() {
        assert_eq!(total_price(2.0, 150.0), Ok(300.0));
        assert_eq!(
            total_price(1e200, 1e200),
            Err(EngineError::InvalidInput(
                "total_price_ngn out of range".to_string()
            ))
        );
    }

    #[test]
    fn optional_text_is_trimmed_and_emptied() {
        assert_eq!(normalize_optional_text(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional_text(Some(" clay ".to_string())),
            Some("clay".to_string())
        );
        assert!(normalize_required_text(" ", "name").is_err());
    }
}
