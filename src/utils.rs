//! Conversions between human-readable decimal amounts and base units.

use alloy::primitives::utils::{self, ParseUnits};
use alloy::primitives::U256;
use std::fmt::Display;

use crate::error::{EnterL2Error, Result};

/// Decimals of the native token.
pub const NATIVE_DECIMALS: u8 = 18;

/// Parse a decimal string such as `"1.5"` into base units.
///
/// Negative amounts are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    match utils::parse_units(amount.trim(), decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(invalid(amount, "negative amount")),
        Err(e) => Err(invalid(amount, e)),
    }
}

/// Render base units as a decimal string without trailing zeros (`"1.5"`, `"10"`).
pub fn format_units(value: U256, decimals: u8) -> Result<String> {
    let formatted =
        utils::format_units(value, decimals).map_err(|e| invalid(&value.to_string(), e))?;

    if formatted.contains('.') {
        Ok(formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string())
    } else {
        Ok(formatted)
    }
}

fn invalid(amount: &str, reason: impl Display) -> EnterL2Error {
    EnterL2Error::InvalidAmount(format!("'{}': {}", amount, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_parse_units() {
        assert_eq!(
            parse_units("1.5", NATIVE_DECIMALS).unwrap(),
            U256::from(3 * ETHER / 2)
        );
        assert_eq!(parse_units(" 10 ", 6).unwrap(), U256::from(10_000_000u64));
        assert_eq!(parse_units("0", 6).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_units_rejects_bad_input() {
        let err = parse_units("-1", 18).unwrap_err();
        assert!(matches!(err, EnterL2Error::InvalidAmount(ref m) if m.contains("negative")));
        assert!(matches!(
            parse_units("ten", 18),
            Err(EnterL2Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(3 * ETHER / 2), 18).unwrap(), "1.5");
        assert_eq!(format_units(U256::from(10_000_000u64), 6).unwrap(), "10");
        assert_eq!(format_units(U256::ZERO, 18).unwrap(), "0");
        assert_eq!(
            format_units(U256::from(1u64), 18).unwrap(),
            "0.000000000000000001"
        );
    }
}
