//! Ether ↔ wei conversion on decimal strings.
//!
//! Amounts typed by the user are parsed digit by digit into a [`U256`] so that
//! every value with at most 18 fractional digits converts exactly. Floats are
//! never involved.

use alloy_primitives::U256;
use thiserror::Error;

/// Number of fractional digits in one ether.
pub const ETHER_DECIMALS: usize = 18;

/// 10^18 wei.
pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("invalid amount: {0:?}")]
    Malformed(String),

    #[error("amount has more than 18 decimal places")]
    TooManyDecimals,

    #[error("amount is too large")]
    Overflow,
}

/// Parse a display-unit amount such as `"1.5"` into wei.
///
/// Accepts an optional integer part, an optional `.` and an optional
/// fractional part (at least one digit overall). Surrounding whitespace is
/// ignored. Signs, exponents and separators are rejected.
pub fn parse_ether(input: &str) -> Result<U256, AmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }
    if s.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(AmountError::Malformed(s.to_string()));
    }
    if frac.len() > ETHER_DECIMALS {
        return Err(AmountError::TooManyDecimals);
    }

    let ten = U256::from(10u8);
    let padding = std::iter::repeat(b'0').take(ETHER_DECIMALS - frac.len());
    whole
        .bytes()
        .chain(frac.bytes())
        .chain(padding)
        .try_fold(U256::ZERO, |acc, digit| {
            acc.checked_mul(ten)?
                .checked_add(U256::from(digit - b'0'))
        })
        .ok_or(AmountError::Overflow)
}

/// Format a wei amount in ether, dropping trailing fractional zeros.
///
/// `2000000000000000000` formats as `"2"`, `1500000000000000000` as `"1.5"`.
pub fn format_ether(wei: U256) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>width$}", frac.to_string(), width = ETHER_DECIMALS);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
