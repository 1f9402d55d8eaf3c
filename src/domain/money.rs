//! Integer-cent arithmetic shared by the engine.
//!
//! All amounts are stored as `i64` cents so splits and aggregates stay
//! exact. Decimal strings only appear at the wire boundary.

use thiserror::Error;

/// Splits `total_cents` into `parts` amounts that sum back exactly.
/// Remainder cents go to the first part: `10000 / 3 -> [3334, 3333, 3333]`.
pub fn split_even(total_cents: i64, parts: u32) -> Vec<i64> {
    let parts = i64::from(parts.max(1));
    let base = total_cents / parts;
    let remainder = total_cents % parts;
    (0..parts)
        .map(|i| if i == 0 { base + remainder } else { base })
        .collect()
}

/// Period-over-period percentage change.
///
/// Both zero reports 0%; a zero previous value with a non-zero current one
/// reports 100% in the direction of the current value.
pub fn percent_change(previous_cents: i64, current_cents: i64) -> f64 {
    if previous_cents == 0 {
        if current_cents == 0 {
            0.0
        } else if current_cents > 0 {
            100.0
        } else {
            -100.0
        }
    } else {
        (current_cents - previous_cents) as f64 / previous_cents.abs() as f64 * 100.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount `{0}`")]
    Invalid(String),
    #[error("more than two decimal places in `{0}`")]
    Precision(String),
}

/// Parses a wire decimal string (`"149.90"`, `"7"`, `"-3.5"`) into cents.
pub fn parse_decimal_cents(raw: &str) -> Result<i64, ParseAmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    let negative = trimmed.starts_with('-');
    let unsigned = trimmed.trim_start_matches(['-', '+']);
    let (units_part, frac_part) = match unsigned.split_once('.') {
        Some((units, frac)) => (units, frac),
        None => (unsigned, ""),
    };
    if units_part.is_empty() && frac_part.is_empty() {
        return Err(ParseAmountError::Invalid(raw.into()));
    }
    if frac_part.len() > 2 {
        return Err(ParseAmountError::Precision(raw.into()));
    }
    let digits_only =
        |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if (!units_part.is_empty() && !digits_only(units_part))
        || (!frac_part.is_empty() && !digits_only(frac_part))
    {
        return Err(ParseAmountError::Invalid(raw.into()));
    }
    let units: i64 = if units_part.is_empty() {
        0
    } else {
        units_part
            .parse()
            .map_err(|_| ParseAmountError::Invalid(raw.into()))?
    };
    let mut frac = frac_part.to_owned();
    while frac.len() < 2 {
        frac.push('0');
    }
    let frac_cents: i64 = frac
        .parse()
        .map_err(|_| ParseAmountError::Invalid(raw.into()))?;
    let magnitude = units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(frac_cents))
        .ok_or_else(|| ParseAmountError::Invalid(raw.into()))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Formats cents back into the wire decimal representation.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sums_back_exactly() {
        for (total, parts) in [(10000, 3), (29999, 7), (1, 4), (100, 1)] {
            let split = split_even(total, parts);
            assert_eq!(split.len(), parts as usize);
            assert_eq!(split.iter().sum::<i64>(), total);
        }
    }

    #[test]
    fn split_allocates_remainder_to_first_part() {
        assert_eq!(split_even(10000, 3), vec![3334, 3333, 3333]);
        assert_eq!(split_even(100, 3), vec![34, 33, 33]);
    }

    #[test]
    fn percent_change_zero_rules() {
        assert_eq!(percent_change(0, 0), 0.0);
        assert_eq!(percent_change(0, 50000), 100.0);
        assert_eq!(percent_change(0, -200), -100.0);
        assert_eq!(percent_change(20000, 30000), 50.0);
        assert_eq!(percent_change(40000, 30000), -25.0);
    }

    #[test]
    fn parses_wire_amounts() {
        assert_eq!(parse_decimal_cents("149.90"), Ok(14990));
        assert_eq!(parse_decimal_cents("7"), Ok(700));
        assert_eq!(parse_decimal_cents("0.5"), Ok(50));
        assert_eq!(parse_decimal_cents("-3.25"), Ok(-325));
        assert_eq!(parse_decimal_cents(" 12.00 "), Ok(1200));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_decimal_cents(""), Err(ParseAmountError::Empty));
        assert!(matches!(
            parse_decimal_cents("12.345"),
            Err(ParseAmountError::Precision(_))
        ));
        assert!(matches!(
            parse_decimal_cents("abc"),
            Err(ParseAmountError::Invalid(_))
        ));
        assert!(matches!(
            parse_decimal_cents("1.2.3"),
            Err(ParseAmountError::Invalid(_))
        ));
    }

    #[test]
    fn formats_round_trip() {
        for cents in [0, 5, 99, 100, 14990, -325] {
            assert_eq!(parse_decimal_cents(&format_cents(cents)), Ok(cents));
        }
    }
}
