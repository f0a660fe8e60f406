//! GRIN amount parsing
//!
//! Amounts are entered in whole GRIN on the command line but every wallet
//! RPC speaks nanoGRIN (10^-9 GRIN). Conversion is done on decimal strings
//! with fixed-point integers so no float rounding or process-wide precision
//! context is involved.

use crate::{Error, Result};

/// Smallest indivisible unit: 1 GRIN = 10^9 nanoGRIN.
pub const NANOGRIN_PER_GRIN: u64 = 1_000_000_000;

/// Sanity ceiling for a single send, in whole GRIN.
pub const MAX_SEND_GRIN: u64 = 100_000;

const NANO_DIGITS: usize = 9;

/// Convert a decimal GRIN string (e.g. `"1.5"`) to nanoGRIN.
///
/// Rejects non-numeric input, amounts above [`MAX_SEND_GRIN`], and fractions
/// finer than one nanoGRIN.
pub fn grins_to_nanogrins(input: &str) -> Result<u64> {
    let value = input.trim();
    let (whole_part, frac_part) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole_part.is_empty() && frac_part.is_empty())
        || !all_digits(whole_part)
        || !all_digits(frac_part)
    {
        return Err(Error::User("AMOUNT should be a number".to_string()));
    }

    // all-digits is already established, so a parse failure can only be
    // overflow, which is far beyond the ceiling anyway
    let whole: u64 = if whole_part.is_empty() {
        0
    } else {
        whole_part
            .parse()
            .map_err(|_| Error::User("AMOUNT should be in GRINs".to_string()))?
    };

    let frac_nanos = frac_to_nanos(frac_part)?;

    if whole > MAX_SEND_GRIN || (whole == MAX_SEND_GRIN && frac_nanos > 0) {
        return Err(Error::User("AMOUNT should be in GRINs".to_string()));
    }

    Ok(whole * NANOGRIN_PER_GRIN + frac_nanos)
}

fn frac_to_nanos(frac: &str) -> Result<u64> {
    let (head, tail) = frac.split_at(frac.len().min(NANO_DIGITS));
    if tail.bytes().any(|b| b != b'0') {
        return Err(Error::User(
            "The smallest unit is 1 nanoGRIN or 10^-9 GRIN".to_string(),
        ));
    }
    let mut nanos = 0u64;
    for b in head.bytes() {
        nanos = nanos * 10 + u64::from(b - b'0');
    }
    Ok(nanos * 10u64.pow((NANO_DIGITS - head.len()) as u32))
}

/// clap `value_parser` adapter for the AMOUNT positional.
pub fn parse_amount_arg(input: &str) -> std::result::Result<u64, String> {
    grins_to_nanogrins(input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_whole_and_fractional_grins() {
        assert_eq!(grins_to_nanogrins("1").unwrap(), 1_000_000_000);
        assert_eq!(grins_to_nanogrins("1.5").unwrap(), 1_500_000_000);
        assert_eq!(grins_to_nanogrins(".5").unwrap(), 500_000_000);
        assert_eq!(grins_to_nanogrins("0.000000001").unwrap(), 1);
        assert_eq!(grins_to_nanogrins("12.3456789").unwrap(), 12_345_678_900);
    }

    #[test]
    fn accepts_the_ceiling_exactly() {
        assert_eq!(
            grins_to_nanogrins("100000").unwrap(),
            100_000 * NANOGRIN_PER_GRIN
        );
    }

    #[test]
    fn rejects_amounts_above_the_ceiling() {
        assert!(matches!(
            grins_to_nanogrins("100001"),
            Err(Error::User(msg)) if msg.contains("GRINs")
        ));
        assert!(grins_to_nanogrins("100000.000000001").is_err());
    }

    #[test]
    fn rejects_sub_nanogrin_fractions() {
        let err = grins_to_nanogrins("1.0000000005").unwrap_err();
        assert!(format!("{err}").contains("nanoGRIN"));
        // trailing zeros beyond nine places are still representable
        assert_eq!(grins_to_nanogrins("1.0000000010").unwrap(), 1_000_000_001);
    }

    #[test]
    fn rejects_non_numeric_input() {
        for bad in ["abc", "1.2.3", "-1", "1e3", "", "."] {
            assert!(
                matches!(grins_to_nanogrins(bad), Err(Error::User(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn conversion_round_trips_through_decimal_text() {
        let nanos = grins_to_nanogrins("3.141592653").unwrap();
        let back = format!(
            "{}.{:09}",
            nanos / NANOGRIN_PER_GRIN,
            nanos % NANOGRIN_PER_GRIN
        );
        assert_eq!(grins_to_nanogrins(&back).unwrap(), nanos);
    }
}
