//! Currency / amount / text splitting for currency-bearing formats.
//!
//! `USD12,50late fee` splits into currency `USD`, amount `12.50` and text
//! `late fee`. The scan is a three-state machine over the trimmed input:
//! everything up to the first digit is the currency, the following run of
//! digits and decimal separators is the amount, and the rest is text.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::NarrativeError;

/// Output of [`split_currency_amount`]. Each part is `None` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyAmount {
    /// Characters before the first digit.
    pub currency: Option<String>,
    /// The numeric run, parsed with `.` as decimal separator.
    pub amount: Option<BigDecimal>,
    /// Everything after the numeric run, verbatim.
    pub remainder: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Currency,
    Amount,
    Narrative,
}

/// Split `text` into currency, amount and remaining text.
///
/// Both `,` and `.` are accepted as decimal separator and stored as `.`.
/// When no digit occurs at all, the whole (trimmed) text is returned as the
/// currency.
///
/// # Errors
///
/// [`NarrativeError::InvalidAmount`] when the numeric run is not a decimal
/// number, e.g. `12,50.3`.
pub fn split_currency_amount(text: &str) -> Result<CurrencyAmount, NarrativeError> {
    let mut currency = String::new();
    let mut amount = String::new();
    let mut remainder = String::new();

    let mut section = Section::Currency;
    for c in text.trim().chars() {
        match section {
            Section::Currency if c.is_ascii_digit() => {
                section = Section::Amount;
                amount.push(c);
            }
            Section::Currency => currency.push(c),
            Section::Amount if c.is_ascii_digit() => amount.push(c),
            Section::Amount if c == ',' || c == '.' => amount.push('.'),
            Section::Amount => {
                section = Section::Narrative;
                remainder.push(c);
            }
            Section::Narrative => remainder.push(c),
        }
    }

    Ok(CurrencyAmount {
        currency: non_empty(currency),
        amount: parse_amount(amount)?,
        remainder: non_empty(remainder),
    })
}

fn parse_amount(amount: String) -> Result<Option<BigDecimal>, NarrativeError> {
    if amount.is_empty() {
        return Ok(None);
    }
    // "12," is a whole amount with a dangling separator
    let digits = amount.strip_suffix('.').unwrap_or(&amount);
    match BigDecimal::from_str(digits) {
        Ok(value) => Ok(Some(value)),
        Err(source) => Err(NarrativeError::InvalidAmount { amount, source }),
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn currency_amount_and_text() {
        let r = split_currency_amount("USD12,50late fee").unwrap();
        assert_eq!(r.currency.as_deref(), Some("USD"));
        assert_eq!(r.amount, Some(dec("12.50")));
        assert_eq!(r.amount.as_ref().unwrap().to_string(), "12.50");
        assert_eq!(r.remainder.as_deref(), Some("late fee"));
    }

    #[test]
    fn dot_separator_is_kept() {
        let r = split_currency_amount("EUR1.5").unwrap();
        assert_eq!(r.amount, Some(dec("1.5")));
        assert_eq!(r.remainder, None);
    }

    #[test]
    fn no_digit_means_all_currency() {
        let r = split_currency_amount("late fee").unwrap();
        assert_eq!(r.currency.as_deref(), Some("late fee"));
        assert_eq!(r.amount, None);
        assert_eq!(r.remainder, None);
    }

    #[test]
    fn amount_without_currency() {
        let r = split_currency_amount("100 EXTRA").unwrap();
        assert_eq!(r.currency, None);
        assert_eq!(r.amount, Some(dec("100")));
        assert_eq!(r.remainder.as_deref(), Some(" EXTRA"));
    }

    #[test]
    fn input_is_trimmed() {
        let r = split_currency_amount("  CHF7  ").unwrap();
        assert_eq!(r.currency.as_deref(), Some("CHF"));
        assert_eq!(r.amount, Some(dec("7")));
        assert_eq!(r.remainder, None);
    }

    #[test]
    fn trailing_separator_is_accepted() {
        let r = split_currency_amount("GBP12,").unwrap();
        assert_eq!(r.amount, Some(dec("12")));
    }

    #[test]
    fn empty_input() {
        assert_eq!(split_currency_amount("").unwrap(), CurrencyAmount::default());
        assert_eq!(split_currency_amount("   ").unwrap(), CurrencyAmount::default());
    }

    #[test]
    fn two_separators_fail() {
        let err = split_currency_amount("USD12,50.3FEE").unwrap_err();
        match err {
            NarrativeError::InvalidAmount { amount, .. } => assert_eq!(amount, "12.50.3"),
        }
    }

    #[test]
    fn long_digit_runs_keep_full_precision() {
        let r = split_currency_amount("ACCT123456789012345678901234567890 REF").unwrap();
        assert_eq!(r.currency.as_deref(), Some("ACCT"));
        assert_eq!(r.amount, Some(dec("123456789012345678901234567890")));
        assert_eq!(r.remainder.as_deref(), Some(" REF"));

        let r = split_currency_amount("EUR0,000000000000000000000000000000001").unwrap();
        assert_eq!(r.amount, Some(dec("0.000000000000000000000000000000001")));
    }

    #[test]
    fn digits_after_text_stay_in_remainder() {
        let r = split_currency_amount("USD5 PER 100").unwrap();
        assert_eq!(r.amount, Some(dec("5")));
        assert_eq!(r.remainder.as_deref(), Some(" PER 100"));
    }
}
