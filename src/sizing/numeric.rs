//! Fail-soft numeric coercion for user-entered values.
//!
//! Every price, risk amount and leverage setting enters the engine through
//! [`number_or_zero`]. Text is read the way a form field is: leading
//! whitespace is skipped, the first comma counts as the decimal separator,
//! and the longest numeric prefix wins. Anything unreadable becomes zero.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Exponents beyond this always underflow to zero for `Decimal`.
const MIN_EXPONENT: i64 = -64;

/// A raw numeric field: whatever the user typed, or an already-numeric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericInput {
    Text(String),
    Number(Decimal),
}

impl NumericInput {
    /// Coerce to a number, zero when unreadable.
    pub fn value(&self) -> Decimal {
        self.parse().unwrap_or(Decimal::ZERO)
    }

    /// Coerce to a number, `None` when unreadable.
    pub fn parse(&self) -> Option<Decimal> {
        match self {
            NumericInput::Text(text) => parse_decimal(text),
            NumericInput::Number(n) => Some(*n),
        }
    }
}

/// Strings stay text, numbers stay numbers, anything else is an empty field.
impl<'de> Deserialize<'de> for NumericInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => NumericInput::Text(s),
            serde_json::Value::Number(n) => {
                let text = n.to_string();
                match parse_decimal(&text) {
                    Some(d) => NumericInput::Number(d),
                    None => NumericInput::Text(text),
                }
            }
            _ => NumericInput::default(),
        })
    }
}

impl Default for NumericInput {
    fn default() -> Self {
        NumericInput::Text(String::new())
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(s: String) -> Self {
        NumericInput::Text(s)
    }
}

impl From<Decimal> for NumericInput {
    fn from(n: Decimal) -> Self {
        NumericInput::Number(n)
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Text(text) => f.write_str(text),
            NumericInput::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Parse text to a number, zero when unreadable.
pub fn number_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Parse the longest numeric prefix of `raw`.
///
/// `"1,5"` reads as 1.5, `"12abc"` as 12, `"2e3"` as 2000. Returns `None`
/// when no digits lead the text or the value does not fit a `Decimal`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let text = raw.trim_start().replacen(',', ".", 1);
    let literal = NumericLiteral::scan(&text)?;

    let mantissa = Decimal::from_str(&literal.mantissa).ok()?;
    if mantissa.is_zero() || literal.exponent == 0 {
        return Some(mantissa);
    }
    if literal.exponent < MIN_EXPONENT {
        return Some(Decimal::ZERO);
    }

    let ten = Decimal::TEN;
    let mut value = mantissa;
    if literal.exponent > 0 {
        for _ in 0..literal.exponent {
            value = value.checked_mul(ten)?;
        }
    } else {
        for _ in 0..literal.exponent.unsigned_abs() {
            value = value.checked_div(ten)?;
        }
    }
    Some(value)
}

/// Numeric prefix split into a `Decimal`-parseable mantissa and a power of ten.
struct NumericLiteral {
    mantissa: String,
    exponent: i64,
}

impl NumericLiteral {
    fn scan(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut pos = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };

        let int_start = pos;
        pos = skip_digits(bytes, pos);
        let int_digits = &text[int_start..pos];

        let mut frac_digits = "";
        if bytes.get(pos) == Some(&b'.') {
            let frac_start = pos + 1;
            let frac_end = skip_digits(bytes, frac_start);
            if !int_digits.is_empty() || frac_end > frac_start {
                frac_digits = &text[frac_start..frac_end];
                pos = frac_end;
            }
        }

        if int_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }

        let mut exponent = 0i64;
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            let mut exp_pos = pos + 1;
            let exp_negative = match bytes.get(exp_pos) {
                Some(b'-') => {
                    exp_pos += 1;
                    true
                }
                Some(b'+') => {
                    exp_pos += 1;
                    false
                }
                _ => false,
            };
            let exp_end = skip_digits(bytes, exp_pos);
            if exp_end > exp_pos {
                // Saturate absurd exponents; they overflow or underflow anyway.
                let magnitude = text[exp_pos..exp_end].parse::<i64>().unwrap_or(i64::MAX / 2);
                exponent = if exp_negative { -magnitude } else { magnitude };
            }
        }

        let mut mantissa = String::with_capacity(int_digits.len() + frac_digits.len() + 2);
        if negative {
            mantissa.push('-');
        }
        mantissa.push_str(if int_digits.is_empty() { "0" } else { int_digits });
        if !frac_digits.is_empty() {
            mantissa.push('.');
            mantissa.push_str(frac_digits);
        }

        Some(Self { mantissa, exponent })
    }
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

/// Serde helper: accept a JSON number or string, zero for anything else.
///
/// Used for stored settings so a half-typed value never discards the blob.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(NumericInput::deserialize(deserializer)?.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plain_and_comma_decimals() {
        assert_eq!(number_or_zero("1.2000"), dec!(1.2));
        assert_eq!(number_or_zero("1,585"), dec!(1.585));
        assert_eq!(number_or_zero("  18000"), dec!(18000));
        assert_eq!(number_or_zero("-3.5"), dec!(-3.5));
        assert_eq!(number_or_zero("+7"), dec!(7));
    }

    #[test]
    fn test_only_first_comma_is_a_separator() {
        // "1,234,5" -> "1.234,5" -> prefix "1.234"
        assert_eq!(number_or_zero("1,234,5"), dec!(1.234));
    }

    #[test]
    fn test_prefix_and_bare_dots() {
        assert_eq!(number_or_zero("12abc"), dec!(12));
        assert_eq!(number_or_zero(".5"), dec!(0.5));
        assert_eq!(number_or_zero("5."), dec!(5));
        assert_eq!(number_or_zero("1.5.6"), dec!(1.5));
    }

    #[test]
    fn test_exponents() {
        assert_eq!(number_or_zero("2e3"), dec!(2000));
        assert_eq!(number_or_zero("1.5E-2"), dec!(0.015));
        assert_eq!(number_or_zero("3e"), dec!(3));
        assert_eq!(number_or_zero("1e-400"), Decimal::ZERO);
    }

    #[test]
    fn test_unreadable_is_zero() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("Infinity"), None);
        assert_eq!(parse_decimal("1e400"), None);
        assert_eq!(number_or_zero("NaN"), Decimal::ZERO);
    }

    #[test]
    fn test_numeric_input_variants() {
        assert_eq!(NumericInput::from("1,1").value(), dec!(1.1));
        assert_eq!(NumericInput::from(dec!(42)).value(), dec!(42));
        assert_eq!(NumericInput::default().parse(), None);
    }

    #[test]
    fn test_numeric_input_accepts_json_numbers_and_strings() {
        let text: NumericInput = serde_json::from_str("\"1.58\"").unwrap();
        assert_eq!(text, NumericInput::Text("1.58".to_string()));

        let number: NumericInput = serde_json::from_str("1900").unwrap();
        assert_eq!(number, NumericInput::Number(dec!(1900)));
    }

    #[test]
    fn test_numeric_input_other_json_is_empty() {
        for json in ["null", "true", "{}", "[1]"] {
            let input: NumericInput = serde_json::from_str(json).unwrap();
            assert_eq!(input, NumericInput::default(), "{json}");
            assert_eq!(input.value(), Decimal::ZERO, "{json}");
        }
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "lenient_decimal")]
        value: Decimal,
    }

    #[test]
    fn test_lenient_decimal() {
        let h: Holder = serde_json::from_str(r#"{"value": 30}"#).unwrap();
        assert_eq!(h.value, dec!(30));
        let h: Holder = serde_json::from_str(r#"{"value": "1,1"}"#).unwrap();
        assert_eq!(h.value, dec!(1.1));
        let h: Holder = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(h.value, Decimal::ZERO);
        let h: Holder = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(h.value, Decimal::ZERO);
    }
}
