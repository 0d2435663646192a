use crate::error::{ReportError, Result};

/// Monetary amounts are integer minor units (cents) so sums and differences are exact.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents for display with a currency symbol and thousands separators.
/// Example: (123456789, "$") -> "$1,234,567.89", (-50, "$") -> "-$0.50"
pub fn format_currency(cents: Cents, symbol: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{:02}", sign, symbol, grouped, abs_cents % 100)
}

/// Parse a human-entered amount into cents.
///
/// Accepts one optional leading `-`, then an optional currency symbol (`$`, `€`, `£`),
/// comma thousands separators and up to two decimals; extra decimals are truncated.
/// Example: "1,250.50" -> 125050, "$12.5" -> 1250, "-3" -> -300
pub fn parse_cents(input: &str) -> Result<Cents> {
    let invalid = || ReportError::InvalidAmount(input.to_string());

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits = unsigned.strip_prefix(['$', '€', '£']).unwrap_or(unsigned);
    let cleaned: String = digits
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Err(invalid());
    }

    let (units_str, decimal_str) = match cleaned.split_once('.') {
        Some((units, decimals)) => {
            if decimals.contains('.') {
                return Err(invalid());
            }
            (units, decimals)
        }
        None => (cleaned.as_str(), ""),
    };

    // `i64::from_str` would also take a second sign here.
    if !units_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };

    if !decimal_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => decimal_str[..2].parse().map_err(|_| invalid())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or_else(invalid)?;

    Ok(if negative { -cents } else { cents })
}
