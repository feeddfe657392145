//! Value formatting by unit kind.
//!
//! - Currency: `$1,234,567` rounded to whole units, `-$` prefix for negatives.
//! - Percentage: one decimal + `%`.
//! - Number: one decimal.
//! - Missing or non-finite: `N/A`.

use ea_core::UnitKind;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_value(value: Option<f64>, unit: UnitKind) -> String {
    match value {
        Some(v) if v.is_finite() => match unit {
            UnitKind::Currency => format_currency(v),
            UnitKind::Percentage => format!("{}%", one_decimal(v)),
            UnitKind::Number => one_decimal(v),
        },
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let whole = v.round();
    if whole == 0.0 {
        return "$0".to_string();
    }
    let digits = group_thousands(&format!("{:.0}", whole.abs()));
    if whole < 0.0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// One decimal place; never prints a negative zero.
pub fn one_decimal(v: f64) -> String {
    let s = format!("{v:.1}");
    if s == "-0.0" {
        "0.0".to_string()
    } else {
        s
    }
}

/// Comma-group an unsigned run of ASCII digits.
fn group_thousands(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
