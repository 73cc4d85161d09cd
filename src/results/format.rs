//! Cell formatting for result values.
//!
//! Numbers are grouped in thousands with a space and currency is shown in
//! whole euros, following how the published Finnish records present them.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PLACEHOLDER: &str = "-";

const GROUP_SEPARATOR: char = ' ';
const CURRENCY_SUFFIX: &str = " €";
const PERCENT_SUFFIX: &str = " %";
const FIRST_YEAR: i64 = 1900;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Text,
    Number,
    Currency,
    Percentage,
    Year,
    Rank,
}

/// Formats `value` for display according to `data_type`.
pub fn format_value(value: &Value, data_type: DataType) -> String {
    if is_empty_value(value) {
        return PLACEHOLDER.to_string();
    }
    match data_type {
        DataType::Currency => format_currency(value),
        DataType::Percentage => format_percentage(value),
        DataType::Number => format_number(value),
        DataType::Rank => format_rank(value),
        DataType::Year => format_year(value, chrono::Local::now().year() as i64),
        DataType::Text => format_text(value),
    }
}

/// Null and the empty string both render as the placeholder.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub fn format_currency(value: &Value) -> String {
    match numeric(value) {
        Some(n) => format!("{}{}", group_fixed(n, 0), CURRENCY_SUFFIX),
        None => PLACEHOLDER.to_string(),
    }
}

/// `value` is a fraction: 0.25 renders as `25.0 %`.
pub fn format_percentage(value: &Value) -> String {
    match numeric(value) {
        Some(n) => format!("{}{}", group_fixed(n * 100.0, 1), PERCENT_SUFFIX),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_number(value: &Value) -> String {
    match numeric(value) {
        Some(n) => group_fixed(n, 0),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_rank(value: &Value) -> String {
    match integer(value) {
        Some(n) if n > 0 => format!("{}{}", group_digits(n), ordinal_suffix(n)),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_year(value: &Value, current_year: i64) -> String {
    match integer(value) {
        Some(year) if (FIRST_YEAR..=current_year).contains(&year) => year.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_text(value: &Value) -> String {
    let text = match value {
        Value::Null => return PLACEHOLDER.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };

    if text.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// English ordinal suffix: 11–13 take "th", otherwise by last digit.
pub fn ordinal_suffix(n: i64) -> &'static str {
    let n = n.unsigned_abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

// Integer part of a numeric value, the way ranks and years arrive as text
fn integer(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    let n = numeric(value)?.trunc();
    (n.abs() < i64::MAX as f64).then_some(n as i64)
}

fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}

// Rounds half away from zero to `decimals` places and groups the integer part
fn group_fixed(n: f64, decimals: u32) -> String {
    let scale = 10_i64.pow(decimals);
    let scaled = (n * scale as f64).round();
    if scaled.abs() >= i64::MAX as f64 {
        return PLACEHOLDER.to_string();
    }
    let scaled = scaled as i64;

    let whole = scaled.abs() / scale;
    let mut out = String::new();
    if scaled < 0 {
        out.push('-');
    }
    out.push_str(&group_digits(whole));
    if decimals > 0 {
        let frac = scaled.abs() % scale;
        out.push('.');
        out.push_str(&format!("{:0width$}", frac, width = decimals as usize));
    }
    out
}
