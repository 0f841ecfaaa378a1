//! Built-in atoms, one per field type

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::FieldAtom;
use crate::model::{FieldType, FieldValue, Money, Quantity};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Fallback text for values of an unexpected variant
fn fallback(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(s) | FieldValue::Url(s) => s.clone(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        FieldValue::Time(t) => format_time(t),
        FieldValue::DateTime(dt) => format_datetime(dt),
        FieldValue::Money(m) => format_money(m),
        FieldValue::Quantity(q) => format!("{} {}", q.amount, q.unit),
        FieldValue::Duration(secs) => format_duration(*secs),
        FieldValue::Record(map) => format!("{{{} fields}}", map.len()),
    }
}

fn format_time(t: &NaiveTime) -> String {
    if t.second() == 0 {
        t.format("%H:%M").to_string()
    } else {
        t.format("%H:%M:%S").to_string()
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    format!("{} {}", dt.date().format(DATE_FORMAT), format_time(&dt.time()))
}

fn format_money(m: &Money) -> String {
    let sign = if m.minor_units < 0 { "-" } else { "" };
    let abs = m.minor_units.unsigned_abs();
    format!("{}{}.{:02} {}", sign, abs / 100, abs % 100, m.currency)
}

fn format_duration(total: i64) -> String {
    if total == 0 {
        return "0s".to_string();
    }
    let sign = if total < 0 { "-" } else { "" };
    let mut rest = total.unsigned_abs();
    let mut parts = Vec::new();
    for (unit, size) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        let n = rest / size;
        rest %= size;
        if n > 0 {
            parts.push(format!("{}{}", n, unit));
        }
    }
    format!("{}{}", sign, parts.join(" "))
}

/// Parse a finite decimal number, ignoring `,` and `_` digit separators
fn parse_number(input: &str) -> Option<f64> {
    let cleaned: String = input.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a decimal amount into minor units (two fractional digits)
fn parse_minor_units(input: &str) -> Option<i64> {
    let cleaned: String = input.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let (major, minor) = match digits.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (digits, ""),
    };
    if major.is_empty() && minor.is_empty() {
        return None;
    }
    if !major.chars().all(|c| c.is_ascii_digit())
        || !minor.chars().all(|c| c.is_ascii_digit())
        || minor.len() > 2
    {
        return None;
    }

    let major: i64 = if major.is_empty() { 0 } else { major.parse().ok()? };
    let minor: i64 = match minor.len() {
        0 => 0,
        1 => minor.parse::<i64>().ok()? * 10,
        _ => minor.parse().ok()?,
    };
    let units = major.checked_mul(100)?.checked_add(minor)?;
    Some(if negative { -units } else { units })
}

// ============================================================================
// Text
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct TextAtom;

impl FieldAtom for TextAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Text
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        if input.trim().is_empty() {
            Ok(FieldValue::Null)
        } else {
            Ok(FieldValue::Text(input.to_string()))
        }
    }
}

// ============================================================================
// Bool
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolAtom;

impl FieldAtom for BoolAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Bool
    }

    fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Bool(true) => "Yes".to_string(),
            FieldValue::Bool(false) => "No".to_string(),
            other => fallback(other),
        }
    }

    fn edit_text(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Bool(b) => b.to_string(),
            other => fallback(other),
        }
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        match input.trim().to_lowercase().as_str() {
            "" => Ok(FieldValue::Null),
            "true" | "yes" | "y" | "1" | "on" => Ok(FieldValue::Bool(true)),
            "false" | "no" | "n" | "0" | "off" => Ok(FieldValue::Bool(false)),
            _ => Err("Expected yes or no".to_string()),
        }
    }
}

// ============================================================================
// Number
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberAtom;

impl FieldAtom for NumberAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Number
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        parse_number(input)
            .map(FieldValue::Number)
            .ok_or_else(|| "Expected a number".to_string())
    }
}

// ============================================================================
// Date / time
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DateAtom;

impl FieldAtom for DateAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| "Expected a date like 2024-01-31".to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeAtom;

impl FieldAtom for TimeAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Time
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        NaiveTime::parse_from_str(input, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
            .map(FieldValue::Time)
            .map_err(|_| "Expected a time like 14:30".to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeAtom;

impl FieldAtom for DateTimeAtom {
    fn field_type(&self) -> FieldType {
        FieldType::DateTime
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(FieldValue::DateTime)
            .ok_or_else(|| "Expected a date and time like 2024-01-31 14:30".to_string())
    }
}

// ============================================================================
// Url
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct UrlAtom;

impl FieldAtom for UrlAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Url
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        let rest = input
            .strip_prefix("https://")
            .or_else(|| input.strip_prefix("http://"))
            .ok_or_else(|| "URL must start with http:// or https://".to_string())?;
        let host = rest.split(['/', '?', '#']).next().unwrap_or("");
        if host.is_empty() || input.chars().any(char::is_whitespace) {
            return Err("URL is missing a host".to_string());
        }
        Ok(FieldValue::Url(input.to_string()))
    }
}

// ============================================================================
// Money
// ============================================================================

/// Money with two minor digits. Input without a currency code uses the
/// atom's default currency.
#[derive(Debug, Clone)]
pub struct MoneyAtom {
    pub currency: String,
}

impl MoneyAtom {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

impl Default for MoneyAtom {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl FieldAtom for MoneyAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Money
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let mut parts = input.split_whitespace();
        let Some(amount) = parts.next() else {
            return Ok(FieldValue::Null);
        };
        let currency = match parts.next() {
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                code.to_ascii_uppercase()
            }
            Some(_) => return Err("Currency must be a 3-letter code".to_string()),
            None => self.currency.clone(),
        };
        if parts.next().is_some() {
            return Err("Expected an amount like 12.50 USD".to_string());
        }
        let minor_units = parse_minor_units(amount)
            .ok_or_else(|| "Expected an amount like 12.50 USD".to_string())?;
        Ok(FieldValue::Money(Money::new(minor_units, currency)))
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// Number with a unit of measure (`12.5 kg`, `3pcs`)
#[derive(Debug, Clone, Default)]
pub struct QuantityAtom {
    pub default_unit: Option<String>,
}

impl FieldAtom for QuantityAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Quantity
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        let split = input
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ',' | '_')))
            .unwrap_or(input.len());
        let (amount, unit) = input.split_at(split);
        let amount = parse_number(amount.trim())
            .ok_or_else(|| "Expected a quantity like 12 kg".to_string())?;
        let unit = match unit.trim() {
            "" => self
                .default_unit
                .clone()
                .ok_or_else(|| "Expected a unit, e.g. 12 kg".to_string())?,
            unit => unit.to_string(),
        };
        Ok(FieldValue::Quantity(Quantity::new(amount, unit)))
    }
}

// ============================================================================
// Duration
// ============================================================================

/// Durations as `1d 2h 30m 15s` (any subset, any order) or bare seconds
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationAtom;

impl FieldAtom for DurationAtom {
    fn field_type(&self) -> FieldType {
        FieldType::Duration
    }

    fn format(&self, value: &FieldValue) -> String {
        fallback(value)
    }

    fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }
        if let Ok(secs) = input.parse::<i64>() {
            return Ok(FieldValue::Duration(secs));
        }

        let invalid = || "Expected a duration like 1h 30m".to_string();
        let mut total: i64 = 0;
        let mut digits = String::new();
        for c in input.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let size = match c.to_ascii_lowercase() {
                'd' => 86_400,
                'h' => 3_600,
                'm' => 60,
                's' => 1,
                _ => return Err(invalid()),
            };
            let n: i64 = digits.parse().map_err(|_| invalid())?;
            total = n
                .checked_mul(size)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(invalid)?;
            digits.clear();
        }
        if !digits.is_empty() {
            return Err(invalid());
        }
        Ok(FieldValue::Duration(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_parse_and_format() {
        assert_eq!(BoolAtom.parse("Yes"), Ok(FieldValue::Bool(true)));
        assert_eq!(BoolAtom.parse("off"), Ok(FieldValue::Bool(false)));
        assert!(BoolAtom.parse("maybe").is_err());
        assert_eq!(BoolAtom.format(&FieldValue::Bool(true)), "Yes");
        assert_eq!(BoolAtom.edit_text(&FieldValue::Bool(false)), "false");
    }

    #[test]
    fn test_number_parse() {
        assert_eq!(NumberAtom.parse("1,250.5"), Ok(FieldValue::Number(1250.5)));
        assert_eq!(NumberAtom.parse("  "), Ok(FieldValue::Null));
        assert!(NumberAtom.parse("NaN").is_err());
        assert!(NumberAtom.parse("12abc").is_err());
        assert_eq!(NumberAtom.format(&FieldValue::Number(5.0)), "5");
    }

    #[test]
    fn test_date_and_time() {
        let date = DateAtom.parse("2024-02-29").unwrap();
        assert_eq!(DateAtom.format(&date), "2024-02-29");
        assert!(DateAtom.parse("2023-02-29").is_err());

        let time = TimeAtom.parse("14:30").unwrap();
        assert_eq!(TimeAtom.format(&time), "14:30");
        let time = TimeAtom.parse("14:30:15").unwrap();
        assert_eq!(TimeAtom.format(&time), "14:30:15");

        let dt = DateTimeAtom.parse("2024-01-31T08:05").unwrap();
        assert_eq!(DateTimeAtom.format(&dt), "2024-01-31 08:05");
    }

    #[test]
    fn test_url() {
        assert_eq!(
            UrlAtom.parse("https://example.com/item/1"),
            Ok(FieldValue::Url("https://example.com/item/1".to_string()))
        );
        assert!(UrlAtom.parse("example.com").is_err());
        assert!(UrlAtom.parse("https:///path").is_err());
    }

    #[test]
    fn test_money() {
        let atom = MoneyAtom::new("EUR");
        assert_eq!(
            atom.parse("12.5"),
            Ok(FieldValue::Money(Money::new(1250, "EUR")))
        );
        assert_eq!(
            atom.parse("-0.07 usd"),
            Ok(FieldValue::Money(Money::new(-7, "USD")))
        );
        assert!(atom.parse("1.234").is_err());
        assert!(atom.parse("12 dollars").is_err());
        assert_eq!(atom.format(&FieldValue::Money(Money::new(-1205, "EUR"))), "-12.05 EUR");
    }

    #[test]
    fn test_quantity() {
        let atom = QuantityAtom::default();
        assert_eq!(
            atom.parse("12.5 kg"),
            Ok(FieldValue::Quantity(Quantity::new(12.5, "kg")))
        );
        assert_eq!(
            atom.parse("3pcs"),
            Ok(FieldValue::Quantity(Quantity::new(3.0, "pcs")))
        );
        assert!(atom.parse("12").is_err());

        let atom = QuantityAtom {
            default_unit: Some("ea".to_string()),
        };
        assert_eq!(
            atom.parse("12"),
            Ok(FieldValue::Quantity(Quantity::new(12.0, "ea")))
        );
    }

    #[test]
    fn test_duration() {
        assert_eq!(DurationAtom.parse("1h 30m"), Ok(FieldValue::Duration(5_400)));
        assert_eq!(DurationAtom.parse("90"), Ok(FieldValue::Duration(90)));
        assert_eq!(DurationAtom.parse("1d2h"), Ok(FieldValue::Duration(93_600)));
        assert!(DurationAtom.parse("1h 30").is_err());
        assert!(DurationAtom.parse("h").is_err());
        assert_eq!(DurationAtom.format(&FieldValue::Duration(5_405)), "1h 30m 5s");
        assert_eq!(DurationAtom.format(&FieldValue::Duration(0)), "0s");
    }

    #[test]
    fn test_blank_input_clears() {
        let atoms: [&dyn FieldAtom; 4] = [&TextAtom, &DateAtom, &UrlAtom, &DurationAtom];
        for atom in atoms {
            assert_eq!(atom.parse("   "), Ok(FieldValue::Null), "{:?}", atom);
        }
    }
}
