//! Validation rules applied when an edit session completes
//!
//! Rules are supplied per column. [`validate`] runs every rule and returns
//! all failure messages in rule order, so error-mode rendering is stable.

use crate::model::FieldValue;

/// Custom rule function type.
/// Returns `Err(message)` when the value is rejected.
pub type CustomRule = fn(&FieldValue) -> Result<(), String>;

/// A single validation rule
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be null or blank text
    Required,
    /// Numeric value must be at least this
    MinNumber(f64),
    /// Numeric value must be at most this
    MaxNumber(f64),
    /// Text value must not exceed this many characters
    MaxLength(usize),
    Custom(CustomRule),
}

impl Rule {
    /// Check one value, returning the failure message if rejected
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        match self {
            Rule::Required => {
                let blank = match value {
                    FieldValue::Null => true,
                    FieldValue::Text(s) | FieldValue::Url(s) => s.trim().is_empty(),
                    _ => false,
                };
                if blank {
                    Err("A value is required".to_string())
                } else {
                    Ok(())
                }
            }
            Rule::MinNumber(min) => match value.as_number() {
                Some(n) if n < *min => Err(format!("Must be at least {}", min)),
                _ => Ok(()),
            },
            Rule::MaxNumber(max) => match value.as_number() {
                Some(n) if n > *max => Err(format!("Must be at most {}", max)),
                _ => Ok(()),
            },
            Rule::MaxLength(max) => match value.as_str() {
                Some(s) if s.chars().count() > *max => {
                    Err(format!("Must be at most {} characters", max))
                }
                _ => Ok(()),
            },
            Rule::Custom(rule) => rule(value),
        }
    }
}

/// Run all rules, collecting every failure message in rule order
pub fn validate(rules: &[Rule], value: &FieldValue) -> Result<(), Vec<String>> {
    let messages: Vec<String> = rules
        .iter()
        .filter_map(|rule| rule.check(value).err())
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(messages)
    }
}
