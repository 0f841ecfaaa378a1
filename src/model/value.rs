//! Typed cell values
//!
//! Every editable cell holds a [`FieldValue`]. The variant set mirrors the
//! field types an inventory grid edits (money, quantities, dates, ...).
//! Nested attributes live in [`FieldValue::Record`] and are addressed with
//! dotted field paths.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Field type tag used to pick an atom from the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Bool,
    Number,
    Date,
    Time,
    #[serde(rename = "datetime")]
    DateTime,
    Url,
    Money,
    Quantity,
    Duration,
}

impl FieldType {
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Bool,
        FieldType::Number,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Url,
        FieldType::Money,
        FieldType::Quantity,
        FieldType::Duration,
    ];

    /// Stable lowercase name, as accepted by [`FieldType::from_name`]
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Bool => "bool",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Url => "url",
            FieldType::Money => "money",
            FieldType::Quantity => "quantity",
            FieldType::Duration => "duration",
        }
    }

    /// Look up a type by name (case-insensitive, a few aliases accepted)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "text" | "string" => Some(FieldType::Text),
            "bool" | "boolean" => Some(FieldType::Bool),
            "number" | "numeric" => Some(FieldType::Number),
            "date" => Some(FieldType::Date),
            "time" => Some(FieldType::Time),
            "datetime" | "timestamp" => Some(FieldType::DateTime),
            "url" | "link" => Some(FieldType::Url),
            "money" | "currency" => Some(FieldType::Money),
            "quantity" | "qty" => Some(FieldType::Quantity),
            "duration" => Some(FieldType::Duration),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Monetary amount stored in minor units (cents) to keep equality exact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub minor_units: i64,
    pub currency: String,
}

impl Money {
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }
}

/// Amount with a unit of measure (e.g. `12.5 kg`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    #[serde(rename = "datetime")]
    DateTime(NaiveDateTime),
    Url(String),
    Money(Money),
    Quantity(Quantity),
    /// Whole seconds
    Duration(i64),
    Record(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The type tag of a scalar value (`None` for `Null` and records)
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::Null | FieldValue::Record(_) => None,
            FieldValue::Text(_) => Some(FieldType::Text),
            FieldValue::Bool(_) => Some(FieldType::Bool),
            FieldValue::Number(_) => Some(FieldType::Number),
            FieldValue::Date(_) => Some(FieldType::Date),
            FieldValue::Time(_) => Some(FieldType::Time),
            FieldValue::DateTime(_) => Some(FieldType::DateTime),
            FieldValue::Url(_) => Some(FieldType::Url),
            FieldValue::Money(_) => Some(FieldType::Money),
            FieldValue::Quantity(_) => Some(FieldType::Quantity),
            FieldValue::Duration(_) => Some(FieldType::Duration),
        }
    }

    /// Value-type equality used for dirty tracking.
    ///
    /// Same as `==` except that numeric NaNs compare equal to each other, so a
    /// cell holding NaN is not perpetually dirty.
    pub fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => same_f64(*a, *b),
            (FieldValue::Quantity(a), FieldValue::Quantity(b)) => {
                a.unit == b.unit && same_f64(a.amount, b.amount)
            }
            (FieldValue::Record(a), FieldValue::Record(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_as(vb))
            }
            _ => self == other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Url(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Quantity(q) => Some(q.amount),
            FieldValue::Money(m) => Some(m.minor_units as f64 / 100.0),
            FieldValue::Duration(secs) => Some(*secs as f64),
            _ => None,
        }
    }
}

fn same_f64(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}
