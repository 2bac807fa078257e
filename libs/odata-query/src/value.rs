//! Literal values and scalar-or-sequence inputs for filter rendering.
//!
//! A filter carries one or many property names and one or many values. Both sides are
//! modelled by [`OneOrMany`], and every value is a [`Value`] whose `Display` output is the
//! exact text substituted into an operator template.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use uuid::Uuid;

/// A literal filter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// As a scalar filter value, treated like a missing value: the filter renders nothing.
    Null,
    Bool(bool),
    Number(BigDecimal),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    String(String),
}

impl Value {
    /// Kind name used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::String(_) => "string",
        }
    }
}

/// Serialize a UTC timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&n.to_plain_string()),
            Value::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Value::DateTime(dt) => f.write_str(&to_iso8601(dt)),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(BigDecimal::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(BigDecimal::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(BigDecimal::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(BigDecimal::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        // Shortest round-trip text keeps `2.5` as `2.5` rather than its binary expansion.
        let text = n.to_string();
        match BigDecimal::from_str(&text) {
            Ok(d) if n.is_finite() => Value::Number(d),
            _ => Value::String(text),
        }
    }
}

impl From<BigDecimal> for Value {
    fn from(n: BigDecimal) -> Self {
        Value::Number(n)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

/// A scalar or a sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// One or many property names.
pub type PropertyNames = OneOrMany<String>;

/// One or many filter values.
pub type FilterValues = OneOrMany<Value>;

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    /// Number of elements (1 for a scalar).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(v) => v.len(),
        }
    }

    /// True only for an empty sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(x) => std::slice::from_ref(x).iter(),
            OneOrMany::Many(v) => v.iter(),
        }
    }

    /// Apply `f` to every element, keeping the scalar/sequence shape.
    pub fn map<U, F>(self, mut f: F) -> OneOrMany<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            OneOrMany::One(x) => OneOrMany::One(f(x)),
            OneOrMany::Many(v) => OneOrMany::Many(v.into_iter().map(f).collect()),
        }
    }
}

impl<T: Clone> OneOrMany<T> {
    /// Copy both sides, truncating the longer sequence to the shorter one's length when both
    /// are sequences. The inputs are never modified.
    #[must_use]
    pub fn truncated_pair<U: Clone>(
        names: &OneOrMany<T>,
        values: &OneOrMany<U>,
    ) -> (OneOrMany<T>, OneOrMany<U>) {
        match (names, values) {
            (OneOrMany::Many(n), OneOrMany::Many(v)) => {
                let len = n.len().min(v.len());
                (
                    OneOrMany::Many(n[..len].to_vec()),
                    OneOrMany::Many(v[..len].to_vec()),
                )
            }
            _ => (names.clone(), values.clone()),
        }
    }
}

impl From<&str> for PropertyNames {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_owned())
    }
}

impl From<String> for PropertyNames {
    fn from(s: String) -> Self {
        OneOrMany::One(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for PropertyNames {
    fn from(v: Vec<S>) -> Self {
        OneOrMany::Many(v.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for PropertyNames {
    fn from(v: [S; N]) -> Self {
        OneOrMany::Many(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_filter_values {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for FilterValues {
                fn from(v: $t) -> Self {
                    OneOrMany::One(Value::from(v))
                }
            }
        )*
    };
}

scalar_filter_values!(
    bool,
    &str,
    String,
    i32,
    i64,
    u32,
    u64,
    f64,
    BigDecimal,
    Uuid,
    DateTime<Utc>,
    NaiveDate,
    NaiveTime,
);

impl From<Value> for FilterValues {
    fn from(v: Value) -> Self {
        OneOrMany::One(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for FilterValues {
    fn from(v: Vec<T>) -> Self {
        OneOrMany::Many(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for FilterValues {
    fn from(v: [T; N]) -> Self {
        OneOrMany::Many(v.into_iter().map(Into::into).collect())
    }
}
