use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Value-type tag of a filter. Selects the handler that renders it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Null,
    Boolean,
    Decimal,
    Single,
    Double,
    Byte,
    #[serde(rename = "SBYTE")]
    SByte,
    Int16,
    Int32,
    Int64,
    Time,
    DateTime,
    DateTimeOffset,
    Guid,
    String,
}

/// Handler family shared by several value types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Null,
    Boolean,
    FloatingPoint,
    Integer,
    DateTime,
    Guid,
    String,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Null => write!(f, "null"),
            HandlerKind::Boolean => write!(f, "boolean"),
            HandlerKind::FloatingPoint => write!(f, "floating-point"),
            HandlerKind::Integer => write!(f, "integer"),
            HandlerKind::DateTime => write!(f, "date/time"),
            HandlerKind::Guid => write!(f, "guid"),
            HandlerKind::String => write!(f, "string"),
        }
    }
}

impl ValueType {
    pub const ALL: &'static [ValueType] = &[
        ValueType::Null,
        ValueType::Boolean,
        ValueType::Decimal,
        ValueType::Single,
        ValueType::Double,
        ValueType::Byte,
        ValueType::SByte,
        ValueType::Int16,
        ValueType::Int32,
        ValueType::Int64,
        ValueType::Time,
        ValueType::DateTime,
        ValueType::DateTimeOffset,
        ValueType::Guid,
        ValueType::String,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Null => "NULL",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Decimal => "DECIMAL",
            ValueType::Single => "SINGLE",
            ValueType::Double => "DOUBLE",
            ValueType::Byte => "BYTE",
            ValueType::SByte => "SBYTE",
            ValueType::Int16 => "INT16",
            ValueType::Int32 => "INT32",
            ValueType::Int64 => "INT64",
            ValueType::Time => "TIME",
            ValueType::DateTime => "DATE_TIME",
            ValueType::DateTimeOffset => "DATE_TIME_OFFSET",
            ValueType::Guid => "GUID",
            ValueType::String => "STRING",
        }
    }

    #[must_use]
    pub fn handler_kind(self) -> HandlerKind {
        match self {
            ValueType::Null => HandlerKind::Null,
            ValueType::Boolean => HandlerKind::Boolean,
            ValueType::Decimal | ValueType::Single | ValueType::Double => {
                HandlerKind::FloatingPoint
            }
            ValueType::Byte
            | ValueType::SByte
            | ValueType::Int16
            | ValueType::Int32
            | ValueType::Int64 => HandlerKind::Integer,
            ValueType::Time | ValueType::DateTime | ValueType::DateTimeOffset => {
                HandlerKind::DateTime
            }
            ValueType::Guid => HandlerKind::Guid,
            ValueType::String => HandlerKind::String,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_owned()))
    }
}

/// Comparison operator of a filter. Each handler supports a subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    IsTrue,
    IsFalse,
    RoundEquals,
    FloorEquals,
    CeilingEquals,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Before,
    After,
    YearEquals,
    MonthNumberEquals,
    DayNumberEquals,
    HourEquals,
    MinuteEquals,
    SecondEquals,
    InSemicolonSeparated,
    CaseInsensitiveEquals,
    CaseInsensitiveNotEquals,
    StartsWith,
    DoesNotStartWith,
    EndsWith,
    DoesNotEndWith,
    Contains,
    HasLength,
}

impl Operator {
    pub const ALL: &'static [Operator] = &[
        Operator::IsTrue,
        Operator::IsFalse,
        Operator::RoundEquals,
        Operator::FloorEquals,
        Operator::CeilingEquals,
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqualTo,
        Operator::LessThan,
        Operator::LessThanOrEqualTo,
        Operator::Before,
        Operator::After,
        Operator::YearEquals,
        Operator::MonthNumberEquals,
        Operator::DayNumberEquals,
        Operator::HourEquals,
        Operator::MinuteEquals,
        Operator::SecondEquals,
        Operator::InSemicolonSeparated,
        Operator::CaseInsensitiveEquals,
        Operator::CaseInsensitiveNotEquals,
        Operator::StartsWith,
        Operator::DoesNotStartWith,
        Operator::EndsWith,
        Operator::DoesNotEndWith,
        Operator::Contains,
        Operator::HasLength,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::IsTrue => "IS_TRUE",
            Operator::IsFalse => "IS_FALSE",
            Operator::RoundEquals => "ROUND_EQUALS",
            Operator::FloorEquals => "FLOOR_EQUALS",
            Operator::CeilingEquals => "CEILING_EQUALS",
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanOrEqualTo => "GREATER_THAN_OR_EQUAL_TO",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanOrEqualTo => "LESS_THAN_OR_EQUAL_TO",
            Operator::Before => "BEFORE",
            Operator::After => "AFTER",
            Operator::YearEquals => "YEAR_EQUALS",
            Operator::MonthNumberEquals => "MONTH_NUMBER_EQUALS",
            Operator::DayNumberEquals => "DAY_NUMBER_EQUALS",
            Operator::HourEquals => "HOUR_EQUALS",
            Operator::MinuteEquals => "MINUTE_EQUALS",
            Operator::SecondEquals => "SECOND_EQUALS",
            Operator::InSemicolonSeparated => "IN_SEMICOLON_SEPARATED",
            Operator::CaseInsensitiveEquals => "CASE_INSENSITIVE_EQUALS",
            Operator::CaseInsensitiveNotEquals => "CASE_INSENSITIVE_NOT_EQUALS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::DoesNotStartWith => "DOES_NOT_START_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::DoesNotEndWith => "DOES_NOT_END_WITH",
            Operator::Contains => "CONTAINS",
            Operator::HasLength => "HAS_LENGTH",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_owned()))
    }
}

/// A tag name that matches no `ValueType` or `Operator`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip_through_from_str() {
        for t in ValueType::ALL {
            assert_eq!(t.as_str().parse::<ValueType>().unwrap(), *t);
        }
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), *op);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            "DATE".parse::<ValueType>(),
            Err(UnknownTag("DATE".to_owned()))
        );
        assert!("equals".parse::<Operator>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        assert_eq!(
            serde_json::to_string(&ValueType::DateTimeOffset).unwrap(),
            "\"DATE_TIME_OFFSET\""
        );
        assert_eq!(
            serde_json::to_string(&ValueType::SByte).unwrap(),
            "\"SBYTE\""
        );
        assert_eq!(
            serde_json::to_string(&ValueType::Int16).unwrap(),
            "\"INT16\""
        );
        let op: Operator = serde_json::from_str("\"GREATER_THAN_OR_EQUAL_TO\"").unwrap();
        assert_eq!(op, Operator::GreaterThanOrEqualTo);
    }

    #[test]
    fn test_handler_families() {
        assert_eq!(ValueType::Single.handler_kind(), HandlerKind::FloatingPoint);
        assert_eq!(ValueType::SByte.handler_kind(), HandlerKind::Integer);
        assert_eq!(ValueType::Time.handler_kind(), HandlerKind::DateTime);
        assert_eq!(ValueType::Null.handler_kind(), HandlerKind::Null);
    }
}
