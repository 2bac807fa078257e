use super::{FilterHandler, render_with_template};
use crate::Error;
use crate::filter::{HandlerKind, Operator};
use crate::value::{FilterValues, OneOrMany, PropertyNames, Value};

/// Handler for properties that cannot be queried. Every filter renders empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandler;

impl FilterHandler for NullHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Null
    }

    fn template(&self, _operator: Operator) -> Option<&'static str> {
        None
    }

    fn render(
        &self,
        _names: &PropertyNames,
        _operator: Operator,
        _values: Option<&FilterValues>,
    ) -> Result<String, Error> {
        Ok(String::new())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanHandler;

impl FilterHandler for BooleanHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Boolean
    }

    fn template(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::IsTrue => Some("{0} eq true"),
            Operator::IsFalse => Some("{0} eq false"),
            _ => None,
        }
    }

    // The operator carries the comparison; supplied values are ignored.
    fn render(
        &self,
        names: &PropertyNames,
        operator: Operator,
        _values: Option<&FilterValues>,
    ) -> Result<String, Error> {
        let placeholder = OneOrMany::One(Value::String(String::new()));
        render_with_template(self, names, operator, Some(&placeholder))
    }
}

/// Handler for `DECIMAL`, `SINGLE` and `DOUBLE` properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatingPointHandler;

impl FilterHandler for FloatingPointHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::FloatingPoint
    }

    fn template(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::RoundEquals => Some("round({0}) eq {1}"),
            Operator::FloorEquals => Some("floor({0}) eq {1}"),
            Operator::CeilingEquals => Some("ceiling({0}) eq {1}"),
            other => comparison_template(other),
        }
    }
}

/// Handler for `BYTE`, `SBYTE` and `INT16`..`INT64` properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerHandler;

impl FilterHandler for IntegerHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Integer
    }

    fn template(&self, operator: Operator) -> Option<&'static str> {
        comparison_template(operator)
    }
}

fn comparison_template(operator: Operator) -> Option<&'static str> {
    match operator {
        Operator::Equals => Some("{0} eq {1}"),
        Operator::NotEquals => Some("{0} ne {1}"),
        Operator::GreaterThan => Some("{0} gt {1}"),
        Operator::GreaterThanOrEqualTo => Some("{0} ge {1}"),
        Operator::LessThan => Some("{0} lt {1}"),
        Operator::LessThanOrEqualTo => Some("{0} le {1}"),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GuidHandler;

impl FilterHandler for GuidHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Guid
    }

    fn template(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::Equals => Some("{0} eq guid'{1}'"),
            Operator::NotEquals => Some("{0} ne guid'{1}'"),
            _ => None,
        }
    }
}
