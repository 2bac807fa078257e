use std::sync::Arc;

use super::{FilterHandler, render_with_template, values_absent};
use crate::Error;
use crate::date::{DateParser, Iso8601DateParser, to_iso8601};
use crate::filter::{HandlerKind, Operator};
use crate::value::{FilterValues, OneOrMany, PropertyNames, Value};

/// Handler for `TIME`, `DATE_TIME` and `DATE_TIME_OFFSET` properties.
///
/// Every value is coerced to a timestamp and rendered as ISO-8601 before substitution. A value
/// that cannot be coerced is dropped from a sequence; a scalar one suppresses the whole filter.
#[derive(Clone)]
pub struct DateTimeHandler {
    parser: Arc<dyn DateParser>,
}

impl DateTimeHandler {
    #[must_use]
    pub fn new(parser: Arc<dyn DateParser>) -> Self {
        Self { parser }
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        self.parser
            .parse(value)
            .map(|dt| Value::String(to_iso8601(&dt)))
    }
}

impl Default for DateTimeHandler {
    fn default() -> Self {
        Self::new(Arc::new(Iso8601DateParser))
    }
}

impl std::fmt::Debug for DateTimeHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateTimeHandler").finish_non_exhaustive()
    }
}

impl FilterHandler for DateTimeHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::DateTime
    }

    fn template(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::Before => Some("{0} le datetime'{1}'"),
            Operator::After => Some("{0} ge datetime'{1}'"),
            Operator::YearEquals => Some("year({0}) eq {1}"),
            Operator::MonthNumberEquals => Some("month({0}) eq {1}"),
            Operator::DayNumberEquals => Some("day({0}) eq {1}"),
            Operator::HourEquals => Some("hour({0}) eq {1}"),
            Operator::MinuteEquals => Some("minute({0}) eq {1}"),
            Operator::SecondEquals => Some("second({0}) eq {1}"),
            _ => None,
        }
    }

    fn render(
        &self,
        names: &PropertyNames,
        operator: Operator,
        values: Option<&FilterValues>,
    ) -> Result<String, Error> {
        let coerced = match values {
            None => None,
            Some(v) if values_absent(v) => None,
            Some(OneOrMany::One(value)) => {
                let Some(date) = self.coerce(value) else {
                    tracing::warn!(
                        value = %value,
                        kind = value.kind(),
                        "could not convert value to a date; filter was not generated"
                    );
                    return Ok(String::new());
                };
                Some(OneOrMany::One(date))
            }
            Some(OneOrMany::Many(list)) => Some(OneOrMany::Many(
                list.iter()
                    .filter_map(|value| {
                        let date = self.coerce(value);
                        if date.is_none() {
                            tracing::warn!(
                                value = %value,
                                kind = value.kind(),
                                "could not convert value to a date; removing it from the filter"
                            );
                        }
                        date
                    })
                    .collect(),
            )),
        };
        render_with_template(self, names, operator, coerced.as_ref())
    }
}
