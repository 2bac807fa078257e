//! Per-value-type filter handlers.
//!
//! Every handler owns an operator → template table and optionally pre-processes the values.
//! The fan-out itself lives in [`render_with_template`] and is shared by all of them:
//!
//! - names and values both sequences: pairwise, longer side truncated (on a copy)
//! - exactly one side a sequence: every element against the single counterpart
//! - both scalars: a single comparison
//!
//! Multiple comparisons are OR-joined.

mod datetime;
mod scalar;
mod string;

pub use datetime::DateTimeHandler;
pub use scalar::{BooleanHandler, FloatingPointHandler, GuidHandler, IntegerHandler, NullHandler};
pub use string::StringHandler;

use crate::Error;
use crate::filter::{HandlerKind, Operator};
use crate::template::{format_template, join_or};
use crate::value::{FilterValues, OneOrMany, PropertyNames, Value};

/// Renders one value type's filters into `OData` expression fragments.
pub trait FilterHandler: Send + Sync {
    /// Handler family, used in error messages.
    fn kind(&self) -> HandlerKind;

    /// Template for `operator`, with `{0}` for the property name and `{1}` for the value.
    fn template(&self, operator: Operator) -> Option<&'static str>;

    /// Render a filter.
    ///
    /// An empty string means the filter contributes nothing to the query.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedOperator` if the handler has no template for `operator`.
    fn render(
        &self,
        names: &PropertyNames,
        operator: Operator,
        values: Option<&FilterValues>,
    ) -> Result<String, Error> {
        render_with_template(self, names, operator, values)
    }
}

fn names_absent(names: &PropertyNames) -> bool {
    matches!(names, OneOrMany::One(name) if name.is_empty())
}

fn values_absent(values: &FilterValues) -> bool {
    matches!(values, OneOrMany::One(Value::Null))
}

/// The rendering skeleton shared by all handlers.
///
/// Absent names (an empty scalar name) or absent values (none, or a scalar `Value::Null`)
/// render to an empty string. An empty string value or a zero is not absent.
///
/// # Errors
/// Returns `Error::UnsupportedOperator` if `handler` has no template for `operator`.
pub fn render_with_template<H>(
    handler: &H,
    names: &PropertyNames,
    operator: Operator,
    values: Option<&FilterValues>,
) -> Result<String, Error>
where
    H: FilterHandler + ?Sized,
{
    let Some(values) = values.filter(|v| !values_absent(v)) else {
        return Ok(String::new());
    };
    if names_absent(names) {
        return Ok(String::new());
    }
    let template = handler
        .template(operator)
        .ok_or(Error::UnsupportedOperator {
            handler: handler.kind(),
            operator,
        })?;

    let (names, values) = OneOrMany::truncated_pair(names, values);
    let query = match (&names, &values) {
        (OneOrMany::Many(n), OneOrMany::Many(v)) => join_or(
            n.iter()
                .zip(v)
                .map(|(name, value)| format_template(template, &[name, &value.to_string()])),
        ),
        (OneOrMany::Many(n), OneOrMany::One(value)) => {
            let value = value.to_string();
            join_or(n.iter().map(|name| format_template(template, &[name, &value])))
        }
        (OneOrMany::One(name), OneOrMany::Many(v)) => join_or(
            v.iter()
                .map(|value| format_template(template, &[name, &value.to_string()])),
        ),
        (OneOrMany::One(name), OneOrMany::One(value)) => {
            format_template(template, &[name, &value.to_string()])
        }
    };
    Ok(query)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn render(
        names: impl Into<PropertyNames>,
        values: impl Into<FilterValues>,
    ) -> Result<String, Error> {
        IntegerHandler.render(&names.into(), Operator::Equals, Some(&values.into()))
    }

    #[test]
    fn test_scalar_pair() {
        assert_eq!(render("AGE", 30).unwrap(), "AGE eq 30");
    }

    #[test]
    fn test_many_names_one_value() {
        assert_eq!(render(["A", "B"], 5).unwrap(), "A eq 5 or B eq 5");
    }

    #[test]
    fn test_one_name_many_values() {
        assert_eq!(render("A", vec![1, 2, 3]).unwrap(), "A eq 1 or A eq 2 or A eq 3");
    }

    #[test]
    fn test_pairwise_truncates_longer_side() {
        assert_eq!(render(["A", "B", "C"], vec![1, 2]).unwrap(), "A eq 1 or B eq 2");
        assert_eq!(render(["A"], vec![1, 2]).unwrap(), "A eq 1");
    }

    #[test]
    fn test_caller_sequences_are_not_truncated() {
        let names: PropertyNames = ["A", "B", "C"].into();
        let values: FilterValues = vec![1, 2].into();
        IntegerHandler
            .render(&names, Operator::Equals, Some(&values))
            .unwrap();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_absent_inputs_render_empty() {
        assert_eq!(
            IntegerHandler
                .render(&"AGE".into(), Operator::Equals, None)
                .unwrap(),
            ""
        );
        assert_eq!(render("", 5).unwrap(), "");
    }

    #[test]
    fn test_zero_and_empty_string_are_not_absent() {
        assert_eq!(render("AGE", 0).unwrap(), "AGE eq 0");
        let empty = Value::String(String::new());
        assert_eq!(render("AGE", empty).unwrap(), "AGE eq ");
    }

    #[test]
    fn test_scalar_null_is_absent() {
        assert_eq!(render("P", Value::Null).unwrap(), "");
        assert_eq!(
            IntegerHandler
                .render(&"P".into(), Operator::Contains, Some(&Value::Null.into()))
                .unwrap(),
            ""
        );
    }

    #[test]
    fn test_unsupported_operator() {
        let err = IntegerHandler
            .render(&"AGE".into(), Operator::Contains, Some(&5.into()))
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedOperator {
                handler: HandlerKind::Integer,
                operator: Operator::Contains,
            }
        );
    }

    #[test]
    fn test_unsupported_operator_with_absent_values_is_empty() {
        assert_eq!(
            IntegerHandler
                .render(&"AGE".into(), Operator::Contains, None)
                .unwrap(),
            ""
        );
    }
}
