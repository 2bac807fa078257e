use super::{FilterHandler, render_with_template, values_absent};
use crate::Error;
use crate::filter::{HandlerKind, Operator};
use crate::options::FilterOptions;
use crate::template::{encode_component, escape_string_literal, join_or};
use crate::value::{FilterValues, OneOrMany, PropertyNames, Value};

/// Handler for `STRING` properties.
///
/// Values have embedded single quotes doubled and, when `encode_url_components` is set, are
/// percent-encoded before substitution.
#[derive(Debug, Clone, Default)]
pub struct StringHandler {
    options: FilterOptions,
}

impl StringHandler {
    #[must_use]
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn encode(&self, s: &str) -> String {
        if self.options.encode_url_components {
            encode_component(s)
        } else {
            s.to_owned()
        }
    }

    fn sanitize(&self, value: &Value) -> Value {
        Value::String(self.encode(&escape_string_literal(&value.to_string())))
    }

    /// Split each value on `;` and OR-join one equality per trimmed segment.
    fn render_segments(
        &self,
        names: &PropertyNames,
        operator: Operator,
        values: &FilterValues,
    ) -> Result<String, Error> {
        let mut fragments = Vec::new();
        for value in values.iter() {
            let escaped = escape_string_literal(&value.to_string());
            // Split before encoding; an encoded `;` is `%3B` and would no longer separate segments.
            for segment in escaped.split(';') {
                let segment = OneOrMany::One(Value::String(self.encode(segment.trim())));
                fragments.push(render_with_template(self, names, operator, Some(&segment))?);
            }
        }
        Ok(join_or(fragments))
    }
}

impl FilterHandler for StringHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::String
    }

    fn template(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::Equals | Operator::InSemicolonSeparated => Some("{0} eq '{1}'"),
            Operator::NotEquals => Some("{0} ne '{1}'"),
            // Both case-insensitive operators render as equality.
            Operator::CaseInsensitiveEquals | Operator::CaseInsensitiveNotEquals => {
                Some("tolower({0}) eq tolower('{1}')")
            }
            Operator::StartsWith => Some("startswith({0}, '{1}') eq true"),
            Operator::DoesNotStartWith => Some("startswith({0}, '{1}') eq false"),
            Operator::EndsWith => Some("endswith({0}, '{1}') eq true"),
            Operator::DoesNotEndWith => Some("endswith({0}, '{1}') eq false"),
            Operator::Contains => Some("substringof('{1}', {0}) eq true"),
            Operator::HasLength => Some("length({0}) eq {1}"),
            _ => None,
        }
    }

    fn render(
        &self,
        names: &PropertyNames,
        operator: Operator,
        values: Option<&FilterValues>,
    ) -> Result<String, Error> {
        let Some(values) = values.filter(|v| !values_absent(v)) else {
            return render_with_template(self, names, operator, None);
        };
        if operator == Operator::InSemicolonSeparated {
            return self.render_segments(names, operator, values);
        }
        let sanitized = values.clone().map(|v| self.sanitize(&v));
        render_with_template(self, names, operator, Some(&sanitized))
    }
}
