use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::date::{DateParser, Iso8601DateParser};
use crate::filter::ValueType;
use crate::handlers::{
    BooleanHandler, DateTimeHandler, FilterHandler, FloatingPointHandler, GuidHandler,
    IntegerHandler, NullHandler, StringHandler,
};
use crate::options::FilterOptions;

/// Maps value-type tags to the handler that renders their filters.
///
/// Tags without a registered handler resolve to the null handler, which renders nothing.
/// Registries are immutable once built and may be shared between builders through an `Arc`.
#[derive(Clone)]
pub struct FilterRegistry {
    handlers: HashMap<ValueType, Arc<dyn FilterHandler>>,
    fallback: Arc<dyn FilterHandler>,
}

impl FilterRegistry {
    /// Registry with the standard handler for every value type.
    #[must_use]
    pub fn new(options: FilterOptions) -> Self {
        Self::with_date_parser(options, Arc::new(Iso8601DateParser))
    }

    /// Standard registry whose date/time handler coerces values with `parser`.
    #[must_use]
    pub fn with_date_parser(options: FilterOptions, parser: Arc<dyn DateParser>) -> Self {
        let null: Arc<dyn FilterHandler> = Arc::new(NullHandler);
        let floating: Arc<dyn FilterHandler> = Arc::new(FloatingPointHandler);
        let integer: Arc<dyn FilterHandler> = Arc::new(IntegerHandler);
        let datetime: Arc<dyn FilterHandler> = Arc::new(DateTimeHandler::new(parser));

        let mut registry = Self::empty();
        registry.insert(ValueType::Null, null);
        registry.insert(ValueType::Boolean, Arc::new(BooleanHandler));
        for t in [ValueType::Decimal, ValueType::Single, ValueType::Double] {
            registry.insert(t, Arc::clone(&floating));
        }
        for t in [
            ValueType::Byte,
            ValueType::SByte,
            ValueType::Int16,
            ValueType::Int32,
            ValueType::Int64,
        ] {
            registry.insert(t, Arc::clone(&integer));
        }
        for t in [
            ValueType::Time,
            ValueType::DateTime,
            ValueType::DateTimeOffset,
        ] {
            registry.insert(t, Arc::clone(&datetime));
        }
        registry.insert(ValueType::Guid, Arc::new(GuidHandler));
        registry.insert(ValueType::String, Arc::new(StringHandler::new(options)));
        registry
    }

    /// Registry with no handlers; every tag resolves to the null handler.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(NullHandler),
        }
    }

    fn insert(&mut self, value_type: ValueType, handler: Arc<dyn FilterHandler>) {
        self.handlers.insert(value_type, handler);
    }

    /// Replace the handler of one value type.
    #[must_use]
    pub fn register(mut self, value_type: ValueType, handler: Arc<dyn FilterHandler>) -> Self {
        self.insert(value_type, handler);
        self
    }

    /// Handler for `value_type`, or the null handler if none is registered.
    #[must_use]
    pub fn resolve(&self, value_type: ValueType) -> &dyn FilterHandler {
        self.handlers
            .get(&value_type)
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(FilterOptions::default())
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<_> = self.handlers.keys().map(|t| t.as_str()).collect();
        registered.sort_unstable();
        f.debug_struct("FilterRegistry")
            .field("registered", &registered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Error;
    use crate::filter::{HandlerKind, Operator};
    use crate::value::{FilterValues, PropertyNames};

    #[test]
    fn test_every_tag_resolves_to_its_family() {
        let registry = FilterRegistry::default();
        for t in ValueType::ALL {
            assert_eq!(registry.resolve(*t).kind(), t.handler_kind(), "{t}");
        }
    }

    #[test]
    fn test_empty_registry_falls_back_to_null() {
        let registry = FilterRegistry::empty();
        let handler = registry.resolve(ValueType::String);
        assert_eq!(handler.kind(), HandlerKind::Null);
        assert_eq!(
            handler
                .render(&"P".into(), Operator::Equals, Some(&"x".into()))
                .unwrap(),
            ""
        );
    }

    #[test]
    fn test_options_reach_string_handler() {
        let registry = FilterRegistry::new(FilterOptions::new().with_encode_url_components(true));
        let rendered = registry
            .resolve(ValueType::String)
            .render(&"P".into(), Operator::Equals, Some(&"a b".into()))
            .unwrap();
        assert_eq!(rendered, "P eq 'a%20b'");
    }

    #[test]
    fn test_registered_string_handler_owns_its_options() {
        let encoding = StringHandler::new(FilterOptions::new().with_encode_url_components(true));
        let registry = FilterRegistry::default().register(ValueType::String, Arc::new(encoding));
        assert_eq!(
            registry
                .resolve(ValueType::String)
                .render(&"P".into(), Operator::Equals, Some(&"a b".into()))
                .unwrap(),
            "P eq 'a%20b'"
        );
    }

    struct ShoutingHandler;

    impl FilterHandler for ShoutingHandler {
        fn kind(&self) -> HandlerKind {
            HandlerKind::String
        }

        fn template(&self, operator: Operator) -> Option<&'static str> {
            (operator == Operator::Equals).then_some("toupper({0}) eq '{1}'")
        }

        fn render(
            &self,
            names: &PropertyNames,
            operator: Operator,
            values: Option<&FilterValues>,
        ) -> Result<String, Error> {
            let upper = values.map(|v| v.clone().map(|x| x.to_string().to_uppercase().into()));
            crate::handlers::render_with_template(self, names, operator, upper.as_ref())
        }
    }

    #[test]
    fn test_register_replaces_one_tag() {
        let registry =
            FilterRegistry::default().register(ValueType::String, Arc::new(ShoutingHandler));
        assert_eq!(
            registry
                .resolve(ValueType::String)
                .render(&"P".into(), Operator::Equals, Some(&"bob".into()))
                .unwrap(),
            "toupper(P) eq 'BOB'"
        );
        assert_eq!(
            registry.resolve(ValueType::Guid).kind(),
            HandlerKind::Guid
        );
    }
}
