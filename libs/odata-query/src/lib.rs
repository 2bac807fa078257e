#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Builds `OData` query strings (`$skip`, `$top`, `$filter`, `$orderby`) from typed filter
//! descriptions.
//!
//! Each filter names a value type, one or more properties, an operator and one or more
//! values. A [`FilterRegistry`] maps the value type to a [`FilterHandler`] which renders the
//! filter into an expression fragment; [`QueryBuilder`] AND-joins the fragments and assembles
//! the final URL.
pub mod builder;
pub mod date;
pub mod filter;
pub mod handlers;
pub mod options;
pub mod registry;
pub mod template;
pub mod value;

pub use builder::{FilterSpec, InvalidSortDirection, OrderClause, QueryBuilder, SortDirection};
pub use date::{DateParser, Iso8601DateParser};
pub use filter::{HandlerKind, Operator, UnknownTag, ValueType};
pub use handlers::FilterHandler;
pub use options::{ConfigError, FilterOptions};
pub use registry::FilterRegistry;
pub use value::{FilterValues, OneOrMany, PropertyNames, Value};

/// Errors produced while building a query.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(
        "missing OData service endpoint URL; it should be everything up to the \"?\""
    )]
    MissingEndpoint,

    #[error("operator {operator} is not supported by the {handler} filter handler")]
    UnsupportedOperator {
        handler: HandlerKind,
        operator: Operator,
    },

    #[error("invalid query filter '{id}' ({value_type} {operator}): {source}")]
    Render {
        id: String,
        value_type: ValueType,
        operator: Operator,
        source: Box<Error>,
    },
}
