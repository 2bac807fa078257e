//! `OData` query URL builder
//!
//! [`QueryBuilder`] accumulates filters, sort clauses and paging parameters for one service
//! endpoint and renders them into a query URL on demand.
//!
//! # Example
//!
//! ```rust
//! use odata_query::{Operator, QueryBuilder, SortDirection, ValueType};
//!
//! let mut qb = QueryBuilder::new("/api/users")?;
//! qb.add_filter("id1", ValueType::String, "fName", Operator::Equals, "Bartholomew");
//! qb.set_page(Some(10), Some(5));
//! qb.set_order_by("lName", SortDirection::Desc);
//!
//! assert_eq!(
//!     qb.build_url()?,
//!     "/api/users/?$skip=10&$top=5&$filter=fName eq 'Bartholomew'&$orderby=lName desc"
//! );
//! # Ok::<(), odata_query::Error>(())
//! ```
//!
//! Filters added with separate calls are AND-ed together. A filter with several property
//! names or several values is OR-ed within itself:
//!
//! - `["FNAME", "LNAME"]` with `["bob", "smith"]` → `FNAME eq 'bob' or LNAME eq 'smith'`
//! - `["FNAME", "LNAME"]` with `"bob"` → `FNAME eq 'bob' or LNAME eq 'bob'`
//! - `"FNAME"` with `["bob", "sam"]` → `FNAME eq 'bob' or FNAME eq 'sam'`

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::filter::{Operator, ValueType};
use crate::options::FilterOptions;
use crate::registry::FilterRegistry;
use crate::template::join_and;
use crate::value::{FilterValues, PropertyNames};

/// One filter of a query. `id` identifies it for replacement and removal.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSpec {
    pub id: String,
    pub value_type: ValueType,
    pub property_names: PropertyNames,
    pub operator: Operator,
    /// `None` means no value was supplied; such a filter renders nothing.
    pub values: Option<FilterValues>,
}

impl FilterSpec {
    pub fn new(
        id: impl Into<String>,
        value_type: ValueType,
        property_names: impl Into<PropertyNames>,
        operator: Operator,
        values: impl Into<FilterValues>,
    ) -> Self {
        Self {
            id: id.into(),
            value_type,
            property_names: property_names.into(),
            operator,
            values: Some(values.into()),
        }
    }

    /// A filter without values, e.g. a boolean `IS_TRUE` check.
    pub fn without_values(
        id: impl Into<String>,
        value_type: ValueType,
        property_names: impl Into<PropertyNames>,
        operator: Operator,
    ) -> Self {
        Self {
            id: id.into(),
            value_type,
            property_names: property_names.into(),
            operator,
            values: None,
        }
    }
}

/// Sort direction of an `$orderby` clause. `None` keeps the clause but leaves the property
/// out of the rendered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SortDirection {
    None = 0,
    Asc = 1,
    Desc = 2,
}

/// A numeric sort direction outside `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort direction {0}; expected 0 (none), 1 (asc) or 2 (desc)")]
pub struct InvalidSortDirection(pub i64);

impl TryFrom<i64> for SortDirection {
    type Error = InvalidSortDirection;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SortDirection::None),
            1 => Ok(SortDirection::Asc),
            2 => Ok(SortDirection::Desc),
            other => Err(InvalidSortDirection(other)),
        }
    }
}

impl TryFrom<i32> for SortDirection {
    type Error = InvalidSortDirection;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<u8> for SortDirection {
    type Error = InvalidSortDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<SortDirection> for u8 {
    fn from(dir: SortDirection) -> Self {
        dir as u8
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderClause {
    pub property: String,
    pub direction: SortDirection,
}

impl OrderClause {
    /// Rendered `$orderby` item, or `None` for `SortDirection::None`.
    #[must_use]
    pub fn to_odata_string(&self) -> Option<String> {
        match self.direction {
            SortDirection::None => None,
            SortDirection::Asc => Some(self.property.clone()),
            SortDirection::Desc => Some(format!("{} desc", self.property)),
        }
    }
}

/// Accumulates filters, ordering and paging for one endpoint and renders the query URL.
///
/// Every `build_*` call derives the output from the current state; building twice without
/// changes yields identical strings.
#[derive(Clone)]
pub struct QueryBuilder {
    base_url: String,
    skip: Option<u64>,
    top: Option<u64>,
    filters: Vec<FilterSpec>,
    order: Vec<OrderClause>,
    registry: Arc<FilterRegistry>,
}

impl QueryBuilder {
    /// Builder for `endpoint` with default handler options.
    ///
    /// # Errors
    /// Returns `Error::MissingEndpoint` if `endpoint` is empty.
    pub fn new(endpoint: &str) -> Result<Self, Error> {
        Self::with_registry(endpoint, Arc::new(FilterRegistry::default()))
    }

    /// Builder whose handlers use `options`.
    ///
    /// # Errors
    /// Returns `Error::MissingEndpoint` if `endpoint` is empty.
    pub fn with_options(endpoint: &str, options: FilterOptions) -> Result<Self, Error> {
        Self::with_registry(endpoint, Arc::new(FilterRegistry::new(options)))
    }

    /// Builder sharing an existing handler registry.
    ///
    /// # Errors
    /// Returns `Error::MissingEndpoint` if `endpoint` is empty.
    pub fn with_registry(endpoint: &str, registry: Arc<FilterRegistry>) -> Result<Self, Error> {
        if endpoint.trim().is_empty() {
            return Err(Error::MissingEndpoint);
        }
        Ok(Self {
            base_url: clean_endpoint_url(endpoint),
            skip: None,
            top: None,
            filters: Vec::new(),
            order: Vec::new(),
            registry,
        })
    }

    /// The endpoint, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    // ---- filters ----

    /// Add a filter, replacing in place any filter with the same `id`.
    pub fn add_filter(
        &mut self,
        id: impl Into<String>,
        value_type: ValueType,
        property_names: impl Into<PropertyNames>,
        operator: Operator,
        values: impl Into<FilterValues>,
    ) {
        self.upsert_filter(FilterSpec::new(
            id,
            value_type,
            property_names,
            operator,
            values,
        ));
    }

    /// Insert `spec`, or replace the filter with the same id without changing its position.
    pub fn upsert_filter(&mut self, spec: FilterSpec) {
        match self.filters.iter_mut().find(|f| f.id == spec.id) {
            Some(existing) => *existing = spec,
            None => self.filters.push(spec),
        }
    }

    /// Remove the filter with `id`. Returns it if it was present.
    pub fn remove_filter(&mut self, id: &str) -> Option<FilterSpec> {
        let pos = self.filters.iter().position(|f| f.id == id)?;
        Some(self.filters.remove(pos))
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Filters in rendering order.
    #[must_use]
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    // ---- paging ----

    /// Set `$skip`; `None` removes it.
    pub fn set_skip(&mut self, skip: Option<u64>) {
        self.skip = skip;
    }

    /// Set `$top`; `None` removes it.
    pub fn set_top(&mut self, top: Option<u64>) {
        self.top = top;
    }

    pub fn set_page(&mut self, skip: Option<u64>, top: Option<u64>) {
        self.skip = skip;
        self.top = top;
    }

    /// Set `$skip` from user input; anything without a leading non-negative integer unsets it.
    pub fn set_skip_str(&mut self, raw: &str) {
        self.skip = parse_leading_integer(raw);
    }

    /// Set `$top` from user input; anything without a leading non-negative integer unsets it.
    pub fn set_top_str(&mut self, raw: &str) {
        self.top = parse_leading_integer(raw);
    }

    #[must_use]
    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    #[must_use]
    pub fn top(&self) -> Option<u64> {
        self.top
    }

    // ---- ordering ----

    /// Append an `$orderby` clause.
    ///
    /// An empty property name or a direction outside `0..=2` clears every clause added so far.
    pub fn set_order_by<D>(&mut self, property: impl Into<String>, direction: D)
    where
        D: TryInto<SortDirection>,
    {
        let property = property.into();
        match direction.try_into() {
            Ok(direction) if !property.is_empty() => {
                self.order.push(OrderClause {
                    property,
                    direction,
                });
            }
            _ => {
                tracing::warn!(
                    property = %property,
                    discarded = self.order.len(),
                    "missing property name or invalid sort order; $orderby will be ignored"
                );
                self.order.clear();
            }
        }
    }

    pub fn clear_order_by(&mut self) {
        self.order.clear();
    }

    #[must_use]
    pub fn order_by(&self) -> &[OrderClause] {
        &self.order
    }

    // ---- rendering ----

    /// Render the `$filter` expression: every filter in insertion order, AND-joined.
    ///
    /// Filters that render to nothing are left out. Returns an empty string when there are
    /// no filters.
    ///
    /// # Errors
    /// Returns `Error::Render` naming the first filter its handler could not render.
    pub fn build_filter_fragment(&self) -> Result<String, Error> {
        let mut fragments = Vec::with_capacity(self.filters.len());
        for spec in &self.filters {
            let fragment = self
                .registry
                .resolve(spec.value_type)
                .render(&spec.property_names, spec.operator, spec.values.as_ref())
                .map_err(|source| Error::Render {
                    id: spec.id.clone(),
                    value_type: spec.value_type,
                    operator: spec.operator,
                    source: Box::new(source),
                })?;
            fragments.push(fragment);
        }
        let fragment = join_and(fragments);
        tracing::debug!(filters = self.filters.len(), fragment = %fragment, "built $filter");
        Ok(fragment)
    }

    /// Render the `$orderby` value, or `None` when no clause has a direction.
    #[must_use]
    pub fn build_order_by(&self) -> Option<String> {
        let items: Vec<String> = self
            .order
            .iter()
            .filter_map(OrderClause::to_odata_string)
            .collect();
        (!items.is_empty()).then(|| items.join(","))
    }

    /// Render the full query URL:
    /// `<base>/?$skip=N&$top=N&$filter=<expr>&$orderby=<list>`, each section only when set.
    ///
    /// # Errors
    /// Returns `Error::Render` if a filter cannot be rendered.
    pub fn build_url(&self) -> Result<String, Error> {
        let mut params = Vec::with_capacity(4);
        if let Some(skip) = self.skip {
            params.push(format!("$skip={skip}"));
        }
        if let Some(top) = self.top {
            params.push(format!("$top={top}"));
        }
        if !self.filters.is_empty() {
            let filter = self.build_filter_fragment()?;
            if !filter.is_empty() {
                params.push(format!("$filter={filter}"));
            }
        }
        if let Some(order) = self.build_order_by() {
            params.push(format!("$orderby={order}"));
        }
        Ok(format!("{}?{}", self.base_url, params.join("&")))
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("base_url", &self.base_url)
            .field("skip", &self.skip)
            .field("top", &self.top)
            .field("filters", &self.filters)
            .field("order", &self.order)
            .field("registry", &self.registry)
            .finish()
    }
}

fn clean_endpoint_url(url: &str) -> String {
    let mut url = url.to_owned();
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Leading-integer parse: optional whitespace and `+`, then digits; trailing text ignored.
fn parse_leading_integer(raw: &str) -> Option<u64> {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
