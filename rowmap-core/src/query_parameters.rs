use crate::{Arguments, Pagination, Result, Value, separated_by};
use std::borrow::Cow;

/// Bind name of the free text in named statements.
pub const SEARCH_QUERY_NAME: &str = "search_query";

/// Free text search, ordering and pagination applied on top of a condition.
///
/// ```rust
/// use rowmap_core::{Arguments, QueryParameters};
/// let params = QueryParameters::new()
///     .search("abc", ["title", "description"])
///     .order_by("title DESC");
/// let mut args = Arguments::positional();
/// let suffix = params.build(&mut args, true, true).unwrap();
/// assert_eq!(
///     suffix,
///     " AND (title LIKE ? OR description LIKE ?) ORDER BY title DESC LIMIT ?, ?"
/// );
/// assert_eq!(args.len(), 4);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    pub search_query: String,
    pub search_columns: Vec<Cow<'static, str>>,
    /// Written verbatim, it must come from a closed set of known expressions.
    pub order_by: String,
    pub pagination: Pagination,
}

impl QueryParameters {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn search<C>(mut self, query: impl Into<String>, columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<Cow<'static, str>>,
    {
        self.search_query = query.into();
        self.search_columns = columns.into_iter().map(Into::into).collect();
        self
    }
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
    pub fn has_search(&self) -> bool {
        !self.search_query.is_empty() && !self.search_columns.is_empty()
    }

    /// Search fragment: `AND (a LIKE ? OR b LIKE ?)` after an existing condition,
    /// `a LIKE ? OR b LIKE ?` otherwise. Empty when there is nothing to search.
    pub fn search_condition(&self, args: &mut Arguments, has_pre_condition: bool) -> Result<String> {
        let mut out = String::new();
        if !self.has_search() {
            return Ok(out);
        }
        let pattern = Value::Varchar(Some(format!("%{}%", self.search_query)));
        let token = if args.is_named() {
            Cow::Owned(format!(":{SEARCH_QUERY_NAME}"))
        } else {
            Cow::Borrowed("?")
        };
        if has_pre_condition {
            out.push_str("AND (");
        }
        separated_by(
            &mut out,
            self.search_columns.iter(),
            |out, column| {
                out.push_str(column);
                out.push_str(" LIKE ");
                out.push_str(&token);
            },
            " OR ",
        );
        if has_pre_condition {
            out.push(')');
        }
        for _ in 0..if args.is_named() { 1 } else { self.search_columns.len() } {
            args.push(SEARCH_QUERY_NAME, pattern.clone())?;
        }
        Ok(out)
    }

    /// `ORDER BY <order_by>`, empty when there is no ordering.
    pub fn order_fragment(&self) -> String {
        let order_by = self.order_by.trim();
        if order_by.is_empty() {
            String::new()
        } else {
            format!("ORDER BY {order_by}")
        }
    }

    /// `LIMIT ?, ?` or `LIMIT :offset, :length`, binding offset then length.
    pub fn limit_fragment(&self, args: &mut Arguments) -> Result<String> {
        args.push("offset", Value::Int64(Some(self.pagination.offset())))?;
        args.push("length", Value::Int64(Some(self.pagination.length())))?;
        Ok(if args.is_named() {
            "LIMIT :offset, :length".into()
        } else {
            "LIMIT ?, ?".into()
        })
    }

    /// Suffix appended after `... FROM <table>` or after `... WHERE <conditions>`.
    ///
    /// Every non empty fragment is preceded by a space. When the search is the
    /// only condition the suffix opens the `WHERE` itself.
    pub fn build(
        &self,
        args: &mut Arguments,
        has_pre_condition: bool,
        paginate: bool,
    ) -> Result<String> {
        let mut out = String::new();
        let search = self.search_condition(args, has_pre_condition)?;
        if !search.is_empty() {
            out.push_str(if has_pre_condition { " " } else { " WHERE " });
            out.push_str(&search);
        }
        let order = self.order_fragment();
        if !order.is_empty() {
            out.push(' ');
            out.push_str(&order);
        }
        if paginate {
            out.push(' ');
            out.push_str(&self.limit_fragment(args)?);
        }
        Ok(out)
    }
}
