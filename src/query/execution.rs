//! Query execution for `TableQuery`: `all`, `count`, `paginate` and route binding.
//!
//! Every statement is built with `PostgresQueryBuilder` and handed to a
//! [`QueryExecutor`] together with its bound values.

use super::select::{iden, TableQuery};
use crate::error::{Result, TableError};
use crate::executor::{QueryExecutor, Record};
use crate::request::Trashed;
use sea_query::{Expr, ExprTrait, PostgresQueryBuilder, Value};

/// One page of records plus the numbers needed to describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub total: u64,
    pub page_size: u64,
    pub current_page: u64,
}

impl Page {
    /// Last page number; 1 for an empty result.
    pub fn last_page(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(self.page_size).max(1)
    }

    /// 1-based position of the first record on this page, `None` when empty.
    pub fn from(&self) -> Option<u64> {
        if self.records.is_empty() {
            None
        } else {
            Some(
                (self.current_page - 1)
                    .saturating_mul(self.page_size)
                    .saturating_add(1),
            )
        }
    }

    /// 1-based position of the last record on this page, `None` when empty.
    pub fn to(&self) -> Option<u64> {
        self.from()
            .map(|from| from.saturating_add(self.records.len() as u64 - 1))
    }
}

impl TableQuery {
    /// Execute the query and return every row.
    pub fn all<Ex: QueryExecutor + ?Sized>(self, executor: &Ex) -> Result<Vec<Record>> {
        let (sql, values) = self.build().build(PostgresQueryBuilder);
        executor.query_records(&sql, &values)
    }

    /// Number of rows matching the filters, ignoring selection, order and paging.
    pub fn count<Ex: QueryExecutor + ?Sized>(&self, executor: &Ex) -> Result<u64> {
        let mut inner = self.filtered_statement();
        inner.column(sea_query::Asterisk);
        let (inner_sql, values) = inner.build(PostgresQueryBuilder);
        let count_sql = format!("SELECT COUNT(*) AS aggregate FROM ({inner_sql}) AS count_subquery");

        let records = executor.query_records(&count_sql, &values)?;
        let aggregate = records
            .first()
            .and_then(|record| record.get("aggregate"))
            .ok_or_else(|| TableError::Query("count query returned no rows".to_string()))?;
        aggregate
            .as_u64()
            .ok_or_else(|| TableError::Parse(format!("invalid count value: {aggregate}")))
    }

    /// Fetch page `page` (1-based, clamped to 1) of `page_size` rows and the total count.
    ///
    /// The offset is capped at `i64::MAX`, the largest value PostgreSQL binds.
    pub fn paginate<Ex: QueryExecutor + ?Sized>(
        self,
        executor: &Ex,
        page_size: u64,
        page: u64,
    ) -> Result<Page> {
        let page_size = page_size.max(1);
        let current_page = page.max(1);
        let total = self.count(executor)?;
        let offset = (current_page - 1)
            .saturating_mul(page_size)
            .min(i64::MAX as u64);
        let records = self.limit(page_size).offset(offset).all(executor)?;
        Ok(Page {
            records,
            total,
            page_size,
            current_page,
        })
    }

    /// First row whose key equals `key`.
    ///
    /// Soft-deleted rows are included for soft-deleting models so a trashed row can
    /// still be bound to a route (for restoring it, for instance).
    pub fn find_for_binding<Ex, V>(self, executor: &Ex, key: V) -> Result<Option<Record>>
    where
        Ex: QueryExecutor + ?Sized,
        V: Into<Value>,
    {
        let key_column = iden(self.meta().key_name());
        let mut query = self.filter(Expr::col(key_column).eq(key.into())).limit(1);
        if query.meta().deleted_at_column().is_some() {
            query = query.trashed(Trashed::With);
        }
        Ok(query.all(executor)?.into_iter().next())
    }
}
