//! Key/value row storage trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

/// One stored row: column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Narrow key/value access to a relational backend.
///
/// Rows are matched by column-equality maps only; there is deliberately
/// no query builder here. Consumed by plugin code, never by the core
/// lifecycle.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows in `table` whose columns equal every entry of `where_eq`.
    /// An empty `where_eq` returns the whole table.
    async fn query(&self, table: &str, where_eq: &Row) -> Result<Vec<Row>, AppError>;

    /// The first matching row, if any.
    async fn get_row(&self, table: &str, where_eq: &Row) -> Result<Option<Row>, AppError> {
        Ok(self.query(table, where_eq).await?.into_iter().next())
    }

    /// Insert a row.
    async fn insert(&self, table: &str, data: Row) -> Result<(), AppError>;

    /// Update all rows where `key == id`, returning the affected count.
    async fn update(&self, table: &str, key: &str, id: &Value, data: Row)
    -> Result<u64, AppError>;

    /// Delete all rows where `key == id`, returning the affected count.
    async fn delete(&self, table: &str, key: &str, id: &Value) -> Result<u64, AppError>;
}
