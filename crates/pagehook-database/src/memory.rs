//! In-memory row store.
//!
//! The default backend for local development and the test suite. Rows
//! live in a `RwLock`-guarded map of tables; matching is plain column
//! equality on the JSON values.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use pagehook_core::error::AppError;
use pagehook_core::traits::{Row, RowStore};

/// A `RowStore` holding everything in process memory.
#[derive(Default)]
pub struct MemoryRowStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryRowStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}

fn matches(row: &Row, where_eq: &Row) -> bool {
    where_eq
        .iter()
        .all(|(col, expected)| row.get(col) == Some(expected))
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn query(&self, table: &str, where_eq: &Row) -> Result<Vec<Row>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, where_eq))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, data: Row) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().push(data);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        id: &Value,
        data: Row,
    ) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };

        let mut affected = 0;
        for row in rows.iter_mut().filter(|row| row.get(key) == Some(id)) {
            for (col, value) in &data {
                row.insert(col.clone(), value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, table: &str, key: &str, id: &Value) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| row.get(key) != Some(id));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_insert_and_query() {
        let store = MemoryRowStore::new();
        store
            .insert("users", row(&[("id", json!(1)), ("email", json!("a@b.c"))]))
            .await
            .expect("insert");
        store
            .insert("users", row(&[("id", json!(2)), ("email", json!("x@y.z"))]))
            .await
            .expect("insert");

        let all = store.query("users", &Row::new()).await.expect("query");
        assert_eq!(all.len(), 2);

        let matched = store
            .query("users", &row(&[("email", json!("a@b.c"))]))
            .await
            .expect("query");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_get_row_first_match() {
        let store = MemoryRowStore::new();
        let found = store.get_row("users", &Row::new()).await.expect("get");
        assert!(found.is_none());

        store
            .insert("users", row(&[("id", json!(1))]))
            .await
            .expect("insert");
        let found = store.get_row("users", &Row::new()).await.expect("get");
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_update_merges_columns() {
        let store = MemoryRowStore::new();
        store
            .insert("users", row(&[("id", json!(1)), ("email", json!("old"))]))
            .await
            .expect("insert");

        let affected = store
            .update("users", "id", &json!(1), row(&[("email", json!("new"))]))
            .await
            .expect("update");
        assert_eq!(affected, 1);

        let found = store
            .get_row("users", &row(&[("id", json!(1))]))
            .await
            .expect("get")
            .expect("row");
        assert_eq!(found.get("email"), Some(&json!("new")));
    }

    #[tokio::test]
    async fn test_delete_by_key() {
        let store = MemoryRowStore::new();
        store
            .insert("users", row(&[("id", json!(1))]))
            .await
            .expect("insert");
        store
            .insert("users", row(&[("id", json!(2))]))
            .await
            .expect("insert");

        let affected = store.delete("users", "id", &json!(1)).await.expect("delete");
        assert_eq!(affected, 1);
        assert_eq!(store.len("users").await, 1);

        let affected = store.delete("users", "id", &json!(9)).await.expect("delete");
        assert_eq!(affected, 0);
    }
}
