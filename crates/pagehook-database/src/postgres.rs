//! PostgreSQL-backed row store.
//!
//! Rows cross the trait boundary as JSON maps, so the handful of common
//! Postgres column types are converted on the way out. This is key/value
//! row access only; anything needing real SQL belongs in its own crate.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Column, Row as _, TypeInfo};
use tracing::debug;

use pagehook_core::error::AppError;
use pagehook_core::traits::{Row, RowStore};

/// A `RowStore` over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgRowStore {
    pool: PgPool,
}

impl PgRowStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Validates and quotes a SQL identifier coming from plugin code.
fn ident(name: &str) -> Result<String, AppError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(AppError::validation(format!(
            "Invalid SQL identifier: '{name}'"
        )));
    }
    Ok(format!("\"{name}\""))
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        // Arrays and objects go over as JSONB.
        other => query.bind(other.clone()),
    }
}

fn decode_column(row: &PgRow, index: usize) -> Value {
    let type_name = row.columns()[index].type_info().name().to_string();
    match type_name.as_str() {
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(index)
            .map(|v| v.map(|u| Value::String(u.to_string())).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .map(|v| {
                v.map(|t| Value::String(t.to_rfc3339())).unwrap_or(Value::Null)
            })
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .map(|v| v.map(|t| Value::String(t.to_string())).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(index)
            .map(|v| v.unwrap_or(Value::Null))
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<Option<String>, _>(index)
            .map(|v| v.map(Value::String).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),
    }
}

fn decode_row(row: &PgRow) -> Row {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.insert(column.name().to_string(), decode_column(row, index));
    }
    out
}

fn where_clause(where_eq: &Row, first_placeholder: usize) -> Result<String, AppError> {
    if where_eq.is_empty() {
        return Ok(String::new());
    }
    let conditions: Vec<String> = where_eq
        .keys()
        .enumerate()
        .map(|(i, col)| Ok(format!("{} = ${}", ident(col)?, first_placeholder + i)))
        .collect::<Result<_, AppError>>()?;
    Ok(format!(" WHERE {}", conditions.join(" AND ")))
}

#[async_trait]
impl RowStore for PgRowStore {
    async fn query(&self, table: &str, where_eq: &Row) -> Result<Vec<Row>, AppError> {
        let sql = format!("SELECT * FROM {}{}", ident(table)?, where_clause(where_eq, 1)?);
        debug!(%sql, "Row store query");

        let mut query = sqlx::query(&sql);
        for value in where_eq.values() {
            query = bind_value(query, value);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Query on '{table}' failed: {e}")))?;

        Ok(rows.iter().map(decode_row).collect())
    }

    async fn insert(&self, table: &str, data: Row) -> Result<(), AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Cannot insert an empty row"));
        }

        let columns: Vec<String> = data.keys().map(|c| ident(c)).collect::<Result<_, _>>()?;
        let placeholders: Vec<String> = (1..=data.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(table)?,
            columns.join(", "),
            placeholders.join(", ")
        );
        debug!(%sql, "Row store insert");

        let mut query = sqlx::query(&sql);
        for value in data.values() {
            query = bind_value(query, value);
        }

        query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Insert into '{table}' failed: {e}")))?;
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        id: &Value,
        data: Row,
    ) -> Result<u64, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Cannot update with an empty row"));
        }

        let assignments: Vec<String> = data
            .keys()
            .enumerate()
            .map(|(i, col)| Ok(format!("{} = ${}", ident(col)?, i + 1)))
            .collect::<Result<_, AppError>>()?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            ident(table)?,
            assignments.join(", "),
            ident(key)?,
            data.len() + 1
        );
        debug!(%sql, "Row store update");

        let mut query = sqlx::query(&sql);
        for value in data.values() {
            query = bind_value(query, value);
        }
        query = bind_value(query, id);

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Update on '{table}' failed: {e}")))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, table: &str, key: &str, id: &Value) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", ident(table)?, ident(key)?);
        debug!(%sql, "Row store delete");

        let result = bind_value(sqlx::query(&sql), id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Delete on '{table}' failed: {e}")))?;
        Ok(result.rows_affected())
    }
}
