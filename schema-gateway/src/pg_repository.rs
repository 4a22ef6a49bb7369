//! PostgreSQL catalog repository.
//!
//! Catalog lookups go through `information_schema`; free-form statements go
//! through the simple query protocol, so every value arrives as text and is
//! converted to JSON by its type oid.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use sqlx::postgres::{PgColumn, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Executor, Row};

use common::config::DatabaseConfig;
use common::errors::{AppError, AppResult};
use common::models::{ColumnDescriptor, FieldDescriptor, QueryResult};

use crate::repository::CatalogRepository;

const COLUMNS_IN_SCHEMA_SQL: &str = "
    SELECT table_name::text AS table_name,
           column_name::text AS column_name,
           data_type::text AS data_type,
           is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_schema = 'public'
      AND column_name ILIKE $1
    ORDER BY table_name, ordinal_position";

const COLUMNS_IN_TABLE_SQL: &str = "
    SELECT column_name::text AS column_name,
           data_type::text AS data_type,
           is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_schema = 'public'
      AND table_name = $1
      AND column_name ILIKE $2
    ORDER BY ordinal_position";

const TABLES_SQL: &str = "
    SELECT table_name::text AS table_name
    FROM information_schema.tables
    WHERE table_schema = 'public'
      AND table_type = 'BASE TABLE'
      AND table_name ILIKE $1
    ORDER BY table_name";

// Type oids from pg_type.
const BOOL_OID: u32 = 16;
const INT8_OID: u32 = 20;
const INT2_OID: u32 = 21;
const INT4_OID: u32 = 23;
const OID_OID: u32 = 26;
const JSON_OID: u32 = 114;
const FLOAT4_OID: u32 = 700;
const FLOAT8_OID: u32 = 701;
const JSONB_OID: u32 = 3802;

/// Row from `information_schema.columns`.
#[derive(sqlx::FromRow)]
struct CatalogColumnRow {
    #[sqlx(default)]
    table_name: Option<String>,
    column_name: String,
    data_type: String,
    is_nullable: String,
}

impl CatalogColumnRow {
    fn into_descriptor(self) -> ColumnDescriptor {
        ColumnDescriptor::from_catalog(
            self.column_name,
            self.table_name,
            self.data_type,
            &self.is_nullable,
        )
    }
}

/// Catalog repository backed by a shared Postgres pool.
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without opening a connection; the first query does.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the connection settings cannot be parsed.
    pub fn connect_lazy(config: &DatabaseConfig) -> AppResult<Self> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(options);
        Ok(Self::new(pool))
    }

    /// Field descriptors for a statement that produced no rows.
    ///
    /// Best-effort: some texts (several statements at once, for instance)
    /// cannot be described, and then no fields are reported.
    async fn describe_fields(&self, sql: &str) -> Vec<FieldDescriptor> {
        match self.pool.describe(sql).await {
            Ok(describe) => fields_of(describe.columns()),
            Err(e) => {
                tracing::debug!(error = %e, "could not describe statement");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn columns_in_schema(&self, pattern: &str) -> AppResult<Vec<ColumnDescriptor>> {
        let rows = sqlx::query_as::<_, CatalogColumnRow>(COLUMNS_IN_SCHEMA_SQL)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CatalogColumnRow::into_descriptor).collect())
    }

    async fn columns_in_table(&self, table: &str, pattern: &str) -> AppResult<Vec<ColumnDescriptor>> {
        let rows = sqlx::query_as::<_, CatalogColumnRow>(COLUMNS_IN_TABLE_SQL)
            .bind(table)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CatalogColumnRow::into_descriptor).collect())
    }

    async fn tables(&self, pattern: &str) -> AppResult<Vec<String>> {
        let tables = sqlx::query_scalar::<_, String>(TABLES_SQL)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(tables)
    }

    async fn execute(&self, sql: &str) -> AppResult<QueryResult> {
        let rows = sqlx::raw_sql(sql).fetch_all(&self.pool).await?;

        let fields = match rows.first() {
            Some(row) => fields_of(row.columns()),
            None => self.describe_fields(sql).await,
        };
        let rows = rows
            .iter()
            .map(row_to_json)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(QueryResult::new(rows, fields))
    }

    async fn server_time(&self) -> AppResult<DateTime<Utc>> {
        let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}

fn column_oid(column: &PgColumn) -> u32 {
    column.type_info().oid().map(|oid| oid.0).unwrap_or(0)
}

fn fields_of(columns: &[PgColumn]) -> Vec<FieldDescriptor> {
    columns
        .iter()
        .map(|column| FieldDescriptor {
            name: column.name().to_string(),
            data_type: column_oid(column),
        })
        .collect()
}

fn row_to_json(row: &PgRow) -> AppResult<Map<String, Value>> {
    let mut object = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        // Simple-protocol values are text, whatever the column type.
        let text: Option<String> = row
            .try_get_unchecked(column.ordinal())
            .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;
        let value = match text {
            Some(text) => text_to_json(column_oid(column), text),
            None => Value::Null,
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

/// Converts the text form of a value into JSON according to its type oid.
fn text_to_json(oid: u32, text: String) -> Value {
    match oid {
        BOOL_OID => Value::Bool(text == "t"),
        INT2_OID | INT4_OID | INT8_OID | OID_OID => match text.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(text),
        },
        FLOAT4_OID | FLOAT8_OID => match text.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Value::Number(n),
            None => Value::String(text),
        },
        JSON_OID | JSONB_OID => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        _ => Value::String(text),
    }
}
