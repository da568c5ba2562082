use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::query::QueryScalar;
use sqlx::sqlite::{SqliteArguments, SqliteQueryResult};
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::database::schema::{self, field_expr, CollectionSchema, SchemaRevision, REVISIONS};
use crate::database::store::{Condition, DocumentStore, IndexValue, Query, SortOrder};
use crate::error::{Error, Result};

/// [`DocumentStore`] over SQLite: one table per collection, documents kept as
/// JSON text, indexes on `json_extract` expressions.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    revision: &'static SchemaRevision,
}

impl SqliteStore {
    /// Migrates `pool` to the latest revision and wraps it.
    pub async fn open(pool: SqlitePool) -> Result<Self> {
        Self::open_with(pool, REVISIONS).await
    }

    pub async fn open_with(pool: SqlitePool, revisions: &'static [SchemaRevision]) -> Result<Self> {
        let revision = revisions
            .last()
            .ok_or_else(|| Error::Store("no schema revisions declared".to_string()))?;
        schema::migrate(&pool, revisions).await?;
        Ok(Self { pool, revision })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn collection(&self, name: &str) -> Result<&'static CollectionSchema> {
        let revision: &'static SchemaRevision = self.revision;
        revision
            .collection(name)
            .ok_or_else(|| Error::Store(format!("unknown collection: {}", name)))
    }
}

fn key_of(schema: &CollectionSchema, doc: &JsonValue) -> Result<String> {
    match doc.get(schema.key_path) {
        Some(JsonValue::String(key)) => Ok(key.clone()),
        Some(JsonValue::Number(key)) => Ok(key.to_string()),
        _ => Err(Error::Store(format!(
            "document for '{}' has no '{}' key",
            schema.name, schema.key_path
        ))),
    }
}

fn ensure_object(schema: &CollectionSchema, doc: &JsonValue) -> Result<()> {
    if doc.is_object() {
        Ok(())
    } else {
        Err(Error::Store(format!(
            "documents in '{}' must be JSON objects",
            schema.name
        )))
    }
}

fn duplicate_key(err: sqlx::Error, schema: &CollectionSchema, key: &str) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Error::Store(format!(
            "key '{}' already exists in '{}'",
            key, schema.name
        )),
        _ => Error::from(err),
    }
}

struct Compiled {
    filter: String,
    window: String,
    binds: Vec<IndexValue>,
    window_binds: Vec<IndexValue>,
}

fn compile(schema: &CollectionSchema, query: &Query) -> Result<Compiled> {
    if let Some(field) = query.fields().find(|f| !schema.is_indexed(f)) {
        return Err(Error::Store(format!(
            "'{}' is not an indexed field of '{}'",
            field, schema.name
        )));
    }

    let mut clauses = Vec::new();
    let mut binds = Vec::new();
    for condition in &query.conditions {
        match condition {
            Condition::Equals { field, value } => {
                clauses.push(format!("{} = ?", field_expr(field)));
                binds.push(value.clone());
            }
            Condition::Contains { fields, needle } => {
                let alternatives: Vec<String> = fields
                    .iter()
                    .map(|field| format!("instr(lower({}), lower(?)) > 0", field_expr(field)))
                    .collect();
                clauses.push(format!("({})", alternatives.join(" OR ")));
                binds.extend(fields.iter().map(|_| IndexValue::Text(needle.clone())));
            }
        }
    }

    let filter = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let mut window = String::new();
    let mut window_binds = Vec::new();
    if let Some((field, order)) = &query.order_by {
        let direction = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        // Ties keep insertion order.
        window.push_str(&format!(
            " ORDER BY {} {}, rowid {}",
            field_expr(field),
            direction,
            direction
        ));
    }
    if query.limit.is_some() || query.offset.is_some() {
        window.push_str(" LIMIT ? OFFSET ?");
        window_binds.push(IndexValue::Integer(query.limit.unwrap_or(-1)));
        window_binds.push(IndexValue::Integer(query.offset.unwrap_or(0).max(0)));
    }

    Ok(Compiled {
        filter,
        window,
        binds,
        window_binds,
    })
}

fn bind_values<'q, O>(
    mut statement: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    values: &'q [IndexValue],
) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in values {
        statement = match value {
            IndexValue::Text(text) => statement.bind(text.as_str()),
            IndexValue::Integer(number) => statement.bind(*number),
        };
    }
    statement
}

fn parse_doc(raw: &str) -> Result<JsonValue> {
    Ok(serde_json::from_str(raw)?)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn schema_version(&self) -> Result<u32> {
        schema::current_version(&self.pool).await
    }

    async fn insert(&self, collection: &str, doc: JsonValue) -> Result<()> {
        let schema = self.collection(collection)?;
        ensure_object(schema, &doc)?;
        let key = key_of(schema, &doc)?;

        sqlx::query(&format!("INSERT INTO {} (id, doc) VALUES (?, ?)", schema.name))
            .bind(&key)
            .bind(doc.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_key(e, schema, &key))?;

        debug!(collection = schema.name, key = %key, "inserted document");
        Ok(())
    }

    async fn bulk_insert(&self, collection: &str, docs: Vec<JsonValue>) -> Result<u64> {
        let schema = self.collection(collection)?;
        let sql = format!("INSERT INTO {} (id, doc) VALUES (?, ?)", schema.name);

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for doc in &docs {
            ensure_object(schema, doc)?;
            let key = key_of(schema, doc)?;
            let result: SqliteQueryResult = sqlx::query(&sql)
                .bind(&key)
                .bind(doc.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| duplicate_key(e, schema, &key))?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        debug!(collection = schema.name, inserted, "bulk inserted documents");
        Ok(inserted)
    }

    async fn put(&self, collection: &str, doc: JsonValue) -> Result<()> {
        self.bulk_put(collection, vec![doc]).await.map(|_| ())
    }

    async fn bulk_put(&self, collection: &str, docs: Vec<JsonValue>) -> Result<u64> {
        let schema = self.collection(collection)?;
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET doc = excluded.doc",
            schema.name
        );

        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for doc in &docs {
            ensure_object(schema, doc)?;
            let key = key_of(schema, doc)?;
            let result = sqlx::query(&sql)
                .bind(&key)
                .bind(doc.to_string())
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;

        debug!(collection = schema.name, written, "put documents");
        Ok(written)
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<JsonValue>> {
        let schema = self.collection(collection)?;
        let raw: Option<String> =
            sqlx::query_scalar(&format!("SELECT doc FROM {} WHERE id = ?", schema.name))
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        raw.as_deref().map(parse_doc).transpose()
    }

    async fn update(&self, collection: &str, key: &str, patch: JsonValue) -> Result<u64> {
        let schema = self.collection(collection)?;
        ensure_object(schema, &patch)?;
        if let Some(new_key) = patch.get(schema.key_path) {
            if key_of(schema, &patch)? != key {
                return Err(Error::Store(format!(
                    "cannot change key of '{}' to {}",
                    schema.name, new_key
                )));
            }
        }

        let result = sqlx::query(&format!(
            "UPDATE {} SET doc = json_patch(doc, ?) WHERE id = ?",
            schema.name
        ))
        .bind(patch.to_string())
        .bind(key)
        .execute(&self.pool)
        .await?;

        debug!(collection = schema.name, key, affected = result.rows_affected(), "updated document");
        Ok(result.rows_affected())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<u64> {
        let schema = self.collection(collection)?;
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", schema.name))
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>> {
        let schema = self.collection(collection)?;
        let compiled = compile(schema, query)?;
        let sql = format!(
            "SELECT doc FROM {}{}{}",
            schema.name, compiled.filter, compiled.window
        );

        let statement = bind_values(sqlx::query_scalar::<_, String>(&sql), &compiled.binds);
        let rows = bind_values(statement, &compiled.window_binds)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|raw| parse_doc(raw)).collect()
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<i64> {
        let schema = self.collection(collection)?;
        let compiled = compile(schema, query)?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", schema.name, compiled.filter);

        let total = bind_values(sqlx::query_scalar::<_, i64>(&sql), &compiled.binds)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
