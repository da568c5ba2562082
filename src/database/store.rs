use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;

/// Value an indexed field can be compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Text(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Text(value)
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        IndexValue::Integer(value)
    }
}

impl From<Uuid> for IndexValue {
    fn from(value: Uuid) -> Self {
        IndexValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals { field: String, value: IndexValue },
    /// Case-insensitive substring match on any of `fields`.
    Contains { fields: Vec<String>, needle: String },
}

/// Filter, ordering and window over one collection. Every field named here
/// must be an indexed field of that collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub conditions: Vec<Condition>,
    pub order_by: Option<(String, SortOrder)>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<IndexValue>) -> Self {
        self.conditions.push(Condition::Equals {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, fields: &[&str], needle: &str) -> Self {
        self.conditions.push(Condition::Contains {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            needle: needle.to_string(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Every field the query touches.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions
            .iter()
            .flat_map(|condition| match condition {
                Condition::Equals { field, .. } => vec![field.as_str()],
                Condition::Contains { fields, .. } => {
                    fields.iter().map(String::as_str).collect::<Vec<_>>()
                }
            })
            .chain(self.order_by.iter().map(|(field, _)| field.as_str()))
    }
}

/// Document storage behind the mock API. Documents are JSON objects; the key
/// of each is read from the collection's key path.
///
/// Absent keys are not errors: `get` yields `None`, `update` and `delete`
/// report zero affected documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn schema_version(&self) -> Result<u32>;

    async fn insert(&self, collection: &str, doc: JsonValue) -> Result<()>;

    async fn bulk_insert(&self, collection: &str, docs: Vec<JsonValue>) -> Result<u64>;

    /// Insert or fully replace.
    async fn put(&self, collection: &str, doc: JsonValue) -> Result<()>;

    async fn bulk_put(&self, collection: &str, docs: Vec<JsonValue>) -> Result<u64>;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<JsonValue>>;

    /// Merges `patch` into the stored document.
    async fn update(&self, collection: &str, key: &str, patch: JsonValue) -> Result<u64>;

    async fn delete(&self, collection: &str, key: &str) -> Result<u64>;

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>>;

    async fn count(&self, collection: &str, query: &Query) -> Result<i64>;
}
