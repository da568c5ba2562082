use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::database::store::{DocumentStore, Query};
use crate::error::Result;

/// A model stored as one document of a named collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

/// Typed view of one collection of a [`DocumentStore`].
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn insert(&self, record: &T) -> Result<()> {
        let doc = serde_json::to_value(record)?;
        self.store.insert(T::COLLECTION, doc).await
    }

    pub async fn bulk_insert(&self, records: &[T]) -> Result<u64> {
        let docs = records
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        self.store.bulk_insert(T::COLLECTION, docs).await
    }

    pub async fn put(&self, record: &T) -> Result<()> {
        let doc = serde_json::to_value(record)?;
        self.store.put(T::COLLECTION, doc).await
    }

    pub async fn bulk_put(&self, records: &[T]) -> Result<u64> {
        let docs = records
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        self.store.bulk_put(T::COLLECTION, docs).await
    }

    pub async fn get(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(T::COLLECTION, key).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Returns the number of documents changed; zero when `key` is absent.
    pub async fn update<P: Serialize>(&self, key: &str, patch: &P) -> Result<u64> {
        let patch = serde_json::to_value(patch)?;
        self.store.update(T::COLLECTION, key, patch).await
    }

    pub async fn delete(&self, key: &str) -> Result<u64> {
        self.store.delete(T::COLLECTION, key).await
    }

    pub async fn find(&self, query: &Query) -> Result<Vec<T>> {
        self.store
            .find(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub async fn count(&self, query: &Query) -> Result<i64> {
        self.store.count(T::COLLECTION, query).await
    }
}
