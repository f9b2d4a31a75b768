use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DatabaseError;

/// Equality predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Value) -> bool {
        document.get(&self.field).unwrap_or(&Value::Null) == &self.value
    }
}

/// Minimal document-store contract the cells are written against.
///
/// Every call is atomic on its own. `insert` must reject documents that would
/// violate a unique constraint with [`DatabaseError::Conflict`], and
/// `update_where` only touches documents matching all filters at the moment
/// of the write, which makes it usable as a compare-and-set.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, DatabaseError>;

    async fn insert(&self, collection: &str, document: Value) -> Result<Value, DatabaseError>;

    async fn update_where(
        &self,
        collection: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, DatabaseError>;

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, DatabaseError> {
        let filters = [Filter::eq("id", id)];
        let documents = self.find(collection, &filters).await?;
        Ok(documents.into_iter().next())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<Option<Value>, DatabaseError> {
        let filters = [Filter::eq("id", id)];
        let documents = self.update_where(collection, &filters, patch).await?;
        Ok(documents.into_iter().next())
    }
}

pub fn decode<T: DeserializeOwned>(document: Value) -> Result<T, DatabaseError> {
    serde_json::from_value(document).map_err(DatabaseError::from)
}

pub fn decode_all<T: DeserializeOwned>(documents: Vec<Value>) -> Result<Vec<T>, DatabaseError> {
    documents.into_iter().map(decode).collect()
}
