use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::collections;
use crate::error::DatabaseError;
use crate::store::{DocumentStore, Filter};

/// Unique key over one or more fields, optionally restricted to documents
/// matching `active_when` (a partial index).
#[derive(Debug, Clone)]
pub struct UniqueConstraint {
    pub name: String,
    pub fields: Vec<String>,
    pub active_when: Vec<Filter>,
}

impl UniqueConstraint {
    pub fn new(name: &str, fields: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            active_when: Vec::new(),
        }
    }

    pub fn active_when(mut self, filter: Filter) -> Self {
        self.active_when.push(filter);
        self
    }

    fn applies_to(&self, document: &Value) -> bool {
        self.active_when.iter().all(|f| f.matches(document))
    }

    fn key(&self, document: &Value) -> Option<Vec<Value>> {
        self.fields
            .iter()
            .map(|field| document.get(field).filter(|v| !v.is_null()).cloned())
            .collect()
    }

    fn collides(&self, a: &Value, b: &Value) -> bool {
        if !self.applies_to(a) || !self.applies_to(b) {
            return false;
        }
        match (self.key(a), self.key(b)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

/// Process-local document store. Writes take the collection map's write lock
/// for the whole check-then-write, so unique constraints hold under
/// concurrent callers.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    constraints: HashMap<String, Vec<UniqueConstraint>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            constraints: HashMap::new(),
        }
    }

    pub fn with_unique(mut self, collection: &str, constraint: UniqueConstraint) -> Self {
        self.constraints
            .entry(collection.to_string())
            .or_default()
            .push(constraint);
        self
    }

    /// Same constraints as `schema.sql`.
    pub fn with_clinic_schema() -> Self {
        Self::new()
            .with_unique(
                collections::PATIENTS,
                UniqueConstraint::new("patients_email_key", &["email"]),
            )
            .with_unique(
                collections::DOCTORS,
                UniqueConstraint::new("doctors_email_key", &["email"]),
            )
            .with_unique(
                collections::ADMINS,
                UniqueConstraint::new("admins_email_key", &["email"]),
            )
            .with_unique(
                collections::APPOINTMENTS,
                UniqueConstraint::new(
                    "appointments_active_slot_key",
                    &["doc_id", "slot_date", "slot_time"],
                )
                .active_when(Filter::eq("cancelled", false)),
            )
    }

    fn check_unique(
        &self,
        collection: &str,
        existing: &[Value],
        candidate: &Value,
        skip: Option<usize>,
    ) -> Result<(), DatabaseError> {
        let Some(constraints) = self.constraints.get(collection) else {
            return Ok(());
        };

        for constraint in constraints {
            let clash = existing
                .iter()
                .enumerate()
                .filter(|(idx, _)| Some(*idx) != skip)
                .any(|(_, doc)| constraint.collides(doc, candidate));

            if clash {
                debug!("Unique constraint {} violated in {}", constraint.name, collection);
                return Err(DatabaseError::Conflict(format!(
                    "duplicate key value violates unique constraint \"{}\"",
                    constraint.name
                )));
            }
        }

        Ok(())
    }
}

fn merge(document: &Value, patch: &Value) -> Value {
    let mut merged = document.clone();
    if let (Some(target), Some(changes)) = (merged.as_object_mut(), patch.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, DatabaseError> {
        let guard = self.collections.read().await;
        let documents = guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filters.iter().all(|f| f.matches(doc)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn insert(&self, collection: &str, mut document: Value) -> Result<Value, DatabaseError> {
        let Some(object) = document.as_object_mut() else {
            return Err(DatabaseError::Decode("documents must be JSON objects".to_string()));
        };
        if !object.contains_key("id") {
            object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }

        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_string()).or_default();
        self.check_unique(collection, docs, &document, None)?;
        docs.push(document.clone());

        Ok(document)
    }

    async fn update_where(
        &self,
        collection: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, DatabaseError> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(Vec::new());
        };

        let updates: Vec<(usize, Value)> = docs
            .iter()
            .enumerate()
            .filter(|(_, doc)| filters.iter().all(|f| f.matches(doc)))
            .map(|(idx, doc)| (idx, merge(doc, &patch)))
            .collect();

        // Validate everything before writing anything.
        for (idx, updated) in &updates {
            self.check_unique(collection, docs, updated, Some(*idx))?;
        }

        let mut written = Vec::with_capacity(updates.len());
        for (idx, updated) in updates {
            docs[idx] = updated.clone();
            written.push(updated);
        }

        Ok(written)
    }
}
