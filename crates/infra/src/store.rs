//! Product document store abstraction.
//!
//! The catalog lives in a generic persistent key-document store: queried by
//! equality/`$in` filters over the type label fields, updated via partial
//! field-set writes. No schema is enforced beyond what normalization assumes
//! about field presence.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

/// Store-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store query failed: {0}")]
    Query(String),

    #[error("write failed for document {id}: {reason}")]
    Write { id: String, reason: String },

    #[error("document not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn write(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// A stored catalog document: store-assigned id plus schemaless JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDocument {
    pub id: String,
    pub body: JsonValue,
}

/// Generic document-store view of the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products whose `productType` OR legacy `product_type` field equals
    /// any of `labels` (exact string match; callers supply casing variants).
    async fn find_by_type_labels(
        &self,
        labels: &[String],
    ) -> Result<Vec<ProductDocument>, StoreError>;

    /// Merge `fields` into the document body (partial field-set write).
    async fn update_fields(
        &self,
        id: &str,
        fields: JsonMap<String, JsonValue>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn find_by_type_labels(
        &self,
        labels: &[String],
    ) -> Result<Vec<ProductDocument>, StoreError> {
        (**self).find_by_type_labels(labels).await
    }

    async fn update_fields(
        &self,
        id: &str,
        fields: JsonMap<String, JsonValue>,
    ) -> Result<(), StoreError> {
        (**self).update_fields(id, fields).await
    }
}

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<BTreeMap<String, JsonValue>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, body: JsonValue) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(id.into(), body);
        }
    }

    pub fn get(&self, id: &str) -> Option<JsonValue> {
        self.inner.read().ok()?.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn matches_labels(body: &JsonValue, labels: &[String]) -> bool {
    ["productType", "product_type"].iter().any(|key| {
        body.get(*key)
            .and_then(JsonValue::as_str)
            .is_some_and(|label| labels.iter().any(|candidate| candidate == label))
    })
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_type_labels(
        &self,
        labels: &[String],
    ) -> Result<Vec<ProductDocument>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::query("product store lock poisoned"))?;

        Ok(map
            .iter()
            .filter(|(_, body)| matches_labels(body, labels))
            .map(|(id, body)| ProductDocument {
                id: id.clone(),
                body: body.clone(),
            })
            .collect())
    }

    async fn update_fields(
        &self,
        id: &str,
        fields: JsonMap<String, JsonValue>,
    ) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::write(id, "product store lock poisoned"))?;

        let body = map
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let object = body
            .as_object_mut()
            .ok_or_else(|| StoreError::write(id, "document body is not an object"))?;

        for (key, value) in fields {
            object.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn finds_documents_by_either_type_field() {
        let store = InMemoryProductStore::new();
        store.insert("p1", json!({"productType": "Gold"}));
        store.insert("p2", json!({"product_type": "gold"}));
        store.insert("p3", json!({"productType": "Silver"}));
        store.insert("p4", json!({"name": "untyped"}));

        let labels = vec!["Gold".to_string(), "gold".to_string()];
        let found = store.find_by_type_labels(&labels).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn matching_is_exact_per_label() {
        let store = InMemoryProductStore::new();
        store.insert("p1", json!({"productType": "GOLD"}));

        let labels = vec!["Gold".to_string(), "gold".to_string()];
        assert!(store.find_by_type_labels(&labels).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_fields_merges_into_existing_body() {
        let store = InMemoryProductStore::new();
        store.insert("p1", json!({"productType": "Gold", "price": 100, "name": "Ring"}));

        let mut fields = JsonMap::new();
        fields.insert("price".to_string(), json!(150));
        fields.insert("subTotal".to_string(), json!(150));
        store.update_fields("p1", fields).await.unwrap();

        let body = store.get("p1").unwrap();
        assert_eq!(body["price"], json!(150));
        assert_eq!(body["subTotal"], json!(150));
        assert_eq!(body["name"], json!("Ring"));
    }

    #[tokio::test]
    async fn update_fields_reports_missing_document() {
        let store = InMemoryProductStore::new();
        let err = store.update_fields("ghost", JsonMap::new()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("ghost".to_string()));
    }
}
