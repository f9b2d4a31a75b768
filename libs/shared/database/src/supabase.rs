use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::error::DatabaseError;
use crate::store::{DocumentStore, Filter};

/// PostgREST (Supabase) backed document store. Unique constraints live in the
/// database (see `schema.sql`); PostgREST reports violations as HTTP 409.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, return_representation: bool) -> Result<HeaderMap, DatabaseError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|_| DatabaseError::Auth("Invalid service key".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|_| DatabaseError::Auth("Invalid service key".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if return_representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, DatabaseError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let return_representation = method != Method::GET;
        let headers = self.get_headers(return_representation)?;

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                409 => DatabaseError::Conflict(error_text),
                401 | 403 => DatabaseError::Auth(error_text),
                404 => DatabaseError::NotFound(error_text),
                code => DatabaseError::Api {
                    status: code,
                    message: error_text,
                },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn filter_clause(filter: &Filter) -> String {
    match &filter.value {
        Value::Null => format!("{}=is.null", filter.field),
        Value::String(s) => format!("{}=eq.{}", filter.field, urlencoding::encode(s)),
        other => format!("{}=eq.{}", filter.field, other),
    }
}

pub(crate) fn collection_path(collection: &str, filters: &[Filter]) -> String {
    let mut path = format!("/rest/v1/{}", collection);
    let clauses: Vec<String> = filters.iter().map(filter_clause).collect();
    if !clauses.is_empty() {
        path.push('?');
        path.push_str(&clauses.join("&"));
    }
    path
}

#[async_trait]
impl DocumentStore for SupabaseClient {
    async fn find(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, DatabaseError> {
        let path = collection_path(collection, filters);
        self.request(Method::GET, &path, None).await
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<Value, DatabaseError> {
        let path = collection_path(collection, &[]);
        let created: Vec<Value> = self.request(Method::POST, &path, Some(document)).await?;

        created.into_iter().next().ok_or_else(|| DatabaseError::Api {
            status: 201,
            message: format!("Insert into {} returned no representation", collection),
        })
    }

    async fn update_where(
        &self,
        collection: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, DatabaseError> {
        let path = collection_path(collection, filters);
        self.request(Method::PATCH, &path, Some(patch)).await
    }
}
