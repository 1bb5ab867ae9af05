use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Errors surfaced by the document store's HTTP Data API.
///
/// `DuplicateKey` is split out because the booking lock relies on a
/// conditional insert failing when the key already exists.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document violates a unique index")]
    DuplicateKey,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("data API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct FindOneResult {
    document: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FindResult {
    documents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertOneResult {
    inserted_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResult {
    matched_count: u64,
    #[allow(dead_code)]
    modified_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResult {
    deleted_count: u64,
}

/// Thin client for a MongoDB-style document Data API.
///
/// Every operation is a POST to `/action/<verb>` carrying the data source,
/// database and collection alongside the operation payload.
pub struct DataApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
}

impl DataApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.data_api_url.clone(),
            api_key: config.data_api_key.clone(),
            data_source: config.data_source.clone(),
            database: config.database.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("api-key", key);
        } else {
            error!("Data API key contains invalid header characters");
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn action<T>(&self, verb: &str, collection: &str, payload: Value) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/action/{}", self.base_url, verb);
        debug!("Data API {} on collection {}", verb, collection);

        let mut body = json!({
            "dataSource": self.data_source,
            "database": self.database,
            "collection": collection,
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut body, payload) {
            base.extend(extra);
        }

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Data API error ({}): {}", status, error_text);

            if status.as_u16() == 409 || error_text.contains("duplicate key") {
                return Err(StoreError::DuplicateKey);
            }
            if status.as_u16() == 404 {
                return Err(StoreError::NotFound(error_text));
            }
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub async fn find_one(&self, collection: &str, filter: Value) -> Result<Option<Value>, StoreError> {
        let result: FindOneResult = self
            .action("findOne", collection, json!({ "filter": filter }))
            .await?;
        Ok(result.document)
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: Value,
        sort: Option<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut payload = json!({ "filter": filter });
        if let Some(sort) = sort {
            payload["sort"] = sort;
        }
        let result: FindResult = self.action("find", collection, payload).await?;
        Ok(result.documents)
    }

    pub async fn insert_one(&self, collection: &str, document: Value) -> Result<Value, StoreError> {
        let result: InsertOneResult = self
            .action("insertOne", collection, json!({ "document": document }))
            .await?;
        Ok(result.inserted_id)
    }

    /// Returns the number of matched documents; zero means the filter hit nothing.
    pub async fn update_one(
        &self,
        collection: &str,
        filter: Value,
        update: Value,
    ) -> Result<u64, StoreError> {
        let result: UpdateResult = self
            .action(
                "updateOne",
                collection,
                json!({ "filter": filter, "update": update }),
            )
            .await?;
        Ok(result.matched_count)
    }

    /// Returns the number of deleted documents; zero means the filter hit nothing.
    pub async fn delete_one(&self, collection: &str, filter: Value) -> Result<u64, StoreError> {
        let result: DeleteResult = self
            .action("deleteOne", collection, json!({ "filter": filter }))
            .await?;
        Ok(result.deleted_count)
    }
}
