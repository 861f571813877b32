//! Firestore REST client for the route collection.
//!
//! Documents are listed page by page with
//! `GET {base}/projects/{project}/databases/(default)/documents/{collection}`.
//! Firestore wraps every field in a typed value (`{"stringValue": "..."}`),
//! so documents are unwrapped to plain JSON before being decoded as routes.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::domain::{RecordRead, RouteRecord};

use super::error::StoreError;
use super::{RouteSnapshot, RouteStore};

/// Default base URL for the Firestore REST API.
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default collection holding route documents.
const DEFAULT_COLLECTION: &str = "routes";

/// Documents requested per page.
const PAGE_SIZE: u32 = 300;

/// Configuration for the Firestore client.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Google Cloud project ID
    pub project_id: String,
    /// Collection holding route documents
    pub collection: String,
    /// OAuth bearer token, if the database requires one
    pub token: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FirestoreConfig {
    /// Create a new config for the given project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Read routes from a different collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Authenticate with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set a custom base URL (for emulators and testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// URL listing the documents of the configured collection.
    fn documents_url(&self) -> Result<Url, StoreError> {
        let url = format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.collection
        );
        Url::parse(&url).map_err(|e| StoreError::Unavailable {
            message: format!("invalid Firestore URL {url}: {e}"),
        })
    }
}

/// One page of `documents.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

/// A Firestore document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreDocument {
    /// Full resource name; the last segment is the document key.
    pub name: String,
    /// Typed fields.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl FirestoreDocument {
    /// The document key (last segment of the resource name).
    pub fn key(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Decode this document as a route.
    pub fn to_record(&self) -> RecordRead {
        RouteRecord::from_document(self.key(), &decode_fields(&self.fields))
    }
}

/// Client for route documents in Firestore.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    http: reqwest::Client,
    documents_url: Url,
    token: Option<String>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let documents_url = config.documents_url()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            documents_url,
            token: config.token,
        })
    }

    /// Fetch and decode every document in the collection.
    pub async fn fetch_routes(&self) -> Result<Vec<RecordRead>, StoreError> {
        let mut routes = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            pages += 1;
            routes.extend(page.documents.iter().map(FirestoreDocument::to_record));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(pages, documents = routes.len(), "fetched Firestore routes");
        Ok(routes)
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<ListDocumentsResponse, StoreError> {
        let mut url = self.documents_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Json {
            message: e.to_string(),
        })
    }
}

impl RouteStore for FirestoreStore {
    fn list_routes(&self) -> BoxFuture<'_, Result<RouteSnapshot, StoreError>> {
        async move {
            let routes = self.fetch_routes().await?;
            Ok::<_, StoreError>(Arc::new(routes))
        }
        .boxed()
    }
}

/// Unwrap a map of typed Firestore fields into a plain JSON object.
pub fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), decode_value(value)))
            .collect(),
    )
}

/// Unwrap one typed Firestore value.
///
/// Unknown or invalid values decode to `null`, which route decoding then
/// reports as malformed where it matters.
pub fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = typed.get("stringValue") {
        return s.clone();
    }
    if let Some(n) = typed.get("integerValue") {
        // int64 values are transported as strings
        return match n {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(_) => n.clone(),
            _ => Value::Null,
        };
    }
    if let Some(n) = typed.get("doubleValue") {
        return match n {
            Value::Number(_) => n.clone(),
            // "NaN" and "Infinity" have no JSON number form; keep the text so
            // the field is reported instead of silently dropped
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or_else(|| n.clone(), Value::Number),
            _ => Value::Null,
        };
    }
    if let Some(b) = typed.get("booleanValue") {
        return b.clone();
    }
    if let Some(s) = typed
        .get("timestampValue")
        .or_else(|| typed.get("referenceValue"))
    {
        return s.clone();
    }
    if let Some(array) = typed.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(map) = typed.get("mapValue") {
        return match map.get("fields").and_then(Value::as_object) {
            Some(fields) => decode_fields(fields),
            None => Value::Object(Map::new()),
        };
    }

    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_scalars() {
        assert_eq!(decode_value(&json!({ "stringValue": "GBC" })), json!("GBC"));
        assert_eq!(decode_value(&json!({ "integerValue": "5" })), json!(5));
        assert_eq!(decode_value(&json!({ "doubleValue": 3.5 })), json!(3.5));
        assert_eq!(decode_value(&json!({ "booleanValue": true })), json!(true));
        assert_eq!(decode_value(&json!({ "nullValue": null })), Value::Null);
    }

    #[test]
    fn decode_bad_integer_is_null() {
        assert_eq!(decode_value(&json!({ "integerValue": "five" })), Value::Null);
    }

    #[test]
    fn decode_nested() {
        let value = json!({
            "mapValue": {
                "fields": {
                    "lat": { "doubleValue": 5.5655 },
                    "tags": { "arrayValue": { "values": [{ "stringValue": "a" }] } }
                }
            }
        });

        assert_eq!(
            decode_value(&value),
            json!({ "lat": 5.5655, "tags": ["a"] })
        );
    }

    #[test]
    fn decode_empty_array() {
        assert_eq!(decode_value(&json!({ "arrayValue": {} })), json!([]));
    }

    #[test]
    fn document_to_record() {
        let doc: FirestoreDocument = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/routes/route_81",
            "fields": {
                "routeName": { "stringValue": "Trotro 81" },
                "fare": { "doubleValue": 6.0 },
                "stops": { "arrayValue": { "values": [
                    { "stringValue": "Achimota" },
                    { "stringValue": "Adenta Station" }
                ] } }
            }
        }))
        .unwrap();

        assert_eq!(doc.key(), "route_81");

        let record = doc.to_record().unwrap();
        assert_eq!(record.id.as_str(), "route_81");
        assert_eq!(record.route_name, "Trotro 81");
        assert_eq!(record.fare, Some(6.0));
        assert_eq!(record.stops, vec!["Achimota", "Adenta Station"]);
    }

    #[test]
    fn integer_fare_document() {
        let doc: FirestoreDocument = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/routes/r1",
            "fields": {
                "fare": { "integerValue": "4" },
                "stops": { "arrayValue": { "values": [] } }
            }
        }))
        .unwrap();

        assert_eq!(doc.to_record().unwrap().fare, Some(4.0));
    }

    #[test]
    fn non_finite_fare_is_malformed() {
        assert_eq!(decode_value(&json!({ "doubleValue": "NaN" })), json!("NaN"));
        assert_eq!(decode_value(&json!({ "doubleValue": "2.5" })), json!(2.5));

        for special in ["NaN", "Infinity", "-Infinity"] {
            let doc: FirestoreDocument = serde_json::from_value(json!({
                "name": "projects/p/databases/(default)/documents/routes/r9",
                "fields": {
                    "fare": { "doubleValue": special },
                    "stops": { "arrayValue": { "values": [{ "stringValue": "A" }] } }
                }
            }))
            .unwrap();

            let err = doc.to_record().unwrap_err();
            assert_eq!(err.reason, "fare is not a number");
        }
    }

    #[test]
    fn document_with_bad_stop_is_malformed() {
        let doc: FirestoreDocument = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/routes/broken",
            "fields": {
                "stops": { "arrayValue": { "values": [{ "integerValue": "37" }] } }
            }
        }))
        .unwrap();

        let err = doc.to_record().unwrap_err();
        assert_eq!(err.key, "broken");
        assert_eq!(err.reason, "stop 0 is not a string");
    }

    #[test]
    fn list_response_parses_without_documents() {
        let page: ListDocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn documents_url() {
        let config = FirestoreConfig::new("accra-transit").with_base_url("http://localhost:8080/v1/");
        let url = config.documents_url().unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/projects/accra-transit/databases/(default)/documents/routes"
        );
    }

    #[test]
    fn config_builders() {
        let config = FirestoreConfig::new("p")
            .with_collection("routes_v2")
            .with_token("secret");

        assert_eq!(config.collection, "routes_v2");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
