//! The HTTP collaborator: request/response shapes and the reqwest-backed transport.

use crate::base::item::JsonMap;
use crate::prelude::*;
use crate::settings::Settings;
use crate::utils::http;
use crate::utils::retryable::{self, RetryOptions};

use std::time::Duration;

pub const PAGE_SIZE: &str = "page_size";
pub const PAGE_TOKEN: &str = "page_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn is_idempotent(self) -> bool {
        !matches!(self, Method::Post)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outbound call, with `path` relative to the service base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<JsonValue>,
    pub bearer_token: String,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer_token: bearer_token.into(),
        }
    }

    /// Sets a query parameter, replacing any previous value for the key.
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The service envelope: `{code, msg?, data?}` plus whatever else it sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl ServiceResponse {
    /// Rejects a response whose status code is non-zero.
    pub fn ensure_success(self) -> Result<Self> {
        if self.code != 0 {
            return Err(Error::Remote {
                code: self.code,
                msg: self.msg.unwrap_or_default(),
            });
        }
        Ok(self)
    }

    fn data_field(&self, key: &str) -> Option<&JsonValue> {
        self.data.as_ref()?.get(key)
    }

    pub fn has_more(&self) -> bool {
        self.data_field("has_more")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    pub fn page_token(&self) -> Option<&str> {
        self.data_field(PAGE_TOKEN)
            .and_then(JsonValue::as_str)
            .filter(|token| !token.is_empty())
    }

    /// The cursor to continue with, present only when the service reports more pages.
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.has_more() {
            return None;
        }
        self.page_token()
    }

    pub fn items(&self) -> &[JsonValue] {
        self.data_field("items")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn take_items(&mut self) -> Vec<JsonValue> {
        match self.data_mut().remove("items") {
            Some(JsonValue::Array(items)) => items,
            _ => Vec::new(),
        }
    }

    /// Replaces the items with a fully fetched list and clears the cursor.
    pub fn set_all_items(&mut self, items: Vec<JsonValue>) {
        let data = self.data_mut();
        data.insert("items".to_string(), JsonValue::Array(items));
        data.insert("has_more".to_string(), JsonValue::Bool(false));
        data.remove(PAGE_TOKEN);
    }

    fn data_mut(&mut self) -> &mut JsonMap {
        if !matches!(self.data, Some(JsonValue::Object(_))) {
            self.data = Some(JsonValue::Object(JsonMap::new()));
        }
        match &mut self.data {
            Some(JsonValue::Object(map)) => map,
            _ => unreachable!("data was just set to an object"),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ServiceResponse>;
}

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis/bitable/v1";

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    retry: RetryOptions,
    slow_request_threshold: Duration,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("larkbase-connector/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry: settings.retry.clone(),
            slow_request_threshold: settings.slow_request_threshold(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ServiceResponse> {
        let url = self.url(&request.path);
        // Creating a record twice is worse than failing once.
        let retry = if request.method.is_idempotent() {
            &self.retry
        } else {
            &retryable::NO_RETRY
        };
        let resp = http::request(&self.client, retry, self.slow_request_threshold, |client| {
            let mut builder = client
                .request(request.method.into(), &url)
                .header("Authorization", format!("Bearer {}", request.bearer_token))
                .header("Content-Type", "application/json");
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
            builder
        })
        .await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: JsonValue) -> ServiceResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ensure_success_rejects_nonzero_code() {
        let err = response(json!({ "code": 1254045, "msg": "field not found" }))
            .ensure_success()
            .unwrap_err();
        assert!(matches!(&err, Error::Remote { code: 1254045, msg } if msg == "field not found"));
        assert!(err.to_string().contains("field not found"));

        let ok = response(json!({ "code": 0, "msg": "success", "data": {} }));
        assert!(ok.ensure_success().is_ok());
    }

    #[test]
    fn test_response_preserves_unknown_keys() {
        let value = json!({
            "code": 0,
            "msg": "success",
            "data": { "record": { "record_id": "rec1" } },
            "request_id": "abc",
        });
        let parsed = response(value.clone());
        assert_eq!(parsed.extra.get("request_id"), Some(&json!("abc")));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), value);
    }

    #[test]
    fn test_page_signals() {
        let more = response(json!({
            "code": 0,
            "data": { "items": [1, 2], "has_more": true, "page_token": "p1" },
        }));
        assert_eq!(more.items(), &[json!(1), json!(2)]);
        assert_eq!(more.next_cursor(), Some("p1"));

        let missing_cursor = response(json!({ "code": 0, "data": { "has_more": true } }));
        assert_eq!(missing_cursor.next_cursor(), None);

        let empty_cursor = response(json!({
            "code": 0,
            "data": { "has_more": true, "page_token": "" },
        }));
        assert_eq!(empty_cursor.next_cursor(), None);

        let done = response(json!({
            "code": 0,
            "data": { "items": null, "has_more": false, "page_token": "p9" },
        }));
        assert!(done.items().is_empty());
        assert_eq!(done.next_cursor(), None);
    }

    #[test]
    fn test_set_all_items_clears_cursor() {
        let mut resp = response(json!({
            "code": 0,
            "data": { "items": [1], "has_more": true, "page_token": "p1", "total": 3 },
        }));
        let mut items = resp.take_items();
        items.extend([json!(2), json!(3)]);
        resp.set_all_items(items);
        assert_eq!(
            resp.data,
            Some(json!({ "items": [1, 2, 3], "has_more": false, "total": 3 }))
        );
    }

    #[test]
    fn test_with_query_replaces() {
        let req = ApiRequest::new(Method::Get, "apps/a/tables/t/records", "tok")
            .with_query(PAGE_TOKEN, "p1")
            .with_query(PAGE_TOKEN, "p2");
        assert_eq!(req.query, vec![(PAGE_TOKEN.to_string(), "p2".to_string())]);
        assert_eq!(req.query_param(PAGE_TOKEN), Some("p2"));
        assert_eq!(req.query_param(PAGE_SIZE), None);
    }

    #[test]
    fn test_only_post_is_non_idempotent() {
        assert!(!Method::Post.is_idempotent());
        assert!(Method::Get.is_idempotent());
        assert!(Method::Put.is_idempotent());
        assert!(Method::Delete.is_idempotent());
    }
}
