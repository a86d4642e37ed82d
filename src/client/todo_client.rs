use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::error::{ClientError, ClientResult};
use crate::domain::{
    page::Page,
    todo::{Todo, TodoId, TodoInput},
};
use crate::http::types::MessageBody;

/// The data-access surface the views depend on.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn create(&self, input: TodoInput) -> ClientResult<Todo>;
    async fn list(&self, page: u32, limit: u32) -> ClientResult<Page<Todo>>;
    async fn get(&self, id: TodoId) -> ClientResult<Todo>;
    async fn update(&self, id: TodoId, input: TodoInput) -> ClientResult<Todo>;
    async fn delete(&self, id: TodoId) -> ClientResult<()>;
}

/// One HTTP request per operation; no retries, no timeouts.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: Client,
    base_url: String,
}

impl TodoClient {
    /// `base_url` is the collection URL, e.g. `http://localhost:5001/api/todos`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn item_url(&self, id: TodoId) -> String { format!("{}/{id}", self.base_url) }

    async fn send(&self, request: RequestBuilder) -> ClientResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<MessageBody>(&body).map(|b| b.message).unwrap_or(body);
            tracing::warn!(status = status.as_u16(), %message, "todo request failed");
            return Err(ClientError::RequestFailed { status: status.as_u16(), message });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TodoApi for TodoClient {
    async fn create(&self, input: TodoInput) -> ClientResult<Todo> {
        self.send_json(self.http.post(&self.base_url).json(&input)).await
    }

    async fn list(&self, page: u32, limit: u32) -> ClientResult<Page<Todo>> {
        self.send_json(self.http.get(&self.base_url).query(&[("page", page), ("limit", limit)])).await
    }

    async fn get(&self, id: TodoId) -> ClientResult<Todo> {
        self.send_json(self.http.get(self.item_url(id))).await
    }

    async fn update(&self, id: TodoId, input: TodoInput) -> ClientResult<Todo> {
        self.send_json(self.http.put(self.item_url(id)).json(&input)).await
    }

    async fn delete(&self, id: TodoId) -> ClientResult<()> {
        self.send(self.http.delete(self.item_url(id))).await.map(|_| ())
    }
}
