use crate::client::{BackendResponse, ElasticClient};
use crate::error::BoxError;
use async_trait::async_trait;
use reqwest::{Client, Response};

/// Elasticsearch / OpenSearch client speaking the REST API over HTTP.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    /// Base URL of the cluster, e.g. "http://localhost:9200".
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a pre-built `reqwest::Client`, e.g. one carrying default auth
    /// headers, TLS roots or timeouts.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        HttpClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn index_url(&self, index: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(index))
    }
}

async fn into_backend_response(resp: Response) -> BackendResponse {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
    BackendResponse { status, body }
}

#[async_trait]
impl ElasticClient for HttpClient {
    async fn index_exists(&self, index: &str) -> Result<u16, BoxError> {
        let resp = self.client.head(self.index_url(index)).send().await?;
        Ok(resp.status().as_u16())
    }

    async fn create_index(&self, index: &str) -> Result<BackendResponse, BoxError> {
        let resp = self.client.put(self.index_url(index)).send().await?;
        Ok(into_backend_response(resp).await)
    }

    async fn index_document(&self, index: &str, body: Vec<u8>) -> Result<BackendResponse, BoxError> {
        let url = format!("{}/_doc", self.index_url(index));
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        Ok(into_backend_response(resp).await)
    }
}
