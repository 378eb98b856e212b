//! HTTP client for the kubeforge API server

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fail with the server's status and body on any non-2xx response
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed: {} - {}", status, error_text);
        }
        Ok(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let data = Self::check(response).await?.json().await?;
        Ok(data)
    }

    /// GET with query parameters
    pub async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        let data = Self::check(response).await?.json().await?;
        Ok(data)
    }

    /// GET returning the raw body, for YAML endpoints
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok(Self::check(response).await?.text().await?)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let data = Self::check(response).await?.json().await?;
        Ok(data)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        let data = Self::check(response).await?.json().await?;
        Ok(data)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
