//! HTTP transport for the persistence service

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::{ApiResponse, MenuItem, RateTable, Table, Transaction};

use super::ClubGateway;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP client for making network requests to the persistence service
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new HTTP gateway from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request expecting enveloped data
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let envelope = Self::handle_response::<T>(response).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing data for {}", path)))
    }

    /// Make a PUT request with JSON body, ignoring the response payload
    async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Make a POST request without body, ignoring the response payload
    async fn post_empty(&self, path: &str) -> ClientResult<()> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Handle the HTTP response and unwrap the envelope
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            // Error responses still carry the envelope when they came from
            // the application rather than the transport
            if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
                return Err(Self::envelope_error(envelope.code, envelope.message));
            }
            return match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(text))
                }
                _ => Err(ClientError::Internal(text)),
            };
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.is_success() {
            return Err(Self::envelope_error(envelope.code, envelope.message));
        }
        Ok(envelope)
    }

    fn envelope_error(code: String, message: String) -> ClientError {
        match code.as_str() {
            "E0003" => ClientError::NotFound(message),
            "E0002" => ClientError::Validation(message),
            _ => ClientError::Api { code, message },
        }
    }
}

#[async_trait]
impl ClubGateway for HttpGateway {
    async fn init(&self) -> ClientResult<()> {
        self.post_empty("/api/init").await
    }

    async fn fetch_tables(&self) -> ClientResult<Vec<Table>> {
        self.get_data("/api/tables").await
    }

    async fn save_tables(&self, tables: &[Table]) -> ClientResult<()> {
        self.put_unit("/api/tables", tables).await
    }

    async fn fetch_rates(&self) -> ClientResult<RateTable> {
        self.get_data("/api/rates").await
    }

    async fn save_rates(&self, rates: &RateTable) -> ClientResult<()> {
        self.put_unit("/api/rates", rates).await
    }

    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.get_data("/api/menu").await
    }

    async fn save_menu(&self, menu: &[MenuItem]) -> ClientResult<()> {
        self.put_unit("/api/menu", menu).await
    }

    async fn fetch_transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.get_data("/api/transactions").await
    }

    async fn add_transaction(&self, transaction: &Transaction) -> ClientResult<Transaction> {
        let response = self
            .client
            .post(self.url("/api/transactions"))
            .json(transaction)
            .send()
            .await?;
        let envelope = Self::handle_response::<Transaction>(response).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing transaction echo".to_string()))
    }

    async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        // Receipt ids start with '#', which a URL would read as a fragment
        let encoded = id.replace('#', "%23");
        let response = self
            .client
            .delete(self.url(&format!("/api/transactions/{}", encoded)))
            .send()
            .await?;
        Self::handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn reset(&self) -> ClientResult<()> {
        self.post_empty("/api/reset").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://localhost:4000/");
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.url("/api/tables"), "http://localhost:4000/api/tables");
    }

    #[test]
    fn test_envelope_error_mapping() {
        assert!(matches!(
            HttpGateway::envelope_error("E0003".into(), "gone".into()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            HttpGateway::envelope_error("E0002".into(), "bad".into()),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            HttpGateway::envelope_error("E9002".into(), "db".into()),
            ClientError::Api { .. }
        ));
    }
}
