//! HTTP implementation of the point-of-sale collaborators.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::PrintError;

use super::{PosApi, PrintMethod};

/// `reqwest`-backed [`PosApi`] pointed at the POS server's base URL.
pub struct HttpPosApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPosApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PrintError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(api_error)?
            .error_for_status()
            .map_err(api_error)?;
        response.json().await.map_err(api_error)
    }
}

fn api_error(error: reqwest::Error) -> PrintError {
    PrintError::Api(error.to_string())
}

#[derive(Debug, Deserialize)]
struct PrintSettings {
    print_method: PrintMethod,
}

#[derive(Debug, Deserialize)]
struct BillPayloadResponse {
    success: bool,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DispatchResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl PosApi for HttpPosApi {
    async fn print_method(&self) -> Result<PrintMethod, PrintError> {
        let settings: PrintSettings = self.get_json("/settings/print").await?;
        debug!(method = %settings.print_method, "fetched print method");
        Ok(settings.print_method)
    }

    async fn bill_payload(&self, order_id: u64) -> Result<String, PrintError> {
        let response: BillPayloadResponse = self
            .get_json(&format!("/orders/{order_id}/bill/raw"))
            .await?;
        if !response.success {
            return Err(PrintError::Server(response.message.unwrap_or_else(|| {
                format!("the server could not render the bill for order {order_id}")
            })));
        }
        response.data.ok_or_else(|| {
            PrintError::Server(format!(
                "the server returned no bill data for order {order_id}"
            ))
        })
    }

    async fn dispatch_print(&self, order_id: u64) -> Result<(), PrintError> {
        let response = self
            .client
            .post(self.url(&format!("/orders/{order_id}/bill/print")))
            .send()
            .await
            .map_err(api_error)?;
        let status = response.status();
        let body = response.text().await.map_err(api_error)?;

        // The dispatch endpoint's rejection message is surfaced verbatim;
        // non-JSON bodies fall back to the HTTP status.
        match serde_json::from_str::<DispatchResponse>(&body) {
            Ok(parsed) if parsed.success && status.is_success() => Ok(()),
            Ok(parsed) => Err(PrintError::Server(parsed.message.unwrap_or_else(|| {
                format!("the print service rejected order {order_id}")
            }))),
            Err(_) if status.is_success() => Ok(()),
            Err(_) => Err(PrintError::Server(format!(
                "the print service returned {status}"
            ))),
        }
    }
}
