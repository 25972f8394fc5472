//! Reqwest-backed callable-function adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header};
use serde_json::Value;

use crate::domain::ports::{FunctionError, FunctionInvoker};

/// Invokes gateway functions over HTTP at `{base}/functions/v1/{name}`.
pub struct HttpFunctionInvoker {
    client: Client,
    base: Url,
    api_key: String,
}

impl HttpFunctionInvoker {
    /// Build an invoker with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key,
        })
    }

    fn function_url(&self, name: &str) -> Result<Url, FunctionError> {
        self.base
            .join(&format!("functions/v1/{name}"))
            .map_err(|error| {
                FunctionError::transport(format!("cannot build function endpoint: {error}"))
            })
    }
}

#[async_trait]
impl FunctionInvoker for HttpFunctionInvoker {
    async fn invoke(&self, name: &str, payload: &Value) -> Result<Value, FunctionError> {
        let url = self.function_url(name)?;
        let response = self
            .client
            .post(url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
            .header(header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            FunctionError::rejected(status.as_u16(), format!("invalid JSON result: {error}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> FunctionError {
    if error.is_timeout() {
        FunctionError::timeout(error.to_string())
    } else {
        FunctionError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FunctionError {
    let preview: String = String::from_utf8_lossy(body).chars().take(160).collect();
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            FunctionError::timeout(format!("status {}: {preview}", status.as_u16()))
        }
        _ if status.is_client_error() => FunctionError::rejected(status.as_u16(), preview),
        _ => FunctionError::transport(format!("status {}: {preview}", status.as_u16())),
    }
}
