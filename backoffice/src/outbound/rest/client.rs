//! Reqwest-backed table gateway adapter.
//!
//! This adapter owns transport details only: endpoint construction,
//! auth headers, HTTP error mapping, and JSON decoding into domain
//! aggregates through the table binding.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url, header};
use serde::Serialize;

use super::TableBinding;
use crate::domain::entity::{AdminRecord, EntityId};
use crate::domain::ports::{EntityGateway, GatewayError};

/// Mutations ask for the merged row back instead of a bare 204.
const PREFER_REPRESENTATION: &str = "return=representation";

/// Table gateway speaking the PostgREST dialect for one entity.
pub struct RestGateway<T: TableBinding> {
    client: Client,
    base: Url,
    api_key: String,
    _binding: PhantomData<T>,
}

impl<T: TableBinding> RestGateway<T> {
    /// Build a gateway with an explicit request timeout.
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
            _binding: PhantomData,
        })
    }

    fn table_url(&self) -> Result<Url, GatewayError> {
        self.base
            .join(&format!("rest/v1/{}", T::TABLE))
            .map_err(|error| {
                GatewayError::invalid_request(format!("cannot build table endpoint: {error}"))
            })
    }

    fn row_url(&self, id: &EntityId) -> Result<Url, GatewayError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id.as_ref()));
        Ok(url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
            .header(header::ACCEPT, "application/json")
    }

    async fn read_success_body(response: Response) -> Result<Vec<u8>, GatewayError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(map_transport_error)?
            .to_vec();
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(body)
    }

    fn decode_rows(body: &[u8]) -> Result<Vec<T::Entity>, GatewayError> {
        let rows: Vec<T::Row> = serde_json::from_slice(body)
            .map_err(|error| GatewayError::decode(format!("invalid row payload: {error}")))?;
        Ok(rows.into_iter().map(T::into_domain).collect())
    }

    /// Decode a single-row mutation response.
    ///
    /// PostgREST answers mutations with an array of affected rows; an
    /// empty array means the filter matched nothing.
    fn decode_single_row(body: &[u8]) -> Result<T::Entity, GatewayError> {
        Self::decode_rows(body)?.into_iter().next().ok_or_else(|| {
            GatewayError::not_found(format!("no {} row matched the filter", T::TABLE))
        })
    }

    async fn send_mutation<B: Serialize + Sync>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .authed(request)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::read_success_body(response).await
    }
}

#[async_trait]
impl<T: TableBinding> EntityGateway<T::Entity> for RestGateway<T> {
    async fn list(&self) -> Result<Vec<T::Entity>, GatewayError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("select", T::SELECT);
        let response = self
            .authed(self.client.get(url))
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = Self::read_success_body(response).await?;
        Self::decode_rows(&body)
    }

    async fn insert(
        &self,
        draft: &<T::Entity as AdminRecord>::Draft,
    ) -> Result<T::Entity, GatewayError> {
        let url = self.table_url()?;
        let body = self.send_mutation(self.client.post(url), draft).await?;
        Self::decode_single_row(&body)
    }

    async fn patch(
        &self,
        id: &EntityId,
        patch: &<T::Entity as AdminRecord>::Patch,
    ) -> Result<T::Entity, GatewayError> {
        let url = self.row_url(id)?;
        let body = self.send_mutation(self.client.patch(url), patch).await?;
        Self::decode_single_row(&body)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), GatewayError> {
        let url = self.row_url(id)?;
        let response = self
            .authed(self.client.delete(url))
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = Self::read_success_body(response).await?;
        // An empty representation means the row was already gone.
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&body)
            .map_err(|error| GatewayError::decode(format!("invalid delete payload: {error}")))?;
        if rows.is_empty() {
            return Err(GatewayError::not_found(format!(
                "no {} row matched the filter",
                T::TABLE
            )));
        }
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::permission_denied(message)
        }
        StatusCode::NOT_FOUND => GatewayError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(message)
        }
        StatusCode::CONFLICT => GatewayError::constraint(message),
        _ if status.is_client_error() => GatewayError::invalid_request(message),
        _ => GatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
