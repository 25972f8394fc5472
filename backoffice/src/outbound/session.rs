//! Reqwest-backed session adapter for the gateway's auth API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header};
use serde::Deserialize;

use crate::domain::auth::SessionUser;
use crate::domain::entity::EntityId;
use crate::domain::ports::{SessionError, SessionGateway};
use crate::domain::user::{Email, UserRole};

#[derive(Debug, Deserialize)]
struct SessionUserDto {
    id: EntityId,
    email: Email,
    role: UserRole,
}

impl From<SessionUserDto> for SessionUser {
    fn from(dto: SessionUserDto) -> Self {
        Self {
            id: dto.id,
            email: dto.email,
            role: dto.role,
        }
    }
}

/// Fetches the current user from `{base}/auth/v1/user`.
pub struct RestSessionGateway {
    client: Client,
    base: Url,
    api_key: String,
}

impl RestSessionGateway {
    /// Build a session gateway with an explicit request timeout.
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
}

#[async_trait]
impl SessionGateway for RestSessionGateway {
    async fn current_user(&self) -> Result<SessionUser, SessionError> {
        let url = self.base.join("auth/v1/user").map_err(|error| {
            SessionError::transport(format!("cannot build auth endpoint: {error}"))
        })?;
        let response = self
            .client
            .get(url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| SessionError::transport(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SessionError::unauthorized(format!(
                "status {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(SessionError::transport(format!(
                "status {}",
                status.as_u16()
            )));
        }
        let dto: SessionUserDto = response
            .json()
            .await
            .map_err(|error| SessionError::transport(format!("invalid user payload: {error}")))?;
        Ok(dto.into())
    }
}
