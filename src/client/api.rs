//! HTTP client for the reservation API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::errors::ErrorBody;
use crate::models::{DeleteResponse, Reservation, ReservationInput};

/// Requests that take longer than this fail with a transport error.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-side error.
#[derive(Debug)]
pub enum ClientError {
    /// Connection, timeout or body decoding failure
    Transport(reqwest::Error),
    /// The server answered with a non-success status
    Status { status: u16, message: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(err) => write!(f, "request failed: {}", err),
            ClientError::Status { status, message } => write!(f, "{}: {}", status, message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err)
    }
}

/// Typed access to the `/reservations` endpoints.
#[derive(Debug, Clone)]
pub struct ReservationApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReservationApi {
    /// Create a client for the API rooted at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self) -> Result<Vec<Reservation>, ClientError> {
        let response = self.client.get(self.url("/reservations")).send().await?;
        decode(response).await
    }

    pub async fn get(&self, id: &str) -> Result<Reservation, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/reservations/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create(&self, input: &ReservationInput) -> Result<Reservation, ClientError> {
        let response = self
            .client
            .post(self.url("/reservations"))
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update(
        &self,
        id: &str,
        input: &ReservationInput,
    ) -> Result<Reservation, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/reservations/{}", id)))
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    /// Cancel a reservation.
    pub async fn delete(&self, id: &str) -> Result<DeleteResponse, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/reservations/{}", id)))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
