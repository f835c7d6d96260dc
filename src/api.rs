//! Thin client for the hotel REST API.
//!
//! Every call goes through [`ApiClient::http`], which sets the JSON content
//! type and turns transport failures, non-2xx statuses and undecodable bodies
//! into a single [`ApiError`] whose `Display` is what the dashboard shows.

use std::time::Duration;

use chrono::Local;
use hotel_core::{Hotel, Id, NewHotel, NewInverter, NewPanel, NewTank, PanelPower};
use reqwest::{Client, Method, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid JSON from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("expected JSON from {path}, got text: {body}")]
    UnexpectedBody { path: String, body: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Successful response body: parsed JSON when the server says so, raw text otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    fn into_json<T: DeserializeOwned>(self, path: &str) -> ApiResult<T> {
        match self {
            Payload::Json(value) => serde_json::from_value(value).map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            }),
            Payload::Text(body) => Err(ApiError::UnexpectedBody {
                path: path.to_string(),
                body,
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request against the API base. `body` is sent as JSON when present.
    pub async fn http<B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<Payload>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {} @ {}", method, path, Local::now().format("%H:%M:%S"));

        let mut req = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::Encode)?;
            req = req.body(bytes);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let message = match res.text().await {
                Ok(text) => text,
                Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
            };
            tracing::debug!(status = status.as_u16(), %message, "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let is_json = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let text = res.text().await?;
        if is_json {
            serde_json::from_str(&text)
                .map(Payload::Json)
                .map_err(|source| ApiError::Decode {
                    path: path.to_string(),
                    source,
                })
        } else {
            Ok(Payload::Text(text))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.http::<()>(Method::GET, path, None)
            .await?
            .into_json(path)
    }

    pub async fn list_hotels(&self) -> ApiResult<Vec<Hotel>> {
        let hotels: Option<Vec<Hotel>> = self.get_json("/hotels").await?;
        Ok(hotels.unwrap_or_default())
    }

    pub async fn get_hotel(&self, id: Id) -> ApiResult<Hotel> {
        self.get_json(&format!("/hotels/{id}")).await
    }

    pub async fn create_hotel(&self, hotel: &NewHotel) -> ApiResult<Payload> {
        self.http(Method::POST, "/hotels", Some(hotel)).await
    }

    pub async fn create_panel(&self, panel: &NewPanel) -> ApiResult<Payload> {
        self.http(Method::POST, "/panels", Some(panel)).await
    }

    pub async fn create_inverter(&self, inverter: &NewInverter) -> ApiResult<Payload> {
        self.http(Method::POST, "/inverters", Some(inverter)).await
    }

    pub async fn create_tank(&self, tank: &NewTank) -> ApiResult<Payload> {
        self.http(Method::POST, "/tanks", Some(tank)).await
    }

    pub async fn set_panel_power(&self, panel_id: Id, power: PanelPower) -> ApiResult<Payload> {
        self.http(Method::PUT, &format!("/panels/{panel_id}/power"), Some(&power))
            .await
    }
}
