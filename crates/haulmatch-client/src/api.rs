//! HTTP plumbing for the marketplace backend

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use haulmatch_domain::model::{Load, LoadStatus, Vehicle};

use crate::dto::{LoadDto, MatchRequestDto, VehicleDto};
use crate::session::Session;

const DEFAULT_BASE_URL: &str = "https://api.haulmatch.example/v1/";
const USER_AGENT: &str = "haulmatch/0.1.0";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error: {0}")]
    Api(String),

    #[error("session expired or unauthorized")]
    Unauthorized,
}

/// Response envelope used by every endpoint
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApprovalBody {
    approved: bool,
}

/// Marketplace backend client
///
/// Cheap to clone; the session is shared so a 401 seen by any caller
/// invalidates the token for all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<Mutex<Session>>,
}

impl ApiClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            session: Arc::new(Mutex::new(Session::new())),
        })
    }

    /// Install an auth token into the shared session
    pub async fn install_token(&self, token: String) {
        self.session.lock().await.install(token);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.lock().await.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_data<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.authorize(request).await.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.lock().await.invalidate();
            return Err(ApiError::Unauthorized);
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if envelope.status != "ok" {
            return Err(ApiError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| format!("backend returned status '{}'", envelope.status)),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Api("response envelope missing data".to_string()))
    }

    /// Send a command request where the envelope carries no payload
    async fn post_ok(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = self.authorize(request).await.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.lock().await.invalidate();
            return Err(ApiError::Unauthorized);
        }

        let envelope: ApiEnvelope<serde_json::Value> = response.json().await?;
        if envelope.status != "ok" {
            return Err(ApiError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| format!("backend returned status '{}'", envelope.status)),
            ));
        }
        Ok(())
    }

    /// Fetch loads, optionally restricted to one lifecycle status
    pub async fn get_loads(&self, status: Option<LoadStatus>) -> Result<Vec<Load>, ApiError> {
        let mut url = self.url("loads")?;
        if let Some(status) = status {
            url.query_pairs_mut()
                .append_pair("status", status.label());
        }
        debug!(%url, "fetching loads");

        let dtos: Vec<LoadDto> = self.fetch_data(self.http.get(url)).await?;
        Ok(dtos.into_iter().map(Load::from).collect())
    }

    /// Fetch vehicles
    ///
    /// Vehicle-owner screens request the pre-filtered eligible set; admin
    /// screens fetch everything and filter client-side through the matcher.
    pub async fn get_vehicles(&self, eligible_only: bool) -> Result<Vec<Vehicle>, ApiError> {
        let mut url = self.url("vehicles")?;
        if eligible_only {
            url.query_pairs_mut()
                .append_pair("status", "available")
                .append_pair("approved", "true");
        }
        debug!(%url, "fetching vehicles");

        let dtos: Vec<VehicleDto> = self.fetch_data(self.http.get(url)).await?;
        Ok(dtos.into_iter().map(Vehicle::from).collect())
    }

    /// Submit a match request for a load-vehicle pair
    pub async fn request_match(&self, load_id: &str, vehicle_id: &str) -> Result<(), ApiError> {
        let url = self.url("admin/match-loads")?;
        debug!(%url, load_id, vehicle_id, "posting match request");

        let body = MatchRequestDto {
            load_id: load_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
        };
        self.post_ok(self.http.post(url).json(&body)).await
    }

    /// Flip a vehicle's admin approval flag
    pub async fn set_vehicle_approval(
        &self,
        vehicle_id: &str,
        approved: bool,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("admin/vehicles/{}/approval", vehicle_id))?;
        debug!(%url, approved, "updating vehicle approval");

        self.post_ok(self.http.post(url).json(&ApprovalBody { approved }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_base_url() {
        assert!(ApiClient::with_base_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_session_shared_across_clones() {
        let client = ApiClient::new().unwrap();
        let clone = client.clone();
        client.install_token("tok".to_string()).await;
        assert!(clone.is_authenticated().await);

        clone.session.lock().await.invalidate();
        assert!(!client.is_authenticated().await);
    }

    #[test]
    fn test_envelope_error_message_parsing() {
        let raw = r#"{"status": "error", "data": null, "message": "load not found"}"#;
        let envelope: ApiEnvelope<Vec<LoadDto>> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.status, "error");
        assert_eq!(envelope.message.as_deref(), Some("load not found"));
        assert!(envelope.data.is_none());
    }
}
