// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the queue service API.

use std::time::Duration;

use qt_core::{DeviceIdentity, QueueSnapshot};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::error::{RequestError, RequestResult};
use super::models::{
    AdvanceRequest, Establishment, EstablishmentList, RegisterRequest, ServiceStatus,
};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default bound on each request, connect included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the pull client.
#[derive(Debug, Clone)]
pub struct PullConfig {
    /// API base URL, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for PullConfig {
    fn default() -> Self {
        PullConfig {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Queue service HTTP client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PullClient {
    http: Client,
    base_url: String,
}

impl PullClient {
    /// Builds a client for `config.base_url`.
    ///
    /// Fails with [`RequestError::InvalidUrl`] unless the base URL is http(s).
    pub fn new(config: &PullConfig) -> RequestResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&base_url).map_err(|e| RequestError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RequestError::InvalidUrl(format!(
                "{base_url}: expected http:// or https://"
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(concat!("qtdev/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RequestError::Unreachable(e.to_string()))?;

        Ok(PullClient { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> RequestResult<Url> {
        let url = format!("{}/{}", self.base_url, path);
        Url::parse(&url).map_err(|e| RequestError::InvalidUrl(format!("{url}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> RequestResult<T> {
        let response = self.http.get(url).send().await?;
        let body = check_status(response)?.text().await?;
        serde_json::from_str(&body).map_err(|e| RequestError::Decode(e.to_string()))
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> RequestResult<()> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;
        check_status(response)?;
        Ok(())
    }

    /// `GET status`
    #[instrument(skip(self))]
    pub async fn status(&self) -> RequestResult<ServiceStatus> {
        let url = self.endpoint("status")?;
        self.get_json(url).await
    }

    /// `GET establishments`, in server order.
    #[instrument(skip(self))]
    pub async fn establishments(&self) -> RequestResult<Vec<Establishment>> {
        let url = self.endpoint("establishments")?;
        let list: EstablishmentList = self.get_json(url).await?;
        debug!(count = list.establishments.len(), "fetched establishments");
        Ok(list.establishments)
    }

    /// `GET queue?establishment_id=...`
    ///
    /// The returned snapshot always carries `establishment_id`, even when the
    /// server omits it.
    #[instrument(skip(self))]
    pub async fn queue(&self, establishment_id: &str) -> RequestResult<QueueSnapshot> {
        let mut url = self.endpoint("queue")?;
        url.query_pairs_mut()
            .append_pair("establishment_id", establishment_id);
        let mut snapshot: QueueSnapshot = self.get_json(url).await?;
        if snapshot.establishment_id.is_empty() {
            snapshot.establishment_id = establishment_id.to_string();
        }
        debug!(
            current_serving = snapshot.current_serving,
            total_waiting = snapshot.total_waiting,
            "fetched queue snapshot"
        );
        Ok(snapshot)
    }

    /// `POST device/register`
    #[instrument(skip(self, identity), fields(device_id = identity.device_id()))]
    pub async fn register_device(
        &self,
        identity: &DeviceIdentity,
        device_type: &str,
    ) -> RequestResult<()> {
        let body = RegisterRequest {
            device_id: identity.device_id(),
            device_type,
            device_name: identity.device_name(),
        };
        self.post_json("device/register", &body).await
    }

    /// `POST queue/advance`
    ///
    /// Success only means the server accepted the request.
    #[instrument(skip(self))]
    pub async fn advance_queue(
        &self,
        establishment_id: &str,
        new_serving_number: u64,
    ) -> RequestResult<()> {
        let body = AdvanceRequest {
            establishment_id,
            new_serving_number,
        };
        self.post_json("queue/advance", &body).await
    }
}

fn check_status(response: Response) -> RequestResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(status = status.as_u16(), url = %response.url(), "queue service rejected request");
        Err(RequestError::BadStatus(status.as_u16()))
    }
}
