//! Device portal client.
//!
//! This module provides the `DeviceClient` struct which performs the
//! Basic-authenticated token request and the IPD settings POST. It holds
//! no session state; callers decide where the token lives.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, Url};
use tracing::{debug, info, warn};

use crate::auth::{Credentials, SessionToken};
use crate::ipd::ScaledIpd;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Settings endpoint that accepts the scaled IPD as a query parameter
pub const IPD_SETTINGS_PATH: &str = "/api/holographic/os/settings/ipd";

/// Custom header the portal checks on state-changing requests
const CSRF_HEADER: &str = "x-csrf-token";

/// Scheme used when the configured URL is a bare host (the portal is HTTPS by default)
const DEFAULT_SCHEME: &str = "https://";

/// Transport options for the portal connection.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    /// Device portals ship self-signed certificates
    pub accept_invalid_certs: bool,
}

/// Client for a single headset's device portal.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct DeviceClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl DeviceClient {
    /// Create a client for the portal at `base_url`.
    /// A URL without a scheme is treated as `https://<base_url>`.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let base_url = Self::parse_base_url(base_url)?;

        let mut builder = Client::builder().danger_accept_invalid_certs(options.accept_invalid_certs);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            credentials,
        })
    }

    fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
        let raw = raw.trim();
        let qualified = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("{}{}", DEFAULT_SCHEME, raw)
        };

        let url = Url::parse(&qualified)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ApiError::InvalidUrl(format!("{}: missing host", raw)));
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the IPD update request for `ipd`
    pub fn ipd_url(&self, ipd: ScaledIpd) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(IPD_SETTINGS_PATH)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("ipd", &ipd.value().to_string());
        Ok(url)
    }

    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut value = HeaderValue::from_str(&self.credentials.authorization())
            .map_err(|e| ApiError::InvalidHeader(format!("authorization: {}", e)))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Pick the token out of the response cookies. The CSRF cookie wins when
    /// the portal sends several; otherwise the first header is taken verbatim.
    fn extract_token(response: &Response) -> Result<SessionToken, ApiError> {
        let cookies: Vec<&str> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        cookies
            .iter()
            .find(|c| SessionToken::is_csrf_cookie(c))
            .or_else(|| cookies.first())
            .map(|c| SessionToken::new(*c))
            .ok_or(ApiError::MissingToken)
    }

    /// Authenticate against the portal root and return the session token.
    /// The token is not stored anywhere by this call.
    pub async fn authenticate(&self) -> Result<SessionToken, ApiError> {
        debug!(url = %self.base_url, "Requesting session token");

        let response = self
            .client
            .get(self.base_url.clone())
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Authentication request failed");
                ApiError::from(e)
            })?;

        let response = Self::check_response(response).await?;
        let token = Self::extract_token(&response)?;

        info!("Session token received");
        Ok(token)
    }

    /// Post a new IPD value with the given token.
    /// No in-flight guard here; see `IpdUpdater` for that.
    pub async fn post_ipd(&self, token: &SessionToken, ipd: ScaledIpd) -> Result<(), ApiError> {
        let url = self.ipd_url(ipd)?;

        let mut csrf = HeaderValue::from_str(token.header_value())
            .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", CSRF_HEADER, e)))?;
        csrf.set_sensitive(true);

        let mut headers = self.auth_headers()?;
        headers.insert(HeaderName::from_static(CSRF_HEADER), csrf);

        debug!(url = %url, ipd = ipd.value(), "Posting IPD update");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, ipd = ipd.value(), "IPD update request failed");
                ApiError::from(e)
            })?;

        Self::check_response(response).await?;

        info!(ipd = ipd.value(), "IPD update accepted");
        Ok(())
    }
}
