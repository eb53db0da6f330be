// Copyright 2025 RingDB Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::infrastructure::constants::REQUEST_TIMEOUT_SECS;
use crate::shared::{CliError, Result};
use reqwest::Method;
use std::time::Duration;
use tracing::debug;

/// Uniform response value returned for every request, including ones that
/// never reached the server. Discovery and polling code branches on
/// `status` alone instead of catching transport errors.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    /// HTTP status, or 0 when the request failed at the transport level
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Thin request executor shared by every component that talks to the
/// orchestrator, the resource-manager master, or the framework itself.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(insecure: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|e| CliError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Execute one request. With `exit_on_failure` a transport-level
    /// failure (refused connection, DNS, timeout) propagates as
    /// `CliError::Transport`; without it the failure is normalized into a
    /// status-0 `GatewayResponse` so callers can keep polling.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        exit_on_failure: bool,
    ) -> Result<GatewayResponse> {
        debug!(%method, url, body = body.as_deref().unwrap_or(""), "HTTP request");

        let mut builder = self.client.request(method.clone(), url);
        if let Some(data) = body {
            builder = builder.body(data);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(%method, url, error = %e, "HTTP transport failure");
                if exit_on_failure {
                    return Err(CliError::Transport(format!("{} {}: {}", method, url, e)));
                }
                return Ok(GatewayResponse {
                    status: 0,
                    body: e.to_string(),
                });
            }
        };

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        debug!(%method, url, status, body = %text, "HTTP response");

        let body = if status == 404 && text.is_empty() {
            format!("Resource not found: {}", url)
        } else {
            text
        };

        Ok(GatewayResponse { status, body })
    }

    pub async fn get(&self, url: &str, exit_on_failure: bool) -> Result<GatewayResponse> {
        self.request(Method::GET, url, None, exit_on_failure).await
    }

    pub async fn post(
        &self,
        url: &str,
        body: impl Into<String>,
        exit_on_failure: bool,
    ) -> Result<GatewayResponse> {
        self.request(Method::POST, url, Some(body.into()), exit_on_failure)
            .await
    }

    pub async fn put(
        &self,
        url: &str,
        body: impl Into<String>,
        exit_on_failure: bool,
    ) -> Result<GatewayResponse> {
        self.request(Method::PUT, url, Some(body.into()), exit_on_failure)
            .await
    }

    pub async fn delete(&self, url: &str, exit_on_failure: bool) -> Result<GatewayResponse> {
        self.request(Method::DELETE, url, None, exit_on_failure)
            .await
    }
}
