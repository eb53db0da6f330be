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

use crate::domain::config::ConfigStore;
use crate::infrastructure::constants::{API_PREFIX, HEALTHCHECK_PATH};
use crate::infrastructure::coordination::{registration_path, ServiceRegistry};
use crate::infrastructure::http::HttpGateway;
use crate::infrastructure::marathon::MarathonClient;
use crate::shared::{CliError, Result};
use tracing::debug;

/// How the framework endpoint was found. Reported alongside the URL so
/// operators can see which discovery path is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `framework.url` set explicitly in configuration
    ConfiguredUrl,
    /// Routed through the platform admin router
    PlatformRouter,
    /// Host and port of the scheduler task, from the orchestrator
    OrchestratorTask,
    /// Endpoint registered in the coordination service
    CoordinationRegistry,
}

impl Strategy {
    pub fn describe(&self) -> &'static str {
        match self {
            Strategy::ConfiguredUrl => "configured URL",
            Strategy::PlatformRouter => "platform router",
            Strategy::OrchestratorTask => "orchestrator task",
            Strategy::CoordinationRegistry => "coordination registry",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedEndpoint {
    /// Base URL, always slash-terminated
    pub base_url: String,
    pub strategy: Strategy,
}

impl ResolvedEndpoint {
    /// Data-plane root: base URL plus the API prefix.
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url, API_PREFIX)
    }
}

/// Resolves the framework's HTTP endpoint by trying each discovery
/// strategy in a fixed order. URLs named in configuration are verified
/// against the healthcheck before they win; endpoints read back from the
/// orchestrator or the registry are accepted as reported. The first
/// endpoint found is remembered for the rest of the invocation. Failed
/// resolution is never memoized.
pub struct EndpointResolver {
    gateway: HttpGateway,
    registry: Box<dyn ServiceRegistry>,
    resolved: Option<ResolvedEndpoint>,
}

impl EndpointResolver {
    pub fn new(gateway: HttpGateway, registry: Box<dyn ServiceRegistry>) -> Self {
        Self {
            gateway,
            registry,
            resolved: None,
        }
    }

    pub async fn resolve(&mut self, config: &ConfigStore) -> Result<ResolvedEndpoint> {
        if let Some(endpoint) = &self.resolved {
            return Ok(endpoint.clone());
        }

        let mut attempted = Vec::new();

        for strategy in [
            Strategy::ConfiguredUrl,
            Strategy::PlatformRouter,
            Strategy::OrchestratorTask,
            Strategy::CoordinationRegistry,
        ] {
            attempted.push(strategy.describe());
            let Some(candidate) = self.candidate(strategy, config).await else {
                debug!(strategy = strategy.describe(), "no endpoint candidate");
                continue;
            };
            let base_url = slash_terminated(&candidate);
            let needs_probe = matches!(
                strategy,
                Strategy::ConfiguredUrl | Strategy::PlatformRouter
            );
            if needs_probe && !self.healthy(&base_url).await {
                debug!(strategy = strategy.describe(), url = %base_url, "healthcheck failed");
                continue;
            }
            debug!(strategy = strategy.describe(), url = %base_url, "endpoint resolved");
            let endpoint = ResolvedEndpoint { base_url, strategy };
            self.resolved = Some(endpoint.clone());
            return Ok(endpoint);
        }

        Err(CliError::endpoint_unavailable(&attempted))
    }

    /// Convenience: resolved data-plane root.
    pub async fn api_url(&mut self, config: &ConfigStore) -> Result<String> {
        Ok(self.resolve(config).await?.api_url())
    }

    async fn candidate(&self, strategy: Strategy, config: &ConfigStore) -> Option<String> {
        match strategy {
            Strategy::ConfiguredUrl => {
                let url = config.framework_url();
                if url.is_empty() {
                    None
                } else {
                    Some(url)
                }
            }
            Strategy::PlatformRouter => {
                let base = config.platform_url();
                if base.is_empty() {
                    return None;
                }
                Some(format!(
                    "{}service/{}",
                    slash_terminated(&base),
                    config.framework_name()
                ))
            }
            Strategy::OrchestratorTask => {
                let client = MarathonClient::new(self.gateway.clone(), config.marathon_url());
                let tasks = client
                    .get_tasks(Some(&config.framework_name()))
                    .await
                    .ok()?;
                let task = tasks.first()?;
                let port = task.ports.first()?;
                Some(format!("http://{}:{}", task.host, port))
            }
            Strategy::CoordinationRegistry => {
                let path = registration_path(&config.framework_name());
                let value = self.registry.get(&path).await?;
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    async fn healthy(&self, base_url: &str) -> bool {
        let url = format!("{}{}", base_url, HEALTHCHECK_PATH);
        match self.gateway.get(&url, false).await {
            Ok(response) => response.is_ok(),
            Err(_) => false,
        }
    }
}

fn slash_terminated(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
