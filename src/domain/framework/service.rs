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
use crate::domain::endpoint::EndpointResolver;
use crate::infrastructure::constants::NODE_STATE_STARTED;
use crate::infrastructure::http::{GatewayResponse, HttpGateway};
use crate::shared::Result;
use reqwest::Method;
use serde_json::Value;

/// Liveness and lifecycle of one database node, combined from the
/// framework's control-plane view and a direct probe of the node's HTTP
/// port.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub http_direct: String,
    pub http_service_dns: String,
    pub pb_direct: String,
    pub pb_service_dns: String,
    pub status: String,
    pub alive: bool,
}

impl NodeInfo {
    pub fn is_ready(&self) -> bool {
        self.alive && self.status == NODE_STATE_STARTED
    }
}

/// Data-plane client for the framework scheduler's HTTP API. Every call
/// resolves the endpoint first (memoized across the invocation) and then
/// issues the request with transport failures normalized, so polling
/// callers see a status-0 response instead of an error.
pub struct FrameworkService {
    gateway: HttpGateway,
    resolver: EndpointResolver,
    config: ConfigStore,
}

impl FrameworkService {
    pub fn new(gateway: HttpGateway, resolver: EndpointResolver, config: ConfigStore) -> Self {
        Self {
            gateway,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// One request against the data-plane API, path relative to the API
    /// prefix.
    pub async fn api_request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<GatewayResponse> {
        let base = self.resolver.api_url(&self.config).await?;
        let url = format!("{}{}", base, path);
        self.gateway.request(method, &url, body, false).await
    }

    pub async fn api_get(&mut self, path: &str) -> Result<GatewayResponse> {
        self.api_request(Method::GET, path, None).await
    }

    pub async fn api_put(&mut self, path: &str, body: String) -> Result<GatewayResponse> {
        self.api_request(Method::PUT, path, Some(body)).await
    }

    pub async fn api_post(&mut self, path: &str, body: String) -> Result<GatewayResponse> {
        self.api_request(Method::POST, path, Some(body)).await
    }

    pub async fn api_delete(&mut self, path: &str) -> Result<GatewayResponse> {
        self.api_request(Method::DELETE, path, None).await
    }

    /// Whether the framework currently resolves and answers its API. A
    /// discovery failure counts as not ready, same as a non-200 answer.
    pub async fn ping(&mut self) -> bool {
        match self.api_get("clusters").await {
            Ok(response) => response.is_ok(),
            Err(_) => false,
        }
    }

    pub async fn resolved_base_url(&mut self) -> Result<String> {
        Ok(self.resolver.resolve(&self.config).await?.base_url)
    }

    /// Node names of a cluster, in the order the framework reports them.
    pub async fn node_names(&mut self, cluster: &str) -> Result<Vec<String>> {
        let response = self
            .api_get(&format!("clusters/{}/nodes", cluster))
            .await?;
        let Some(parsed) = response.json() else {
            return Ok(Vec::new());
        };
        let names = match parsed["nodes"].as_array() {
            Some(nodes) => nodes
                .iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect(),
            None => Vec::new(),
        };
        Ok(names)
    }

    /// Control-plane record plus a direct liveness probe. The probe is
    /// skipped (node reported dead) when the framework has no location
    /// for the node yet.
    pub async fn node_info(&mut self, cluster: &str, node: &str) -> Result<Option<NodeInfo>> {
        let response = self
            .api_get(&format!("clusters/{}/nodes/{}", cluster, node))
            .await?;
        let Some(parsed) = response.json() else {
            return Ok(None);
        };
        let record = &parsed[node];
        if record.is_null() {
            return Ok(None);
        }

        let hostname = record["location"]["hostname"].as_str().unwrap_or("");
        let http_port = port_string(&record["location"]["http_port"]);
        let pb_port = port_string(&record["location"]["pb_port"]);
        let status = record["status"].as_str().unwrap_or("").to_string();

        let framework = self.config.framework_name();
        let service_dns = format!("{}-{}.{}.mesos", framework, cluster, framework);

        let alive = if !hostname.is_empty() && !http_port.is_empty() {
            let url = format!("http://{}:{}", hostname, http_port);
            match self.gateway.get(&url, false).await {
                Ok(r) => r.is_ok(),
                Err(_) => false,
            }
        } else {
            false
        };

        Ok(Some(NodeInfo {
            http_direct: format!("{}:{}", hostname, http_port),
            http_service_dns: format!("{}:{}", service_dns, http_port),
            pb_direct: format!("{}:{}", hostname, pb_port),
            pb_service_dns: format!("{}:{}", service_dns, pb_port),
            status,
            alive,
        }))
    }

    /// Registered node name (the database's own naming, `node@host`),
    /// needed by the log exploration API which addresses nodes that way.
    pub async fn registered_node_name(
        &mut self,
        cluster: &str,
        node: &str,
    ) -> Result<Option<String>> {
        let response = self
            .api_get(&format!("clusters/{}/nodes/{}", cluster, node))
            .await?;
        let Some(parsed) = response.json() else {
            return Ok(None);
        };
        Ok(parsed[node]["location"]["node_name"]
            .as_str()
            .map(str::to_string))
    }

    /// Count of ring members the named node currently sees as valid.
    pub async fn valid_node_count(&mut self, cluster: &str, node: &str) -> Result<Option<u64>> {
        let response = self
            .api_get(&format!("clusters/{}/nodes/{}/status", cluster, node))
            .await?;
        let Some(parsed) = response.json() else {
            return Ok(None);
        };
        Ok(parsed["status"]["valid"].as_u64())
    }

    /// Handoff state of one node: counts of waiting and active transfers,
    /// with the raw payload for progress echoing.
    pub async fn transfer_counts(
        &mut self,
        cluster: &str,
        node: &str,
    ) -> Result<Option<(u64, u64, String)>> {
        let response = self
            .api_get(&format!("clusters/{}/nodes/{}/transfers", cluster, node))
            .await?;
        let Some(parsed) = response.json() else {
            return Ok(None);
        };
        let waiting = parsed["transfers"]["waiting_to_handoff"]
            .as_array()
            .map(|a| a.len() as u64);
        let active = parsed["transfers"]["active"].as_array().map(|a| a.len() as u64);
        match (waiting, active) {
            (Some(w), Some(a)) => Ok(Some((w, a, response.body))),
            _ => Ok(None),
        }
    }
}

/// Ports arrive as numbers normally but as the string "undefined" while a
/// node is still staging.
fn port_string(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) if s != "undefined" => s.clone(),
        _ => String::new(),
    }
}
