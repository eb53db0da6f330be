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

use crate::infrastructure::http::HttpGateway;
use crate::shared::{CliError, Result};
use serde::Deserialize;

/// A framework registered with the resource-manager master.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredFramework {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Deserialize)]
struct MasterState {
    #[serde(default)]
    frameworks: Vec<RegisteredFramework>,
}

/// Client for the resource-manager master: framework enumeration and
/// teardown. The master address in configuration may be a coordination
/// URI, in which case the conventional HTTP endpoint is used instead.
pub struct MesosClient {
    gateway: HttpGateway,
    base_url: String,
}

impl MesosClient {
    pub fn new(gateway: HttpGateway, master: &str) -> Self {
        Self {
            gateway,
            base_url: master_http_base(master),
        }
    }

    pub async fn frameworks(&self) -> Result<Vec<RegisteredFramework>> {
        let url = format!("{}/master/state.json", self.base_url);
        let response = self.gateway.get(&url, true).await?;
        if !response.is_success() {
            return Err(CliError::Orchestrator(format!(
                "cannot read master state: status {}: {}",
                response.status, response.body
            )));
        }
        let state: MasterState = serde_json::from_str(&response.body)?;
        Ok(state.frameworks)
    }

    /// Framework id registered under `name`, if any.
    pub async fn framework_id(&self, name: &str) -> Result<Option<String>> {
        let frameworks = self.frameworks().await?;
        for framework in frameworks {
            if framework.name == name {
                return Ok(Some(framework.id));
            }
        }
        Ok(None)
    }

    /// Unregister the framework and release its resources. The master
    /// expects a form-encoded framework id.
    pub async fn teardown(&self, framework_id: &str) -> Result<()> {
        let url = format!("{}/master/teardown", self.base_url);
        let body = format!("frameworkId={}", framework_id);
        let response = self.gateway.post(&url, body, true).await?;
        if !response.is_success() {
            return Err(CliError::Orchestrator(format!(
                "teardown of {} failed: status {}: {}",
                framework_id, response.status, response.body
            )));
        }
        Ok(())
    }
}

/// Map the configured master address to an HTTP base URL. Coordination
/// URIs (zk://...) carry no usable HTTP address, so the conventional
/// leader alias is substituted.
fn master_http_base(master: &str) -> String {
    if master.starts_with("http://") || master.starts_with("https://") {
        master.trim_end_matches('/').to_string()
    } else if master.starts_with("zk://") {
        "http://leader.mesos:5050".to_string()
    } else {
        format!("http://{}", master.trim_end_matches('/'))
    }
}
