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
use serde_json::Value;

/// One task of a Marathon application, as returned by /v2/tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct MarathonTask {
    pub id: String,
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub state: String,
}

/// Client for the orchestrator's application API. Errors coming back from
/// the API are reshaped into operator-readable messages before they reach
/// the command layer.
pub struct MarathonClient {
    gateway: HttpGateway,
    base_url: String,
}

impl MarathonClient {
    pub fn new(gateway: HttpGateway, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { gateway, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn get_app(&self, app_id: &str) -> Result<Value> {
        let app_id = normalize_app_id(app_id);
        let url = self.url(&format!("v2/apps{}", app_id));
        let response = self.gateway.get(&url, true).await?;
        if !response.is_success() {
            return Err(self.shape_error("get application", &app_id, response.status, &response.body));
        }
        let parsed: Value = serde_json::from_str(&response.body)?;
        Ok(parsed["app"].clone())
    }

    pub async fn add_app(&self, app_json: &Value) -> Result<Value> {
        let url = self.url("v2/apps");
        let response = self.gateway.post(&url, app_json.to_string(), true).await?;
        if !response.is_success() {
            let app_id = app_json["id"].as_str().unwrap_or("?");
            return Err(self.shape_error("create application", app_id, response.status, &response.body));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn remove_app(&self, app_id: &str) -> Result<Value> {
        let app_id = normalize_app_id(app_id);
        let url = self.url(&format!("v2/apps{}?force=true", app_id));
        let response = self.gateway.delete(&url, true).await?;
        if !response.is_success() {
            return Err(self.shape_error("remove application", &app_id, response.status, &response.body));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// All running tasks, optionally narrowed to one application. The API
    /// has no per-app filter on this endpoint so the narrowing is done
    /// client-side.
    pub async fn get_tasks(&self, app_id: Option<&str>) -> Result<Vec<MarathonTask>> {
        let url = self.url("v2/tasks");
        let response = self.gateway.get(&url, true).await?;
        if !response.is_success() {
            return Err(self.shape_error("list tasks", "/", response.status, &response.body));
        }

        #[derive(Deserialize)]
        struct TasksEnvelope {
            #[serde(default)]
            tasks: Vec<MarathonTask>,
        }

        let envelope: TasksEnvelope = serde_json::from_str(&response.body)?;
        let tasks = match app_id {
            Some(id) => {
                let wanted = normalize_app_id(id);
                envelope
                    .tasks
                    .into_iter()
                    .filter(|t| normalize_app_id(&t.app_id) == wanted)
                    .collect()
            }
            None => envelope.tasks,
        };
        Ok(tasks)
    }

    /// 400 carries field-level validation detail worth surfacing verbatim;
    /// 409 means a deployment holds the app lock.
    fn shape_error(&self, action: &str, app_id: &str, status: u16, body: &str) -> CliError {
        match status {
            400 => {
                let detail = validation_details(body);
                CliError::Orchestrator(format!(
                    "cannot {} {}: invalid request: {}",
                    action, app_id, detail
                ))
            }
            409 => CliError::Orchestrator(format!(
                "cannot {} {}: it is locked by one or more deployments",
                action, app_id
            )),
            _ => CliError::Orchestrator(format!(
                "cannot {} {}: status {}: {}",
                action, app_id, status, body
            )),
        }
    }
}

/// App ids are stored with exactly one leading slash.
pub fn normalize_app_id(app_id: &str) -> String {
    format!("/{}", app_id.trim_start_matches('/'))
}

fn validation_details(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    let Some(details) = parsed["details"].as_array() else {
        return parsed["message"].as_str().unwrap_or(body).to_string();
    };
    let mut parts = Vec::new();
    for detail in details {
        let path = detail["path"].as_str().unwrap_or("?");
        let errors = match detail["errors"].as_array() {
            Some(errors) => errors
                .iter()
                .filter_map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => String::new(),
        };
        parts.push(format!("{}: {}", path, errors));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> MarathonClient {
        MarathonClient::new(HttpGateway::new(false).unwrap(), server.base_url())
    }

    #[test]
    fn app_ids_get_exactly_one_leading_slash() {
        assert_eq!(normalize_app_id("ringdb"), "/ringdb");
        assert_eq!(normalize_app_id("/ringdb"), "/ringdb");
        assert_eq!(normalize_app_id("//ringdb"), "/ringdb");
    }

    #[tokio::test]
    async fn get_app_unwraps_the_envelope() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/apps/ringdb");
                then.status(200)
                    .json_body(json!({ "app": { "id": "/ringdb", "instances": 1 } }));
            })
            .await;

        let app = client(&server).get_app("ringdb").await.unwrap();
        assert_eq!(app["id"], "/ringdb");
    }

    #[tokio::test]
    async fn validation_errors_surface_field_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v2/apps");
                then.status(400).json_body(json!({
                    "message": "Invalid JSON",
                    "details": [{ "path": "/mem", "errors": ["is less than 32"] }]
                }));
            })
            .await;

        let err = client(&server)
            .add_app(&json!({ "id": "/ringdb", "mem": 1 }))
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("/mem"), "missing field path: {}", text);
        assert!(text.contains("is less than 32"), "missing detail: {}", text);
    }

    #[tokio::test]
    async fn deployment_lock_conflicts_are_named() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v2/apps/ringdb");
                then.status(409)
                    .json_body(json!({ "deployments": [{ "id": "deadbeef" }] }));
            })
            .await;

        let err = client(&server).remove_app("ringdb").await.unwrap_err();
        assert!(err.to_string().contains("locked by one or more deployments"));
    }

    #[tokio::test]
    async fn tasks_are_filtered_client_side() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/tasks");
                then.status(200).json_body(json!({ "tasks": [
                    { "id": "t1", "appId": "/ringdb", "host": "h1", "ports": [31415], "state": "TASK_RUNNING" },
                    { "id": "t2", "appId": "/other", "host": "h2", "ports": [31416], "state": "TASK_RUNNING" }
                ]}));
            })
            .await;

        let tasks = client(&server).get_tasks(Some("ringdb")).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
        assert_eq!(tasks[0].ports, vec![31415]);
    }
}
