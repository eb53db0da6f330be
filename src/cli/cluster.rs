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

//! Cluster lifecycle and configuration commands.

use super::commands::ClusterCommands;
use super::display::{NodeEndpointRow, TableRenderer};
use super::{echo_payload, validate_name, Context};
use crate::domain::framework::readiness;
use crate::shared::Result;
use serde_json::json;
use std::path::Path;

pub async fn run(ctx: &mut Context, cmd: ClusterCommands) -> Result<()> {
    match cmd {
        ClusterCommands::List => {
            let response = ctx.service.api_get("clusters").await?;
            render_names(ctx, "Clusters", "clusters", &response.body);
            Ok(())
        }

        ClusterCommands::Info { cluster } => {
            validate_name("cluster", &cluster)?;
            let response = ctx.service.api_get(&format!("clusters/{}", cluster)).await?;
            echo_payload(ctx.json, &response.body);
            Ok(())
        }

        ClusterCommands::Create { cluster } => {
            validate_name("cluster", &cluster)?;
            let response = ctx
                .service
                .api_put(&format!("clusters/{}", cluster), String::new())
                .await?;
            echo_payload(ctx.json, &response.body);
            Ok(())
        }

        ClusterCommands::Destroy { cluster } => {
            validate_name("cluster", &cluster)?;
            let response = ctx
                .service
                .api_delete(&format!("clusters/{}", cluster))
                .await?;
            echo_payload(ctx.json, &response.body);
            Ok(())
        }

        ClusterCommands::Restart { cluster } => {
            validate_name("cluster", &cluster)?;
            let response = ctx
                .service
                .api_post(&format!("clusters/{}/restart", cluster), String::new())
                .await?;
            echo_payload(ctx.json, &response.body);
            Ok(())
        }

        ClusterCommands::Config { cluster, file } => {
            validate_name("cluster", &cluster)?;
            let path = format!("clusters/{}/config", cluster);
            get_or_upload(ctx, &path, file.as_deref()).await
        }

        ClusterCommands::ConfigAdvanced { cluster, file } => {
            validate_name("cluster", &cluster)?;
            let path = format!("clusters/{}/advancedConfig", cluster);
            get_or_upload(ctx, &path, file.as_deref()).await
        }

        ClusterCommands::WaitForService {
            cluster,
            timeout,
            nodes,
        } => {
            validate_name("cluster", &cluster)?;
            if !readiness::wait_for_framework(&mut ctx.service, timeout)
                .await
                .is_ready()
            {
                println!(
                    "RingDB framework did not respond within {} seconds.",
                    timeout
                );
                return Ok(());
            }
            let outcome =
                readiness::wait_for_cluster(&mut ctx.service, &cluster, nodes, timeout).await?;
            if outcome.is_ready() {
                println!("Cluster {} is ready.", cluster);
            } else {
                println!(
                    "Cluster {} did not respond with {} valid nodes in {} seconds.",
                    cluster, nodes, timeout
                );
            }
            Ok(())
        }

        ClusterCommands::Endpoints { cluster } => {
            validate_name("cluster", &cluster)?;
            let names = ctx.service.node_names(&cluster).await?;
            let mut rows = Vec::new();
            for name in names {
                if let Some(info) = ctx.service.node_info(&cluster, &name).await? {
                    rows.push(NodeEndpointRow { node: name, info });
                }
            }

            if ctx.json {
                let mut body = serde_json::Map::new();
                for row in &rows {
                    body.insert(
                        row.node.clone(),
                        json!({
                            "http_direct": row.info.http_direct,
                            "http_mesos_dns": row.info.http_service_dns,
                            "pb_direct": row.info.pb_direct,
                            "pb_mesos_dns": row.info.pb_service_dns,
                            "status": row.info.status,
                            "alive": row.info.alive,
                        }),
                    );
                }
                println!("{}", serde_json::Value::Object(body));
            } else {
                println!("{}", TableRenderer::new().render_endpoints(&rows));
            }
            Ok(())
        }
    }
}

/// GET the resource, or PUT the file's contents when one is named.
async fn get_or_upload(ctx: &mut Context, path: &str, file: Option<&Path>) -> Result<()> {
    let response = match file {
        None => ctx.service.api_get(path).await?,
        Some(file) => {
            let body = std::fs::read_to_string(file)?;
            ctx.service.api_put(path, body).await?
        }
    };
    echo_payload(ctx.json, &response.body);
    Ok(())
}

/// Cluster and node listings arrive either as an object keyed by name or
/// as a name array; render whichever parses, fall back to the raw body.
pub(super) fn render_names(ctx: &Context, heading: &str, key: &str, body: &str) {
    if ctx.json {
        println!("{}", body);
        return;
    }
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        println!("{}", body);
        return;
    };
    let names: Vec<String> = match &parsed[key] {
        serde_json::Value::Object(map) => map.keys().cloned().collect(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => {
            println!("{}", body);
            return;
        }
    };
    println!("{}", TableRenderer::new().render_name_list(heading, &names));
}
