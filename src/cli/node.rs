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

//! Node-level commands: membership, diagnostics and readiness.

use super::commands::NodeCommands;
use super::{cluster::render_names, echo_payload, validate_name, Context};
use crate::domain::framework::readiness;
use crate::shared::Result;
use serde_json::json;

pub async fn run(ctx: &mut Context, cmd: NodeCommands) -> Result<()> {
    match cmd {
        NodeCommands::List { cluster } => {
            validate_name("cluster", &cluster)?;
            let response = ctx
                .service
                .api_get(&format!("clusters/{}/nodes", cluster))
                .await?;
            render_names(ctx, "Nodes", "nodes", &response.body);
            Ok(())
        }

        NodeCommands::Add { cluster, nodes } => {
            validate_name("cluster", &cluster)?;
            for _ in 0..nodes {
                let response = ctx
                    .service
                    .api_post(&format!("clusters/{}/nodes", cluster), String::new())
                    .await?;
                echo_payload(ctx.json, &response.body);
            }
            Ok(())
        }

        NodeCommands::Remove {
            cluster,
            node,
            force,
        } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            let mut path = format!("clusters/{}/nodes/{}", cluster, node);
            if force {
                path.push_str("?force=true");
            }
            let response = ctx.service.api_delete(&path).await?;
            echo_payload(ctx.json, &response.body);
            Ok(())
        }

        NodeCommands::Info { cluster, node } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            match ctx.service.node_info(&cluster, &node).await? {
                Some(info) => {
                    let payload = json!({
                        "http_direct": info.http_direct,
                        "http_mesos_dns": info.http_service_dns,
                        "pb_direct": info.pb_direct,
                        "pb_mesos_dns": info.pb_service_dns,
                        "status": info.status,
                        "alive": info.alive,
                    });
                    echo_payload(ctx.json, &payload.to_string());
                }
                None => println!("Node {} not found in cluster {}.", node, cluster),
            }
            Ok(())
        }

        NodeCommands::Status { cluster, node } => {
            relay_get(ctx, &cluster, &node, "status").await
        }

        NodeCommands::Ringready { cluster, node } => {
            relay_get(ctx, &cluster, &node, "ringready").await
        }

        NodeCommands::AaeStatus { cluster, node } => relay_get(ctx, &cluster, &node, "aae").await,

        NodeCommands::Types { cluster, node } => relay_get(ctx, &cluster, &node, "types").await,

        NodeCommands::BucketTypeCreate {
            cluster,
            node,
            bucket_type,
            props,
        } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            validate_name("bucket type", &bucket_type)?;
            let response = ctx
                .service
                .api_post(
                    &format!("clusters/{}/nodes/{}/types/{}", cluster, node, bucket_type),
                    props,
                )
                .await?;
            echo_payload(ctx.json, &response.body);
            Ok(())
        }

        NodeCommands::LogList { cluster, node } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            let Some(node_name) = ctx.service.registered_node_name(&cluster, &node).await? else {
                println!("Node {} not found in cluster {}.", node, cluster);
                return Ok(());
            };
            let response = ctx
                .service
                .api_get(&format!(
                    "explore/clusters/{}/nodes/{}/log/files",
                    cluster, node_name
                ))
                .await?;
            if response.is_ok() {
                echo_payload(ctx.json, &response.body);
            } else {
                println!("Failed to list log files: status {}.", response.status);
            }
            Ok(())
        }

        NodeCommands::Log {
            cluster,
            node,
            file,
            lines,
        } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            validate_name("log file", &file)?;
            let Some(node_name) = ctx.service.registered_node_name(&cluster, &node).await? else {
                println!("Node {} not found in cluster {}.", node, cluster);
                return Ok(());
            };
            let response = ctx
                .service
                .api_get(&format!(
                    "explore/clusters/{}/nodes/{}/log/files/{}?rows={}",
                    cluster, node_name, file, lines
                ))
                .await?;
            if response.is_ok() {
                echo_payload(ctx.json, &response.body);
            } else {
                println!("Failed to read log file {}: status {}.", file, response.status);
            }
            Ok(())
        }

        NodeCommands::Stats { cluster, node } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            let response = ctx
                .service
                .api_get(&format!("ringdb/nodes/{}/stats", node))
                .await?;
            if response.is_ok() {
                echo_payload(ctx.json, &response.body);
            } else {
                println!("Failed to get stats: status {}.", response.status);
            }
            Ok(())
        }

        NodeCommands::Transfers { cluster, node } => {
            relay_get(ctx, &cluster, &node, "transfers").await
        }

        NodeCommands::WaitForService {
            cluster,
            node,
            timeout,
        } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            let outcome =
                readiness::wait_for_node(&mut ctx.service, &cluster, &node, timeout).await?;
            if outcome.is_ready() {
                println!("Node {} is ready.", node);
            } else {
                println!("Node {} did not respond in {} seconds.", node, timeout);
            }
            Ok(())
        }

        NodeCommands::WaitForTransfers {
            cluster,
            node,
            timeout,
        } => {
            validate_name("cluster", &cluster)?;
            validate_name("node", &node)?;
            let outcome =
                readiness::wait_for_transfers(&mut ctx.service, &cluster, &node, timeout).await?;
            if outcome.is_ready() {
                println!("Node {} transfers complete.", node);
            } else {
                println!(
                    "Node {} transfers did not complete in {} seconds.",
                    node, timeout
                );
            }
            Ok(())
        }
    }
}

/// Relay a per-node diagnostic endpoint's payload unchanged.
async fn relay_get(ctx: &mut Context, cluster: &str, node: &str, leaf: &str) -> Result<()> {
    validate_name("cluster", cluster)?;
    validate_name("node", node)?;
    let response = ctx
        .service
        .api_get(&format!("clusters/{}/nodes/{}/{}", cluster, node, leaf))
        .await?;
    echo_payload(ctx.json, &response.body);
    Ok(())
}
