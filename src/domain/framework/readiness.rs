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

//! Bounded readiness pollers. Each polls once per second for at most the
//! given number of ticks, checking before it sleeps so an already-ready
//! target completes on the first tick without waiting. Running out of
//! ticks is a reported outcome, not an error.

use crate::domain::framework::FrameworkService;
use crate::infrastructure::constants::{POLL_INTERVAL_SECS, TRANSFER_ECHO_EVERY};
use crate::infrastructure::http::HttpGateway;
use crate::infrastructure::marathon::MarathonClient;
use crate::shared::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

impl WaitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready)
    }
}

/// Per-target budget when one timeout is divided across `targets`
/// targets. Never less than one tick.
pub fn fair_share(total_secs: u64, targets: u64) -> u64 {
    if targets == 0 {
        return total_secs;
    }
    (total_secs / targets).max(1)
}

async fn tick(attempt: u64, budget: u64) {
    if attempt + 1 < budget {
        sleep(Duration::from_secs(POLL_INTERVAL_SECS)).await;
    }
}

/// Wait until the framework endpoint resolves and answers its
/// healthcheck.
pub async fn wait_for_framework(service: &mut FrameworkService, timeout: u64) -> WaitOutcome {
    for attempt in 0..timeout {
        if service.ping().await {
            return WaitOutcome::Ready;
        }
        debug!(attempt, "framework not ready");
        tick(attempt, timeout).await;
    }
    WaitOutcome::TimedOut
}

/// Wait until one node is alive and has finished starting.
pub async fn wait_for_node(
    service: &mut FrameworkService,
    cluster: &str,
    node: &str,
    timeout: u64,
) -> Result<WaitOutcome> {
    for attempt in 0..timeout {
        if let Some(info) = service.node_info(cluster, node).await? {
            if info.is_ready() {
                return Ok(WaitOutcome::Ready);
            }
            debug!(node, status = %info.status, alive = info.alive, "node not ready");
        }
        tick(attempt, timeout).await;
    }
    Ok(WaitOutcome::TimedOut)
}

/// Wait until the cluster has at least `required` valid ring members.
/// The total timeout is first divided fairly across the per-node
/// readiness waits, then restored in full for the quorum phase.
pub async fn wait_for_cluster(
    service: &mut FrameworkService,
    cluster: &str,
    required: u64,
    timeout: u64,
) -> Result<WaitOutcome> {
    let nodes = service.node_names(cluster).await?;

    if !nodes.is_empty() {
        let per_node = fair_share(timeout, nodes.len() as u64);
        for node in &nodes {
            let outcome = wait_for_node(service, cluster, node, per_node).await?;
            if !outcome.is_ready() {
                println!("Node {} did not respond in {} seconds.", node, per_node);
            }
        }
    }

    if (nodes.len() as u64) < required {
        return Ok(WaitOutcome::TimedOut);
    }

    let probe = &nodes[0];
    for attempt in 0..timeout {
        if let Some(valid) = service.valid_node_count(cluster, probe).await? {
            if valid >= required {
                return Ok(WaitOutcome::Ready);
            }
            debug!(cluster, valid, required, "quorum not reached");
        }
        tick(attempt, timeout).await;
    }
    Ok(WaitOutcome::TimedOut)
}

/// Wait until a node has no waiting or active handoff transfers. The raw
/// transfer payload is echoed periodically so long-running handoffs show
/// progress.
pub async fn wait_for_transfers(
    service: &mut FrameworkService,
    cluster: &str,
    node: &str,
    timeout: u64,
) -> Result<WaitOutcome> {
    for attempt in 0..timeout {
        if let Some((waiting, active, raw)) = service.transfer_counts(cluster, node).await? {
            if waiting == 0 && active == 0 {
                return Ok(WaitOutcome::Ready);
            }
            if (attempt + 1) % TRANSFER_ECHO_EVERY == 0 {
                println!("{}", raw);
            }
        }
        tick(attempt, timeout).await;
    }
    Ok(WaitOutcome::TimedOut)
}

/// Wait until a cluster's director proxy has a task answering HTTP on its
/// first port.
pub async fn wait_for_director(
    marathon: &MarathonClient,
    gateway: &HttpGateway,
    app_id: &str,
    timeout: u64,
) -> WaitOutcome {
    for attempt in 0..timeout {
        if director_ready(marathon, gateway, app_id).await {
            return WaitOutcome::Ready;
        }
        tick(attempt, timeout).await;
    }
    WaitOutcome::TimedOut
}

async fn director_ready(marathon: &MarathonClient, gateway: &HttpGateway, app_id: &str) -> bool {
    let Ok(tasks) = marathon.get_tasks(Some(app_id)).await else {
        return false;
    };
    let Some(task) = tasks.first() else {
        return false;
    };
    let Some(port) = task.ports.first() else {
        return false;
    };
    let url = format!("http://{}:{}", task.host, port);
    match gateway.get(&url, false).await {
        Ok(r) => r.is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fair_share_never_drops_below_one_tick() {
        assert_eq!(fair_share(60, 3), 20);
        assert_eq!(fair_share(60, 100), 1);
        assert_eq!(fair_share(0, 5), 1);
        assert_eq!(fair_share(60, 0), 60);
        assert_eq!(fair_share(7, 2), 3);
    }

    #[test]
    fn outcomes_map_to_readiness() {
        assert!(WaitOutcome::Ready.is_ready());
        assert!(!WaitOutcome::TimedOut.is_ready());
    }
}
