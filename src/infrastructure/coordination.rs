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

use crate::infrastructure::constants::REGISTRY_NAMESPACE;
use async_trait::async_trait;
use tracing::debug;

/// Read/delete access to the coordination service where schedulers
/// register their HTTP endpoint. Both operations absorb every failure
/// into `None`: discovery treats an unreachable registry the same as a
/// missing registration and falls through to the next strategy.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Value of the node at `path`, or `None` when the node does not
    /// exist or the registry is unreachable.
    async fn get(&self, path: &str) -> Option<String>;

    /// Delete the subtree rooted at `path`. Returns a human-readable
    /// confirmation on success, `None` otherwise.
    async fn delete(&self, path: &str) -> Option<String>;
}

/// Registration path for a framework's HTTP endpoint.
pub fn registration_path(framework_name: &str) -> String {
    format!("{}/frameworks/{}/uri", REGISTRY_NAMESPACE, framework_name)
}

/// Metadata root for a framework, removed by `framework clean-metadata`.
pub fn metadata_root(framework_name: &str) -> String {
    format!("{}/frameworks/{}", REGISTRY_NAMESPACE, framework_name)
}

/// ZooKeeper-backed registry. Sessions are short-lived: each operation
/// connects, acts, and drops the client, matching the CLI's one-shot
/// invocation pattern.
pub struct ZooKeeperRegistry {
    hosts: String,
}

impl ZooKeeperRegistry {
    pub fn new(hosts: impl Into<String>) -> Self {
        Self {
            hosts: hosts.into(),
        }
    }

    async fn connect(&self) -> Option<zookeeper_client::Client> {
        match zookeeper_client::Client::connect(&self.hosts).await {
            Ok(client) => Some(client),
            Err(e) => {
                debug!(hosts = %self.hosts, error = %e, "registry connect failed");
                None
            }
        }
    }
}

#[async_trait]
impl ServiceRegistry for ZooKeeperRegistry {
    async fn get(&self, path: &str) -> Option<String> {
        let client = self.connect().await?;
        match client.get_data(path).await {
            Ok((bytes, _stat)) => String::from_utf8(bytes).ok(),
            Err(e) => {
                debug!(path, error = %e, "registry read failed");
                None
            }
        }
    }

    async fn delete(&self, path: &str) -> Option<String> {
        let client = self.connect().await?;
        delete_subtree(&client, path).await?;
        Some(format!("Successfully deleted {}", path))
    }
}

/// Depth-first delete. Children are collected and removed before their
/// parent; any failure aborts the whole operation.
async fn delete_subtree(client: &zookeeper_client::Client, root: &str) -> Option<()> {
    // Expand the subtree below `root`, children before parents.
    let mut ordered = vec![root.to_string()];
    let mut cursor = 0;
    while cursor < ordered.len() {
        let path = ordered[cursor].clone();
        cursor += 1;
        let children = match client.list_children(&path).await {
            Ok(children) => children,
            Err(e) => {
                debug!(path, error = %e, "registry list failed");
                return None;
            }
        };
        for child in children {
            ordered.push(format!("{}/{}", path, child));
        }
    }

    for path in ordered.iter().rev() {
        if let Err(e) = client.delete(path, None).await {
            debug!(path, error = %e, "registry delete failed");
            return None;
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_path_follows_the_namespace_layout() {
        assert_eq!(
            registration_path("ringdb"),
            "/ringdb/frameworks/ringdb/uri"
        );
        assert_eq!(metadata_root("prod"), "/ringdb/frameworks/prod");
    }

    #[tokio::test]
    async fn unreachable_registry_reads_as_absent() {
        // Nothing listens on port 1
        let registry = ZooKeeperRegistry::new("127.0.0.1:1");
        assert_eq!(registry.get("/ringdb/frameworks/ringdb/uri").await, None);
        assert_eq!(registry.delete("/ringdb/frameworks/ringdb").await, None);
    }
}
