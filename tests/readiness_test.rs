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

//! Readiness polling against a mocked framework API.

use async_trait::async_trait;
use httpmock::prelude::*;
use ringctl::domain::framework::readiness;
use ringctl::{ConfigStore, EndpointResolver, FrameworkService, HttpGateway, ServiceRegistry};
use serde_json::json;
use std::io::Write;
use std::time::Instant;

struct NoRegistry;

#[async_trait]
impl ServiceRegistry for NoRegistry {
    async fn get(&self, _path: &str) -> Option<String> {
        None
    }
    async fn delete(&self, _path: &str) -> Option<String> {
        None
    }
}

fn service_for(server: &MockServer) -> FrameworkService {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let overrides = json!({
        "framework": { "url": server.base_url() },
        "marathon": { "url": "http://127.0.0.1:1" }
    });
    file.write_all(overrides.to_string().as_bytes()).unwrap();
    let config = ConfigStore::load(Some(file.path())).unwrap();

    let gateway = HttpGateway::new(false).unwrap();
    let resolver = EndpointResolver::new(gateway.clone(), Box::new(NoRegistry));
    FrameworkService::new(gateway, resolver, config)
}

async fn mock_healthcheck(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/healthcheck");
            then.status(200).body("OK");
        })
        .await;
}

#[tokio::test]
async fn framework_wait_succeeds_once_the_api_answers() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters");
            then.status(200).json_body(json!({ "clusters": {} }));
        })
        .await;

    let mut service = service_for(&server);
    let outcome = readiness::wait_for_framework(&mut service, 5).await;
    assert!(outcome.is_ready());
}

#[tokio::test]
async fn framework_wait_times_out_as_an_outcome_not_an_error() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters");
            then.status(503).body("starting");
        })
        .await;

    let mut service = service_for(&server);
    let outcome = readiness::wait_for_framework(&mut service, 2).await;
    assert!(!outcome.is_ready());
}

#[tokio::test]
async fn node_readiness_requires_liveness_and_started_state() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    // Node root answers the direct liveness probe
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("OK");
        })
        .await;
    // Started and pointing its HTTP port back at the mock server
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/c1/nodes/ready");
            then.status(200).json_body(json!({ "ready": {
                "location": {
                    "hostname": "127.0.0.1",
                    "http_port": server.port(),
                    "pb_port": 8087,
                    "node_name": "ready@127.0.0.1"
                },
                "status": "started"
            }}));
        })
        .await;
    // Alive but still starting: must not count as ready
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/c1/nodes/starting");
            then.status(200).json_body(json!({ "starting": {
                "location": {
                    "hostname": "127.0.0.1",
                    "http_port": server.port(),
                    "pb_port": 8087,
                    "node_name": "starting@127.0.0.1"
                },
                "status": "starting"
            }}));
        })
        .await;

    let mut service = service_for(&server);
    let ready = readiness::wait_for_node(&mut service, "c1", "ready", 3)
        .await
        .unwrap();
    assert!(ready.is_ready());

    let starting = readiness::wait_for_node(&mut service, "c1", "starting", 1)
        .await
        .unwrap();
    assert!(!starting.is_ready());
}

#[tokio::test]
async fn completed_transfers_finish_on_the_first_tick_without_sleeping() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    let transfers = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/clusters/c1/nodes/n1/transfers");
            then.status(200).json_body(json!({ "transfers": {
                "waiting_to_handoff": [],
                "active": []
            }}));
        })
        .await;

    let mut service = service_for(&server);
    let started = Instant::now();
    let outcome = readiness::wait_for_transfers(&mut service, "c1", "n1", 60)
        .await
        .unwrap();
    assert!(outcome.is_ready());
    assert!(started.elapsed().as_millis() < 900, "poller slept on success");
    transfers.assert_hits_async(1).await;
}

#[tokio::test]
async fn pending_transfers_time_out() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/clusters/c1/nodes/n1/transfers");
            then.status(200).json_body(json!({ "transfers": {
                "waiting_to_handoff": ["p1"],
                "active": ["p2"]
            }}));
        })
        .await;

    let mut service = service_for(&server);
    let outcome = readiness::wait_for_transfers(&mut service, "c1", "n1", 2)
        .await
        .unwrap();
    assert!(!outcome.is_ready());
}

#[tokio::test]
async fn quorum_phase_keeps_the_full_timeout_after_node_waits() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("OK");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/c1/nodes");
            then.status(200).json_body(json!({ "nodes": ["n1", "n2"] }));
        })
        .await;
    for node in ["n1", "n2"] {
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/api/v1/clusters/c1/nodes/{}", node));
                then.status(200).json_body(json!({ node: {
                    "location": {
                        "hostname": "127.0.0.1",
                        "http_port": server.port(),
                        "pb_port": 8087,
                        "node_name": format!("{}@127.0.0.1", node)
                    },
                    "status": "started"
                }}));
            })
            .await;
    }
    // One member short of quorum forever
    let status = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/c1/nodes/n1/status");
            then.status(200)
                .json_body(json!({ "status": { "valid": 1, "down": 1 } }));
        })
        .await;

    // Two nodes split a 4 second budget 2/2, both are ready on their
    // first tick. The quorum phase then gets the original 4 seconds, not
    // the per-node share: the status endpoint is polled 4 times.
    let mut service = service_for(&server);
    let outcome = readiness::wait_for_cluster(&mut service, "c1", 2, 4)
        .await
        .unwrap();
    assert!(!outcome.is_ready());
    status.assert_hits_async(4).await;
}

#[tokio::test]
async fn cluster_wait_reaches_quorum_through_the_first_node() {
    let server = MockServer::start_async().await;
    mock_healthcheck(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("OK");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/c1/nodes");
            then.status(200).json_body(json!({ "nodes": ["n1", "n2"] }));
        })
        .await;
    for node in ["n1", "n2"] {
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/api/v1/clusters/c1/nodes/{}", node));
                then.status(200).json_body(json!({ node: {
                    "location": {
                        "hostname": "127.0.0.1",
                        "http_port": server.port(),
                        "pb_port": 8087,
                        "node_name": format!("{}@127.0.0.1", node)
                    },
                    "status": "started"
                }}));
            })
            .await;
    }
    let status = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/c1/nodes/n1/status");
            then.status(200)
                .json_body(json!({ "status": { "valid": 2, "down": 0 } }));
        })
        .await;

    let mut service = service_for(&server);
    let outcome = readiness::wait_for_cluster(&mut service, "c1", 2, 30)
        .await
        .unwrap();
    assert!(outcome.is_ready());
    status.assert_hits_async(1).await;
}
