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

//! End-to-end tests driving the compiled binary against a mocked
//! framework API.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;

/// Config file pointing discovery at the mock server, with dead addresses
/// for everything else so no test ever leaves localhost.
fn config_file(server: &MockServer) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let overrides = json!({
        "framework": {
            "url": server.base_url(),
            "zk": "127.0.0.1:1",
            "master": "http://127.0.0.1:1"
        },
        "marathon": { "url": server.base_url() }
    });
    file.write_all(overrides.to_string().as_bytes()).unwrap();
    file
}

fn ringctl(config: &tempfile::NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("ringctl").unwrap();
    cmd.arg("--config").arg(config.path());
    cmd.env_remove("RINGCTL_CONFIG");
    cmd.env_remove("RINGCTL_PLATFORM_URL");
    cmd
}

fn mock_healthcheck(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/healthcheck");
        then.status(200).body("OK");
    });
}

#[test]
fn cluster_create_prints_the_new_cluster() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    let create = server.mock(|when, then| {
        when.method(PUT).path("/api/v1/clusters/default");
        then.status(200).json_body(json!({ "Name": "default" }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["cluster", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));
    create.assert();
}

#[test]
fn recreating_a_cluster_reports_already_exists_with_exit_zero() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    server.mock(|when, then| {
        when.method(PUT).path("/api/v1/clusters/default");
        then.status(409).body("Cluster default already exists");
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["cluster", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn node_add_issues_one_post_per_requested_node() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    let add = server.mock(|when, then| {
        when.method(POST).path("/api/v1/clusters/default/nodes");
        then.status(200).json_body(json!({ "success": true }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["node", "add", "--nodes", "2"])
        .assert()
        .success();
    add.assert_hits(2);
}

#[test]
fn wait_timeout_is_reported_with_exit_zero() {
    let server = MockServer::start();
    // No healthcheck mock: discovery keeps failing until the budget runs out
    let config = config_file(&server);
    ringctl(&config)
        .args(["framework", "wait-for-service", "--timeout", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("did not respond within 1 seconds"));
}

#[test]
fn framework_wait_reports_ready() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/clusters");
        then.status(200).json_body(json!({ "clusters": {} }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["framework", "wait-for-service", "--timeout", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RingDB framework is ready."));
}

#[test]
fn clean_metadata_refuses_without_force() {
    let server = MockServer::start();
    let config = config_file(&server);
    ringctl(&config)
        .args(["framework", "clean-metadata"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Framework metadata not removed"));
}

#[test]
fn names_looking_like_flags_are_rejected() {
    let server = MockServer::start();
    let config = config_file(&server);
    ringctl(&config)
        .args(["cluster", "create", "--cluster=-rf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not start with '-'"));
}

#[test]
fn node_operations_relay_the_api_payload() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/clusters/default/nodes/default-1/ringready");
        then.status(200)
            .json_body(json!({ "ringready": true }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["node", "ringready", "--node", "default-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ringready"));
}

#[test]
fn bucket_type_create_posts_the_props_body() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/clusters/default/nodes/default-1/types/maps")
            .body(r#"{"props":{"datatype":"map"}}"#);
        then.status(200).json_body(json!({ "maps": { "success": true } }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args([
            "node",
            "bucket-type-create",
            "--node",
            "default-1",
            "--bucket-type",
            "maps",
            "--props",
            r#"{"props":{"datatype":"map"}}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("success"));
    create.assert();
}

#[test]
fn log_list_addresses_the_registered_node_name() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/clusters/default/nodes/default-1");
        then.status(200).json_body(json!({ "default-1": {
            "location": {
                "hostname": "10.0.0.5",
                "http_port": 8098,
                "pb_port": 8087,
                "node_name": "ringdb-default-1@10.0.0.5"
            },
            "status": "started"
        }}));
    });
    let logs = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/explore/clusters/default/nodes/ringdb-default-1@10.0.0.5/log/files");
        then.status(200)
            .json_body(json!({ "files": ["console.log", "error.log"] }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["node", "log-list", "--node", "default-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("console.log"));
    logs.assert();
}

#[test]
fn node_stats_relays_the_payload() {
    let server = MockServer::start();
    mock_healthcheck(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/ringdb/nodes/default-1/stats");
        then.status(200)
            .json_body(json!({ "ring_num_partitions": 64 }));
    });

    let config = config_file(&server);
    ringctl(&config)
        .args(["node", "stats", "--node", "default-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ring_num_partitions"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let mut cmd = Command::cargo_bin("ringctl").unwrap();
    cmd.args(["--config", "/nonexistent/ringctl.json", "cluster", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn framework_config_renders_the_app_definition() {
    let server = MockServer::start();
    let config = config_file(&server);
    ringctl(&config)
        .args(["--json", "framework", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RINGDB_FRAMEWORK_NAME"));
}
