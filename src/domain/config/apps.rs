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

//! Marathon application definitions for the scheduler and the director,
//! rendered from configuration.

use crate::infrastructure::constants::{
    DIRECTOR_SUFFIX, ENV_FRAMEWORK_NAME, ENV_MASTER, ENV_ROLE, ENV_USER, ENV_ZK, HEALTHCHECK_PATH,
};
use serde_json::{json, Value};

use super::ConfigStore;

fn number(store: &ConfigStore, path: &[&str], default: f64) -> f64 {
    store
        .get_any(path)
        .and_then(Value::as_f64)
        .unwrap_or(default)
}

/// Application definition for the framework scheduler. The scheduler's
/// environment carries enough to re-derive the operator configuration
/// from a running instance.
pub fn framework_app(store: &ConfigStore) -> Value {
    let name = store.framework_name();
    let mut cmd = format!(
        "./framework/bin/ringdb-framework -master={} -zk={} -name={} -user={} -role={}",
        store.mesos_master(),
        store.zk_hosts(),
        name,
        store.get("user"),
        store.get("role"),
    );
    let flags = store.get("flags");
    if !flags.is_empty() {
        cmd.push(' ');
        cmd.push_str(&flags);
    }

    json!({
        "id": format!("/{}", name),
        "cmd": cmd,
        "cpus": number(store, &["framework", "cpus"], 0.5),
        "mem": number(store, &["framework", "mem"], 2048.0),
        "instances": number(store, &["framework", "instances"], 1.0) as u64,
        "uris": [store.get("package-url")],
        "env": {
            "USE_SUPER_CHROOT": store.get("super-chroot"),
            ENV_FRAMEWORK_NAME: name,
            ENV_ZK: store.zk_hosts(),
            ENV_MASTER: store.mesos_master(),
            ENV_USER: store.get("user"),
            ENV_ROLE: store.get("role"),
        },
        "healthChecks": [{
            "path": format!("/{}", HEALTHCHECK_PATH),
            "protocol": "HTTP",
            "portIndex": 0,
            "gracePeriodSeconds": number(store, &["framework", "healthcheck-grace-period-seconds"], 300.0) as u64,
            "intervalSeconds": number(store, &["framework", "healthcheck-interval-seconds"], 60.0) as u64,
            "timeoutSeconds": number(store, &["framework", "healthcheck-timeout-seconds"], 20.0) as u64,
            "maxConsecutiveFailures": number(store, &["framework", "healthcheck-max-consecutive-failures"], 5.0) as u64,
            "ignoreHttp1xx": false
        }]
    })
}

/// Application definition for a cluster's director proxy, one instance
/// per cluster, addressed as `<framework>-director-<cluster>`.
pub fn director_app(store: &ConfigStore, cluster: &str) -> Value {
    let framework = store.framework_name();
    let app_id = director_app_id(&framework, cluster);

    json!({
        "id": app_id,
        "cmd": store.get_str(&["director", "cmd"]),
        "cpus": number(store, &["director", "cpus"], 0.5),
        "mem": number(store, &["director", "mem"], 1024.0),
        "instances": 1,
        "uris": [store.get_str(&["director", "url"])],
        "env": {
            "FRAMEWORK_HOST": store.get("hostname"),
            "FRAMEWORK_NAME": framework,
            "DIRECTOR_ZK": store.zk_hosts(),
            "DIRECTOR_FRAMEWORK": store.framework_name(),
            "DIRECTOR_CLUSTER": cluster
        },
        "ports": [0, 0],
        "acceptedResourceRoles": director_roles(store)
    })
}

pub fn director_app_id(framework: &str, cluster: &str) -> String {
    format!("/{}{}-{}", framework, DIRECTOR_SUFFIX, cluster)
}

fn director_roles(store: &ConfigStore) -> Value {
    let use_public = store
        .get_any(&["director", "use-public"])
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if use_public {
        json!(["slave_public"])
    } else {
        json!(["*"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_app_carries_its_configuration_in_env() {
        let store = ConfigStore::default();
        let app = framework_app(&store);

        assert_eq!(app["id"], "/ringdb");
        assert_eq!(app["env"]["RINGDB_FRAMEWORK_NAME"], "ringdb");
        assert_eq!(app["env"]["RINGDB_ZK"], "leader.mesos:2181");
        assert_eq!(app["healthChecks"][0]["path"], "/healthcheck");
        let cmd = app["cmd"].as_str().unwrap();
        assert!(cmd.contains("-name=ringdb"));
    }

    #[test]
    fn director_app_is_named_for_its_cluster() {
        let store = ConfigStore::default();
        let app = director_app(&store, "c1");
        assert_eq!(app["id"], "/ringdb-director-c1");
        assert_eq!(app["env"]["DIRECTOR_CLUSTER"], "c1");
        assert_eq!(app["acceptedResourceRoles"], json!(["*"]));
    }
}
