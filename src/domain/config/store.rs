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

use crate::infrastructure::constants::{
    ENV_FRAMEWORK_NAME, ENV_MASTER, ENV_ROLE, ENV_USER, ENV_ZK, PLATFORM_URL_ENV_VAR,
};
use crate::shared::{CliError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;

/// Layered JSON configuration: a fixed default skeleton, optionally
/// overlaid with a file, optionally overlaid with values recovered from a
/// running scheduler's environment. Immutable once the merge is done.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config: Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            config: default_skeleton(),
        }
    }
}

impl ConfigStore {
    /// Build from the skeleton, merging `override_file` on top when given.
    pub fn load(override_file: Option<&Path>) -> Result<Self> {
        let mut store = Self::default();
        if let Some(path) = override_file {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::config_error(format!("cannot read {}: {}", path.display(), e))
            })?;
            let overrides: Value = serde_json::from_str(&text).map_err(|e| {
                CliError::config_error(format!("invalid JSON in {}: {}", path.display(), e))
            })?;
            merge_two_levels(&mut store.config, &overrides);
        }
        Ok(store)
    }

    /// Reverse-map a running scheduler's environment back into
    /// configuration keys. Used when no config file exists on disk but an
    /// instance is already deployed.
    pub fn merge_from_running_instance(&mut self, env: &HashMap<String, String>) {
        let mappings = [
            (ENV_FRAMEWORK_NAME, "framework-name"),
            (ENV_ZK, "zk"),
            (ENV_MASTER, "master"),
            (ENV_USER, "user"),
            (ENV_ROLE, "role"),
        ];
        let mut overrides = serde_json::Map::new();
        for (var, key) in mappings {
            if let Some(value) = env.get(var) {
                if !value.is_empty() {
                    overrides.insert(key.to_string(), Value::String(value.clone()));
                }
            }
        }
        if !overrides.is_empty() {
            let patch = json!({ "framework": Value::Object(overrides) });
            merge_two_levels(&mut self.config, &patch);
        }
    }

    /// Walk `path` through the tree. `None` on any missing segment; never
    /// errors, so callers can chain fallbacks.
    pub fn get_any(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.config;
        for segment in path {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    /// String form of `get_any`, degrading to `""` on miss or on a
    /// non-scalar value.
    pub fn get_str(&self, path: &[&str]) -> String {
        match self.get_any(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Shorthand for keys under the `framework` section.
    pub fn get(&self, key: &str) -> String {
        self.get_str(&["framework", key])
    }

    pub fn json(&self) -> &Value {
        &self.config
    }

    pub fn to_json_string(&self) -> String {
        self.config.to_string()
    }

    // Typed accessors used by the resolver chain. Each degrades to an
    // empty value rather than failing.

    pub fn framework_name(&self) -> String {
        self.get("framework-name")
    }

    pub fn zk_hosts(&self) -> String {
        self.get("zk")
    }

    pub fn mesos_master(&self) -> String {
        self.get("master")
    }

    pub fn marathon_url(&self) -> String {
        self.get_str(&["marathon", "url"])
    }

    /// Pre-known framework URL (discovery strategy 1); empty when unset.
    pub fn framework_url(&self) -> String {
        self.get("url")
    }

    /// Platform router base URL (discovery strategy 2); the environment
    /// variable wins over the config key.
    pub fn platform_url(&self) -> String {
        match std::env::var(PLATFORM_URL_ENV_VAR) {
            Ok(v) if !v.is_empty() => v,
            _ => self.get("platform-url"),
        }
    }
}

/// Fixed default skeleton. Every key an accessor can name exists here, so
/// a partial override file never has to spell out unrelated siblings.
fn default_skeleton() -> Value {
    json!({
        "framework": {
            "framework-name": "ringdb",
            "master": "zk://leader.mesos:2181/mesos",
            "zk": "leader.mesos:2181",
            "user": "root",
            "role": "ringdb",
            "url": "",
            "platform-url": "",
            "hostname": "ringdb.mesos",
            "instances": 1,
            "cpus": 0.5,
            "mem": 2048.0,
            "package-url": "http://downloads.ringdb.io/mesos/ringdb_mesos_linux_amd64_0.4.0.tar.gz",
            "flags": "",
            "super-chroot": "true",
            "auth-principal": "ringdb",
            "auth-provider": "",
            "auth-secret-file": "",
            "failover-timeout": "",
            "node": {
                "cpus": 1.0,
                "mem": 8000.0,
                "disk": 20000.0
            },
            "healthcheck-grace-period-seconds": 300,
            "healthcheck-interval-seconds": 60,
            "healthcheck-timeout-seconds": 20,
            "healthcheck-max-consecutive-failures": 5
        },
        "director": {
            "url": "http://downloads.ringdb.io/mesos/ringdb_director_linux_amd64_0.4.0.tar.gz",
            "cmd": "./director/bin/ringdb-director",
            "cpus": 0.5,
            "mem": 1024.0,
            "use-public": false
        },
        "marathon": {
            "url": "http://marathon.mesos:8080"
        }
    })
}

/// Shallow-recursive merge with a fixed two-level depth: top-level maps
/// merge, second-level maps merge, anything below replaces wholesale.
fn merge_two_levels(base: &mut Value, overrides: &Value) {
    let Some(override_map) = overrides.as_object() else {
        return;
    };
    let Some(base_map) = base.as_object_mut() else {
        return;
    };

    for (key, override_value) in override_map {
        match (base_map.get_mut(key), override_value.as_object()) {
            (Some(Value::Object(section)), Some(override_section)) => {
                for (subkey, sub_value) in override_section {
                    match (section.get_mut(subkey), sub_value.as_object()) {
                        (Some(Value::Object(nested)), Some(override_nested)) => {
                            for (k, v) in override_nested {
                                nested.insert(k.clone(), v.clone());
                            }
                        }
                        _ => {
                            section.insert(subkey.clone(), sub_value.clone());
                        }
                    }
                }
            }
            _ => {
                base_map.insert(key.clone(), override_value.clone());
            }
        }
    }
}
