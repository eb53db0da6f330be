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

/// Configuration file search order (after an explicit --config path)
pub const CONFIG_ENV_VAR: &str = "RINGCTL_CONFIG";
pub const USER_CONFIG_PATH: &str = ".config/ringctl/config.json";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ringctl/config.json";

/// Platform router override (discovery strategy 2)
pub const PLATFORM_URL_ENV_VAR: &str = "RINGCTL_PLATFORM_URL";

/// Framework data-plane API
pub const API_PREFIX: &str = "api/v1/";
pub const HEALTHCHECK_PATH: &str = "healthcheck";

/// Coordination-service registration tree
pub const REGISTRY_NAMESPACE: &str = "/ringdb";

/// Scheduler environment variables, set on install and reverse-mapped
/// when recovering configuration from a running instance
pub const ENV_FRAMEWORK_NAME: &str = "RINGDB_FRAMEWORK_NAME";
pub const ENV_ZK: &str = "RINGDB_ZK";
pub const ENV_MASTER: &str = "RINGDB_MASTER";
pub const ENV_USER: &str = "RINGDB_USER";
pub const ENV_ROLE: &str = "RINGDB_ROLE";

/// Wait command defaults
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 60;
pub const POLL_INTERVAL_SECS: u64 = 1;
/// Transfer polling echoes the raw payload every Nth tick
pub const TRANSFER_ECHO_EVERY: u64 = 5;

/// HTTP gateway request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Director (proxy) app
pub const DIRECTOR_SUFFIX: &str = "-director";

/// Node lifecycle state required for readiness
pub const NODE_STATE_STARTED: &str = "started";
