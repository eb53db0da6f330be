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

pub mod cluster;
pub mod commands;
pub mod director;
pub mod display;
pub mod framework;
pub mod node;

pub use commands::CliArgs;

use crate::domain::config::ConfigStore;
use crate::domain::endpoint::EndpointResolver;
use crate::domain::framework::FrameworkService;
use crate::infrastructure::constants::{CONFIG_ENV_VAR, SYSTEM_CONFIG_PATH, USER_CONFIG_PATH};
use crate::infrastructure::coordination::ZooKeeperRegistry;
use crate::infrastructure::http::HttpGateway;
use crate::infrastructure::marathon::MarathonClient;
use crate::infrastructure::mesos::MesosClient;
use crate::shared::{CliError, Result};
use std::path::PathBuf;

/// Everything a command needs: the merged configuration, the shared HTTP
/// gateway, and the framework data-plane client with its memoizing
/// endpoint resolver.
pub struct Context {
    pub config: ConfigStore,
    pub gateway: HttpGateway,
    pub service: FrameworkService,
    pub json: bool,
}

impl Context {
    pub async fn new(args: &CliArgs) -> Result<Self> {
        let config_file = locate_config_file(args.config.clone())?;
        let mut config = ConfigStore::load(config_file.as_deref())?;
        let gateway = HttpGateway::new(args.insecure)?;

        // With no file on disk, a deployed scheduler's environment is the
        // next best source of configuration.
        if config_file.is_none() {
            recover_from_running_instance(&gateway, &mut config).await;
        }

        let registry = ZooKeeperRegistry::new(config.zk_hosts());
        let resolver = EndpointResolver::new(gateway.clone(), Box::new(registry));
        let service = FrameworkService::new(gateway.clone(), resolver, config.clone());

        Ok(Self {
            config,
            gateway,
            service,
            json: args.json,
        })
    }

    pub fn marathon(&self) -> MarathonClient {
        MarathonClient::new(self.gateway.clone(), self.config.marathon_url())
    }

    pub fn mesos(&self) -> MesosClient {
        MesosClient::new(self.gateway.clone(), &self.config.mesos_master())
    }

    pub fn registry(&self) -> ZooKeeperRegistry {
        ZooKeeperRegistry::new(self.config.zk_hosts())
    }
}

/// Pull the scheduler's environment back out of the orchestrator and merge
/// it into the configuration. Best effort: any failure leaves the defaults
/// in place.
async fn recover_from_running_instance(gateway: &HttpGateway, config: &mut ConfigStore) {
    let client = MarathonClient::new(gateway.clone(), config.marathon_url());
    let Ok(app) = client.get_app(&config.framework_name()).await else {
        return;
    };
    let Some(env) = app["env"].as_object() else {
        return;
    };
    let env: std::collections::HashMap<String, String> = env
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();
    config.merge_from_running_instance(&env);
}

/// Resolve the configuration file to use. An explicitly named file must
/// exist; the searched locations are skipped silently when absent.
fn locate_config_file(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CliError::config_error(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            let path = PathBuf::from(env_path);
            if path.is_file() {
                return Ok(Some(path));
            }
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(USER_CONFIG_PATH);
        if path.is_file() {
            return Ok(Some(path));
        }
    }

    let system = PathBuf::from(SYSTEM_CONFIG_PATH);
    if system.is_file() {
        return Ok(Some(system));
    }

    Ok(None)
}

/// Cluster and node names travel inside URL paths; reject anything that
/// could be mistaken for a flag or split the path.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "{} name must not be empty",
            kind
        )));
    }
    if name.starts_with('-') {
        return Err(CliError::invalid_argument(format!(
            "{} name must not start with '-': {}",
            kind, name
        )));
    }
    if name.contains('/') || name.contains(char::is_whitespace) {
        return Err(CliError::invalid_argument(format!(
            "{} name must not contain '/' or whitespace: {}",
            kind, name
        )));
    }
    Ok(())
}

/// Pretty-print a payload: raw body under --json, indented JSON when the
/// body parses, the body unchanged otherwise.
pub fn echo_payload(json_mode: bool, body: &str) {
    if json_mode {
        println!("{}", body);
        return;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", body),
        },
        Err(_) => println!("{}", body),
    }
}
