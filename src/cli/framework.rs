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

//! Framework scheduler lifecycle commands.

use super::commands::FrameworkCommands;
use super::{echo_payload, Context};
use crate::domain::config::apps;
use crate::domain::framework::readiness;
use crate::infrastructure::coordination::{metadata_root, ServiceRegistry};
use crate::shared::Result;
use colored::Colorize;

pub async fn run(ctx: &mut Context, cmd: FrameworkCommands) -> Result<()> {
    match cmd {
        FrameworkCommands::Config => {
            let app = apps::framework_app(&ctx.config);
            echo_payload(ctx.json, &app.to_string());
            Ok(())
        }

        FrameworkCommands::Install => {
            let app = apps::framework_app(&ctx.config);
            let client = ctx.marathon();
            client.add_app(&app).await?;
            println!(
                "Finished adding {} to the orchestrator.",
                app["id"].as_str().unwrap_or("?")
            );
            Ok(())
        }

        FrameworkCommands::Status => {
            let client = ctx.marathon();
            let app = client.get_app(&ctx.config.framework_name()).await?;
            echo_payload(ctx.json, &app.to_string());
            Ok(())
        }

        FrameworkCommands::Uninstall => {
            println!("Uninstalling framework...");
            let client = ctx.marathon();
            let name = ctx.config.framework_name();
            client.remove_app(&name).await?;
            println!("Finished removing /{} from the orchestrator.", name);
            Ok(())
        }

        FrameworkCommands::Teardown => {
            let mesos = ctx.mesos();
            let name = ctx.config.framework_name();
            match mesos.framework_id(&name).await? {
                Some(id) => {
                    mesos.teardown(&id).await?;
                    println!("Finished teardown.");
                }
                None => {
                    println!("Framework {} is not registered with the master.", name);
                }
            }
            Ok(())
        }

        FrameworkCommands::CleanMetadata { force } => {
            let name = ctx.config.framework_name();
            if !force {
                println!(
                    "{}",
                    format!(
                        "Framework metadata not removed. Use the --force flag to delete \
                         all coordination-service metadata for {}.\n\n\
                         WARNING: running this against a live framework causes \
                         unexpected behavior and possible data loss!",
                        name
                    )
                    .yellow()
                );
                return Ok(());
            }

            println!("Removing coordination-service metadata for {}...", name);
            let registry = ctx.registry();
            match registry.delete(&metadata_root(&name)).await {
                Some(confirmation) => println!("{}", confirmation),
                None => println!("Unable to remove framework metadata."),
            }
            Ok(())
        }

        FrameworkCommands::WaitForService { timeout } => {
            let outcome = readiness::wait_for_framework(&mut ctx.service, timeout).await;
            if outcome.is_ready() {
                println!("RingDB framework is ready.");
            } else {
                println!(
                    "RingDB framework did not respond within {} seconds.",
                    timeout
                );
            }
            Ok(())
        }

        FrameworkCommands::Endpoints => {
            let base = ctx.service.resolved_base_url().await?;
            println!("Framework HTTP API: {}api/v1/", base);
            Ok(())
        }
    }
}
