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

//! Director proxy commands. The director is a per-cluster smart proxy in
//! front of the database nodes, deployed as its own orchestrator app.

use super::commands::DirectorCommands;
use super::{echo_payload, validate_name, Context};
use crate::domain::config::apps;
use crate::domain::framework::readiness;
use crate::shared::Result;

pub async fn run(ctx: &mut Context, cmd: DirectorCommands) -> Result<()> {
    match cmd {
        DirectorCommands::Config { cluster } => {
            validate_name("cluster", &cluster)?;
            let app = apps::director_app(&ctx.config, &cluster);
            echo_payload(ctx.json, &app.to_string());
            Ok(())
        }

        DirectorCommands::Install { cluster } => {
            validate_name("cluster", &cluster)?;
            let app = apps::director_app(&ctx.config, &cluster);
            ctx.marathon().add_app(&app).await?;
            println!(
                "Finished adding {} to the orchestrator.",
                app["id"].as_str().unwrap_or("?")
            );
            Ok(())
        }

        DirectorCommands::Uninstall { cluster } => {
            validate_name("cluster", &cluster)?;
            let app_id = apps::director_app_id(&ctx.config.framework_name(), &cluster);
            ctx.marathon().remove_app(&app_id).await?;
            println!("Finished removing {} from the orchestrator.", app_id);
            Ok(())
        }

        DirectorCommands::Endpoints { cluster } => {
            validate_name("cluster", &cluster)?;
            let app_id = apps::director_app_id(&ctx.config.framework_name(), &cluster);
            let tasks = ctx.marathon().get_tasks(Some(&app_id)).await?;
            match tasks.first() {
                Some(task) => {
                    let payload = serde_json::json!({
                        "host": task.host,
                        "ports": task.ports,
                    });
                    echo_payload(ctx.json, &payload.to_string());
                }
                None => println!("Director is not installed for cluster {}.", cluster),
            }
            Ok(())
        }

        DirectorCommands::WaitForService { cluster, timeout } => {
            validate_name("cluster", &cluster)?;
            let app_id = apps::director_app_id(&ctx.config.framework_name(), &cluster);
            let marathon = ctx.marathon();
            let outcome =
                readiness::wait_for_director(&marathon, &ctx.gateway, &app_id, timeout).await;
            if outcome.is_ready() {
                println!("Director is ready.");
            } else {
                println!("Director did not respond in {} seconds.", timeout);
            }
            Ok(())
        }
    }
}
