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

use clap::Parser;
use ringctl::cli::commands::Commands;
use ringctl::cli::{self, echo_payload, CliArgs, Context};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Initialize tracing; --debug raises the level
    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let debug = args.debug;
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        if debug {
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut ctx = Context::new(&args).await?;

    match args.command {
        Commands::Framework(cmd) => cli::framework::run(&mut ctx, cmd).await?,
        Commands::Cluster(cmd) => cli::cluster::run(&mut ctx, cmd).await?,
        Commands::Node(cmd) => cli::node::run(&mut ctx, cmd).await?,
        Commands::Director(cmd) => cli::director::run(&mut ctx, cmd).await?,
        Commands::Config => echo_payload(ctx.json, &ctx.config.to_json_string()),
    }
    Ok(())
}
