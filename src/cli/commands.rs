// CLI command definitions

use crate::infrastructure::constants::DEFAULT_WAIT_TIMEOUT_SECS;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ringctl",
    version,
    about = "Operator CLI for RingDB clusters on Mesos",
    long_about = "A standalone CLI tool for installing and managing RingDB frameworks, clusters and nodes on a Mesos resource manager"
)]
pub struct CliArgs {
    /// Path to a JSON configuration override file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print raw JSON payloads instead of formatted tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose diagnostics; errors also print their debug form
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Manage the framework scheduler
    #[command(subcommand)]
    Framework(FrameworkCommands),

    /// Manage database clusters
    #[command(subcommand)]
    Cluster(ClusterCommands),

    /// Manage individual database nodes
    #[command(subcommand)]
    Node(NodeCommands),

    /// Manage a cluster's director proxy
    #[command(subcommand)]
    Director(DirectorCommands),

    /// Print the effective configuration
    Config,
}

#[derive(clap::Subcommand, Debug)]
pub enum FrameworkCommands {
    /// Print the scheduler application definition
    Config,

    /// Deploy the scheduler to the orchestrator
    Install,

    /// Show the scheduler application as the orchestrator sees it
    Status,

    /// Remove the scheduler from the orchestrator
    Uninstall,

    /// Unregister the framework from the resource manager
    Teardown,

    /// Delete framework metadata from the coordination service
    CleanMetadata {
        /// Actually delete the metadata; without this only a warning is printed
        #[arg(long)]
        force: bool,
    },

    /// Poll until the framework answers its API
    WaitForService {
        /// Seconds to wait before giving up
        #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Print the framework HTTP API endpoint
    Endpoints,
}

#[derive(clap::Subcommand, Debug)]
pub enum ClusterCommands {
    /// List all clusters
    List,

    /// Show one cluster's definition
    Info {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Create a cluster
    Create {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Destroy a cluster and all its nodes
    Destroy {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Restart every node in a cluster
    Restart {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Get or set the cluster's database configuration
    Config {
        #[arg(long, default_value = "default")]
        cluster: String,

        /// Upload this file as the new configuration instead of reading it
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Get or set the cluster's advanced configuration
    ConfigAdvanced {
        #[arg(long, default_value = "default")]
        cluster: String,

        /// Upload this file as the new advanced configuration
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Poll until the cluster has enough valid nodes
    WaitForService {
        #[arg(long, default_value = "default")]
        cluster: String,

        /// Seconds to wait, divided fairly across the cluster's nodes
        #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
        timeout: u64,

        /// Number of valid nodes required
        #[arg(long, default_value_t = 1)]
        nodes: u64,
    },

    /// Show every node's endpoints
    Endpoints {
        #[arg(long, default_value = "default")]
        cluster: String,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum NodeCommands {
    /// List the cluster's nodes
    List {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Add nodes to the cluster
    Add {
        #[arg(long, default_value = "default")]
        cluster: String,

        /// How many nodes to add
        #[arg(long, default_value_t = 1)]
        nodes: u64,
    },

    /// Remove a node from the cluster
    Remove {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,

        /// Remove even if the node is unreachable
        #[arg(long)]
        force: bool,
    },

    /// Show a node's endpoints and liveness
    Info {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Show a node's ring membership status
    Status {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Check whether the node agrees the ring is ready
    Ringready {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Show the node's active anti-entropy status
    AaeStatus {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// List the node's bucket types
    Types {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Create a bucket type on the node
    BucketTypeCreate {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,

        /// Name of the bucket type to create
        #[arg(long)]
        bucket_type: String,

        /// Bucket type properties, as a JSON object
        #[arg(long)]
        props: String,
    },

    /// List the node's log files
    LogList {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Fetch the tail of one of the node's log files
    Log {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,

        /// Log file name, as reported by log-list
        #[arg(long)]
        file: String,

        /// Number of rows to fetch
        #[arg(long, default_value_t = 500)]
        lines: u64,
    },

    /// Show the node's runtime statistics
    Stats {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Show the node's handoff transfers
    Transfers {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,
    },

    /// Poll until the node is alive and started
    WaitForService {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,

        #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Poll until the node has no pending handoff transfers
    WaitForTransfers {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long)]
        node: String,

        #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
        timeout: u64,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum DirectorCommands {
    /// Print the director application definition
    Config {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Deploy the cluster's director proxy
    Install {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Remove the cluster's director proxy
    Uninstall {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Show the director's host and ports
    Endpoints {
        #[arg(long, default_value = "default")]
        cluster: String,
    },

    /// Poll until the director answers HTTP
    WaitForService {
        #[arg(long, default_value = "default")]
        cluster: String,

        #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
        timeout: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_well_formed() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn wait_defaults_to_sixty_seconds() {
        let args =
            CliArgs::try_parse_from(["ringctl", "framework", "wait-for-service"]).unwrap();
        match args.command {
            Commands::Framework(FrameworkCommands::WaitForService { timeout }) => {
                assert_eq!(timeout, 60);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn cluster_defaults_to_default() {
        let args = CliArgs::try_parse_from(["ringctl", "cluster", "create"]).unwrap();
        match args.command {
            Commands::Cluster(ClusterCommands::Create { cluster }) => {
                assert_eq!(cluster, "default");
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn node_operations_require_a_node_argument() {
        assert!(CliArgs::try_parse_from(["ringctl", "node", "remove"]).is_err());
        assert!(CliArgs::try_parse_from([
            "ringctl", "node", "remove", "--node", "default-1"
        ])
        .is_ok());
    }
}
