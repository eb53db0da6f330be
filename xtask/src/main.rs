//! Build automation for ringctl
//!
//! Usage: cargo xtask <command>
//!
//! - build / test / ci: the usual development loop
//! - dist: release tarball named the way the binstall metadata expects
//! - deb: Debian package via cargo-deb (metadata lives in Cargo.toml)
//! - install: copy the release binary into a prefix

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for ringctl")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Only the end-to-end tests under tests/
        #[arg(long)]
        integration: bool,
    },
    /// Create the release tarball for cargo-binstall
    Dist,
    /// Build a Debian package with cargo-deb
    Deb,
    /// Install the release binary
    Install {
        /// Installation prefix (default: /usr/local)
        #[arg(long, default_value = "/usr/local")]
        prefix: String,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Format code
    Format {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root());

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { integration } => test(&sh, integration),
        Commands::Dist => dist(&sh),
        Commands::Deb => deb(&sh),
        Commands::Install { prefix } => install(&sh, &prefix),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building ringctl...");

    if release {
        cmd!(sh, "cargo build --release --bin ringctl").run()?;
        println!("✅ Release build completed: target/release/ringctl");
    } else {
        cmd!(sh, "cargo build --bin ringctl").run()?;
        println!("✅ Debug build completed: target/debug/ringctl");
    }

    Ok(())
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    println!("🧪 Running tests...");

    if integration {
        // cli_test drives the compiled binary, build it up front
        cmd!(sh, "cargo build --bin ringctl").run()?;
        cmd!(sh, "cargo test --test readiness_test --test cli_test").run()?;
    } else {
        cmd!(sh, "cargo test --workspace").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

/// Tarball named `ringctl-<host triple>.tar.gz` with the binary at the
/// archive root, matching the binstall pkg-url in Cargo.toml.
fn dist(sh: &Shell) -> Result<()> {
    println!("📦 Creating distribution package...");

    cmd!(sh, "cargo build --release --bin ringctl").run()?;

    let dist_dir = project_root().join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(
        project_root().join("target/release/ringctl"),
        dist_dir.join("ringctl"),
    )?;

    let target = host_triple(sh)?;
    let archive_name = format!("ringctl-{}.tar.gz", target);
    cmd!(sh, "tar -czf {archive_name} -C dist ringctl")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn deb(sh: &Shell) -> Result<()> {
    println!("📦 Building Debian package...");

    if cmd!(sh, "cargo deb --version").quiet().run().is_err() {
        bail!("cargo-deb is not installed; run `cargo install cargo-deb` first");
    }
    cmd!(sh, "cargo deb").run()?;

    println!("✅ Debian package created under target/debian/");
    Ok(())
}

fn install(sh: &Shell, prefix: &str) -> Result<()> {
    println!("📥 Installing ringctl to {}...", prefix);

    let binary = project_root().join("target/release/ringctl");
    if !binary.exists() {
        println!("Building release binary first...");
        cmd!(sh, "cargo build --release --bin ringctl").run()?;
    }

    let bin_dir = Path::new(prefix).join("bin");
    sh.create_dir(&bin_dir)?;

    let install_path = bin_dir.join("ringctl");
    sh.copy_file(&binary, &install_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&install_path, std::fs::Permissions::from_mode(0o755))?;
    }

    println!("✅ Installed to: {}", install_path.display());
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(
        sh,
        "cargo clippy --all-targets --all-features -- -D warnings"
    )
    .run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn host_triple(sh: &Shell) -> Result<String> {
    let verbose = cmd!(sh, "rustc -vV").read()?;
    verbose
        .lines()
        .find_map(|line| line.strip_prefix("host: "))
        .map(str::to_string)
        .context("rustc -vV did not report a host triple")
}

fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}
