//! debtool - release build CLI
//!
//! ## Commands
//!
//! - `build-debians`: Build one or more debian packages from the local git
//!   repositories named by a BOM, publishing candidates to Bintray.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use debtool_core::{
    init_tracing, BintrayClient, BintrayCredentials, BomSourceCodeManager, BuildOutcome,
    DebianBuildDriver, DebianBuildOptions, GradleCommandRunner, RawBuildOptions,
};

#[derive(Parser)]
#[command(name = "debtool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Release build tool for debian packages", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one or more debian packages from the local git repositories
    BuildDebians {
        /// Path to the BOM file naming services and their build versions
        #[arg(long)]
        bom: PathBuf,

        /// Directory containing the per-service git checkouts
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Maximum number of concurrent local gradle builds
        #[arg(long, default_value = "1")]
        max_local_builds: usize,

        /// Run each repository's unit tests during the build
        #[arg(long)]
        run_unit_tests: bool,

        /// Shared gradle user home, reused across invocations
        #[arg(long)]
        gradle_cache_path: Option<PathBuf>,

        /// Bintray organization to publish under
        #[arg(long)]
        bintray_org: String,

        /// Bintray repository receiving jar artifacts
        #[arg(long)]
        bintray_jar_repository: String,

        /// Bintray repository receiving debian packages
        #[arg(long)]
        bintray_debian_repository: String,

        /// Seconds gradle waits for Bintray to confirm a publish
        #[arg(long, default_value = "60")]
        bintray_publish_wait_secs: u64,

        /// Repository names to exclude (defaults to the non-debian set)
        #[arg(long)]
        exclude: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::BuildDebians {
            bom,
            root,
            max_local_builds,
            run_unit_tests,
            gradle_cache_path,
            bintray_org,
            bintray_jar_repository,
            bintray_debian_repository,
            bintray_publish_wait_secs,
            exclude,
        } => {
            cmd_build_debians(
                &bom,
                &root,
                RawBuildOptions {
                    max_local_builds,
                    run_unit_tests,
                    gradle_cache_path,
                    bintray_org,
                    bintray_jar_repository,
                    bintray_debian_repository,
                    bintray_publish_wait_secs,
                    github_disable_upstream_push: true,
                    chrome_bin: std::env::var("CHROME_BIN").ok(),
                },
                exclude,
            )
            .await
        }
    }
}

async fn cmd_build_debians(
    bom_path: &PathBuf,
    root: &PathBuf,
    raw: RawBuildOptions,
    exclude: Vec<String>,
) -> Result<()> {
    // Fail fast on credentials and options before touching any repository.
    let credentials = BintrayCredentials::from_env()
        .context("Bintray credentials must be set in the environment")?;
    let options = Arc::new(
        DebianBuildOptions::validated(raw).context("Invalid build-debians options")?,
    );

    let scm = Arc::new(
        BomSourceCodeManager::load(bom_path, root.clone())
            .with_context(|| format!("Failed to load BOM from {}", bom_path.display()))?,
    );
    let repositories = scm.repositories();
    info!(
        bom = %scm.bom_version(),
        repositories = repositories.len(),
        "Loaded BOM"
    );

    let gradle = Arc::new(GradleCommandRunner::new(
        Arc::clone(&options),
        credentials.clone(),
    ));
    let publish_check = Arc::new(BintrayClient::new(
        credentials,
        options.bintray_org.clone(),
        options.bintray_debian_repository.clone(),
    ));

    let driver = if exclude.is_empty() {
        DebianBuildDriver::new(options, scm, gradle, publish_check)
    } else {
        let excluded: HashSet<String> = exclude.into_iter().collect();
        DebianBuildDriver::with_exclusions(options, scm, gradle, publish_check, excluded)
    };

    let reports = Arc::new(driver).build_all(repositories).await;

    let mut failures = Vec::new();
    for report in &reports {
        match &report.outcome {
            Ok(BuildOutcome::Skipped) => {
                info!(repository = %report.repository, "skipped");
            }
            Ok(BuildOutcome::Built { retried }) => {
                info!(repository = %report.repository, retried = retried, "built");
            }
            Err(err) => {
                failures.push(format!("{}: {err}", report.repository));
            }
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} repositories failed:\n  {}",
            failures.len(),
            reports.len(),
            failures.join("\n  ")
        );
    }

    info!(repositories = reports.len(), "All debian builds completed");
    Ok(())
}
