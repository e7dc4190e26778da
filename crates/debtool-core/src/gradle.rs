//! Gradle invocation collaborator.
//!
//! [`GradleRunner`] is the seam between the driver and the external build
//! tool: it supplies the shared argument sets and runs `./gradlew` inside a
//! repository checkout. A non-zero exit surfaces as
//! [`BuildToolError::Execution`], the one kind the driver retries.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{BuildToolError, Result};
use crate::options::{BintrayCredentials, DebianBuildOptions};
use crate::repository::Repository;

/// Interface to the external Gradle build tool.
#[async_trait]
pub trait GradleRunner: Send + Sync {
    /// Argument set shared by every gradle invocation this command makes.
    fn common_args(&self) -> Vec<String>;

    /// Arguments selecting the debian packaging targets for the given
    /// comma-separated distribution codenames.
    fn debian_args(&self, distros: &str) -> Vec<String>;

    /// Run the build tool with `args` inside the repository checkout.
    ///
    /// `stage_labels` name the logical stages for logging. Fails with
    /// [`BuildToolError::Execution`] when the process exits non-zero.
    async fn check_run(
        &self,
        args: &[String],
        repository: &Repository,
        stage_labels: &[&str],
    ) -> Result<()>;
}

/// Production runner: spawns `./gradlew` in the checkout directory.
pub struct GradleCommandRunner {
    options: Arc<DebianBuildOptions>,
    credentials: BintrayCredentials,
}

impl GradleCommandRunner {
    pub fn new(options: Arc<DebianBuildOptions>, credentials: BintrayCredentials) -> Self {
        Self {
            options,
            credentials,
        }
    }
}

#[async_trait]
impl GradleRunner for GradleCommandRunner {
    fn common_args(&self) -> Vec<String> {
        let options = &self.options;
        vec![
            "--stacktrace".to_string(),
            format!("-PbintrayOrg={}", options.bintray_org),
            format!("-PbintrayJarRepo={}", options.bintray_jar_repository),
            format!("-PbintrayPackageRepo={}", options.bintray_debian_repository),
            format!(
                "-PbintrayPublishWaitSecs={}",
                options.bintray_publish_wait_secs
            ),
            format!("-PbintrayUser={}", self.credentials.user),
            format!("-PbintrayKey={}", self.credentials.key),
        ]
    }

    fn debian_args(&self, distros: &str) -> Vec<String> {
        vec![
            format!("-PbintrayPackageDebDistribution={distros}"),
            "candidate".to_string(),
        ]
    }

    async fn check_run(
        &self,
        args: &[String],
        repository: &Repository,
        stage_labels: &[&str],
    ) -> Result<()> {
        let stage = stage_labels.join("/");
        info!(repository = %repository.name, stage = %stage, "Running ./gradlew");
        debug!(repository = %repository.name, args = ?args, "gradle arguments");

        let start = Instant::now();
        let output = Command::new("./gradlew")
            .args(args)
            .current_dir(&repository.git_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?
            .wait_with_output()
            .await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        if output.status.success() {
            info!(
                repository = %repository.name,
                stage = %stage,
                duration_ms,
                "gradle invocation succeeded"
            );
            return Ok(());
        }

        let exit_code = output.status.code().unwrap_or(-1);
        Err(BuildToolError::Execution {
            repository: repository.name.clone(),
            stage,
            exit_code,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
