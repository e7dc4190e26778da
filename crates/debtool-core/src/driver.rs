//! Debian build driver: skip check, bounded invocation, publish-flag fallback.
//!
//! Per repository the driver runs `./gradlew candidate` once, and once more
//! with `-PenabledPublishing=true` if the first attempt fails with an
//! execution error. Services are being migrated to Spring Boot 2 one by one;
//! the pre-migration invocation (init-publish script) breaks for a migrated
//! service, so the post-migration flag is the fallback. Once every service
//! has migrated the fallback flag should become the default.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::bintray::DebianPublishCheck;
use crate::error::{BuildToolError, Result};
use crate::gate::BuildGate;
use crate::gradle::GradleRunner;
use crate::invoker::{debian_build_args, NEW_PUBLISH_FLAG};
use crate::options::DebianBuildOptions;
use crate::repository::Repository;
use crate::scm::SourceCodeManager;

/// Repositories that never produce a Debian package.
pub const NON_DEBIAN_BOM_REPOSITORIES: &[&str] = &["spin"];

/// Stage labels attached to every build invocation.
const STAGE_LABELS: &[&str] = &["candidate", "debian-build"];

/// Terminal state of one repository build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No invocation: excluded or already published.
    Skipped,

    /// Package built; `retried` marks the publish-flag fallback path.
    Built { retried: bool },
}

/// Outcome of one repository within a whole-run report.
#[derive(Debug)]
pub struct BuildReport {
    pub repository: String,
    pub outcome: Result<BuildOutcome>,
}

impl BuildReport {
    pub fn failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Orchestrates Debian builds across repositories.
pub struct DebianBuildDriver {
    options: Arc<DebianBuildOptions>,
    scm: Arc<dyn SourceCodeManager>,
    gradle: Arc<dyn GradleRunner>,
    publish_check: Arc<dyn DebianPublishCheck>,
    gate: BuildGate,
    excluded: HashSet<String>,
}

impl DebianBuildDriver {
    /// Create a driver with the historical exclusion set.
    pub fn new(
        options: Arc<DebianBuildOptions>,
        scm: Arc<dyn SourceCodeManager>,
        gradle: Arc<dyn GradleRunner>,
        publish_check: Arc<dyn DebianPublishCheck>,
    ) -> Self {
        let excluded = NON_DEBIAN_BOM_REPOSITORIES
            .iter()
            .map(|name| name.to_string())
            .collect();
        Self::with_exclusions(options, scm, gradle, publish_check, excluded)
    }

    /// Create a driver with an explicit set of excluded repository names.
    pub fn with_exclusions(
        options: Arc<DebianBuildOptions>,
        scm: Arc<dyn SourceCodeManager>,
        gradle: Arc<dyn GradleRunner>,
        publish_check: Arc<dyn DebianPublishCheck>,
        excluded: HashSet<String>,
    ) -> Self {
        let gate = BuildGate::new(options.max_local_builds);
        Self {
            options,
            scm,
            gradle,
            publish_check,
            gate,
            excluded,
        }
    }

    /// Whether the repository needs no build at all.
    ///
    /// True when the name is excluded, or when the Debian for the BOM's
    /// build version already exists on Bintray.
    pub async fn can_skip_repository(&self, repository: &Repository) -> Result<bool> {
        if self.excluded.contains(&repository.name) {
            return Ok(true);
        }

        let build_version = self.scm.build_version(repository).await?;
        self.publish_check
            .already_published(repository, &build_version)
            .await
    }

    /// Build one repository: skip check, first attempt, one bounded retry.
    pub async fn build_repository(&self, repository: &Repository) -> Result<BuildOutcome> {
        if self.can_skip_repository(repository).await? {
            info!(repository = %repository.name, "Skipping repository, nothing to build");
            return Ok(BuildOutcome::Skipped);
        }

        let args = debian_build_args(repository, &self.options, self.gradle.as_ref(), false);
        let first_attempt = {
            let _permit = self.gate.acquire().await;
            self.gradle
                .check_run(&args, repository, STAGE_LABELS)
                .await
        };

        match first_attempt {
            Ok(()) => Ok(BuildOutcome::Built { retried: false }),
            Err(err) if err.is_execution() => {
                warn!(
                    repository = %repository.name,
                    error = %err,
                    "First \"./gradlew candidate\" attempt failed; rerunning with \
                     \"{NEW_PUBLISH_FLAG}\" in place of the init-publish script",
                );

                let retry_args =
                    debian_build_args(repository, &self.options, self.gradle.as_ref(), true);
                let _permit = self.gate.acquire().await;
                self.gradle
                    .check_run(&retry_args, repository, STAGE_LABELS)
                    .await?;
                Ok(BuildOutcome::Built { retried: true })
            }
            Err(err) => Err(err),
        }
    }

    /// Build every repository, one tokio task each, bounded by the gate.
    ///
    /// No ordering is guaranteed between repositories. A repository failure
    /// is captured in its report; it does not stop the others.
    pub async fn build_all(self: Arc<Self>, repositories: Vec<Repository>) -> Vec<BuildReport> {
        let mut tasks = Vec::with_capacity(repositories.len());
        for repository in repositories {
            let driver = Arc::clone(&self);
            let name = repository.name.clone();
            let handle = tokio::spawn(async move {
                let outcome = driver.build_repository(&repository).await;
                BuildReport {
                    repository: repository.name,
                    outcome,
                }
            });
            tasks.push(async move {
                match handle.await {
                    Ok(report) => report,
                    Err(join_err) => BuildReport {
                        repository: name,
                        outcome: Err(BuildToolError::Config(format!(
                            "build task panicked: {join_err}"
                        ))),
                    },
                }
            });
        }

        join_all(tasks).await
    }
}
