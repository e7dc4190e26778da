//! Validated build configuration.
//!
//! All environment lookups happen here, once, at load time: credentials come
//! from `BINTRAY_USER`/`BINTRAY_KEY`, the browser binary location from
//! `CHROME_BIN`. The rest of the pipeline only ever sees the validated
//! records. Construction fails closed with [`BuildToolError::Config`].

use std::path::PathBuf;

use crate::error::{BuildToolError, Result};

/// Bintray API credentials, loaded explicitly before any repository work.
#[derive(Debug, Clone)]
pub struct BintrayCredentials {
    pub user: String,
    pub key: String,
}

impl BintrayCredentials {
    /// Load credentials through an injectable name-to-value lookup.
    ///
    /// Missing or empty values fail with a config error naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = require_env(&lookup, "BINTRAY_USER")?;
        let key = require_env(&lookup, "BINTRAY_KEY")?;
        Ok(Self { user, key })
    }

    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

fn require_env<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BuildToolError::Config(format!("Expected {name} set."))),
    }
}

/// Unvalidated option values as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct RawBuildOptions {
    pub max_local_builds: usize,
    pub run_unit_tests: bool,
    pub gradle_cache_path: Option<PathBuf>,
    pub bintray_org: String,
    pub bintray_jar_repository: String,
    pub bintray_debian_repository: String,
    pub bintray_publish_wait_secs: u64,
    /// Requested value; the validated record forces this to `true`.
    pub github_disable_upstream_push: bool,
    pub chrome_bin: Option<String>,
}

/// Validated, immutable build options.
///
/// Produced once by [`DebianBuildOptions::validated`]; the Bintray fields
/// are guaranteed non-empty and `max_local_builds` is at least one.
#[derive(Debug, Clone)]
pub struct DebianBuildOptions {
    pub max_local_builds: usize,
    pub run_unit_tests: bool,
    pub gradle_cache_path: Option<PathBuf>,
    pub bintray_org: String,
    pub bintray_jar_repository: String,
    pub bintray_debian_repository: String,
    pub bintray_publish_wait_secs: u64,
    /// Always `true`: local debian builds never push to the upstream remote.
    pub github_disable_upstream_push: bool,
    /// Browser binary location for deck's karma tests, captured at load time.
    pub chrome_bin: Option<String>,
}

impl DebianBuildOptions {
    /// Validate raw options into the immutable record.
    pub fn validated(raw: RawBuildOptions) -> Result<Self> {
        if raw.max_local_builds == 0 {
            return Err(BuildToolError::Config(
                "max_local_builds must be a positive integer".to_string(),
            ));
        }

        for (name, value) in [
            ("bintray_org", &raw.bintray_org),
            ("bintray_jar_repository", &raw.bintray_jar_repository),
            ("bintray_debian_repository", &raw.bintray_debian_repository),
        ] {
            if value.is_empty() {
                return Err(BuildToolError::Config(format!("Expected option {name} set.")));
            }
        }

        Ok(Self {
            max_local_builds: raw.max_local_builds,
            run_unit_tests: raw.run_unit_tests,
            gradle_cache_path: raw.gradle_cache_path,
            bintray_org: raw.bintray_org,
            bintray_jar_repository: raw.bintray_jar_repository,
            bintray_debian_repository: raw.bintray_debian_repository,
            bintray_publish_wait_secs: raw.bintray_publish_wait_secs,
            github_disable_upstream_push: true,
            chrome_bin: raw.chrome_bin,
        })
    }
}
