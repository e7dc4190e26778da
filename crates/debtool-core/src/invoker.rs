//! Per-repository Gradle argument construction.
//!
//! Rebuilt for every attempt: the first attempt includes the repository's
//! init-publish script when present, the retry attempt replaces it with the
//! `-PenabledPublishing=true` flag.

use crate::gradle::GradleRunner;
use crate::options::DebianBuildOptions;
use crate::repository::Repository;

/// Distribution codenames every Debian build targets.
pub const TARGET_DISTRIBUTIONS: &str = "trusty,xenial,bionic";

/// Flag enabling publishing on services already migrated to Spring Boot 2.
pub const NEW_PUBLISH_FLAG: &str = "-PenabledPublishing=true";

/// Init-script include used by services not yet migrated.
pub const INIT_PUBLISH_SCRIPT: &str = "gradle/init-publish.gradle";

/// Build the full argument sequence for one invocation attempt.
///
/// `new_publish_flag` selects the retry-mode publish flag; when false, the
/// repository's `gradle/init-publish.gradle` is included if it exists. Unit
/// tests are skipped when disabled by configuration, or for `deck` when no
/// browser binary is configured (its karma suite cannot run without one).
pub fn debian_build_args(
    repository: &Repository,
    options: &DebianBuildOptions,
    gradle: &dyn GradleRunner,
    new_publish_flag: bool,
) -> Vec<String> {
    let mut args = gradle.common_args();

    if let Some(cache_path) = &options.gradle_cache_path {
        args.push(format!("--gradle-user-home={}", cache_path.display()));
    }

    let skip_tests = !options.run_unit_tests
        || (repository.name == "deck" && options.chrome_bin.is_none());
    if skip_tests {
        args.push("-x".to_string());
        args.push("test".to_string());
    }

    if new_publish_flag {
        args.push(NEW_PUBLISH_FLAG.to_string());
    } else if repository.init_publish_script().is_file() {
        args.push("-I".to_string());
        args.push(INIT_PUBLISH_SCRIPT.to_string());
    }

    args.extend(gradle.debian_args(TARGET_DISTRIBUTIONS));
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::options::RawBuildOptions;
    use async_trait::async_trait;
    use std::path::PathBuf;

    /// Fixed-argument runner; check_run is unreachable in these tests.
    struct StubGradle;

    #[async_trait]
    impl GradleRunner for StubGradle {
        fn common_args(&self) -> Vec<String> {
            vec!["--stacktrace".to_string()]
        }

        fn debian_args(&self, distros: &str) -> Vec<String> {
            vec![
                format!("-PbintrayPackageDebDistribution={distros}"),
                "candidate".to_string(),
            ]
        }

        async fn check_run(
            &self,
            _args: &[String],
            _repository: &Repository,
            _stage_labels: &[&str],
        ) -> Result<()> {
            unreachable!("argument tests never invoke gradle")
        }
    }

    fn options(run_unit_tests: bool, chrome_bin: Option<&str>) -> DebianBuildOptions {
        DebianBuildOptions::validated(RawBuildOptions {
            max_local_builds: 1,
            run_unit_tests,
            gradle_cache_path: None,
            bintray_org: "spinnaker".to_string(),
            bintray_jar_repository: "jars".to_string(),
            bintray_debian_repository: "debians".to_string(),
            bintray_publish_wait_secs: 60,
            github_disable_upstream_push: false,
            chrome_bin: chrome_bin.map(str::to_string),
        })
        .unwrap()
    }

    fn has_skip_tests(args: &[String]) -> bool {
        args.windows(2).any(|w| w[0] == "-x" && w[1] == "test")
    }

    fn has_init_publish(args: &[String]) -> bool {
        args.windows(2)
            .any(|w| w[0] == "-I" && w[1] == INIT_PUBLISH_SCRIPT)
    }

    #[test]
    fn test_distribution_args_always_last() {
        let repo = Repository::new("orca", "/src/orca");
        let args = debian_build_args(&repo, &options(true, None), &StubGradle, false);
        assert_eq!(args[0], "--stacktrace");
        assert_eq!(
            args[args.len() - 2],
            "-PbintrayPackageDebDistribution=trusty,xenial,bionic"
        );
        assert_eq!(args[args.len() - 1], "candidate");
    }

    #[test]
    fn test_gradle_cache_path_appended() {
        let repo = Repository::new("orca", "/src/orca");
        let mut opts = options(true, None);
        opts.gradle_cache_path = Some(PathBuf::from("/var/cache/gradle"));
        let args = debian_build_args(&repo, &opts, &StubGradle, false);
        assert!(args.contains(&"--gradle-user-home=/var/cache/gradle".to_string()));
    }

    #[test]
    fn test_unit_tests_disabled_skips_tests() {
        let repo = Repository::new("orca", "/src/orca");
        let args = debian_build_args(&repo, &options(false, None), &StubGradle, false);
        assert!(has_skip_tests(&args));
    }

    #[test]
    fn test_deck_without_browser_binary_skips_tests() {
        let repo = Repository::new("deck", "/src/deck");
        let args = debian_build_args(&repo, &options(true, None), &StubGradle, false);
        assert!(has_skip_tests(&args));
    }

    #[test]
    fn test_deck_with_browser_binary_runs_tests() {
        let repo = Repository::new("deck", "/src/deck");
        let args = debian_build_args(
            &repo,
            &options(true, Some("/usr/bin/chromium")),
            &StubGradle,
            false,
        );
        assert!(!has_skip_tests(&args));
    }

    #[test]
    fn test_other_repositories_run_tests() {
        let repo = Repository::new("orca", "/src/orca");
        let args = debian_build_args(&repo, &options(true, None), &StubGradle, false);
        assert!(!has_skip_tests(&args));
    }

    #[test]
    fn test_init_publish_script_included_when_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("gradle")).unwrap();
        std::fs::write(dir.path().join(INIT_PUBLISH_SCRIPT), "// init").unwrap();
        let repo = Repository::new("orca", dir.path());

        let args = debian_build_args(&repo, &options(true, None), &StubGradle, false);
        assert!(has_init_publish(&args));
        assert!(!args.contains(&NEW_PUBLISH_FLAG.to_string()));
    }

    #[test]
    fn test_retry_mode_wins_over_init_publish_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("gradle")).unwrap();
        std::fs::write(dir.path().join(INIT_PUBLISH_SCRIPT), "// init").unwrap();
        let repo = Repository::new("orca", dir.path());

        let args = debian_build_args(&repo, &options(true, None), &StubGradle, true);
        assert!(args.contains(&NEW_PUBLISH_FLAG.to_string()));
        assert!(!has_init_publish(&args));
    }

    #[test]
    fn test_no_publish_token_without_script_or_retry() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new("orca", dir.path());
        let args = debian_build_args(&repo, &options(true, None), &StubGradle, false);
        assert!(!args.contains(&NEW_PUBLISH_FLAG.to_string()));
        assert!(!has_init_publish(&args));
    }
}
