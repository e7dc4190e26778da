//! debtool core library
//!
//! Builds per-service Debian packages from local git checkouts:
//! - Skips repositories that never produce Debians or whose version is
//!   already published to Bintray
//! - Bounds concurrent `./gradlew` invocations with a counting gate
//! - Falls back once to the `-PenabledPublishing=true` flag when the
//!   pre-migration invocation fails

pub mod bintray;
pub mod driver;
pub mod error;
pub mod gate;
pub mod gradle;
pub mod invoker;
pub mod options;
pub mod repository;
pub mod scm;
pub mod telemetry;

// Re-export key types
pub use bintray::{BintrayClient, DebianPublishCheck};
pub use driver::{
    BuildOutcome, BuildReport, DebianBuildDriver, NON_DEBIAN_BOM_REPOSITORIES,
};
pub use error::{BuildToolError, Result};
pub use gate::{BuildGate, BuildPermit};
pub use gradle::{GradleCommandRunner, GradleRunner};
pub use invoker::{debian_build_args, NEW_PUBLISH_FLAG, TARGET_DISTRIBUTIONS};
pub use options::{BintrayCredentials, DebianBuildOptions, RawBuildOptions};
pub use repository::{BuildVersion, Repository};
pub use scm::{Bom, BomService, BomSourceCodeManager, SourceCodeManager};
pub use telemetry::init_tracing;
