//! agbuild stages - configure, build, package, archive and test
//!
//! Every stage takes a context describing one build and a
//! [`Runner`](agbuild_process::Runner) that executes the external tools, so the
//! whole pipeline can be exercised against a recording runner.
//!
//! # Stages
//!
//! - [`configure`]: generate the CMake build tree, optionally inside a
//!   [`ToolchainGuard`] on macOS
//! - [`build`]: compile and extract debug symbols
//! - [`packaging`]: per-platform installers and archives, single or fan-out
//! - [`upload`] and [`archive`]: ship or keep debug symbols
//! - [`testing`]: fixture download and the monitored test binaries

pub mod archive;
pub mod artifacts;
pub mod build;
pub mod configure;
pub mod context;
pub mod error;
pub mod fsutil;
pub mod packaging;
pub mod settings;
pub mod symbols;
pub mod testing;
pub mod toolchain;
pub mod upload;
pub mod zipfile;

pub use archive::archive_debug_symbols;
pub use artifacts::{Artifact, ArtifactKind};
pub use build::build;
pub use configure::configure;
pub use context::{BuildContext, ConfigureContext, SigningContext, Target, TestContext};
pub use error::{Result, StageError};
pub use packaging::{
    package, package_many, parse_platform_list, FanOutOptions, PackageContext, PackagingStrategy,
};
pub use testing::{ensure_fixtures, run_tests};
pub use toolchain::{ToolchainGuard, ToolchainSelector};
pub use upload::upload_symbols;
