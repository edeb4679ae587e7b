//! agbuild core - build identity, paths and configuration
//!
//! This crate resolves the abstract "platform / architecture / deployment
//! target" identity of a build into concrete directories and holds the
//! project configuration shared by every stage.

pub mod config;
pub mod error;
pub mod paths;
pub mod platform;
pub mod version;

pub use config::Config;
pub use error::{AgbuildError, ConfigError, Result};
pub use paths::BuildLayout;
pub use platform::{BuildIdentity, HostProbe, Platform, UnameProbe};
