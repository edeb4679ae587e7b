//! agbuild signing - macOS code signing
//!
//! Signs helper binaries that are copied into the build tree before CMake
//! runs, optionally unlocking the signing keychain first.

pub mod error;
pub mod macos;
pub mod options;

pub use error::{Result, SigningError};
pub use macos::MacOSSigner;
pub use options::SignOptions;
