//! macOS code signing using codesign and security

use std::path::Path;

use agbuild_process::{quote_arg, ProcessError, Runner};
use tracing::{debug, info};

use crate::error::{Result, SigningError};
use crate::options::SignOptions;

/// Signs files with `codesign` using a keychain identity
#[derive(Debug, Clone)]
pub struct MacOSSigner {
    /// Identity passed to `codesign --sign`
    identity: String,
    /// Keychain holding the identity
    keychain: String,
}

impl MacOSSigner {
    pub fn new(identity: impl Into<String>, keychain: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            keychain: keychain.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Unlock the keychain so codesign can use the identity without a prompt.
    ///
    /// The password never appears in echoed output or errors.
    pub fn unlock_keychain(&self, runner: &dyn Runner, password: &str) -> Result<()> {
        info!(keychain = %self.keychain, "unlocking keychain");
        runner
            .capture("security", &["unlock-keychain", "-p", password, self.keychain.as_str()])
            .map_err(|e| match e {
                ProcessError::CommandFailed { code, .. } => SigningError::KeychainError(format!(
                    "unlocking {} failed with exit code {}",
                    self.keychain, code
                )),
                ProcessError::Spawn { source, .. } => {
                    SigningError::KeychainError(format!("cannot run security: {}", source))
                }
                other => SigningError::Process(other),
            })?;
        Ok(())
    }

    /// Arguments for `codesign`, without the program name
    pub fn codesign_args(&self, path: &Path, options: &SignOptions) -> Vec<String> {
        let mut args = Vec::new();
        if options.force {
            args.push("--force".to_string());
        }
        if options.deep {
            args.push("--deep".to_string());
        }
        if options.hardened_runtime {
            args.push("--options".to_string());
            args.push("runtime".to_string());
        }
        args.push("--sign".to_string());
        args.push(self.identity.clone());
        args.push(if options.timestamp {
            "--timestamp".to_string()
        } else {
            "--timestamp=none".to_string()
        });
        args.push(path.to_string_lossy().into_owned());
        args
    }

    /// Sign a file in place
    pub fn sign(&self, runner: &dyn Runner, path: &Path, options: &SignOptions) -> Result<()> {
        if !path.exists() {
            return Err(SigningError::NotFound(path.to_path_buf()));
        }

        let args = self.codesign_args(path, options);
        debug!(path = %path.display(), ?args, "signing");

        let command_line = std::iter::once("codesign".to_string())
            .chain(args.iter().map(|a| quote_arg(a)))
            .collect::<Vec<_>>()
            .join(" ");

        runner
            .simple(&command_line, None)
            .map_err(|e| match e {
                ProcessError::CommandFailed { code, .. } => SigningError::ToolFailed {
                    tool: "codesign".to_string(),
                    reason: format!("exit code {} signing {}", code, path.display()),
                },
                other => SigningError::Process(other),
            })?;

        info!(path = %path.display(), identity = %self.identity, "signed");
        Ok(())
    }
}
