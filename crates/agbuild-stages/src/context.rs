//! Execution contexts for the pipeline stages
//!
//! Each context carries everything one stage needs. Relative paths in a
//! context (the build directory in particular) are resolved against `root`,
//! and commands run with `root` as their working directory.

use std::path::{Path, PathBuf};

use agbuild_core::{BuildIdentity, BuildLayout};
use agbuild_signing::MacOSSigner;

/// Project root plus the identity and layout of the build being worked on
#[derive(Debug, Clone)]
pub struct Target {
    pub root: PathBuf,
    pub identity: BuildIdentity,
    pub layout: BuildLayout,
}

impl Target {
    pub fn new(root: impl Into<PathBuf>, identity: BuildIdentity, layout: BuildLayout) -> Self {
        Self {
            root: root.into(),
            identity,
            layout,
        }
    }

    /// Resolve a path against the project root
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Build directory as it appears on command lines
    pub fn build_dir_arg(&self) -> String {
        self.layout.build_dir.to_string_lossy().replace('\\', "/")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.path(&self.layout.build_dir)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path(self.layout.bin_dir())
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.path(self.layout.lib_dir())
    }

    pub fn debug_symbols_dir(&self) -> PathBuf {
        self.path(&self.layout.debug_symbols_dir)
    }
}

/// Code signing settings for configure
#[derive(Debug, Clone)]
pub struct SigningContext {
    pub signer: MacOSSigner,
    /// Unlock the keychain with this password before signing
    pub keychain_password: Option<String>,
}

/// Configure context - everything needed to generate the build tree
#[derive(Debug, Clone)]
pub struct ConfigureContext {
    pub target: Target,

    /// CMake build type, e.g. RelWithDebInfo
    pub build_type: String,

    /// Absolute per-identity dependency directory
    pub deps_dir: String,

    /// SDK root enabling VST2 and AAX, if available
    pub sdks_dir: Option<String>,

    /// macOS SDK of the bound toolchain
    pub sysroot: Option<PathBuf>,

    pub sentry_dsn: Option<String>,

    /// `None` disables code signing
    pub signing: Option<SigningContext>,

    /// Copy plugins into the system plugin folders after Debug builds
    pub copy_step: bool,

    /// Absolute test data directory, enables the test targets
    pub tests_data: Option<String>,

    /// Build with the address sanitizer
    pub sanitizer: bool,

    /// Write the parameters to the editor settings instead of running CMake
    pub editor_settings: bool,
}

/// Build context - options for compiling an already configured tree
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub target: Target,
    pub build_type: String,
    /// Specific CMake target
    pub build_target: Option<String>,
    pub clean: bool,
    pub parallel: bool,
    /// Explicit job count, ignored when 0 or when `parallel` is set
    pub jobs: usize,
    pub verbose: bool,
    pub debug_symbols: bool,
}

/// Test context - where the test binaries are and how to run them
#[derive(Debug, Clone)]
pub struct TestContext {
    pub target: Target,

    /// Only echo output lines containing this substring
    pub output_filter: Option<String>,

    /// Run the binaries under lldb or gdb if available
    pub use_debugger: bool,

    /// Trailing lines echoed from a failed run
    pub tail_lines: usize,
}
