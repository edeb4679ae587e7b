//! Options for signing an artifact

/// Options for signing an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOptions {
    /// Replace an existing signature
    pub force: bool,

    /// Request a secure timestamp. When false `--timestamp=none` is passed.
    pub timestamp: bool,

    /// Sign nested code
    pub deep: bool,

    /// Enable the hardened runtime
    pub hardened_runtime: bool,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            force: true,
            timestamp: false,
            deep: false,
            hardened_runtime: false,
        }
    }
}
