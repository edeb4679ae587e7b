//! Wrapping test binaries in a batch-mode debugger
//!
//! A crashing test binary never prints its own backtrace. Running it under
//! lldb or gdb in batch mode makes the debugger print one for every thread
//! before quitting, and the debugger's "process exited" line becomes the
//! success marker for the monitored run.

use agbuild_core::Platform;

/// Host debugger able to run a binary non-interactively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debugger {
    Lldb,
    Gdb,
}

impl Debugger {
    /// The debugger used on a platform, if it has one
    pub fn for_platform(platform: Platform) -> Option<Self> {
        match platform {
            Platform::MacOs => Some(Self::Lldb),
            Platform::Linux => Some(Self::Gdb),
            Platform::Windows => None,
        }
    }

    /// The platform's debugger if `available` finds it
    pub fn detect(platform: Platform, available: impl Fn(&str) -> bool) -> Option<Self> {
        Self::for_platform(platform).filter(|d| available(d.program()))
    }

    pub fn program(&self) -> &'static str {
        match self {
            Self::Lldb => "lldb",
            Self::Gdb => "gdb",
        }
    }

    /// Line fragment printed when the debugged process exited cleanly
    pub fn success_marker(&self) -> &'static str {
        match self {
            Self::Lldb => "exited with status = 0",
            Self::Gdb => "exited normally",
        }
    }

    /// Command vector running `binary` and dumping all thread backtraces if
    /// it stops
    pub fn wrap(&self, binary: &str) -> Vec<String> {
        let args: &[&str] = match self {
            Self::Lldb => &[
                "lldb",
                "--batch",
                "-o",
                "run",
                "-k",
                "thread backtrace all",
                "-k",
                "quit",
                "--",
            ],
            Self::Gdb => &[
                "gdb",
                "-batch",
                "-ex",
                "run",
                "-ex",
                "thread apply all bt",
                "--args",
            ],
        };
        args.iter()
            .map(|a| a.to_string())
            .chain(std::iter::once(binary.to_string()))
            .collect()
    }
}

/// Whether `program` can be found on `PATH`
pub fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_debuggers() {
        assert_eq!(Debugger::for_platform(Platform::MacOs), Some(Debugger::Lldb));
        assert_eq!(Debugger::for_platform(Platform::Linux), Some(Debugger::Gdb));
        assert_eq!(Debugger::for_platform(Platform::Windows), None);
    }

    #[test]
    fn test_detect_requires_program() {
        assert_eq!(Debugger::detect(Platform::Linux, |_| false), None);
        assert_eq!(
            Debugger::detect(Platform::Linux, |p| p == "gdb"),
            Some(Debugger::Gdb)
        );
        assert_eq!(Debugger::detect(Platform::Windows, |_| true), None);
    }

    #[test]
    fn test_lldb_wrap() {
        assert_eq!(
            Debugger::Lldb.wrap("/b/bin/TestsServer").join(" "),
            "lldb --batch -o run -k thread backtrace all -k quit -- /b/bin/TestsServer"
        );
    }

    #[test]
    fn test_gdb_wrap() {
        let argv = Debugger::Gdb.wrap("TestsPluginFx");
        assert_eq!(argv[5], "thread apply all bt");
        assert_eq!(argv.last().map(String::as_str), Some("TestsPluginFx"));
    }
}
