//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{
    ArchiveCommand, BuildCommand, ConfigureCommand, PackageCommand, PackageManyCommand,
    TestCommand, UploadSymbolsCommand,
};

/// agbuild - AudioGridder build and release orchestrator
#[derive(Debug, Parser)]
#[command(name = "agbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the build tree with CMake
    Configure(ConfigureCommand),

    /// Compile a configured build tree
    Build(BuildCommand),

    /// Create installers and archives for one build
    Package(PackageCommand),

    /// Package several platform identities in one go
    PackageMany(PackageManyCommand),

    /// Upload debug symbols to Sentry
    UploadSymbols(UploadSymbolsCommand),

    /// Copy debug symbols into a release archive
    Archive(ArchiveCommand),

    /// Run the test binaries
    Test(TestCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Configure(ref cmd) => cmd.execute(&self),
            Commands::Build(ref cmd) => cmd.execute(&self),
            Commands::Package(ref cmd) => cmd.execute(&self),
            Commands::PackageMany(ref cmd) => cmd.execute(&self),
            Commands::UploadSymbols(ref cmd) => cmd.execute(&self),
            Commands::Archive(ref cmd) => cmd.execute(&self),
            Commands::Test(ref cmd) => cmd.execute(&self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_names() {
        let cli = Cli::parse_from(["agbuild", "package-many", "--platforms", "linux-x86_64"]);
        assert!(matches!(cli.command, Commands::PackageMany(_)));

        let cli = Cli::parse_from([
            "agbuild",
            "-C",
            "/tmp",
            "upload-symbols",
            "--sentry-auth-token",
            "tok",
        ]);
        assert!(matches!(cli.command, Commands::UploadSymbols(_)));
        assert_eq!(cli.directory.as_deref(), Some(std::path::Path::new("/tmp")));
    }
}
