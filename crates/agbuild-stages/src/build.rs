//! Build stage: compile a configured tree

use agbuild_core::Platform;
use agbuild_process::{quote_arg, Runner};
use tracing::info;

use crate::context::BuildContext;
use crate::error::Result;
use crate::symbols;

/// `cmake --build ...` for a context
pub fn build_command(ctx: &BuildContext) -> String {
    let mut params = vec![format!("--build {}", quote_arg(&ctx.target.build_dir_arg()))];

    if ctx.target.identity.platform == Platform::Windows {
        params.push(format!("--config {}", quote_arg(&ctx.build_type)));
    }

    if ctx.parallel {
        params.push("--parallel".to_string());
    } else if ctx.jobs > 0 {
        params.push(format!("-j {}", ctx.jobs));
    }

    if let Some(target) = &ctx.build_target {
        params.push(format!("--target {}", quote_arg(target)));
    }
    if ctx.clean {
        params.push("--clean-first".to_string());
    }
    if ctx.verbose {
        params.push("--verbose".to_string());
    }

    format!("cmake {}", params.join(" "))
}

/// Run the build, then extract debug symbols if requested
pub fn build(ctx: &BuildContext, runner: &dyn Runner) -> Result<()> {
    info!(identity = %ctx.target.identity, "building");
    runner.simple(&build_command(ctx), Some(ctx.target.root.as_path()))?;

    if ctx.debug_symbols {
        symbols::create_debug_symbols(&ctx.target, runner)?;
    }
    Ok(())
}
