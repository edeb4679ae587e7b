//! Output formatting utilities

use console::{style, Style};

use agbuild_stages::Artifact;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Print produced artifacts with their size
pub fn artifacts(artifacts: &[Artifact]) {
    if artifacts.is_empty() {
        return;
    }
    println!();
    println!("{}:", style("Artifacts").bold());
    for artifact in artifacts {
        println!(
            "  • {} {}",
            path_style().apply_to(artifact.path.display()),
            style(artifact_detail(artifact)).dim()
        );
    }
}

/// Kind, size and short digest of an artifact
fn artifact_detail(artifact: &Artifact) -> String {
    match artifact.short_sha256() {
        Some(digest) => format!("{} {} sha256:{}", artifact.kind, format_size(artifact.size), digest),
        None => format!("{} {}", artifact.kind, format_size(artifact.size)),
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
