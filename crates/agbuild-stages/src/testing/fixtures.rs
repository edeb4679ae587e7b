//! Third-party plugin fixtures used by the test binaries

use std::path::Path;

use reqwest::Client;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{Result, StageError};
use crate::zipfile;

/// Download and unpack the fixture archives unless `data_dir` exists.
///
/// Returns `false` when the directory was already present and nothing was
/// fetched. Archives are unpacked into a sibling staging directory that is
/// moved to `data_dir` only once every fixture is in place, so a failed
/// download leaves nothing behind and the next run tries again.
/// Certificate and hostname checks are disabled for the fixture host.
pub async fn ensure_fixtures(data_dir: &Path, base_url: &str, names: &[String]) -> Result<bool> {
    if data_dir.exists() {
        debug!(dir = %data_dir.display(), "test data present");
        return Ok(false);
    }
    let parent = match data_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let staging = TempDir::new_in(parent)?;

    let client = Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|e| StageError::Download {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

    for name in names {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), name);
        info!(url = %url, "downloading test fixture");
        let bytes = fetch(&client, &url).await?;

        let archive = staging.path().join(name);
        std::fs::write(&archive, &bytes)?;
        zipfile::extract(&archive, staging.path())?;
        std::fs::remove_file(&archive)?;
    }

    std::fs::rename(staging.path(), data_dir)?;
    debug!(dir = %data_dir.display(), "test data unpacked");
    Ok(true)
}

async fn fetch(client: &Client, url: &str) -> Result<Vec<u8>> {
    let download_error = |message: String| StageError::Download {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| download_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(download_error(format!("HTTP {}", status)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| download_error(e.to_string()))?;
    Ok(bytes.to_vec())
}
