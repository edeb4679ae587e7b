//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_signing(config)?;
    validate_sentry(config)?;
    validate_tests(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_signing(config: &Config) -> Result<()> {
    if config.signing.identity.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "signing.identity".to_string(),
            message: "identity cannot be empty".to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_sentry(config: &Config) -> Result<()> {
    if config.sentry.org.is_empty() || config.sentry.project.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "sentry".to_string(),
            message: "org and project must both be set".to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_tests(config: &Config) -> Result<()> {
    if config.tests.log_tail_lines == 0 {
        return Err(ConfigError::InvalidValue {
            field: "tests.log_tail_lines".to_string(),
            message: "must be at least 1".to_string(),
        }
        .into());
    }

    if let Err(e) = url::Url::parse(&config.tests.fixtures_url) {
        return Err(ConfigError::InvalidValue {
            field: "tests.fixtures_url".to_string(),
            message: e.to_string(),
        }
        .into());
    }

    Ok(())
}
