use crate::ops::transport::DEFAULT_BASE_URL;
use crate::utils::retryable::RetryOptions;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "LARKBASE";

/// Bounds applied to the page size of a single-page list request.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PageSizeBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for PageSizeBounds {
    fn default() -> Self {
        Self { min: 1, max: 500 }
    }
}

impl PageSizeBounds {
    pub fn clamp(&self, limit: u32) -> u32 {
        limit.max(self.min).min(self.max)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub slow_request_warn_secs: u64,
    pub page_size: PageSizeBounds,
    pub retry: RetryOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            slow_request_warn_secs: 30,
            page_size: PageSizeBounds::default(),
            retry: RetryOptions::default(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional file, overridden by `LARKBASE__*` environment variables.
    ///
    /// Nested keys use `__` as separator, e.g. `LARKBASE__PAGE_SIZE__MAX=200`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        let settings: Settings = builder
            .build()
            .context("failed to load settings")?
            .try_deserialize()
            .context("invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be positive");
        }
        if self.page_size.min == 0 || self.page_size.min > self.page_size.max {
            bail!(
                "invalid page size bounds [{}, {}]",
                self.page_size.min,
                self.page_size.max
            );
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_secs(self.slow_request_warn_secs)
    }
}
