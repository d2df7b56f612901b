// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;

use crate::decoder::DEFAULT_MAX_DECOMPRESSED_BYTES;
use crate::error::ConfigError;
use crate::event::EventMetadata;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for forwarding logs to an HTTP Event Collector
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// Full collector URL, e.g. `https://splunk.example.com:8088/services/collector`
    pub url: String,
    /// HEC token sent as `Authorization: Splunk <token>`
    pub token: String,
    /// host/source/sourcetype/index applied to every event unless overridden
    pub defaults: EventMetadata,
    /// Timeout for the flush request
    pub timeout: Duration,
    /// Gzip request bodies
    pub use_compression: bool,
    /// Split flushes into requests no larger than this many bytes
    pub max_batch_bytes: Option<usize>,
    /// Reject records whose payload inflates beyond this many bytes
    pub max_decompressed_bytes: usize,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            defaults: EventMetadata::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_compression: false,
            max_batch_bytes: None,
            max_decompressed_bytes: DEFAULT_MAX_DECOMPRESSED_BYTES,
            https_proxy: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ForwarderConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let url = non_empty("SPLUNK_HEC_URL").ok_or(ConfigError::Missing("SPLUNK_HEC_URL"))?;
        let token =
            non_empty("SPLUNK_HEC_TOKEN").ok_or(ConfigError::Missing("SPLUNK_HEC_TOKEN"))?;

        let defaults = EventMetadata {
            time: None,
            host: non_empty("SPLUNK_HEC_HOST"),
            source: non_empty("SPLUNK_HEC_SOURCE"),
            sourcetype: non_empty("SPLUNK_HEC_SOURCETYPE"),
            index: non_empty("SPLUNK_HEC_INDEX"),
        };

        let timeout = match non_empty("HEC_TIMEOUT_SECS") {
            Some(val) => Duration::from_secs(parse_number("HEC_TIMEOUT_SECS", &val)?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let use_compression = non_empty("HEC_USE_COMPRESSION")
            .map(|val| val.to_lowercase() == "true")
            .unwrap_or(false);
        let max_batch_bytes = non_empty("HEC_MAX_BATCH_BYTES")
            .map(|val| parse_number("HEC_MAX_BATCH_BYTES", &val))
            .transpose()?;
        let max_decompressed_bytes = non_empty("HEC_MAX_DECOMPRESSED_BYTES")
            .map(|val| parse_number("HEC_MAX_DECOMPRESSED_BYTES", &val))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_DECOMPRESSED_BYTES);
        let https_proxy = non_empty("HEC_PROXY_HTTPS").or_else(|| non_empty("HTTPS_PROXY"));
        let log_level = non_empty("HEC_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            url: url.trim().to_string(),
            token: token.trim().to_string(),
            defaults,
            timeout,
            use_compression,
            max_batch_bytes,
            max_decompressed_bytes,
            https_proxy,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Missing("SPLUNK_HEC_URL"));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "SPLUNK_HEC_URL",
                reason: format!("'{}' is not an http(s) URL", self.url),
            });
        }

        if self.token.is_empty() {
            return Err(ConfigError::Missing("SPLUNK_HEC_TOKEN"));
        }

        if self.max_batch_bytes == Some(0) {
            return Err(ConfigError::Invalid {
                var: "HEC_MAX_BATCH_BYTES",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.max_decompressed_bytes == 0 {
            return Err(ConfigError::Invalid {
                var: "HEC_MAX_DECOMPRESSED_BYTES",
                reason: "must be greater than 0".to_string(),
            });
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid {
                var: "HEC_LOG_LEVEL",
                reason: format!(
                    "'{}' must be one of: trace, debug, info, warn, error",
                    self.log_level
                ),
            });
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, val: &str) -> Result<T, ConfigError> {
    val.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        var,
        reason: format!("'{val}' is not a valid number"),
    })
}
