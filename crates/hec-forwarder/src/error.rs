// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Errors raised while turning a record payload into a logs envelope
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to gunzip payload: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("Decompressed payload exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Invalid logs envelope: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while delivering buffered events to the collector
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to compress payload: {0}")]
    Compression(#[source] std::io::Error),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Collector responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Failure of a whole invocation
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
