// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log payload types on both sides of the forwarder.
//!
//! [`LogsEnvelope`] and [`LogEvent`] mirror the JSON document CloudWatch Logs
//! writes into each subscription record. [`HecEvent`] is the shape the HTTP
//! Event Collector accepts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminator of envelopes that carry log content.
pub const DATA_MESSAGE: &str = "DATA_MESSAGE";

/// Decoded content of one subscription record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsEnvelope {
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscription_filters: Vec<String>,
    #[serde(default)]
    pub log_events: Option<Vec<LogEvent>>,
}

impl LogsEnvelope {
    #[must_use]
    pub fn is_data_message(&self) -> bool {
        self.message_type.as_deref() == Some(DATA_MESSAGE)
    }

    /// Consumes the envelope, returning the events worth forwarding.
    ///
    /// Control messages and envelopes without `logEvents` yield nothing.
    #[must_use]
    pub fn into_log_events(self) -> Vec<LogEvent> {
        if !self.is_data_message() {
            return Vec::new();
        }
        self.log_events.unwrap_or_default()
    }
}

/// A single log line.
///
/// Fields other than `timestamp` and `message` (CloudWatch adds `id`) are kept
/// verbatim in `extra` and serialized back next to them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogEvent {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogEvent {
    #[must_use]
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        LogEvent {
            timestamp,
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Event timestamp in epoch seconds, the unit the collector expects.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn epoch_seconds(&self) -> f64 {
        self.timestamp as f64 / 1000.0
    }
}

/// Optional HEC attributes attached to an event.
///
/// Fields left as `None` are omitted on the wire so the collector falls back
/// to the token's configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventMetadata {
    pub time: Option<f64>,
    pub host: Option<String>,
    pub source: Option<String>,
    pub sourcetype: Option<String>,
    pub index: Option<String>,
}

impl EventMetadata {
    /// Field-by-field merge where values set on `self` win over `defaults`.
    #[must_use]
    pub fn or(self, defaults: &EventMetadata) -> EventMetadata {
        EventMetadata {
            time: self.time.or(defaults.time),
            host: self.host.or_else(|| defaults.host.clone()),
            source: self.source.or_else(|| defaults.source.clone()),
            sourcetype: self.sourcetype.or_else(|| defaults.sourcetype.clone()),
            index: self.index.or_else(|| defaults.index.clone()),
        }
    }
}

/// Event as accepted by the collector's `/services/collector/event` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HecEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sourcetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub event: Value,
}

impl HecEvent {
    #[must_use]
    pub fn new(event: Value, metadata: EventMetadata) -> Self {
        HecEvent {
            time: metadata.time,
            host: metadata.host,
            source: metadata.source,
            sourcetype: metadata.sourcetype,
            index: metadata.index,
            event,
        }
    }
}
