// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-invocation entry point.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::aggregator::ForwardBuffer;
use crate::config::ForwarderConfig;
use crate::decoder::Decoder;
use crate::error::{DeliveryError, HandlerError};
use crate::event::EventMetadata;
use crate::flusher::HecFlusher;
use crate::kinesis::KinesisEvent;

/// Process-wide state shared by every invocation.
///
/// Built once at startup; invocations only borrow it, and each one gets a
/// fresh [`ForwardBuffer`].
#[derive(Debug, Clone)]
pub struct Forwarder {
    config: Arc<ForwarderConfig>,
    decoder: Decoder,
    flusher: HecFlusher,
}

impl Forwarder {
    #[must_use]
    pub fn new(config: ForwarderConfig) -> Self {
        let flusher = HecFlusher::new(&config);
        Forwarder {
            decoder: Decoder::new(config.max_decompressed_bytes),
            config: Arc::new(config),
            flusher,
        }
    }

    /// Starts an empty buffer carrying the configured event defaults.
    #[must_use]
    pub fn new_buffer(&self) -> ForwardBuffer {
        ForwardBuffer::new(self.config.defaults.clone())
    }

    #[must_use]
    pub fn flusher(&self) -> &HecFlusher {
        &self.flusher
    }
}

/// Outcome reported back to the invoking runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSummary {
    /// Records decoded from the batch.
    pub records: usize,
    /// Log events delivered to the collector.
    pub events_forwarded: usize,
    /// Raw collector response, absent when nothing was sent.
    pub response: Option<String>,
}

impl fmt::Display for InvocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully processed {} log event(s) from {} record(s).",
            self.events_forwarded, self.records
        )
    }
}

/// Decodes every record of `batch` and forwards its log events in one flush.
///
/// A record that fails to decode fails the invocation before anything is
/// sent. Each event carries its own timestamp as the HEC `time`.
pub async fn handle_batch(
    batch: &KinesisEvent,
    forwarder: &Forwarder,
) -> Result<InvocationSummary, HandlerError> {
    debug!("Received batch of {} records", batch.records.len());

    let decoded = forwarder.decoder.decode_batch(batch)?;

    let mut buffer = forwarder.new_buffer();
    for event in &decoded.events {
        let overrides = EventMetadata {
            time: Some(event.epoch_seconds()),
            ..Default::default()
        };
        buffer
            .accumulate(event, overrides)
            .map_err(DeliveryError::from)?;
    }

    let outcome = forwarder.flusher.flush(buffer).await.inspect_err(|e| {
        error!("Failed to forward {} log events: {e}", decoded.events.len());
    })?;

    let summary = InvocationSummary {
        records: decoded.records,
        events_forwarded: outcome.events,
        response: outcome.response,
    };
    info!("{summary}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinesis::KinesisEventRecord;

    fn forwarder() -> Forwarder {
        Forwarder::new(ForwarderConfig {
            url: "http://127.0.0.1:9/services/collector".to_string(),
            token: "test-token".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_summary_display() {
        let summary = InvocationSummary {
            records: 2,
            events_forwarded: 5,
            response: None,
        };
        assert_eq!(
            summary.to_string(),
            "Successfully processed 5 log event(s) from 2 record(s)."
        );
    }

    #[test]
    fn test_new_buffer_uses_configured_defaults() {
        let forwarder = Forwarder::new(ForwarderConfig {
            url: "http://localhost".to_string(),
            token: "t".to_string(),
            defaults: EventMetadata {
                index: Some("main".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        let mut buffer = forwarder.new_buffer();
        buffer.accumulate("m", EventMetadata::default()).unwrap();
        assert_eq!(
            buffer.into_payloads(None),
            vec![br#"{"index":"main","event":"m"}"#.to_vec()]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let summary = handle_batch(&KinesisEvent::default(), &forwarder())
            .await
            .unwrap();
        assert_eq!(summary.records, 0);
        assert_eq!(summary.events_forwarded, 0);
        assert_eq!(summary.response, None);
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() {
        let batch = KinesisEvent {
            records: vec![KinesisEventRecord::new("!!!")],
        };
        let result = handle_batch(&batch, &forwarder()).await;
        assert!(matches!(result, Err(HandlerError::Decode(_))));
    }
}
