// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Decoding of Kinesis record payloads into log events.
//!
//! Each record's `kinesis.data` is base64 of a gzip stream holding a JSON
//! [`LogsEnvelope`]. Decompression is bounded so a single record cannot
//! inflate without limit.

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::read::MultiGzDecoder;
use tracing::{debug, error};

use crate::error::DecodeError;
use crate::event::{LogEvent, LogsEnvelope};
use crate::kinesis::KinesisEvent;

/// Upper bound on the gunzipped size of one record.
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: usize = 16 * 1_024 * 1_024;

/// Events extracted from a whole invocation batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBatch {
    /// Number of records decoded.
    pub records: usize,
    /// Actionable events in record order.
    pub events: Vec<LogEvent>,
}

#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_decompressed_bytes: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder {
            max_decompressed_bytes: DEFAULT_MAX_DECOMPRESSED_BYTES,
        }
    }
}

impl Decoder {
    #[must_use]
    pub fn new(max_decompressed_bytes: usize) -> Self {
        Decoder {
            max_decompressed_bytes,
        }
    }

    /// Decodes one record payload into its envelope.
    pub fn decode_record_data(&self, data: &str) -> Result<LogsEnvelope, DecodeError> {
        let compressed = STANDARD.decode(data.trim())?;
        let json = self.gunzip(&compressed)?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Decodes every record of the batch.
    ///
    /// The first record that fails to decode fails the whole batch, so callers
    /// never see a partial result.
    pub fn decode_batch(&self, batch: &KinesisEvent) -> Result<DecodedBatch, DecodeError> {
        let mut decoded = DecodedBatch::default();

        for record in &batch.records {
            let envelope = self
                .decode_record_data(&record.kinesis.data)
                .inspect_err(|e| {
                    error!("Failed to decode record {}: {e}", record.label());
                })?;

            if !envelope.is_data_message() {
                debug!(
                    "Skipping record {} with message type {:?}",
                    record.label(),
                    envelope.message_type
                );
            }

            let events = envelope.into_log_events();
            debug!("Decoded {} log events from record {}", events.len(), record.label());
            decoded.records += 1;
            decoded.events.extend(events);
        }

        Ok(decoded)
    }

    fn gunzip(&self, compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let limit = self.max_decompressed_bytes;
        // Read one byte past the limit to detect oversized payloads.
        let budget = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        let mut reader = MultiGzDecoder::new(compressed).take(budget);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).map_err(DecodeError::Gzip)?;
        if out.len() > limit {
            return Err(DecodeError::TooLarge { limit });
        }
        Ok(out)
    }
}
