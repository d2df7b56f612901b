// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-invocation buffer of serialized HEC events.
//!
//! The collector accepts a stream of JSON objects with nothing between them,
//! so a payload is the plain concatenation of the buffered entries:
//!
//! ```json
//! {"event":{"message":"Log entry 1"}}{"event":{"message":"Log entry 2"}}
//! ```

use serde::Serialize;
use tracing::warn;

use crate::event::{EventMetadata, HecEvent};

/// Serialized events waiting for a flush.
///
/// A buffer belongs to one invocation and is consumed by
/// [`ForwardBuffer::into_payloads`]; nothing caps how many entries it holds.
#[derive(Debug, Clone, Default)]
pub struct ForwardBuffer {
    entries: Vec<String>,
    defaults: EventMetadata,
    size_bytes: usize,
}

impl ForwardBuffer {
    #[must_use]
    pub fn new(defaults: EventMetadata) -> Self {
        ForwardBuffer {
            entries: Vec::new(),
            defaults,
            size_bytes: 0,
        }
    }

    /// Wraps `value` as the `event` of a new HEC event and buffers it.
    ///
    /// `overrides` take precedence over the configured defaults field by field.
    pub fn accumulate<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        overrides: EventMetadata,
    ) -> Result<(), serde_json::Error> {
        let event = HecEvent::new(serde_json::to_value(value)?, overrides.or(&self.defaults));
        self.push(&event)
    }

    /// Buffers an already shaped event, filling unset attributes from the defaults.
    pub fn accumulate_hec_event(&mut self, event: HecEvent) -> Result<(), serde_json::Error> {
        let metadata = EventMetadata {
            time: event.time,
            host: event.host,
            source: event.source,
            sourcetype: event.sourcetype,
            index: event.index,
        }
        .or(&self.defaults);
        self.push(&HecEvent::new(event.event, metadata))
    }

    fn push(&mut self, event: &HecEvent) -> Result<(), serde_json::Error> {
        let serialized = serde_json::to_string(event)?;
        self.size_bytes += serialized.len();
        self.entries.push(serialized);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total serialized size of the buffered entries.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Drains the buffer into request bodies.
    ///
    /// Without a limit every entry goes into a single payload. With a limit,
    /// entries are packed in order into payloads of at most `max_batch_bytes`;
    /// an entry larger than the limit is sent on its own.
    #[must_use]
    pub fn into_payloads(self, max_batch_bytes: Option<usize>) -> Vec<Vec<u8>> {
        if self.entries.is_empty() {
            return Vec::new();
        }

        let Some(limit) = max_batch_bytes else {
            let mut payload = Vec::with_capacity(self.size_bytes);
            for entry in &self.entries {
                payload.extend_from_slice(entry.as_bytes());
            }
            return vec![payload];
        };

        let mut payloads = Vec::new();
        let mut current: Vec<u8> = Vec::new();
        for entry in self.entries {
            if entry.len() > limit {
                warn!(
                    "Event of {} bytes exceeds the batch limit of {} bytes, sending it alone",
                    entry.len(),
                    limit
                );
            }
            if !current.is_empty() && current.len() + entry.len() > limit {
                payloads.push(std::mem::take(&mut current));
            }
            current.extend_from_slice(entry.as_bytes());
        }
        if !current.is_empty() {
            payloads.push(current);
        }
        payloads
    }
}
