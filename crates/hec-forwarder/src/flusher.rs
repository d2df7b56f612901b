// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery of buffered events to the HTTP Event Collector.
//!
//! A flush drains one [`ForwardBuffer`] and POSTs its contents. Without a
//! batch size limit that is exactly one request. Failures are returned to the
//! caller as-is: there is no retry.

use std::io::Write;

use flate2::{write::GzEncoder, Compression};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE};
use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::aggregator::ForwardBuffer;
use crate::config::ForwarderConfig;
use crate::error::DeliveryError;
use crate::http::get_client;

/// Result of a successful flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Events delivered.
    pub events: usize,
    /// Requests issued.
    pub requests: usize,
    /// Raw body of the last collector response, if any request was made.
    pub response: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HecFlusher {
    client: reqwest::Client,
    url: String,
    token: String,
    use_compression: bool,
    max_batch_bytes: Option<usize>,
    /// Cached headers (initialized on first use).
    headers: OnceCell<HeaderMap>,
}

impl HecFlusher {
    #[must_use]
    pub fn new(config: &ForwarderConfig) -> Self {
        HecFlusher {
            client: get_client(config),
            url: config.url.clone(),
            token: config.token.clone(),
            use_compression: config.use_compression,
            max_batch_bytes: config.max_batch_bytes,
            headers: OnceCell::new(),
        }
    }

    /// Sends every buffered event.
    ///
    /// An empty buffer completes immediately without touching the network.
    /// When the buffer spans several payloads they are sent in order and the
    /// first failure ends the flush.
    pub async fn flush(&self, buffer: ForwardBuffer) -> Result<FlushOutcome, DeliveryError> {
        let events = buffer.len();
        if events == 0 {
            debug!("Nothing to flush");
            return Ok(FlushOutcome::default());
        }

        let size_bytes = buffer.size_bytes();
        let payloads = buffer.into_payloads(self.max_batch_bytes);
        debug!(
            "Flushing {events} events ({size_bytes} bytes) in {} requests",
            payloads.len()
        );

        let mut outcome = FlushOutcome {
            events,
            ..Default::default()
        };
        for payload in payloads {
            let body = self.compress(payload)?;
            let response = self.send(body).await.inspect_err(|e| {
                error!("Failed to flush {events} events to the collector: {e}");
            })?;
            outcome.requests += 1;
            outcome.response = Some(response);
        }

        debug!("Successfully flushed {events} events");
        Ok(outcome)
    }

    async fn send(&self, body: Vec<u8>) -> Result<String, DeliveryError> {
        let headers = self.get_headers().await?;
        let resp = self
            .client
            .post(&self.url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(DeliveryError::Status { status, body: text });
        }
        Ok(text)
    }

    fn compress(&self, data: Vec<u8>) -> Result<Vec<u8>, DeliveryError> {
        if !self.use_compression {
            return Ok(data);
        }
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&data)
            .map_err(DeliveryError::Compression)?;
        encoder.finish().map_err(DeliveryError::Compression)
    }

    async fn get_headers(&self) -> Result<&HeaderMap, DeliveryError> {
        self.headers
            .get_or_try_init(|| async {
                let mut headers = HeaderMap::new();
                let mut authorization =
                    HeaderValue::from_str(&format!("Splunk {}", self.token))?;
                authorization.set_sensitive(true);
                headers.insert(AUTHORIZATION, authorization);
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                if self.use_compression {
                    headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                }
                Ok::<HeaderMap, DeliveryError>(headers)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventMetadata;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn flusher(use_compression: bool) -> HecFlusher {
        let config = ForwarderConfig {
            url: "https://splunk.example.com:8088/services/collector".to_string(),
            token: "test-token".to_string(),
            use_compression,
            ..Default::default()
        };
        HecFlusher::new(&config)
    }

    #[tokio::test]
    async fn test_get_headers_without_compression() {
        let flusher = flusher(false);
        let headers = flusher.get_headers().await.unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Splunk test-token");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(!headers.contains_key(CONTENT_ENCODING));
    }

    #[tokio::test]
    async fn test_get_headers_with_compression() {
        let flusher = flusher(true);
        let headers = flusher.get_headers().await.unwrap();
        assert_eq!(headers.get(CONTENT_ENCODING).unwrap(), "gzip");
    }

    #[tokio::test]
    async fn test_invalid_token_is_a_header_error() {
        let flusher = HecFlusher::new(&ForwarderConfig {
            url: "https://splunk.example.com".to_string(),
            token: "bad\ntoken".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            flusher.get_headers().await,
            Err(DeliveryError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_flush_empty_buffer_makes_no_request() {
        // The URL is unroutable; reaching the network would fail the test.
        let config = ForwarderConfig {
            url: "http://127.0.0.1:9".to_string(),
            token: "t".to_string(),
            ..Default::default()
        };
        let flusher = HecFlusher::new(&config);

        let outcome = flusher
            .flush(ForwardBuffer::new(EventMetadata::default()))
            .await
            .unwrap();
        assert_eq!(outcome, FlushOutcome::default());
    }

    #[test]
    fn test_compress_disabled_returns_input() {
        let data = b"{\"event\":\"m\"}".to_vec();
        assert_eq!(flusher(false).compress(data.clone()).unwrap(), data);
    }

    #[test]
    fn test_compress_enabled_is_gzip() {
        let data = b"{\"event\":\"m\"}{\"event\":\"n\"}".to_vec();
        let compressed = flusher(true).compress(data.clone()).unwrap();
        assert_ne!(compressed, data);

        let mut decoded = Vec::new();
        GzDecoder::new(&compressed[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }
}
