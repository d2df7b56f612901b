// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helper functions for building invocation events

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::{write::GzEncoder, Compression};
use hec_forwarder::config::ForwarderConfig;
use hec_forwarder::kinesis::{KinesisEvent, KinesisEventRecord};
use serde_json::{json, Value};
use std::io::Write;

pub const TOKEN: &str = "11111111-2222-3333-4444-555555555555";
pub const COLLECTOR_PATH: &str = "/services/collector";
pub const SUCCESS_BODY: &str = r#"{"text":"Success","code":0}"#;

/// Gzip and base64 a JSON document the way CloudWatch Logs does
pub fn encode_record_data(payload: &Value) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(payload.to_string().as_bytes())
        .expect("Failed to gzip payload");
    STANDARD.encode(encoder.finish().expect("Failed to finish gzip stream"))
}

/// A DATA_MESSAGE envelope with one event per message
pub fn data_message(messages: &[&str]) -> Value {
    let log_events: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            json!({
                "id": format!("3719599000000000000000000000000000000000000000000000000{i}"),
                "timestamp": 1_690_000_000_000_i64 + i as i64,
                "message": message,
            })
        })
        .collect();
    json!({
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": "/aws/lambda/checkout",
        "logStream": "2023/07/22/[$LATEST]0123456789abcdef",
        "subscriptionFilters": ["splunk"],
        "logEvents": log_events,
    })
}

pub fn batch_of(payloads: &[Value]) -> KinesisEvent {
    KinesisEvent {
        records: payloads
            .iter()
            .map(|payload| KinesisEventRecord::new(encode_record_data(payload)))
            .collect(),
    }
}

pub fn config_for(url: String) -> ForwarderConfig {
    ForwarderConfig {
        url: format!("{url}{COLLECTOR_PATH}"),
        token: TOKEN.to_string(),
        ..Default::default()
    }
}
