// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Invocation input delivered by a Kinesis event source mapping.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KinesisEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<KinesisEventRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KinesisEventRecord {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(rename = "eventSource", default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    pub kinesis: KinesisRecord,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisRecord {
    /// Base64 of a gzip stream whose content is a JSON logs envelope.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

impl KinesisEventRecord {
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        KinesisEventRecord {
            event_id: None,
            event_source: None,
            kinesis: KinesisRecord {
                data: data.into(),
                partition_key: None,
                sequence_number: None,
            },
        }
    }

    /// Identifier used in log lines; prefers the sequence number.
    #[must_use]
    pub fn label(&self) -> &str {
        self.kinesis
            .sequence_number
            .as_deref()
            .or(self.event_id.as_deref())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_lambda_event() {
        let raw = r#"{
            "Records": [
                {
                    "kinesis": {
                        "kinesisSchemaVersion": "1.0",
                        "partitionKey": "1",
                        "sequenceNumber": "49590338271490256608559692538361571095921575989136588898",
                        "data": "SGVsbG8=",
                        "approximateArrivalTimestamp": 1545084650.987
                    },
                    "eventSource": "aws:kinesis",
                    "eventVersion": "1.0",
                    "eventID": "shardId-000000000006:49590338271490256608559692538361571095921575989136588898",
                    "eventName": "aws:kinesis:record",
                    "awsRegion": "us-east-2"
                }
            ]
        }"#;

        let event: KinesisEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.records.len(), 1);
        let record = &event.records[0];
        assert_eq!(record.kinesis.data, "SGVsbG8=");
        assert_eq!(record.event_source.as_deref(), Some("aws:kinesis"));
        assert_eq!(
            record.label(),
            "49590338271490256608559692538361571095921575989136588898"
        );
    }

    #[test]
    fn test_missing_records_is_empty_batch() {
        let event: KinesisEvent = serde_json::from_str("{}").unwrap();
        assert!(event.records.is_empty());
    }

    #[test]
    fn test_record_without_data_is_rejected() {
        let result = serde_json::from_str::<KinesisEvent>(r#"{"Records":[{"kinesis":{}}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_label_fallback() {
        assert_eq!(KinesisEventRecord::new("").label(), "unknown");
    }
}
