// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwards CloudWatch Logs subscription batches delivered through Kinesis to a
//! Splunk HTTP Event Collector (HEC).
//!
//! # Pipeline
//!
//! ```text
//!   KinesisEvent (Records[].kinesis.data)
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Decoder    │  (base64 -> gunzip -> JSON envelope)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │ ForwardBuffer│  (one serialized HEC event per log event)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │  HecFlusher  │  (single HTTP POST)
//!   └──────────────┘
//! ```
//!
//! Every invocation gets its own [`aggregator::ForwardBuffer`]. The
//! [`handler::Forwarder`] holding configuration and the HTTP client is built
//! once at process start and shared by reference.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod aggregator;
pub mod config;
pub mod decoder;
pub mod error;
pub mod event;
pub mod flusher;
pub mod handler;
pub mod http;
pub mod kinesis;
pub mod logger;
