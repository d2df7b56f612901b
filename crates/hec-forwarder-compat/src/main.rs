// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Runs the forwarder over invocation events read from stdin.
//!
//! Each line of input is one Kinesis invocation event. The summary of every
//! invocation is printed on stdout; failures are logged and make the process
//! exit non-zero once input is exhausted.

use std::process::ExitCode;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use hec_forwarder::{
    config::ForwarderConfig,
    handler::{handle_batch, Forwarder},
    kinesis::KinesisEvent,
    logger::Formatter,
};

#[tokio::main]
pub async fn main() -> ExitCode {
    let config = match ForwarderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading forwarder configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", config.log_level);
    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Could not parse log level in configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(Formatter)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    debug!("Logging subsystem enabled");

    let forwarder = Forwarder::new(config);
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut failed = false;
    let mut invocation = 0_u64;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read invocation event: {e}");
                failed = true;
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        invocation += 1;

        let batch: KinesisEvent = match serde_json::from_str(&line) {
            Ok(batch) => batch,
            Err(e) => {
                error!("Invocation {invocation} is not a Kinesis event: {e}");
                failed = true;
                continue;
            }
        };

        let span = info_span!("invocation", id = invocation, records = batch.records.len());
        match handle_batch(&batch, &forwarder).instrument(span).await {
            Ok(summary) => {
                let written = stdout
                    .write_all(format!("{summary}\n").as_bytes())
                    .await;
                if let Err(e) = written {
                    error!("Failed to write invocation summary: {e}");
                }
            }
            Err(e) => {
                error!("Invocation {invocation} failed: {e}");
                failed = true;
            }
        }
    }

    if let Err(e) = stdout.flush().await {
        error!("Failed to flush stdout: {e}");
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
