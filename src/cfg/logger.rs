// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Tracing subscriber setup, trimmed down from the teacher's logger to what
//! this crate's surface needs: an `RUST_LOG`-driven filter and a choice
//! between stdout and a rolling file appender.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a global subscriber writing to stdout, honoring `RUST_LOG`
/// (falling back to `info`).
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

/// Installs a global subscriber writing to a daily-rolling file under
/// `dir`. The returned guard must be kept alive for the duration of the
/// program; dropping it stops the background flush thread.
pub fn init_file_logger(dir: impl AsRef<Path>, file_prefix: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let appender = tracing_appender::rolling::daily(dir, file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}
