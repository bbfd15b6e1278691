// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{sync::Arc, time::Duration};

use atcmd_engine::{AtEngine, InstanceHandle, cfg::EngineConfig, clock::FakeClock, transport::RecordingTransport};

/// A one-millisecond tick keeps the background drain/supervisor tasks
/// responsive to `pump()`'s virtual-time advances without the tests having
/// to wait on real wall-clock time.
pub fn setup() -> (Arc<AtEngine>, Arc<FakeClock>, Arc<RecordingTransport>, InstanceHandle) {
    let clock = FakeClock::new();
    let engine = AtEngine::with_clock(
        EngineConfig {
            tick_ms: 1,
            ..EngineConfig::default()
        },
        clock.clone(),
    );
    let transport = Arc::new(RecordingTransport::new());
    let handle = engine.create(transport.clone()).expect("create instance");
    (engine, clock, transport, handle)
}

/// Advances tokio's paused virtual clock far enough for at least one drain
/// and one supervisor tick to run.
pub async fn pump() {
    tokio::time::advance(Duration::from_millis(5)).await;
}
