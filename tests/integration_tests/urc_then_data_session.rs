// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use atcmd_engine::RespResult;

use crate::integration_tests::common;

/// A URC announcing "N bytes follow" hands off to a freshly armed data
/// session for the binary payload that comes right after it. The handoff
/// happens through a channel, not a direct call from inside the URC
/// callback, since the callback already runs under the instance's lock.
#[tokio::test(start_paused = true)]
async fn urc_announces_a_payload_then_a_data_session_captures_it() {
    let (engine, _clock, _transport, handle) = common::setup();

    let (announce_tx, mut announce_rx) = tokio::sync::mpsc::unbounded_channel::<usize>();
    engine
        .register_urc(
            handle,
            b"+IPD,",
            b":",
            8,
            Box::new(move |body| {
                let digits = String::from_utf8_lossy(body);
                if let Ok(n) = digits.parse::<usize>() {
                    let _ = announce_tx.send(n);
                }
            }),
        )
        .expect("register_urc");

    engine.receive(handle, b"+IPD,5:");
    common::pump().await;

    let payload_len = tokio::time::timeout(Duration::from_secs(1), announce_rx.recv())
        .await
        .expect("urc did not announce a payload")
        .expect("channel closed");
    assert_eq!(payload_len, 5);

    let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel::<(RespResult, Vec<u8>)>();
    engine
        .set_wait_data_callback(
            handle,
            payload_len,
            5_000,
            Box::new(move |result, bytes: &[u8]| {
                let _ = data_tx.send((result, bytes.to_vec()));
            }),
        )
        .expect("set_wait_data_callback");

    engine.receive(handle, b"HELLO");
    common::pump().await;

    let (result, bytes) = tokio::time::timeout(Duration::from_secs(1), data_rx.recv())
        .await
        .expect("data session did not complete")
        .expect("channel closed");
    assert_eq!(result, RespResult::Ok);
    assert_eq!(bytes, b"HELLO");
}
