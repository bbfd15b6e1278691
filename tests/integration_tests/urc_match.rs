// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use crate::integration_tests::common;

#[tokio::test(start_paused = true)]
async fn unsolicited_result_code_fires_without_an_active_command() {
    let (engine, _clock, _transport, handle) = common::setup();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Vec<u8>>();
    engine
        .register_urc(
            handle,
            b"+IPD,",
            b":",
            64,
            Box::new(move |body| {
                let _ = tx.send(body.to_vec());
            }),
        )
        .expect("register_urc");

    engine.receive(handle, b"junk before\r\n+IPD,5,\"1.2.3.4\",80:");
    common::pump().await;

    let body = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("urc did not fire")
        .expect("channel closed");
    assert_eq!(body, b"5,\"1.2.3.4\",80");
}
