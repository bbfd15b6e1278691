// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use atcmd_engine::RespResult;

use crate::integration_tests::common;

#[tokio::test(start_paused = true)]
async fn exec_cmd_is_tripped_by_the_timeout_supervisor() {
    let (engine, clock, _transport, handle) = common::setup();
    let resp = engine.create_resp(64, 1, 50);

    let run = {
        let engine = engine.clone();
        let resp = resp.clone();
        tokio::spawn(async move {
            engine.exec_cmd(handle, Some(&resp), "AT+NOREPLY\r").await;
        })
    };

    common::pump().await;
    assert!(engine.is_busy(handle));

    // No bytes ever arrive; advance the logical clock past the timeout and
    // let the supervisor's tick observe it.
    clock.advance_ms(100);
    common::pump().await;
    common::pump().await;

    run.await.expect("exec_cmd task panicked");
    assert_eq!(resp.result(), RespResult::Timeout);
    assert!(!engine.is_busy(handle));
}
