// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use atcmd_engine::RespResult;

use crate::integration_tests::common;

#[tokio::test(start_paused = true)]
async fn exec_cmd_completes_on_target_line_count() {
    let (engine, _clock, transport, handle) = common::setup();
    let resp = engine.create_resp(64, 2, 5_000);

    let run = {
        let engine = engine.clone();
        let resp = resp.clone();
        tokio::spawn(async move {
            engine.exec_cmd(handle, Some(&resp), "AT+CSQ\r").await;
        })
    };

    common::pump().await;
    engine.receive(handle, b"+CSQ: 20,99\r\nOK\r\n");
    common::pump().await;
    run.await.expect("exec_cmd task panicked");

    assert_eq!(resp.result(), RespResult::Ok);
    assert_eq!(resp.line_total(), 2);
    assert_eq!(resp.line(0), Some(b"+CSQ: 20,99".to_vec()));
    assert_eq!(resp.line(1), Some(b"OK".to_vec()));
    assert_eq!(transport.last(), Some(b"AT+CSQ\r".to_vec()));
}
