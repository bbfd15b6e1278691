// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use atcmd_engine::RespResult;

use crate::integration_tests::common;

#[tokio::test(start_paused = true)]
async fn exec_cmd_completes_on_a_custom_end_sign() {
    let (engine, _clock, _transport, handle) = common::setup();
    engine.set_end_sign(handle, b'>');

    let resp = engine.create_resp(64, 0, 5_000);
    let run = {
        let engine = engine.clone();
        let resp = resp.clone();
        tokio::spawn(async move {
            engine.exec_cmd(handle, Some(&resp), "AT+CMD\r").await;
        })
    };

    common::pump().await;
    engine.receive(handle, b"prompt >");
    common::pump().await;
    run.await.expect("exec_cmd task panicked");

    assert_eq!(resp.result(), RespResult::Ok);
    assert_eq!(resp.line(0), Some(b"prompt ".to_vec()));
}
