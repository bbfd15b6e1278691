// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Demo binary: drives the engine against a scripted in-process fake modem
//! instead of a real transport, the way the teacher's binary drives its
//! client against a real target — this crate has no external peripheral to
//! dial, so the script stands in for one.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use atcmd_engine::{AtEngine, InstanceHandle, RespResult, cfg::logger, transport::Transport};
use once_cell::sync::OnceCell;
use tracing::info;

/// Answers a handful of canned AT commands after a short simulated latency,
/// and can be poked to emit an unsolicited result code on demand.
struct FakeModem {
    engine: Arc<AtEngine>,
    handle: OnceCell<InstanceHandle>,
}

impl FakeModem {
    fn new(engine: Arc<AtEngine>) -> Arc<Self> {
        Arc::new(Self {
            engine,
            handle: OnceCell::new(),
        })
    }

    fn bind(&self, handle: InstanceHandle) {
        let _ = self.handle.set(handle);
    }
}

impl Transport for FakeModem {
    fn send(&self, bytes: &[u8]) {
        let cmd = String::from_utf8_lossy(bytes).trim().to_owned();
        let engine = self.engine.clone();
        let handle = *self.handle.get().expect("bind() called before first send");

        let reply: &'static [u8] = if cmd == "AT" {
            b"OK\r\n"
        } else if cmd.starts_with("AT+CSQ") {
            b"+CSQ: 20,99\r\nOK\r\n"
        } else {
            b"ERROR\r\n"
        };

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            engine.receive(handle, reply);
        });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_logger();

    let engine = AtEngine::with_defaults();
    let modem = FakeModem::new(engine.clone());
    let handle = engine
        .create(modem.clone())
        .context("engine refused to create an instance")?;
    modem.bind(handle);

    let ping = engine.create_resp(64, 0, 2_000);
    engine.exec_cmd(handle, Some(&ping), "AT\r").await;
    info!(result = ?ping.result(), "AT");

    let csq = engine.create_resp(64, 0, 2_000);
    engine.exec_cmd(handle, Some(&csq), "AT+CSQ\r").await;
    if csq.result() == RespResult::Ok {
        if let Some(line) = csq.line_by_keyword(b"+CSQ") {
            info!(line = %String::from_utf8_lossy(&line), "signal quality");
        }
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Vec<u8>>();
    engine
        .register_urc(
            handle,
            b"+CREG: ",
            b"\r\n",
            64,
            Box::new(move |body| {
                let _ = tx.send(body.to_vec());
            }),
        )
        .context("register_urc failed")?;

    engine.receive(handle, b"+CREG: 1,5\r\n");
    if let Ok(Some(body)) = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
        info!(body = %String::from_utf8_lossy(&body), "registration status urc");
    }

    Ok(())
}
