// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Command Coroutine (C7): `spec.md` §4.6's five-step contract, plus the
//! rendering supplement in `SPEC_FULL.md` §4.9.
//!
//! `spec.md` describes a cooperative coroutine that suspends itself between
//! steps; here that is a plain `async fn` whose only suspension point is
//! waiting on the instance's completion [`tokio::sync::Notify`].

use std::fmt;

use tracing::warn;

use crate::{
    instance::AtInstance,
    resp::{RespHandle, RespResult},
};

/// Renders `args`, sends it, and — if `resp` is `Some` — arms the response
/// session and waits for it to complete before returning.
///
/// Step order, matching `spec.md` §4.6:
/// 1. If busy: set `resp`'s result to `BUSY` (if supplied) and return
///    without sending or suspending.
/// 2. Render into a buffer of at most `cmd_max` bytes; if it does not fit,
///    log and return without sending.
/// 3. Send the rendered bytes.
/// 4. If `resp` is `None`, return — fire-and-forget.
/// 5. Arm the response session and suspend until it completes.
pub async fn exec_cmd_fmt(instance: &AtInstance, resp: Option<&RespHandle>, args: fmt::Arguments<'_>) {
    if instance.is_busy() {
        if let Some(rh) = resp {
            let mut st = rh.lock();
            st.result = RespResult::Busy;
            st.done = true;
        }
        warn!("exec_cmd: instance busy, command dropped");
        return;
    }

    let rendered = fmt::format(args);
    exec_rendered(instance, resp, rendered).await;
}

/// Convenience entry point for a command that needs no formatting.
pub async fn exec_cmd(instance: &AtInstance, resp: Option<&RespHandle>, cmd: &str) {
    if instance.is_busy() {
        if let Some(rh) = resp {
            let mut st = rh.lock();
            st.result = RespResult::Busy;
            st.done = true;
        }
        warn!("exec_cmd: instance busy, command dropped");
        return;
    }

    exec_rendered(instance, resp, cmd.to_owned()).await;
}

async fn exec_rendered(instance: &AtInstance, resp: Option<&RespHandle>, rendered: String) {
    if rendered.len() >= instance.cmd_max {
        warn!(
            len = rendered.len(),
            cmd_max = instance.cmd_max,
            "exec_cmd: rendered command exceeds cmd_max, dropped"
        );
        return;
    }

    instance.send_data(rendered.as_bytes());

    let Some(rh) = resp else {
        return;
    };

    // Registered before arming so the completion notify — fired by the
    // drain task or the timeout supervisor under the same instance lock —
    // can never be missed, even if it lands before this `.await`.
    let notified = instance.resp_notify.notified();
    instance.arm_response(rh);
    notified.await;
}
