// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Session State Machine (C6): `spec.md` §4.5. Each [`AtInstance`] owns one
//! FIFO, one optional response session, one optional data session and an
//! ordered URC table, and dispatches every drained byte to exactly one of
//! the three depending on which session (if any) is active.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace, warn};

use crate::{
    clock::Clock,
    data::DataSession,
    error::EngineError,
    fifo::ByteFifo,
    parser,
    resp::{RespHandle, RespResult},
    transport::Transport,
    urc::{UrcEntry, UrcTable},
};

struct InstanceState {
    response_session: Option<RespHandle>,
    data_session: Option<DataSession>,
    urc_table: UrcTable,
    end_sign: Option<u8>,
}

/// One independent AT-command session bound to a single transport.
pub struct AtInstance {
    pub(crate) fifo: ByteFifo,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) cmd_max: usize,
    state: Mutex<InstanceState>,
    pub(crate) resp_notify: tokio::sync::Notify,
}

impl AtInstance {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        cmd_max: usize,
        fifo_size: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            fifo: ByteFifo::new(fifo_size),
            transport,
            clock,
            cmd_max,
            state: Mutex::new(InstanceState {
                response_session: None,
                data_session: None,
                urc_table: UrcTable::default(),
                end_sign: None,
            }),
            resp_notify: tokio::sync::Notify::new(),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InstanceState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// `is_busy`: `spec.md` §4.5 — true iff exactly one of the two sessions
    /// is active (the invariant in §3 rules out both at once).
    pub fn is_busy(&self) -> bool {
        let g = self.lock();
        g.response_session.is_some() || g.data_session.is_some()
    }

    pub fn set_end_sign(&self, byte: u8) {
        self.lock().end_sign = if byte == 0 { None } else { Some(byte) };
    }

    pub fn send_data(&self, bytes: &[u8]) {
        self.transport.send(bytes);
    }

    pub fn register_urc(
        &self,
        prefix: &[u8],
        suffix: &[u8],
        body_cap: usize,
        callback: Box<dyn FnMut(&[u8]) + Send>,
    ) -> Result<(), EngineError> {
        if prefix.is_empty() {
            return Err(EngineError::EmptyPrefix);
        }
        if suffix.is_empty() {
            return Err(EngineError::EmptySuffix);
        }
        if body_cap == 0 {
            return Err(EngineError::ZeroBufferSize);
        }
        self.lock().urc_table.register(UrcEntry::new(
            prefix.to_vec(),
            suffix.to_vec(),
            body_cap,
            callback,
        ));
        debug!(prefix = ?String::from_utf8_lossy(prefix), "urc registered");
        Ok(())
    }

    pub fn set_wait_data_callback(
        &self,
        size: usize,
        timeout_ms: u64,
        callback: Box<dyn FnMut(RespResult, &[u8]) + Send>,
    ) -> Result<(), EngineError> {
        if size == 0 {
            return Err(EngineError::ZeroBufferSize);
        }
        if timeout_ms == 0 {
            return Err(EngineError::ZeroTimeout);
        }
        if self.is_busy() {
            return Err(EngineError::Busy);
        }

        let mut g = self.lock();
        // Re-check under the lock: another exec_cmd could have armed the
        // response session between the `is_busy` check above and here.
        if g.response_session.is_some() || g.data_session.is_some() {
            return Err(EngineError::Busy);
        }
        let now = self.clock.now_us();
        g.data_session = Some(DataSession::new(size, timeout_ms * 1_000, now, callback));
        debug!(size, timeout_ms, "data session armed");
        Ok(())
    }

    /// Session State Machine dispatch (`spec.md` §4.5), called once per
    /// byte drained from the FIFO by the engine's drain task.
    pub(crate) fn dispatch_byte(&self, byte: u8) {
        let mut resp_completed = false;
        {
            let mut g = self.lock();
            if let Some(rh) = g.response_session.clone() {
                let end_sign = g.end_sign;
                let mut st = rh.lock();
                parser::feed_byte(&mut st, byte, end_sign);
                let done = st.done;
                drop(st);
                if done {
                    g.response_session = None;
                    resp_completed = true;
                }
            } else if let Some(ds) = g.data_session.as_mut() {
                if ds.feed_byte(byte) {
                    g.data_session = None;
                }
            } else {
                g.urc_table.feed_byte(byte);
            }
        }
        if resp_completed {
            self.resp_notify.notify_waiters();
        }
    }

    /// Timeout Supervisor sweep (`spec.md` §4.7) for this instance.
    pub(crate) fn check_timeout(&self, now_us: u64) {
        let mut resp_timed_out = false;
        {
            let mut g = self.lock();
            if let Some(rh) = g.response_session.clone() {
                let started = rh.lock().start_us;
                let timeout = rh.lock().timeout_us;
                if now_us.saturating_sub(started) > timeout {
                    rh.lock().finish(RespResult::Timeout);
                    g.response_session = None;
                    resp_timed_out = true;
                }
            }
            if let Some(ds) = g.data_session.as_mut() {
                if now_us.saturating_sub(ds.start_us) > ds.timeout_us {
                    warn!("data session timed out");
                    ds.fire_timeout();
                    g.data_session = None;
                }
            }
        }
        if resp_timed_out {
            warn!("response session timed out");
            self.resp_notify.notify_waiters();
        }
    }

    /// Arms the response session for `exec_cmd`. Caller must have already
    /// verified the instance is not busy.
    pub(crate) fn arm_response(&self, rh: &RespHandle) {
        rh.lock().arm(self.clock.now_us());
        self.lock().response_session = Some(rh.clone());
    }

    pub fn receive(&self, bytes: &[u8]) {
        trace!(len = bytes.len(), "instance receive");
        self.fifo.write_batch(bytes);
    }
}
