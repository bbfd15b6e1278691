// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Fixed-Length Receiver (C4): `spec.md` §4.3. Captures exactly `N` bytes
//! into an engine-owned buffer, firing a callback on completion or on
//! timeout. Unlike the response session, there is no caller-held handle:
//! the caller only ever sees the callback invocation.

use crate::resp::RespResult;

pub(crate) struct DataSession {
    buf: Vec<u8>,
    size: usize,
    pub(crate) timeout_us: u64,
    pub(crate) start_us: u64,
    callback: Box<dyn FnMut(RespResult, &[u8]) + Send>,
}

impl DataSession {
    pub(crate) fn new(
        size: usize,
        timeout_us: u64,
        start_us: u64,
        callback: Box<dyn FnMut(RespResult, &[u8]) + Send>,
    ) -> Self {
        Self {
            buf: Vec::with_capacity(size),
            size,
            timeout_us,
            start_us,
            callback,
        }
    }

    /// Appends one byte. Returns `true` once `N` bytes have been captured,
    /// at which point the callback has already fired with `(Ok, bytes, N)`
    /// and the session should be dropped by the caller.
    pub(crate) fn feed_byte(&mut self, byte: u8) -> bool {
        self.buf.push(byte);
        if self.buf.len() >= self.size {
            (self.callback)(RespResult::Ok, &self.buf);
            true
        } else {
            false
        }
    }

    /// Invoked by the timeout supervisor; the session is dropped by the
    /// caller immediately after.
    pub(crate) fn fire_timeout(&mut self) {
        (self.callback)(RespResult::Timeout, &[]);
    }
}
