// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Response Buffer (C2) and Response Handle.
//!
//! Lines are stored back-to-back as NUL-terminated records inside a single
//! flat buffer (`spec.md` §4.1). This module owns that layout and the
//! caller-facing accessors; the byte-at-a-time classification that fills
//! the buffer lives in [`crate::parser`].

use std::sync::{Arc, Mutex};

/// Outcome reported through a [`RespHandle`] or a data-session callback.
///
/// `Ok` means "the session completed", not "the command succeeded" — a
/// protocol `ERROR` line also completes with `Ok`. Callers distinguish
/// success from failure by inspecting the captured lines (`spec.md` §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RespResult {
    Ok,
    Timeout,
    LackOfMemory,
    ParamError,
    Busy,
    #[default]
    Other,
}

/// Live state backing a [`RespHandle`]. Reused across many `exec_cmd`
/// calls; reset at the start of each one.
#[derive(Debug)]
pub(crate) struct RespState {
    pub(crate) buf: Vec<u8>,
    pub(crate) cap: usize,
    pub(crate) len: usize,
    pub(crate) target_lines: usize,
    pub(crate) line_count: usize,
    pub(crate) timeout_us: u64,
    pub(crate) start_us: u64,
    pub(crate) done: bool,
    pub(crate) result: RespResult,
}

impl RespState {
    fn new(cap: usize, target_lines: usize, timeout_us: u64) -> Self {
        Self {
            buf: vec![0u8; cap],
            cap,
            len: 0,
            target_lines,
            line_count: 0,
            timeout_us,
            start_us: 0,
            done: true,
            result: RespResult::Other,
        }
    }

    /// Resets buffer content/length/line-count and marks the session
    /// active, called by `exec_cmd` on submission (`spec.md` §4.6 step 5).
    pub(crate) fn arm(&mut self, start_us: u64) {
        self.buf.iter_mut().for_each(|b| *b = 0);
        self.len = 0;
        self.line_count = 0;
        self.start_us = start_us;
        self.done = false;
        self.result = RespResult::Other;
    }

    pub(crate) fn finish(&mut self, result: RespResult) {
        self.result = result;
        self.done = true;
    }
}

/// Caller-owned response buffer handle. Cheap to clone; all clones see the
/// same underlying state.
#[derive(Debug, Clone)]
pub struct RespHandle {
    pub(crate) inner: Arc<Mutex<RespState>>,
}

impl RespHandle {
    /// `spec.md` §3: buffer capacity `B` must be at least 2 (one byte for
    /// content, one reserved for the final NUL terminator). Like the
    /// original C implementation, a smaller request is clamped rather than
    /// rejected.
    pub fn new(buf_size: usize, target_lines: usize, timeout_ms: u64) -> Self {
        let cap = buf_size.max(2);
        Self {
            inner: Arc::new(Mutex::new(RespState::new(
                cap,
                target_lines,
                timeout_ms * 1_000,
            ))),
        }
    }

    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, RespState> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// `resp_get_result`: `Other` if the session has not completed.
    pub fn result(&self) -> RespResult {
        let g = self.lock();
        if !g.done { RespResult::Other } else { g.result }
    }

    /// `resp_get_line_total`: 0 if the session has not completed.
    pub fn line_total(&self) -> usize {
        let g = self.lock();
        if !g.done { 0 } else { g.line_count }
    }

    /// `resp_get_line`. Lines are 0-indexed; empty lines are legal records.
    pub fn line(&self, index: usize) -> Option<Vec<u8>> {
        let g = self.lock();
        if !g.done || index >= g.line_count {
            return None;
        }
        records(&g.buf[..g.len]).nth(index).map(<[u8]>::to_vec)
    }

    /// `resp_get_line_by_keyword`: first record containing `keyword` as a
    /// substring. Empty records never match.
    pub fn line_by_keyword(&self, keyword: &[u8]) -> Option<Vec<u8>> {
        let g = self.lock();
        if !g.done {
            return None;
        }
        records(&g.buf[..g.len])
            .take(g.line_count)
            .find(|line| !line.is_empty() && contains_subslice(line, keyword))
            .map(<[u8]>::to_vec)
    }

    pub fn is_done(&self) -> bool {
        self.lock().done
    }
}

fn records(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    buf.split(|&b| b == 0)
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
