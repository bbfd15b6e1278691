// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! URC Table + Matcher (C5): `spec.md` §4.4. Each registered entry tracks
//! its own prefix/suffix match progress independently; entries are
//! evaluated in registration order on every byte while the instance is not
//! busy.

use tracing::trace;

/// One registered unsolicited-result-code pattern.
pub(crate) struct UrcEntry {
    prefix: Vec<u8>,
    suffix: Vec<u8>,
    body: Vec<u8>,
    body_cap: usize,
    prefix_pos: usize,
    suffix_pos: usize,
    awaiting_prefix: bool,
    callback: Box<dyn FnMut(&[u8]) + Send>,
}

impl UrcEntry {
    pub(crate) fn new(
        prefix: Vec<u8>,
        suffix: Vec<u8>,
        body_cap: usize,
        callback: Box<dyn FnMut(&[u8]) + Send>,
    ) -> Self {
        Self {
            prefix,
            suffix,
            body: Vec::with_capacity(body_cap),
            body_cap,
            prefix_pos: 0,
            suffix_pos: 0,
            awaiting_prefix: true,
            callback,
        }
    }

    /// Feeds one byte into this entry's state machine, firing the callback
    /// in place when the suffix completes.
    ///
    /// Mirrors `tzat.c`'s `dealUrcItem`: on a prefix mismatch, progress
    /// resets to zero with no backtracking, so a self-overlapping prefix
    /// (e.g. `"AAB"` against `"AAAB"`) can miss a match — documented in
    /// `spec.md` §9 as a known, preserved weakness.
    fn feed_byte(&mut self, byte: u8) {
        if self.awaiting_prefix {
            if self.prefix.get(self.prefix_pos) == Some(&byte) {
                self.prefix_pos += 1;
                if self.prefix_pos == self.prefix.len() {
                    self.awaiting_prefix = false;
                    self.prefix_pos = 0;
                    self.suffix_pos = 0;
                    self.body.clear();
                }
            } else {
                self.prefix_pos = 0;
            }
            return;
        }

        self.body.push(byte);
        if self.suffix.get(self.suffix_pos) == Some(&byte) {
            self.suffix_pos += 1;
            if self.suffix_pos == self.suffix.len() {
                let payload_len = self.body.len() - self.suffix.len();
                (self.callback)(&self.body[..payload_len]);
                self.awaiting_prefix = true;
                return;
            }
        } else {
            self.suffix_pos = 0;
        }

        if self.body.len() >= self.body_cap {
            trace!(body_cap = self.body_cap, "urc body overflow, discarding");
            self.awaiting_prefix = true;
        }
    }
}

/// Per-instance ordered collection of URC entries, evaluated in
/// registration order.
#[derive(Default)]
pub(crate) struct UrcTable {
    entries: Vec<UrcEntry>,
}

impl UrcTable {
    pub(crate) fn register(&mut self, entry: UrcEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn feed_byte(&mut self, byte: u8) {
        for entry in &mut self.entries {
            entry.feed_byte(byte);
        }
    }
}
