// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Byte FIFO (C1): decouples the producer calling [`crate::engine::AtEngine::receive`]
//! from the drain task that feeds the session state machine one byte at a
//! time.
//!
//! `spec.md` §1 treats this as an external collaborator ("the ring buffer
//! used between the producer and the parser"); this crate still has to ship
//! something behind that contract, so it is implemented here as a small
//! bounded ring buffer rather than pulled in as a dependency none of the
//! example repos in this pack actually use for the purpose.

use std::collections::VecDeque;

use tracing::trace;

/// Multiple-producer-safe batch push, single-consumer byte pull.
///
/// The synchronization is a plain `std::sync::Mutex`: pushes and pops are
/// O(1) pointer bumps, never held across an `.await`, so a blocking mutex
/// is the right tool here rather than an async one.
#[derive(Debug)]
pub struct ByteFifo {
    capacity: usize,
    inner: std::sync::Mutex<VecDeque<u8>>,
}

impl ByteFifo {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: std::sync::Mutex::new(VecDeque::with_capacity(capacity.min(4096))),
        }
    }

    /// Appends `bytes` to the FIFO, dropping the oldest bytes if the push
    /// would exceed capacity. A full FIFO indicates the drain task is not
    /// keeping up; the spec does not define backpressure here, so this
    /// crate drops from the front rather than blocking the producer.
    pub fn write_batch(&self, bytes: &[u8]) {
        let mut guard = self.lock();
        for &b in bytes {
            if guard.len() >= self.capacity {
                guard.pop_front();
            }
            guard.push_back(b);
        }
        trace!(pushed = bytes.len(), len = guard.len(), "fifo write_batch");
    }

    /// Pops the next byte, if any.
    pub fn read_byte(&self) -> Option<u8> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<u8>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
