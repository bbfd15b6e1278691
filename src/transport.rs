// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The host-injected send path. `spec.md` §6 describes `send(bytes, length)`
//! and `is_send_allowed() -> bool` as two independent callbacks; this crate
//! groups them into one trait object so `AtEngine::create` takes a single
//! collaborator, the way the teacher groups a connection's I/O halves.

/// Host-supplied byte sink plus send-gating policy.
///
/// `is_send_allowed` is advisory: per `spec.md` §6, the core engine stores
/// it but never consults it internally — it exists for host policy (e.g. a
/// caller checking it before calling `exec_cmd`).
pub trait Transport: Send + Sync + 'static {
    fn send(&self, bytes: &[u8]);

    fn is_send_allowed(&self) -> bool {
        true
    }
}

/// Transport that records every send, for tests and the demo binary.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: std::sync::Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Vec<u8>> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, bytes: &[u8]) {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(bytes.to_vec());
    }
}
