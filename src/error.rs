// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Failures surfaced by the engine's registration-style calls.
///
/// These are distinct from [`crate::resp::RespResult`], which reports the
/// outcome of a command/response exchange, not a registration-time mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("urc prefix must not be empty")]
    EmptyPrefix,

    #[error("urc suffix must not be empty")]
    EmptySuffix,

    #[error("buffer size must be greater than zero")]
    ZeroBufferSize,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("instance is busy")]
    Busy,

    #[error("no such instance handle")]
    UnknownHandle,
}
