// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use atcmd_engine::EngineError;

#[test]
fn registration_errors_have_stable_messages() {
    assert_eq!(
        EngineError::EmptyPrefix.to_string(),
        "urc prefix must not be empty"
    );
    assert_eq!(
        EngineError::EmptySuffix.to_string(),
        "urc suffix must not be empty"
    );
    assert_eq!(
        EngineError::ZeroBufferSize.to_string(),
        "buffer size must be greater than zero"
    );
    assert_eq!(
        EngineError::ZeroTimeout.to_string(),
        "timeout must be greater than zero"
    );
    assert_eq!(EngineError::Busy.to_string(), "instance is busy");
    assert_eq!(
        EngineError::UnknownHandle.to_string(),
        "no such instance handle"
    );
}
