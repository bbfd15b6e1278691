// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use atcmd_engine::{AtEngine, transport::RecordingTransport};

#[tokio::test]
async fn each_created_instance_gets_a_distinct_handle() {
    let engine = AtEngine::with_defaults();
    let transport = Arc::new(RecordingTransport::new());

    let a = engine.create(transport.clone()).expect("create a");
    let b = engine.create(transport).expect("create b");

    assert_ne!(a, b);
    assert_eq!(a, a);
}

#[tokio::test]
async fn operations_on_an_unknown_handle_do_not_panic() {
    let engine = AtEngine::with_defaults();
    let _real = engine
        .create(Arc::new(RecordingTransport::new()))
        .expect("create");

    // Handle ids are assigned per-engine starting at 1, so a second engine's
    // second handle is guaranteed not to be a key in `engine`'s registry.
    let other_engine = AtEngine::with_defaults();
    let _ = other_engine
        .create(Arc::new(RecordingTransport::new()))
        .expect("create");
    let unknown_to_engine = other_engine
        .create(Arc::new(RecordingTransport::new()))
        .expect("create");

    assert!(!engine.is_busy(unknown_to_engine));
    engine.send_data(unknown_to_engine, b"noop");
    engine.set_end_sign(unknown_to_engine, b'>');
}
