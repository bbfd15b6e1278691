// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Instance Registry (C9): `spec.md` §2/§6. Owns every [`AtInstance`] keyed
//! by an opaque [`InstanceHandle`], and lazily spawns the two background
//! tasks (drain, timeout supervisor) the first time an instance is created.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    cfg::EngineConfig,
    clock::{Clock, RealClock},
    error::EngineError,
    handle::InstanceHandle,
    instance::AtInstance,
    resp::{RespHandle, RespResult},
    supervisor,
    transport::Transport,
};

/// Multi-instance registry plus the two long-lived background tasks that
/// drive every registered instance's byte dispatch and timeout sweep.
pub struct AtEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    instances: DashMap<InstanceHandle, Arc<AtInstance>>,
    next_id: AtomicU64,
    background_started: OnceCell<()>,
}

impl fmt::Debug for AtEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtEngine")
            .field("config", &self.config)
            .field("instance_count", &self.instances.len())
            .finish()
    }
}

impl AtEngine {
    pub fn with_defaults() -> Arc<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn new(config: EngineConfig) -> Arc<Self> {
        Self::with_clock(config, Arc::new(RealClock::default()))
    }

    /// Test/demo entry point that injects a [`Clock`] other than the real
    /// one, e.g. [`crate::clock::FakeClock`].
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            config,
            clock,
            instances: DashMap::new(),
            next_id: AtomicU64::new(1),
            background_started: OnceCell::new(),
        })
    }

    /// `TZATCreate`'s replacement: registers a new instance bound to
    /// `transport`. Always succeeds in safe Rust (no allocation-failure
    /// sentinel needed), but kept as `Option` to mirror the spec's handle
    /// contract and leave room for a future capacity cap.
    pub fn create(self: &Arc<Self>, transport: Arc<dyn Transport>) -> Option<InstanceHandle> {
        let id = InstanceHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        let instance = AtInstance::new(
            transport,
            self.clock.clone(),
            self.config.cmd_max,
            self.config.fifo_size,
        );
        self.instances.insert(id, instance);
        self.ensure_background_tasks();
        debug!(handle = id.0, "instance created");
        Some(id)
    }

    fn ensure_background_tasks(self: &Arc<Self>) {
        if self.background_started.set(()).is_ok() {
            let drain_engine = self.clone();
            tokio::spawn(async move { drain_engine.drain_loop().await });

            let supervise_engine = self.clone();
            tokio::spawn(async move { supervise_engine.supervise_loop().await });

            debug!("engine background tasks started");
        }
    }

    async fn drain_loop(self: Arc<Self>) {
        loop {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.tick_ms)).await;
            for entry in &self.instances {
                let instance = entry.value();
                while let Some(byte) = instance.fifo.read_byte() {
                    instance.dispatch_byte(byte);
                }
            }
        }
    }

    async fn supervise_loop(self: Arc<Self>) {
        loop {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.tick_ms)).await;
            let instances: Vec<_> = self.instances.iter().map(|e| e.value().clone()).collect();
            supervisor::sweep(instances.iter().map(Arc::as_ref), self.clock.as_ref());
        }
    }

    fn instance(&self, handle: InstanceHandle) -> Option<Arc<AtInstance>> {
        self.instances.get(&handle).map(|e| e.value().clone())
    }

    pub fn receive(&self, handle: InstanceHandle, bytes: &[u8]) {
        if let Some(instance) = self.instance(handle) {
            instance.receive(bytes);
        }
    }

    /// `TZATCreateResp`'s replacement: a handle-free constructor, since the
    /// buffer is owned by the caller's [`RespHandle`] rather than the
    /// engine. Kept here for API-table parity with `spec.md` §6. Like
    /// `RespHandle::new`, an undersized buffer is clamped, not rejected.
    pub fn create_resp(&self, buf_size: usize, target_lines: usize, timeout_ms: u64) -> RespHandle {
        RespHandle::new(buf_size, target_lines, timeout_ms)
    }

    pub fn is_busy(&self, handle: InstanceHandle) -> bool {
        self.instance(handle).is_some_and(|i| i.is_busy())
    }

    pub async fn exec_cmd(&self, handle: InstanceHandle, resp: Option<&RespHandle>, cmd: &str) {
        if let Some(instance) = self.instance(handle) {
            crate::exec::exec_cmd(&instance, resp, cmd).await;
        }
    }

    pub async fn exec_cmd_fmt(
        &self,
        handle: InstanceHandle,
        resp: Option<&RespHandle>,
        args: fmt::Arguments<'_>,
    ) {
        if let Some(instance) = self.instance(handle) {
            crate::exec::exec_cmd_fmt(&instance, resp, args).await;
        }
    }

    pub fn register_urc(
        &self,
        handle: InstanceHandle,
        prefix: &[u8],
        suffix: &[u8],
        body_cap: usize,
        callback: Box<dyn FnMut(&[u8]) + Send>,
    ) -> Result<(), EngineError> {
        self.instance(handle)
            .ok_or(EngineError::UnknownHandle)
            .and_then(|i| i.register_urc(prefix, suffix, body_cap, callback))
    }

    pub fn set_wait_data_callback(
        &self,
        handle: InstanceHandle,
        size: usize,
        timeout_ms: u64,
        callback: Box<dyn FnMut(RespResult, &[u8]) + Send>,
    ) -> Result<(), EngineError> {
        self.instance(handle)
            .ok_or(EngineError::UnknownHandle)
            .and_then(|i| i.set_wait_data_callback(size, timeout_ms, callback))
    }

    pub fn set_end_sign(&self, handle: InstanceHandle, byte: u8) {
        if let Some(instance) = self.instance(handle) {
            instance.set_end_sign(byte);
        }
    }

    pub fn send_data(&self, handle: InstanceHandle, bytes: &[u8]) {
        if let Some(instance) = self.instance(handle) {
            instance.send_data(bytes);
        }
    }
}
