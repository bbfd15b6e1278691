// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Engine-wide tunables (`spec.md` §6, `SPEC_FULL.md` §9). Serializable so a
//! host can load it from a YAML file the way the teacher loads its client
//! configuration, though most callers will just use [`EngineConfig::default`].

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Default command-buffer ceiling, matching `spec.md`'s `CMD_MAX`.
pub const DEFAULT_CMD_MAX: usize = 128;
/// Default per-instance FIFO capacity, matching `spec.md`'s `FIFO_SIZE`.
pub const DEFAULT_FIFO_SIZE: usize = 2048;
/// Default background tick period, matching `spec.md`'s `TICK_MS`.
pub const DEFAULT_TICK_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rendered command length ceiling; `exec_cmd`/`exec_cmd_fmt` refuse to
    /// send anything that does not fit.
    pub cmd_max: usize,
    /// Per-instance byte FIFO capacity.
    pub fifo_size: usize,
    /// Period shared by the drain task and the timeout supervisor.
    pub tick_ms: u64,
    /// Carried over from `TZATSetMid`'s memory-pool id; this crate has no
    /// memory pool to register against, so it is stored but never read.
    pub mid: Option<i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cmd_max: DEFAULT_CMD_MAX,
            fifo_size: DEFAULT_FIFO_SIZE,
            tick_ms: DEFAULT_TICK_MS,
            mid: None,
        }
    }
}

impl EngineConfig {
    pub fn with_mid(mut self, mid: i32) -> Self {
        self.mid = Some(mid);
        self
    }

    /// Loads and validates an [`EngineConfig`] from a YAML file, mirroring
    /// the teacher's `Config::load_from_file`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: EngineConfig = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.cmd_max >= 2, "cmd_max must be >= 2");
        ensure!(self.fifo_size >= 1, "fifo_size must be >= 1");
        ensure!(self.tick_ms >= 1, "tick_ms must be >= 1");
        Ok(())
    }
}
