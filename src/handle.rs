// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Opaque instance handle, the idiomatic replacement for the original
//! integer handle returned by `TZATCreate`.

/// Identifies one engine instance inside an [`crate::engine::AtEngine`].
/// Cheap to copy, meaningless outside the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub(crate) u64);
