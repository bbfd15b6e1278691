// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Timeout Supervisor (C8): `spec.md` §4.7/§4.8. A periodic sweep over every
//! registered instance, independent of the drain task's per-byte dispatch.
//! The sweep itself lives on [`crate::instance::AtInstance::check_timeout`];
//! this module is the per-tick entry point the engine's background task
//! calls.

use crate::{clock::Clock, instance::AtInstance};

/// Runs one timeout sweep across `instances`, per `spec.md` §4.7: "on every
/// tick, for every instance with an active session whose elapsed time
/// exceeds its timeout, trip it with `TIMEOUT`."
pub(crate) fn sweep<'a>(instances: impl Iterator<Item = &'a AtInstance>, clock: &dyn Clock) {
    let now = clock.now_us();
    for instance in instances {
        instance.check_timeout(now);
    }
}
