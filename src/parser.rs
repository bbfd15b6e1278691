// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Response Parser (C3): `spec.md` §4.2. Operates one byte at a time on the
//! active [`crate::resp::RespState`], classifying each incoming byte
//! against the bytes already appended before it, and applies one of two
//! completion policies depending on whether a target line count was set.

use crate::resp::{RespResult, RespState};

/// Feeds one byte into `state`. `end_sign` is the instance-level extra
/// terminator (`spec.md` §3: "optional user-chosen extra terminator byte,
/// default none"); `0` disables it, matching `set_end_sign(h, 0)`.
///
/// No-op if `state` is already done — callers are expected to detach the
/// response session from the instance the moment it completes, but this
/// guards against a stray extra byte landing after that.
pub(crate) fn feed_byte(state: &mut RespState, byte: u8, end_sign: Option<u8>) {
    if state.done {
        return;
    }

    let is_lf = byte == b'\n' && state.len >= 1 && state.buf[state.len - 1] == b'\r';
    let is_ok = byte == b'K' && state.len >= 1 && state.buf[state.len - 1] == b'O';
    let is_error = byte == b'R'
        && state.len >= 4
        && &state.buf[state.len - 4..state.len] == b"ERRO";
    let is_end_sign = matches!(end_sign, Some(t) if t != 0 && byte == t);

    if state.target_lines > 0 {
        if is_lf {
            // The CR LF that closes a line is never written: the LF is
            // consumed here without being stored, and the CR already
            // sitting at `buf[len - 1]` is overwritten by the terminator.
            state.line_count += 1;
            state.buf[state.len - 1] = 0;
            if state.line_count >= state.target_lines {
                state.finish(RespResult::Ok);
            } else if would_overflow(state) {
                state.finish(RespResult::LackOfMemory);
            }
            return;
        }
    } else if is_ok || is_error || is_end_sign {
        // The triggering byte itself (the 'K' of OK, the second 'R' of
        // ERROR, the end-sign byte) is not stored — only the terminator is
        // appended after whatever was already captured.
        state.line_count += 1;
        state.buf[state.len] = 0;
        state.len += 1;
        state.finish(RespResult::Ok);
        return;
    }

    state.buf[state.len] = byte;
    state.len += 1;
    if would_overflow(state) {
        state.finish(RespResult::LackOfMemory);
    }
}

/// One byte is reserved for the final NUL terminator (`spec.md` §9: the
/// spec adopts the `>= B-1` threshold over the original's inconsistent
/// `>= B` form).
fn would_overflow(state: &RespState) -> bool {
    state.len >= state.cap - 1
}
