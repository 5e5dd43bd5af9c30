// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped redirection of raw process output.
//!
//! The crate owns the process-wide raw output channel: a global slot
//! holding the current raw out/err sinks, which default to the real stdout
//! and stderr. Unstructured output written through
//! [`raw_println!`](crate::raw_println) and
//! [`raw_eprintln!`](crate::raw_eprintln) goes through that slot, so a
//! [`StreamGate`] can silence or redirect it for the duration of a block by
//! swapping the sinks and moving the saved ones back when the guard drops,
//! on every exit path, including unwinding. Structured records are emitted
//! through each logger's handlers and are deliberately untouched by the
//! gate.
//!
//! # Known limitation
//!
//! The slot is process-wide, not per-thread. Two gates active concurrently
//! on different threads race on the same underlying sinks; correctness is
//! guaranteed only for sequential or properly nested use within a single
//! thread of control. This mirrors the nature of the resource itself (a
//! process has one stdout) and is intentionally not papered over with
//! finer locking.

use std::io::{self, Write};
use std::mem;
use std::sync::{Mutex, OnceLock};

/// The pair of sinks raw output currently flows into.
struct RawStreams {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

static RAW_STREAMS: OnceLock<Mutex<RawStreams>> = OnceLock::new();

fn with_raw_streams<R>(f: impl FnOnce(&mut RawStreams) -> R) -> R {
    let mutex = RAW_STREAMS.get_or_init(|| {
        Mutex::new(RawStreams {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        })
    });
    // Restoration must complete even after a writer panicked; a poisoned
    // slot still holds the live sinks.
    let mut streams = mutex.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut streams)
}

/// Writes one line of raw output to the current raw out sink.
///
/// Raw output is best-effort: write failures are swallowed, matching the
/// semantics of a silenced stream.
pub fn raw_write_line(line: &str) {
    with_raw_streams(|streams| {
        let _ = streams.out.write_all(line.as_bytes());
        let _ = streams.out.write_all(b"\n");
        let _ = streams.out.flush();
    });
}

/// Writes one line of raw output to the current raw err sink.
pub fn raw_ewrite_line(line: &str) {
    with_raw_streams(|streams| {
        let _ = streams.err.write_all(line.as_bytes());
        let _ = streams.err.write_all(b"\n");
        let _ = streams.err.flush();
    });
}

/// Suppresses raw output for the duration of the returned guard.
///
/// Equivalent to [`StreamGate::suppress`]; named for the call sites that
/// wrap noisy third-party output.
pub fn disable_outer_logs() -> StreamGate {
    StreamGate::suppress()
}

/// Guard over a raw output redirection.
///
/// Created by [`suppress`](StreamGate::suppress) or
/// [`redirect`](StreamGate::redirect). Dropping the guard moves the saved
/// sinks back into place, restoring exactly the streams that were active
/// when the gate was entered. Gates nest: each guard restores what it
/// displaced, so properly nested gates unwind inner-before-outer.
///
/// # Examples
///
/// ```
/// use scopewise::{StreamGate, raw_println};
///
/// {
///     let _gate = StreamGate::suppress();
///     raw_println!("nobody sees this");
/// }
/// raw_println!("back to stdout");
/// ```
#[must_use = "raw streams are restored as soon as this guard is dropped"]
pub struct StreamGate {
    saved: Option<RawStreams>,
}

impl StreamGate {
    /// Redirects raw output to null sinks.
    pub fn suppress() -> StreamGate {
        StreamGate::redirect(Box::new(io::sink()), Box::new(io::sink()))
    }

    /// Redirects raw output to caller-supplied sinks.
    pub fn redirect(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> StreamGate {
        let saved = with_raw_streams(|streams| RawStreams {
            out: mem::replace(&mut streams.out, out),
            err: mem::replace(&mut streams.err, err),
        });
        StreamGate { saved: Some(saved) }
    }
}

impl Drop for StreamGate {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            with_raw_streams(|streams| {
                streams.out = saved.out;
                streams.err = saved.err;
            });
        }
    }
}

impl std::fmt::Debug for StreamGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamGate")
            .field("active", &self.saved.is_some())
            .finish()
    }
}
