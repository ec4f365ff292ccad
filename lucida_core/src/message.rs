// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-facing transient message surface.
//!
//! Install, permission, camera-loss, and asset failures each surface exactly
//! one message here. Depth-not-yet-available is deliberately never reported:
//! it is an expected per-cycle outcome, not a failure.

/// Receives user-facing transient messages.
pub trait MessageSink {
    /// Shows a transient message to the user.
    fn show(&mut self, message: &str);
}

/// A [`MessageSink`] that discards all messages.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMessages;

impl MessageSink for NoopMessages {
    fn show(&mut self, _message: &str) {}
}

/// Shows a message and mirrors it into the trace stream.
pub(crate) fn report(
    messages: &mut dyn MessageSink,
    tracer: &mut crate::trace::Tracer<'_>,
    text: &str,
) {
    messages.show(text);
    tracer.user_message(&crate::trace::UserMessageEvent { text });
}
