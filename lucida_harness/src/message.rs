// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message recorder.

use alloc::string::String;
use alloc::vec::Vec;

use lucida_core::message::MessageSink;

/// A [`MessageSink`] that collects every message for assertions.
#[derive(Debug, Default)]
pub struct MessageRecorder {
    /// Messages in the order they were shown.
    pub shown: Vec<String>,
}

impl MessageRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageSink for MessageRecorder {
    fn show(&mut self, message: &str) {
        self.shown.push(String::from(message));
    }
}
