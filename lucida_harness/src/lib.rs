// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted doubles for lucida tests and demos.
//!
//! Every double records into a shared [`CallLog`], so tests can assert call
//! ordering *across* collaborators (e.g. that the surface pauses before the
//! session does). The doubles panic on contract violations — advancing a
//! session that is not resumed, resuming twice — so a regression in the
//! core's ordering discipline fails loudly instead of silently passing.
//!
//! - [`ScriptedService`] / [`ScriptedSession`] — a tracking service whose
//!   install results, sessions, and per-frame outcomes are queued up front.
//! - [`RecordingSurface`], [`RecordingCompositor`], [`RecordingScene`] —
//!   rendering collaborators that record calls and keep the last state seen.
//! - [`MessageRecorder`] — collects user-facing messages for assertions.

#![no_std]

extern crate alloc;

pub mod log;
pub mod message;
pub mod render;
pub mod service;

pub use log::{Call, CallLog};
pub use message::MessageRecorder;
pub use render::{RecordingCompositor, RecordingScene, RecordingSurface};
pub use service::{
    DepthOutcome, FrameStep, ScriptedDepthImage, ScriptedService, ScriptedSession, SessionScript,
};
