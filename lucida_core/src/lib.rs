// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session lifecycle and frame orchestration for an occlusion-aware AR view.
//!
//! `lucida_core` keeps a device tracking session alive across the host
//! application's lifecycle, negotiates availability of the AR service and
//! camera permission, and runs the per-redraw orchestration loop that fuses
//! camera imagery, pose tracking, and depth into a composite image. It is
//! `no_std` compatible (with `alloc`); every GPU object and the tracking
//! service itself live behind traits implemented by host integrations.
//!
//! # Architecture
//!
//! Control flows from host lifecycle events down to per-redraw cycles:
//!
//! ```text
//!   foreground event ──► AvailabilityGate ──► SessionLifecycleController
//!                              │                       │ owns Session
//!                              ▼                       ▼
//!                       install/permission      configure → resume →
//!                            flows              surface callbacks on
//!
//!   redraw callback ──► FrameOrchestrator::run_cycle
//!                           │ advance() ─► Frame
//!                           ├ DepthOcclusionPolicy ─► compositor flags
//!                           ├ depth image (scoped) ─► depth texture
//!                           └ background draw ─► scene draw
//! ```
//!
//! **[`availability`]** — One-shot install/permission gate that must report
//! ready before a session may exist.
//!
//! **[`lifecycle`]** — State machine owning the session handle. Resume
//! applies configuration, resumes the service, then starts the rendering
//! surface; pause runs the exact reverse. That ordering is what serializes
//! lifecycle transitions against in-flight cycles without locking.
//!
//! **[`orchestrator`]** — The fixed per-redraw sequence, with per-step
//! failure handling that never crosses the callback boundary.
//!
//! **[`policy`]** — Pure mapping from depth capability and user settings to
//! the depth mode and compositor flags.
//!
//! **[`geometry`]** — Viewport size/rotation tracking and the background UV
//! construction.
//!
//! **[`service`]**, **[`render`]**, **[`message`]** — Collaborator contracts
//! for the tracking service, the rendering surface/compositor/scene, and the
//! transient user message surface.
//!
//! **[`frame`]**, **[`config`]**, **[`settings`]**, **[`transform`]**,
//! **[`error`]** — The data model.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle/frame-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod availability;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod lifecycle;
pub mod message;
pub mod orchestrator;
pub mod policy;
pub mod render;
pub mod service;
pub mod settings;
pub mod trace;
pub mod transform;
