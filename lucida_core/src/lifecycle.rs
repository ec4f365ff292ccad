// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session lifecycle state machine.
//!
//! [`SessionLifecycleController`] owns the tracking-session handle across the
//! host's foreground/background transitions. The handle lives inside the
//! state enum itself, so a state/handle mismatch is unrepresentable: there is
//! no nullable session field to check ad hoc at every call site.
//!
//! Ordering contracts (the whole point of this module):
//!
//! - **Resume**: configuration is pushed first, then the service resumes,
//!   then the rendering surface starts callback delivery. Configuration must
//!   be applied before frames are produced under it, and the surface may only
//!   start once the service is confirmed live, or a redraw can reach a
//!   not-yet-valid session.
//! - **Pause**: the exact reverse. The surface stops callback delivery (a
//!   blocking handshake) before the service is touched, so no cycle can
//!   query a paused session.
//!
//! A resume failure with camera-unavailable discards the session entirely
//! (back to [`LifecycleState::Absent`]); the user recovers by re-entering the
//! foreground. Closing drops the handle and is irreversible.

use crate::availability::{Availability, AvailabilityGate};
use crate::config::Configuration;
use crate::message::{self, MessageSink};
use crate::render::RenderSurface;
use crate::service::{TrackingService, TrackingSession};
use crate::settings::{DepthSettings, InstantPlacementSettings};
use crate::trace::{GateEvent, SessionTransitionEvent, Tracer};

/// Observable lifecycle state, for tests and tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// No session exists.
    Absent,
    /// A session exists but has never resumed.
    Created,
    /// The session is live and producing frames.
    Resumed,
    /// The session exists but frame production is stopped.
    Paused,
    /// Permanent teardown; no session will ever exist again.
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Created,
    Resumed,
    Paused,
}

enum Slot<S> {
    Absent,
    Live {
        session: S,
        phase: Phase,
        // One-shot camera texture binding flag, scoped to this session
        // instance so a replacement session starts unbound.
        textures_bound: bool,
    },
    Closed,
}

/// Owns the session handle and drives its lifecycle transitions.
pub struct SessionLifecycleController<S: TrackingSession> {
    slot: Slot<S>,
    gate: AvailabilityGate,
    config: Configuration,
}

impl<S: TrackingSession> core::fmt::Debug for SessionLifecycleController<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionLifecycleController")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: TrackingSession> Default for SessionLifecycleController<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TrackingSession> SessionLifecycleController<S> {
    /// Creates a controller with no session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Slot::Absent,
            gate: AvailabilityGate::new(),
            config: Configuration {
                light_estimation: crate::config::LightEstimation::EnvironmentalHdr,
                depth_mode: crate::config::DepthMode::Disabled,
                instant_placement: crate::config::InstantPlacementMode::Disabled,
                update_mode: crate::config::UpdateMode::Blocking,
            },
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        match &self.slot {
            Slot::Absent => LifecycleState::Absent,
            Slot::Closed => LifecycleState::Closed,
            Slot::Live { phase, .. } => match phase {
                Phase::Created => LifecycleState::Created,
                Phase::Resumed => LifecycleState::Resumed,
                Phase::Paused => LifecycleState::Paused,
            },
        }
    }

    /// Returns the configuration most recently applied to a session.
    #[must_use]
    pub const fn current_config(&self) -> Configuration {
        self.config
    }

    /// Handles a host foreground entry.
    ///
    /// While no session exists this runs the availability gate and, once it
    /// reports ready, creates a session. With a created or paused session in
    /// hand it then performs the resume sequence: configure, resume the
    /// service, start the rendering surface, in that exact order.
    ///
    /// Returns the state after the transition. Install/permission flows and
    /// failures leave the controller in [`LifecycleState::Absent`]; the
    /// caller retries by entering the foreground again.
    pub fn on_foreground<Svc>(
        &mut self,
        service: &mut Svc,
        surface: &mut dyn RenderSurface,
        depth: &DepthSettings,
        instant: &InstantPlacementSettings,
        messages: &mut dyn MessageSink,
        tracer: &mut Tracer<'_>,
    ) -> LifecycleState
    where
        Svc: TrackingService<Session = S>,
    {
        match &self.slot {
            Slot::Closed => return LifecycleState::Closed,
            Slot::Live { .. } => {}
            Slot::Absent => {
                let availability = self.gate.ensure_ready(service);
                tracer.gate(&GateEvent {
                    outcome: availability.outcome(),
                });
                match availability {
                    Availability::Ready => {}
                    Availability::InstallRequested | Availability::PermissionRequested => {
                        return LifecycleState::Absent;
                    }
                    Availability::Unavailable(e) => {
                        message::report(messages, tracer, e.user_message());
                        return LifecycleState::Absent;
                    }
                }
                match service.create_session() {
                    Ok(session) => {
                        self.slot = Slot::Live {
                            session,
                            phase: Phase::Created,
                            textures_bound: false,
                        };
                        tracer.session_transition(&SessionTransitionEvent {
                            from: LifecycleState::Absent,
                            to: LifecycleState::Created,
                        });
                    }
                    Err(e) => {
                        message::report(messages, tracer, e.user_message());
                        return LifecycleState::Absent;
                    }
                }
            }
        }
        self.resume(surface, depth, instant, messages, tracer)
    }

    /// Handles a host background entry.
    ///
    /// Pauses in the reverse order of resume: the rendering surface stops
    /// callback delivery first (blocking until any in-flight redraw has
    /// returned), then the service pauses. A no-op unless currently resumed.
    pub fn on_background(
        &mut self,
        surface: &mut dyn RenderSurface,
        messages: &mut dyn MessageSink,
        tracer: &mut Tracer<'_>,
    ) -> LifecycleState {
        let outcome = {
            let Slot::Live { session, phase, .. } = &mut self.slot else {
                return self.state();
            };
            if *phase != Phase::Resumed {
                return self.state();
            }
            surface.pause_callbacks();
            match session.pause() {
                Ok(()) => {
                    *phase = Phase::Paused;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };
        match outcome {
            Ok(()) => {
                tracer.session_transition(&SessionTransitionEvent {
                    from: LifecycleState::Resumed,
                    to: LifecycleState::Paused,
                });
                LifecycleState::Paused
            }
            Err(e) => {
                self.slot = Slot::Absent;
                message::report(messages, tracer, e.user_message());
                tracer.session_transition(&SessionTransitionEvent {
                    from: LifecycleState::Resumed,
                    to: LifecycleState::Absent,
                });
                LifecycleState::Absent
            }
        }
    }

    /// Permanent teardown. Drops the session handle, releasing its native
    /// resources. Irreversible; every later call on this controller is a
    /// no-op.
    pub fn close(&mut self, tracer: &mut Tracer<'_>) {
        let from = self.state();
        if from == LifecycleState::Closed {
            return;
        }
        self.slot = Slot::Closed;
        tracer.session_transition(&SessionTransitionEvent {
            from,
            to: LifecycleState::Closed,
        });
    }

    /// Grants the orchestrator access to the resumed session, or `None` in
    /// any other state.
    pub fn active(&mut self) -> Option<ActiveSession<'_, S>> {
        match &mut self.slot {
            Slot::Live {
                session,
                phase: Phase::Resumed,
                textures_bound,
            } => Some(ActiveSession {
                session,
                textures_bound,
            }),
            _ => None,
        }
    }

    /// Discards the session after a session-fatal failure (camera lost while
    /// advancing). Immediate and unconditional; the user recovers by
    /// re-entering the foreground.
    pub fn discard_session(&mut self, tracer: &mut Tracer<'_>) {
        let from = self.state();
        if matches!(self.slot, Slot::Live { .. }) {
            self.slot = Slot::Absent;
            tracer.session_transition(&SessionTransitionEvent {
                from,
                to: LifecycleState::Absent,
            });
        }
    }

    fn resume(
        &mut self,
        surface: &mut dyn RenderSurface,
        depth: &DepthSettings,
        instant: &InstantPlacementSettings,
        messages: &mut dyn MessageSink,
        tracer: &mut Tracer<'_>,
    ) -> LifecycleState {
        let from = self.state();
        let applied = {
            let Slot::Live { session, phase, .. } = &mut self.slot else {
                return from;
            };
            if *phase == Phase::Resumed {
                return LifecycleState::Resumed;
            }
            // Configuration is rebuilt on every pass into Resumed; it is
            // never mutated on a resumed session.
            let config = Configuration::build(session.is_depth_supported(), depth, instant);
            match session.configure(&config).and_then(|()| session.resume()) {
                Ok(()) => {
                    *phase = Phase::Resumed;
                    Ok(config)
                }
                Err(e) => Err(e),
            }
        };
        match applied {
            Ok(config) => {
                self.config = config;
                // The surface starts only after the service is confirmed
                // live; the first redraw cannot observe a dead session.
                surface.resume_callbacks();
                tracer.session_transition(&SessionTransitionEvent {
                    from,
                    to: LifecycleState::Resumed,
                });
                LifecycleState::Resumed
            }
            Err(e) => {
                self.slot = Slot::Absent;
                message::report(messages, tracer, e.user_message());
                tracer.session_transition(&SessionTransitionEvent {
                    from,
                    to: LifecycleState::Absent,
                });
                LifecycleState::Absent
            }
        }
    }
}

/// Mutable access to the resumed session plus its one-shot texture flag.
///
/// Handed out by [`SessionLifecycleController::active`] for the duration of
/// one orchestration cycle.
pub struct ActiveSession<'a, S: TrackingSession> {
    session: &'a mut S,
    textures_bound: &'a mut bool,
}

impl<S: TrackingSession> core::fmt::Debug for ActiveSession<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("textures_bound", &self.textures_bound)
            .finish_non_exhaustive()
    }
}

impl<S: TrackingSession> ActiveSession<'_, S> {
    /// The live session.
    pub fn session(&mut self) -> &mut S {
        self.session
    }

    /// Whether the camera texture has been bound to this session instance.
    #[must_use]
    pub fn textures_bound(&self) -> bool {
        *self.textures_bound
    }

    /// Marks the camera texture as bound for this session instance.
    pub fn mark_textures_bound(&mut self) {
        *self.textures_bound = true;
    }
}
