// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use lucida_core::trace::CycleOutcomeKind;

use crate::recorder::{RecordedEvent, decode};

/// Fallback duration for the final cycle, matching a 30 Hz camera interval.
const DEFAULT_CYCLE_US: f64 = 33_333.3;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Completed cycles become complete ("X") events whose duration spans to the
/// next completed cycle's camera timestamp. Everything else is emitted as an
/// instant event at the most recent known timestamp.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let recorded: Vec<RecordedEvent> = decode(bytes).collect();

    // Camera timestamps of completed cycles, in encounter order, for
    // computing per-cycle durations.
    let cycle_ts_us: Vec<f64> = recorded
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::CycleSummary(s) if s.timestamp_ns != 0 => Some(ns_to_us(s.timestamp_ns)),
            _ => None,
        })
        .collect();

    let mut events: Vec<Value> = Vec::new();
    let mut last_ts_us = 0.0;
    let mut completed_seen = 0;

    for recorded in &recorded {
        match recorded {
            RecordedEvent::Gate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "AvailabilityGate",
                    "cat": "Lifecycle",
                    "ts": last_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "outcome": format!("{:?}", e.outcome),
                    }
                }));
            }
            RecordedEvent::Transition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SessionTransition",
                    "cat": "Lifecycle",
                    "ts": last_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "from": format!("{:?}", e.from),
                        "to": format!("{:?}", e.to),
                    }
                }));
            }
            RecordedEvent::FrameAdvanced(e) => {
                if e.timestamp_ns != 0 {
                    last_ts_us = ns_to_us(e.timestamp_ns);
                }
                events.push(json!({
                    "ph": "i",
                    "name": "FrameAdvanced",
                    "cat": "Cycle",
                    "ts": last_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "cycle_index": e.cycle_index,
                        "tracking": format!("{:?}", e.tracking),
                    }
                }));
            }
            RecordedEvent::Depth(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "DepthAcquisition",
                    "cat": "Cycle",
                    "ts": last_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "cycle_index": e.cycle_index,
                        "acquired": e.acquired,
                    }
                }));
            }
            RecordedEvent::CycleSummary(s) => {
                let args = json!({
                    "cycle_index": s.cycle_index,
                    "outcome": format!("{:?}", s.outcome),
                    "background_drawn": s.background_drawn,
                    "depth_attempted": s.depth_attempted,
                    "depth_acquired": s.depth_acquired,
                    "scene_drawn": s.scene_drawn,
                });
                if s.outcome == CycleOutcomeKind::Completed && s.timestamp_ns != 0 {
                    let ts = ns_to_us(s.timestamp_ns);
                    let dur = cycle_ts_us
                        .get(completed_seen + 1)
                        .map_or(DEFAULT_CYCLE_US, |next| (next - ts).max(0.0));
                    completed_seen += 1;
                    last_ts_us = ts;
                    events.push(json!({
                        "ph": "X",
                        "name": "Cycle",
                        "cat": "Cycle",
                        "ts": ts,
                        "dur": dur,
                        "pid": 0,
                        "tid": 0,
                        "args": args,
                    }));
                } else {
                    events.push(json!({
                        "ph": "i",
                        "name": "CycleSummary",
                        "cat": "Cycle",
                        "ts": last_ts_us,
                        "pid": 0,
                        "tid": 0,
                        "s": "t",
                        "args": args,
                    }));
                }
            }
            RecordedEvent::UserMessage(text) => {
                events.push(json!({
                    "ph": "i",
                    "name": "UserMessage",
                    "cat": "Ui",
                    "ts": last_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "text": text,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ns_to_us(ns: i64) -> f64 {
    ns as f64 / 1000.0
}
