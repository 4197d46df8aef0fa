//! Headless presentation host: drives a sequencer and prints a frame trace

use anyhow::{Context, Result};
use rollcred_core::TextMetrics;
use rollcred_player::{InputEvent, SequenceEvent, Sequencer, SkipAction, SkipController};
use serde::Serialize;
use std::io::Write;

/// Scripted input and output settings for one run
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Give up after this many frames
    pub max_frames: u64,
    /// Frames on which an advance press is injected
    pub advance_at: Vec<u64>,
    /// Frame on which a cancel press is injected
    pub cancel_at: Option<u64>,
    /// Emit JSON lines instead of text
    pub json: bool,
    /// Only print frames that produced events
    pub events_only: bool,
}

/// State of one frame as written to the trace
#[derive(Debug, Clone, Serialize)]
pub struct FrameTrace {
    pub frame: u64,
    pub block: Option<usize>,
    pub phase: Option<&'static str>,
    pub opacity: Option<u8>,
    pub top: Option<f32>,
    /// Hold frames left, `None` when indefinite or idle
    pub hold: Option<u32>,
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<&'static str>,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub finished: bool,
}

pub fn run<M, W>(
    sequencer: &mut Sequencer<M>,
    controller: &SkipController,
    options: &PlayOptions,
    out: &mut W,
) -> Result<RunSummary>
where
    M: TextMetrics,
    W: Write,
{
    let opening = sequencer.take_events();
    if !opening.is_empty() {
        let trace = trace_frame(sequencer, 0, None, &opening);
        write_trace(out, &trace, options.json)?;
    }

    while !sequencer.is_finished() && sequencer.frame() < options.max_frames {
        let frame = sequencer.frame() + 1;
        let inputs = scripted_inputs(options, frame);
        let action = controller.handle(&inputs, sequencer);
        let input = match action {
            SkipAction::None => None,
            SkipAction::Advanced => Some("advance"),
            SkipAction::Cancelled => Some("cancel"),
        };

        let mut events = sequencer.take_events();
        events.extend(sequencer.tick());

        if options.events_only && events.is_empty() && input.is_none() {
            continue;
        }
        let trace = trace_frame(sequencer, frame, input, &events);
        write_trace(out, &trace, options.json)?;
    }

    out.flush().context("Failed to flush trace output")?;
    Ok(RunSummary {
        frames: sequencer.frame(),
        finished: sequencer.is_finished(),
    })
}

fn scripted_inputs(options: &PlayOptions, frame: u64) -> Vec<InputEvent> {
    let mut inputs = Vec::new();
    if options.cancel_at == Some(frame) {
        inputs.push(InputEvent::Cancel);
    }
    if options.advance_at.contains(&frame) {
        inputs.push(InputEvent::Confirm);
    }
    inputs
}

fn trace_frame<M: TextMetrics>(
    sequencer: &Sequencer<M>,
    frame: u64,
    input: Option<&'static str>,
    events: &[SequenceEvent],
) -> FrameTrace {
    let drawable = sequencer.drawable();
    FrameTrace {
        frame,
        block: drawable.as_ref().map(|d| d.index),
        phase: drawable.as_ref().map(|d| d.phase.as_str()),
        opacity: drawable.as_ref().map(|d| d.opacity),
        top: drawable.as_ref().map(|d| d.top),
        hold: sequencer
            .active()
            .and_then(|active| active.state().hold().remaining()),
        background: sequencer.background().map(|layer| layer.image_id.clone()),
        input,
        events: events.iter().map(ToString::to_string).collect(),
    }
}

fn write_trace<W: Write>(out: &mut W, trace: &FrameTrace, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, trace).context("Failed to serialize frame trace")?;
        writeln!(out)?;
        return Ok(());
    }

    write!(out, "frame {:>5}:", trace.frame)?;
    match (trace.block, trace.phase, trace.opacity, trace.top) {
        (Some(block), Some(phase), Some(opacity), Some(top)) => write!(
            out,
            " block {} {:<10} opacity={:>3} y={:.1}",
            block, phase, opacity, top
        )?,
        _ => write!(out, " idle")?,
    }
    if let Some(hold) = trace.hold {
        write!(out, " hold={}", hold)?;
    }
    if let Some(background) = &trace.background {
        write!(out, " bg={}", background)?;
    }
    if let Some(input) = trace.input {
        write!(out, " [{}]", input)?;
    }
    if !trace.events.is_empty() {
        write!(out, " | {}", trace.events.join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}
