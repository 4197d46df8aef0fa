use rollcred_core::{Hold, ParseOptions, PlaybackConfig, Sequence, TextMetrics, TextSize};
use rollcred_player::{
    EndReason, InputEvent, SequenceEvent, Sequencer, SequencerState, SkipAction, SkipController,
};

struct GridMetrics;

impl TextMetrics for GridMetrics {
    fn measure(&self, text: &str) -> TextSize {
        TextSize::new(text.chars().count() as f32 * 12.0, 36.0)
    }
}

const SCRIPT: &str = "\
Credits script for the test game.

<block:-1,0,255,15,,center,Title>
My Game
v<VERSION>
</block>

<block:-1,-3,20,20,offbot,center>
Programming
Someone
Art
Someone Else
</block>

<block:60,0,25,25,200,right,Ending>
Thanks for playing!
</block>
";

fn run_to_end(sequencer: &mut Sequencer<GridMetrics>, limit: u64) -> Vec<SequenceEvent> {
    let mut events = sequencer.take_events();
    while !sequencer.is_finished() && sequencer.frame() < limit {
        events.extend(sequencer.tick());
    }
    events
}

#[test]
fn full_script_plays_every_block() {
    let sequence = Sequence::parse(SCRIPT, &ParseOptions::with_version("2.0"));
    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.blocks()[0].content_lines()[1], "v2.0");

    let mut sequencer = Sequencer::new(PlaybackConfig::default(), GridMetrics).unwrap();
    sequencer.start(sequence).unwrap();
    let events = run_to_end(&mut sequencer, 10_000);

    assert_eq!(sequencer.state(), SequencerState::Finished(EndReason::Completed));

    let started: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SequenceEvent::BlockStarted { index, hold } => Some((*index, *hold)),
            _ => None,
        })
        .collect();
    // Block 0: 2 lines * 36px, doubled. Block 1: (624 + 4 * 36) / 3.
    assert_eq!(
        started,
        vec![(0, Hold::Frames(144)), (1, Hold::Frames(256)), (2, Hold::Frames(60))]
    );

    let backgrounds: Vec<_> = sequencer
        .backgrounds()
        .iter()
        .map(|layer| (layer.image_id.as_str(), layer.block_index))
        .collect();
    assert_eq!(backgrounds, vec![("Title", 0), ("Ending", 2)]);
    assert_eq!(
        events.last(),
        Some(&SequenceEvent::Finished(EndReason::Completed))
    );
}

#[test]
fn scripted_skips_shorten_playback() {
    let config = PlaybackConfig::default();
    let controller = SkipController::from_config(&config);

    let mut unskipped = Sequencer::new(config.clone(), GridMetrics).unwrap();
    unskipped
        .start(Sequence::parse(SCRIPT, &ParseOptions::default()))
        .unwrap();
    run_to_end(&mut unskipped, 10_000);

    let mut skipped = Sequencer::new(config, GridMetrics).unwrap();
    skipped
        .start(Sequence::parse(SCRIPT, &ParseOptions::default()))
        .unwrap();
    while !skipped.is_finished() {
        if skipped.frame() % 30 == 29 {
            controller.handle(&[InputEvent::Confirm], &mut skipped);
        }
        skipped.tick();
    }

    assert_eq!(skipped.state(), SequencerState::Finished(EndReason::Completed));
    assert!(skipped.frame() < unskipped.frame());
}

#[test]
fn cancel_mid_sequence_stops_everything() {
    let config = PlaybackConfig::default();
    let controller = SkipController::from_config(&config);
    let mut sequencer = Sequencer::new(config, GridMetrics).unwrap();
    sequencer
        .start(Sequence::parse(SCRIPT, &ParseOptions::default()))
        .unwrap();

    for _ in 0..200 {
        sequencer.tick();
    }
    assert_eq!(sequencer.active().map(|active| active.index()), Some(1));

    assert_eq!(
        controller.handle(&[InputEvent::Cancel], &mut sequencer),
        SkipAction::Cancelled
    );
    assert_eq!(
        sequencer.take_events(),
        vec![
            SequenceEvent::BlockDismissed { index: 1 },
            SequenceEvent::Finished(EndReason::Cancelled),
        ]
    );
    assert!(sequencer.drawable().is_none());
}

#[test]
fn degenerate_script_never_hangs() {
    let script = "<block:5,0,255,255>\nfirst\n</block>\n<block:-1,0,0,0>\n</block>\n<block:3,0,255,255>\ntail";
    let mut sequencer = Sequencer::new(PlaybackConfig::default(), GridMetrics).unwrap();
    sequencer
        .start(Sequence::parse(script, &ParseOptions::default()))
        .unwrap();
    let events = run_to_end(&mut sequencer, 1_000);

    assert!(sequencer.is_finished());
    assert!(events.contains(&SequenceEvent::BlockSkipped { index: 2 }));
    assert!(events.contains(&SequenceEvent::BlockStarted {
        index: 1,
        hold: Hold::Frames(0)
    }));
}

#[test]
fn fractional_negative_duration_uses_auto_timing() {
    let mut sequencer = Sequencer::new(PlaybackConfig::default(), GridMetrics).unwrap();
    sequencer
        .start(Sequence::parse(
            "<block:-0.5,0,255,255>\nHi\n</block>",
            &ParseOptions::default(),
        ))
        .unwrap();
    // One 36px line, held for twice its height
    assert_eq!(
        sequencer.take_events(),
        vec![SequenceEvent::BlockStarted {
            index: 0,
            hold: Hold::Frames(72)
        }]
    );
}
