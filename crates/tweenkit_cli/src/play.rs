//! Offline playback of sequence files
//!
//! Builds a sequencer from a `SequenceFile` and drives it with a manual clock,
//! one simulated frame at a time, writing every update and step boundary.

use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;

use tweenkit_animation::{Clock, ManualClock, Properties, Sequencer, Tween, TweenRegistry};

use crate::config::SequenceFile;

/// Summary of a playback run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayReport {
    pub frames: u32,
    pub elapsed_ms: f64,
    pub completed: bool,
}

/// Play `file` to completion (or `max_frames`), writing one line per event
pub fn play(file: &SequenceFile, fps: Option<u32>, out: &mut impl Write) -> Result<PlayReport> {
    let fps = fps.unwrap_or(file.fps).max(1);
    let frame_ms = 1000.0 / fps as f64;

    let clock = ManualClock::new();
    let registry = TweenRegistry::with_clock(clock.clone());
    let sequencer = Sequencer::new(&registry.handle());
    let events = Rc::new(RefCell::new(Vec::<String>::new()));

    for (index, step) in file.steps.iter().enumerate() {
        let label = step
            .label
            .clone()
            .unwrap_or_else(|| format!("step {}", index + 1));

        if let Some(delay) = step.delay {
            let ev = events.clone();
            sequencer.add_delay_then(delay, move || {
                ev.borrow_mut().push(format!("-- {label} ({delay}ms) done"));
            });
            continue;
        }

        let mut tweens = Vec::with_capacity(step.tweens.len());
        for spec in &step.tweens {
            let tween = Tween::try_new(
                &registry.handle(),
                spec.origin(),
                spec.target(),
                spec.config()?,
            )
            .with_context(|| format!("Invalid tween `{}`", spec.name))?;

            let (ev_update, ev_complete) = (events.clone(), events.clone());
            let (name_update, name_complete) = (spec.name.clone(), spec.name.clone());
            tween
                .on_update(move |values| {
                    ev_update
                        .borrow_mut()
                        .push(format!("{name_update} {}", format_values(values)));
                })
                .on_complete(move || {
                    ev_complete
                        .borrow_mut()
                        .push(format!("{name_complete} complete"));
                });
            tweens.push(tween);
        }

        let ev = events.clone();
        sequencer.add_step_then(tweens, move || {
            ev.borrow_mut().push(format!("-- {label} done"));
        });
    }

    let done = Rc::new(Cell::new(false));
    let d = done.clone();
    sequencer.on_complete(move || d.set(true)).run();

    let mut frames = 0;
    while !done.get() && frames < file.max_frames {
        clock.advance(frame_ms);
        registry.tick();
        frames += 1;

        for line in events.borrow_mut().drain(..) {
            writeln!(out, "[{:>9.1}ms] {line}", clock.now_ms())?;
        }
    }

    if !done.get() {
        tracing::warn!(frames, "sequence did not finish within max_frames");
    }

    Ok(PlayReport {
        frames,
        elapsed_ms: clock.now_ms(),
        completed: done.get(),
    })
}

fn format_values(values: &Properties) -> String {
    values
        .iter()
        .map(|(key, value)| format!("{key}={value:.4}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(toml: &str) -> (PlayReport, String) {
        let file = SequenceFile::from_toml(toml).unwrap();
        let mut out = Vec::new();
        let report = play(&file, None, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_plays_steps_in_order() {
        let (report, output) = run(
            r#"
            fps = 100
            [[step]]
            label = "first"
            [[step.tween]]
            name = "a"
            from = { x = 0.0 }
            to = { x = 10.0 }
            duration = 50

            [[step]]
            label = "wait"
            delay = 30

            [[step]]
            label = "last"
            [[step.tween]]
            name = "b"
            from = { y = 1.0 }
            to = { y = 0.0 }
            duration = 20
            "#,
        );

        assert!(report.completed);
        let first = output.find("-- first done").unwrap();
        let wait = output.find("-- wait (30ms) done").unwrap();
        let last = output.find("-- last done").unwrap();
        assert!(first < wait && wait < last);
        assert!(output.contains("a x=10.0000"));
        assert!(output.contains("b y=0.0000"));
        assert!(output.find("b complete").unwrap() < last);
    }

    #[test]
    fn test_values_printed_in_file_order() {
        let (report, output) = run(
            r#"
            fps = 10
            [[step]]
            [[step.tween]]
            name = "card"
            from = { y = 40.0, opacity = 0.0, x = 0.0 }
            to = { y = 0.0, opacity = 1.0, x = 12.0 }
            duration = 100
            "#,
        );

        assert!(report.completed);
        assert!(output.contains("card y=0.0000 opacity=1.0000 x=12.0000"));
    }

    #[test]
    fn test_empty_sequence_completes_without_frames() {
        let (report, output) = run("fps = 60\n");
        assert!(report.completed);
        assert_eq!(report.frames, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_stops_at_max_frames() {
        let (report, _) = run(
            r#"
            max_frames = 5
            [[step]]
            delay = 10000
            "#,
        );
        assert!(!report.completed);
        assert_eq!(report.frames, 5);
    }

    #[test]
    fn test_fps_override() {
        let file = SequenceFile::from_toml("[[step]]\ndelay = 100\n").unwrap();
        let report = play(&file, Some(10), &mut Vec::<u8>::new()).unwrap();
        assert!(report.completed);
        // One frame lands on 100ms, the poll on the next frame advances
        assert_eq!(report.frames, 2);
    }

    #[test]
    fn test_rejects_mismatched_keys() {
        let file = SequenceFile::from_toml(
            r#"
            [[step]]
            [[step.tween]]
            name = "broken"
            from = { x = 0.0 }
            to = { y = 1.0 }
            "#,
        )
        .unwrap();
        let err = play(&file, None, &mut Vec::<u8>::new()).unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }
}
