use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::event::terminate::TerminateEvent;
use crate::render::target::PixelFormat;

fn fps() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn canvas() -> Canvas {
    Canvas {
        width: 8,
        height: 4,
    }
}

#[derive(Default)]
struct Recorder {
    seen: Rc<RefCell<Vec<EventStep>>>,
    activations: Rc<RefCell<u32>>,
}

impl Event for Recorder {
    fn class(&self) -> crate::event::EventClass {
        crate::event::EventClass::State
    }

    fn on_activate(&mut self, _step: &EventStep) {
        *self.activations.borrow_mut() += 1;
    }

    fn update(
        &mut self,
        step: &EventStep,
        _ctx: &mut FrameContext,
        _env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        self.seen.borrow_mut().push(*step);
        Ok(EventOutcome::Idle)
    }
}

struct Failing;

impl Event for Failing {
    fn class(&self) -> crate::event::EventClass {
        crate::event::EventClass::Render
    }

    fn update(
        &mut self,
        _step: &EventStep,
        _ctx: &mut FrameContext,
        _env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        Err(SeqError::render("collaborator exploded"))
    }
}

#[test]
fn empty_timeline_outputs_clear_color() {
    let mut tl = Timeline::builder(fps(), canvas())
        .clear_color(Rgba8Premul::from_straight_rgba(0, 0, 255, 255))
        .build()
        .unwrap();
    let out = tl.evaluate(0.0);
    assert_eq!(out.pixel(3, 2), Some([0, 0, 255, 255]));
    assert_eq!(tl.duration_frames(), 0);
    assert_eq!(tl.last_stats().last_written, None);
}

#[test]
fn aspect_defaults_to_canvas() {
    let tl = Timeline::builder(fps(), canvas()).build().unwrap();
    assert_eq!(tl.aspect(), 2.0);
}

#[test]
fn rejects_bad_aspect_and_fps() {
    assert!(
        Timeline::builder(fps(), canvas())
            .aspect(0.0)
            .build()
            .is_err()
    );
    assert!(
        Timeline::builder(Fps { num: 30, den: 0 }, canvas())
            .build()
            .is_err()
    );
}

#[test]
fn rejects_hand_built_empty_range() {
    let range = FrameRange {
        start: crate::foundation::core::FrameIndex(5),
        end: crate::foundation::core::FrameIndex(5),
    };
    let err = Timeline::builder(fps(), canvas())
        .event(EventSpec::new("empty", range, TerminateEvent))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("event 'empty'"));
}

#[test]
fn rejects_target_outside_pool() {
    let mut b = Timeline::builder(fps(), canvas());
    b.add_target(TargetDesc::new(4, 4, PixelFormat::Rgba8Unorm));
    let ev = crate::event::effect::FullscreenEffectEvent::new(
        TargetId(3),
        vec![crate::material::PassDescriptor::new("x")],
    );
    let err = b
        .event(EventSpec::new("fx", FrameRange::frames(0, 10).unwrap(), ev))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("outside the pool"));
}

#[test]
fn activation_runs_once_per_edge() {
    let recorder = Recorder::default();
    let seen = recorder.seen.clone();
    let activations = recorder.activations.clone();
    let mut tl = Timeline::builder(fps(), canvas())
        .event(EventSpec::new("recorder", FrameRange::frames(2, 4).unwrap(), recorder))
        .build()
        .unwrap();

    for f in [2.0, 3.0, 4.0, 2.0] {
        tl.evaluate(f);
    }
    assert_eq!(*activations.borrow(), 2);
    let frames: Vec<f64> = seen.borrow().iter().map(|s| s.frame).collect();
    assert_eq!(frames, vec![2.0, 3.0, 2.0]);
}

#[test]
fn prev_t_is_unclamped_on_first_frame() {
    let recorder = Recorder::default();
    let seen = recorder.seen.clone();
    let mut tl = Timeline::builder(fps(), canvas())
        .event(EventSpec::new("recorder", FrameRange::frames(10, 14).unwrap(), recorder))
        .build()
        .unwrap();
    tl.evaluate(10.0);
    let step = seen.borrow()[0];
    assert_eq!(step.t, 0.0);
    assert_eq!(step.prev_t, -0.25);
    assert_eq!(step.aspect, 2.0);
}

#[test]
fn failures_are_counted_not_propagated() {
    let mut tl = Timeline::builder(fps(), canvas())
        .event(EventSpec::new("bad", FrameRange::frames(0, 5).unwrap(), Failing))
        .event(EventSpec::new(
            "recorder",
            FrameRange::frames(0, 5).unwrap(),
            Recorder::default(),
        ))
        .build()
        .unwrap();
    assert_eq!(tl.event_names().collect::<Vec<_>>(), vec!["bad", "recorder"]);
    tl.evaluate(1.0);
    let stats = tl.last_stats();
    assert_eq!(stats.active_events, 2);
    assert_eq!(stats.failed_events, 1);
}

#[test]
fn finished_flag_is_sticky() {
    let mut tl = Timeline::builder(fps(), canvas())
        .event(EventSpec::new(
            "end",
            FrameRange::frames(100, 101).unwrap(),
            TerminateEvent,
        ))
        .build()
        .unwrap();
    tl.evaluate(99.0);
    assert!(!tl.is_finished());
    tl.evaluate(100.0);
    assert!(tl.is_finished());
    tl.evaluate(0.0);
    assert!(tl.is_finished());
    assert!(!tl.context().finish_requested);
    assert_eq!(tl.duration_frames(), 101);
}

#[test]
fn evaluate_seconds_converts_through_fps() {
    let recorder = Recorder::default();
    let seen = recorder.seen.clone();
    let mut tl = Timeline::builder(fps(), canvas())
        .event(EventSpec::new("recorder", FrameRange::frames(0, 90).unwrap(), recorder))
        .build()
        .unwrap();
    tl.evaluate_seconds(1.5);
    assert_eq!(seen.borrow()[0].frame, 45.0);
    assert!((tl.context().time_ms - 1500.0).abs() < 1e-9);
}
