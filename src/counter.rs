//! Count-up animation that starts the first time its element becomes visible.

use std::{cell::RefCell, rc::Rc};

use crate::{schedule::Scheduler, viewport::Viewport};

pub const DEFAULT_DURATION_MS: u32 = 4_000;
pub const DURATION_MS_BOUNDS: (u32, u32) = (100, 60_000);
pub const VISIBILITY_THRESHOLD: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationTarget {
    end: u64,
    duration_ms: u32,
}

impl AnimationTarget {
    pub fn new(end: u64, duration_ms: u32) -> Self {
        Self {
            end,
            duration_ms: duration_ms.max(1),
        }
    }

    pub fn end(self) -> u64 {
        self.end
    }

    pub fn duration_ms(self) -> u32 {
        self.duration_ms
    }
}

/// Default counting time for a target when a tile does not set one.
pub fn tiered_duration_ms(end: u64) -> u32 {
    if end > 1_000 {
        6_000
    } else if end > 100 {
        5_000
    } else {
        DEFAULT_DURATION_MS
    }
}

pub fn ease_out_quart(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(4)
}

/// Displayed value `elapsed_ms` after the first animation frame.
pub fn value_at(target: AnimationTarget, elapsed_ms: f64) -> u64 {
    let progress = (elapsed_ms / f64::from(target.duration_ms)).clamp(0.0, 1.0);
    let eased = (target.end as f64 * ease_out_quart(progress)).floor() as u64;
    eased.min(target.end)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visibility {
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl Visibility {
    pub fn meets(self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
    Continue,
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterState {
    target: AnimationTarget,
    current_value: u64,
    has_started: bool,
    has_completed_once: bool,
    clock_start: Option<f64>,
}

impl CounterState {
    pub fn new(target: AnimationTarget) -> Self {
        Self {
            target,
            current_value: 0,
            has_started: false,
            has_completed_once: false,
            clock_start: None,
        }
    }

    /// Feeds a visibility report. Returns true only for the report that
    /// starts the animation; later reports are ignored.
    pub fn observe(&mut self, visibility: Visibility) -> bool {
        if visibility.meets(VISIBILITY_THRESHOLD) {
            self.trigger()
        } else {
            false
        }
    }

    pub fn trigger(&mut self) -> bool {
        if self.has_started {
            return false;
        }
        self.has_started = true;
        true
    }

    /// Advances the animation to the frame timestamp `now_ms`. The first
    /// frame after the trigger anchors the clock.
    pub fn advance(&mut self, now_ms: f64) -> FrameStep {
        if !self.has_started || self.has_completed_once {
            return FrameStep::Finished;
        }

        let start = *self.clock_start.get_or_insert(now_ms);
        let elapsed = now_ms - start;
        self.current_value = self.current_value.max(value_at(self.target, elapsed));

        if elapsed >= f64::from(self.target.duration_ms) {
            self.current_value = self.target.end;
            self.has_completed_once = true;
            FrameStep::Finished
        } else {
            FrameStep::Continue
        }
    }

    pub fn value(&self) -> u64 {
        self.current_value
    }

    pub fn target(&self) -> AnimationTarget {
        self.target
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn has_completed_once(&self) -> bool {
        self.has_completed_once
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u64,
    pub finished: bool,
}

struct CountUpShared<S: Scheduler> {
    state: CounterState,
    pending: Option<S::Task>,
    on_frame: Rc<dyn Fn(CounterFrame)>,
}

/// Drives a [`CounterState`] one frame at a time. Dropping it cancels the
/// pending frame.
pub struct CountUp<S: Scheduler> {
    scheduler: S,
    shared: Rc<RefCell<CountUpShared<S>>>,
}

impl<S: Scheduler> CountUp<S> {
    pub fn new(
        scheduler: S,
        target: AnimationTarget,
        on_frame: impl Fn(CounterFrame) + 'static,
    ) -> Self {
        Self {
            scheduler,
            shared: Rc::new(RefCell::new(CountUpShared {
                state: CounterState::new(target),
                pending: None,
                on_frame: Rc::new(on_frame),
            })),
        }
    }

    pub fn observe(&self, visibility: Visibility) -> bool {
        let fired = self.shared.borrow_mut().state.observe(visibility);
        if fired {
            schedule_frame(&self.scheduler, &self.shared);
        }
        fired
    }

    /// Starts the animation without waiting for a visibility report.
    pub fn trigger(&self) -> bool {
        let fired = self.shared.borrow_mut().state.trigger();
        if fired {
            schedule_frame(&self.scheduler, &self.shared);
        }
        fired
    }

    pub fn value(&self) -> u64 {
        self.shared.borrow().state.value()
    }

    pub fn is_animating(&self) -> bool {
        self.shared.borrow().pending.is_some()
    }
}

impl<S: Scheduler> Drop for CountUp<S> {
    fn drop(&mut self) {
        self.shared.borrow_mut().pending.take();
    }
}

/// A [`CountUp`] started by the visibility of one element. `triggered` is
/// shared across remounts: once any instance has fired, later instances
/// start at once instead of waiting to be seen again. Dropping it
/// unsubscribes from the element and cancels the pending frame.
pub struct ViewportCounter<S: Scheduler, V: Viewport> {
    watch: Option<V::Subscription>,
    count_up: Rc<CountUp<S>>,
}

impl<S: Scheduler, V: Viewport> ViewportCounter<S, V> {
    pub fn mount(
        scheduler: S,
        viewport: &V,
        element: Option<&V::Element>,
        target: AnimationTarget,
        triggered: Rc<RefCell<bool>>,
        on_frame: impl Fn(CounterFrame) + 'static,
        on_trigger: impl Fn(Visibility) + 'static,
    ) -> Self {
        let count_up = Rc::new(CountUp::new(scheduler, target, on_frame));

        if *triggered.borrow() {
            count_up.trigger();
            return Self {
                watch: None,
                count_up,
            };
        }

        let watch = element.and_then(|element| {
            let weak = Rc::downgrade(&count_up);
            viewport.watch_visibility(element, VISIBILITY_THRESHOLD, move |visibility| {
                let Some(count_up) = weak.upgrade() else {
                    return;
                };
                if count_up.observe(visibility) {
                    *triggered.borrow_mut() = true;
                    on_trigger(visibility);
                }
            })
        });

        Self { watch, count_up }
    }

    pub fn value(&self) -> u64 {
        self.count_up.value()
    }

    pub fn is_animating(&self) -> bool {
        self.count_up.is_animating()
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }
}

fn schedule_frame<S: Scheduler>(scheduler: &S, shared: &Rc<RefCell<CountUpShared<S>>>) {
    let weak = Rc::downgrade(shared);
    let next_scheduler = scheduler.clone();

    let task = scheduler.next_frame(move |now_ms| {
        let Some(shared) = weak.upgrade() else {
            return;
        };

        let (step, value, on_frame) = {
            let mut inner = shared.borrow_mut();
            inner.pending = None;
            let step = inner.state.advance(now_ms);
            (step, inner.state.value(), Rc::clone(&inner.on_frame))
        };

        on_frame(CounterFrame {
            value,
            finished: step == FrameStep::Finished,
        });

        if step == FrameStep::Continue {
            schedule_frame(&next_scheduler, &shared);
        }
    });

    shared.borrow_mut().pending = Some(task);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schedule::manual::{ManualScheduler, FRAME_INTERVAL_MS},
        viewport::manual::ManualViewport,
    };

    const VISIBLE: Visibility = Visibility {
        is_intersecting: true,
        ratio: 1.0,
    };
    const HIDDEN: Visibility = Visibility {
        is_intersecting: false,
        ratio: 0.0,
    };

    fn recording_count_up(
        scheduler: &ManualScheduler,
        target: AnimationTarget,
    ) -> (CountUp<ManualScheduler>, Rc<RefCell<Vec<CounterFrame>>>) {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&frames);
        let count_up = CountUp::new(scheduler.clone(), target, move |frame| {
            sink.borrow_mut().push(frame)
        });
        (count_up, frames)
    }

    #[test]
    fn tiered_duration_matches_stat_sizes() {
        assert_eq!(tiered_duration_ms(7), 4_000);
        assert_eq!(tiered_duration_ms(100), 4_000);
        assert_eq!(tiered_duration_ms(358), 5_000);
        assert_eq!(tiered_duration_ms(1_000), 5_000);
        assert_eq!(tiered_duration_ms(3_589), 6_000);
    }

    #[test]
    fn value_at_eases_out_and_clamps() {
        let target = AnimationTarget::new(1_000, 2_000);

        assert_eq!(value_at(target, 0.0), 0);
        assert_eq!(value_at(target, 1_000.0), 937);
        assert_eq!(value_at(target, 2_000.0), 1_000);
        assert_eq!(value_at(target, 9_000.0), 1_000);
        assert_eq!(value_at(target, -50.0), 0);
    }

    #[test]
    fn zero_duration_is_raised_to_one_millisecond() {
        assert_eq!(AnimationTarget::new(5, 0).duration_ms(), 1);
    }

    #[test]
    fn stays_at_zero_until_visible() {
        let scheduler = ManualScheduler::default();
        let (count_up, frames) = recording_count_up(&scheduler, AnimationTarget::new(28, 4_000));

        scheduler.advance_by(10_000.0);

        assert_eq!(count_up.value(), 0);
        assert!(frames.borrow().is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn visibility_below_threshold_does_not_trigger() {
        let scheduler = ManualScheduler::default();
        let (count_up, _frames) = recording_count_up(&scheduler, AnimationTarget::new(28, 4_000));

        assert!(!count_up.observe(Visibility {
            is_intersecting: true,
            ratio: 0.1,
        }));
        assert!(!count_up.observe(Visibility {
            is_intersecting: true,
            ratio: 0.29,
        }));
        assert!(!count_up.observe(Visibility {
            is_intersecting: true,
            ratio: 0.2995,
        }));
        assert!(!count_up.observe(HIDDEN));
        assert!(!count_up.is_animating());

        assert!(count_up.observe(Visibility {
            is_intersecting: true,
            ratio: 0.3,
        }));
        assert!(count_up.is_animating());
    }

    #[test]
    fn counts_up_monotonically_and_lands_on_end() {
        let scheduler = ManualScheduler::default();
        let (count_up, frames) = recording_count_up(&scheduler, AnimationTarget::new(3_589, 6_000));

        assert!(count_up.observe(VISIBLE));
        scheduler.advance_by(6_000.0 + 4.0 * FRAME_INTERVAL_MS);

        let frames = frames.borrow();
        assert!(frames.len() > 300);
        assert!(frames.windows(2).all(|pair| pair[0].value <= pair[1].value));
        let last = frames.last().expect("at least one frame");
        assert_eq!(last.value, 3_589);
        assert!(last.finished);
        assert_eq!(frames.iter().filter(|frame| frame.finished).count(), 1);
        assert_eq!(count_up.value(), 3_589);
        assert!(!count_up.is_animating());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn half_way_value_follows_quartic_ease() {
        let scheduler = ManualScheduler::default();
        let (count_up, _frames) = recording_count_up(&scheduler, AnimationTarget::new(1_000, 1_600));

        count_up.observe(VISIBLE);
        // First frame lands at 16ms and anchors the clock, so 800ms of
        // animation have elapsed at 816ms.
        scheduler.advance_to(816.0);

        assert_eq!(count_up.value(), 937);
    }

    #[test]
    fn triggers_at_most_once() {
        let scheduler = ManualScheduler::default();
        let (count_up, frames) = recording_count_up(&scheduler, AnimationTarget::new(358, 5_000));

        assert!(count_up.observe(VISIBLE));
        scheduler.advance_by(1_000.0);
        let mid_value = count_up.value();
        assert!(mid_value > 0);

        assert!(!count_up.observe(HIDDEN));
        assert!(!count_up.observe(VISIBLE));
        scheduler.advance_by(FRAME_INTERVAL_MS);
        assert!(count_up.value() >= mid_value);

        scheduler.advance_by(10_000.0);
        assert_eq!(count_up.value(), 358);
        let frame_count = frames.borrow().len();

        assert!(!count_up.observe(HIDDEN));
        assert!(!count_up.observe(VISIBLE));
        scheduler.advance_by(10_000.0);

        assert_eq!(count_up.value(), 358);
        assert_eq!(frames.borrow().len(), frame_count);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn zero_end_still_runs_the_loop_at_zero() {
        let scheduler = ManualScheduler::default();
        let (count_up, frames) = recording_count_up(&scheduler, AnimationTarget::new(0, 4_000));

        count_up.observe(VISIBLE);
        scheduler.advance_by(5_000.0);

        let frames = frames.borrow();
        assert!(frames.len() > 1);
        assert!(frames.iter().all(|frame| frame.value == 0));
        assert!(frames.last().is_some_and(|frame| frame.finished));
    }

    #[test]
    fn dropping_mid_animation_cancels_the_pending_frame() {
        let scheduler = ManualScheduler::default();
        let (count_up, frames) = recording_count_up(&scheduler, AnimationTarget::new(7, 4_000));

        count_up.observe(VISIBLE);
        scheduler.advance_by(500.0);
        let seen_before_teardown = frames.borrow().len();
        assert_eq!(scheduler.pending(), 1);

        drop(count_up);
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance_by(10_000.0);
        assert_eq!(frames.borrow().len(), seen_before_teardown);
    }

    #[test]
    fn state_flags_follow_lifecycle() {
        let mut state = CounterState::new(AnimationTarget::new(10, 100));
        assert!(!state.has_started());
        assert_eq!(state.advance(0.0), FrameStep::Finished);
        assert_eq!(state.value(), 0);

        assert!(state.trigger());
        assert!(state.has_started());
        assert_eq!(state.advance(1_000.0), FrameStep::Continue);
        assert_eq!(state.advance(1_100.0), FrameStep::Finished);
        assert!(state.has_completed_once());
        assert_eq!(state.value(), state.target().end());
    }

    struct MountedCounter {
        counter: ViewportCounter<ManualScheduler, ManualViewport>,
        frames: Rc<RefCell<Vec<CounterFrame>>>,
        triggers: Rc<RefCell<Vec<f64>>>,
    }

    fn mount_counter(
        scheduler: &ManualScheduler,
        viewport: &ManualViewport,
        element: Option<&'static str>,
        target: AnimationTarget,
        triggered: &Rc<RefCell<bool>>,
    ) -> MountedCounter {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let triggers = Rc::new(RefCell::new(Vec::new()));
        let frame_sink = Rc::clone(&frames);
        let trigger_sink = Rc::clone(&triggers);

        let counter = ViewportCounter::mount(
            scheduler.clone(),
            viewport,
            element.as_ref(),
            target,
            Rc::clone(triggered),
            move |frame| frame_sink.borrow_mut().push(frame),
            move |visibility| trigger_sink.borrow_mut().push(visibility.ratio),
        );

        MountedCounter {
            counter,
            frames,
            triggers,
        }
    }

    #[test]
    fn mounted_counter_watches_its_element_at_the_threshold() {
        let scheduler = ManualScheduler::default();
        let viewport = ManualViewport::default();
        let triggered = Rc::new(RefCell::new(false));
        let mounted = mount_counter(
            &scheduler,
            &viewport,
            Some("projects-stat"),
            AnimationTarget::new(28, 4_000),
            &triggered,
        );

        assert!(mounted.counter.is_watching());
        assert_eq!(viewport.threshold_for("projects-stat"), Some(VISIBILITY_THRESHOLD));

        viewport.report_visibility("other-stat", VISIBLE);
        viewport.report_visibility(
            "projects-stat",
            Visibility {
                is_intersecting: true,
                ratio: 0.2995,
            },
        );
        assert!(!mounted.counter.is_animating());
        assert!(!*triggered.borrow());

        viewport.report_visibility("projects-stat", VISIBLE);
        assert!(mounted.counter.is_animating());
        assert!(*triggered.borrow());
        assert_eq!(*mounted.triggers.borrow(), vec![1.0]);

        scheduler.advance_by(5_000.0);
        assert_eq!(mounted.counter.value(), 28);
    }

    #[test]
    fn unmounting_unsubscribes_once_and_silences_every_callback() {
        let scheduler = ManualScheduler::default();
        let viewport = ManualViewport::default();
        let triggered = Rc::new(RefCell::new(false));
        let mounted = mount_counter(
            &scheduler,
            &viewport,
            Some("stat"),
            AnimationTarget::new(358, 5_000),
            &triggered,
        );

        viewport.report_visibility("stat", VISIBLE);
        scheduler.advance_by(400.0);
        let frames_before = mounted.frames.borrow().len();
        assert!(frames_before > 0);

        let MountedCounter {
            counter,
            frames,
            triggers,
        } = mounted;
        drop(counter);

        assert_eq!(viewport.subscribed(), 1);
        assert_eq!(viewport.unsubscribed(), 1);
        assert_eq!(viewport.live(), 0);
        assert_eq!(scheduler.pending(), 0);

        viewport.report_visibility("stat", VISIBLE);
        scheduler.advance_by(10_000.0);
        assert_eq!(frames.borrow().len(), frames_before);
        assert_eq!(triggers.borrow().len(), 1);
    }

    #[test]
    fn remount_after_trigger_starts_without_waiting() {
        let scheduler = ManualScheduler::default();
        let viewport = ManualViewport::default();
        let triggered = Rc::new(RefCell::new(false));

        let first = mount_counter(
            &scheduler,
            &viewport,
            Some("stat"),
            AnimationTarget::new(7, 4_000),
            &triggered,
        );
        viewport.report_visibility("stat", VISIBLE);
        drop(first);

        let second = mount_counter(
            &scheduler,
            &viewport,
            Some("stat"),
            AnimationTarget::new(9, 4_000),
            &triggered,
        );
        assert!(!second.counter.is_watching());
        assert!(second.counter.is_animating());
        assert_eq!(viewport.subscribed(), 1);
        assert!(second.triggers.borrow().is_empty());

        scheduler.advance_by(5_000.0);
        assert_eq!(second.counter.value(), 9);
    }

    #[test]
    fn missing_element_never_subscribes_or_starts() {
        let scheduler = ManualScheduler::default();
        let viewport = ManualViewport::default();
        let triggered = Rc::new(RefCell::new(false));
        let mounted = mount_counter(
            &scheduler,
            &viewport,
            None,
            AnimationTarget::new(3_589, 6_000),
            &triggered,
        );

        assert!(!mounted.counter.is_watching());
        assert_eq!(viewport.subscribed(), 0);

        scheduler.advance_by(10_000.0);
        assert_eq!(mounted.counter.value(), 0);
        assert!(mounted.frames.borrow().is_empty());
        assert!(!*triggered.borrow());
    }
}
