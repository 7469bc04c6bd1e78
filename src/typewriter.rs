use std::{cell::RefCell, rc::Rc};

use crate::schedule::Scheduler;

pub const DEFAULT_DELAY_MS: u32 = 100;
pub const DELAY_MS_BOUNDS: (u32, u32) = (10, 2_000);
pub const CARET: &str = "|";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterTarget {
    text: String,
    delay_ms: u32,
}

impl TypewriterTarget {
    pub fn new(text: impl Into<String>, delay_ms: u32) -> Self {
        Self {
            text: text.into(),
            delay_ms: delay_ms.max(1),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

/// How many characters of a text have been revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterState {
    revealed: usize,
    total: usize,
}

impl TypewriterState {
    pub fn new(text: &str) -> Self {
        Self::at(text, 0)
    }

    /// State with `revealed` characters shown, clamped to the text length.
    pub fn at(text: &str, revealed: usize) -> Self {
        let total = text.chars().count();
        Self {
            revealed: revealed.min(total),
            total,
        }
    }

    pub fn reveal_next(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.revealed += 1;
        true
    }

    pub fn revealed_len(&self) -> usize {
        self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }

    pub fn shows_caret(&self) -> bool {
        self.revealed < self.total
    }
}

/// Revealed count tagged with the target it was counted for. Reading it for
/// any other target gives 0, so a replaced text never starts part-way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealProgress {
    target: TypewriterTarget,
    revealed: usize,
}

impl RevealProgress {
    pub fn new(target: TypewriterTarget, revealed: usize) -> Self {
        Self { target, revealed }
    }

    pub fn revealed_for(&self, target: &TypewriterTarget) -> usize {
        if &self.target == target {
            self.revealed
        } else {
            0
        }
    }
}

/// The first `chars` characters of `text`.
pub fn revealed_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

struct TypewriterShared<S: Scheduler> {
    state: TypewriterState,
    delay_ms: u32,
    pending: Option<S::Task>,
    on_reveal: Rc<dyn Fn(usize)>,
}

/// Reveals one character per delay, keeping exactly one delayed task alive
/// until the text is complete. Dropping it cancels that task.
pub struct Typewriter<S: Scheduler> {
    shared: Rc<RefCell<TypewriterShared<S>>>,
}

impl<S: Scheduler> Typewriter<S> {
    pub fn start(
        scheduler: S,
        target: &TypewriterTarget,
        on_reveal: impl Fn(usize) + 'static,
    ) -> Self {
        let shared = Rc::new(RefCell::new(TypewriterShared {
            state: TypewriterState::new(target.text()),
            delay_ms: target.delay_ms(),
            pending: None,
            on_reveal: Rc::new(on_reveal),
        }));
        schedule_reveal(&scheduler, &shared);
        Self { shared }
    }

    pub fn state(&self) -> TypewriterState {
        self.shared.borrow().state
    }

    pub fn is_pending(&self) -> bool {
        self.shared.borrow().pending.is_some()
    }
}

impl<S: Scheduler> Drop for Typewriter<S> {
    fn drop(&mut self) {
        self.shared.borrow_mut().pending.take();
    }
}

fn schedule_reveal<S: Scheduler>(scheduler: &S, shared: &Rc<RefCell<TypewriterShared<S>>>) {
    let delay_ms = {
        let inner = shared.borrow();
        if inner.state.is_complete() {
            return;
        }
        inner.delay_ms
    };

    let weak = Rc::downgrade(shared);
    let next_scheduler = scheduler.clone();

    let task = scheduler.after(delay_ms, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };

        let (revealed, on_reveal) = {
            let mut inner = shared.borrow_mut();
            inner.pending = None;
            inner.state.reveal_next();
            (inner.state.revealed_len(), Rc::clone(&inner.on_reveal))
        };

        on_reveal(revealed);
        schedule_reveal(&next_scheduler, &shared);
    });

    shared.borrow_mut().pending = Some(task);
}
