use std::rc::Rc;

use serde_json::json;
use web_sys::Element;
use yew::prelude::*;

use super::browser::{scroll_section_into_view, BrowserScheduler, BrowserViewport};
use crate::{
    counter::{AnimationTarget, ViewportCounter},
    logging::{log_event, LogLevel},
    sections::{track_scroll, ActiveSection, SectionAction, SectionId},
    typewriter::{RevealProgress, Typewriter, TypewriterTarget},
};

/// Counter value for the element behind the returned ref. Stays at zero
/// until that element is first at least 30% visible.
#[hook]
pub fn use_count_up(target: AnimationTarget) -> (NodeRef, u64) {
    let node = use_node_ref();
    let shown = use_state_eq(|| 0u64);
    let triggered = use_mut_ref(|| false);

    {
        let node = node.clone();
        let shown = shown.clone();
        use_effect_with(target, move |target| {
            let target = *target;
            let element = node.cast::<Element>();
            if element.is_none() && !*triggered.borrow() {
                log_event(
                    LogLevel::Warn,
                    "counter_target_missing",
                    json!({ "end": target.end() }),
                );
            }

            let counter = ViewportCounter::mount(
                BrowserScheduler,
                &BrowserViewport,
                element.as_ref(),
                target,
                triggered,
                move |frame| {
                    shown.set(frame.value);
                    if frame.finished {
                        log_event(
                            LogLevel::Debug,
                            "counter_completed",
                            json!({ "end": target.end() }),
                        );
                    }
                },
                move |visibility| {
                    log_event(
                        LogLevel::Debug,
                        "counter_triggered",
                        json!({
                            "end": target.end(),
                            "durationMs": target.duration_ms(),
                            "ratio": visibility.ratio,
                        }),
                    );
                },
            );

            move || drop(counter)
        });
    }

    (node, *shown)
}

/// Number of characters of `text` revealed so far. Reads 0 on the render
/// where `text` or `delay_ms` changes, before the new reveal has started.
#[hook]
pub fn use_typewriter(text: AttrValue, delay_ms: u32) -> usize {
    let target = TypewriterTarget::new(text.as_str(), delay_ms);
    let progress = {
        let target = target.clone();
        use_state_eq(move || RevealProgress::new(target, 0))
    };

    {
        let progress = progress.clone();
        use_effect_with(target.clone(), move |target| {
            let owner = target.clone();
            let typewriter = Typewriter::start(BrowserScheduler, target, move |count| {
                progress.set(RevealProgress::new(owner.clone(), count))
            });

            move || drop(typewriter)
        });
    }

    progress.revealed_for(&target)
}

impl Reducible for ActiveSection {
    type Action = SectionAction;

    fn reduce(self: Rc<Self>, action: SectionAction) -> Rc<Self> {
        let mut next = *self;
        if !next.apply(action) {
            return self;
        }

        if let SectionAction::Scrolled(_) = action {
            log_event(
                LogLevel::Debug,
                "section_changed",
                json!({ "from": self.current().as_str(), "to": next.current().as_str() }),
            );
        }
        Rc::new(next)
    }
}

/// Active section derived from window scrolling, plus a callback that
/// selects a section and smooth-scrolls to it.
#[hook]
pub fn use_active_section() -> (ActiveSection, Callback<SectionId>) {
    let active = use_reducer_eq(ActiveSection::default);

    {
        let active = active.clone();
        use_effect_with((), move |_| {
            let subscription = track_scroll(&BrowserViewport, move |action| active.dispatch(action));

            move || drop(subscription)
        });
    }

    let select = {
        let active = active.clone();
        Callback::from(move |id: SectionId| {
            log_event(
                LogLevel::Info,
                "section_selected",
                json!({ "section": id.as_str() }),
            );
            active.dispatch(SectionAction::Selected(id));
            scroll_section_into_view(id);
        })
    };

    (*active, select)
}
