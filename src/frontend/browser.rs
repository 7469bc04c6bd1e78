use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Number};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, HtmlAnchorElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions,
};

use crate::{
    counter::Visibility,
    format::group_thousands,
    schedule::Scheduler,
    sections::{SectionExtent, SectionId},
    viewport::Viewport,
};

/// Timeouts and animation frames from the browser event loop.
#[derive(Clone, Copy, Default)]
pub struct BrowserScheduler;

/// Either handle cancels its callback when dropped.
pub struct BrowserTask {
    _timeout: Option<Timeout>,
    _frame: Option<AnimationFrame>,
}

impl Scheduler for BrowserScheduler {
    type Task = BrowserTask;

    fn after<F>(&self, delay_ms: u32, task: F) -> BrowserTask
    where
        F: FnOnce() + 'static,
    {
        BrowserTask {
            _timeout: Some(Timeout::new(delay_ms, task)),
            _frame: None,
        }
    }

    fn next_frame<F>(&self, task: F) -> BrowserTask
    where
        F: FnOnce(f64) + 'static,
    {
        BrowserTask {
            _timeout: None,
            _frame: Some(request_animation_frame(task)),
        }
    }
}

/// Window scrolling, element visibility and section layout of the live page.
#[derive(Clone, Copy, Default)]
pub struct BrowserViewport;

/// Holds one listener or observer; dropping it removes or disconnects it.
pub struct BrowserSubscription {
    _scroll: Option<ScrollWatch>,
    _visibility: Option<VisibilityWatch>,
}

impl Viewport for BrowserViewport {
    type Element = Element;
    type Subscription = BrowserSubscription;

    fn watch_scroll<F>(&self, on_scroll: F) -> Option<BrowserSubscription>
    where
        F: FnMut(f64) + 'static,
    {
        ScrollWatch::on_window(on_scroll).map(|watch| BrowserSubscription {
            _scroll: Some(watch),
            _visibility: None,
        })
    }

    fn watch_visibility<F>(
        &self,
        element: &Element,
        threshold: f64,
        on_change: F,
    ) -> Option<BrowserSubscription>
    where
        F: FnMut(Visibility) + 'static,
    {
        VisibilityWatch::observe(element, threshold, on_change).map(|watch| BrowserSubscription {
            _scroll: None,
            _visibility: Some(watch),
        })
    }

    fn measure(&self, id: SectionId) -> Option<SectionExtent> {
        measure_section(id)
    }
}

/// Intersection observer on a single element; disconnected on drop.
struct VisibilityWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl VisibilityWatch {
    fn observe(
        element: &Element,
        threshold: f64,
        mut on_change: impl FnMut(Visibility) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    on_change(Visibility {
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    });
                }
            }
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .ok()?;
        observer.observe(element);

        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Window scroll listener; removed on drop.
struct ScrollWatch {
    _listener: EventListener,
}

impl ScrollWatch {
    fn on_window(mut on_scroll: impl FnMut(f64) + 'static) -> Option<Self> {
        let win = window()?;
        let reader = win.clone();
        let listener = EventListener::new(&win, "scroll", move |_| {
            if let Ok(scroll_y) = reader.scroll_y() {
                on_scroll(scroll_y);
            }
        });

        Some(Self {
            _listener: listener,
        })
    }
}

fn section_element(id: SectionId) -> Option<Element> {
    window()?.document()?.get_element_by_id(id.as_str())
}

fn measure_section(id: SectionId) -> Option<SectionExtent> {
    let element = section_element(id)?.dyn_into::<HtmlElement>().ok()?;

    Some(SectionExtent {
        top: f64::from(element.offset_top()),
        height: f64::from(element.offset_height()),
    })
}

pub fn scroll_section_into_view(id: SectionId) {
    let Some(element) = section_element(id) else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Saves `href` under `file_name` through a temporary anchor.
pub fn download_file(href: &str, file_name: &str) -> bool {
    let Some(document) = window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(body) = document.body() else {
        return false;
    };
    let Some(link) = document
        .create_element("a")
        .ok()
        .and_then(|element| element.dyn_into::<HtmlAnchorElement>().ok())
    else {
        return false;
    };

    link.set_href(href);
    link.set_download(file_name);

    if body.append_child(&link).is_err() {
        return false;
    }
    link.click();
    let _ = body.remove_child(&link);

    true
}

pub fn open_in_new_tab(url: &str) -> bool {
    window()
        .and_then(|w| w.open_with_url_and_target(url, "_blank").ok().flatten())
        .is_some()
}

pub fn location_search() -> Option<String> {
    window()?.location().search().ok()
}

/// Thousands-grouped in the visitor's language, or with commas when the
/// browser does not report one.
pub fn locale_grouped(value: u64) -> String {
    window()
        .and_then(|w| w.navigator().language())
        .map(|locale| String::from(Number::from(value as f64).to_locale_string(&locale)))
        .unwrap_or_else(|| group_thousands(value, ','))
}
