use serde::Deserialize;

use crate::viewport::Viewport;

/// Distance below the top of the viewport at which the current section is
/// read.
pub const EVALUATION_OFFSET_PX: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    #[default]
    Home,
    About,
    Skills,
    Projects,
    AlsoMe,
    Certifications,
    Contact,
}

impl SectionId {
    /// Scan order used when locating the section under the evaluation point.
    pub const ALL: [SectionId; 7] = [
        Self::Home,
        Self::About,
        Self::Skills,
        Self::Projects,
        Self::AlsoMe,
        Self::Certifications,
        Self::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::AlsoMe => "also-me",
            Self::Certifications => "certifications",
            Self::Contact => "contact",
        }
    }
}

/// Vertical range `[top, top + height)` a section occupies in page
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionExtent {
    pub top: f64,
    pub height: f64,
}

impl SectionExtent {
    pub fn contains(self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

pub fn evaluation_point(scroll_y: f64) -> f64 {
    scroll_y + EVALUATION_OFFSET_PX
}

/// First section, in [`SectionId::ALL`] order, whose extent contains the
/// evaluation point. `measure` is called lazily and may return `None` for a
/// section that is not on the page.
pub fn locate_section<F>(scroll_y: f64, mut measure: F) -> Option<SectionId>
where
    F: FnMut(SectionId) -> Option<SectionExtent>,
{
    let point = evaluation_point(scroll_y);
    SectionId::ALL
        .into_iter()
        .find(|id| measure(*id).is_some_and(|extent| extent.contains(point)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionAction {
    /// A scroll event located this section, or none.
    Scrolled(Option<SectionId>),
    /// A navigation entry was chosen.
    Selected(SectionId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveSection {
    current: SectionId,
}

impl ActiveSection {
    pub fn current(self) -> SectionId {
        self.current
    }

    pub fn is_active(self, id: SectionId) -> bool {
        self.current == id
    }

    /// Returns true when the active section changed. A scroll that located
    /// nothing leaves the current section in place.
    pub fn apply(&mut self, action: SectionAction) -> bool {
        let next = match action {
            SectionAction::Scrolled(Some(id)) | SectionAction::Selected(id) => id,
            SectionAction::Scrolled(None) => return false,
        };

        let changed = next != self.current;
        self.current = next;
        changed
    }
}

/// Subscribes to scrolling and hands `on_action` the section located after
/// every scroll event. Dropping the returned subscription stops the reports.
pub fn track_scroll<V, F>(viewport: &V, mut on_action: F) -> Option<V::Subscription>
where
    V: Viewport,
    F: FnMut(SectionAction) + 'static,
{
    let measurer = viewport.clone();
    viewport.watch_scroll(move |scroll_y| {
        let located = locate_section(scroll_y, |id| measurer.measure(id));
        on_action(SectionAction::Scrolled(located));
    })
}
