//! Site content, embedded at build time from `config/site.json`.

use serde::Deserialize;
use thiserror::Error;

use crate::{
    counter::{tiered_duration_ms, AnimationTarget, DURATION_MS_BOUNDS},
    logging::{parse_log_level, LogLevel, DEFAULT_LOG_LEVEL},
    sections::SectionId,
    typewriter::{DEFAULT_DELAY_MS, DELAY_MS_BOUNDS},
};

const SITE_JSON: &str = include_str!("../config/site.json");
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("site content is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("navigation has no entries")]
    EmptyNavigation,
    #[error("navigation links section `{0}` more than once")]
    DuplicateAnchor(&'static str),
    #[error("navigation has no entry for section `{0}`")]
    UnlinkedSection(&'static str),
}

/// Returns `value` when it lies within `bounds`, `default` otherwise.
pub fn within_bounds<T>(value: Option<T>, default: T, bounds: (T, T)) -> T
where
    T: PartialOrd + Copy,
{
    value
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

pub fn image_or_placeholder(path: &str) -> &str {
    if path.trim().is_empty() {
        PLACEHOLDER_IMAGE
    } else {
        path
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    #[serde(default)]
    pub log_level: Option<String>,
    pub owner: Owner,
    pub navigation: Vec<NavEntry>,
    pub hero: Hero,
    pub stats: Vec<StatTile>,
    pub about: About,
    pub skills: Skills,
    pub projects: Projects,
    pub gallery: Gallery,
    pub certifications: Certifications,
    pub contact: Contact,
    pub footer: Footer,
    pub resume: ResumeAsset,
}

impl SiteContent {
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(SITE_JSON)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(raw)?;
        content.validate()?;
        Ok(content)
    }

    /// Every tracked section must be reachable from exactly one navigation
    /// entry.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.navigation.is_empty() {
            return Err(ContentError::EmptyNavigation);
        }

        for (index, entry) in self.navigation.iter().enumerate() {
            if self.navigation[..index]
                .iter()
                .any(|earlier| earlier.anchor == entry.anchor)
            {
                return Err(ContentError::DuplicateAnchor(entry.anchor.as_str()));
            }
        }

        if let Some(missing) = SectionId::ALL
            .into_iter()
            .find(|id| !self.navigation.iter().any(|entry| entry.anchor == *id))
        {
            return Err(ContentError::UnlinkedSection(missing.as_str()));
        }

        Ok(())
    }

    pub fn log_level(&self) -> LogLevel {
        parse_log_level(self.log_level.as_deref(), DEFAULT_LOG_LEVEL)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub brand: String,
    pub location: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    pub name: String,
    pub anchor: SectionId,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub background_image: String,
    pub background_alt: String,
    pub greeting: TypedSegment,
    pub headline: Vec<Vec<TypedSegment>>,
    pub hire_label: String,
    pub resume_label: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedSegment {
    pub text: String,
    #[serde(default)]
    pub delay_ms: Option<u32>,
    #[serde(default)]
    pub accent: bool,
}

impl TypedSegment {
    pub fn delay_ms(&self) -> u32 {
        within_bounds(self.delay_ms, DEFAULT_DELAY_MS, DELAY_MS_BOUNDS)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTile {
    pub icon: String,
    pub number: u64,
    pub label: String,
    #[serde(default)]
    pub duration_ms: Option<u32>,
}

impl StatTile {
    pub fn animation_target(&self) -> AnimationTarget {
        let default = tiered_duration_ms(self.number);
        AnimationTarget::new(
            self.number,
            within_bounds(self.duration_ms, default, DURATION_MS_BOUNDS),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionIntro {
    #[serde(default)]
    pub eyebrow: Option<String>,
    pub heading: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub photo: String,
    pub photo_alt: String,
    pub intro: SectionIntro,
    pub facts: Vec<Fact>,
    pub interests: Vec<InterestTag>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InterestTag {
    pub icon: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Skills {
    pub intro: SectionIntro,
    pub items: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projects {
    pub intro: SectionIntro,
    pub button_label: String,
    pub items: Vec<Project>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Gallery {
    pub intro: SectionIntro,
    pub items: Vec<GalleryImage>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GalleryImage {
    pub image: String,
    pub alt: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Certifications {
    pub intro: SectionIntro,
    pub items: Vec<Certification>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Certification {
    pub title: String,
    pub provider: String,
    pub description: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub intro: SectionIntro,
    pub submit_label: String,
    pub channels: Vec<ContactChannel>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ContactChannel {
    pub icon: String,
    pub label: String,
    pub display: String,
    pub href: String,
}

impl ContactChannel {
    /// Mail links hand off to the mail client; everything else opens in a
    /// new tab.
    pub fn opens_new_tab(&self) -> bool {
        !self.href.starts_with("mailto:")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub heading: String,
    pub tagline: String,
    pub contact_label: String,
    pub links: Vec<FooterLink>,
    pub services: Vec<String>,
    pub questions_heading: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAsset {
    pub path: String,
    pub file_name: String,
}
