mod browser;
mod hooks;

use std::rc::Rc;

use serde_json::json;
use web_sys::window;
use yew::prelude::*;

use self::{
    browser::{download_file, locale_grouped, location_search, open_in_new_tab},
    hooks::{use_active_section, use_count_up, use_typewriter},
};
use crate::{
    content::{
        image_or_placeholder, About, Certifications, Contact, Footer, Gallery, Hero, NavEntry,
        Owner, Projects, SectionIntro, SiteContent, Skills, StatTile, TypedSegment,
    },
    counter::AnimationTarget,
    logging::{log_event, parse_log_level, query_log_level, set_min_level, LogLevel},
    sections::{ActiveSection, SectionId},
    typewriter::{revealed_prefix, TypewriterState, CARET, DEFAULT_DELAY_MS},
};

#[derive(Properties, PartialEq)]
struct CountingNumberProps {
    target: AnimationTarget,
}

#[function_component(CountingNumber)]
fn counting_number(props: &CountingNumberProps) -> Html {
    let (node, value) = use_count_up(props.target);

    html! {
        <div ref={node} class="stat-number">{locale_grouped(value)}</div>
    }
}

#[derive(Properties, PartialEq)]
struct TypewriterTextProps {
    text: AttrValue,
    #[prop_or(DEFAULT_DELAY_MS)]
    delay_ms: u32,
    #[prop_or_default]
    class: Classes,
}

#[function_component(TypewriterText)]
fn typewriter_text(props: &TypewriterTextProps) -> Html {
    let revealed = use_typewriter(props.text.clone(), props.delay_ms);
    let state = TypewriterState::at(&props.text, revealed);

    html! {
        <span class={props.class.clone()}>
            {revealed_prefix(&props.text, state.revealed_len()).to_string()}
            if state.shows_caret() {
                <span class="caret" aria-hidden="true">{CARET}</span>
            }
        </span>
    }
}

fn typed_segment(segment: &TypedSegment) -> Html {
    html! {
        <TypewriterText
            text={segment.text.clone()}
            delay_ms={segment.delay_ms()}
            class={classes!("typed-inline", segment.accent.then_some("accent"))}
        />
    }
}

fn section_heading(intro: &SectionIntro) -> Html {
    html! {
        <header class="section-heading">
            if let Some(eyebrow) = intro.eyebrow.clone() {
                <p class="eyebrow">{eyebrow}</p>
            }
            <h2>{intro.heading.clone()}</h2>
            if let Some(text) = intro.text.clone() {
                <p class="lede">{text}</p>
            }
        </header>
    }
}

fn navigation_bar(
    brand: &str,
    entries: &[NavEntry],
    active: ActiveSection,
    on_select: &Callback<SectionId>,
) -> Html {
    html! {
        <nav class="site-nav" aria-label="Sections">
            <div class="nav-inner">
                <div class="brand">{brand.to_string()}</div>
                <div class="nav-links">
                    { for entries.iter().map(|entry| {
                        let anchor = entry.anchor;
                        let is_active = active.is_active(anchor);
                        let onclick = {
                            let on_select = on_select.clone();
                            Callback::from(move |_: MouseEvent| on_select.emit(anchor))
                        };

                        html! {
                            <button
                                key={anchor.as_str()}
                                type="button"
                                class={classes!("nav-link", is_active.then_some("is-active"))}
                                aria-current={is_active.then_some("true")}
                                {onclick}
                            >
                                {entry.name.clone()}
                            </button>
                        }
                    }) }
                </div>
            </div>
        </nav>
    }
}

fn hero_section(
    hero: &Hero,
    on_hire: Callback<MouseEvent>,
    on_resume: Callback<MouseEvent>,
) -> Html {
    html! {
        <section id={SectionId::Home.as_str()} class="hero">
            <div class="hero-media">
                <img src={image_or_placeholder(&hero.background_image).to_string()} alt={hero.background_alt.clone()} />
            </div>
            <div class="hero-veil" aria-hidden="true"></div>
            <div class="hero-copy">
                <p class="eyebrow">
                    <TypewriterText text={hero.greeting.text.clone()} delay_ms={hero.greeting.delay_ms()} />
                </p>
                <h1 class="hero-title">
                    { for hero.headline.iter().enumerate().map(|(index, line)| html! {
                        <>
                            if index > 0 {
                                <br />
                            }
                            { for line.iter().map(typed_segment) }
                        </>
                    }) }
                </h1>
                <div class="hero-actions">
                    <button class="button button-solid" type="button" onclick={on_hire}>
                        {hero.hire_label.clone()}
                    </button>
                    <button class="button button-outline" type="button" onclick={on_resume}>
                        {hero.resume_label.clone()}
                    </button>
                </div>
            </div>
        </section>
    }
}

fn stats_band(stats: &[StatTile]) -> Html {
    html! {
        <section class="stats" aria-label="Highlights">
            { for stats.iter().map(|stat| html! {
                <div class="stat">
                    <div class="stat-icon" aria-hidden="true">{stat.icon.clone()}</div>
                    <CountingNumber target={stat.animation_target()} />
                    <div class="stat-label">{stat.label.clone()}</div>
                </div>
            }) }
        </section>
    }
}

fn about_section(about: &About) -> Html {
    html! {
        <section id={SectionId::About.as_str()} class="section about">
            <div class="about-photo">
                <img src={image_or_placeholder(&about.photo).to_string()} alt={about.photo_alt.clone()} />
            </div>
            <div class="about-copy">
                {section_heading(&about.intro)}
                <dl class="facts">
                    { for about.facts.iter().map(|fact| html! {
                        <div class="fact">
                            <dt>{fact.label.clone()}</dt>
                            <dd>{fact.value.clone()}</dd>
                        </div>
                    }) }
                </dl>
                <ul class="interests">
                    { for about.interests.iter().map(|interest| html! {
                        <li class="badge">
                            <span aria-hidden="true">{interest.icon.clone()}</span>
                            {interest.label.clone()}
                        </li>
                    }) }
                </ul>
            </div>
        </section>
    }
}

fn skills_section(skills: &Skills) -> Html {
    html! {
        <section id={SectionId::Skills.as_str()} class="section skills">
            {section_heading(&skills.intro)}
            <ul class="card-grid">
                { for skills.items.iter().map(|skill| html! {
                    <li class="card skill-card"><h3>{skill.clone()}</h3></li>
                }) }
            </ul>
        </section>
    }
}

fn projects_section(projects: &Projects) -> Html {
    html! {
        <section id={SectionId::Projects.as_str()} class="section projects">
            {section_heading(&projects.intro)}
            <ul class="card-grid">
                { for projects.items.iter().map(|project| {
                    let onclick = {
                        let link = project.link.clone();
                        Callback::from(move |_: MouseEvent| {
                            if open_in_new_tab(&link) {
                                log_event(LogLevel::Info, "external_link_opened", json!({ "url": link.as_str() }));
                            }
                        })
                    };

                    html! {
                        <li class="card project-card">
                            <div class="project-icon" aria-hidden="true">{project.icon.clone()}</div>
                            <h3>{project.title.clone()}</h3>
                            <p>{project.description.clone()}</p>
                            <button class="button button-outline" type="button" {onclick}>
                                {projects.button_label.clone()}
                            </button>
                        </li>
                    }
                }) }
            </ul>
        </section>
    }
}

fn gallery_section(gallery: &Gallery) -> Html {
    html! {
        <section id={SectionId::AlsoMe.as_str()} class="section gallery">
            {section_heading(&gallery.intro)}
            <ul class="gallery-grid">
                { for gallery.items.iter().map(|item| html! {
                    <li class="gallery-tile">
                        <img src={image_or_placeholder(&item.image).to_string()} alt={item.alt.clone()} loading="lazy" />
                        <div class="gallery-caption">
                            <h3>{item.title.clone()}</h3>
                            <span>{item.subtitle.clone()}</span>
                        </div>
                    </li>
                }) }
            </ul>
        </section>
    }
}

fn certifications_section(certifications: &Certifications) -> Html {
    html! {
        <section id={SectionId::Certifications.as_str()} class="section certifications">
            {section_heading(&certifications.intro)}
            <ul class="card-grid">
                { for certifications.items.iter().map(|cert| html! {
                    <li class="card cert-card">
                        <img src={image_or_placeholder(&cert.image).to_string()} alt={cert.title.clone()} loading="lazy" />
                        <div class="cert-copy">
                            <h3>{cert.title.clone()}</h3>
                            <p class="cert-provider">{cert.provider.clone()}</p>
                            <p>{cert.description.clone()}</p>
                        </div>
                    </li>
                }) }
            </ul>
        </section>
    }
}

fn contact_section(contact: &Contact) -> Html {
    let onsubmit = Callback::from(|event: SubmitEvent| {
        event.prevent_default();
        log_event(LogLevel::Debug, "contact_form_ignored", json!({}));
    });

    html! {
        <section id={SectionId::Contact.as_str()} class="section contact">
            {section_heading(&contact.intro)}
            <div class="contact-grid">
                <form class="contact-form" {onsubmit}>
                    <div class="form-row">
                        <input type="text" placeholder="Your Name" aria-label="Your Name" />
                        <input type="email" placeholder="Your Email" aria-label="Your Email" />
                    </div>
                    <input type="text" placeholder="Subject" aria-label="Subject" />
                    <textarea rows="6" placeholder="Message" aria-label="Message" />
                    <button class="button button-solid" type="submit">{contact.submit_label.clone()}</button>
                </form>
                <ul class="contact-channels">
                    { for contact.channels.iter().map(|channel| {
                        let (target, rel) = if channel.opens_new_tab() {
                            (Some("_blank"), Some("noopener noreferrer"))
                        } else {
                            (None, None)
                        };

                        html! {
                            <li class="channel">
                                <span class="channel-icon" aria-hidden="true">{channel.icon.clone()}</span>
                                <div>
                                    <div class="channel-label">{channel.label.clone()}</div>
                                    <a href={channel.href.clone()} {target} {rel}>{channel.display.clone()}</a>
                                </div>
                            </li>
                        }
                    }) }
                </ul>
            </div>
        </section>
    }
}

fn site_footer(footer: &Footer, owner: &Owner, on_contact: Callback<MouseEvent>) -> Html {
    html! {
        <footer class="site-footer">
            <div class="footer-column">
                <h3>{footer.heading.clone()}</h3>
                <p>{footer.tagline.clone()}</p>
                <button class="button button-solid" type="button" onclick={on_contact}>
                    {footer.contact_label.clone()}
                </button>
            </div>
            <div class="footer-column">
                <h3>{"Links"}</h3>
                <ul>
                    { for footer.links.iter().map(|link| html! {
                        <li>
                            <a href={link.href.clone()} target="_blank" rel="noopener noreferrer">{link.label.clone()}</a>
                        </li>
                    }) }
                </ul>
            </div>
            <div class="footer-column">
                <h3>{"Services"}</h3>
                <ul>
                    { for footer.services.iter().map(|service| html! { <li>{service.clone()}</li> }) }
                </ul>
            </div>
            <div class="footer-column">
                <h3>{footer.questions_heading.clone()}</h3>
                <p><span class="footer-icon" aria-hidden="true">{"📍"}</span>{owner.location.clone()}</p>
                <p><span class="footer-icon" aria-hidden="true">{"➤"}</span>{owner.email.clone()}</p>
            </div>
        </footer>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    content: Rc<SiteContent>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let content = &props.content;
    let (active, select_section) = use_active_section();

    let go_to_contact = {
        let select_section = select_section.clone();
        Callback::from(move |_: MouseEvent| select_section.emit(SectionId::Contact))
    };

    let download_resume = {
        let path = content.resume.path.clone();
        let file_name = content.resume.file_name.clone();
        Callback::from(move |_: MouseEvent| {
            if download_file(&path, &file_name) {
                log_event(LogLevel::Info, "resume_download", json!({ "file": file_name.as_str() }));
            }
        })
    };

    html! {
        <div class="page">
            {navigation_bar(&content.owner.brand, &content.navigation, active, &select_section)}
            <main>
                {hero_section(&content.hero, go_to_contact.clone(), download_resume)}
                {stats_band(&content.stats)}
                {about_section(&content.about)}
                {skills_section(&content.skills)}
                {projects_section(&content.projects)}
                {gallery_section(&content.gallery)}
                {certifications_section(&content.certifications)}
                {contact_section(&content.contact)}
            </main>
            {site_footer(&content.footer, &content.owner, go_to_contact)}
        </div>
    }
}

pub fn run() {
    let content = match SiteContent::embedded() {
        Ok(content) => content,
        Err(error) => {
            log_event(
                LogLevel::Warn,
                "content_invalid",
                json!({ "error": error.to_string() }),
            );
            return;
        }
    };

    let search = location_search().unwrap_or_default();
    let level = parse_log_level(query_log_level(&search), content.log_level());
    set_min_level(level);
    log_event(
        LogLevel::Info,
        "app_started",
        json!({
            "sections": content.navigation.len(),
            "logLevel": level.as_str(),
        }),
    );

    yew::Renderer::<App>::with_root_and_props(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
        AppProps {
            content: Rc::new(content),
        },
    )
    .render();
}
