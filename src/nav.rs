use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, ScrollBehavior, ScrollIntoViewOptions};

use crate::config::SiteConfig;
use crate::elements::PageElements;
use crate::error::{PageError, PageResult};
use crate::filter::ACTIVE_CLASS;
use crate::observe::intersection_observer;

const SCROLLED_CLASS: &str = "scrolled";
const MENU_OPEN_CLASS: &str = "is-active";
const BODY_MENU_CLASS: &str = "nav-open";

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Picks the section to highlight out of one batch of intersecting sections:
/// the one nearest the top of the page wins.
pub fn topmost<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    candidates
        .into_iter()
        .filter(|(id, _)| !id.is_empty())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

pub fn links_to(href: Option<&str>, section_id: &str) -> bool {
    href.and_then(|h| h.strip_prefix('#')) == Some(section_id)
}

pub fn init_navigation(elements: &PageElements, config: &SiteConfig) -> PageResult {
    init_smooth_scroll(elements)?;
    init_navbar_shadow(elements, config)?;
    init_mobile_menu(elements)?;
    Ok(())
}

fn smooth_scroll_to(target: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

fn init_smooth_scroll(elements: &PageElements) -> PageResult {
    for anchor in &elements.anchors {
        let document = elements.document.clone();
        let anchor_clone = anchor.clone();
        let on_click = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            let Some(href) = anchor_clone.get_attribute("href") else {
                return;
            };
            if href.len() <= 1 {
                return;
            }
            // An href that is not a valid selector just does nothing.
            if let Ok(Some(target)) = document.query_selector(&href) {
                smooth_scroll_to(&target);
            }
        }) as Box<dyn FnMut(Event)>);
        anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    log::info!("Smooth scrolling on {} anchors", elements.anchors.len());
    Ok(())
}

fn init_navbar_shadow(elements: &PageElements, config: &SiteConfig) -> PageResult {
    let Some(navbar) = elements.navbar.clone() else {
        log::debug!("No #navbar, skipping scroll shadow");
        return Ok(());
    };
    let window = elements.window.clone();
    let threshold = config.navbar_scroll_threshold;
    let scroll_callback = Closure::wrap(Box::new(move || {
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        if let Err(e) = navbar
            .class_list()
            .toggle_with_force(SCROLLED_CLASS, is_scrolled(scroll_y, threshold))
        {
            log::error!("Navbar scroll class update failed: {}", PageError::from(e));
        }
    }) as Box<dyn FnMut()>);
    elements
        .window
        .add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref())?;
    scroll_callback.forget();
    log::info!("Navbar shadow past {}px", threshold);
    Ok(())
}

#[derive(Clone)]
struct MobileMenu {
    body: Option<Element>,
    toggle: Element,
    menu: Element,
}

impl MobileMenu {
    fn is_open(&self) -> bool {
        self.menu.class_list().contains(MENU_OPEN_CLASS)
    }

    fn toggle(&self) -> PageResult {
        if let Some(body) = &self.body {
            body.class_list().toggle(BODY_MENU_CLASS)?;
        }
        let open = self.menu.class_list().toggle(MENU_OPEN_CLASS)?;
        self.toggle.class_list().toggle_with_force(MENU_OPEN_CLASS, open)?;
        if let Some(icon) = self.toggle.query_selector("i")? {
            icon.class_list().toggle_with_force("bi-list", !open)?;
            icon.class_list().toggle_with_force("bi-x", open)?;
        }
        Ok(())
    }
}

fn init_mobile_menu(elements: &PageElements) -> PageResult {
    let (Some(toggle), Some(menu)) = (elements.mobile_nav_toggle.clone(), elements.nav_menu.clone()) else {
        log::debug!("No mobile menu on page");
        return Ok(());
    };
    let mobile = MobileMenu {
        body: elements.body.clone().map(Into::into),
        toggle,
        menu,
    };

    let handler = mobile.clone();
    let on_toggle = Closure::wrap(Box::new(move |_event: Event| {
        if let Err(e) = handler.toggle() {
            log::error!("Mobile menu toggle failed: {}", e);
        }
    }) as Box<dyn FnMut(Event)>);
    mobile
        .toggle
        .add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;
    on_toggle.forget();

    for link in crate::elements::query_all(&mobile.menu, "a")? {
        let handler = mobile.clone();
        let on_link = Closure::wrap(Box::new(move |_event: Event| {
            if handler.is_open() {
                if let Err(e) = handler.toggle() {
                    log::error!("Mobile menu close failed: {}", e);
                }
            }
        }) as Box<dyn FnMut(Event)>);
        link.add_event_listener_with_callback("click", on_link.as_ref().unchecked_ref())?;
        on_link.forget();
    }
    log::info!("Mobile menu bound");
    Ok(())
}

/// Marks the nav link of the section crossing the middle band of the
/// viewport as active.
pub fn init_nav_highlighter(elements: &PageElements, config: &SiteConfig) -> PageResult {
    if elements.sections.is_empty() || elements.nav_links.is_empty() {
        log::debug!("No sections or nav links, skipping highlighter");
        return Ok(());
    }

    let links = elements.nav_links.clone();
    let observer = intersection_observer(None, Some(&config.nav_root_margin), move |entries, _| {
        let hits: Vec<(String, f64)> = entries
            .iter()
            .filter(|entry| entry.is_intersecting())
            .map(|entry| (entry.target().id(), entry.bounding_client_rect().top()))
            .collect();
        let Some(current) = topmost(hits.iter().map(|(id, top)| (id.as_str(), *top))) else {
            return;
        };
        for link in &links {
            let active = links_to(link.get_attribute("href").as_deref(), current);
            if let Err(e) = link.class_list().toggle_with_force(ACTIVE_CLASS, active) {
                log::error!("Nav link highlight failed: {}", PageError::from(e));
            }
        }
    })?;

    for section in &elements.sections {
        observer.observe(section);
    }
    log::info!("Highlighting nav for {} sections", elements.sections.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolled_only_past_threshold() {
        assert!(!is_scrolled(0.0, 50.0));
        assert!(!is_scrolled(50.0, 50.0));
        assert!(is_scrolled(50.5, 50.0));
    }

    #[test]
    fn topmost_section_wins() {
        let batch = [("projects", 120.0), ("about", -30.0), ("skills", 40.0)];
        assert_eq!(topmost(batch), Some("about"));
    }

    #[test]
    fn topmost_of_nothing_is_none() {
        assert_eq!(topmost(Vec::<(&str, f64)>::new()), None);
        assert_eq!(topmost([("", 0.0)]), None);
    }

    #[test]
    fn topmost_is_stable_on_ties() {
        assert_eq!(topmost([("a", 10.0), ("b", 10.0)]), Some("a"));
    }

    #[test]
    fn link_matching() {
        assert!(links_to(Some("#contact"), "contact"));
        assert!(!links_to(Some("#contact-me"), "contact"));
        assert!(!links_to(Some("/contact"), "contact"));
        assert!(!links_to(None, "contact"));
    }
}
