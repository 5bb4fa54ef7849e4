use log::{error, info, Level};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, Event};

mod analytics;
mod config;
mod effects;
mod elements;
mod error;
mod filter;
mod form;
mod nav;
mod observe;
mod reveal;
mod tabs;
mod typewriter;

use config::SiteConfig;
use elements::PageElements;
use error::{PageError, PageResult};

fn run(name: &str, result: PageResult) {
    if let Err(e) = result {
        error!("Failed to initialize {}: {}", name, e);
    }
}

fn start() -> PageResult {
    let elements = PageElements::collect()?;
    let config = SiteConfig::load(&elements.document);

    run("navigation", nav::init_navigation(&elements, &config));
    run("skill tabs", tabs::init_skill_tabs(&elements));
    match filter::init_filtering(&elements, &config) {
        Ok(filters) => {
            info!("{} filter groups bound", filters.bound());
            run(
                "expertise links",
                filter::init_expertise_links(&elements, filters.projects.as_ref()),
            );
        }
        Err(e) => error!("Failed to initialize filtering: {}", e),
    }
    run("reveal on scroll", reveal::init_reveal(&elements, &config));
    run("nav highlighter", nav::init_nav_highlighter(&elements, &config));
    run("pointer effects", effects::init_pointer_effects(&elements, &config));
    run("contact form", form::init_contact_form(&elements));
    run("typewriter", typewriter::init_typewriter(&elements, &config));
    run("analytics", analytics::init_analytics(&elements, &config));
    Ok(())
}

/// The markup is only complete once the parser has left the "loading" state.
fn must_wait_for_dom(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn start_logged() {
    if let Err(e) = start() {
        error!("Page scripts not started: {}", e);
    }
}

fn start_when_ready() -> PageResult {
    let document = window()
        .ok_or(PageError::NoWindow)?
        .document()
        .ok_or(PageError::NoDocument)?;

    if !must_wait_for_dom(&document.ready_state()) {
        start_logged();
        return Ok(());
    }

    info!("Waiting for DOMContentLoaded");
    let on_ready = Closure::once(move |_event: Event| start_logged());
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::error_1(&format!("error initializing log: {}", e).into());
    }

    info!("Starting portfolio page scripts");
    if let Err(e) = start_when_ready() {
        error!("Page scripts not started: {}", e);
    }
}
