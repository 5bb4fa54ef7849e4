use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use crate::elements::{query_all, PageElements};
use crate::error::PageResult;
use crate::filter::ACTIVE_CLASS;

const TAB_SELECTOR: &str = ".tab-btn";

/// Switches between the "Tech Stack" and "Expertise" skill panels. A tab's
/// `data-target` is the selector of the panel it shows.
pub fn init_skill_tabs(elements: &PageElements) -> PageResult {
    let Some(container) = elements.skill_tabs.clone() else {
        log::debug!("No skill tabs on page");
        return Ok(());
    };

    let document = elements.document.clone();
    let panels = elements.skill_panels.clone();
    let tabs_root = container.clone();
    let on_click = Closure::wrap(Box::new(move |event: Event| {
        let Some(tab) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if !tab.matches(TAB_SELECTOR).unwrap_or(false) {
            return;
        }
        if let Err(e) = activate_tab(&document, &tabs_root, &panels, &tab) {
            log::error!("Skill tab switch failed: {}", e);
        }
    }) as Box<dyn FnMut(Event)>);
    container.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    log::info!("Bound skill tabs over {} panels", elements.skill_panels.len());
    Ok(())
}

fn activate_tab(document: &Document, root: &Element, panels: &[Element], tab: &Element) -> PageResult {
    for other in query_all(root, TAB_SELECTOR)? {
        other.class_list().remove_1(ACTIVE_CLASS)?;
    }
    tab.class_list().add_1(ACTIVE_CLASS)?;

    for panel in panels {
        panel.class_list().remove_1(ACTIVE_CLASS)?;
    }
    let target = tab.get_attribute("data-target").unwrap_or_default();
    if target.is_empty() {
        return Ok(());
    }
    match document.query_selector(&target) {
        Ok(Some(panel)) => panel.class_list().add_1(ACTIVE_CLASS)?,
        Ok(None) => log::debug!("Skill tab target {} not found", target),
        Err(_) => log::warn!("Skill tab has invalid target selector {}", target),
    }
    Ok(())
}
