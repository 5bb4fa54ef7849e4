//! Category filtering for the skills, projects and licenses grids.
//!
//! Each group binds a single click listener on its container and works out
//! which control was hit from the event target, so controls rendered later
//! need no extra wiring.

use std::collections::BTreeSet;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, ScrollBehavior, ScrollIntoViewOptions};

use crate::config::SiteConfig;
use crate::elements::{query_all, PageElements};
use crate::error::PageResult;

pub const WILDCARD: &str = "all";
pub const ACTIVE_CLASS: &str = "active";
pub const HIDDEN_CLASS: &str = "hide";

/// Splits a `data-category` value into its tokens. Missing data is an empty set.
pub fn parse_categories(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn is_visible(token: &str, categories: &BTreeSet<String>) -> bool {
    token == WILDCARD || categories.contains(token)
}

/// DOM-free state of one filter group: the control tokens in document order,
/// the category set of every item, and which control is active.
#[derive(Debug, Clone, Default)]
pub struct FilterModel {
    tokens: Vec<String>,
    items: Vec<BTreeSet<String>>,
    active: Option<usize>,
}

impl FilterModel {
    pub fn new<T: Into<String>>(
        tokens: impl IntoIterator<Item = T>,
        items: Vec<BTreeSet<String>>,
    ) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            items,
            active: None,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.tokens.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Activates the first control carrying `token`. Unknown tokens leave the
    /// group untouched.
    pub fn select(&mut self, token: &str) -> bool {
        match self.tokens.iter().position(|t| t == token) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }

    pub fn active_token(&self) -> Option<&str> {
        self.active.map(|i| self.tokens[i].as_str())
    }

    pub fn active_flags(&self) -> Vec<bool> {
        (0..self.tokens.len()).map(|i| Some(i) == self.active).collect()
    }

    /// Before any selection every item shows as rendered.
    pub fn visible(&self) -> Vec<bool> {
        match self.active_token() {
            Some(token) => self.items.iter().map(|c| is_visible(token, c)).collect(),
            None => vec![true; self.items.len()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterGroupSpec {
    pub name: &'static str,
    pub container: &'static str,
    pub control: &'static str,
    pub token_attr: &'static str,
    pub items: &'static str,
}

pub const SKILLS: FilterGroupSpec = FilterGroupSpec {
    name: "skills",
    container: ".skills-sub-tabs",
    control: ".sub-tab-btn",
    token_attr: "data-category",
    items: ".skills-grid .skill-card",
};

pub const PROJECTS: FilterGroupSpec = FilterGroupSpec {
    name: "projects",
    container: ".project-filters",
    control: ".filter-btn",
    token_attr: "data-filter",
    items: ".all-projects-grid .project-card",
};

pub const LICENSES: FilterGroupSpec = FilterGroupSpec {
    name: "licenses",
    container: ".license-filters",
    control: ".filter-btn",
    token_attr: "data-filter",
    items: ".licenses-grid .license-card",
};

const ITEM_CATEGORY_ATTR: &str = "data-category";

#[derive(Clone)]
pub struct FilterGroup {
    spec: FilterGroupSpec,
    container: Element,
    items: Rc<Vec<Element>>,
}

impl FilterGroup {
    /// Attaches the delegated listener. Returns `None` when the page has no
    /// container for this group.
    pub fn bind(document: &Document, spec: FilterGroupSpec) -> PageResult<Option<Self>> {
        let Some(container) = document.query_selector(spec.container)? else {
            log::debug!("No {} filter container, skipping", spec.name);
            return Ok(None);
        };
        let group = Self {
            spec,
            container,
            items: Rc::new(query_all(document, spec.items)?),
        };

        let handler = group.clone();
        let on_click = Closure::wrap(Box::new(move |event: Event| {
            if let Err(e) = handler.handle_click(&event) {
                log::error!("{} filter click failed: {}", handler.spec.name, e);
            }
        }) as Box<dyn FnMut(Event)>);
        group
            .container
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        log::info!("Bound {} filter over {} items", spec.name, group.items.len());
        Ok(Some(group))
    }

    fn handle_click(&self, event: &Event) -> PageResult {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return Ok(());
        };
        if !target.matches(self.spec.control)? {
            return Ok(());
        }
        self.apply(&target)?;
        Ok(())
    }

    fn controls(&self) -> PageResult<Vec<Element>> {
        query_all(&self.container, self.spec.control)
    }

    /// Makes `control` the active one and re-derives every item's visibility.
    /// Returns the number of visible items.
    pub fn apply(&self, control: &Element) -> PageResult<usize> {
        let controls = self.controls()?;
        let token = control.get_attribute(self.spec.token_attr).unwrap_or_default();
        let categories = self
            .items
            .iter()
            .map(|item| parse_categories(item.get_attribute(ITEM_CATEGORY_ATTR).as_deref()))
            .collect();

        let mut model = FilterModel::new(
            controls
                .iter()
                .map(|c| c.get_attribute(self.spec.token_attr).unwrap_or_default()),
            categories,
        );
        let selected = match controls.iter().position(|c| c == control) {
            Some(index) => model.select_index(index),
            None => model.select(&token),
        };
        if !selected {
            log::debug!("{} control '{}' is not in its group", self.spec.name, token);
            return Ok(0);
        }

        for (control, active) in controls.iter().zip(model.active_flags()) {
            control.class_list().toggle_with_force(ACTIVE_CLASS, active)?;
        }
        let visible = model.visible();
        for (item, shown) in self.items.iter().zip(&visible) {
            item.class_list().toggle_with_force(HIDDEN_CLASS, !shown)?;
        }

        let count = visible.iter().filter(|v| **v).count();
        log::debug!("{} filter '{}': {} visible", self.spec.name, token, count);
        Ok(count)
    }

    /// Clicks the control carrying `token`, as a user would. Returns whether
    /// such a control exists.
    pub fn select_token(&self, token: &str) -> PageResult<bool> {
        let control = self.controls()?.into_iter().find(|c| {
            c.get_attribute(self.spec.token_attr).as_deref() == Some(token)
        });
        match control.and_then(|c| c.dyn_into::<HtmlElement>().ok()) {
            Some(button) => {
                button.click();
                Ok(true)
            }
            None => {
                log::debug!("{} filter has no '{}' control", self.spec.name, token);
                Ok(false)
            }
        }
    }
}

pub struct Filters {
    pub skills: Option<FilterGroup>,
    pub projects: Option<FilterGroup>,
    pub licenses: Option<FilterGroup>,
}

impl Filters {
    pub fn bound(&self) -> usize {
        [&self.skills, &self.projects, &self.licenses]
            .iter()
            .filter(|g| g.is_some())
            .count()
    }
}

/// Binds every filter group and seeds each with its configured default.
pub fn init_filtering(elements: &PageElements, config: &SiteConfig) -> PageResult<Filters> {
    let filters = Filters {
        skills: FilterGroup::bind(&elements.document, SKILLS)?,
        projects: FilterGroup::bind(&elements.document, PROJECTS)?,
        licenses: FilterGroup::bind(&elements.document, LICENSES)?,
    };

    let seeds = [
        (&filters.skills, config.skills_default.as_str()),
        (&filters.projects, config.projects_default.as_str()),
        (&filters.licenses, config.licenses_default.as_str()),
    ];
    for (group, token) in seeds {
        if let Some(group) = group {
            group.select_token(token)?;
        }
    }

    Ok(filters)
}

/// Expertise cards link into the projects grid: scroll there and filter by
/// the card's `data-filter-target`.
pub fn init_expertise_links(elements: &PageElements, projects: Option<&FilterGroup>) -> PageResult {
    let Some(projects) = projects else {
        log::debug!("No projects filter, skipping expertise links");
        return Ok(());
    };
    if elements.expertise_links.is_empty() {
        log::debug!("No expertise links on page");
        return Ok(());
    }

    for link in &elements.expertise_links {
        let link_clone = link.clone();
        let projects = projects.clone();
        let document = elements.document.clone();
        let on_click = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            if let Some(section) = document.get_element_by_id("all-projects") {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                section.scroll_into_view_with_scroll_into_view_options(&options);
            }
            if let Some(token) = link_clone.get_attribute("data-filter-target") {
                if let Err(e) = projects.select_token(&token) {
                    log::error!("Expertise link filter failed: {}", e);
                }
            }
        }) as Box<dyn FnMut(Event)>);
        link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    log::info!("Bound {} expertise links", elements.expertise_links.len());
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod dom_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const TEST_GROUP: FilterGroupSpec = FilterGroupSpec {
        name: "test",
        container: "#filter-test .filters",
        control: ".filter-btn",
        token_attr: "data-filter",
        items: "#filter-test .card",
    };

    fn mount() -> Document {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_id("filter-test");
        root.set_inner_html(
            r#"<div class="filters">
                 <button class="filter-btn" data-filter="all">All</button>
                 <button class="filter-btn" data-filter="featured">Featured</button>
                 <button class="filter-btn" data-filter="web"><i>icon</i>Web</button>
               </div>
               <div class="card" id="c1" data-category="web"></div>
               <div class="card" id="c2" data-category="featured web"></div>
               <div class="card" id="c3" data-category="mobile"></div>
               <div class="card" id="c4"></div>"#,
        );
        document.body().unwrap().append_child(&root).unwrap();
        document
    }

    fn visible(document: &Document) -> Vec<String> {
        query_all(document, "#filter-test .card")
            .unwrap()
            .into_iter()
            .filter(|c| !c.class_list().contains(HIDDEN_CLASS))
            .map(|c| c.id())
            .collect()
    }

    fn active(document: &Document) -> Vec<String> {
        query_all(document, "#filter-test .filter-btn.active")
            .unwrap()
            .into_iter()
            .filter_map(|c| c.get_attribute("data-filter"))
            .collect()
    }

    #[wasm_bindgen_test]
    fn delegated_filter_scenario() {
        let document = mount();
        let group = FilterGroup::bind(&document, TEST_GROUP).unwrap().unwrap();

        assert!(group.select_token("featured").unwrap());
        assert_eq!(visible(&document), vec!["c2"]);
        assert_eq!(active(&document), vec!["featured"]);

        group.select_token("all").unwrap();
        assert_eq!(visible(&document), vec!["c1", "c2", "c3", "c4"]);

        group.select_token("web").unwrap();
        assert_eq!(visible(&document), vec!["c1", "c2"]);
        assert_eq!(active(&document), vec!["web"]);

        // A click inside the container that is not on a control changes nothing.
        let icon = document
            .query_selector("#filter-test .filter-btn i")
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        group.select_token("featured").unwrap();
        icon.click();
        assert_eq!(visible(&document), vec!["c2"]);
        assert_eq!(active(&document), vec!["featured"]);

        assert!(!group.select_token("desktop").unwrap());
    }
}
