use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement, Window};

use crate::error::{PageError, PageResult};

/// Every element the initializers work with, looked up once at startup.
/// Optional fields are parts of the page the server may not render.
pub struct PageElements {
    pub window: Window,
    pub document: Document,
    pub body: Option<HtmlElement>,
    pub navbar: Option<Element>,
    pub nav_links: Vec<Element>,
    pub anchors: Vec<Element>,
    pub mobile_nav_toggle: Option<Element>,
    pub nav_menu: Option<Element>,
    pub sections: Vec<Element>,
    pub section_headers: Vec<Element>,
    pub stat_items: Vec<Element>,
    pub spotlight_cards: Vec<Element>,
    pub skill_tabs: Option<Element>,
    pub skill_panels: Vec<Element>,
    pub expertise_links: Vec<Element>,
    pub contact_form: Option<Element>,
    pub form_container: Option<HtmlElement>,
    pub success_message: Option<HtmlElement>,
    pub typewriter: Option<Element>,
    pub contact_section: Option<Element>,
    pub gradients: Option<HtmlElement>,
    pub email_track: Option<Element>,
    pub tracked: Vec<Element>,
}

impl PageElements {
    pub fn collect() -> PageResult<Self> {
        let window = window().ok_or(PageError::NoWindow)?;
        let document = window.document().ok_or(PageError::NoDocument)?;

        Ok(Self {
            body: document.body(),
            navbar: document.get_element_by_id("navbar"),
            nav_links: query_all(&document, ".nav-link")?,
            anchors: query_all(&document, r##"a[href^="#"]"##)?,
            mobile_nav_toggle: document.query_selector(".mobile-nav-toggle")?,
            nav_menu: document.query_selector(".nav-menu")?,
            sections: query_all(&document, "main > section")?,
            section_headers: query_all(&document, ".section-header")?,
            stat_items: query_all(&document, ".stat-item")?,
            spotlight_cards: query_all(
                &document,
                ".skill-card, .expertise-card, .project-card, .contact-card, .license-card",
            )?,
            skill_tabs: document.query_selector(".skills-tabs")?,
            skill_panels: query_all(&document, ".skills-panel")?,
            expertise_links: query_all(&document, ".expertise-link")?,
            contact_form: document.query_selector(".contact-form")?,
            form_container: html_by_id(&document, "form-container"),
            success_message: html_by_id(&document, "success-message"),
            typewriter: document.get_element_by_id("typewriter-title"),
            contact_section: document.get_element_by_id("contact"),
            gradients: document
                .query_selector(".gradients-container")?
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            email_track: document.get_element_by_id("track-email-click"),
            tracked: query_all(&document, "[data-track-action]")?,
            window,
            document,
        })
    }
}

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Anything `querySelectorAll` can be called on.
pub trait Queryable {
    fn select_all(&self, selector: &str) -> PageResult<web_sys::NodeList>;
}

impl Queryable for Document {
    fn select_all(&self, selector: &str) -> PageResult<web_sys::NodeList> {
        Ok(self.query_selector_all(selector)?)
    }
}

impl Queryable for Element {
    fn select_all(&self, selector: &str) -> PageResult<web_sys::NodeList> {
        Ok(self.query_selector_all(selector)?)
    }
}

pub fn query_all<Q: Queryable>(root: &Q, selector: &str) -> PageResult<Vec<Element>> {
    let list = root.select_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}
