use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::elements::{query_all, PageElements};
use crate::error::PageResult;

const INVALID_CLASS: &str = "invalid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub valid: bool,
    pub message: String,
}

impl FieldReport {
    pub fn ok() -> Self {
        Self { valid: true, message: String::new() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { valid: false, message: message.into() }
    }
}

pub fn blocks_submission(reports: &[FieldReport]) -> bool {
    reports.iter().any(|r| !r.valid)
}

/// A required control of the contact form, checked with the browser's own
/// constraint validation.
#[derive(Clone)]
enum Field {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl Field {
    fn from_element(element: Element) -> Option<Self> {
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(Field::Input(input)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(area) => return Some(Field::TextArea(area)),
            Err(element) => element,
        };
        element.dyn_into::<HtmlSelectElement>().ok().map(Field::Select)
    }

    fn element(&self) -> &Element {
        match self {
            Field::Input(el) => el.as_ref(),
            Field::TextArea(el) => el.as_ref(),
            Field::Select(el) => el.as_ref(),
        }
    }

    fn report(&self) -> PageResult<FieldReport> {
        let (valid, message) = match self {
            Field::Input(el) => (el.check_validity(), el.validation_message()?),
            Field::TextArea(el) => (el.check_validity(), el.validation_message()?),
            Field::Select(el) => (el.check_validity(), el.validation_message()?),
        };
        Ok(if valid { FieldReport::ok() } else { FieldReport::invalid(message) })
    }

    /// Checks the field and mirrors the result into its `.form-group`.
    fn validate(&self) -> PageResult<FieldReport> {
        let report = self.report()?;
        if let Some(group) = self.element().closest(".form-group")? {
            group.class_list().toggle_with_force(INVALID_CLASS, !report.valid)?;
            if let Some(slot) = group.query_selector(".error-message")? {
                slot.set_text_content(Some(&report.message));
            }
        }
        Ok(report)
    }
}

fn validate_all(fields: &[Field]) -> PageResult<Vec<FieldReport>> {
    fields.iter().map(Field::validate).collect()
}

/// Wires live and on-submit validation into `form`. Returns the number of
/// required fields found.
pub fn bind_contact_form(form: &Element) -> PageResult<usize> {
    let fields: Vec<Field> = query_all(form, "[required]")?
        .into_iter()
        .filter_map(Field::from_element)
        .collect();

    let submit_fields = fields.clone();
    let on_submit = Closure::wrap(Box::new(move |event: Event| {
        match validate_all(&submit_fields) {
            Ok(reports) if blocks_submission(&reports) => {
                log::debug!(
                    "Blocking contact submit, {} invalid fields",
                    reports.iter().filter(|r| !r.valid).count()
                );
                event.prevent_default();
            }
            Ok(_) => {}
            Err(e) => log::error!("Contact form validation failed: {}", e),
        }
    }) as Box<dyn FnMut(Event)>);
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    for field in &fields {
        let handler = field.clone();
        let on_input = Closure::wrap(Box::new(move |_event: Event| {
            if let Err(e) = handler.validate() {
                log::error!("Field validation failed: {}", e);
            }
        }) as Box<dyn FnMut(Event)>);
        field
            .element()
            .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }

    Ok(fields.len())
}

pub fn init_contact_form(elements: &PageElements) -> PageResult {
    let Some(form) = &elements.contact_form else {
        log::debug!("No contact form on page");
        return Ok(());
    };

    // The server renders #success-message only after a successful post.
    if let (Some(container), Some(success)) = (&elements.form_container, &elements.success_message) {
        container.style().set_property("display", "none")?;
        success.style().set_property("display", "flex")?;
        log::info!("Showing contact success message");
    }

    let count = bind_contact_form(form)?;
    log::info!("Validating {} required contact fields", count);
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod dom_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::{EventInit, HtmlFormElement};

    wasm_bindgen_test_configure!(run_in_browser);

    fn submit(form: &HtmlFormElement) -> bool {
        let init = EventInit::new();
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict("submit", &init).unwrap();
        form.dispatch_event(&event).unwrap()
    }

    #[wasm_bindgen_test]
    fn empty_required_field_blocks_until_filled() {
        let document = web_sys::window().unwrap().document().unwrap();
        let form = document
            .create_element("form")
            .unwrap()
            .dyn_into::<HtmlFormElement>()
            .unwrap();
        form.set_inner_html(
            r#"<div class="form-group">
                 <input id="name" name="name" required>
                 <span class="error-message"></span>
               </div>"#,
        );
        document.body().unwrap().append_child(&form).unwrap();

        assert_eq!(bind_contact_form(&form).unwrap(), 1);

        assert!(!submit(&form), "empty field must block submit");
        let group = form.query_selector(".form-group").unwrap().unwrap();
        assert!(group.class_list().contains(INVALID_CLASS));
        let slot = form.query_selector(".error-message").unwrap().unwrap();
        assert!(!slot.text_content().unwrap_or_default().is_empty());

        let input = document
            .get_element_by_id("name")
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap();
        input.set_value("Ada");
        assert!(submit(&form), "filled field must not block submit");
        assert!(!group.class_list().contains(INVALID_CLASS));
        assert_eq!(slot.text_content().unwrap_or_default(), "");
    }
}
