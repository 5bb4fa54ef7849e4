use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Array;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::PageResult;

/// Creates an `IntersectionObserver` whose callback receives the batch as
/// typed entries. The callback lives for the rest of the page.
pub fn intersection_observer<F>(
    threshold: Option<f64>,
    root_margin: Option<&str>,
    mut callback: F,
) -> PageResult<IntersectionObserver>
where
    F: FnMut(Vec<IntersectionObserverEntry>, &IntersectionObserver) + 'static,
{
    let options = IntersectionObserverInit::new();
    if let Some(threshold) = threshold {
        options.set_threshold(&JsValue::from_f64(threshold));
    }
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }

    let on_intersect = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        let entries = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .collect();
        callback(entries, &observer);
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    on_intersect.forget();
    Ok(observer)
}
