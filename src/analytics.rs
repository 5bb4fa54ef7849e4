use std::fmt;
use std::str::FromStr;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, Event, RequestInit, Window};

use crate::config::SiteConfig;
use crate::elements::PageElements;
use crate::error::{PageError, PageResult};

/// Click events the tracking endpoint records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
    ResumeDownload,
    ProjectLiveDemo,
    ProjectGithub,
    EmailClick,
}

impl TrackAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackAction::ResumeDownload => "RESUME_DOWNLOAD",
            TrackAction::ProjectLiveDemo => "PROJECT_LIVE_DEMO",
            TrackAction::ProjectGithub => "PROJECT_GITHUB",
            TrackAction::EmailClick => "EMAIL_CLICK",
        }
    }
}

impl fmt::Display for TrackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl FromStr for TrackAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RESUME_DOWNLOAD" => Ok(TrackAction::ResumeDownload),
            "PROJECT_LIVE_DEMO" => Ok(TrackAction::ProjectLiveDemo),
            "PROJECT_GITHUB" => Ok(TrackAction::ProjectGithub),
            "EMAIL_CLICK" => Ok(TrackAction::EmailClick),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

pub fn track_url(base: &str, action: TrackAction, details: Option<&str>) -> String {
    let mut url = format!("{}?action={}", base, urlencoding::encode(action.as_str()));
    if let Some(details) = details.filter(|d| !d.is_empty()) {
        url.push_str("&details=");
        url.push_str(&urlencoding::encode(details));
    }
    url
}

/// A GET that outlives the page, so links that navigate away still get
/// counted.
pub fn fallback_init() -> RequestInit {
    let init = RequestInit::new();
    init.set_method("GET");
    // web-sys has no binding for RequestInit.keepalive; set the dictionary
    // member directly, which is what the generated setters do.
    let _ = web_sys::js_sys::Reflect::set(&init, &JsValue::from_str("keepalive"), &JsValue::TRUE);
    init
}

/// Fire-and-forget hit on the tracking endpoint. Uses the beacon API and
/// falls back to a keepalive fetch when the browser refuses or lacks it.
pub fn send(window: &Window, url: &str) {
    match window.navigator().send_beacon(url) {
        Ok(true) => return,
        Ok(false) => log::debug!("Beacon refused for {}, falling back to fetch", url),
        Err(_) => log::debug!("No beacon support, falling back to fetch"),
    }
    let request = window.fetch_with_str_and_init(url, &fallback_init());
    spawn_local(async move {
        if let Err(e) = JsFuture::from(request).await {
            log::debug!("Tracking request failed: {}", PageError::from(e));
        }
    });
}

fn bind_tracking(window: &Window, element: &Element, url: String) -> PageResult {
    let window = window.clone();
    let on_click = Closure::wrap(Box::new(move |_event: Event| {
        send(&window, &url);
    }) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

pub fn init_analytics(elements: &PageElements, config: &SiteConfig) -> PageResult {
    let base = config.track_url_base();
    let mut bound = 0;

    if let Some(button) = &elements.email_track {
        bind_tracking(&elements.window, button, track_url(&base, TrackAction::EmailClick, None))?;
        bound += 1;
    }

    for element in &elements.tracked {
        let raw = element.get_attribute("data-track-action").unwrap_or_default();
        let action = match raw.parse::<TrackAction>() {
            Ok(action) => action,
            Err(UnknownAction(name)) => {
                log::warn!("Ignoring unknown tracking action '{}'", name);
                continue;
            }
        };
        let details = element.get_attribute("data-track-details");
        bind_tracking(&elements.window, element, track_url(&base, action, details.as_deref()))?;
        bound += 1;
    }

    log::info!("Click tracking on {} elements", bound);
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod dom_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::js_sys::Reflect;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn fallback_request_is_keepalive_get() {
        let init = fallback_init();
        let keepalive = Reflect::get(&init, &JsValue::from_str("keepalive")).unwrap();
        let method = Reflect::get(&init, &JsValue::from_str("method")).unwrap();
        assert_eq!(keepalive.as_bool(), Some(true));
        assert_eq!(method.as_string().as_deref(), Some("GET"));
    }
}
