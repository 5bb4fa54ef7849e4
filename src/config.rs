use serde::Deserialize;
use web_sys::Document;

use crate::error::PageError;

/// Id of the optional `<script type="application/json">` block the server can
/// render to override any of the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub navbar_scroll_threshold: f64,
    pub reveal_threshold: f64,
    pub nav_root_margin: String,
    pub typewriter_threshold: f64,
    pub typewriter_start_ms: u32,
    pub typewriter_char_ms: u32,
    pub parallax_strength: f64,
    pub track_path: String,
    pub skills_default: String,
    pub projects_default: String,
    pub licenses_default: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            navbar_scroll_threshold: 50.0,
            reveal_threshold: 0.15,
            nav_root_margin: "-40% 0px -60% 0px".to_string(),
            typewriter_threshold: 0.6,
            typewriter_start_ms: 500,
            typewriter_char_ms: 100,
            parallax_strength: 30.0,
            track_path: "/track_click/".to_string(),
            skills_default: "all".to_string(),
            projects_default: "featured".to_string(),
            licenses_default: "all".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the embedded config block, falling back to defaults when it is
    /// absent or unreadable.
    pub fn load(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            log::debug!("No #{} block, using default config", CONFIG_ELEMENT_ID);
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }

    /// Tracking hits go to the page's own origin.
    pub fn track_url_base(&self) -> &str {
        &self.track_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SiteConfig::from_json(r#"{"projects_default": "web", "typewriter_char_ms": 40}"#)
            .unwrap();
        assert_eq!(config.projects_default, "web");
        assert_eq!(config.typewriter_char_ms, 40);
        assert_eq!(
            SiteConfig {
                projects_default: "web".to_string(),
                typewriter_char_ms: 40,
                ..SiteConfig::default()
            },
            config
        );
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = SiteConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, PageError::Config(_)));
    }

    #[test]
    fn track_base_is_same_origin_path() {
        assert_eq!(SiteConfig::default().track_url_base(), "/track_click/");

        let config = SiteConfig::from_json(r#"{"track_path": "/stats/hit/"}"#).unwrap();
        assert_eq!(config.track_url_base(), "/stats/hit/");
    }
}
