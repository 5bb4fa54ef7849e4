use gloo_timers::callback::Timeout;
use web_sys::Element;

use crate::config::SiteConfig;
use crate::elements::PageElements;
use crate::error::PageResult;
use crate::observe::intersection_observer;

/// Yields the captured title one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    pos: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }
}

impl Iterator for Typewriter {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }
}

fn type_next(target: Element, mut writer: Typewriter, delay_ms: u32) {
    let Some(c) = writer.next() else {
        return;
    };
    let mut text = target.text_content().unwrap_or_default();
    text.push(c);
    target.set_text_content(Some(&text));
    if writer.remaining() > 0 {
        Timeout::new(delay_ms, move || type_next(target, writer, delay_ms)).forget();
    }
}

/// Clears `#typewriter-title` and types it back once the contact section is
/// mostly on screen.
pub fn init_typewriter(elements: &PageElements, config: &SiteConfig) -> PageResult {
    let (Some(title), Some(contact)) = (elements.typewriter.clone(), elements.contact_section.as_ref()) else {
        log::debug!("No typewriter title or contact section");
        return Ok(());
    };

    let text = title.text_content().unwrap_or_default();
    title.set_text_content(Some(""));

    let start_ms = config.typewriter_start_ms;
    let char_ms = config.typewriter_char_ms;
    let mut pending = Some((title, Typewriter::new(text.trim())));
    let observer = intersection_observer(Some(config.typewriter_threshold), None, move |entries, observer| {
        if !entries.first().map(|e| e.is_intersecting()).unwrap_or(false) {
            return;
        }
        observer.disconnect();
        if let Some((title, writer)) = pending.take() {
            Timeout::new(start_ms, move || type_next(title, writer, char_ms)).forget();
        }
    })?;
    observer.observe(contact);

    log::info!("Typewriter armed for {} characters", text.trim().chars().count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn types_every_character_in_order() {
        let typed: String = Typewriter::new("Let's talk").collect();
        assert_eq!(typed, "Let's talk");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut writer = Typewriter::new("héllo ✨");
        assert_eq!(writer.remaining(), 7);
        assert_eq!(writer.next(), Some('h'));
        assert_eq!(writer.next(), Some('é'));
        assert_eq!(writer.remaining(), 5);
        assert_eq!(writer.by_ref().last(), Some('✨'));
        assert_eq!(writer.remaining(), 0);
        assert_eq!(writer.next(), None);
    }

    #[test]
    fn empty_text_types_nothing() {
        let mut writer = Typewriter::new("");
        assert_eq!(writer.remaining(), 0);
        assert_eq!(writer.next(), None);
    }
}
