use web_sys::Element;

use crate::config::SiteConfig;
use crate::elements::PageElements;
use crate::error::PageResult;
use crate::observe::intersection_observer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Counters in the about section.
    Stat,
    /// Section headers play a "scanner" sweep.
    Header,
}

impl Reveal {
    pub fn class(self) -> &'static str {
        match self {
            Reveal::Stat => "in-view",
            Reveal::Header => "scanned",
        }
    }

    fn of<T: Revealable>(element: &T) -> Self {
        if element.is_header() {
            Reveal::Header
        } else {
            Reveal::Stat
        }
    }
}

/// An observed element the reveal pass can mark.
pub trait Revealable {
    fn is_header(&self) -> bool;
    fn add_class(&self, class: &str) -> PageResult;
}

impl Revealable for Element {
    fn is_header(&self) -> bool {
        self.class_list().contains("section-header")
    }

    fn add_class(&self, class: &str) -> PageResult {
        Ok(self.class_list().add_1(class)?)
    }
}

/// Handles one observer batch: every intersecting element gets its reveal
/// class and is handed to `unobserve`. Classes are only ever added.
/// Returns the number of elements revealed.
pub fn reveal_batch<T, I, F>(entries: I, mut unobserve: F) -> usize
where
    T: Revealable,
    I: IntoIterator<Item = (T, bool)>,
    F: FnMut(&T),
{
    let mut revealed = 0;
    for (target, intersecting) in entries {
        if !intersecting {
            continue;
        }
        if let Err(e) = target.add_class(Reveal::of(&target).class()) {
            log::error!("Reveal class not applied: {}", e);
        }
        unobserve(&target);
        revealed += 1;
    }
    revealed
}

/// Adds the reveal class the first time an element scrolls into view, then
/// stops watching it.
pub fn init_reveal(elements: &PageElements, config: &SiteConfig) -> PageResult {
    if elements.stat_items.is_empty() && elements.section_headers.is_empty() {
        log::debug!("No stats or section headers to reveal");
        return Ok(());
    }

    let observer = intersection_observer(Some(config.reveal_threshold), None, |entries, observer| {
        let batch = entries.iter().map(|e| (e.target(), e.is_intersecting()));
        reveal_batch(batch, |target| observer.unobserve(target));
    })?;

    for element in elements.stat_items.iter().chain(&elements.section_headers) {
        observer.observe(element);
    }
    log::info!(
        "Reveal on scroll for {} stats and {} headers",
        elements.stat_items.len(),
        elements.section_headers.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct Card {
        name: &'static str,
        header: bool,
        classes: RefCell<BTreeSet<String>>,
    }

    impl Card {
        fn stat(name: &'static str) -> Self {
            Self { name, ..Self::default() }
        }

        fn header(name: &'static str) -> Self {
            Self { name, header: true, ..Self::default() }
        }

        fn classes(&self) -> Vec<String> {
            self.classes.borrow().iter().cloned().collect()
        }
    }

    impl Revealable for &Card {
        fn is_header(&self) -> bool {
            self.header
        }

        fn add_class(&self, class: &str) -> PageResult {
            self.classes.borrow_mut().insert(class.to_string());
            Ok(())
        }
    }

    #[test]
    fn only_intersecting_elements_are_revealed_and_unobserved() {
        let stat = Card::stat("projects-count");
        let header = Card::header("about-header");
        let offscreen = Card::stat("clients-count");
        let mut unobserved = Vec::new();

        let revealed = reveal_batch(
            [(&stat, true), (&header, true), (&offscreen, false)],
            |card: &&Card| unobserved.push(card.name),
        );

        assert_eq!(revealed, 2);
        assert_eq!(stat.classes(), vec!["in-view"]);
        assert_eq!(header.classes(), vec!["scanned"]);
        assert!(offscreen.classes().is_empty());
        assert_eq!(unobserved, vec!["projects-count", "about-header"]);
    }

    #[test]
    fn reveal_never_reverts() {
        let stat = Card::stat("years-count");
        let mut unobserved = Vec::new();

        reveal_batch([(&stat, true)], |card: &&Card| unobserved.push(card.name));
        reveal_batch([(&stat, false)], |card: &&Card| unobserved.push(card.name));

        assert_eq!(stat.classes(), vec!["in-view"]);
        assert_eq!(unobserved, vec!["years-count"]);
    }

    struct Detached;

    impl Revealable for Detached {
        fn is_header(&self) -> bool {
            false
        }

        fn add_class(&self, _class: &str) -> PageResult {
            Err(crate::error::PageError::Js("node detached".to_string()))
        }
    }

    #[test]
    fn failed_class_write_still_unobserves() {
        let mut unobserve_calls = 0;
        let revealed = reveal_batch([(Detached, true)], |_: &Detached| unobserve_calls += 1);
        assert_eq!(revealed, 1);
        assert_eq!(unobserve_calls, 1);
    }

    #[test]
    fn reveal_classes() {
        assert_eq!(Reveal::Stat.class(), "in-view");
        assert_eq!(Reveal::Header.class(), "scanned");
    }
}
