use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

use crate::config::SiteConfig;
use crate::elements::PageElements;
use crate::error::{PageError, PageResult};

/// Pointer position relative to the card's top-left corner.
pub fn spotlight_offset(client: (f64, f64), rect_origin: (f64, f64)) -> (f64, f64) {
    (client.0 - rect_origin.0, client.1 - rect_origin.1)
}

/// Maps the pointer to [-1, 1] on both axes and moves the background the
/// opposite way, up to `strength` pixels.
pub fn parallax_offset(client: (f64, f64), viewport: (f64, f64), strength: f64) -> (f64, f64) {
    let normalize = |pos: f64, size: f64| {
        if size > 0.0 {
            (pos / size) * 2.0 - 1.0
        } else {
            0.0
        }
    };
    let x = normalize(client.0, viewport.0);
    let y = normalize(client.1, viewport.1);
    (-x * strength, -y * strength)
}

pub fn translate(offset: (f64, f64)) -> String {
    format!("translate({}px, {}px)", offset.0, offset.1)
}

fn set_spotlight(card: &HtmlElement, x: f64, y: f64) -> PageResult {
    let style = card.style();
    style.set_property("--mouse-x", &format!("{}px", x))?;
    style.set_property("--mouse-y", &format!("{}px", y))?;
    Ok(())
}

pub fn init_pointer_effects(elements: &PageElements, config: &SiteConfig) -> PageResult {
    for card in &elements.spotlight_cards {
        let Some(card_html) = card.dyn_ref::<HtmlElement>().cloned() else {
            continue;
        };
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let rect = card_html.get_bounding_client_rect();
            let (x, y) = spotlight_offset(
                (event.client_x() as f64, event.client_y() as f64),
                (rect.left(), rect.top()),
            );
            if let Err(e) = set_spotlight(&card_html, x, y) {
                log::error!("Spotlight update failed: {}", e);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        card.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();
    }

    if let Some(gradients) = elements.gradients.clone() {
        let window = elements.window.clone();
        let strength = config.parallax_strength;
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let offset = parallax_offset(
                (event.client_x() as f64, event.client_y() as f64),
                (width, height),
                strength,
            );
            if let Err(e) = gradients.style().set_property("transform", &translate(offset)) {
                log::error!("Parallax update failed: {}", PageError::from(e));
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        elements
            .window
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();
        log::info!("Background parallax bound");
    } else {
        log::debug!("No gradients container, skipping parallax");
    }

    log::info!("Spotlight on {} cards", elements.spotlight_cards.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotlight_is_relative_to_card() {
        assert_eq!(spotlight_offset((150.0, 90.0), (100.0, 40.0)), (50.0, 50.0));
    }

    #[test]
    fn parallax_center_is_still() {
        assert_eq!(parallax_offset((500.0, 300.0), (1000.0, 600.0), 30.0), (-0.0, -0.0));
    }

    #[test]
    fn parallax_moves_against_pointer() {
        assert_eq!(parallax_offset((0.0, 600.0), (1000.0, 600.0), 30.0), (30.0, -30.0));
    }

    #[test]
    fn parallax_ignores_zero_viewport() {
        assert_eq!(parallax_offset((10.0, 10.0), (0.0, 0.0), 30.0), (-0.0, -0.0));
    }

    #[test]
    fn translate_format() {
        assert_eq!(translate((12.5, -3.0)), "translate(12.5px, -3px)");
    }
}
