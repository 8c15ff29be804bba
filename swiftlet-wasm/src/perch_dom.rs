//! DOM perch discovery: turns elements matching the configured selectors
//! into candidate landing points for the bird.

use swiftlet_core::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Vertical offset so the bird sits on top of the element, not inside it.
const PERCH_LIFT: f32 = 4.0;

/// Scans the document for perch candidates: elements matching any selector,
/// wider than `min_width` (too-small targets are unusable), recorded as
/// their top-center point. `origin` is the canvas box's client-space
/// top-left, so the returned points line up with canvas drawing even when
/// the canvas does not sit at the viewport origin. The result is only valid
/// as of this scan; removed or resized elements simply drop out next time.
pub fn scan(document: &Document, selectors: &[String], min_width: f32, origin: Vec2) -> Vec<Vec2> {
    let mut points = Vec::new();

    for selector in selectors {
        let Ok(list) = document.query_selector_all(selector) else {
            // An invalid selector yields no perches rather than failing
            // the animation.
            continue;
        };
        for i in 0..list.length() {
            let Some(node) = list.item(i) else { continue };
            let Ok(element) = node.dyn_into::<Element>() else {
                continue;
            };
            let rect = element.get_bounding_client_rect();
            if (rect.width() as f32) <= min_width {
                continue;
            }
            points.push(
                Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    rect.top() as f32 - PERCH_LIFT,
                ) - origin,
            );
        }
    }

    points
}
