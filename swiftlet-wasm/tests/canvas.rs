use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use swiftlet_core::Vec2;
use swiftlet_wasm::{perch_dom, BirdCanvas, FlockCanvas};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window()
        .expect("no global window")
        .document()
        .expect("no document")
}

fn mount_canvas(id: &str) -> web_sys::HtmlCanvasElement {
    let document = document();
    let canvas = document
        .create_element("canvas")
        .expect("create canvas")
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .expect("canvas element");
    canvas.set_id(id);
    document
        .body()
        .expect("no body")
        .append_child(&canvas)
        .expect("append canvas");
    canvas
}

fn mount_div(attr: &str, width_px: u32) -> web_sys::Element {
    let document = document();
    let div = document.create_element("div").expect("create div");
    div.set_attribute(attr, "").expect("set attribute");
    div.set_attribute("style", &format!("width: {width_px}px; height: 24px;"))
        .expect("set style");
    document
        .body()
        .expect("no body")
        .append_child(&div)
        .expect("append div");
    div
}

#[wasm_bindgen_test]
fn test_flock_canvas_lifecycle() {
    mount_canvas("flock-lifecycle");

    let canvas = FlockCanvas::new("flock-lifecycle", "").expect("construct");
    assert!(canvas.running());
    assert_eq!(canvas.agent_count(), 48);

    canvas.pause();
    assert!(!canvas.running());
    canvas.resume().expect("resume");
    assert!(canvas.running());

    canvas.destroy();
    assert!(!canvas.running());
}

#[wasm_bindgen_test]
fn test_flock_canvas_rejects_bad_input() {
    assert!(FlockCanvas::new("no-such-canvas", "").is_err());

    mount_canvas("flock-bad-settings");
    assert!(FlockCanvas::new("flock-bad-settings", r#"{"count": 0}"#).is_err());
    assert!(FlockCanvas::new("flock-bad-settings", r#"{"trail_alpha": 3.0}"#).is_err());
    assert!(FlockCanvas::new("flock-bad-settings", "not json").is_err());
}

#[wasm_bindgen_test]
fn test_bird_canvas_lifecycle_with_perches() {
    mount_canvas("bird-lifecycle");
    mount_div("data-perch", 200);

    let canvas = BirdCanvas::new("bird-lifecycle", "").expect("construct");
    assert!(canvas.running());
    assert_eq!(canvas.state_name(), "flying");
    assert!(canvas.perch_count() >= 1, "perch scan found the test element");

    canvas.destroy();
    assert!(!canvas.running());
}

#[wasm_bindgen_test]
fn test_bird_canvas_rejects_broken_sequences() {
    mount_canvas("bird-bad-settings");
    // A sequence row outside the sprite grid must fail at mount time.
    let settings = r#"{"sequences": {"fleeing": {"row": 9, "frames": 4, "fps": 10.0}}}"#;
    assert!(BirdCanvas::new("bird-bad-settings", settings).is_err());
}

#[wasm_bindgen_test]
fn test_perch_scan_shifts_into_canvas_space() {
    let document = document();
    mount_div("data-shifted-perch", 160);
    let selectors = vec!["[data-shifted-perch]".to_string()];

    let at_origin = perch_dom::scan(&document, &selectors, 24.0, Vec2::zero());
    let shifted = perch_dom::scan(&document, &selectors, 24.0, Vec2::new(40.0, 25.0));

    assert!(!at_origin.is_empty());
    assert_eq!(at_origin.len(), shifted.len());
    for (a, b) in at_origin.iter().zip(&shifted) {
        assert!((a.x - b.x - 40.0).abs() < 1e-3);
        assert!((a.y - b.y - 25.0).abs() < 1e-3);
    }
}

#[wasm_bindgen_test]
fn test_perch_scan_skips_narrow_elements() {
    let document = document();
    mount_div("data-tiny-perch", 8);
    let selectors = vec!["[data-tiny-perch]".to_string()];

    assert!(perch_dom::scan(&document, &selectors, 24.0, Vec2::zero()).is_empty());
}
