//! Canvas drivers for the swiftlet animations.
//!
//! Two independent `#[wasm_bindgen]` entry points: [`FlockCanvas`] runs the
//! boids-style flock with pointer repulsion and click scatter, [`BirdCanvas`]
//! runs the single perching bird with a sprite-sheet animator and DOM perch
//! discovery. Each owns its own animation-frame loop and listeners; two
//! canvases on one page are fully independent.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}
pub(crate) use console_log;

mod bird_canvas;
mod flock_canvas;
mod loop_driver;
pub mod perch_dom;

pub use bird_canvas::BirdCanvas;
pub use flock_canvas::FlockCanvas;

#[cfg(test)]
mod tests {
    use swiftlet_config::{BirdSettings, FlockSettings};

    #[test]
    fn test_default_profiles_parse_from_json() {
        let flock: FlockSettings = serde_json::from_str("{}").expect("flock");
        flock.validate().expect("flock valid");

        let bird: BirdSettings = serde_json::from_str(r#"{"size": 24.0}"#).expect("bird");
        bird.validate().expect("bird valid");
    }
}
