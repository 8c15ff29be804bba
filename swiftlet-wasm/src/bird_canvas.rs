//! The perching-bird canvas: one state-machine bird drawn from a sprite
//! sheet, landing on page elements discovered by the perch scan.

use std::cell::RefCell;
use std::rc::Rc;

use swiftlet_config::{BirdSettings, SpriteGrid};
use swiftlet_core::{Bird, BirdConfig, SequenceTable, SlicePerchSource, Vec2};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlImageElement, MouseEvent};

use crate::console_log;
use crate::loop_driver::{canvas_by_id, event_position, fit_canvas, window, EventHook, RafLoop};
use crate::perch_dom;

/// How often the page is rescanned for perch candidates.
const PERCH_SCAN_INTERVAL_MS: f64 = 2000.0;

struct BirdScene {
    bird: Bird,
    config: BirdConfig,
    table: SequenceTable,
    grid: SpriteGrid,
    sprite: HtmlImageElement,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    selectors: Vec<String>,
    perches: Vec<Vec2>,
    pointer: Option<Vec2>,
    last_ts: Option<f64>,
    next_scan: f64,
    width: f32,
    height: f32,
}

impl BirdScene {
    fn tick(&mut self, timestamp: f64) {
        let dt = match self.last_ts {
            Some(prev) => ((timestamp - prev) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ts = Some(timestamp);
        let dt = dt.min(self.config.max_delta);

        if timestamp >= self.next_scan {
            self.rescan();
            self.next_scan = timestamp + PERCH_SCAN_INTERVAL_MS;
        }

        let pointer = self.pointer;
        self.bird
            .update(dt, pointer, &SlicePerchSource(&self.perches), &self.config);
        self.bird.animate(dt, &self.table);

        if let Err(err) = self.draw() {
            console_log!("bird draw failed: {:?}", err);
        }
    }

    fn rescan(&mut self) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            // Perch rects come back in client space; shift them into canvas
            // space so they agree with the pointer and the drawing.
            let rect = self.canvas.get_bounding_client_rect();
            let origin = Vec2::new(rect.left() as f32, rect.top() as f32);
            self.perches = perch_dom::scan(&document, &self.selectors, self.config.size, origin);
        }
    }

    fn draw(&self) -> Result<(), JsValue> {
        self.context
            .clear_rect(0.0, 0.0, self.width as f64, self.height as f64);

        let size = self.config.size as f64;
        self.context.save();
        self.context
            .translate(self.bird.position.x as f64, self.bird.position.y as f64)?;
        self.context.rotate(self.bird.angle as f64)?;
        if self.bird.facing < 0.0 {
            self.context.scale(-1.0, 1.0)?;
        }

        if self.sprite.complete() && self.sprite.natural_width() > 0 {
            let sequence = self.table.for_state(self.bird.state);
            let frame_w = self.sprite.natural_width() as f64 / self.grid.columns as f64;
            let frame_h = self.sprite.natural_height() as f64 / self.grid.rows as f64;
            let sx = self.bird.frame as f64 * frame_w;
            let sy = sequence.row as f64 * frame_h;
            self.context
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &self.sprite,
                    sx,
                    sy,
                    frame_w,
                    frame_h,
                    -size / 2.0,
                    -size / 2.0,
                    size,
                    size,
                )?;
        } else {
            // Sprite missing or not loaded yet: draw a kite shape instead
            // of failing the animation.
            self.context.begin_path();
            self.context.move_to(size * 0.6, 0.0);
            self.context.line_to(-size * 0.4, size * 0.35);
            self.context.line_to(-size * 0.2, 0.0);
            self.context.line_to(-size * 0.4, -size * 0.35);
            self.context.close_path();
            self.context.set_fill_style_str("#3d3d3d");
            self.context.fill();
        }

        self.context.restore();
        Ok(())
    }

    fn refit(&mut self) {
        if let Ok((width, height)) = fit_canvas(&self.canvas, &self.context) {
            self.width = width;
            self.height = height;
        }
        self.rescan();
    }
}

/// A self-driving perching-bird animation bound to a canvas element.
#[wasm_bindgen]
pub struct BirdCanvas {
    state: Rc<RefCell<BirdScene>>,
    raf: RafLoop,
    on_move: EventHook<MouseEvent>,
    on_resize: EventHook<Event>,
}

#[wasm_bindgen]
impl BirdCanvas {
    /// `settings_json` is a JSON [`BirdSettings`] document; an empty string
    /// uses the defaults. Misconfigured sprite sequences are rejected here
    /// rather than surfacing as a blank animation later.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, settings_json: &str) -> Result<BirdCanvas, JsValue> {
        let settings: BirdSettings = if settings_json.trim().is_empty() {
            BirdSettings::default()
        } else {
            serde_json::from_str(settings_json)
                .map_err(|e| JsValue::from_str(&format!("invalid bird settings: {e}")))?
        };
        settings
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let table = settings
            .sequence_table()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let config = settings.to_config();

        let (canvas, context) = canvas_by_id(canvas_id)?;
        let (width, height) = fit_canvas(&canvas, &context)?;

        let sprite = HtmlImageElement::new()?;
        if !settings.sprite_url.is_empty() {
            sprite.set_src(&settings.sprite_url);
        }

        let bird = Bird::new(Vec2::new(width * 0.5, height * 0.3), &config);
        console_log!("bird canvas {}x{}", width, height);

        let state = Rc::new(RefCell::new(BirdScene {
            bird,
            config,
            table,
            grid: settings.grid,
            sprite,
            canvas,
            context,
            selectors: settings.perch_selectors.clone(),
            perches: Vec::new(),
            pointer: None,
            last_ts: None,
            next_scan: 0.0,
            width,
            height,
        }));
        state.borrow_mut().rescan();

        let win = window()?;

        let scene = Rc::clone(&state);
        let on_move = EventHook::attach(win.as_ref(), "mousemove", move |event: MouseEvent| {
            let mut scene = scene.borrow_mut();
            let position = event_position(&event, &scene.canvas);
            scene.pointer = Some(position);
        })?;

        let scene = Rc::clone(&state);
        let on_resize = EventHook::attach(win.as_ref(), "resize", move |_: Event| {
            scene.borrow_mut().refit();
        })?;

        let scene = Rc::clone(&state);
        let raf = RafLoop::new(move |timestamp| {
            scene.borrow_mut().tick(timestamp);
        })?;

        Ok(BirdCanvas {
            state,
            raf,
            on_move,
            on_resize,
        })
    }

    pub fn pause(&self) {
        self.raf.pause();
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.state.borrow_mut().last_ts = None;
        self.raf.resume()
    }

    pub fn running(&self) -> bool {
        self.raf.running()
    }

    /// Cancels the frame loop and removes all listeners.
    pub fn destroy(&self) {
        self.raf.cancel();
        self.on_move.detach();
        self.on_resize.detach();
    }

    /// Current simulation state, for debugging overlays.
    pub fn state_name(&self) -> String {
        self.state.borrow().bird.state.name().to_string()
    }

    pub fn perch_count(&self) -> usize {
        self.state.borrow().perches.len()
    }

    pub fn set_repel_distance(&self, distance: f64) {
        self.state.borrow_mut().config.repel_distance = distance as f32;
    }
}
