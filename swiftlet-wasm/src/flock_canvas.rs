//! The flocking canvas: a boids flock with pointer repulsion, click
//! scatter, and motion-blur trails.

use std::cell::RefCell;
use std::rc::Rc;

use swiftlet_config::FlockSettings;
use swiftlet_core::{Agent, FlockStd, Vec2};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent};

use crate::console_log;
use crate::loop_driver::{canvas_by_id, event_position, fit_canvas, window, EventHook, RafLoop};

struct FlockScene {
    flock: FlockStd,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    settings: FlockSettings,
    pointer: Option<Vec2>,
    last_ts: Option<f64>,
    width: f32,
    height: f32,
}

impl FlockScene {
    fn tick(&mut self, timestamp: f64) {
        let dt = match self.last_ts {
            Some(prev) => ((timestamp - prev) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ts = Some(timestamp);

        let pointer = self.pointer;
        self.flock.update(dt, pointer);

        if let Err(err) = self.draw() {
            console_log!("flock draw failed: {:?}", err);
        }
    }

    fn draw(&self) -> Result<(), JsValue> {
        // Motion blur: repaint the background at low alpha instead of
        // clearing, leaving trailing streaks behind each agent.
        self.context.set_global_alpha(self.settings.trail_alpha as f64);
        self.context.set_fill_style_str(&self.settings.background);
        self.context
            .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
        self.context.set_global_alpha(1.0);

        for agent in &self.flock.agents {
            self.draw_agent(agent)?;
        }

        Ok(())
    }

    fn draw_agent(&self, agent: &Agent) -> Result<(), JsValue> {
        let size = agent.size as f64;
        let angle = agent.velocity.heading() as f64;

        self.context.save();
        self.context
            .translate(agent.position.x as f64, agent.position.y as f64)?;
        self.context.rotate(angle)?;

        // Triangle pointing along the velocity.
        self.context.begin_path();
        self.context.move_to(size, 0.0);
        self.context.line_to(-size / 2.0, size / 2.0);
        self.context.line_to(-size / 2.0, -size / 2.0);
        self.context.close_path();

        // Hue shifts with speed, cyan at rest toward green at full tilt.
        let speed = agent.velocity.magnitude();
        let normalized_speed = (speed / agent.max_speed).min(1.0);
        let hue = 180.0 + normalized_speed * 60.0;
        let color = format!("hsl({}, 70%, 60%)", hue);
        self.context.set_fill_style_str(&color);
        self.context.fill();

        self.context.restore();
        Ok(())
    }

    fn refit(&mut self) {
        if let Ok((width, height)) = fit_canvas(&self.canvas, &self.context) {
            self.width = width;
            self.height = height;
            self.flock.resize(width, height);
        }
    }
}

/// A self-driving flock animation bound to a canvas element. Construction
/// wires the listeners and starts the frame loop; `destroy` tears both
/// down.
#[wasm_bindgen]
pub struct FlockCanvas {
    state: Rc<RefCell<FlockScene>>,
    raf: RafLoop,
    on_move: EventHook<MouseEvent>,
    on_click: EventHook<MouseEvent>,
    on_resize: EventHook<Event>,
}

#[wasm_bindgen]
impl FlockCanvas {
    /// `settings_json` is a JSON [`FlockSettings`] document; an empty
    /// string uses the defaults. Fails if the canvas or its 2d context is
    /// unavailable.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, settings_json: &str) -> Result<FlockCanvas, JsValue> {
        let settings: FlockSettings = if settings_json.trim().is_empty() {
            FlockSettings::default()
        } else {
            serde_json::from_str(settings_json)
                .map_err(|e| JsValue::from_str(&format!("invalid flock settings: {e}")))?
        };
        settings
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let (canvas, context) = canvas_by_id(canvas_id)?;
        let (width, height) = fit_canvas(&canvas, &context)?;
        console_log!(
            "flock canvas {}x{} with {} agents",
            width,
            height,
            settings.count
        );

        let flock = FlockStd::new(width, height, settings.count, settings.to_config());
        let state = Rc::new(RefCell::new(FlockScene {
            flock,
            canvas,
            context,
            settings,
            pointer: None,
            last_ts: None,
            width,
            height,
        }));

        let win = window()?;

        let scene = Rc::clone(&state);
        let on_move = EventHook::attach(win.as_ref(), "mousemove", move |event: MouseEvent| {
            let mut scene = scene.borrow_mut();
            let position = event_position(&event, &scene.canvas);
            scene.pointer = Some(position);
        })?;

        let scene = Rc::clone(&state);
        let on_click = EventHook::attach(win.as_ref(), "click", move |event: MouseEvent| {
            let mut scene = scene.borrow_mut();
            let position = event_position(&event, &scene.canvas);
            scene.pointer = Some(position);
            scene.flock.scatter();
        })?;

        let scene = Rc::clone(&state);
        let on_resize = EventHook::attach(win.as_ref(), "resize", move |_: Event| {
            scene.borrow_mut().refit();
        })?;

        let scene = Rc::clone(&state);
        let raf = RafLoop::new(move |timestamp| {
            scene.borrow_mut().tick(timestamp);
        })?;

        Ok(FlockCanvas {
            state,
            raf,
            on_move,
            on_click,
            on_resize,
        })
    }

    pub fn pause(&self) {
        self.raf.pause();
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        // Forget the old timestamp so the paused interval doesn't arrive
        // as one giant delta.
        self.state.borrow_mut().last_ts = None;
        self.raf.resume()
    }

    pub fn running(&self) -> bool {
        self.raf.running()
    }

    /// Cancels the frame loop and removes all listeners. The canvas element
    /// itself is left to the page.
    pub fn destroy(&self) {
        self.raf.cancel();
        self.on_move.detach();
        self.on_click.detach();
        self.on_resize.detach();
    }

    pub fn agent_count(&self) -> usize {
        self.state.borrow().flock.agents.len()
    }

    pub fn set_separation_weight(&self, weight: f64) {
        self.state.borrow_mut().flock.config.separation_weight = weight as f32;
    }

    pub fn set_alignment_weight(&self, weight: f64) {
        self.state.borrow_mut().flock.config.alignment_weight = weight as f32;
    }

    pub fn set_cohesion_weight(&self, weight: f64) {
        self.state.borrow_mut().flock.config.cohesion_weight = weight as f32;
    }

    pub fn set_mouse_radius(&self, radius: f64) {
        self.state.borrow_mut().flock.config.mouse_radius = radius as f32;
    }
}
