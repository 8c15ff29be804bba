//! Shared frame-loop plumbing: canvas acquisition, device-pixel-ratio
//! sizing, the self-scheduling `requestAnimationFrame` loop, and listener
//! registration with explicit detach.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement};

pub(crate) fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Looks up the canvas and its 2d context. Failure here is fatal for the
/// animation instance, not for the page.
pub(crate) fn canvas_by_id(
    canvas_id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let document = window()?.document().ok_or("no document")?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or("canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;

    let context = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;

    Ok((canvas, context))
}

/// Sizes the canvas backing store to its CSS box times `devicePixelRatio`
/// and scales the context so all drawing happens in CSS pixels. Returns the
/// logical size. Falls back to the viewport when the element has no box yet.
pub(crate) fn fit_canvas(
    canvas: &HtmlCanvasElement,
    context: &CanvasRenderingContext2d,
) -> Result<(f32, f32), JsValue> {
    let win = window()?;
    let dpr = win.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let (mut width, mut height) = (rect.width(), rect.height());
    if width <= 0.0 || height <= 0.0 {
        width = win.inner_width()?.as_f64().unwrap_or(0.0);
        height = win.inner_height()?.as_f64().unwrap_or(0.0);
    }

    // Setting width/height resets the context transform.
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    context.scale(dpr, dpr)?;

    Ok((width as f32, height as f32))
}

type TickClosure = Closure<dyn FnMut(f64)>;

/// A `requestAnimationFrame` loop that reschedules itself from inside the
/// callback. `pause` cancels the pending frame but keeps the closure so the
/// loop can resume; `cancel` drops the closure for good.
pub(crate) struct RafLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    closure: Rc<RefCell<Option<TickClosure>>>,
}

impl RafLoop {
    pub fn new<F>(mut tick: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let closure: Rc<RefCell<Option<TickClosure>>> = Rc::new(RefCell::new(None));

        let id_handle = Rc::clone(&raf_id);
        let closure_handle = Rc::clone(&closure);
        let cb = Closure::wrap(Box::new(move |timestamp: f64| {
            if id_handle.get().is_none() {
                // Cancelled between dispatch and call.
                return;
            }
            tick(timestamp);
            if id_handle.get().is_none() {
                // The tick stopped the loop.
                return;
            }
            let next = web_sys::window().and_then(|win| {
                let guard = closure_handle.borrow();
                guard.as_ref().and_then(|cl| {
                    win.request_animation_frame(cl.as_ref().unchecked_ref()).ok()
                })
            });
            id_handle.set(next);
        }) as Box<dyn FnMut(f64)>);

        let id = window()?.request_animation_frame(cb.as_ref().unchecked_ref())?;
        raf_id.set(Some(id));
        *closure.borrow_mut() = Some(cb);

        Ok(Self { raf_id, closure })
    }

    pub fn running(&self) -> bool {
        self.raf_id.get().is_some()
    }

    /// Cancels the pending frame without dropping the loop closure.
    pub fn pause(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(win) = web_sys::window() {
                let _ = win.cancel_animation_frame(id);
            }
        }
    }

    /// Restarts a paused loop. No-op while running.
    pub fn resume(&self) -> Result<(), JsValue> {
        if self.raf_id.get().is_some() {
            return Ok(());
        }
        let guard = self.closure.borrow();
        let cb = guard.as_ref().ok_or("animation loop already destroyed")?;
        let id = window()?.request_animation_frame(cb.as_ref().unchecked_ref())?;
        self.raf_id.set(Some(id));
        Ok(())
    }

    /// Cancels the pending frame and releases the closure.
    pub fn cancel(&self) {
        self.pause();
        self.closure.borrow_mut().take();
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A registered event listener that detaches itself on drop, so a torn-down
/// canvas never leaves callbacks running against detached state.
pub(crate) struct EventHook<E: FromWasmAbi + 'static> {
    target: EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(E)>,
}

impl<E: FromWasmAbi + 'static> EventHook<E> {
    pub fn attach<F>(target: &EventTarget, name: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(E) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            name,
            closure,
        })
    }

    pub fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
    }
}

impl<E: FromWasmAbi + 'static> Drop for EventHook<E> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Converts a mouse event into canvas-local coordinates.
pub(crate) fn event_position(
    event: &web_sys::MouseEvent,
    canvas: &HtmlCanvasElement,
) -> swiftlet_core::Vec2 {
    let rect = canvas.get_bounding_client_rect();
    swiftlet_core::Vec2::new(
        event.client_x() as f32 - rect.left() as f32,
        event.client_y() as f32 - rect.top() as f32,
    )
}
