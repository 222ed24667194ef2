use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};
use kurbo::{Point, Rect};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, Storage, Window};
use crate::engine::BackgroundEngine;
use crate::error::BackgroundError;
use crate::logging;
use crate::scheduler::{CancelToken, FrameHandle, FrameScheduler};
use crate::settings::{BackgroundSettings, SettingsStore};
use crate::surface::Canvas;
use crate::types::{GradientStop, Paint, Size};

pub const BACKGROUND_CANVAS_ID: &str = "backgroundCanvas";

type WebEngine = BackgroundEngine<CanvasSurface, AnimationFrameScheduler>;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_document(id: &str) -> Result<Self, BackgroundError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(BackgroundError::NoWindow)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| BackgroundError::SurfaceMissing(id.to_string()))?;
        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, BackgroundError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(BackgroundError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| BackgroundError::ContextUnavailable)?;
        Ok(CanvasSurface { canvas, ctx })
    }

    fn gradient(&self, paint: &Paint) -> Option<CanvasGradient> {
        let (grad, stops): (CanvasGradient, &[GradientStop]) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear(g) => (
                self.ctx.create_linear_gradient(g.start.x, g.start.y, g.end.x, g.end.y),
                &g.stops,
            ),
            Paint::Radial(g) => {
                let (cx, cy) = (g.center.x, g.center.y);
                let grad = self
                    .ctx
                    .create_radial_gradient(cx, cy, g.inner_radius, cx, cy, g.outer_radius)
                    .ok()?;
                (grad, &g.stops)
            }
        };
        for stop in stops {
            let _ = grad.add_color_stop(stop.offset as f32, &stop.color.to_css());
        }
        Some(grad)
    }

    fn set_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            _ => {
                if let Some(grad) = self.gradient(paint) {
                    self.ctx.set_fill_style(&grad);
                }
            }
        }
    }

    fn set_stroke(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_stroke_style_str(&color.to_css()),
            _ => {
                if let Some(grad) = self.gradient(paint) {
                    self.ctx.set_stroke_style(&grad);
                }
            }
        }
    }
}

impl Canvas for CanvasSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, size: Size) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.w(), size.h());
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        self.set_stroke(paint);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        let Some((first, rest)) = points.split_first() else { return };
        self.set_fill(paint);
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_px: f64, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.set_font(&format!("{}px monospace", font_px));
        let _ = self.ctx.fill_text(text, origin.x, origin.y);
    }
}

/// Queues frames with `requestAnimationFrame`. Holds the engine weakly; a
/// frame that fires after the engine is gone does nothing.
pub struct AnimationFrameScheduler {
    engine: Weak<RefCell<WebEngine>>,
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self, token: CancelToken) -> Option<FrameHandle> {
        let window = web_sys::window()?;
        let engine = self.engine.clone();
        let callback = Closure::once_into_js(move |time_ms: f64| {
            if token.is_cancelled() {
                return;
            }
            let Some(engine) = engine.upgrade() else { return };
            match engine.try_borrow_mut() {
                Ok(mut engine) => engine.run_frame(&token, time_ms),
                Err(_) => warn!("engine busy; frame skipped"),
            }
        });
        window.request_animation_frame(callback.unchecked_ref()).ok().map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0);
        }
    }
}

pub struct LocalStorage(Storage);

impl LocalStorage {
    pub fn open() -> Option<Self> {
        web_sys::window()?.local_storage().ok().flatten().map(LocalStorage)
    }
}

impl SettingsStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }
}

/// The page's live accent, `--bg-color` on the root element.
pub fn computed_accent(window: &Window) -> Option<String> {
    let root = window.document()?.document_element()?;
    let style = window.get_computed_style(&root).ok().flatten()?;
    let value = style.get_property_value("--bg-color").ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn viewport_size(window: &Window) -> Size {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
    };
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

pub fn load_settings() -> BackgroundSettings {
    let mut settings = match LocalStorage::open() {
        Some(store) => BackgroundSettings::load(&store),
        None => {
            debug!("local storage unavailable; using default settings");
            BackgroundSettings::default()
        }
    };
    settings.accent_color = web_sys::window().and_then(|w| computed_accent(&w));
    settings
}

#[wasm_bindgen]
pub struct CanvasBackground {
    engine: Rc<RefCell<WebEngine>>,
}

#[wasm_bindgen]
impl CanvasBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> CanvasBackground {
        console_error_panic_hook::set_once();
        logging::init();

        let canvas = match CanvasSurface::from_document(canvas_id) {
            Ok(canvas) => Some(canvas),
            Err(e) => {
                debug!(error = %e, "canvas lookup failed");
                None
            }
        };
        let viewport = web_sys::window().map(|w| viewport_size(&w)).unwrap_or_default();
        let settings = load_settings();
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;

        let engine = Rc::new_cyclic(|weak| {
            let scheduler = AnimationFrameScheduler { engine: weak.clone() };
            RefCell::new(BackgroundEngine::initialize(canvas, scheduler, viewport, settings, seed))
        });

        if engine.borrow().has_surface() {
            if let Err(e) = listen_for_resize(Rc::downgrade(&engine)) {
                warn!(error = %e, "resize listener not installed");
            }
        }

        CanvasBackground { engine }
    }

    /// Switches effects. Storage and the computed accent are re-read first,
    /// so the new runner starts from what the page holds right now.
    #[wasm_bindgen(js_name = updateBackgroundEffect)]
    pub fn update_background_effect(&self, name: &str) -> String {
        let settings = load_settings();
        self.engine.borrow_mut().activate_named_with(name, settings).name().to_string()
    }

    pub fn stop(&self) {
        self.engine.borrow_mut().stop();
    }

    /// Re-reads the window size; the canvas normally tracks it on its own.
    pub fn resize(&self) {
        if let Some(window) = web_sys::window() {
            self.engine.borrow_mut().resize(viewport_size(&window));
        }
    }

    #[wasm_bindgen(js_name = reloadSettings)]
    pub fn reload_settings(&self) {
        self.engine.borrow_mut().update_settings(load_settings());
    }

    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&self, value: JsValue) -> Result<(), JsValue> {
        let settings: BackgroundSettings =
            serde_wasm_bindgen::from_value(value).map_err(|e| BackgroundError::Js(e.to_string()))?;
        self.engine.borrow_mut().update_settings(settings);
        Ok(())
    }

    #[wasm_bindgen(js_name = setOpacity)]
    pub fn set_opacity(&self, percent: i32) {
        self.engine.borrow_mut().set_opacity(percent as i64);
    }

    #[wasm_bindgen(js_name = executeCommand)]
    pub fn execute_command(&self, cmd_json: &str) -> String {
        self.engine.borrow_mut().execute_command(cmd_json)
    }

    #[wasm_bindgen(js_name = activeEffect)]
    pub fn active_effect(&self) -> Option<String> {
        self.engine.borrow().active_effect().map(|kind| kind.name().to_string())
    }
}

fn listen_for_resize(engine: Weak<RefCell<WebEngine>>) -> Result<(), BackgroundError> {
    let window = web_sys::window().ok_or(BackgroundError::NoWindow)?;
    let on_resize = Closure::wrap(Box::new(move || {
        let (Some(engine), Some(window)) = (engine.upgrade(), web_sys::window()) else { return };
        if let Ok(mut engine) = engine.try_borrow_mut() {
            engine.resize(viewport_size(&window));
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

/// Page-load entry point: binds `#backgroundCanvas` and starts whatever the
/// saved settings select.
#[wasm_bindgen(js_name = initCanvasBackground)]
pub fn init_canvas_background() -> CanvasBackground {
    let background = CanvasBackground::new(BACKGROUND_CANVAS_ID);
    let kind = background.engine.borrow_mut().activate_startup_effect();
    debug!(effect = kind.name(), "startup effect");
    background
}
