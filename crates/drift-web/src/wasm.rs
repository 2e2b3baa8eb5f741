#![forbid(unsafe_code)]

use drift_core::ThemeMode;
use drift_render::Surface;
use drift_runtime::Engine;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::host;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Canvas backdrop driven by the page's animation loop.
#[wasm_bindgen]
pub struct DriftBackground {
    engine: Engine,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    rgba: Vec<u8>,
}

#[wasm_bindgen]
impl DriftBackground {
    /// Create a background from an optional JSON options string
    /// (`settle_delay_ms`, `seed`, `clear_color`).
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<DriftBackground, JsValue> {
        let config = host::config_from_options(options.as_deref()).map_err(js_err)?;
        let engine = Engine::new(config).map_err(js_err)?;
        Ok(Self {
            engine,
            canvas: None,
            ctx: None,
            rgba: Vec::new(),
        })
    }

    /// Bind to a canvas and start animating.
    ///
    /// `theme` is the page's `data-theme` attribute; absent means dark.
    /// Returns `false` and stays idle when the canvas or its 2D context is
    /// missing.
    pub fn attach(
        &mut self,
        canvas: Option<HtmlCanvasElement>,
        width: u32,
        height: u32,
        theme: Option<String>,
    ) -> bool {
        let ctx = canvas.as_ref().and_then(|c| {
            c.get_context("2d")
                .ok()
                .flatten()
                .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
        });
        let surface = match (&canvas, &ctx) {
            (Some(canvas), Some(_)) => {
                let viewport = host::canvas_viewport(width, height);
                canvas.set_width(viewport.width);
                canvas.set_height(viewport.height);
                Some(Surface::new(viewport))
            }
            _ => None,
        };
        let theme = host::theme_from_attribute(theme.as_deref());
        match self.engine.start(surface, &theme) {
            Ok(()) => {
                self.canvas = canvas;
                self.ctx = ctx;
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "attach refused");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.engine.pointer_move(x, y);
    }

    /// Resize the backing canvas; the scene is rebuilt on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(canvas) = &self.canvas {
            let viewport = host::canvas_viewport(width, height);
            canvas.set_width(viewport.width);
            canvas.set_height(viewport.height);
        }
        self.engine.resize(width, height);
    }

    /// Switch theme (`"dark"` or `"light"`); the rebuild follows after the
    /// settle delay.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        let theme: ThemeMode = host::parse_theme(theme).map_err(js_err)?;
        self.engine.set_theme(theme);
        Ok(())
    }

    /// Run one tick at host time `now_ms` and paint it. Returns whether the
    /// background is still running.
    pub fn frame(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        self.engine.set_time_ms(now_ms);
        let result = self.engine.step();
        if result.rendered {
            self.present()?;
        }
        Ok(result.running)
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.engine.is_running()
    }

    /// Current theme name, or `undefined` before `attach`.
    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> Option<String> {
        self.engine.theme().map(|t| t.name().to_owned())
    }

    /// Stop animating and release the canvas.
    pub fn destroy(&mut self) {
        self.engine.stop();
        self.canvas = None;
        self.ctx = None;
        self.rgba = Vec::new();
    }

    fn present(&mut self) -> Result<(), JsValue> {
        let (Some(ctx), Some(surface)) = (&self.ctx, self.engine.surface()) else {
            return Ok(());
        };
        if surface.width() == 0 || surface.height() == 0 {
            return Ok(());
        }
        surface.write_rgba_bytes(&mut self.rgba);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.rgba.as_slice()),
            surface.width(),
            surface.height(),
        )?;
        ctx.put_image_data(&image, 0.0, 0.0)
    }
}

/// Pick the initial theme from a saved preference and the system
/// `prefers-color-scheme: dark` match.
#[wasm_bindgen(js_name = resolveTheme)]
pub fn resolve_theme(saved: Option<String>, system_prefers_dark: bool) -> String {
    ThemeMode::resolve(saved.as_deref(), system_prefers_dark)
        .name()
        .to_owned()
}
