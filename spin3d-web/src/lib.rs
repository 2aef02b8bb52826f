/// spin3d Web - WASM front-end for the spin3d pipeline
///
/// Drives a `FrameOrchestrator` from JavaScript and fills the draw list onto
/// a 2D canvas. Hosts that prefer WebGL/WGPU can ask for the GPU variant's
/// uniforms and vertex buffer instead and skip the painter's path entirely.
use log::info;
use spin3d_core::{
    gpu::{self, GpuCamera, GpuFrame},
    obj, DrawList, FrameOrchestrator, RenderConfig,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Floats per polygon in [`flatten_draw_list`]: three points then RGB
pub const POLYGON_STRIDE: usize = 9;

/// `[x1, y1, x2, y2, x3, y3, r, g, b]` per polygon, back to front
pub fn flatten_draw_list(list: &DrawList) -> Vec<f32> {
    let mut out = Vec::with_capacity(list.len() * POLYGON_STRIDE);
    for command in list.iter() {
        for p in &command.points {
            out.push(p.x);
            out.push(p.y);
        }
        out.extend_from_slice(&[
            command.color.r as f32,
            command.color.g as f32,
            command.color.b as f32,
        ]);
    }
    out
}

/// Model matrix then model-view-projection, both column-major
pub fn gpu_uniforms_for(frames: &FrameOrchestrator) -> spin3d_core::Result<Vec<f32>> {
    let viewport = frames.viewport();
    let camera = GpuCamera::looking_at_origin(
        frames.distance(),
        viewport.width as f32 / viewport.height.max(1) as f32,
    );
    let frame = GpuFrame::new(frames.angle(), &camera)?;

    let mut out = Vec::with_capacity(32);
    out.extend_from_slice(&gpu::to_column_major(&frame.model));
    out.extend_from_slice(&gpu::to_column_major(&frame.mvp));
    Ok(out)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    frames: FrameOrchestrator,
    last: DrawList,
    context: Option<CanvasRenderingContext2d>,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(obj_text: &str, width: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let mesh = obj::parse_obj(obj_text).map_err(js_error)?;
        info!("web renderer: {} triangles at {}x{}", mesh.len(), width, height);
        let frames = FrameOrchestrator::new(mesh, &RenderConfig::default(), width, height)
            .map_err(js_error)?;
        Ok(WebRenderer {
            frames,
            last: DrawList::default(),
            context: None,
        })
    }

    /// Attach to a canvas element so `tick` paints into it
    pub fn attach(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        self.frames
            .resize(canvas.width(), canvas.height())
            .map_err(js_error)?;
        self.context = Some(context);
        Ok(())
    }

    /// Advance one frame; paints it when a canvas is attached
    pub fn tick(&mut self) -> Result<(), JsValue> {
        self.last = self.frames.tick();
        if let Some(context) = &self.context {
            paint(context, &self.last, self.frames.viewport())?;
        }
        Ok(())
    }

    /// The most recent frame, flattened for JavaScript
    pub fn draw_list(&self) -> Vec<f32> {
        flatten_draw_list(&self.last)
    }

    pub fn adjust_rotation_step(&mut self, delta: f32) {
        self.frames.adjust_rotation_step(delta);
    }

    pub fn adjust_distance(&mut self, delta: f32) {
        self.frames.adjust_distance(delta);
    }

    pub fn toggle_pause(&mut self) {
        self.frames.toggle_pause();
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.frames.resize(width, height).map_err(js_error)
    }

    pub fn angle(&self) -> f32 {
        self.frames.angle()
    }

    pub fn gpu_uniforms(&self) -> Result<Vec<f32>, JsValue> {
        gpu_uniforms_for(&self.frames).map_err(js_error)
    }

    pub fn vertex_buffer(&self) -> Result<Vec<f32>, JsValue> {
        gpu::vertex_buffer(self.frames.mesh(), self.frames.winding()).map_err(js_error)
    }
}

fn paint(
    context: &CanvasRenderingContext2d,
    list: &DrawList,
    viewport: &spin3d_core::Viewport,
) -> Result<(), JsValue> {
    context.set_fill_style(&JsValue::from_str("black"));
    context.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

    for command in list.iter() {
        let [a, b, c] = command.points;
        let fill = format!(
            "rgb({}, {}, {})",
            command.color.r, command.color.g, command.color.b
        );
        context.set_fill_style(&JsValue::from_str(&fill));
        context.begin_path();
        context.move_to(a.x as f64, a.y as f64);
        context.line_to(b.x as f64, b.y as f64);
        context.line_to(c.x as f64, c.y as f64);
        context.close_path();
        context.fill();
    }
    Ok(())
}
