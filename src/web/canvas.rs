// Drawing surface: the 400x400 canvas the player sketches on.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::classifier::Snapshot;
use crate::error::ClassifierError;

pub const CANVAS_ID: &str = "dg-canvas";
pub const CANVAS_SIZE: u32 = 400;
const BRUSH_RADIUS: f64 = 10.0;
const BACKGROUND: &str = "#000";
const INK: &str = "#fff";

pub struct DrawingSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl DrawingSurface {
    /// Reuse `#dg-canvas` (or create it), fix its size and hook up the
    /// pointer listeners.
    pub fn attach(doc: &Document) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
            el.dyn_into()?
        } else {
            let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
            c.set_id(CANVAS_ID);
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&c)?;
            c
        };
        canvas.set_width(CANVAS_SIZE);
        canvas.set_height(CANVAS_SIZE);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let surface = Self { canvas, ctx };
        surface.clear();
        surface.listen()?;
        Ok(surface)
    }

    pub fn clear(&self) {
        self.ctx.set_fill_style(&JsValue::from_str(BACKGROUND));
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    pub fn snapshot(&self) -> Result<Snapshot, ClassifierError> {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, w as f64, h as f64)
            .map_err(|e| ClassifierError::Inference(format!("canvas read failed: {e:?}")))?;
        Snapshot::from_rgba(image.width(), image.height(), image.data().0)
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn listen(&self) -> Result<(), JsValue> {
        let drawing = Rc::new(Cell::new(false));

        {
            let ctx = self.ctx.clone();
            let drawing = drawing.clone();
            let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
                drawing.set(true);
                dab(&ctx, evt.offset_x() as f64, evt.offset_y() as f64);
            }) as Box<dyn FnMut(_)>);
            self.canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let ctx = self.ctx.clone();
            let drawing = drawing.clone();
            let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
                if drawing.get() {
                    dab(&ctx, evt.offset_x() as f64, evt.offset_y() as f64);
                }
            }) as Box<dyn FnMut(_)>);
            self.canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        // Lifting the pen or leaving the canvas ends the stroke.
        for kind in ["mouseup", "mouseleave"] {
            let drawing = drawing.clone();
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                drawing.set(false);
            }) as Box<dyn FnMut(_)>);
            self.canvas
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

fn dab(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
    ctx.set_fill_style(&JsValue::from_str(INK));
    ctx.begin_path();
    if ctx.arc(x, y, BRUSH_RADIUS, 0.0, std::f64::consts::TAU).is_ok() {
        ctx.fill();
    }
}
