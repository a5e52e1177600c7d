use shared::{SpriteFrame, Surface, Vector};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::texture::TextureSystem;

pub fn draw_sprite_scaled(
    context: &CanvasRenderingContext2d,
    image: &HtmlImageElement,
    sx: f64,
    sy: f64,
    sw: f64,
    sh: f64,
    dx: f64,
    dy: f64,
    dw: f64,
    dh: f64,
) -> Result<(), JsValue> {
    context.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        image, sx, sy, sw, sh, dx, dy, dw, dh,
    )?;

    Ok(())
}

/// Drawing state that can be pushed and popped.
pub trait StateStack {
    fn save(&self);
    fn restore(&self);
}

impl StateStack for CanvasRenderingContext2d {
    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }
}

/// Runs `draw` between a save and a restore of `context`. The state is restored even when `draw` fails.
pub fn isolated<C: StateStack, T, E>(
    context: &C,
    draw: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    context.save();
    let result = draw();
    context.restore();

    result
}

/// [`Surface`] backed by a 2D canvas context and the preloaded textures.
pub struct CanvasSurface<'a> {
    context: &'a CanvasRenderingContext2d,
    textures: &'a TextureSystem,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(context: &'a CanvasRenderingContext2d, textures: &'a TextureSystem) -> Self {
        CanvasSurface { context, textures }
    }
}

impl Surface for CanvasSurface<'_> {
    type Error = JsValue;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), JsValue> {
        self.context.clear_rect(x, y, width, height);

        Ok(())
    }

    fn draw_sprite(
        &mut self,
        texture: &str,
        frame: SpriteFrame,
        center: Vector,
        scale: f64,
        rotation: f64,
    ) -> Result<(), JsValue> {
        let image = self
            .textures
            .get(texture)
            .ok_or_else(|| JsValue::from_str(&format!("unknown texture `{texture}`")))?;

        let width = frame.width * scale;
        let height = frame.height * scale;

        isolated(self.context, || {
            self.context.translate(center.x, center.y)?;
            self.context.rotate(rotation)?;

            draw_sprite_scaled(
                self.context,
                image,
                frame.x,
                frame.y,
                frame.width,
                frame.height,
                -width / 2.0,
                -height / 2.0,
                width,
                height,
            )
        })
    }
}
