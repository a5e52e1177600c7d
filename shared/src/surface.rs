use crate::Vector;

/// Source rectangle of one animation frame inside a sprite sheet, in pixels.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct SpriteFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Something particles can be painted onto.
pub trait Surface {
    type Error;

    /// Clears a rectangular region.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), Self::Error>;

    /// Draws `frame` of `texture` centred on `center`, scaled by `scale` and rotated by `rotation` radians about the centre.
    fn draw_sprite(
        &mut self,
        texture: &str,
        frame: SpriteFrame,
        center: Vector,
        scale: f64,
        rotation: f64,
    ) -> Result<(), Self::Error>;
}
