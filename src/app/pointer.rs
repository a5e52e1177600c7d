use shared::Vector;

use crate::CANVAS_SCALE;

#[derive(Clone, Default)]
pub struct Pointer {
    previous: Option<Box<Pointer>>,
    location: (i32, i32),
    pub button: bool,
}

impl Pointer {
    pub fn new() -> Pointer {
        Pointer {
            ..Default::default()
        }
    }

    pub fn clicked(&self) -> bool {
        match &self.previous {
            Some(pointer) => self.button && !pointer.button,
            None => self.button,
        }
    }

    pub fn swap(&mut self) {
        self.previous.take(); // Must explicitly drop old Pointer from heap
        self.previous = Some(Box::new(self.clone()));
    }

    /// Location in canvas pixels, before the canvas scale is applied.
    pub fn location(&self) -> (i32, i32) {
        (
            self.location.0 / CANVAS_SCALE as i32,
            self.location.1 / CANVAS_SCALE as i32,
        )
    }

    pub fn position(&self) -> Vector {
        let (x, y) = self.location();

        Vector::new(x as f64, y as f64)
    }

    pub fn set_real(&mut self, location: (i32, i32)) {
        self.location = location;
    }
}
